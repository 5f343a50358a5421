use crate::api::FoldersApi;
use crate::client::{require, HttpClient};
use crate::context::Context;
use crate::error::{Error, Result};
use crate::models::{Folder, FolderRequest};
use async_trait::async_trait;

#[async_trait]
impl FoldersApi for HttpClient {
    async fn list_folders(&self, ctx: &Context, grant_id: &str) -> Result<Vec<Folder>> {
        let url = self.grant_url(grant_id, &["folders"])?;
        self.fetch_all(ctx, url).await
    }

    async fn get_folder(&self, ctx: &Context, grant_id: &str, folder_id: &str) -> Result<Folder> {
        let folder_id = require("folder_id", folder_id)?;
        let url = self.grant_url(grant_id, &["folders", folder_id])?;
        self.get_with_not_found(ctx, url, Error::not_found("folder", folder_id))
            .await
    }

    async fn create_folder(&self, ctx: &Context, grant_id: &str, request: &FolderRequest) -> Result<Folder> {
        let url = self.grant_url(grant_id, &["folders"])?;
        self.create(ctx, url, request).await
    }

    async fn update_folder(
        &self,
        ctx: &Context,
        grant_id: &str,
        folder_id: &str,
        request: &FolderRequest,
    ) -> Result<Folder> {
        let folder_id = require("folder_id", folder_id)?;
        let url = self.grant_url(grant_id, &["folders", folder_id])?;
        self.update(ctx, url, request).await
    }

    async fn delete_folder(&self, ctx: &Context, grant_id: &str, folder_id: &str) -> Result<()> {
        let folder_id = require("folder_id", folder_id)?;
        let url = self.grant_url(grant_id, &["folders", folder_id])?;
        self.remove(ctx, url).await
    }
}
