use crate::api::SchedulingApi;
use crate::client::{require, HttpClient, READ};
use crate::context::Context;
use crate::envelope::decode_one_or_many;
use crate::error::{Error, Result};
use crate::models::{SchedulerConfiguration, SchedulerConfigurationRequest};
use async_trait::async_trait;
use reqwest::Method;

#[async_trait]
impl SchedulingApi for HttpClient {
    async fn list_scheduler_configurations(
        &self,
        ctx: &Context,
        grant_id: &str,
    ) -> Result<Vec<SchedulerConfiguration>> {
        let url = self.grant_url(grant_id, &["scheduling", "configurations"])?;
        let response = self.do_json::<()>(ctx, Method::GET, url, None, READ).await?;
        let body = response.bytes().await?;
        decode_one_or_many(&body).map(|page| page.data)
    }

    async fn get_scheduler_configuration(
        &self,
        ctx: &Context,
        grant_id: &str,
        configuration_id: &str,
    ) -> Result<SchedulerConfiguration> {
        let configuration_id = require("configuration_id", configuration_id)?;
        let url = self.grant_url(grant_id, &["scheduling", "configurations", configuration_id])?;
        self.get_with_not_found(
            ctx,
            url,
            Error::not_found("scheduler configuration", configuration_id),
        )
        .await
    }

    async fn create_scheduler_configuration(
        &self,
        ctx: &Context,
        grant_id: &str,
        request: &SchedulerConfigurationRequest,
    ) -> Result<SchedulerConfiguration> {
        let url = self.grant_url(grant_id, &["scheduling", "configurations"])?;
        self.create(ctx, url, request).await
    }

    async fn update_scheduler_configuration(
        &self,
        ctx: &Context,
        grant_id: &str,
        configuration_id: &str,
        request: &SchedulerConfigurationRequest,
    ) -> Result<SchedulerConfiguration> {
        let configuration_id = require("configuration_id", configuration_id)?;
        let url = self.grant_url(grant_id, &["scheduling", "configurations", configuration_id])?;
        self.update(ctx, url, request).await
    }

    async fn delete_scheduler_configuration(
        &self,
        ctx: &Context,
        grant_id: &str,
        configuration_id: &str,
    ) -> Result<()> {
        let configuration_id = require("configuration_id", configuration_id)?;
        let url = self.grant_url(grant_id, &["scheduling", "configurations", configuration_id])?;
        self.remove(ctx, url).await
    }
}
