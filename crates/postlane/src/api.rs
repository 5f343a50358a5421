//! The capability surface shared by every backend.
//!
//! Each resource area is its own trait so fakes can implement only what a
//! test needs. [`ProviderApi`] is the union and is implemented automatically
//! for any type implementing all of them.
//!
//! Every operation takes a [`Context`] and validates its path identifiers
//! before doing any I/O, failing with [`Error::InvalidInput`](crate::Error::InvalidInput).

use crate::context::Context;
use crate::envelope::Page;
use crate::error::Result;
use crate::models::{
    Application, AttachmentInfo, Calendar, CalendarRequest, CodeExchangeRequest, Connector,
    ConnectorRequest, Contact, ContactGroup, ContactQuery, ContactRequest, Draft, DraftRequest,
    Event, EventQuery, EventRequest, Folder, FolderRequest, Grant, GrantQuery, ListQuery, Message,
    MessageQuery, ScheduledMessage, SchedulerConfiguration, SchedulerConfigurationRequest,
    SendMessageRequest, StreamedAttachment, Thread, ThreadQuery, TokenResponse,
    UpdateMessageRequest, UpdateThreadRequest, Webhook, WebhookRequest,
};
use async_trait::async_trait;
use bytes::Bytes;

/// Messages.
#[async_trait]
pub trait MessagesApi: Send + Sync {
    /// Lists one page of messages.
    async fn list_messages(&self, ctx: &Context, grant_id: &str, query: &MessageQuery) -> Result<Page<Message>>;

    /// Fetches one message.
    async fn get_message(&self, ctx: &Context, grant_id: &str, message_id: &str) -> Result<Message>;

    /// Updates message flags or folders.
    async fn update_message(
        &self,
        ctx: &Context,
        grant_id: &str,
        message_id: &str,
        request: &UpdateMessageRequest,
    ) -> Result<Message>;

    /// Deletes (trashes) a message.
    async fn delete_message(&self, ctx: &Context, grant_id: &str, message_id: &str) -> Result<()>;

    /// Sends a message. Attachments with content are uploaded as multipart.
    async fn send_message(&self, ctx: &Context, grant_id: &str, request: &SendMessageRequest) -> Result<Message>;

    /// Sends a message with one attachment streamed from a reader.
    ///
    /// In-memory attachments on `request` are ignored.
    async fn send_message_streamed(
        &self,
        ctx: &Context,
        grant_id: &str,
        request: &SendMessageRequest,
        attachment: StreamedAttachment,
    ) -> Result<Message>;

    /// Sends a transactional message from a verified domain.
    async fn send_domain_message(&self, ctx: &Context, domain: &str, request: &SendMessageRequest) -> Result<Message>;

    /// Lists messages waiting for their scheduled send time.
    async fn list_scheduled_messages(&self, ctx: &Context, grant_id: &str) -> Result<Vec<ScheduledMessage>>;

    /// Cancels a scheduled send.
    async fn cancel_scheduled_message(&self, ctx: &Context, grant_id: &str, schedule_id: &str) -> Result<()>;
}

/// Threads.
#[async_trait]
pub trait ThreadsApi: Send + Sync {
    /// Lists one page of threads.
    async fn list_threads(&self, ctx: &Context, grant_id: &str, query: &ThreadQuery) -> Result<Page<Thread>>;

    /// Fetches one thread.
    async fn get_thread(&self, ctx: &Context, grant_id: &str, thread_id: &str) -> Result<Thread>;

    /// Updates flags or folders for every message in a thread.
    async fn update_thread(
        &self,
        ctx: &Context,
        grant_id: &str,
        thread_id: &str,
        request: &UpdateThreadRequest,
    ) -> Result<Thread>;

    /// Deletes a thread.
    async fn delete_thread(&self, ctx: &Context, grant_id: &str, thread_id: &str) -> Result<()>;
}

/// Drafts.
#[async_trait]
pub trait DraftsApi: Send + Sync {
    /// Lists one page of drafts.
    async fn list_drafts(&self, ctx: &Context, grant_id: &str, query: &ListQuery) -> Result<Page<Draft>>;

    /// Fetches one draft.
    async fn get_draft(&self, ctx: &Context, grant_id: &str, draft_id: &str) -> Result<Draft>;

    /// Creates a draft. Attachments with content are uploaded as multipart.
    async fn create_draft(&self, ctx: &Context, grant_id: &str, request: &DraftRequest) -> Result<Draft>;

    /// Replaces a draft's content.
    async fn update_draft(&self, ctx: &Context, grant_id: &str, draft_id: &str, request: &DraftRequest)
    -> Result<Draft>;

    /// Deletes a draft.
    async fn delete_draft(&self, ctx: &Context, grant_id: &str, draft_id: &str) -> Result<()>;

    /// Sends a draft, returning the sent message.
    async fn send_draft(&self, ctx: &Context, grant_id: &str, draft_id: &str) -> Result<Message>;
}

/// Folders and labels.
#[async_trait]
pub trait FoldersApi: Send + Sync {
    /// Lists every folder.
    async fn list_folders(&self, ctx: &Context, grant_id: &str) -> Result<Vec<Folder>>;

    /// Fetches one folder.
    async fn get_folder(&self, ctx: &Context, grant_id: &str, folder_id: &str) -> Result<Folder>;

    /// Creates a folder.
    async fn create_folder(&self, ctx: &Context, grant_id: &str, request: &FolderRequest) -> Result<Folder>;

    /// Renames or moves a folder.
    async fn update_folder(
        &self,
        ctx: &Context,
        grant_id: &str,
        folder_id: &str,
        request: &FolderRequest,
    ) -> Result<Folder>;

    /// Deletes a folder.
    async fn delete_folder(&self, ctx: &Context, grant_id: &str, folder_id: &str) -> Result<()>;
}

/// Attachments of received messages.
#[async_trait]
pub trait AttachmentsApi: Send + Sync {
    /// Fetches attachment metadata.
    async fn get_attachment(
        &self,
        ctx: &Context,
        grant_id: &str,
        message_id: &str,
        attachment_id: &str,
    ) -> Result<AttachmentInfo>;

    /// Downloads attachment content.
    async fn download_attachment(
        &self,
        ctx: &Context,
        grant_id: &str,
        message_id: &str,
        attachment_id: &str,
    ) -> Result<Bytes>;
}

/// Contacts.
#[async_trait]
pub trait ContactsApi: Send + Sync {
    /// Lists one page of contacts.
    async fn list_contacts(&self, ctx: &Context, grant_id: &str, query: &ContactQuery) -> Result<Page<Contact>>;

    /// Fetches one contact.
    async fn get_contact(&self, ctx: &Context, grant_id: &str, contact_id: &str) -> Result<Contact>;

    /// Creates a contact.
    async fn create_contact(&self, ctx: &Context, grant_id: &str, request: &ContactRequest) -> Result<Contact>;

    /// Updates a contact.
    async fn update_contact(
        &self,
        ctx: &Context,
        grant_id: &str,
        contact_id: &str,
        request: &ContactRequest,
    ) -> Result<Contact>;

    /// Deletes a contact.
    async fn delete_contact(&self, ctx: &Context, grant_id: &str, contact_id: &str) -> Result<()>;

    /// Lists contact groups.
    async fn list_contact_groups(&self, ctx: &Context, grant_id: &str) -> Result<Vec<ContactGroup>>;
}

/// Calendars and events.
#[async_trait]
pub trait CalendarsApi: Send + Sync {
    /// Lists every calendar.
    async fn list_calendars(&self, ctx: &Context, grant_id: &str) -> Result<Vec<Calendar>>;

    /// Fetches one calendar.
    async fn get_calendar(&self, ctx: &Context, grant_id: &str, calendar_id: &str) -> Result<Calendar>;

    /// Creates a calendar.
    async fn create_calendar(&self, ctx: &Context, grant_id: &str, request: &CalendarRequest) -> Result<Calendar>;

    /// Updates a calendar.
    async fn update_calendar(
        &self,
        ctx: &Context,
        grant_id: &str,
        calendar_id: &str,
        request: &CalendarRequest,
    ) -> Result<Calendar>;

    /// Deletes a calendar.
    async fn delete_calendar(&self, ctx: &Context, grant_id: &str, calendar_id: &str) -> Result<()>;

    /// Lists one page of events in `query.calendar_id`.
    async fn list_events(&self, ctx: &Context, grant_id: &str, query: &EventQuery) -> Result<Page<Event>>;

    /// Fetches one event.
    async fn get_event(&self, ctx: &Context, grant_id: &str, calendar_id: &str, event_id: &str) -> Result<Event>;

    /// Creates an event.
    async fn create_event(
        &self,
        ctx: &Context,
        grant_id: &str,
        calendar_id: &str,
        request: &EventRequest,
    ) -> Result<Event>;

    /// Updates an event.
    async fn update_event(
        &self,
        ctx: &Context,
        grant_id: &str,
        calendar_id: &str,
        event_id: &str,
        request: &EventRequest,
    ) -> Result<Event>;

    /// Deletes an event.
    async fn delete_event(&self, ctx: &Context, grant_id: &str, calendar_id: &str, event_id: &str) -> Result<()>;
}

/// Scheduler configurations.
#[async_trait]
pub trait SchedulingApi: Send + Sync {
    /// Lists configurations. Upstream may answer with a single object.
    async fn list_scheduler_configurations(&self, ctx: &Context, grant_id: &str)
    -> Result<Vec<SchedulerConfiguration>>;

    /// Fetches one configuration.
    async fn get_scheduler_configuration(
        &self,
        ctx: &Context,
        grant_id: &str,
        configuration_id: &str,
    ) -> Result<SchedulerConfiguration>;

    /// Creates a configuration.
    async fn create_scheduler_configuration(
        &self,
        ctx: &Context,
        grant_id: &str,
        request: &SchedulerConfigurationRequest,
    ) -> Result<SchedulerConfiguration>;

    /// Updates a configuration.
    async fn update_scheduler_configuration(
        &self,
        ctx: &Context,
        grant_id: &str,
        configuration_id: &str,
        request: &SchedulerConfigurationRequest,
    ) -> Result<SchedulerConfiguration>;

    /// Deletes a configuration.
    async fn delete_scheduler_configuration(&self, ctx: &Context, grant_id: &str, configuration_id: &str)
    -> Result<()>;
}

/// Application administration.
#[async_trait]
pub trait AdminApi: Send + Sync {
    /// Lists one page of grants.
    async fn list_grants(&self, ctx: &Context, query: &GrantQuery) -> Result<Page<Grant>>;

    /// Fetches one grant.
    async fn get_grant(&self, ctx: &Context, grant_id: &str) -> Result<Grant>;

    /// Revokes a grant.
    async fn revoke_grant(&self, ctx: &Context, grant_id: &str) -> Result<()>;

    /// Fetches application details.
    async fn get_application(&self, ctx: &Context) -> Result<Application>;

    /// Lists provider connectors.
    async fn list_connectors(&self, ctx: &Context) -> Result<Vec<Connector>>;

    /// Fetches one connector by provider name.
    async fn get_connector(&self, ctx: &Context, provider: &str) -> Result<Connector>;

    /// Creates a connector.
    async fn create_connector(&self, ctx: &Context, request: &ConnectorRequest) -> Result<Connector>;

    /// Deletes a connector.
    async fn delete_connector(&self, ctx: &Context, provider: &str) -> Result<()>;

    /// Lists webhooks.
    async fn list_webhooks(&self, ctx: &Context) -> Result<Vec<Webhook>>;

    /// Fetches one webhook.
    async fn get_webhook(&self, ctx: &Context, webhook_id: &str) -> Result<Webhook>;

    /// Creates a webhook.
    async fn create_webhook(&self, ctx: &Context, request: &WebhookRequest) -> Result<Webhook>;

    /// Updates a webhook.
    async fn update_webhook(&self, ctx: &Context, webhook_id: &str, request: &WebhookRequest) -> Result<Webhook>;

    /// Deletes a webhook.
    async fn delete_webhook(&self, ctx: &Context, webhook_id: &str) -> Result<()>;
}

/// Hosted authentication.
#[async_trait]
pub trait AuthApi: Send + Sync {
    /// Exchanges an authorization code for a grant. Sent without the API key.
    async fn exchange_code(&self, ctx: &Context, request: &CodeExchangeRequest) -> Result<TokenResponse>;
}

/// Every capability. Callers depend on this (or a narrower trait), never on
/// a concrete backend.
pub trait ProviderApi:
    MessagesApi
    + ThreadsApi
    + DraftsApi
    + FoldersApi
    + AttachmentsApi
    + ContactsApi
    + CalendarsApi
    + SchedulingApi
    + AdminApi
    + AuthApi
{
}

impl<T> ProviderApi for T where
    T: MessagesApi
        + ThreadsApi
        + DraftsApi
        + FoldersApi
        + AttachmentsApi
        + ContactsApi
        + CalendarsApi
        + SchedulingApi
        + AdminApi
        + AuthApi
{
}
