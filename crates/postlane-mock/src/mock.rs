//! Scriptable in-memory backend.
//!
//! [`MockClient`] serves [`Fixtures`], applies writes to them, records every
//! call and can be told to fail a given operation. Identifier validation and
//! context checks happen first, as with the HTTP client, and a call that
//! fails them is not recorded.

use crate::echo;
use crate::guard::{live, require};
use crate::store::{by_id, by_provider, by_schedule_id, find, find_mut, page, remove, Fixtures};
use async_trait::async_trait;
use bytes::Bytes;
use postlane::{
    AdminApi, Application, AttachmentInfo, AttachmentsApi, AuthApi, Calendar, CalendarRequest,
    CalendarsApi, CodeExchangeRequest, Connector, ConnectorRequest, Contact, ContactGroup,
    ContactQuery, ContactRequest, ContactsApi, Context, Draft, DraftRequest, DraftsApi, Error,
    Event, EventQuery, EventRequest, Folder, FolderRequest, FoldersApi, Grant, GrantQuery,
    ListQuery, Message, MessageQuery, MessagesApi, Page, Result, ScheduledMessage,
    SchedulerConfiguration, SchedulerConfigurationRequest, SchedulingApi, SendMessageRequest,
    StreamedAttachment, Thread, ThreadQuery, ThreadsApi, TokenResponse, UpdateMessageRequest,
    UpdateThreadRequest, Webhook, WebhookRequest,
};
use std::collections::{HashMap, VecDeque};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};
use tokio::io::AsyncReadExt;
use tracing::debug;

/// Replaces the default behavior of `send_message`.
///
/// Passed to [`MockClient::with_send_hook`]; each client owns its hook, so
/// parallel tests never observe each other's overrides. Closures of the
/// right shape implement it.
pub trait SendMessageHook: Send + Sync {
    /// Produces the sent message, or the error `send_message` should return.
    ///
    /// # Errors
    ///
    /// Whatever the test wants `send_message` to fail with.
    fn send(&self, grant_id: &str, request: &SendMessageRequest) -> Result<Message>;
}

impl<F> SendMessageHook for F
where
    F: Fn(&str, &SendMessageRequest) -> Result<Message> + Send + Sync,
{
    fn send(&self, grant_id: &str, request: &SendMessageRequest) -> Result<Message> {
        self(grant_id, request)
    }
}

/// One recorded operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Call {
    /// Trait method name, e.g. `"get_message"`.
    pub operation: &'static str,
    /// Path identifiers in order, starting with the grant id when scoped.
    pub args: Vec<String>,
}

impl Call {
    fn new(operation: &'static str, args: &[&str]) -> Self {
        Self {
            operation,
            args: args.iter().map(ToString::to_string).collect(),
        }
    }
}

/// In-memory [`ProviderApi`](postlane::ProviderApi) for tests.
#[derive(Default)]
pub struct MockClient {
    state: Mutex<Fixtures>,
    calls: Mutex<Vec<Call>>,
    failures: Mutex<HashMap<&'static str, VecDeque<Error>>>,
    send_hook: Option<Box<dyn SendMessageHook>>,
    next_id: AtomicU64,
}

impl fmt::Debug for MockClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MockClient")
            .field("calls", &lock(&self.calls).len())
            .field("send_hook", &self.send_hook.is_some())
            .finish_non_exhaustive()
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl MockClient {
    /// Creates a mock serving `fixtures`.
    #[must_use]
    pub fn new(fixtures: Fixtures) -> Self {
        Self {
            state: Mutex::new(fixtures),
            ..Self::default()
        }
    }

    /// Creates a mock whose `send_message` is answered by `hook`.
    #[must_use]
    pub fn with_send_hook(fixtures: Fixtures, hook: impl SendMessageHook + 'static) -> Self {
        Self {
            send_hook: Some(Box::new(hook)),
            ..Self::new(fixtures)
        }
    }

    /// Every recorded call, oldest first.
    #[must_use]
    pub fn calls(&self) -> Vec<Call> {
        lock(&self.calls).clone()
    }

    /// Number of recorded calls to `operation`.
    #[must_use]
    pub fn call_count(&self, operation: &str) -> usize {
        lock(&self.calls)
            .iter()
            .filter(|c| c.operation == operation)
            .count()
    }

    /// Makes the next call to `operation` fail with `error`.
    ///
    /// Scripted failures queue up; each is returned once, in order.
    pub fn fail_on(&self, operation: &'static str, error: Error) {
        lock(&self.failures).entry(operation).or_default().push_back(error);
    }

    /// Snapshot of the current records.
    #[must_use]
    pub fn fixtures(&self) -> Fixtures {
        lock(&self.state).clone()
    }

    /// Checks `ctx`, records the call and returns any scripted failure.
    fn enter(&self, ctx: &Context, operation: &'static str, args: &[&str]) -> Result<()> {
        live(ctx)?;
        debug!(operation, ?args, "mock call");
        lock(&self.calls).push(Call::new(operation, args));
        match lock(&self.failures).get_mut(operation).and_then(VecDeque::pop_front) {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }

    fn state(&self) -> MutexGuard<'_, Fixtures> {
        lock(&self.state)
    }

    fn new_id(&self, prefix: &str) -> String {
        let n = self.next_id.fetch_add(1, Ordering::Relaxed) + 1;
        format!("{prefix}-{n}")
    }

    fn deliver(&self, grant_id: &str, request: &SendMessageRequest) -> Result<Message> {
        let message = match &self.send_hook {
            Some(hook) => hook.send(grant_id, request)?,
            None => echo::sent_message(grant_id, self.new_id("msg"), request),
        };
        self.state().messages.push(message.clone());
        Ok(message)
    }
}

#[async_trait]
impl MessagesApi for MockClient {
    async fn list_messages(&self, ctx: &Context, grant_id: &str, query: &MessageQuery) -> Result<Page<Message>> {
        let grant_id = require("grant_id", grant_id)?;
        self.enter(ctx, "list_messages", &[grant_id])?;
        let state = self.state();
        let rows = state
            .messages
            .iter()
            .filter(|m| query.unread.is_none_or(|u| m.unread == u))
            .filter(|m| query.thread_id.as_deref().is_none_or(|t| m.thread_id == t))
            .filter(|m| query.in_folder.as_ref().is_none_or(|f| m.folders.contains(f)))
            .filter(|m| query.subject.as_deref().is_none_or(|s| m.subject.contains(s)))
            .cloned();
        Ok(page(rows, query.limit))
    }

    async fn get_message(&self, ctx: &Context, grant_id: &str, message_id: &str) -> Result<Message> {
        let grant_id = require("grant_id", grant_id)?;
        let message_id = require("message_id", message_id)?;
        self.enter(ctx, "get_message", &[grant_id, message_id])?;
        find(&self.state().messages, by_id, "message", message_id).cloned()
    }

    async fn update_message(
        &self,
        ctx: &Context,
        grant_id: &str,
        message_id: &str,
        request: &UpdateMessageRequest,
    ) -> Result<Message> {
        let grant_id = require("grant_id", grant_id)?;
        let message_id = require("message_id", message_id)?;
        self.enter(ctx, "update_message", &[grant_id, message_id])?;
        let mut state = self.state();
        let message = find_mut(&mut state.messages, by_id, "message", message_id)?;
        echo::apply_message(message, request);
        Ok(message.clone())
    }

    async fn delete_message(&self, ctx: &Context, grant_id: &str, message_id: &str) -> Result<()> {
        let grant_id = require("grant_id", grant_id)?;
        let message_id = require("message_id", message_id)?;
        self.enter(ctx, "delete_message", &[grant_id, message_id])?;
        remove(&mut self.state().messages, by_id, "message", message_id)
    }

    async fn send_message(&self, ctx: &Context, grant_id: &str, request: &SendMessageRequest) -> Result<Message> {
        let grant_id = require("grant_id", grant_id)?;
        self.enter(ctx, "send_message", &[grant_id])?;
        self.deliver(grant_id, request)
    }

    async fn send_message_streamed(
        &self,
        ctx: &Context,
        grant_id: &str,
        request: &SendMessageRequest,
        attachment: StreamedAttachment,
    ) -> Result<Message> {
        let grant_id = require("grant_id", grant_id)?;
        self.enter(ctx, "send_message_streamed", &[grant_id])?;

        let StreamedAttachment {
            filename,
            content_type,
            mut reader,
        } = attachment;
        let mut content = Vec::new();
        reader
            .read_to_end(&mut content)
            .await
            .map_err(|e| Error::Upload(e.into()))?;

        let mut message = echo::sent_message(grant_id, self.new_id("msg"), request);
        message.attachments = vec![AttachmentInfo {
            id: "att-0".to_string(),
            grant_id: grant_id.to_string(),
            filename,
            content_type: content_type.unwrap_or_else(|| "application/octet-stream".to_string()),
            size: content.len() as u64,
            ..AttachmentInfo::default()
        }];
        self.state().messages.push(message.clone());
        Ok(message)
    }

    async fn send_domain_message(&self, ctx: &Context, domain: &str, request: &SendMessageRequest) -> Result<Message> {
        let domain = require("domain", domain)?;
        self.enter(ctx, "send_domain_message", &[domain])?;
        Ok(echo::sent_message("", self.new_id("msg"), request))
    }

    async fn list_scheduled_messages(&self, ctx: &Context, grant_id: &str) -> Result<Vec<ScheduledMessage>> {
        let grant_id = require("grant_id", grant_id)?;
        self.enter(ctx, "list_scheduled_messages", &[grant_id])?;
        Ok(self.state().scheduled_messages.clone())
    }

    async fn cancel_scheduled_message(&self, ctx: &Context, grant_id: &str, schedule_id: &str) -> Result<()> {
        let grant_id = require("grant_id", grant_id)?;
        let schedule_id = require("schedule_id", schedule_id)?;
        self.enter(ctx, "cancel_scheduled_message", &[grant_id, schedule_id])?;
        remove(
            &mut self.state().scheduled_messages,
            by_schedule_id,
            "scheduled message",
            schedule_id,
        )
    }
}

#[async_trait]
impl ThreadsApi for MockClient {
    async fn list_threads(&self, ctx: &Context, grant_id: &str, query: &ThreadQuery) -> Result<Page<Thread>> {
        let grant_id = require("grant_id", grant_id)?;
        self.enter(ctx, "list_threads", &[grant_id])?;
        let state = self.state();
        let rows = state
            .threads
            .iter()
            .filter(|t| query.unread.is_none_or(|u| t.unread == u))
            .filter(|t| query.in_folder.as_ref().is_none_or(|f| t.folders.contains(f)))
            .filter(|t| {
                query
                    .any_email
                    .as_deref()
                    .is_none_or(|e| t.participants.iter().any(|p| p.email == e))
            })
            .cloned();
        Ok(page(rows, query.limit))
    }

    async fn get_thread(&self, ctx: &Context, grant_id: &str, thread_id: &str) -> Result<Thread> {
        let grant_id = require("grant_id", grant_id)?;
        let thread_id = require("thread_id", thread_id)?;
        self.enter(ctx, "get_thread", &[grant_id, thread_id])?;
        find(&self.state().threads, by_id, "thread", thread_id).cloned()
    }

    async fn update_thread(
        &self,
        ctx: &Context,
        grant_id: &str,
        thread_id: &str,
        request: &UpdateThreadRequest,
    ) -> Result<Thread> {
        let grant_id = require("grant_id", grant_id)?;
        let thread_id = require("thread_id", thread_id)?;
        self.enter(ctx, "update_thread", &[grant_id, thread_id])?;
        let mut state = self.state();
        let thread = find_mut(&mut state.threads, by_id, "thread", thread_id)?;
        echo::apply_thread(thread, request);
        Ok(thread.clone())
    }

    async fn delete_thread(&self, ctx: &Context, grant_id: &str, thread_id: &str) -> Result<()> {
        let grant_id = require("grant_id", grant_id)?;
        let thread_id = require("thread_id", thread_id)?;
        self.enter(ctx, "delete_thread", &[grant_id, thread_id])?;
        remove(&mut self.state().threads, by_id, "thread", thread_id)
    }
}

#[async_trait]
impl DraftsApi for MockClient {
    async fn list_drafts(&self, ctx: &Context, grant_id: &str, query: &ListQuery) -> Result<Page<Draft>> {
        let grant_id = require("grant_id", grant_id)?;
        self.enter(ctx, "list_drafts", &[grant_id])?;
        Ok(page(self.state().drafts.clone(), query.limit))
    }

    async fn get_draft(&self, ctx: &Context, grant_id: &str, draft_id: &str) -> Result<Draft> {
        let grant_id = require("grant_id", grant_id)?;
        let draft_id = require("draft_id", draft_id)?;
        self.enter(ctx, "get_draft", &[grant_id, draft_id])?;
        find(&self.state().drafts, by_id, "draft", draft_id).cloned()
    }

    async fn create_draft(&self, ctx: &Context, grant_id: &str, request: &DraftRequest) -> Result<Draft> {
        let grant_id = require("grant_id", grant_id)?;
        self.enter(ctx, "create_draft", &[grant_id])?;
        let mut draft = Draft {
            id: self.new_id("draft"),
            grant_id: grant_id.to_string(),
            ..Draft::default()
        };
        echo::apply_draft(grant_id, &mut draft, request);
        self.state().drafts.push(draft.clone());
        Ok(draft)
    }

    async fn update_draft(
        &self,
        ctx: &Context,
        grant_id: &str,
        draft_id: &str,
        request: &DraftRequest,
    ) -> Result<Draft> {
        let grant_id = require("grant_id", grant_id)?;
        let draft_id = require("draft_id", draft_id)?;
        self.enter(ctx, "update_draft", &[grant_id, draft_id])?;
        let mut state = self.state();
        let draft = find_mut(&mut state.drafts, by_id, "draft", draft_id)?;
        echo::apply_draft(grant_id, draft, request);
        Ok(draft.clone())
    }

    async fn delete_draft(&self, ctx: &Context, grant_id: &str, draft_id: &str) -> Result<()> {
        let grant_id = require("grant_id", grant_id)?;
        let draft_id = require("draft_id", draft_id)?;
        self.enter(ctx, "delete_draft", &[grant_id, draft_id])?;
        remove(&mut self.state().drafts, by_id, "draft", draft_id)
    }

    async fn send_draft(&self, ctx: &Context, grant_id: &str, draft_id: &str) -> Result<Message> {
        let grant_id = require("grant_id", grant_id)?;
        let draft_id = require("draft_id", draft_id)?;
        self.enter(ctx, "send_draft", &[grant_id, draft_id])?;
        let mut state = self.state();
        let message = echo::message_from_draft(find(&state.drafts, by_id, "draft", draft_id)?);
        remove(&mut state.drafts, by_id, "draft", draft_id)?;
        state.messages.push(message.clone());
        Ok(message)
    }
}

#[async_trait]
impl FoldersApi for MockClient {
    async fn list_folders(&self, ctx: &Context, grant_id: &str) -> Result<Vec<Folder>> {
        let grant_id = require("grant_id", grant_id)?;
        self.enter(ctx, "list_folders", &[grant_id])?;
        Ok(self.state().folders.clone())
    }

    async fn get_folder(&self, ctx: &Context, grant_id: &str, folder_id: &str) -> Result<Folder> {
        let grant_id = require("grant_id", grant_id)?;
        let folder_id = require("folder_id", folder_id)?;
        self.enter(ctx, "get_folder", &[grant_id, folder_id])?;
        find(&self.state().folders, by_id, "folder", folder_id).cloned()
    }

    async fn create_folder(&self, ctx: &Context, grant_id: &str, request: &FolderRequest) -> Result<Folder> {
        let grant_id = require("grant_id", grant_id)?;
        self.enter(ctx, "create_folder", &[grant_id])?;
        let mut folder = Folder {
            id: self.new_id("folder"),
            grant_id: grant_id.to_string(),
            ..Folder::default()
        };
        echo::apply_folder(&mut folder, request);
        self.state().folders.push(folder.clone());
        Ok(folder)
    }

    async fn update_folder(
        &self,
        ctx: &Context,
        grant_id: &str,
        folder_id: &str,
        request: &FolderRequest,
    ) -> Result<Folder> {
        let grant_id = require("grant_id", grant_id)?;
        let folder_id = require("folder_id", folder_id)?;
        self.enter(ctx, "update_folder", &[grant_id, folder_id])?;
        let mut state = self.state();
        let folder = find_mut(&mut state.folders, by_id, "folder", folder_id)?;
        echo::apply_folder(folder, request);
        Ok(folder.clone())
    }

    async fn delete_folder(&self, ctx: &Context, grant_id: &str, folder_id: &str) -> Result<()> {
        let grant_id = require("grant_id", grant_id)?;
        let folder_id = require("folder_id", folder_id)?;
        self.enter(ctx, "delete_folder", &[grant_id, folder_id])?;
        remove(&mut self.state().folders, by_id, "folder", folder_id)
    }
}

#[async_trait]
impl AttachmentsApi for MockClient {
    async fn get_attachment(
        &self,
        ctx: &Context,
        grant_id: &str,
        message_id: &str,
        attachment_id: &str,
    ) -> Result<AttachmentInfo> {
        let grant_id = require("grant_id", grant_id)?;
        let message_id = require("message_id", message_id)?;
        let attachment_id = require("attachment_id", attachment_id)?;
        self.enter(ctx, "get_attachment", &[grant_id, message_id, attachment_id])?;
        find(&self.state().attachments, by_id, "attachment", attachment_id).cloned()
    }

    async fn download_attachment(
        &self,
        ctx: &Context,
        grant_id: &str,
        message_id: &str,
        attachment_id: &str,
    ) -> Result<Bytes> {
        let grant_id = require("grant_id", grant_id)?;
        let message_id = require("message_id", message_id)?;
        let attachment_id = require("attachment_id", attachment_id)?;
        self.enter(ctx, "download_attachment", &[grant_id, message_id, attachment_id])?;
        self.state()
            .attachment_content
            .get(attachment_id)
            .cloned()
            .ok_or_else(|| Error::not_found("attachment", attachment_id))
    }
}

#[async_trait]
impl ContactsApi for MockClient {
    async fn list_contacts(&self, ctx: &Context, grant_id: &str, query: &ContactQuery) -> Result<Page<Contact>> {
        let grant_id = require("grant_id", grant_id)?;
        self.enter(ctx, "list_contacts", &[grant_id])?;
        let state = self.state();
        let rows = state
            .contacts
            .iter()
            .filter(|c| {
                query
                    .email
                    .as_deref()
                    .is_none_or(|e| c.emails.iter().any(|ce| ce.email == e))
            })
            .filter(|c| {
                query
                    .group
                    .as_deref()
                    .is_none_or(|g| c.groups.iter().any(|cg| cg.id == g))
            })
            .cloned();
        Ok(page(rows, query.limit))
    }

    async fn get_contact(&self, ctx: &Context, grant_id: &str, contact_id: &str) -> Result<Contact> {
        let grant_id = require("grant_id", grant_id)?;
        let contact_id = require("contact_id", contact_id)?;
        self.enter(ctx, "get_contact", &[grant_id, contact_id])?;
        find(&self.state().contacts, by_id, "contact", contact_id).cloned()
    }

    async fn create_contact(&self, ctx: &Context, grant_id: &str, request: &ContactRequest) -> Result<Contact> {
        let grant_id = require("grant_id", grant_id)?;
        self.enter(ctx, "create_contact", &[grant_id])?;
        let mut contact = Contact {
            id: self.new_id("contact"),
            grant_id: grant_id.to_string(),
            ..Contact::default()
        };
        echo::apply_contact(&mut contact, request);
        self.state().contacts.push(contact.clone());
        Ok(contact)
    }

    async fn update_contact(
        &self,
        ctx: &Context,
        grant_id: &str,
        contact_id: &str,
        request: &ContactRequest,
    ) -> Result<Contact> {
        let grant_id = require("grant_id", grant_id)?;
        let contact_id = require("contact_id", contact_id)?;
        self.enter(ctx, "update_contact", &[grant_id, contact_id])?;
        let mut state = self.state();
        let contact = find_mut(&mut state.contacts, by_id, "contact", contact_id)?;
        echo::apply_contact(contact, request);
        Ok(contact.clone())
    }

    async fn delete_contact(&self, ctx: &Context, grant_id: &str, contact_id: &str) -> Result<()> {
        let grant_id = require("grant_id", grant_id)?;
        let contact_id = require("contact_id", contact_id)?;
        self.enter(ctx, "delete_contact", &[grant_id, contact_id])?;
        remove(&mut self.state().contacts, by_id, "contact", contact_id)
    }

    async fn list_contact_groups(&self, ctx: &Context, grant_id: &str) -> Result<Vec<ContactGroup>> {
        let grant_id = require("grant_id", grant_id)?;
        self.enter(ctx, "list_contact_groups", &[grant_id])?;
        Ok(self.state().contact_groups.clone())
    }
}

#[async_trait]
impl CalendarsApi for MockClient {
    async fn list_calendars(&self, ctx: &Context, grant_id: &str) -> Result<Vec<Calendar>> {
        let grant_id = require("grant_id", grant_id)?;
        self.enter(ctx, "list_calendars", &[grant_id])?;
        Ok(self.state().calendars.clone())
    }

    async fn get_calendar(&self, ctx: &Context, grant_id: &str, calendar_id: &str) -> Result<Calendar> {
        let grant_id = require("grant_id", grant_id)?;
        let calendar_id = require("calendar_id", calendar_id)?;
        self.enter(ctx, "get_calendar", &[grant_id, calendar_id])?;
        find(&self.state().calendars, by_id, "calendar", calendar_id).cloned()
    }

    async fn create_calendar(&self, ctx: &Context, grant_id: &str, request: &CalendarRequest) -> Result<Calendar> {
        let grant_id = require("grant_id", grant_id)?;
        self.enter(ctx, "create_calendar", &[grant_id])?;
        let mut calendar = Calendar {
            id: self.new_id("calendar"),
            grant_id: grant_id.to_string(),
            is_owned_by_user: true,
            ..Calendar::default()
        };
        echo::apply_calendar(&mut calendar, request);
        self.state().calendars.push(calendar.clone());
        Ok(calendar)
    }

    async fn update_calendar(
        &self,
        ctx: &Context,
        grant_id: &str,
        calendar_id: &str,
        request: &CalendarRequest,
    ) -> Result<Calendar> {
        let grant_id = require("grant_id", grant_id)?;
        let calendar_id = require("calendar_id", calendar_id)?;
        self.enter(ctx, "update_calendar", &[grant_id, calendar_id])?;
        let mut state = self.state();
        let calendar = find_mut(&mut state.calendars, by_id, "calendar", calendar_id)?;
        echo::apply_calendar(calendar, request);
        Ok(calendar.clone())
    }

    async fn delete_calendar(&self, ctx: &Context, grant_id: &str, calendar_id: &str) -> Result<()> {
        let grant_id = require("grant_id", grant_id)?;
        let calendar_id = require("calendar_id", calendar_id)?;
        self.enter(ctx, "delete_calendar", &[grant_id, calendar_id])?;
        let mut state = self.state();
        remove(&mut state.calendars, by_id, "calendar", calendar_id)?;
        state.events.retain(|e| e.calendar_id != calendar_id);
        Ok(())
    }

    async fn list_events(&self, ctx: &Context, grant_id: &str, query: &EventQuery) -> Result<Page<Event>> {
        let grant_id = require("grant_id", grant_id)?;
        let calendar_id = require("calendar_id", &query.calendar_id)?;
        self.enter(ctx, "list_events", &[grant_id, calendar_id])?;
        let state = self.state();
        let rows = state
            .events
            .iter()
            .filter(|e| e.calendar_id == calendar_id)
            .filter(|e| query.title.as_deref().is_none_or(|t| e.title.contains(t)))
            .cloned();
        Ok(page(rows, query.limit))
    }

    async fn get_event(&self, ctx: &Context, grant_id: &str, calendar_id: &str, event_id: &str) -> Result<Event> {
        let grant_id = require("grant_id", grant_id)?;
        let calendar_id = require("calendar_id", calendar_id)?;
        let event_id = require("event_id", event_id)?;
        self.enter(ctx, "get_event", &[grant_id, calendar_id, event_id])?;
        self.state()
            .events
            .iter()
            .find(|e| e.id == event_id && e.calendar_id == calendar_id)
            .cloned()
            .ok_or_else(|| Error::not_found("event", event_id))
    }

    async fn create_event(
        &self,
        ctx: &Context,
        grant_id: &str,
        calendar_id: &str,
        request: &EventRequest,
    ) -> Result<Event> {
        let grant_id = require("grant_id", grant_id)?;
        let calendar_id = require("calendar_id", calendar_id)?;
        self.enter(ctx, "create_event", &[grant_id, calendar_id])?;
        let mut event = Event {
            id: self.new_id("event"),
            grant_id: grant_id.to_string(),
            calendar_id: calendar_id.to_string(),
            ..Event::default()
        };
        echo::apply_event(&mut event, request);
        self.state().events.push(event.clone());
        Ok(event)
    }

    async fn update_event(
        &self,
        ctx: &Context,
        grant_id: &str,
        calendar_id: &str,
        event_id: &str,
        request: &EventRequest,
    ) -> Result<Event> {
        let grant_id = require("grant_id", grant_id)?;
        let calendar_id = require("calendar_id", calendar_id)?;
        let event_id = require("event_id", event_id)?;
        self.enter(ctx, "update_event", &[grant_id, calendar_id, event_id])?;
        let mut state = self.state();
        let event = state
            .events
            .iter_mut()
            .find(|e| e.id == event_id && e.calendar_id == calendar_id)
            .ok_or_else(|| Error::not_found("event", event_id))?;
        echo::apply_event(event, request);
        Ok(event.clone())
    }

    async fn delete_event(&self, ctx: &Context, grant_id: &str, calendar_id: &str, event_id: &str) -> Result<()> {
        let grant_id = require("grant_id", grant_id)?;
        let calendar_id = require("calendar_id", calendar_id)?;
        let event_id = require("event_id", event_id)?;
        self.enter(ctx, "delete_event", &[grant_id, calendar_id, event_id])?;
        let mut state = self.state();
        let before = state.events.len();
        state
            .events
            .retain(|e| !(e.id == event_id && e.calendar_id == calendar_id));
        if state.events.len() == before {
            return Err(Error::not_found("event", event_id));
        }
        Ok(())
    }
}

#[async_trait]
impl SchedulingApi for MockClient {
    async fn list_scheduler_configurations(&self, ctx: &Context, grant_id: &str) -> Result<Vec<SchedulerConfiguration>> {
        let grant_id = require("grant_id", grant_id)?;
        self.enter(ctx, "list_scheduler_configurations", &[grant_id])?;
        Ok(self.state().scheduler_configurations.clone())
    }

    async fn get_scheduler_configuration(
        &self,
        ctx: &Context,
        grant_id: &str,
        configuration_id: &str,
    ) -> Result<SchedulerConfiguration> {
        let grant_id = require("grant_id", grant_id)?;
        let configuration_id = require("configuration_id", configuration_id)?;
        self.enter(ctx, "get_scheduler_configuration", &[grant_id, configuration_id])?;
        find(
            &self.state().scheduler_configurations,
            by_id,
            "scheduler configuration",
            configuration_id,
        )
        .cloned()
    }

    async fn create_scheduler_configuration(
        &self,
        ctx: &Context,
        grant_id: &str,
        request: &SchedulerConfigurationRequest,
    ) -> Result<SchedulerConfiguration> {
        let grant_id = require("grant_id", grant_id)?;
        self.enter(ctx, "create_scheduler_configuration", &[grant_id])?;
        let mut configuration = SchedulerConfiguration {
            id: self.new_id("config"),
            ..SchedulerConfiguration::default()
        };
        echo::apply_configuration(&mut configuration, request);
        self.state().scheduler_configurations.push(configuration.clone());
        Ok(configuration)
    }

    async fn update_scheduler_configuration(
        &self,
        ctx: &Context,
        grant_id: &str,
        configuration_id: &str,
        request: &SchedulerConfigurationRequest,
    ) -> Result<SchedulerConfiguration> {
        let grant_id = require("grant_id", grant_id)?;
        let configuration_id = require("configuration_id", configuration_id)?;
        self.enter(ctx, "update_scheduler_configuration", &[grant_id, configuration_id])?;
        let mut state = self.state();
        let configuration = find_mut(
            &mut state.scheduler_configurations,
            by_id,
            "scheduler configuration",
            configuration_id,
        )?;
        echo::apply_configuration(configuration, request);
        Ok(configuration.clone())
    }

    async fn delete_scheduler_configuration(&self, ctx: &Context, grant_id: &str, configuration_id: &str) -> Result<()> {
        let grant_id = require("grant_id", grant_id)?;
        let configuration_id = require("configuration_id", configuration_id)?;
        self.enter(ctx, "delete_scheduler_configuration", &[grant_id, configuration_id])?;
        remove(
            &mut self.state().scheduler_configurations,
            by_id,
            "scheduler configuration",
            configuration_id,
        )
    }
}

#[async_trait]
impl AdminApi for MockClient {
    async fn list_grants(&self, ctx: &Context, query: &GrantQuery) -> Result<Page<Grant>> {
        self.enter(ctx, "list_grants", &[])?;
        let state = self.state();
        let rows = state
            .grants
            .iter()
            .filter(|g| query.provider.as_deref().is_none_or(|p| g.provider == p))
            .filter(|g| query.email.as_deref().is_none_or(|e| g.email == e))
            .cloned();
        Ok(page(rows, query.limit))
    }

    async fn get_grant(&self, ctx: &Context, grant_id: &str) -> Result<Grant> {
        let grant_id = require("grant_id", grant_id)?;
        self.enter(ctx, "get_grant", &[grant_id])?;
        find(&self.state().grants, by_id, "grant", grant_id).cloned()
    }

    async fn revoke_grant(&self, ctx: &Context, grant_id: &str) -> Result<()> {
        let grant_id = require("grant_id", grant_id)?;
        self.enter(ctx, "revoke_grant", &[grant_id])?;
        remove(&mut self.state().grants, by_id, "grant", grant_id)
    }

    async fn get_application(&self, ctx: &Context) -> Result<Application> {
        self.enter(ctx, "get_application", &[])?;
        Ok(self.state().application.clone())
    }

    async fn list_connectors(&self, ctx: &Context) -> Result<Vec<Connector>> {
        self.enter(ctx, "list_connectors", &[])?;
        Ok(self.state().connectors.clone())
    }

    async fn get_connector(&self, ctx: &Context, provider: &str) -> Result<Connector> {
        let provider = require("provider", provider)?;
        self.enter(ctx, "get_connector", &[provider])?;
        find(&self.state().connectors, by_provider, "connector", provider).cloned()
    }

    async fn create_connector(&self, ctx: &Context, request: &ConnectorRequest) -> Result<Connector> {
        let provider = require("provider", &request.provider)?;
        self.enter(ctx, "create_connector", &[provider])?;
        let connector = echo::connector(request);
        let mut state = self.state();
        state.connectors.retain(|c| c.provider != provider);
        state.connectors.push(connector.clone());
        Ok(connector)
    }

    async fn delete_connector(&self, ctx: &Context, provider: &str) -> Result<()> {
        let provider = require("provider", provider)?;
        self.enter(ctx, "delete_connector", &[provider])?;
        remove(&mut self.state().connectors, by_provider, "connector", provider)
    }

    async fn list_webhooks(&self, ctx: &Context) -> Result<Vec<Webhook>> {
        self.enter(ctx, "list_webhooks", &[])?;
        Ok(self.state().webhooks.clone())
    }

    async fn get_webhook(&self, ctx: &Context, webhook_id: &str) -> Result<Webhook> {
        let webhook_id = require("webhook_id", webhook_id)?;
        self.enter(ctx, "get_webhook", &[webhook_id])?;
        find(&self.state().webhooks, by_id, "webhook", webhook_id).cloned()
    }

    async fn create_webhook(&self, ctx: &Context, request: &WebhookRequest) -> Result<Webhook> {
        let url = require("webhook_url", request.webhook_url.as_deref().unwrap_or_default())?;
        self.enter(ctx, "create_webhook", &[url])?;
        let mut webhook = Webhook {
            id: self.new_id("webhook"),
            webhook_secret: Some(self.new_id("whsec")),
            ..Webhook::default()
        };
        echo::apply_webhook(&mut webhook, request);
        self.state().webhooks.push(webhook.clone());
        Ok(webhook)
    }

    async fn update_webhook(&self, ctx: &Context, webhook_id: &str, request: &WebhookRequest) -> Result<Webhook> {
        let webhook_id = require("webhook_id", webhook_id)?;
        self.enter(ctx, "update_webhook", &[webhook_id])?;
        let mut state = self.state();
        let webhook = find_mut(&mut state.webhooks, by_id, "webhook", webhook_id)?;
        echo::apply_webhook(webhook, request);
        Ok(webhook.clone())
    }

    async fn delete_webhook(&self, ctx: &Context, webhook_id: &str) -> Result<()> {
        let webhook_id = require("webhook_id", webhook_id)?;
        self.enter(ctx, "delete_webhook", &[webhook_id])?;
        remove(&mut self.state().webhooks, by_id, "webhook", webhook_id)
    }
}

#[async_trait]
impl AuthApi for MockClient {
    async fn exchange_code(&self, ctx: &Context, request: &CodeExchangeRequest) -> Result<TokenResponse> {
        let code = require("code", &request.code)?;
        require("redirect_uri", &request.redirect_uri)?;
        self.enter(ctx, "exchange_code", &[code])?;
        Ok(self.state().token.clone())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use postlane::{ApiError, Interrupted};

    fn message(id: &str, unread: bool) -> Message {
        Message {
            id: id.into(),
            subject: format!("subject {id}"),
            unread,
            folders: vec!["INBOX".into()],
            ..Message::default()
        }
    }

    fn mock() -> MockClient {
        MockClient::new(Fixtures::new().with_messages([message("m-1", true), message("m-2", false)]))
    }

    #[tokio::test]
    async fn test_calls_are_recorded() {
        let mock = mock();
        let ctx = Context::background();
        mock.get_message(&ctx, "g", "m-1").await.unwrap();
        mock.list_folders(&ctx, "g").await.unwrap();

        assert_eq!(
            mock.calls(),
            vec![
                Call {
                    operation: "get_message",
                    args: vec!["g".into(), "m-1".into()],
                },
                Call {
                    operation: "list_folders",
                    args: vec!["g".into()],
                },
            ]
        );
        assert_eq!(mock.call_count("get_message"), 1);
    }

    #[tokio::test]
    async fn test_invalid_input_is_not_recorded() {
        let mock = mock();
        let err = mock.get_message(&Context::background(), "g", " ").await.unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
        assert!(mock.calls().is_empty());
    }

    #[tokio::test]
    async fn test_fail_on_is_consumed_once() {
        let mock = mock();
        let ctx = Context::background();
        mock.fail_on("get_message", ApiError::from_status(503).into());

        let err = mock.get_message(&ctx, "g", "m-1").await.unwrap_err();
        assert_eq!(err.status(), Some(503));
        assert!(mock.get_message(&ctx, "g", "m-1").await.is_ok());
        assert_eq!(mock.call_count("get_message"), 2);
    }

    #[tokio::test]
    async fn test_cancelled_context() {
        let mock = mock();
        let ctx = Context::background();
        ctx.cancel();
        let err = mock.list_folders(&ctx, "g").await.unwrap_err();
        assert!(matches!(err, Error::RateLimitAborted(Interrupted::Cancelled)));
    }

    #[tokio::test]
    async fn test_list_filters_and_limit() {
        let mock = mock();
        let ctx = Context::background();
        let unread = MessageQuery {
            unread: Some(true),
            ..MessageQuery::default()
        };
        let page = mock.list_messages(&ctx, "g", &unread).await.unwrap();
        assert_eq!(page.len(), 1);
        assert_eq!(page.data[0].id, "m-1");

        let limited = MessageQuery {
            limit: Some(1),
            ..MessageQuery::default()
        };
        assert_eq!(mock.list_messages(&ctx, "g", &limited).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_writes_apply_to_fixtures() {
        let mock = mock();
        let ctx = Context::background();

        let update = UpdateMessageRequest {
            unread: Some(false),
            ..UpdateMessageRequest::default()
        };
        assert!(!mock.update_message(&ctx, "g", "m-1", &update).await.unwrap().unread);

        mock.delete_message(&ctx, "g", "m-2").await.unwrap();
        assert!(mock.get_message(&ctx, "g", "m-2").await.unwrap_err().is_not_found());

        let folder = mock.create_folder(&ctx, "g", &FolderRequest::named("Receipts")).await.unwrap();
        assert_eq!(folder.grant_id, "g");
        assert_eq!(mock.get_folder(&ctx, "g", &folder.id).await.unwrap().name, "Receipts");
    }

    #[tokio::test]
    async fn test_send_hook_replaces_default() {
        let mock = MockClient::with_send_hook(Fixtures::new(), |grant: &str, request: &SendMessageRequest| {
            if request.subject.is_empty() {
                return Err(Error::missing("subject"));
            }
            Ok(Message {
                id: format!("{grant}-hooked"),
                subject: request.subject.clone(),
                ..Message::default()
            })
        });
        let ctx = Context::background();

        let sent = mock
            .send_message(&ctx, "g", &SendMessageRequest::new("a@example.com", "Hi", "body"))
            .await
            .unwrap();
        assert_eq!(sent.id, "g-hooked");
        assert_eq!(mock.fixtures().messages.len(), 1);

        let err = mock
            .send_message(&ctx, "g", &SendMessageRequest::new("a@example.com", "", "body"))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
    }

    #[tokio::test]
    async fn test_streamed_send_reads_source() {
        let mock = mock();
        let attachment = StreamedAttachment::new("notes.txt", std::io::Cursor::new(vec![1u8; 300]))
            .with_content_type("text/plain");
        let sent = mock
            .send_message_streamed(
                &Context::background(),
                "g",
                &SendMessageRequest::new("a@example.com", "Notes", ""),
                attachment,
            )
            .await
            .unwrap();
        assert_eq!(sent.attachments.len(), 1);
        assert_eq!(sent.attachments[0].size, 300);
        assert_eq!(sent.attachments[0].content_type, "text/plain");
    }

    #[tokio::test]
    async fn test_send_draft_moves_it() {
        let mock = MockClient::default();
        let ctx = Context::background();
        let draft = mock
            .create_draft(
                &ctx,
                "g",
                &DraftRequest {
                    subject: Some("Plan".into()),
                    ..DraftRequest::default()
                },
            )
            .await
            .unwrap();

        let sent = mock.send_draft(&ctx, "g", &draft.id).await.unwrap();
        assert_eq!(sent.subject, "Plan");
        assert!(mock.get_draft(&ctx, "g", &draft.id).await.unwrap_err().is_not_found());
        assert_eq!(mock.get_message(&ctx, "g", &draft.id).await.unwrap().subject, "Plan");
    }
}
