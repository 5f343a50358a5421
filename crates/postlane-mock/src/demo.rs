//! Canned-data backend for demos and screenshots.
//!
//! Every read returns the same records for any grant. Writes return what the
//! upstream would plausibly answer but change nothing, so repeated runs look
//! identical. Unknown ids are `NotFound`.

use crate::echo;
use crate::guard::{live, require};
use crate::store::{by_id, by_provider, by_schedule_id, find, page, Fixtures};
use async_trait::async_trait;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use postlane::{
    AdminApi, Application, AttachmentInfo, AttachmentsApi, AuthApi, Availability, Branding,
    Calendar, CalendarRequest, CalendarsApi, CodeExchangeRequest, Connector, ConnectorRequest,
    Contact, ContactEmail, ContactGroup, ContactGroupRef, ContactQuery, ContactRequest,
    ContactsApi, Context, Draft, DraftRequest, DraftsApi, EmailParticipant, Error, Event,
    EventBooking, EventParticipant, EventQuery, EventRequest, EventWhen, Folder, FolderRequest,
    FoldersApi, Grant, GrantQuery, ListQuery, Message, MessageQuery, MessagesApi, Page,
    PhoneNumber, Result, ScheduledMessage, SchedulerConfiguration, SchedulerConfigurationRequest,
    SchedulerParticipant, SchedulingApi, SendMessageRequest, StreamedAttachment, Thread,
    ThreadQuery, ThreadsApi, TokenResponse, UpdateMessageRequest, UpdateThreadRequest, Webhook,
    WebhookRequest, SYSTEM_FOLDER_MARKER,
};
use serde_json::json;
use tokio::io::AsyncReadExt;

/// Monday 2026-01-05 09:00:00 UTC.
const EPOCH: i64 = 1_767_603_600;

fn at(hours: i64) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp(EPOCH + hours * 3600, 0)
}

fn person(name: &str, email: &str) -> EmailParticipant {
    EmailParticipant::new(email).with_name(name)
}

/// Read-only [`ProviderApi`](postlane::ProviderApi) with canned records.
#[derive(Debug, Clone)]
pub struct DemoClient {
    data: Fixtures,
}

impl Default for DemoClient {
    fn default() -> Self {
        Self::new()
    }
}

impl DemoClient {
    /// Creates a demo client.
    #[must_use]
    pub fn new() -> Self {
        Self { data: catalog() }
    }

    /// The canned records.
    #[must_use]
    pub const fn data(&self) -> &Fixtures {
        &self.data
    }
}

#[allow(clippy::too_many_lines)]
fn catalog() -> Fixtures {
    let ada = person("Ada Lovelace", "ada@example.com");
    let grace = person("Grace Hopper", "grace@example.com");
    let me = person("Demo User", "demo@example.com");

    let message = |id: &str, thread: &str, from: &EmailParticipant, subject: &str, body: &str, hours: i64| Message {
        id: id.to_string(),
        grant_id: "demo-grant".to_string(),
        thread_id: thread.to_string(),
        subject: subject.to_string(),
        from: vec![from.clone()],
        to: vec![me.clone()],
        date: at(hours),
        unread: hours > 24,
        snippet: body.chars().take(60).collect(),
        body: body.to_string(),
        folders: vec!["inbox".to_string()],
        ..Message::default()
    };

    let mut report = message(
        "msg-1",
        "thread-1",
        &ada,
        "Q1 engine report",
        "Attached are the figures for the analytical engine.",
        2,
    );
    let report_pdf = AttachmentInfo {
        id: "att-1".to_string(),
        grant_id: "demo-grant".to_string(),
        filename: "q1-report.pdf".to_string(),
        content_type: "application/pdf".to_string(),
        size: 18,
        ..AttachmentInfo::default()
    };
    report.attachments = vec![report_pdf.clone()];

    let messages = vec![
        report,
        message(
            "msg-2",
            "thread-1",
            &grace,
            "Re: Q1 engine report",
            "Looks good. One bug found in the relay, literally.",
            5,
        ),
        message(
            "msg-3",
            "thread-2",
            &grace,
            "Compiler review",
            "Can we move the compiler review to Thursday?",
            26,
        ),
        message(
            "msg-4",
            "thread-3",
            &ada,
            "Notes on the engine",
            "Sharing my translation notes ahead of the meeting.",
            30,
        ),
    ];

    let thread = |id: &str, subject: &str, ids: &[&str], who: &[&EmailParticipant], hours: i64| Thread {
        id: id.to_string(),
        grant_id: "demo-grant".to_string(),
        subject: subject.to_string(),
        participants: who.iter().map(|p| (*p).clone()).collect(),
        message_ids: ids.iter().map(ToString::to_string).collect(),
        unread: hours > 24,
        latest_message_received_date: at(hours),
        folders: vec!["inbox".to_string()],
        ..Thread::default()
    };

    let folder = |id: &str, name: &str, system: bool, total: u64, unread: u64| Folder {
        id: id.to_string(),
        grant_id: "demo-grant".to_string(),
        name: name.to_string(),
        system_folder: if system {
            SYSTEM_FOLDER_MARKER.to_string()
        } else {
            String::new()
        },
        total_count: total,
        unread_count: unread,
        ..Folder::default()
    };

    let contact = |id: &str, given: &str, surname: &str, email: &str, company: &str| Contact {
        id: id.to_string(),
        grant_id: "demo-grant".to_string(),
        given_name: given.to_string(),
        surname: surname.to_string(),
        company_name: Some(company.to_string()),
        emails: vec![ContactEmail {
            email: email.to_string(),
            kind: Some("work".to_string()),
        }],
        groups: vec![ContactGroupRef {
            id: "group-1".to_string(),
        }],
        ..Contact::default()
    };

    let event = |id: &str, title: &str, start: i64, hours: i64| Event {
        id: id.to_string(),
        grant_id: "demo-grant".to_string(),
        calendar_id: "cal-1".to_string(),
        title: title.to_string(),
        busy: true,
        participants: vec![EventParticipant {
            email: "grace@example.com".to_string(),
            name: Some("Grace Hopper".to_string()),
            status: Some("yes".to_string()),
        }],
        when: EventWhen {
            start_time: at(start),
            end_time: at(start + hours),
            start_timezone: Some("UTC".to_string()),
            end_timezone: Some("UTC".to_string()),
            ..EventWhen::default()
        },
        status: "confirmed".to_string(),
        ..Event::default()
    };

    Fixtures {
        threads: vec![
            thread("thread-1", "Q1 engine report", &["msg-1", "msg-2"], &[&ada, &grace], 5),
            thread("thread-2", "Compiler review", &["msg-3"], &[&grace], 26),
            thread("thread-3", "Notes on the engine", &["msg-4"], &[&ada], 30),
        ],
        messages,
        scheduled_messages: vec![ScheduledMessage {
            schedule_id: "sched-1".to_string(),
            status: "pending".to_string(),
            close_time: at(72),
        }],
        drafts: vec![Draft {
            id: "draft-1".to_string(),
            grant_id: "demo-grant".to_string(),
            subject: "Agenda for Thursday".to_string(),
            to: vec![grace.clone()],
            body: "1. Compiler review\n2. Engine figures".to_string(),
            date: at(28),
            ..Draft::default()
        }],
        folders: vec![
            folder("inbox", "Inbox", true, 4, 2),
            folder("sent", "Sent", true, 12, 0),
            folder("drafts", "Drafts", true, 1, 0),
            folder("trash", "Trash", true, 0, 0),
            folder("projects", "Projects", false, 0, 0),
        ],
        attachment_content: [(report_pdf.id.clone(), Bytes::from_static(b"%PDF-1.7 demo file"))]
            .into_iter()
            .collect(),
        attachments: vec![report_pdf],
        contacts: vec![
            contact("contact-1", "Ada", "Lovelace", "ada@example.com", "Analytical Engines Ltd"),
            contact("contact-2", "Grace", "Hopper", "grace@example.com", "Navy Computing"),
            Contact {
                phone_numbers: vec![PhoneNumber {
                    number: "+1 555 0100".to_string(),
                    kind: Some("mobile".to_string()),
                }],
                ..contact("contact-3", "Alan", "Turing", "alan@example.com", "Bletchley Park")
            },
        ],
        contact_groups: vec![ContactGroup {
            id: "group-1".to_string(),
            grant_id: "demo-grant".to_string(),
            name: "Colleagues".to_string(),
            group_type: "user".to_string(),
            path: None,
        }],
        calendars: vec![
            Calendar {
                id: "cal-1".to_string(),
                grant_id: "demo-grant".to_string(),
                name: "Work".to_string(),
                timezone: Some("UTC".to_string()),
                is_primary: true,
                is_owned_by_user: true,
                hex_color: Some("#2f6fdb".to_string()),
                ..Calendar::default()
            },
            Calendar {
                id: "cal-2".to_string(),
                grant_id: "demo-grant".to_string(),
                name: "Holidays".to_string(),
                read_only: true,
                ..Calendar::default()
            },
        ],
        events: vec![
            event("event-1", "Compiler review", 72, 1),
            event("event-2", "Engine figures walkthrough", 96, 2),
        ],
        scheduler_configurations: vec![SchedulerConfiguration {
            id: "config-1".to_string(),
            name: "Intro call".to_string(),
            slug: Some("intro".to_string()),
            participants: vec![SchedulerParticipant {
                email: me.email.clone(),
                name: me.name.clone(),
                is_organizer: true,
            }],
            availability: Some(Availability {
                duration_minutes: 30,
                interval_minutes: Some(15),
            }),
            event_booking: Some(EventBooking {
                title: "Intro call".to_string(),
                ..EventBooking::default()
            }),
            ..SchedulerConfiguration::default()
        }],
        grants: vec![Grant {
            id: "demo-grant".to_string(),
            provider: "google".to_string(),
            grant_status: "valid".to_string(),
            email: me.email.clone(),
            scope: vec!["email".to_string(), "calendar".to_string(), "contacts".to_string()],
            created_at: at(-720),
            updated_at: at(-24),
        }],
        application: Application {
            application_id: "demo-app".to_string(),
            organization_id: "demo-org".to_string(),
            region: "us".to_string(),
            environment: "sandbox".to_string(),
            branding: Some(Branding {
                name: "Postlane Demo".to_string(),
                ..Branding::default()
            }),
        },
        connectors: vec![Connector {
            provider: "google".to_string(),
            settings: json!({ "client_id": "demo-google-client" }),
            scope: vec!["email".to_string()],
        }],
        webhooks: vec![Webhook {
            id: "webhook-1".to_string(),
            description: Some("Demo listener".to_string()),
            trigger_types: vec!["message.created".to_string()],
            webhook_url: "https://hooks.example.com/postlane".to_string(),
            status: "active".to_string(),
            ..Webhook::default()
        }],
        token: TokenResponse {
            access_token: "demo-access-token".to_string(),
            token_type: "Bearer".to_string(),
            expires_in: 3600,
            grant_id: "demo-grant".to_string(),
            email: me.email.clone(),
            provider: "google".to_string(),
            ..TokenResponse::default()
        },
    }
}

#[async_trait]
impl MessagesApi for DemoClient {
    async fn list_messages(&self, ctx: &Context, grant_id: &str, query: &MessageQuery) -> Result<Page<Message>> {
        require("grant_id", grant_id)?;
        live(ctx)?;
        let rows = self
            .data
            .messages
            .iter()
            .filter(|m| query.unread.is_none_or(|u| m.unread == u))
            .filter(|m| query.thread_id.as_deref().is_none_or(|t| m.thread_id == t))
            .cloned();
        Ok(page(rows, query.limit))
    }

    async fn get_message(&self, ctx: &Context, grant_id: &str, message_id: &str) -> Result<Message> {
        require("grant_id", grant_id)?;
        let message_id = require("message_id", message_id)?;
        live(ctx)?;
        find(&self.data.messages, by_id, "message", message_id).cloned()
    }

    async fn update_message(
        &self,
        ctx: &Context,
        grant_id: &str,
        message_id: &str,
        request: &UpdateMessageRequest,
    ) -> Result<Message> {
        let mut message = self.get_message(ctx, grant_id, message_id).await?;
        echo::apply_message(&mut message, request);
        Ok(message)
    }

    async fn delete_message(&self, ctx: &Context, grant_id: &str, message_id: &str) -> Result<()> {
        self.get_message(ctx, grant_id, message_id).await.map(drop)
    }

    async fn send_message(&self, ctx: &Context, grant_id: &str, request: &SendMessageRequest) -> Result<Message> {
        let grant_id = require("grant_id", grant_id)?;
        live(ctx)?;
        Ok(echo::sent_message(grant_id, "demo-sent".to_string(), request))
    }

    async fn send_message_streamed(
        &self,
        ctx: &Context,
        grant_id: &str,
        request: &SendMessageRequest,
        attachment: StreamedAttachment,
    ) -> Result<Message> {
        let grant_id = require("grant_id", grant_id)?;
        live(ctx)?;
        let StreamedAttachment {
            filename,
            content_type,
            mut reader,
        } = attachment;
        let mut sink = Vec::new();
        reader
            .read_to_end(&mut sink)
            .await
            .map_err(|e| Error::Upload(e.into()))?;

        let mut message = echo::sent_message(grant_id, "demo-sent".to_string(), request);
        message.attachments.push(AttachmentInfo {
            id: "att-0".to_string(),
            grant_id: grant_id.to_string(),
            filename,
            content_type: content_type.unwrap_or_else(|| "application/octet-stream".to_string()),
            size: sink.len() as u64,
            ..AttachmentInfo::default()
        });
        Ok(message)
    }

    async fn send_domain_message(&self, ctx: &Context, domain: &str, request: &SendMessageRequest) -> Result<Message> {
        require("domain", domain)?;
        live(ctx)?;
        Ok(echo::sent_message("", "demo-sent".to_string(), request))
    }

    async fn list_scheduled_messages(&self, ctx: &Context, grant_id: &str) -> Result<Vec<ScheduledMessage>> {
        require("grant_id", grant_id)?;
        live(ctx)?;
        Ok(self.data.scheduled_messages.clone())
    }

    async fn cancel_scheduled_message(&self, ctx: &Context, grant_id: &str, schedule_id: &str) -> Result<()> {
        require("grant_id", grant_id)?;
        let schedule_id = require("schedule_id", schedule_id)?;
        live(ctx)?;
        find(&self.data.scheduled_messages, by_schedule_id, "scheduled message", schedule_id).map(drop)
    }
}

#[async_trait]
impl ThreadsApi for DemoClient {
    async fn list_threads(&self, ctx: &Context, grant_id: &str, query: &ThreadQuery) -> Result<Page<Thread>> {
        require("grant_id", grant_id)?;
        live(ctx)?;
        let rows = self
            .data
            .threads
            .iter()
            .filter(|t| query.unread.is_none_or(|u| t.unread == u))
            .cloned();
        Ok(page(rows, query.limit))
    }

    async fn get_thread(&self, ctx: &Context, grant_id: &str, thread_id: &str) -> Result<Thread> {
        require("grant_id", grant_id)?;
        let thread_id = require("thread_id", thread_id)?;
        live(ctx)?;
        find(&self.data.threads, by_id, "thread", thread_id).cloned()
    }

    async fn update_thread(
        &self,
        ctx: &Context,
        grant_id: &str,
        thread_id: &str,
        request: &UpdateThreadRequest,
    ) -> Result<Thread> {
        let mut thread = self.get_thread(ctx, grant_id, thread_id).await?;
        echo::apply_thread(&mut thread, request);
        Ok(thread)
    }

    async fn delete_thread(&self, ctx: &Context, grant_id: &str, thread_id: &str) -> Result<()> {
        self.get_thread(ctx, grant_id, thread_id).await.map(drop)
    }
}

#[async_trait]
impl DraftsApi for DemoClient {
    async fn list_drafts(&self, ctx: &Context, grant_id: &str, query: &ListQuery) -> Result<Page<Draft>> {
        require("grant_id", grant_id)?;
        live(ctx)?;
        Ok(page(self.data.drafts.clone(), query.limit))
    }

    async fn get_draft(&self, ctx: &Context, grant_id: &str, draft_id: &str) -> Result<Draft> {
        require("grant_id", grant_id)?;
        let draft_id = require("draft_id", draft_id)?;
        live(ctx)?;
        find(&self.data.drafts, by_id, "draft", draft_id).cloned()
    }

    async fn create_draft(&self, ctx: &Context, grant_id: &str, request: &DraftRequest) -> Result<Draft> {
        let grant_id = require("grant_id", grant_id)?;
        live(ctx)?;
        let mut draft = Draft {
            id: "demo-draft".to_string(),
            grant_id: grant_id.to_string(),
            ..Draft::default()
        };
        echo::apply_draft(grant_id, &mut draft, request);
        Ok(draft)
    }

    async fn update_draft(
        &self,
        ctx: &Context,
        grant_id: &str,
        draft_id: &str,
        request: &DraftRequest,
    ) -> Result<Draft> {
        let mut draft = self.get_draft(ctx, grant_id, draft_id).await?;
        echo::apply_draft(grant_id, &mut draft, request);
        Ok(draft)
    }

    async fn delete_draft(&self, ctx: &Context, grant_id: &str, draft_id: &str) -> Result<()> {
        self.get_draft(ctx, grant_id, draft_id).await.map(drop)
    }

    async fn send_draft(&self, ctx: &Context, grant_id: &str, draft_id: &str) -> Result<Message> {
        let draft = self.get_draft(ctx, grant_id, draft_id).await?;
        Ok(echo::message_from_draft(&draft))
    }
}

#[async_trait]
impl FoldersApi for DemoClient {
    async fn list_folders(&self, ctx: &Context, grant_id: &str) -> Result<Vec<Folder>> {
        require("grant_id", grant_id)?;
        live(ctx)?;
        Ok(self.data.folders.clone())
    }

    async fn get_folder(&self, ctx: &Context, grant_id: &str, folder_id: &str) -> Result<Folder> {
        require("grant_id", grant_id)?;
        let folder_id = require("folder_id", folder_id)?;
        live(ctx)?;
        find(&self.data.folders, by_id, "folder", folder_id).cloned()
    }

    async fn create_folder(&self, ctx: &Context, grant_id: &str, request: &FolderRequest) -> Result<Folder> {
        let grant_id = require("grant_id", grant_id)?;
        live(ctx)?;
        let mut folder = Folder {
            id: "demo-folder".to_string(),
            grant_id: grant_id.to_string(),
            ..Folder::default()
        };
        echo::apply_folder(&mut folder, request);
        Ok(folder)
    }

    async fn update_folder(
        &self,
        ctx: &Context,
        grant_id: &str,
        folder_id: &str,
        request: &FolderRequest,
    ) -> Result<Folder> {
        let mut folder = self.get_folder(ctx, grant_id, folder_id).await?;
        echo::apply_folder(&mut folder, request);
        Ok(folder)
    }

    async fn delete_folder(&self, ctx: &Context, grant_id: &str, folder_id: &str) -> Result<()> {
        self.get_folder(ctx, grant_id, folder_id).await.map(drop)
    }
}

#[async_trait]
impl AttachmentsApi for DemoClient {
    async fn get_attachment(
        &self,
        ctx: &Context,
        grant_id: &str,
        message_id: &str,
        attachment_id: &str,
    ) -> Result<AttachmentInfo> {
        let message = self.get_message(ctx, grant_id, message_id).await?;
        let attachment_id = require("attachment_id", attachment_id)?;
        find(&message.attachments, by_id, "attachment", attachment_id).cloned()
    }

    async fn download_attachment(
        &self,
        ctx: &Context,
        grant_id: &str,
        message_id: &str,
        attachment_id: &str,
    ) -> Result<Bytes> {
        let info = self.get_attachment(ctx, grant_id, message_id, attachment_id).await?;
        self.data
            .attachment_content
            .get(&info.id)
            .cloned()
            .ok_or_else(|| Error::not_found("attachment", attachment_id))
    }
}

#[async_trait]
impl ContactsApi for DemoClient {
    async fn list_contacts(&self, ctx: &Context, grant_id: &str, query: &ContactQuery) -> Result<Page<Contact>> {
        require("grant_id", grant_id)?;
        live(ctx)?;
        let rows = self
            .data
            .contacts
            .iter()
            .filter(|c| {
                query
                    .email
                    .as_deref()
                    .is_none_or(|e| c.emails.iter().any(|ce| ce.email == e))
            })
            .cloned();
        Ok(page(rows, query.limit))
    }

    async fn get_contact(&self, ctx: &Context, grant_id: &str, contact_id: &str) -> Result<Contact> {
        require("grant_id", grant_id)?;
        let contact_id = require("contact_id", contact_id)?;
        live(ctx)?;
        find(&self.data.contacts, by_id, "contact", contact_id).cloned()
    }

    async fn create_contact(&self, ctx: &Context, grant_id: &str, request: &ContactRequest) -> Result<Contact> {
        let grant_id = require("grant_id", grant_id)?;
        live(ctx)?;
        let mut contact = Contact {
            id: "demo-contact".to_string(),
            grant_id: grant_id.to_string(),
            ..Contact::default()
        };
        echo::apply_contact(&mut contact, request);
        Ok(contact)
    }

    async fn update_contact(
        &self,
        ctx: &Context,
        grant_id: &str,
        contact_id: &str,
        request: &ContactRequest,
    ) -> Result<Contact> {
        let mut contact = self.get_contact(ctx, grant_id, contact_id).await?;
        echo::apply_contact(&mut contact, request);
        Ok(contact)
    }

    async fn delete_contact(&self, ctx: &Context, grant_id: &str, contact_id: &str) -> Result<()> {
        self.get_contact(ctx, grant_id, contact_id).await.map(drop)
    }

    async fn list_contact_groups(&self, ctx: &Context, grant_id: &str) -> Result<Vec<ContactGroup>> {
        require("grant_id", grant_id)?;
        live(ctx)?;
        Ok(self.data.contact_groups.clone())
    }
}

#[async_trait]
impl CalendarsApi for DemoClient {
    async fn list_calendars(&self, ctx: &Context, grant_id: &str) -> Result<Vec<Calendar>> {
        require("grant_id", grant_id)?;
        live(ctx)?;
        Ok(self.data.calendars.clone())
    }

    async fn get_calendar(&self, ctx: &Context, grant_id: &str, calendar_id: &str) -> Result<Calendar> {
        require("grant_id", grant_id)?;
        let calendar_id = require("calendar_id", calendar_id)?;
        live(ctx)?;
        find(&self.data.calendars, by_id, "calendar", calendar_id).cloned()
    }

    async fn create_calendar(&self, ctx: &Context, grant_id: &str, request: &CalendarRequest) -> Result<Calendar> {
        let grant_id = require("grant_id", grant_id)?;
        live(ctx)?;
        let mut calendar = Calendar {
            id: "demo-calendar".to_string(),
            grant_id: grant_id.to_string(),
            is_owned_by_user: true,
            ..Calendar::default()
        };
        echo::apply_calendar(&mut calendar, request);
        Ok(calendar)
    }

    async fn update_calendar(
        &self,
        ctx: &Context,
        grant_id: &str,
        calendar_id: &str,
        request: &CalendarRequest,
    ) -> Result<Calendar> {
        let mut calendar = self.get_calendar(ctx, grant_id, calendar_id).await?;
        echo::apply_calendar(&mut calendar, request);
        Ok(calendar)
    }

    async fn delete_calendar(&self, ctx: &Context, grant_id: &str, calendar_id: &str) -> Result<()> {
        self.get_calendar(ctx, grant_id, calendar_id).await.map(drop)
    }

    async fn list_events(&self, ctx: &Context, grant_id: &str, query: &EventQuery) -> Result<Page<Event>> {
        require("grant_id", grant_id)?;
        let calendar_id = require("calendar_id", &query.calendar_id)?;
        live(ctx)?;
        let rows = self
            .data
            .events
            .iter()
            .filter(|e| e.calendar_id == calendar_id)
            .cloned();
        Ok(page(rows, query.limit))
    }

    async fn get_event(&self, ctx: &Context, grant_id: &str, calendar_id: &str, event_id: &str) -> Result<Event> {
        require("grant_id", grant_id)?;
        let calendar_id = require("calendar_id", calendar_id)?;
        let event_id = require("event_id", event_id)?;
        live(ctx)?;
        self.data
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
        let calendar = self.get_calendar(ctx, grant_id, calendar_id).await?;
        let mut event = Event {
            id: "demo-event".to_string(),
            grant_id: calendar.grant_id,
            calendar_id: calendar.id,
            ..Event::default()
        };
        echo::apply_event(&mut event, request);
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
        let mut event = self.get_event(ctx, grant_id, calendar_id, event_id).await?;
        echo::apply_event(&mut event, request);
        Ok(event)
    }

    async fn delete_event(&self, ctx: &Context, grant_id: &str, calendar_id: &str, event_id: &str) -> Result<()> {
        self.get_event(ctx, grant_id, calendar_id, event_id).await.map(drop)
    }
}

#[async_trait]
impl SchedulingApi for DemoClient {
    async fn list_scheduler_configurations(&self, ctx: &Context, grant_id: &str) -> Result<Vec<SchedulerConfiguration>> {
        require("grant_id", grant_id)?;
        live(ctx)?;
        Ok(self.data.scheduler_configurations.clone())
    }

    async fn get_scheduler_configuration(
        &self,
        ctx: &Context,
        grant_id: &str,
        configuration_id: &str,
    ) -> Result<SchedulerConfiguration> {
        require("grant_id", grant_id)?;
        let configuration_id = require("configuration_id", configuration_id)?;
        live(ctx)?;
        find(
            &self.data.scheduler_configurations,
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
        require("grant_id", grant_id)?;
        live(ctx)?;
        let mut configuration = SchedulerConfiguration {
            id: "demo-config".to_string(),
            ..SchedulerConfiguration::default()
        };
        echo::apply_configuration(&mut configuration, request);
        Ok(configuration)
    }

    async fn update_scheduler_configuration(
        &self,
        ctx: &Context,
        grant_id: &str,
        configuration_id: &str,
        request: &SchedulerConfigurationRequest,
    ) -> Result<SchedulerConfiguration> {
        let mut configuration = self
            .get_scheduler_configuration(ctx, grant_id, configuration_id)
            .await?;
        echo::apply_configuration(&mut configuration, request);
        Ok(configuration)
    }

    async fn delete_scheduler_configuration(&self, ctx: &Context, grant_id: &str, configuration_id: &str) -> Result<()> {
        self.get_scheduler_configuration(ctx, grant_id, configuration_id)
            .await
            .map(drop)
    }
}

#[async_trait]
impl AdminApi for DemoClient {
    async fn list_grants(&self, ctx: &Context, query: &GrantQuery) -> Result<Page<Grant>> {
        live(ctx)?;
        Ok(page(self.data.grants.clone(), query.limit))
    }

    async fn get_grant(&self, ctx: &Context, grant_id: &str) -> Result<Grant> {
        let grant_id = require("grant_id", grant_id)?;
        live(ctx)?;
        find(&self.data.grants, by_id, "grant", grant_id).cloned()
    }

    async fn revoke_grant(&self, ctx: &Context, grant_id: &str) -> Result<()> {
        self.get_grant(ctx, grant_id).await.map(drop)
    }

    async fn get_application(&self, ctx: &Context) -> Result<Application> {
        live(ctx)?;
        Ok(self.data.application.clone())
    }

    async fn list_connectors(&self, ctx: &Context) -> Result<Vec<Connector>> {
        live(ctx)?;
        Ok(self.data.connectors.clone())
    }

    async fn get_connector(&self, ctx: &Context, provider: &str) -> Result<Connector> {
        let provider = require("provider", provider)?;
        live(ctx)?;
        find(&self.data.connectors, by_provider, "connector", provider).cloned()
    }

    async fn create_connector(&self, ctx: &Context, request: &ConnectorRequest) -> Result<Connector> {
        require("provider", &request.provider)?;
        live(ctx)?;
        Ok(echo::connector(request))
    }

    async fn delete_connector(&self, ctx: &Context, provider: &str) -> Result<()> {
        self.get_connector(ctx, provider).await.map(drop)
    }

    async fn list_webhooks(&self, ctx: &Context) -> Result<Vec<Webhook>> {
        live(ctx)?;
        Ok(self.data.webhooks.clone())
    }

    async fn get_webhook(&self, ctx: &Context, webhook_id: &str) -> Result<Webhook> {
        let webhook_id = require("webhook_id", webhook_id)?;
        live(ctx)?;
        find(&self.data.webhooks, by_id, "webhook", webhook_id).cloned()
    }

    async fn create_webhook(&self, ctx: &Context, request: &WebhookRequest) -> Result<Webhook> {
        require("webhook_url", request.webhook_url.as_deref().unwrap_or_default())?;
        live(ctx)?;
        let mut webhook = Webhook {
            id: "demo-webhook".to_string(),
            webhook_secret: Some("demo-secret".to_string()),
            ..Webhook::default()
        };
        echo::apply_webhook(&mut webhook, request);
        Ok(webhook)
    }

    async fn update_webhook(&self, ctx: &Context, webhook_id: &str, request: &WebhookRequest) -> Result<Webhook> {
        let mut webhook = self.get_webhook(ctx, webhook_id).await?;
        echo::apply_webhook(&mut webhook, request);
        Ok(webhook)
    }

    async fn delete_webhook(&self, ctx: &Context, webhook_id: &str) -> Result<()> {
        self.get_webhook(ctx, webhook_id).await.map(drop)
    }
}

#[async_trait]
impl AuthApi for DemoClient {
    async fn exchange_code(&self, ctx: &Context, request: &CodeExchangeRequest) -> Result<TokenResponse> {
        require("code", &request.code)?;
        require("redirect_uri", &request.redirect_uri)?;
        live(ctx)?;
        Ok(self.data.token.clone())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_reads_are_deterministic() {
        let ctx = Context::background();
        let first = DemoClient::new()
            .list_messages(&ctx, "any", &MessageQuery::default())
            .await
            .unwrap();
        let second = DemoClient::new()
            .list_messages(&ctx, "other", &MessageQuery::default())
            .await
            .unwrap();
        assert_eq!(first, second);
        assert_eq!(first.len(), 4);
    }

    #[tokio::test]
    async fn test_unknown_ids_are_not_found() {
        let demo = DemoClient::new();
        let ctx = Context::background();
        let err = demo.get_message(&ctx, "g", "nope").await.unwrap_err();
        assert_eq!(err.to_string(), "message not found: nope");
        assert!(demo.delete_folder(&ctx, "g", "nope").await.unwrap_err().is_not_found());
        assert!(demo
            .get_event(&ctx, "g", "cal-2", "event-1")
            .await
            .unwrap_err()
            .is_not_found());
    }

    #[tokio::test]
    async fn test_writes_echo_without_persisting() {
        let demo = DemoClient::new();
        let ctx = Context::background();
        let folder = demo.create_folder(&ctx, "g", &FolderRequest::named("Receipts")).await.unwrap();
        assert_eq!(folder.name, "Receipts");
        assert_eq!(demo.list_folders(&ctx, "g").await.unwrap().len(), 5);
    }

    #[tokio::test]
    async fn test_system_folders_are_marked() {
        let folders = DemoClient::new().list_folders(&Context::background(), "g").await.unwrap();
        assert_eq!(folders.iter().filter(|f| f.is_system()).count(), 4);
    }

    #[tokio::test]
    async fn test_attachment_download() {
        let demo = DemoClient::new();
        let ctx = Context::background();
        let info = demo.get_attachment(&ctx, "g", "msg-1", "att-1").await.unwrap();
        let content = demo.download_attachment(&ctx, "g", "msg-1", "att-1").await.unwrap();
        assert_eq!(content.len() as u64, info.size);
        assert!(demo.get_attachment(&ctx, "g", "msg-2", "att-1").await.is_err());
    }
}
