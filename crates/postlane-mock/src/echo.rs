//! Builds the records a write operation would plausibly return.
//!
//! `apply_*` functions copy the fields a request sets onto a record. Creates
//! start from `Default` with an id already assigned.

use chrono::Utc;
use postlane::{
    AttachmentInfo, Calendar, CalendarRequest, Connector, ConnectorRequest, Contact,
    ContactRequest, Draft, DraftRequest, Event, EventRequest, Folder, FolderRequest, Message,
    OutgoingAttachment, SchedulerConfiguration, SchedulerConfigurationRequest, SendMessageRequest,
    Thread, UpdateMessageRequest, UpdateThreadRequest, Webhook, WebhookRequest,
};

fn set<T: Clone>(field: &mut T, value: Option<&T>) {
    if let Some(value) = value {
        field.clone_from(value);
    }
}

fn set_opt<T: Clone>(field: &mut Option<T>, value: Option<&T>) {
    if value.is_some() {
        *field = value.cloned();
    }
}

/// Metadata for the attachments that would be uploaded; empty ones are
/// skipped.
pub(crate) fn attachment_infos(grant_id: &str, attachments: &[OutgoingAttachment]) -> Vec<AttachmentInfo> {
    attachments
        .iter()
        .filter(|a| !a.content.is_empty())
        .enumerate()
        .map(|(i, a)| AttachmentInfo {
            id: format!("att-{i}"),
            grant_id: grant_id.to_string(),
            filename: a.filename.clone(),
            content_type: a
                .content_type
                .clone()
                .unwrap_or_else(|| "application/octet-stream".to_string()),
            size: a.content.len() as u64,
            ..AttachmentInfo::default()
        })
        .collect()
}

pub(crate) fn sent_message(grant_id: &str, id: String, request: &SendMessageRequest) -> Message {
    Message {
        id,
        grant_id: grant_id.to_string(),
        subject: request.subject.clone(),
        from: request.from.clone(),
        to: request.to.clone(),
        cc: request.cc.clone(),
        bcc: request.bcc.clone(),
        reply_to: request.reply_to.clone(),
        date: Some(request.send_at.unwrap_or_else(Utc::now)),
        snippet: request.body.chars().take(100).collect(),
        body: request.body.clone(),
        folders: vec!["SENT".to_string()],
        attachments: attachment_infos(grant_id, &request.attachments),
        ..Message::default()
    }
}

pub(crate) fn apply_message(message: &mut Message, request: &UpdateMessageRequest) {
    set(&mut message.unread, request.unread.as_ref());
    set(&mut message.starred, request.starred.as_ref());
    set(&mut message.folders, request.folders.as_ref());
}

pub(crate) fn apply_thread(thread: &mut Thread, request: &UpdateThreadRequest) {
    set(&mut thread.unread, request.unread.as_ref());
    set(&mut thread.starred, request.starred.as_ref());
    set(&mut thread.folders, request.folders.as_ref());
}

pub(crate) fn apply_draft(grant_id: &str, draft: &mut Draft, request: &DraftRequest) {
    set(&mut draft.subject, request.subject.as_ref());
    set(&mut draft.body, request.body.as_ref());
    draft.to.clone_from(&request.to);
    draft.cc.clone_from(&request.cc);
    draft.bcc.clone_from(&request.bcc);
    draft.attachments = attachment_infos(grant_id, &request.attachments);
    draft.date = Some(Utc::now());
}

/// The message a sent draft becomes.
pub(crate) fn message_from_draft(draft: &Draft) -> Message {
    Message {
        id: draft.id.clone(),
        grant_id: draft.grant_id.clone(),
        thread_id: draft.thread_id.clone(),
        subject: draft.subject.clone(),
        to: draft.to.clone(),
        cc: draft.cc.clone(),
        bcc: draft.bcc.clone(),
        date: Some(Utc::now()),
        body: draft.body.clone(),
        folders: vec!["SENT".to_string()],
        attachments: draft.attachments.clone(),
        ..Message::default()
    }
}

pub(crate) fn apply_folder(folder: &mut Folder, request: &FolderRequest) {
    set(&mut folder.name, request.name.as_ref());
    set_opt(&mut folder.parent_id, request.parent_id.as_ref());
    set_opt(&mut folder.background_color, request.background_color.as_ref());
    set_opt(&mut folder.text_color, request.text_color.as_ref());
}

pub(crate) fn apply_contact(contact: &mut Contact, request: &ContactRequest) {
    set(&mut contact.given_name, request.given_name.as_ref());
    set(&mut contact.surname, request.surname.as_ref());
    set_opt(&mut contact.nickname, request.nickname.as_ref());
    set_opt(&mut contact.company_name, request.company_name.as_ref());
    set_opt(&mut contact.job_title, request.job_title.as_ref());
    set_opt(&mut contact.notes, request.notes.as_ref());
    if !request.emails.is_empty() {
        contact.emails.clone_from(&request.emails);
    }
    if !request.phone_numbers.is_empty() {
        contact.phone_numbers.clone_from(&request.phone_numbers);
    }
}

pub(crate) fn apply_calendar(calendar: &mut Calendar, request: &CalendarRequest) {
    set(&mut calendar.name, request.name.as_ref());
    set_opt(&mut calendar.description, request.description.as_ref());
    set_opt(&mut calendar.location, request.location.as_ref());
    set_opt(&mut calendar.timezone, request.timezone.as_ref());
}

pub(crate) fn apply_event(event: &mut Event, request: &EventRequest) {
    set(&mut event.title, request.title.as_ref());
    set_opt(&mut event.description, request.description.as_ref());
    set_opt(&mut event.location, request.location.as_ref());
    set(&mut event.busy, request.busy.as_ref());
    set(&mut event.when, request.when.as_ref());
    if !request.participants.is_empty() {
        event.participants.clone_from(&request.participants);
    }
    if event.status.is_empty() {
        event.status = "confirmed".to_string();
    }
}

pub(crate) fn apply_configuration(
    configuration: &mut SchedulerConfiguration,
    request: &SchedulerConfigurationRequest,
) {
    set(&mut configuration.name, request.name.as_ref());
    set_opt(&mut configuration.slug, request.slug.as_ref());
    set(
        &mut configuration.requires_session_auth,
        request.requires_session_auth.as_ref(),
    );
    set_opt(&mut configuration.availability, request.availability.as_ref());
    set_opt(&mut configuration.event_booking, request.event_booking.as_ref());
    if !request.participants.is_empty() {
        configuration.participants.clone_from(&request.participants);
    }
}

pub(crate) fn connector(request: &ConnectorRequest) -> Connector {
    Connector {
        provider: request.provider.clone(),
        settings: request.settings.clone(),
        scope: request.scope.clone(),
    }
}

pub(crate) fn apply_webhook(webhook: &mut Webhook, request: &WebhookRequest) {
    set_opt(&mut webhook.description, request.description.as_ref());
    set(&mut webhook.webhook_url, request.webhook_url.as_ref());
    if !request.trigger_types.is_empty() {
        webhook.trigger_types.clone_from(&request.trigger_types);
    }
    if !request.notification_email_addresses.is_empty() {
        webhook
            .notification_email_addresses
            .clone_from(&request.notification_email_addresses);
    }
    if webhook.status.is_empty() {
        webhook.status = "active".to_string();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attachment_infos_skip_empty() {
        let infos = attachment_infos(
            "g",
            &[
                OutgoingAttachment::new("empty.txt", Vec::new()),
                OutgoingAttachment::new("a.pdf", b"pdf".to_vec()).with_content_type("application/pdf"),
                OutgoingAttachment::new("b.bin", b"bin".to_vec()),
            ],
        );
        assert_eq!(infos.len(), 2);
        assert_eq!(infos[0].id, "att-0");
        assert_eq!(infos[0].content_type, "application/pdf");
        assert_eq!(infos[1].content_type, "application/octet-stream");
        assert_eq!(infos[1].size, 3);
    }

    #[test]
    fn test_apply_keeps_unset_fields() {
        let mut folder = Folder {
            id: "f".into(),
            name: "Old".into(),
            text_color: Some("#000".into()),
            ..Folder::default()
        };
        apply_folder(&mut folder, &FolderRequest::named("New"));
        assert_eq!(folder.name, "New");
        assert_eq!(folder.text_color.as_deref(), Some("#000"));
    }
}
