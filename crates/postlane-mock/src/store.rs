//! In-memory record tables backing the mock and demo clients.

use bytes::Bytes;
use postlane::{
    Application, AttachmentInfo, Calendar, Connector, Contact, ContactGroup, Draft, Error, Event,
    Folder, Grant, Identified, Message, Page, Result, ScheduledMessage, SchedulerConfiguration,
    Thread, TokenResponse, Webhook,
};
use std::collections::HashMap;

/// Records served by a [`MockClient`](crate::MockClient).
///
/// Lookups match on id alone; the grant id passed to an operation is only
/// recorded in the call log and stamped on created records.
#[derive(Debug, Clone, Default)]
pub struct Fixtures {
    /// Messages, including ones sent through the mock.
    pub messages: Vec<Message>,
    /// Scheduled sends.
    pub scheduled_messages: Vec<ScheduledMessage>,
    /// Threads.
    pub threads: Vec<Thread>,
    /// Drafts.
    pub drafts: Vec<Draft>,
    /// Folders.
    pub folders: Vec<Folder>,
    /// Attachment metadata.
    pub attachments: Vec<AttachmentInfo>,
    /// Attachment bytes keyed by attachment id.
    pub attachment_content: HashMap<String, Bytes>,
    /// Contacts.
    pub contacts: Vec<Contact>,
    /// Contact groups.
    pub contact_groups: Vec<ContactGroup>,
    /// Calendars.
    pub calendars: Vec<Calendar>,
    /// Events of every calendar.
    pub events: Vec<Event>,
    /// Scheduler configurations.
    pub scheduler_configurations: Vec<SchedulerConfiguration>,
    /// Grants.
    pub grants: Vec<Grant>,
    /// Application details.
    pub application: Application,
    /// Provider connectors.
    pub connectors: Vec<Connector>,
    /// Webhooks.
    pub webhooks: Vec<Webhook>,
    /// Returned by every code exchange.
    pub token: TokenResponse,
}

impl Fixtures {
    /// Empty fixtures.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds messages.
    #[must_use]
    pub fn with_messages(mut self, messages: impl IntoIterator<Item = Message>) -> Self {
        self.messages.extend(messages);
        self
    }

    /// Adds folders.
    #[must_use]
    pub fn with_folders(mut self, folders: impl IntoIterator<Item = Folder>) -> Self {
        self.folders.extend(folders);
        self
    }

    /// Adds contacts.
    #[must_use]
    pub fn with_contacts(mut self, contacts: impl IntoIterator<Item = Contact>) -> Self {
        self.contacts.extend(contacts);
        self
    }

    /// Adds calendars.
    #[must_use]
    pub fn with_calendars(mut self, calendars: impl IntoIterator<Item = Calendar>) -> Self {
        self.calendars.extend(calendars);
        self
    }

    /// Adds events.
    #[must_use]
    pub fn with_events(mut self, events: impl IntoIterator<Item = Event>) -> Self {
        self.events.extend(events);
        self
    }

    /// Adds an attachment and its content.
    #[must_use]
    pub fn with_attachment(mut self, info: AttachmentInfo, content: impl Into<Bytes>) -> Self {
        self.attachment_content.insert(info.id.clone(), content.into());
        self.attachments.push(info);
        self
    }
}

/// Looks up the record keyed `id`.
pub(crate) fn find<'a, T>(rows: &'a [T], key: fn(&T) -> &str, resource: &'static str, id: &str) -> Result<&'a T> {
    rows.iter()
        .find(|row| key(row) == id)
        .ok_or_else(|| Error::not_found(resource, id))
}

/// Mutable variant of [`find`].
pub(crate) fn find_mut<'a, T>(
    rows: &'a mut [T],
    key: fn(&T) -> &str,
    resource: &'static str,
    id: &str,
) -> Result<&'a mut T> {
    rows.iter_mut()
        .find(|row| key(row) == id)
        .ok_or_else(|| Error::not_found(resource, id))
}

/// Removes the record keyed `id`.
pub(crate) fn remove<T>(rows: &mut Vec<T>, key: fn(&T) -> &str, resource: &'static str, id: &str) -> Result<()> {
    let before = rows.len();
    rows.retain(|row| key(row) != id);
    if rows.len() == before {
        return Err(Error::not_found(resource, id));
    }
    Ok(())
}

/// One page of `rows` honoring `limit`. Listings never continue.
pub(crate) fn page<T>(rows: impl IntoIterator<Item = T>, limit: Option<u32>) -> Page<T> {
    let limit = limit.map_or(usize::MAX, |l| l as usize);
    Page::single(rows.into_iter().take(limit).collect())
}

pub(crate) fn by_id<T: Identified>(row: &T) -> &str {
    row.id()
}

pub(crate) fn by_schedule_id(row: &ScheduledMessage) -> &str {
    &row.schedule_id
}

pub(crate) fn by_provider(row: &Connector) -> &str {
    &row.provider
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn folder(id: &str) -> Folder {
        Folder {
            id: id.into(),
            name: id.to_uppercase(),
            ..Folder::default()
        }
    }

    #[test]
    fn test_find_and_remove() {
        let mut rows = vec![folder("a"), folder("b")];
        assert_eq!(find(&rows, by_id, "folder", "b").unwrap().name, "B");
        assert!(find(&rows, by_id, "folder", "c").unwrap_err().is_not_found());

        remove(&mut rows, by_id, "folder", "a").unwrap();
        assert_eq!(rows.len(), 1);
        let err = remove(&mut rows, by_id, "folder", "a").unwrap_err();
        assert_eq!(err.to_string(), "folder not found: a");
    }

    #[test]
    fn test_page_limit() {
        let rows = vec![folder("a"), folder("b"), folder("c")];
        assert_eq!(page(rows.clone(), Some(2)).len(), 2);
        let all = page(rows, None);
        assert_eq!(all.len(), 3);
        assert!(!all.has_more());
    }
}
