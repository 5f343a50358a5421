//! Domain records exchanged with the API.
//!
//! These are plain data carriers. Request types serialize with absent
//! optional fields omitted; response types default every field the upstream
//! may leave out.

mod admin;
mod attachment;
mod auth;
mod calendar;
mod common;
mod contact;
mod draft;
mod folder;
mod message;
mod scheduling;
mod thread;

pub use admin::{
    Application, Branding, Connector, ConnectorRequest, Grant, GrantQuery, Webhook,
    WebhookRequest,
};
pub use attachment::{AttachmentInfo, OutgoingAttachment, StreamedAttachment};
pub use auth::{CodeExchangeRequest, TokenResponse};
pub use calendar::{
    Calendar, CalendarRequest, Event, EventParticipant, EventQuery, EventRequest, EventWhen,
};
pub use common::{EmailParticipant, ListQuery};
pub use contact::{
    Contact, ContactEmail, ContactGroup, ContactGroupRef, ContactQuery, ContactRequest,
    PhoneNumber,
};
pub use draft::{Draft, DraftRequest};
pub use folder::{Folder, FolderRequest, SYSTEM_FOLDER_MARKER};
pub use message::{
    Message, MessageQuery, ScheduledMessage, SendMessageRequest, UpdateMessageRequest,
};
pub use scheduling::{
    Availability, EventBooking, SchedulerConfiguration, SchedulerConfigurationRequest,
    SchedulerParticipant,
};
pub use thread::{Thread, ThreadQuery, UpdateThreadRequest};
