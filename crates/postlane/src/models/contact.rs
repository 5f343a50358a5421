//! Contacts and contact groups.

use serde::{Deserialize, Serialize};

/// An address-book entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    /// Contact id.
    #[serde(default)]
    pub id: String,
    /// Owning grant.
    #[serde(default)]
    pub grant_id: String,
    /// First name.
    #[serde(default)]
    pub given_name: String,
    /// Last name.
    #[serde(default)]
    pub surname: String,
    /// Nickname.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nickname: Option<String>,
    /// Employer.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company_name: Option<String>,
    /// Role at the employer.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job_title: Option<String>,
    /// Email addresses.
    #[serde(default)]
    pub emails: Vec<ContactEmail>,
    /// Phone numbers.
    #[serde(default)]
    pub phone_numbers: Vec<PhoneNumber>,
    /// Free-form notes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    /// Group memberships.
    #[serde(default)]
    pub groups: Vec<ContactGroupRef>,
}

/// A typed contact email.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactEmail {
    /// Address.
    #[serde(default)]
    pub email: String,
    /// Kind, e.g. `work`.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
}

/// A typed phone number.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhoneNumber {
    /// Number as entered.
    #[serde(default)]
    pub number: String,
    /// Kind, e.g. `mobile`.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
}

/// Reference to a contact group.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactGroupRef {
    /// Group id.
    #[serde(default)]
    pub id: String,
}

/// A contact group.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactGroup {
    /// Group id.
    #[serde(default)]
    pub id: String,
    /// Owning grant.
    #[serde(default)]
    pub grant_id: String,
    /// Display name.
    #[serde(default)]
    pub name: String,
    /// `system` or `user`.
    #[serde(default)]
    pub group_type: String,
    /// Hierarchical path, where supported.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

super::common::identified!(Contact, ContactGroup);

/// Filters for listing contacts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ContactQuery {
    /// Page size.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    /// Cursor from a previous page.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_token: Option<String>,
    /// Email filter.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// `address_book`, `domain` or `inbox`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    /// Group id filter.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
}

/// Fields for creating or replacing a contact.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ContactRequest {
    /// First name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub given_name: Option<String>,
    /// Last name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub surname: Option<String>,
    /// Nickname.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nickname: Option<String>,
    /// Employer.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company_name: Option<String>,
    /// Role at the employer.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_title: Option<String>,
    /// Email addresses.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub emails: Vec<ContactEmail>,
    /// Phone numbers.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub phone_numbers: Vec<PhoneNumber>,
    /// Free-form notes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}
