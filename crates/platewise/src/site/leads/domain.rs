use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Which marketing form produced a lead. Unknown values are rejected
/// at the deserialization boundary; an absent field means a plain
/// contact request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FormType {
    Demo,
    #[default]
    Contact,
    Trial,
    Newsletter,
}

impl FormType {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Demo => "demo",
            Self::Contact => "contact",
            Self::Trial => "trial",
            Self::Newsletter => "newsletter",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "demo" => Some(Self::Demo),
            "contact" => Some(Self::Contact),
            "trial" => Some(Self::Trial),
            "newsletter" => Some(Self::Newsletter),
            _ => None,
        }
    }
}

/// Raw payload from the public form endpoint. Required strings default
/// to empty so the validator can report every missing field at once.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeadSubmission {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub company: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub form_type: FormType,
    #[serde(default)]
    pub message: Option<String>,
}

/// Validated, normalized lead ready to persist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewLead {
    pub name: String,
    pub email: String,
    pub company: Option<String>,
    pub phone: Option<String>,
    pub form_type: FormType,
    pub message: Option<String>,
    pub source_page: String,
}

/// Stored lead row, as exposed to the admin listing.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LeadRecord {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub company: Option<String>,
    pub phone: Option<String>,
    pub form_type: FormType,
    pub message: Option<String>,
    pub source_page: String,
    pub created_at: NaiveDateTime,
}

/// Identifier handed back to the submitting client.
#[derive(Debug, Clone, Serialize)]
pub struct LeadReceipt {
    pub id: i64,
}
