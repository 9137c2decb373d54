use shared::domain::{EntryId, Labels, Role};

/// Only `Trusted` bodies may be injected as HTML.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryBody {
    Labeled { label: String, text: String },
    Trusted(String),
}

impl EntryBody {
    pub fn labeled(label: impl Into<String>, text: impl Into<String>) -> Self {
        Self::Labeled {
            label: label.into(),
            text: text.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranscriptEntry {
    pub role: Role,
    pub body: EntryBody,
    pub temp_id: Option<EntryId>,
}

impl TranscriptEntry {
    pub fn user(labels: &Labels, text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            body: EntryBody::labeled(labels.user, text),
            temp_id: None,
        }
    }

    pub fn thinking(labels: &Labels, id: EntryId) -> Self {
        Self {
            role: Role::Bot,
            body: EntryBody::labeled(labels.bot, labels.thinking),
            temp_id: Some(id),
        }
    }
}

pub fn error_body(labels: &Labels) -> EntryBody {
    EntryBody::labeled(labels.bot, labels.error)
}
