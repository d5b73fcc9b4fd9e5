use serde::{Deserialize, Serialize};

/// Backend-assigned identifier of a pastor message.
pub type MessageId = i64;

/// A pastor message as returned by the backend.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PastorMessage {
    pub id: MessageId,
    pub title: String,
    pub message: String,
    #[serde(default)]
    pub is_active: bool,
}

/// Request body for `POST /pastor-messages` and `PUT /pastor-messages/:id`.
///
/// Doubles as the admin form draft.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct MessageDraft {
    pub title: String,
    pub message: String,
    #[serde(default)]
    pub is_active: bool,
}

impl MessageDraft {
    pub fn new(title: impl Into<String>, message: impl Into<String>, is_active: bool) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
            is_active,
        }
    }

    /// Both title and message are required and must not be blank.
    pub fn is_complete(&self) -> bool {
        !self.title.trim().is_empty() && !self.message.trim().is_empty()
    }
}

impl From<&PastorMessage> for MessageDraft {
    fn from(m: &PastorMessage) -> Self {
        Self {
            title: m.title.clone(),
            message: m.message.clone(),
            is_active: m.is_active,
        }
    }
}

/// Error body: `{ "message": "..." }`.
#[derive(Debug, Default, Deserialize)]
pub struct ErrorBody {
    pub message: Option<String>,
}

/// Create/update responses come either bare or wrapped as `{ message, data }`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum MessageEnvelope {
    Wrapped { data: PastorMessage },
    Bare(PastorMessage),
}

impl MessageEnvelope {
    pub fn into_message(self) -> PastorMessage {
        match self {
            MessageEnvelope::Wrapped { data } => data,
            MessageEnvelope::Bare(m) => m,
        }
    }
}
