use chrono::{DateTime, Utc};

use crate::{errors::KarmaError, message::Message};

/// One message projected to the canonical column set, with derived fields.
#[derive(Debug, Clone)]
pub struct MessageRow {
    pub id: String,
    pub name: String,
    pub sender_id: String,
    pub text: String,
    /// Duplicate of the sender identifier, tolerated from the source shape.
    pub user_id: String,
    pub timestamp: DateTime<Utc>,
    pub total_likes: u64,
    /// Retained for the pairwise aggregate; already self-like-filtered
    /// when suppression was requested at build time.
    pub favorited_by: Vec<String>,
}

/// Message rows sorted by timestamp descending. Built once per pipeline
/// run and discarded after aggregation.
#[derive(Debug, Default)]
pub struct MessageTable {
    rows: Vec<MessageRow>,
}

impl MessageTable {
    pub fn build(
        messages: Vec<Message>,
        suppress_self_likes: bool,
    ) -> Result<MessageTable, KarmaError> {
        let mut rows = Vec::with_capacity(messages.len());
        for mut msg in messages {
            if suppress_self_likes {
                msg.remove_self_likes();
            }
            let timestamp = DateTime::from_timestamp(msg.created_at, 0).ok_or_else(|| {
                KarmaError::Data(format!(
                    "message {}: created_at {} is out of range",
                    msg.id, msg.created_at
                ))
            })?;
            rows.push(MessageRow {
                timestamp,
                total_likes: msg.favorited_by.len() as u64,
                id: msg.id,
                name: msg.name,
                sender_id: msg.sender_id,
                text: msg.text.unwrap_or_default(),
                user_id: msg.user_id,
                favorited_by: msg.favorited_by,
            });
        }
        rows.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        Ok(MessageTable { rows })
    }

    pub fn rows(&self) -> &[MessageRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Minimum timestamp over all rows, the last row under the sort invariant.
    pub fn oldest_timestamp(&self) -> Option<DateTime<Utc>> {
        self.rows.last().map(|row| row.timestamp)
    }
}
