use serde::Deserialize;

/// One chat event as the history endpoint delivers it. Read-only to us.
#[derive(Debug, Clone, Deserialize)]
pub struct Message {
    pub id: String,
    /// Sender display name at the time the message was posted.
    #[serde(default)]
    pub name: String,
    pub sender_id: String,
    pub user_id: String,
    /// Null for attachment-only messages.
    #[serde(default)]
    pub text: Option<String>,
    /// Epoch seconds.
    pub created_at: i64,
    #[serde(default)]
    pub favorited_by: Vec<String>,
}

impl Message {
    pub fn remove_self_likes(&mut self) {
        let user_id = &self.user_id;
        self.favorited_by.retain(|usr| usr != user_id);
    }
}
