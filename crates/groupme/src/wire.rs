use model::Message;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub(crate) struct HistoryEnvelope {
    pub response: Option<HistoryResponse>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct HistoryResponse {
    pub messages: Vec<Message>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct UploadEnvelope {
    pub payload: Option<UploadPayload>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct UploadPayload {
    pub picture_url: Option<String>,
}
