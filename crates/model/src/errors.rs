use thiserror::Error;

#[derive(Error, Debug)]
pub enum KarmaError {
    #[error("Auth rejected with status {status}")]
    Auth { status: u16 },
    #[error("Transport failure: status {status} on {context}")]
    Transport { status: u16, context: &'static str },
    #[error("Malformed payload: {0}")]
    Data(String),
    #[error("Chart rendering failed: {0}")]
    Render(String),
    #[error("Image upload rejected with status {status}")]
    Upload { status: u16 },
}
