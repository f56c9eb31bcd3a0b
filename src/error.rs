use thiserror::Error;

#[derive(Error, Debug)]
pub enum FingerForgeError {
    #[error("IO Error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON Parsing Error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("MIDI Parsing Error: {0}")]
    Midi(#[from] midly::Error),

    #[error("Configuration Error: {0}")]
    Config(String),

    #[error("Data Validation Error: {0}")]
    Validation(String),

    #[error("hand span of {span} semitones exceeds max distance {max}")]
    HandSpan { span: i32, max: i32 },
}

pub type FfResult<T> = Result<T, FingerForgeError>;
