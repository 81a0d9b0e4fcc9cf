use thiserror::Error;

pub type BrainrotResult<T> = Result<T, BrainrotError>;

#[derive(Error, Debug)]
pub enum BrainrotError {
    /// Response was non-empty but unusable as a transcript. Recovered by retrying.
    #[error("Transcript parse failure: {0}")]
    TranscriptParse(String),

    #[error("Failed to generate valid transcript after {attempts} attempts for topic: {topic}")]
    GenerationExhausted { topic: String, attempts: u32 },

    #[error("Synthesis failed for turn {index} ({speaker}): {reason}")]
    Synthesis {
        index: usize,
        speaker: String,
        reason: String,
    },

    #[error("Cannot assemble a manifest from an empty dialogue")]
    EmptyDialogue,

    #[error("Status report failed: {0}")]
    StatusReport(String),

    #[error("Request error: {0}")]
    Request(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<reqwest::Error> for BrainrotError {
    fn from(e: reqwest::Error) -> Self {
        BrainrotError::Request(e.to_string())
    }
}
