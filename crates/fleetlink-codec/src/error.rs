use fleetlink_domain::CallError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CodecError {
    /// Topic or channel segments do not form a valid address.
    #[error("channel translation error: {0}")]
    ChannelTranslation(String),

    /// Body bytes do not parse per the expected per-kind schema. Carries the
    /// original raw bytes for diagnostics.
    #[error("content translation failure for schema {schema}: {reason}")]
    ContentTranslation {
        schema: &'static str,
        reason: String,
        raw: Vec<u8>,
    },
}

impl From<CodecError> for CallError {
    fn from(e: CodecError) -> Self {
        match e {
            CodecError::ChannelTranslation(message) => CallError::ChannelTranslation(message),
            CodecError::ContentTranslation { schema, reason, raw } => {
                CallError::ContentTranslation {
                    schema: schema.to_string(),
                    reason,
                    raw,
                }
            }
        }
    }
}

pub type CodecResult<T> = Result<T, CodecError>;
