use fraction::Fraction;
use thiserror;

#[derive(Debug, thiserror::Error)]
pub enum ScoreError {
    #[error(
        "Duration length of {length} does not resolve to a single note \
        type with {max_dots} dots or fewer"
    )]
    UnrepresentableDuration { length: Fraction, max_dots: u8 },
    #[error("Bad divisor: {0}. Expected a power of two from 1 to 1024")]
    InvalidDivisor(u64),
    #[error("Malformed tuplet ratio: {0}")]
    MalformedTuplet(String),
    #[error("Invalid content: {0}")]
    InvalidContent(String),
    #[error("Pitch string not understood: `{0}`")]
    InvalidPitch(String),
    #[error("Duration string not understood: `{0}`")]
    InvalidDuration(String),
    #[error("Clef not understood: `{0}`")]
    UnknownClef(String),
    #[error("Barline type not understood: `{0}`")]
    UnknownBarline(String),
    #[error("Notehead not understood: `{0}`")]
    UnknownNotehead(String),
    #[error("Contents of length {length} do not fit into {desired}")]
    LengthOverflow { length: Fraction, desired: Fraction },
    #[error("Remaining length {0} cannot be filled without tuplets")]
    RemainingLengthNeedsTuplet(Fraction),
    #[error(transparent)]
    Xml(#[from] quick_xml::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Utf8(#[from] std::string::FromUtf8Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}
pub type ScoreResult<T> = Result<T, ScoreError>;
