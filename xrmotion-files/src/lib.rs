use thiserror::Error;

#[derive(Error, Debug)]
pub enum ParserError {
    #[error("Unexpected end of data at offset {offset} (wanted {wanted} more bytes)")]
    UnexpectedEof { offset: usize, wanted: usize },

    #[error("Chunk 0x{id:x} at offset {offset} declares {declared} bytes, but only {remaining} remain")]
    TruncatedChunk {
        offset: usize,
        id: u32,
        declared: u32,
        remaining: usize,
    },

    #[error("Missing mandatory chunk 0x{id:x}")]
    MissingChunk { id: u32 },

    #[error("Unknown keyframe shape {value} at offset {offset}")]
    BadShape { value: u32, offset: usize },

    #[error("Unknown envelope behavior {value} at offset {offset}")]
    BadBehavior { value: u32, offset: usize },

    #[error("Unsupported format version {version}")]
    UnsupportedVersion { version: u32 },

    /// The buffer ended before the string's NUL terminator. `partial` holds what could be read.
    #[error("String at offset {offset} is missing its NUL terminator")]
    UnterminatedString { offset: usize, partial: String },

    #[error("String at offset {offset} is not valid UTF-8")]
    InvalidString {
        offset: usize,
        source: std::string::FromUtf8Error,
    },

    /// A value does not fit into the field width of the selected format version.
    #[error("{what} of {value} does not fit into the target field")]
    Overflow { what: &'static str, value: usize },

    #[error("The file is violating the expected format, because: {reason}")]
    FormatError { reason: &'static str },

    #[error("{context}: {source}")]
    Context {
        context: String,
        source: Box<ParserError>,
    },
}

impl ParserError {
    /// Strips all [`ParserError::Context`] layers, returning the error that actually happened.
    pub fn root_cause(&self) -> &ParserError {
        match self {
            ParserError::Context { source, .. } => source.root_cause(),
            err => err,
        }
    }
}

/// Errors that were downgraded during decoding. Decoding continued with a substituted value.
#[derive(Error, Debug)]
pub enum Warning {
    #[error("{context}: recovered from: {error}")]
    Recovered {
        context: String,
        #[source]
        error: ParserError,
    },

    #[error("{context}: start behavior {start} differs from end behavior {end}, using the start behavior")]
    BehaviorMismatch { context: String, start: u32, end: u32 },

    #[error("Skipped unknown chunk 0x{id:x} at offset {offset}")]
    UnknownChunk { id: u32, offset: usize },

    #[error("Key {index} uses the unsupported interpolation '{mode}', exporting it as TCB")]
    UnsupportedInterpolation { index: usize, mode: String },
}

pub mod common;
pub mod envelope;
pub mod motion;
