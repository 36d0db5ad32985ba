use std::fmt;

/// Errors produced while building an alphabet, coding text, or packing payloads.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The safety oracle could not be queried while building the charset.
    #[error("charset build unavailable: {0}")]
    BuildUnavailable(String),

    /// Encoded text has a bad length, a character outside the charset, or
    /// a chunk whose value does not fit the byte unit.
    #[error("malformed input: {0}")]
    MalformedInput(String),

    /// A codec invariant did not hold; the tables and layout disagree.
    #[error("internal invariant violated: {0}")]
    InternalInvariantViolation(String),

    #[error("compression failed: {0}")]
    CompressionFailed(String),

    #[error("decompression failed: {0}")]
    DecompressionFailed(String),

    /// Encoded text contains a character that would terminate the
    /// bootstrap's string literal.
    #[error("encoded text contains {found} which the {renderer} bootstrap reserves")]
    TemplateConflict {
        renderer: &'static str,
        found: CodePointDisplay,
    },

    /// Text or an artifact was produced under another charset version,
    /// chunk layout or compression algorithm.
    #[error("version mismatch: expected {expected}, found {found}")]
    VersionMismatch { expected: String, found: String },

    #[error("invalid charset: {0}")]
    InvalidCharset(String),

    #[error("invalid chunk layout: {0}")]
    InvalidLayout(String),

    #[error("the {renderer} bootstrap cannot decompress {algorithm}")]
    UnsupportedCompression {
        renderer: &'static str,
        algorithm: String,
    },

    #[error("configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Stable, kebab-case name of the error kind.
    pub fn kind(&self) -> &'static str {
        match self {
            Error::BuildUnavailable(_) => "build-unavailable",
            Error::MalformedInput(_) => "malformed-input",
            Error::InternalInvariantViolation(_) => "internal-invariant-violation",
            Error::CompressionFailed(_) => "compression-failed",
            Error::DecompressionFailed(_) => "decompression-failed",
            Error::TemplateConflict { .. } => "template-conflict",
            Error::VersionMismatch { .. } => "version-mismatch",
            Error::InvalidCharset(_) => "invalid-charset",
            Error::InvalidLayout(_) => "invalid-layout",
            Error::UnsupportedCompression { .. } => "unsupported-compression",
            Error::Config(_) => "config",
            Error::Io(_) => "io",
        }
    }

    pub(crate) fn malformed(msg: impl Into<String>) -> Self {
        Error::MalformedInput(msg.into())
    }

    pub(crate) fn invariant(msg: impl Into<String>) -> Self {
        Error::InternalInvariantViolation(msg.into())
    }
}

impl From<toml::de::Error> for Error {
    fn from(e: toml::de::Error) -> Self {
        Error::Config(e.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Config(e.to_string())
    }
}

/// Formats a code point as `U+XXXX`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CodePointDisplay(pub u32);

impl fmt::Display for CodePointDisplay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "U+{:04X}", self.0)
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_names() {
        assert_eq!(Error::malformed("x").kind(), "malformed-input");
        assert_eq!(Error::invariant("x").kind(), "internal-invariant-violation");
        let conflict = Error::TemplateConflict {
            renderer: "python",
            found: CodePointDisplay(0x22),
        };
        assert_eq!(conflict.kind(), "template-conflict");
    }

    #[test]
    fn test_template_conflict_display() {
        let err = Error::TemplateConflict {
            renderer: "python",
            found: CodePointDisplay(0x5C),
        };
        let display = err.to_string();
        assert!(display.contains("U+005C"));
        assert!(display.contains("python"));
    }

    #[test]
    fn test_version_mismatch_display() {
        let err = Error::VersionMismatch {
            expected: "63481-aa".to_string(),
            found: "63483-bb".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "version mismatch: expected 63481-aa, found 63483-bb"
        );
    }
}
