//! Error taxonomy.
//!
//! Two levels, with deliberately different propagation policies:
//!
//! - [`ConfigurationError`]: a malformed or internally inconsistent pattern
//!   catalog (unknown option, dangling order reference, pattern that does not
//!   compile, unsupported mode). Always fatal at load time, before any text
//!   is processed.
//! - [`RecognitionWarning`]: a degradation *during* segmentation. These are
//!   collected as values on the [`Segmentation`](crate::Segmentation) result
//!   (and mirrored through `tracing::warn!`), never raised: the engine always
//!   terminates with a fully classified, order-preserving element list for
//!   any input text, however unfamiliar.
//!
//! A pattern matching zero times is not an error at either level.

use std::path::PathBuf;

/// Fatal catalog/mode configuration problems, surfaced before segmentation.
#[derive(Debug, thiserror::Error)]
pub enum ConfigurationError {
    #[error("unknown matching option `{0}` (expected IGNORECASE, MULTILINE, DOTALL, UNICODE or VERBOSE)")]
    UnknownOption(String),

    #[error("item `{0}` listed in `order` but not defined")]
    DanglingOrderRef(String),

    #[error("blueprint anchor `{0}` listed in `order` but missing from `anchor_texts`")]
    MissingAnchorText(String),

    #[error("invalid pattern for `{subtype}`: {source}")]
    InvalidPattern {
        subtype: String,
        #[source]
        source: Box<regex::Error>,
    },

    #[error("pattern for `{0}` has no capturing group (group 1 must equal the full match)")]
    MissingCaptureGroup(String),

    #[error("catalog entry `{0}` already exists")]
    DuplicateEntry(String),

    #[error("element subtype `{0}` is already registered")]
    DuplicateSubtype(String),

    #[error("mode `{0}` is not recognized (expected ORCA, GPAW or VASP)")]
    UnsupportedMode(String),

    #[error("malformed catalog: {0}")]
    MalformedCatalog(String),

    #[error("failed to read `{}`", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// A non-fatal recognition problem recorded while segmenting.
///
/// Warnings are plain values so that a run's output stays a pure function of
/// its inputs plus this list; they are additionally mirrored to `tracing`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RecognitionWarning {
    /// A pattern's subtype had no registered behavior; the element was built
    /// with the generic fallback behavior instead.
    #[error("subtype `{subtype}` is not registered, falling back to a generic {kind} (char {char_start})")]
    UnknownSubtype {
        subtype: String,
        kind: &'static str,
        char_start: usize,
    },

    /// A match whose first capturing group did not equal the full match. The
    /// match was rejected and its text left for later patterns.
    #[error("pattern `{subtype}`: capture group 1 differs from the full match at char {char_start}; match rejected")]
    GroupMismatch { subtype: String, char_start: usize },

    /// A block behavior without a data extractor returned the raw text.
    #[error("no extraction procedure for `{subtype}`, returning raw data")]
    ExtractionFallback { subtype: String },
}

impl RecognitionWarning {
    /// Mirror the warning into the `tracing` stream.
    pub(crate) fn emit(&self) {
        tracing::warn!(target: "chemsect", "{self}");
    }
}
