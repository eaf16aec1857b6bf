//! Element model: typed spans and the behaviors attached to them.
//!
//! An [`Element`] is one classified slice of the original text. It carries its
//! exact raw substring and char/line spans, a kind (block or spacer), the
//! subtype name its pattern declared, and a [`BlockBehavior`] strategy object
//! resolved through the [`ElementRegistry`](crate::ElementRegistry).
//!
//! Behaviors cover the small capability set elements are polymorphic over:
//!
//! - produce a human-readable name,
//! - split the raw text into a `(name, header, body)` triple,
//! - produce structured data (with a raw-text fallback when no extractor is
//!   implemented),
//! - render a plain display form.
//!
//! Look-alike "block with a standard header" formats share one
//! [`HeaderSplitter`] capability object parameterized by a boundary regex,
//! attached to otherwise flat behaviors, instead of an inheritance chain.

use std::fmt;
use std::sync::Arc;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::data::ExtractedData;
use crate::{CharSpan, ElementKind, LineSpan};

/// The `(name, header, body)` triple of a structured block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockParts {
    pub name: String,
    pub header: Option<String>,
    pub body: String,
}

/// Behavior attached to a subtype: naming, splitting, extraction, display.
pub trait BlockBehavior: Send + Sync {
    /// Split the raw text into name/header/body. The default treats the whole
    /// text as a headerless body named by [`fallback_name`].
    fn parts(&self, raw: &str) -> BlockParts {
        BlockParts { name: fallback_name(raw), header: None, body: raw.to_string() }
    }

    fn readable_name(&self, raw: &str) -> String {
        self.parts(raw).name
    }

    /// Produce structured data from the raw text.
    ///
    /// The default is the documented fallback: the raw text under a
    /// `"raw data"` key, annotated with a warning comment.
    fn extract(&self, raw: &str) -> ExtractedData {
        tracing::warn!(target: "chemsect", "no extraction procedure implemented, returning raw data");
        ExtractedData::raw_fallback(raw)
    }

    /// Render a plain display form of the element.
    fn display(&self, element: &Element) -> String {
        let lines = element.line_span();
        format!(
            "[{} {} lines {}-{}]\n{}",
            element.kind().name(),
            element.subtype(),
            lines.start,
            lines.end,
            element.raw()
        )
    }
}

/// One classified, immutable span of the original text.
#[derive(Clone)]
pub struct Element {
    kind: ElementKind,
    subtype: String,
    raw: String,
    char_span: CharSpan,
    line_span: LineSpan,
    behavior: Arc<dyn BlockBehavior>,
}

impl Element {
    pub(crate) fn new(
        kind: ElementKind,
        subtype: impl Into<String>,
        raw: impl Into<String>,
        char_span: CharSpan,
        line_span: LineSpan,
        behavior: Arc<dyn BlockBehavior>,
    ) -> Self {
        Element { kind, subtype: subtype.into(), raw: raw.into(), char_span, line_span, behavior }
    }

    pub fn kind(&self) -> ElementKind {
        self.kind
    }

    pub fn is_block(&self) -> bool {
        self.kind == ElementKind::Block
    }

    pub fn is_spacer(&self) -> bool {
        self.kind == ElementKind::Spacer
    }

    /// The subtype the matching pattern declared (kept even when the registry
    /// had no behavior for it).
    pub fn subtype(&self) -> &str {
        &self.subtype
    }

    /// The exact substring matched, byte-for-byte.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn char_span(&self) -> CharSpan {
        self.char_span
    }

    pub fn line_span(&self) -> LineSpan {
        self.line_span
    }

    pub fn readable_name(&self) -> String {
        match self.kind {
            ElementKind::Spacer => "Spacer".to_string(),
            ElementKind::Block => self.behavior.readable_name(&self.raw),
        }
    }

    pub fn parts(&self) -> BlockParts {
        self.behavior.parts(&self.raw)
    }

    /// Structured data for blocks; spacers carry none.
    pub fn data(&self) -> Option<ExtractedData> {
        match self.kind {
            ElementKind::Spacer => None,
            ElementKind::Block => Some(self.behavior.extract(&self.raw)),
        }
    }

    pub fn display(&self) -> String {
        self.behavior.display(self)
    }
}

impl fmt::Debug for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Element")
            .field("kind", &self.kind)
            .field("subtype", &self.subtype)
            .field("char_span", &self.char_span)
            .field("line_span", &self.line_span)
            .field("raw", &self.raw)
            .finish()
    }
}

impl PartialEq for Element {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind
            && self.subtype == other.subtype
            && self.raw == other.raw
            && self.char_span == other.char_span
            && self.line_span == other.line_span
    }
}

// --- Shared behaviors ---------------------------------------------------------

struct GenericBlock;

impl BlockBehavior for GenericBlock {}

struct SpacerBehavior;

impl BlockBehavior for SpacerBehavior {
    fn parts(&self, raw: &str) -> BlockParts {
        BlockParts { name: "Spacer".to_string(), header: None, body: raw.to_string() }
    }

    fn display(&self, element: &Element) -> String {
        let lines = element.line_span();
        format!("[Spacer lines {}-{}]", lines.start, lines.end)
    }
}

/// Fallback for text no pattern recognized.
struct UnknownBlock;

impl BlockBehavior for UnknownBlock {
    fn extract(&self, raw: &str) -> ExtractedData {
        tracing::warn!(target: "chemsect", "the block looks unstructured, returning raw data");
        ExtractedData::new(
            "No procedure for analyzing the data found; furthermore, the block looks \
             unstructured. `raw data` collected.",
        )
        .with_value("raw data", raw)
    }
}

static GENERIC_BLOCK: Lazy<Arc<dyn BlockBehavior>> = Lazy::new(|| Arc::new(GenericBlock));
static SPACER: Lazy<Arc<dyn BlockBehavior>> = Lazy::new(|| Arc::new(SpacerBehavior));
static UNKNOWN_BLOCK: Lazy<Arc<dyn BlockBehavior>> = Lazy::new(|| Arc::new(UnknownBlock));

/// The generic block behavior used when a subtype is unregistered.
pub(crate) fn generic_block() -> Arc<dyn BlockBehavior> {
    Arc::clone(&GENERIC_BLOCK)
}

/// The spacer behavior.
pub(crate) fn spacer() -> Arc<dyn BlockBehavior> {
    Arc::clone(&SPACER)
}

/// The behavior of the fallback unknown block.
pub(crate) fn unknown_block() -> Arc<dyn BlockBehavior> {
    Arc::clone(&UNKNOWN_BLOCK)
}

/// Subtype name given to leftover text wrapped after the final pattern pass.
pub(crate) const UNKNOWN_SUBTYPE: &str = "BlockUnknown";

// --- Header splitting ---------------------------------------------------------

/// Splits a block into header and body at a delimiter-line boundary.
///
/// The boundary regex must match at the start of the block and its group 1
/// must cover the full header region (delimiters included); everything after
/// group 1 is the body. Shared by every "standard header" block shape, with
/// the delimiter pattern as the only parameter.
#[derive(Clone)]
pub struct HeaderSplitter {
    boundary: &'static Regex,
}

impl HeaderSplitter {
    pub fn new(boundary: &'static Regex) -> Self {
        HeaderSplitter { boundary }
    }

    /// Header boxed in delimiter lines of `-*#=` characters:
    ///
    /// ```text
    /// -----------------
    /// ORBITAL ENERGIES
    /// -----------------
    /// body...
    /// ```
    pub fn boxed() -> Self {
        HeaderSplitter::new(regex!(
            r"(?s)^(([ \t]*[-*#=]{5,}[ \t]*\n)(.*?)(\n[ \t]*[-*#=]{5,}[ \t]*\n|$))"
        ))
    }

    /// A single header line underlined by a delimiter line:
    ///
    /// ```text
    /// HEADER
    /// -----
    /// body...
    /// ```
    pub fn underlined() -> Self {
        HeaderSplitter::new(regex!(r"^((.*\n)([ \t]*[-*#=]{3,}[ \t]*\n))"))
    }

    /// Split `raw` into `(header, body)`, or `None` when the boundary does
    /// not match at the start.
    pub fn split(&self, raw: &str) -> Option<(String, String)> {
        let caps = self.boundary.captures(raw)?;
        let header_end = caps.get(1)?.end();
        Some((raw[..header_end].to_string(), raw[header_end..].to_string()))
    }

    /// Derive a readable name from the header's non-delimiter lines.
    pub fn readable_name(&self, header: &str, raw: &str) -> String {
        let mut readable = Vec::new();
        for line in header.split('\n') {
            if regex!(r"^[ \t]*[-*#=]*[ \t]*$").is_match(line) {
                continue;
            }
            if let Some(caps) =
                regex!(r"^[ \t]*[-*#=]?[ \t]*(.*?)[ \t]*[-*#=]?[ \t]*$").captures(line)
            {
                let central = caps.get(1).map(|m| m.as_str().trim()).unwrap_or("");
                if !central.is_empty() {
                    readable.push(central);
                }
            }
        }
        let name = readable.join(" ");
        if name.len() < 2 {
            tracing::warn!(target: "chemsect", "no readable name found in header");
            fallback_name(raw)
        } else {
            name
        }
    }
}

/// A block whose text begins with a recognizable header region.
///
/// The behavior for every "standard header" block shape: attach it with the
/// splitter matching the mode's delimiter convention.
pub struct StandardHeaderBlock {
    splitter: HeaderSplitter,
}

impl StandardHeaderBlock {
    pub fn new(splitter: HeaderSplitter) -> Self {
        StandardHeaderBlock { splitter }
    }
}

impl BlockBehavior for StandardHeaderBlock {
    fn parts(&self, raw: &str) -> BlockParts {
        match self.splitter.split(raw) {
            Some((header, body)) => BlockParts {
                name: self.splitter.readable_name(&header, raw),
                header: Some(header),
                body,
            },
            None => {
                tracing::warn!(target: "chemsect", "no header found in a block extracted as headed");
                BlockParts { name: fallback_name(raw), header: None, body: raw.to_string() }
            }
        }
    }
}

/// Derive a display name from text that has no better one.
///
/// Text without letters becomes `Unknown: ` plus its squeezed leading
/// characters; otherwise letters and spaces are kept, whitespace is collapsed,
/// and the result is truncated.
pub(crate) fn fallback_name(raw: &str) -> String {
    if !raw.chars().any(char::is_alphabetic) {
        let cleaned: String = raw.chars().filter(|c| !c.is_whitespace()).collect();
        let truncated: String = cleaned.chars().take(21).collect();
        let suffix = if cleaned.chars().count() > 21 { "..." } else { "" };
        return format!("Unknown: {truncated}{suffix}");
    }
    let cleaned: String =
        raw.chars().filter(|c| c.is_alphabetic() || c.is_whitespace()).collect();
    let squashed = regex!(r"\s+").replace_all(cleaned.trim(), " ").into_owned();
    let truncated: String = squashed.chars().take(30).collect();
    let suffix = if squashed.chars().count() > 30 { "..." } else { "" };
    format!("{truncated}{suffix}")
}
