extern crate self as chemsect;

#[macro_use]
mod macros;
mod api;
mod catalog;
mod data;
mod elements;
mod engine;
mod error;
mod modes;

pub use api::{Document, SearchQuery, segment, segment_with};
pub use catalog::{
    BlueprintTemplate, CatalogEntry, PatternBlueprint, PatternCatalog, PatternOptions, PatternSpec,
};
pub use data::ExtractedData;
pub use elements::{BlockBehavior, BlockParts, Element, HeaderSplitter, StandardHeaderBlock};
pub use engine::{
    CompiledCatalog, CompiledPattern, ElementRegistry, PassMetrics, Progress, RunMetrics,
    Segmentation, Segmenter,
};
pub use error::{ConfigurationError, RecognitionWarning};
pub use modes::Mode;

// --- Core span types ---------------------------------------------------------

/// The two element categories a pattern can produce.
///
/// `Block` is semantically meaningful text; `Spacer` is filler (blank lines,
/// separators) that carries no extractable data but still owns its exact slice
/// of the input so the partition stays lossless.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementKind {
    Block,
    Spacer,
}

impl ElementKind {
    pub fn name(self) -> &'static str {
        match self {
            ElementKind::Block => "Block",
            ElementKind::Spacer => "Spacer",
        }
    }
}

/// A byte-offset span into the original text.
///
/// Both ends are inclusive: a span covering the first three bytes is
/// `CharSpan { start: 0, end: 2 }`. Spans produced by the engine are never
/// empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CharSpan {
    /// Start byte index (inclusive).
    pub start: usize,
    /// End byte index (inclusive).
    pub end: usize,
}

impl CharSpan {
    pub fn new(start: usize, end: usize) -> Self {
        CharSpan { start, end }
    }

    /// Number of bytes covered.
    pub fn len(&self) -> usize {
        self.end - self.start + 1
    }
}

/// A 1-based line span, inclusive on both ends.
///
/// A span whose text ends with `'\n'` ends on the line that newline
/// terminates, so `"A\n"` at the top of a document spans lines (1, 1) and the
/// following span starts on line 2.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LineSpan {
    /// First line covered (1-based).
    pub start: usize,
    /// Last line covered (1-based).
    pub end: usize,
}

impl LineSpan {
    pub fn new(start: usize, end: usize) -> Self {
        LineSpan { start, end }
    }
}
