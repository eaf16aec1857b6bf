//! Public entry surface.
//!
//! A [`Document`] owns one input text and the mode-selected catalog/registry,
//! and performs segmentation exactly once, lazily: the first accessor call
//! runs the engine and memoizes the [`Segmentation`]; every later call reads
//! the cached result. Re-querying never re-segments.

use std::fmt;
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use once_cell::sync::OnceCell;

use crate::elements::{Element, UNKNOWN_SUBTYPE};
use crate::engine::{
    CompiledCatalog, ElementRegistry, Progress, RunMetrics, Segmentation, Segmenter,
};
use crate::error::{ConfigurationError, RecognitionWarning};
use crate::modes::Mode;
use crate::ElementKind;

/// Segment `text` with a mode's built-in catalog and registry.
pub fn segment(text: &str, mode: Mode) -> Segmentation {
    let catalog = mode.compiled_catalog();
    let registry = mode.registry();
    Segmenter::new(text, &catalog, &registry).run()
}

/// Segment `text` with a custom compiled catalog and registry.
pub fn segment_with(
    text: &str,
    catalog: &CompiledCatalog,
    registry: &ElementRegistry,
) -> Segmentation {
    Segmenter::new(text, catalog, registry).run()
}

/// One input text plus its mode-selected settings and the memoized result.
pub struct Document {
    mode: Mode,
    text: String,
    catalog: Arc<CompiledCatalog>,
    registry: Arc<ElementRegistry>,
    segmentation: OnceCell<Segmentation>,
    runs: AtomicUsize,
}

impl Document {
    /// Read a file as-is and prepare it for segmentation under `mode`.
    pub fn open(path: impl AsRef<Path>, mode: Mode) -> Result<Self, ConfigurationError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|source| ConfigurationError::Io { path: path.to_path_buf(), source })?;
        Ok(Document::from_text(text, mode))
    }

    /// Prepare an in-memory text for segmentation under `mode`.
    pub fn from_text(text: impl Into<String>, mode: Mode) -> Self {
        Document::with_settings(text, mode, mode.compiled_catalog(), mode.registry())
    }

    /// Prepare a text with a custom catalog and registry.
    ///
    /// `mode` is kept as a label only; the supplied settings drive the run.
    pub fn with_settings(
        text: impl Into<String>,
        mode: Mode,
        catalog: Arc<CompiledCatalog>,
        registry: Arc<ElementRegistry>,
    ) -> Self {
        Document {
            mode,
            text: text.into(),
            catalog,
            registry,
            segmentation: OnceCell::new(),
            runs: AtomicUsize::new(0),
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// The original text, exactly as read.
    pub fn text(&self) -> &str {
        &self.text
    }

    fn segmentation(&self) -> &Segmentation {
        self.segmentation.get_or_init(|| {
            self.runs.fetch_add(1, Ordering::SeqCst);
            Segmenter::new(&self.text, &self.catalog, &self.registry).run()
        })
    }

    /// Like the other accessors, but reports coarse progress to `observer`
    /// if this call is the one that performs segmentation.
    pub fn segment_with_observer(&self, observer: &mut dyn FnMut(Progress)) -> &Segmentation {
        self.segmentation.get_or_init(|| {
            self.runs.fetch_add(1, Ordering::SeqCst);
            Segmenter::new(&self.text, &self.catalog, &self.registry).run_with_observer(observer)
        })
    }

    /// The ordered, fully classified element list.
    pub fn elements(&self) -> &[Element] {
        &self.segmentation().elements
    }

    /// Only the block elements, in order.
    pub fn blocks(&self) -> impl Iterator<Item = &Element> {
        self.elements().iter().filter(|element| element.is_block())
    }

    /// The fallback blocks no pattern recognized.
    pub fn unknown(&self) -> impl Iterator<Item = &Element> {
        self.elements().iter().filter(|element| element.subtype() == UNKNOWN_SUBTYPE)
    }

    /// Recognition warnings collected during the (single) run.
    pub fn warnings(&self) -> &[RecognitionWarning] {
        &self.segmentation().warnings
    }

    pub fn metrics(&self) -> &RunMetrics {
        &self.segmentation().metrics
    }

    /// Filter the memoized element list; never re-segments.
    pub fn search(&self, query: &SearchQuery) -> Vec<&Element> {
        self.elements().iter().filter(|element| query.matches(element)).collect()
    }

    /// How many times segmentation actually ran (0 before the first accessor,
    /// 1 ever after).
    pub fn segmentation_runs(&self) -> usize {
        self.runs.load(Ordering::SeqCst)
    }
}

impl fmt::Debug for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Document")
            .field("mode", &self.mode)
            .field("text_len", &self.text.len())
            .field("segmented", &self.segmentation.get().is_some())
            .finish()
    }
}

/// Element filter combining type, name, and raw-substring criteria.
///
/// All set criteria must hold; `raw_contains` entries must all be present and
/// `raw_lacks` entries all absent.
#[derive(Debug, Clone, Default)]
pub struct SearchQuery {
    kind: Option<ElementKind>,
    subtype: Option<String>,
    readable_name: Option<String>,
    raw_contains: Vec<String>,
    raw_lacks: Vec<String>,
}

impl SearchQuery {
    pub fn new() -> Self {
        SearchQuery::default()
    }

    pub fn kind(mut self, kind: ElementKind) -> Self {
        self.kind = Some(kind);
        self
    }

    pub fn subtype(mut self, subtype: impl Into<String>) -> Self {
        self.subtype = Some(subtype.into());
        self
    }

    pub fn readable_name(mut self, name: impl Into<String>) -> Self {
        self.readable_name = Some(name.into());
        self
    }

    pub fn raw_contains(mut self, needle: impl Into<String>) -> Self {
        self.raw_contains.push(needle.into());
        self
    }

    pub fn raw_lacks(mut self, needle: impl Into<String>) -> Self {
        self.raw_lacks.push(needle.into());
        self
    }

    fn matches(&self, element: &Element) -> bool {
        if let Some(kind) = self.kind {
            if element.kind() != kind {
                return false;
            }
        }
        if let Some(subtype) = &self.subtype {
            if element.subtype() != subtype {
                return false;
            }
        }
        if let Some(name) = &self.readable_name {
            if &element.readable_name() != name {
                return false;
            }
        }
        if !self.raw_contains.iter().all(|needle| element.raw().contains(needle.as_str())) {
            return false;
        }
        self.raw_lacks.iter().all(|needle| !element.raw().contains(needle.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{CatalogEntry, PatternCatalog, PatternOptions, PatternSpec};
    use crate::{CharSpan, LineSpan};

    const SCENARIO: &str =
        "HEADER\n-----\nbody line\n\nFINAL SINGLE POINT ENERGY   -379.259324337759\n";

    fn scenario_settings() -> (Arc<CompiledCatalog>, Arc<ElementRegistry>) {
        let mut catalog = PatternCatalog::new();
        catalog
            .add_entry(
                "StandardHeaderBlock",
                CatalogEntry::Pattern(PatternSpec::new(
                    ElementKind::Block,
                    "StandardHeaderBlock",
                    r"^([ \t]*[^-*#=\s][^\n]*\n[ \t]*[-*#=]{3,}[ \t]*\n(?:[ \t]*[^ \t\n][^\n]*\n)*)",
                    PatternOptions::MULTILINE,
                    "Header line underlined by a delimiter line, body until blank.",
                )),
                false,
            )
            .unwrap();
        catalog
            .add_entry(
                "FinalSinglePointEnergy",
                CatalogEntry::Pattern(PatternSpec::new(
                    ElementKind::Block,
                    "FinalSinglePointEnergy",
                    r"^([ \t]*FINAL SINGLE POINT ENERGY[ \t]+-?\d+\.\d+[ \t]*\n)",
                    PatternOptions::MULTILINE,
                    "The final single point energy line.",
                )),
                false,
            )
            .unwrap();
        catalog
            .add_entry(
                "Spacer",
                CatalogEntry::Pattern(PatternSpec::new(
                    ElementKind::Spacer,
                    "Spacer",
                    r"^((?:[ \t]*\n)+)",
                    PatternOptions::MULTILINE,
                    "Blank lines.",
                )),
                false,
            )
            .unwrap();
        let compiled = Arc::new(CompiledCatalog::compile(&catalog).unwrap());

        let mut registry = ElementRegistry::with_base();
        registry
            .register(
                "StandardHeaderBlock",
                Arc::new(crate::elements::StandardHeaderBlock::new(
                    crate::elements::HeaderSplitter::underlined(),
                )),
            )
            .unwrap();
        registry.register("FinalSinglePointEnergy", crate::elements::generic_block()).unwrap();
        (compiled, Arc::new(registry))
    }

    #[test]
    fn scenario_header_spacer_energy() {
        let (catalog, registry) = scenario_settings();
        let document = Document::with_settings(SCENARIO, Mode::Orca, catalog, registry);
        let elements = document.elements();

        assert_eq!(elements.len(), 3);
        assert_eq!(elements[0].subtype(), "StandardHeaderBlock");
        assert_eq!(elements[0].line_span(), LineSpan::new(1, 3));
        assert_eq!(elements[1].kind(), ElementKind::Spacer);
        assert_eq!(elements[1].line_span(), LineSpan::new(4, 4));
        assert_eq!(elements[2].subtype(), "FinalSinglePointEnergy");
        assert_eq!(elements[2].line_span(), LineSpan::new(5, 5));

        let rebuilt: String = elements.iter().map(Element::raw).collect();
        assert_eq!(rebuilt, SCENARIO);
        assert_eq!(elements[0].char_span(), CharSpan::new(0, 22));
        assert_eq!(elements[2].char_span().end, SCENARIO.len() - 1);
        assert!(document.warnings().is_empty(), "{:?}", document.warnings());
    }

    #[test]
    fn scenario_parses_with_the_builtin_orca_mode_too() {
        let document = Document::from_text(SCENARIO, Mode::Orca);
        let subtypes: Vec<_> = document.elements().iter().map(Element::subtype).collect();
        assert_eq!(
            subtypes,
            ["BlockOrcaWithSingleLineHeader", "Spacer", "BlockOrcaFinalSinglePointEnergy"]
        );
    }

    #[test]
    fn accessors_segment_exactly_once() {
        let document = Document::from_text(SCENARIO, Mode::Orca);
        assert_eq!(document.segmentation_runs(), 0);

        let first = document.elements().to_vec();
        assert_eq!(document.segmentation_runs(), 1);
        let second = document.elements().to_vec();
        assert_eq!(document.segmentation_runs(), 1, "re-query must not re-segment");
        assert_eq!(first, second);

        // Other accessors share the same cached run.
        let _ = document.warnings();
        let _ = document.blocks().count();
        assert_eq!(document.segmentation_runs(), 1);
    }

    #[test]
    fn search_filters_by_kind_name_and_substring() {
        let document = Document::from_text(SCENARIO, Mode::Orca);

        let spacers = document.search(&SearchQuery::new().kind(ElementKind::Spacer));
        assert_eq!(spacers.len(), 1);

        let by_name = document.search(&SearchQuery::new().readable_name("HEADER"));
        assert_eq!(by_name.len(), 1);
        assert_eq!(by_name[0].subtype(), "BlockOrcaWithSingleLineHeader");

        let with_energy = document.search(&SearchQuery::new().raw_contains("FINAL SINGLE POINT"));
        assert_eq!(with_energy.len(), 1);

        let without_energy = document.search(
            &SearchQuery::new().kind(ElementKind::Block).raw_lacks("FINAL SINGLE POINT"),
        );
        assert!(without_energy.iter().all(|e| !e.raw().contains("FINAL")));
    }

    #[test]
    fn blocks_excludes_spacers() {
        let document = Document::from_text(SCENARIO, Mode::Orca);
        assert_eq!(document.blocks().count(), 2);
        assert!(document.unknown().next().is_none());
    }

    #[test]
    fn open_surfaces_io_errors_with_the_path() {
        let err = Document::open("/definitely/not/here.out", Mode::Orca);
        match err {
            Err(ConfigurationError::Io { path, .. }) => {
                assert!(path.ends_with("here.out"));
            }
            other => panic!("expected Io error, got {other:?}"),
        }
    }

    #[test]
    fn segment_helper_matches_document_output() {
        let via_helper = segment(SCENARIO, Mode::Orca);
        let document = Document::from_text(SCENARIO, Mode::Orca);
        assert_eq!(via_helper.elements, document.elements());
    }

    #[test]
    fn observer_reports_progress_on_the_segmenting_call_only() {
        let document = Document::from_text(SCENARIO, Mode::Orca);
        let mut ticks = 0;
        document.segment_with_observer(&mut |_| ticks += 1);
        assert!(ticks > 0);

        let before = ticks;
        document.segment_with_observer(&mut |_| ticks += 1);
        assert_eq!(ticks, before, "memoized call must not re-run the observer");
    }
}
