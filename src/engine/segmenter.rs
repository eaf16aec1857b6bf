//! Matching and span-splitting core.
//!
//! The run state is a single ordered list of marked spans. Each span is
//! either still-unclassified text or a finished [`Element`]; initially the
//! list holds one text span covering the whole input.
//!
//! For each compiled pattern, in catalog order, every text span is split by
//! that pattern's full-match ranges:
//!
//! ```text
//! [ text ..................... ]            before the pass
//! [ text ][ Element ][ text ]               after the pass
//!            ▲
//!            └ never re-scanned by later patterns
//! ```
//!
//! Splitting is by match *ranges*, never a raw regex split, so capturing
//! groups inside a pattern cannot corrupt segment boundaries. A match is only
//! accepted when its capture group 1 equals the full match; a violating match
//! is recorded as a warning and its text left in place for later patterns.
//!
//! After the final pass, remaining text spans are wrapped as the fallback
//! unknown block, so the output partition is total.

use std::time::Instant;

use crate::elements::{generic_block, spacer, unknown_block, Element, UNKNOWN_SUBTYPE};
use crate::error::RecognitionWarning;
use crate::{CharSpan, ElementKind, LineSpan};

use super::compiled::{CompiledCatalog, CompiledPattern};
use super::metrics::{PassMetrics, RunMetrics};
use super::registry::ElementRegistry;
use super::spans::SpanCursor;

/// Coarse progress report handed to an optional observer.
///
/// Purely informational: observers cannot influence the run.
#[derive(Debug, Clone, Copy)]
pub struct Progress {
    /// Byte position just past the most recently classified element.
    pub chars_consumed: usize,
    /// Total byte length of the input.
    pub total_chars: usize,
}

/// The completed result of one segmentation run.
///
/// A pure function of the input text, catalog, and registry: the element
/// list, the recognition warnings collected along the way, and the timings.
#[derive(Debug, Clone)]
pub struct Segmentation {
    /// Ordered, fully classified elements; their raw text concatenates back
    /// to the original input exactly.
    pub elements: Vec<Element>,
    /// Non-fatal recognition problems, in discovery order.
    pub warnings: Vec<RecognitionWarning>,
    pub metrics: RunMetrics,
}

enum MarkedSpan {
    Text { char_span: CharSpan, line_span: LineSpan, text: String },
    Classified(Element),
}

/// Applies a compiled catalog to one input text.
///
/// Usage: `Segmenter::new(text, &catalog, &registry).run()`. The segmenter is
/// single-threaded and consumed by the run; the span list it mutates is never
/// shared.
pub struct Segmenter<'a> {
    catalog: &'a CompiledCatalog,
    registry: &'a ElementRegistry,
    total_chars: usize,
    spans: Vec<MarkedSpan>,
    warnings: Vec<RecognitionWarning>,
}

impl<'a> Segmenter<'a> {
    pub fn new(text: &str, catalog: &'a CompiledCatalog, registry: &'a ElementRegistry) -> Self {
        let mut spans = Vec::new();
        if !text.is_empty() {
            let mut cursor = SpanCursor::new(0, 1);
            let (char_span, line_span) = cursor.take(text);
            spans.push(MarkedSpan::Text { char_span, line_span, text: text.to_string() });
        }
        Segmenter { catalog, registry, total_chars: text.len(), spans, warnings: Vec::new() }
    }

    /// Run all passes and wrap leftovers; no progress reporting.
    pub fn run(self) -> Segmentation {
        self.run_with_observer(&mut |_| {})
    }

    /// Run all passes, reporting coarse progress to `observer`.
    pub fn run_with_observer(mut self, observer: &mut dyn FnMut(Progress)) -> Segmentation {
        let debug = std::env::var_os("CHEMSECT_DEBUG_PASSES").is_some();
        let total_start = Instant::now();
        let catalog = self.catalog;

        let mut passes = Vec::with_capacity(catalog.patterns.len());
        for compiled in &catalog.patterns {
            let pass = self.apply_pattern(compiled, observer);
            if debug {
                eprintln!(
                    "[pass] subtype=\"{}\" matched={} spans_scanned={} elapsed={:?}",
                    pass.subtype, pass.matched, pass.spans_scanned, pass.duration
                );
            }
            passes.push(pass);
        }

        // Leftover text becomes the fallback unknown block. A mode may ship
        // its own behavior under the fallback subtype.
        let fallback = self.registry.resolve(UNKNOWN_SUBTYPE).unwrap_or_else(unknown_block);
        let elements = self
            .spans
            .into_iter()
            .map(|span| match span {
                MarkedSpan::Classified(element) => element,
                MarkedSpan::Text { char_span, line_span, text } => Element::new(
                    ElementKind::Block,
                    UNKNOWN_SUBTYPE,
                    text,
                    char_span,
                    line_span,
                    fallback.clone(),
                ),
            })
            .collect();

        Segmentation {
            elements,
            warnings: self.warnings,
            metrics: RunMetrics { total: total_start.elapsed(), passes },
        }
    }

    /// Apply one pattern across every unclassified span.
    fn apply_pattern(
        &mut self,
        compiled: &CompiledPattern,
        observer: &mut dyn FnMut(Progress),
    ) -> PassMetrics {
        let start = Instant::now();
        let mut matched = 0;
        let mut spans_scanned = 0;

        let old = std::mem::take(&mut self.spans);
        let mut next = Vec::with_capacity(old.len());
        for span in old {
            match span {
                MarkedSpan::Classified(_) => next.push(span),
                MarkedSpan::Text { char_span, line_span, text } => {
                    spans_scanned += 1;
                    matched +=
                        self.split_text_span(compiled, char_span, line_span, text, &mut next, observer);
                }
            }
        }
        self.spans = next;

        PassMetrics {
            subtype: compiled.spec.subtype.clone(),
            duration: start.elapsed(),
            spans_scanned,
            matched,
        }
    }

    /// Split one text span by the pattern's accepted full-match ranges,
    /// pushing the resulting sub-spans onto `out` in order. Returns the
    /// number of elements produced.
    fn split_text_span(
        &mut self,
        compiled: &CompiledPattern,
        char_span: CharSpan,
        line_span: LineSpan,
        text: String,
        out: &mut Vec<MarkedSpan>,
        observer: &mut dyn FnMut(Progress),
    ) -> usize {
        let mut accepted: Vec<(usize, usize)> = Vec::new();
        for caps in compiled.regex.captures_iter(&text) {
            let whole = caps.get(0).expect("group 0 always participates");
            if whole.is_empty() {
                continue;
            }
            match caps.get(1) {
                Some(group) if group.as_str() == whole.as_str() => {
                    accepted.push((whole.start(), whole.end()));
                }
                _ => {
                    let warning = RecognitionWarning::GroupMismatch {
                        subtype: compiled.spec.subtype.clone(),
                        char_start: char_span.start + whole.start(),
                    };
                    warning.emit();
                    self.warnings.push(warning);
                }
            }
        }

        if accepted.is_empty() {
            out.push(MarkedSpan::Text { char_span, line_span, text });
            return 0;
        }

        let produced = accepted.len();
        let mut cursor = SpanCursor::new(char_span.start, line_span.start);
        let mut pos = 0;
        for (match_start, match_end) in accepted {
            if match_start > pos {
                let chunk = &text[pos..match_start];
                let (chars, lines) = cursor.take(chunk);
                out.push(MarkedSpan::Text {
                    char_span: chars,
                    line_span: lines,
                    text: chunk.to_string(),
                });
            }
            let chunk = &text[match_start..match_end];
            let (chars, lines) = cursor.take(chunk);
            let element = self.build_element(compiled, chunk, chars, lines);
            out.push(MarkedSpan::Classified(element));
            observer(Progress { chars_consumed: chars.end + 1, total_chars: self.total_chars });
            pos = match_end;
        }
        if pos < text.len() {
            let chunk = &text[pos..];
            let (chars, lines) = cursor.take(chunk);
            out.push(MarkedSpan::Text { char_span: chars, line_span: lines, text: chunk.to_string() });
        }
        produced
    }

    fn build_element(
        &mut self,
        compiled: &CompiledPattern,
        raw: &str,
        chars: CharSpan,
        lines: LineSpan,
    ) -> Element {
        let spec = &compiled.spec;
        let behavior = match self.registry.resolve(&spec.subtype) {
            Some(behavior) => behavior,
            None => {
                let warning = RecognitionWarning::UnknownSubtype {
                    subtype: spec.subtype.clone(),
                    kind: spec.kind.name(),
                    char_start: chars.start,
                };
                warning.emit();
                self.warnings.push(warning);
                match spec.kind {
                    ElementKind::Block => generic_block(),
                    ElementKind::Spacer => spacer(),
                }
            }
        };
        Element::new(spec.kind, spec.subtype.clone(), raw, chars, lines, behavior)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{CatalogEntry, PatternCatalog, PatternOptions, PatternSpec};

    fn compile(specs: Vec<PatternSpec>) -> CompiledCatalog {
        let mut catalog = PatternCatalog::new();
        for spec in specs {
            let name = spec.subtype.clone();
            catalog.add_entry(name, CatalogEntry::Pattern(spec), false).unwrap();
        }
        CompiledCatalog::compile(&catalog).unwrap()
    }

    fn block(subtype: &str, pattern: &str) -> PatternSpec {
        PatternSpec::new(ElementKind::Block, subtype, pattern, PatternOptions::MULTILINE, "")
    }

    fn spacer_spec() -> PatternSpec {
        PatternSpec::new(
            ElementKind::Spacer,
            "Spacer",
            r"^((?:[ \t]*\n)+)",
            PatternOptions::MULTILINE,
            "",
        )
    }

    fn assert_lossless(text: &str, segmentation: &Segmentation) {
        let rebuilt: String = segmentation.elements.iter().map(Element::raw).collect();
        assert_eq!(rebuilt, text, "raw concatenation must reproduce the input");
        if text.is_empty() {
            assert!(segmentation.elements.is_empty());
            return;
        }
        assert_eq!(segmentation.elements.first().unwrap().char_span().start, 0);
        assert_eq!(segmentation.elements.last().unwrap().char_span().end, text.len() - 1);
        for pair in segmentation.elements.windows(2) {
            assert_eq!(
                pair[0].char_span().end + 1,
                pair[1].char_span().start,
                "elements must be contiguous"
            );
        }
    }

    #[test]
    fn partitions_blocks_and_spacers_losslessly() {
        let text = "ENERGY -1.5\n\n\nnoise here\nENERGY -2.5\n";
        let catalog = compile(vec![block("Energy", r"^(ENERGY .*\n)"), spacer_spec()]);
        let registry = ElementRegistry::new();
        let segmentation = Segmenter::new(text, &catalog, &registry).run();

        assert_lossless(text, &segmentation);
        let kinds: Vec<_> =
            segmentation.elements.iter().map(|e| (e.subtype().to_string(), e.kind())).collect();
        assert_eq!(
            kinds,
            [
                ("Energy".to_string(), ElementKind::Block),
                ("Spacer".to_string(), ElementKind::Spacer),
                ("BlockUnknown".to_string(), ElementKind::Block),
                ("Energy".to_string(), ElementKind::Block),
            ]
        );
    }

    #[test]
    fn zero_matches_leave_one_fallback_unknown_block() {
        let text = "nothing recognizable\nat all\n";
        let catalog = compile(vec![block("Energy", r"^(ENERGY .*\n)")]);
        let registry = ElementRegistry::new();
        let segmentation = Segmenter::new(text, &catalog, &registry).run();

        assert_eq!(segmentation.elements.len(), 1);
        let only = &segmentation.elements[0];
        assert_eq!(only.subtype(), "BlockUnknown");
        assert_eq!(only.raw(), text);
        assert_eq!(only.line_span(), LineSpan::new(1, 2));
        assert!(segmentation.warnings.is_empty());
    }

    #[test]
    fn earlier_patterns_win_over_later_overlapping_ones() {
        let text = "VALUE special 1\nVALUE plain 2\n";
        // Both patterns can match the first line; the specific one is first.
        let catalog = compile(vec![
            block("Special", r"^(VALUE special .*\n)"),
            block("Generic", r"^(VALUE .*\n)"),
        ]);
        let registry = ElementRegistry::new();
        let segmentation = Segmenter::new(text, &catalog, &registry).run();

        let subtypes: Vec<_> = segmentation.elements.iter().map(Element::subtype).collect();
        assert_eq!(subtypes, ["Special", "Generic"]);
        assert_lossless(text, &segmentation);
    }

    #[test]
    fn classified_spans_are_never_rescanned() {
        let text = "abcabc";
        let catalog = compile(vec![block("Outer", r"(abcabc)"), block("Inner", r"(abc)")]);
        let registry = ElementRegistry::new();
        let segmentation = Segmenter::new(text, &catalog, &registry).run();
        assert_eq!(segmentation.elements.len(), 1);
        assert_eq!(segmentation.elements[0].subtype(), "Outer");
    }

    #[test]
    fn group_mismatch_is_warned_and_the_text_stays_unclassified() {
        let text = "abc\n";
        // Group 1 covers only part of the match, violating the invariant.
        let catalog = compile(vec![block("Broken", r"^(?:a(b)c)\n")]);
        let registry = ElementRegistry::new();
        let segmentation = Segmenter::new(text, &catalog, &registry).run();

        assert!(matches!(
            segmentation.warnings.as_slice(),
            [RecognitionWarning::GroupMismatch { subtype, char_start: 0 }] if subtype == "Broken"
        ));
        assert_eq!(segmentation.elements.len(), 1);
        assert_eq!(segmentation.elements[0].subtype(), "BlockUnknown");
        assert_lossless(text, &segmentation);
    }

    #[test]
    fn unresolved_subtype_degrades_with_a_warning() {
        let text = "ENERGY -1.5\n";
        let catalog = compile(vec![block("Energy", r"^(ENERGY .*\n)")]);
        let registry = ElementRegistry::new();
        let segmentation = Segmenter::new(text, &catalog, &registry).run();

        assert!(matches!(
            segmentation.warnings.as_slice(),
            [RecognitionWarning::UnknownSubtype { subtype, .. }] if subtype == "Energy"
        ));
        // The element keeps its declared subtype even on the fallback behavior.
        assert_eq!(segmentation.elements[0].subtype(), "Energy");
    }

    #[test]
    fn reruns_are_byte_identical() {
        let text = "HEADER\n-----\nbody\n\nENERGY -1\ntrailing";
        let catalog = compile(vec![
            block("Headed", r"^([^\n]+\n[ \t]*-{3,}[ \t]*\n(?:[ \t]*[^ \t\n][^\n]*\n)*)"),
            block("Energy", r"^(ENERGY .*\n)"),
            spacer_spec(),
        ]);
        let registry = ElementRegistry::new();
        let first = Segmenter::new(text, &catalog, &registry).run();
        let second = Segmenter::new(text, &catalog, &registry).run();
        assert_eq!(first.elements, second.elements);
        assert_lossless(text, &first);
    }

    #[test]
    fn empty_input_yields_no_elements() {
        let catalog = compile(vec![block("Energy", r"^(ENERGY .*\n)")]);
        let registry = ElementRegistry::new();
        let segmentation = Segmenter::new("", &catalog, &registry).run();
        assert!(segmentation.elements.is_empty());
        assert!(segmentation.warnings.is_empty());
    }

    #[test]
    fn observer_sees_monotonic_progress() {
        let text = "ENERGY -1\nfiller\nENERGY -2\n";
        let catalog = compile(vec![block("Energy", r"^(ENERGY .*\n)")]);
        let registry = ElementRegistry::new();
        let mut seen = Vec::new();
        let segmentation = Segmenter::new(text, &catalog, &registry)
            .run_with_observer(&mut |progress| seen.push(progress.chars_consumed));
        assert_eq!(seen.len(), 2);
        assert!(seen.windows(2).all(|w| w[0] < w[1]));
        assert!(seen.iter().all(|&consumed| consumed <= text.len()));
        assert_lossless(text, &segmentation);
    }

    #[test]
    fn pass_metrics_record_each_pattern_in_order() {
        let text = "ENERGY -1\n\n";
        let catalog = compile(vec![block("Energy", r"^(ENERGY .*\n)"), spacer_spec()]);
        let registry = ElementRegistry::new();
        let segmentation = Segmenter::new(text, &catalog, &registry).run();
        let names: Vec<_> =
            segmentation.metrics.passes.iter().map(|p| p.subtype.as_str()).collect();
        assert_eq!(names, ["Energy", "Spacer"]);
        assert_eq!(segmentation.metrics.passes[0].matched, 1);
        assert_eq!(segmentation.metrics.passes[1].matched, 1);
    }
}
