//! Segmentation engine.
//!
//! This module is the operational core of the crate: it takes one input text
//! and an ordered, compiled pattern list, and partitions the text into a
//! lossless sequence of typed elements.
//!
//! ## How the parts work together
//!
//! ```text
//! PatternCatalog ──▶ CompiledCatalog::compile      (compiled.rs)
//!                          │
//! input text ──────────────┼──▶ Segmenter::run     (segmenter.rs)
//!                          │      - one pass per pattern, in catalog order
//!                          │      - split unclassified spans by match ranges
//!                          │      - resolve behaviors via ElementRegistry
//!                          │        (registry.rs)
//!                          │      - char/line bookkeeping (spans.rs)
//!                          │      - timings per pass (metrics.rs)
//!                          ▼
//!                    Segmentation { elements, warnings, metrics }
//! ```
//!
//! The engine is greedy by pattern priority: each pass only ever re-scans
//! text that no earlier pattern claimed, so earlier (more specific) patterns
//! deterministically win over later (generic) ones, and every character is
//! classified at most once. After the last pass, leftover text is wrapped as
//! the fallback unknown block so the output is always fully classified.
//!
//! There is no parallelism across patterns: each pass mutates the span list
//! the next pass depends on, so pattern order is a correctness-relevant
//! sequential dependency rather than an optimization opportunity.
//!
//! ## Debugging
//!
//! Set `CHEMSECT_DEBUG_PASSES=1` to print a per-pass trace.

#[path = "engine/compiled.rs"]
mod compiled;
#[path = "engine/metrics.rs"]
mod metrics;
#[path = "engine/registry.rs"]
mod registry;
#[path = "engine/segmenter.rs"]
mod segmenter;
#[path = "engine/spans.rs"]
mod spans;

pub use compiled::{CompiledCatalog, CompiledPattern};
pub use metrics::{PassMetrics, RunMetrics};
pub use registry::ElementRegistry;
pub use segmenter::{Progress, Segmentation, Segmenter};
