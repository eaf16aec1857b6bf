//! GPAW output blocks.

use std::sync::Arc;

use once_cell::sync::Lazy;
use serde_json::json;

use crate::catalog::PatternCatalog;
use crate::data::ExtractedData;
use crate::elements::{BlockBehavior, BlockParts, HeaderSplitter, StandardHeaderBlock};
use crate::engine::{CompiledCatalog, ElementRegistry};

pub(super) static CATALOG: Lazy<Arc<CompiledCatalog>> = Lazy::new(|| {
    let catalog = PatternCatalog::from_json_str(include_str!("gpaw_patterns.json"))
        .expect("embedded GPAW rule file is exercised by tests");
    Arc::new(CompiledCatalog::compile(&catalog).expect("embedded GPAW rule file compiles"))
});

pub(super) static REGISTRY: Lazy<Arc<ElementRegistry>> = Lazy::new(|| Arc::new(build_registry()));

fn build_registry() -> ElementRegistry {
    let mut registry = ElementRegistry::with_base();
    let strict: &[(&str, Arc<dyn BlockBehavior>)] = &[
        ("BlockGpawDipole", Arc::new(GpawDipole)),
        ("BlockGpawConvergedAfter", Arc::new(GpawConvergedAfter)),
        ("BlockGpawEnergyContributions", Arc::new(GpawEnergyContributions)),
        ("BlockGpawTiming", Arc::new(GpawTiming)),
        (
            "BlockGpawWithStandardHeader",
            Arc::new(StandardHeaderBlock::new(HeaderSplitter::boxed())),
        ),
        (
            "BlockGpawWithSingleLineHeader",
            Arc::new(StandardHeaderBlock::new(HeaderSplitter::underlined())),
        ),
    ];
    for (subtype, behavior) in strict {
        registry
            .register(*subtype, Arc::clone(behavior))
            .expect("built-in GPAW subtypes are unique");
    }
    registry
}

/// `Dipole moment: (-0.000000, 0.000000, -1.861085) |e|*Ang`
struct GpawDipole;

impl BlockBehavior for GpawDipole {
    fn parts(&self, raw: &str) -> BlockParts {
        BlockParts { name: "Dipole Moment".to_string(), header: None, body: raw.to_string() }
    }

    fn extract(&self, raw: &str) -> ExtractedData {
        let caps = regex!(
            r"[Dd]ipole moment: \((-?\d+\.\d+), (-?\d+\.\d+), (-?\d+\.\d+)\)"
        )
        .captures(raw);
        let Some(caps) = caps else {
            return ExtractedData::raw_fallback(raw);
        };
        let axis = |i: usize| caps.get(i).and_then(|m| m.as_str().parse::<f64>().ok());
        match (axis(1), axis(2), axis(3)) {
            (Some(x), Some(y), Some(z)) => {
                ExtractedData::new("`Dipole moment` is the (x, y, z) vector in |e|*Ang.")
                    .with_value("Dipole moment", json!([x, y, z]))
            }
            _ => ExtractedData::raw_fallback(raw),
        }
    }
}

/// `Converged after 31 iterations.`
struct GpawConvergedAfter;

impl BlockBehavior for GpawConvergedAfter {
    fn parts(&self, raw: &str) -> BlockParts {
        BlockParts { name: "Converged After".to_string(), header: None, body: raw.to_string() }
    }

    fn extract(&self, raw: &str) -> ExtractedData {
        let iterations = regex!(r"Converged after (\d+) iterations")
            .captures(raw)
            .and_then(|caps| caps.get(1))
            .and_then(|m| m.as_str().parse::<u64>().ok());
        match iterations {
            Some(iterations) => ExtractedData::new("`Iterations` until SCF convergence.")
                .with_value("Iterations", iterations),
            None => ExtractedData::raw_fallback(raw),
        }
    }
}

/// ```text
/// Energy contributions relative to reference atoms:
/// Kinetic:        +60.742233
/// Potential:      -78.051465
/// XC:             -21.649087
/// ```
struct GpawEnergyContributions;

impl BlockBehavior for GpawEnergyContributions {
    fn parts(&self, raw: &str) -> BlockParts {
        BlockParts { name: "Energy Contributions".to_string(), header: None, body: raw.to_string() }
    }

    fn extract(&self, raw: &str) -> ExtractedData {
        let mut data =
            ExtractedData::new("Per-term energy contributions in eV, keyed by their labels.");
        for caps in regex!(r"(?m)^[ \t]*([A-Za-z][A-Za-z ()-]*?):[ \t]*([+-]?\d+\.\d+)[ \t]*$")
            .captures_iter(raw)
        {
            let label = caps.get(1).map(|m| m.as_str().trim().to_string());
            let value = caps.get(2).and_then(|m| m.as_str().parse::<f64>().ok());
            if let (Some(label), Some(value)) = (label, value) {
                data = data.with_value(label, value);
            }
        }
        if data.values.is_empty() {
            return ExtractedData::raw_fallback(raw);
        }
        data
    }
}

/// Timing breakdown; only named here, values stay raw.
struct GpawTiming;

impl BlockBehavior for GpawTiming {
    fn parts(&self, raw: &str) -> BlockParts {
        BlockParts { name: "Timing".to_string(), header: None, body: raw.to_string() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::Segmenter;
    use serde_json::Value;

    const SAMPLE: &str = "\
Energy contributions relative to reference atoms:
Kinetic:        +60.742233
Potential:      -78.051465
XC:             -21.649087

Dipole moment: (-0.000000, 0.000000, -1.861085) |e|*Ang

Converged after 31 iterations.
";

    #[test]
    fn sample_output_segments_into_known_blocks() {
        let segmentation = Segmenter::new(SAMPLE, &CATALOG, &REGISTRY).run();
        let rebuilt: String = segmentation.elements.iter().map(|e| e.raw().to_string()).collect();
        assert_eq!(rebuilt, SAMPLE);
        assert!(segmentation.warnings.is_empty(), "{:?}", segmentation.warnings);

        let subtypes: Vec<_> = segmentation.elements.iter().map(|e| e.subtype()).collect();
        assert_eq!(
            subtypes,
            [
                "BlockGpawEnergyContributions",
                "Spacer",
                "BlockGpawDipole",
                "Spacer",
                "BlockGpawConvergedAfter",
            ]
        );
    }

    #[test]
    fn dipole_extractor_reads_the_vector() {
        let raw = "Dipole moment: (-0.000000, 0.000000, -1.861085) |e|*Ang\n";
        let data = GpawDipole.extract(raw);
        let vector = data.get("Dipole moment").and_then(Value::as_array).unwrap();
        assert_eq!(vector[2].as_f64(), Some(-1.861085));
    }

    #[test]
    fn converged_after_extractor_reads_the_iteration_count() {
        let data = GpawConvergedAfter.extract("Converged after 31 iterations.\n");
        assert_eq!(data.get("Iterations").and_then(Value::as_u64), Some(31));
    }

    #[test]
    fn energy_contributions_extractor_collects_labeled_terms() {
        let raw = "Energy contributions relative to reference atoms:\nKinetic:        +60.742233\nXC:             -21.649087\n";
        let data = GpawEnergyContributions.extract(raw);
        assert_eq!(data.get("Kinetic").and_then(Value::as_f64), Some(60.742233));
        assert_eq!(data.get("XC").and_then(Value::as_f64), Some(-21.649087));
    }

    #[test]
    fn timing_block_falls_back_to_raw_data() {
        let data = GpawTiming.extract("Timing:\nHamiltonian: 0.5\n");
        assert!(data.get("raw data").is_some());
    }
}
