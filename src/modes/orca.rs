//! ORCA output blocks.

use std::sync::Arc;

use once_cell::sync::Lazy;

use crate::catalog::PatternCatalog;
use crate::data::ExtractedData;
use crate::elements::{BlockBehavior, BlockParts, HeaderSplitter, StandardHeaderBlock};
use crate::engine::{CompiledCatalog, ElementRegistry};

pub(super) static CATALOG: Lazy<Arc<CompiledCatalog>> = Lazy::new(|| {
    let catalog = PatternCatalog::from_json_str(include_str!("orca_patterns.json"))
        .expect("embedded ORCA rule file is exercised by tests");
    Arc::new(CompiledCatalog::compile(&catalog).expect("embedded ORCA rule file compiles"))
});

pub(super) static REGISTRY: Lazy<Arc<ElementRegistry>> = Lazy::new(|| Arc::new(build_registry()));

fn build_registry() -> ElementRegistry {
    let mut registry = ElementRegistry::with_base();
    let strict: &[(&str, Arc<dyn BlockBehavior>)] = &[
        ("BlockOrcaVersion", Arc::new(OrcaVersion)),
        ("BlockOrcaContributions", Arc::new(NamedParagraph { name: "Contributions" })),
        ("BlockOrcaAllRightsReserved", Arc::new(NamedParagraph { name: "All Rights Reserved" })),
        ("BlockOrcaFinalSinglePointEnergy", Arc::new(OrcaFinalSinglePointEnergy)),
        ("BlockOrcaDipoleMoment", Arc::new(OrcaDipoleMoment)),
        ("BlockOrcaTerminatedNormally", Arc::new(OrcaTerminatedNormally)),
        ("BlockOrcaTotalRunTime", Arc::new(OrcaTotalRunTime)),
        (
            "BlockOrcaWithStandardHeader",
            Arc::new(StandardHeaderBlock::new(HeaderSplitter::boxed())),
        ),
        (
            "BlockOrcaWithSingleLineHeader",
            Arc::new(StandardHeaderBlock::new(HeaderSplitter::underlined())),
        ),
    ];
    for (subtype, behavior) in strict {
        registry
            .register(*subtype, Arc::clone(behavior))
            .expect("built-in ORCA subtypes are unique");
    }
    registry
}

/// Paragraph block whose name is fixed by its anchor.
struct NamedParagraph {
    name: &'static str,
}

impl BlockBehavior for NamedParagraph {
    fn parts(&self, raw: &str) -> BlockParts {
        BlockParts { name: self.name.to_string(), header: None, body: raw.to_string() }
    }
}

/// `Program Version 5.0.0 -  RELEASE -` paragraph.
struct OrcaVersion;

impl BlockBehavior for OrcaVersion {
    fn parts(&self, raw: &str) -> BlockParts {
        BlockParts { name: "Program Version".to_string(), header: None, body: raw.to_string() }
    }

    fn extract(&self, raw: &str) -> ExtractedData {
        let version = regex!(r"Program Version ([^\s]+)")
            .captures(raw)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str());
        match version {
            Some(version) => ExtractedData::new("`Version` is the program version string.")
                .with_value("Version", version),
            None => ExtractedData::raw_fallback(raw),
        }
    }
}

/// ```text
/// -------------------------   --------------------
/// FINAL SINGLE POINT ENERGY      -379.259324337759
/// -------------------------   --------------------
/// ```
struct OrcaFinalSinglePointEnergy;

impl BlockBehavior for OrcaFinalSinglePointEnergy {
    fn parts(&self, raw: &str) -> BlockParts {
        BlockParts {
            name: "FINAL SINGLE POINT ENERGY".to_string(),
            header: None,
            body: raw.to_string(),
        }
    }

    fn extract(&self, raw: &str) -> ExtractedData {
        let energy = regex!(r"FINAL SINGLE POINT ENERGY[ \t]+(-?\d+\.\d+)")
            .captures(raw)
            .and_then(|caps| caps.get(1))
            .and_then(|m| m.as_str().parse::<f64>().ok());
        match energy {
            Some(energy) => ExtractedData::new("`Energy` is the total energy in Eh.")
                .with_value("Energy", energy),
            None => ExtractedData::raw_fallback(raw),
        }
    }
}

/// DIPOLE MOMENT section; the magnitude line carries the value of interest.
struct OrcaDipoleMoment;

impl BlockBehavior for OrcaDipoleMoment {
    fn parts(&self, raw: &str) -> BlockParts {
        StandardHeaderBlock::new(HeaderSplitter::boxed()).parts(raw)
    }

    fn extract(&self, raw: &str) -> ExtractedData {
        let magnitude = regex!(r"Magnitude \(Debye\)[ \t]*:[ \t]*(-?\d+\.\d+)")
            .captures(raw)
            .and_then(|caps| caps.get(1))
            .and_then(|m| m.as_str().parse::<f64>().ok());
        match magnitude {
            Some(magnitude) => {
                ExtractedData::new("`Magnitude (Debye)` is the total dipole moment.")
                    .with_value("Magnitude (Debye)", magnitude)
            }
            None => ExtractedData::raw_fallback(raw),
        }
    }
}

/// `****ORCA TERMINATED NORMALLY****` banner.
struct OrcaTerminatedNormally;

impl BlockBehavior for OrcaTerminatedNormally {
    fn parts(&self, raw: &str) -> BlockParts {
        BlockParts {
            name: "ORCA TERMINATED NORMALLY".to_string(),
            header: None,
            body: raw.to_string(),
        }
    }

    fn extract(&self, _raw: &str) -> ExtractedData {
        ExtractedData::new("The run finished without an abnormal termination.")
            .with_value("Terminated normally", true)
    }
}

/// `TOTAL RUN TIME: 0 days 0 hours 2 minutes 24 seconds 519 msec`
struct OrcaTotalRunTime;

impl BlockBehavior for OrcaTotalRunTime {
    fn parts(&self, raw: &str) -> BlockParts {
        BlockParts { name: "TOTAL RUN TIME".to_string(), header: None, body: raw.to_string() }
    }

    fn extract(&self, raw: &str) -> ExtractedData {
        let caps = regex!(
            r"TOTAL RUN TIME:[ \t]*(\d+) days (\d+) hours (\d+) minutes (\d+) seconds (\d+) msec"
        )
        .captures(raw);
        let Some(caps) = caps else {
            return ExtractedData::raw_fallback(raw);
        };
        let field = |i: usize| caps.get(i).and_then(|m| m.as_str().parse::<u64>().ok());
        match (field(1), field(2), field(3), field(4), field(5)) {
            (Some(days), Some(hours), Some(minutes), Some(seconds), Some(msec)) => {
                let total = (((days * 24 + hours) * 60 + minutes) * 60 + seconds) as f64
                    + msec as f64 / 1000.0;
                ExtractedData::new("Run time components and the derived `Total seconds`.")
                    .with_value("Days", days)
                    .with_value("Hours", hours)
                    .with_value("Minutes", minutes)
                    .with_value("Seconds", seconds)
                    .with_value("Milliseconds", msec)
                    .with_value("Total seconds", total)
            }
            _ => ExtractedData::raw_fallback(raw),
        }
    }
}
