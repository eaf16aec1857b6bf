//! VASP (OUTCAR) output blocks.

use std::sync::Arc;

use once_cell::sync::Lazy;

use crate::catalog::PatternCatalog;
use crate::data::ExtractedData;
use crate::elements::{BlockBehavior, BlockParts, HeaderSplitter, StandardHeaderBlock};
use crate::engine::{CompiledCatalog, ElementRegistry};

pub(super) static CATALOG: Lazy<Arc<CompiledCatalog>> = Lazy::new(|| {
    let catalog = PatternCatalog::from_json_str(include_str!("vasp_patterns.json"))
        .expect("embedded VASP rule file is exercised by tests");
    Arc::new(CompiledCatalog::compile(&catalog).expect("embedded VASP rule file compiles"))
});

pub(super) static REGISTRY: Lazy<Arc<ElementRegistry>> = Lazy::new(|| Arc::new(build_registry()));

fn build_registry() -> ElementRegistry {
    let mut registry = ElementRegistry::with_base();
    let strict: &[(&str, Arc<dyn BlockBehavior>)] = &[
        ("BlockVaspFreeEnergy", Arc::new(VaspFreeEnergy)),
        ("BlockVaspGeneralTiming", Arc::new(VaspGeneralTiming)),
        ("BlockVaspIteration", Arc::new(VaspIteration)),
        (
            "BlockVaspWithStandardHeader",
            Arc::new(StandardHeaderBlock::new(HeaderSplitter::boxed())),
        ),
        (
            "BlockVaspWithSingleLineHeader",
            Arc::new(StandardHeaderBlock::new(HeaderSplitter::underlined())),
        ),
    ];
    for (subtype, behavior) in strict {
        registry
            .register(*subtype, Arc::clone(behavior))
            .expect("built-in VASP subtypes are unique");
    }
    registry
}

/// ```text
/// FREE ENERGIE OF THE ION-ELECTRON SYSTEM (eV)
/// ---------------------------------------------------
/// free  energy   TOTEN  =       -27.21962043 eV
/// energy  without entropy=      -27.21962043
/// ```
struct VaspFreeEnergy;

impl BlockBehavior for VaspFreeEnergy {
    fn parts(&self, raw: &str) -> BlockParts {
        StandardHeaderBlock::new(HeaderSplitter::underlined()).parts(raw)
    }

    fn extract(&self, raw: &str) -> ExtractedData {
        let toten = regex!(r"free[ \t]+energy[ \t]+TOTEN[ \t]*=[ \t]*(-?\d+\.\d+)[ \t]*eV")
            .captures(raw)
            .and_then(|caps| caps.get(1))
            .and_then(|m| m.as_str().parse::<f64>().ok());
        match toten {
            Some(toten) => {
                ExtractedData::new("`TOTEN (eV)` is the free energy of the ion-electron system.")
                    .with_value("TOTEN (eV)", toten)
            }
            None => ExtractedData::raw_fallback(raw),
        }
    }
}

/// Closing `General timing and accounting informations for this job:` table.
struct VaspGeneralTiming;

impl BlockBehavior for VaspGeneralTiming {
    fn parts(&self, raw: &str) -> BlockParts {
        StandardHeaderBlock::new(HeaderSplitter::underlined()).parts(raw)
    }

    fn extract(&self, raw: &str) -> ExtractedData {
        let elapsed = regex!(r"Elapsed time \(sec\):[ \t]*(\d+\.\d+)")
            .captures(raw)
            .and_then(|caps| caps.get(1))
            .and_then(|m| m.as_str().parse::<f64>().ok());
        match elapsed {
            Some(elapsed) => ExtractedData::new("`Elapsed time (sec)` of the whole job.")
                .with_value("Elapsed time (sec)", elapsed),
            None => ExtractedData::raw_fallback(raw),
        }
    }
}

/// `----------------------- Iteration    1(   1)  -----------------------`
struct VaspIteration;

impl BlockBehavior for VaspIteration {
    fn parts(&self, raw: &str) -> BlockParts {
        BlockParts { name: "Iteration".to_string(), header: None, body: raw.to_string() }
    }

    fn extract(&self, raw: &str) -> ExtractedData {
        let caps = regex!(r"Iteration[ \t]+(\d+)\([ \t]*(\d+)\)").captures(raw);
        let Some(caps) = caps else {
            return ExtractedData::raw_fallback(raw);
        };
        let field = |i: usize| caps.get(i).and_then(|m| m.as_str().parse::<u64>().ok());
        match (field(1), field(2)) {
            (Some(ionic), Some(electronic)) => {
                ExtractedData::new("Ionic step and electronic step of this iteration marker.")
                    .with_value("Ionic step", ionic)
                    .with_value("Electronic step", electronic)
            }
            _ => ExtractedData::raw_fallback(raw),
        }
    }
}
