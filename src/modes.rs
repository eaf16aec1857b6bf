//! Program modes: which catalog and registry a document uses.
//!
//! Each supported chemistry program ships a built-in, embedded JSON rule file
//! and an element-behavior registry built at mode initialization. Both are
//! parsed/constructed once in `Lazy` statics and shared by every document of
//! that mode; there is no process-wide mutable registration.
//!
//! ```text
//! "ORCA" ──FromStr──▶ Mode::Orca ──▶ compiled catalog  (orca_patterns.json)
//!                                └─▶ behavior registry (orca.rs)
//! ```
//!
//! Per-mode modules follow the same shape: a `catalog()` building the
//! compiled pattern list and a `registry()` wiring subtype names to
//! behaviors, plus the mode's data extractors.

#[path = "modes/gpaw.rs"]
mod gpaw;
#[path = "modes/orca.rs"]
mod orca;
#[path = "modes/vasp.rs"]
mod vasp;

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use crate::engine::{CompiledCatalog, ElementRegistry};
use crate::error::ConfigurationError;

/// Selects which program's pattern catalog and element registry apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mode {
    Orca,
    Gpaw,
    Vasp,
}

impl Mode {
    pub const ALL: [Mode; 3] = [Mode::Orca, Mode::Gpaw, Mode::Vasp];

    pub fn name(self) -> &'static str {
        match self {
            Mode::Orca => "ORCA",
            Mode::Gpaw => "GPAW",
            Mode::Vasp => "VASP",
        }
    }

    /// The mode's built-in compiled pattern catalog.
    pub fn compiled_catalog(self) -> Arc<CompiledCatalog> {
        match self {
            Mode::Orca => Arc::clone(&orca::CATALOG),
            Mode::Gpaw => Arc::clone(&gpaw::CATALOG),
            Mode::Vasp => Arc::clone(&vasp::CATALOG),
        }
    }

    /// The mode's built-in element-behavior registry.
    pub fn registry(self) -> Arc<ElementRegistry> {
        match self {
            Mode::Orca => Arc::clone(&orca::REGISTRY),
            Mode::Gpaw => Arc::clone(&gpaw::REGISTRY),
            Mode::Vasp => Arc::clone(&vasp::REGISTRY),
        }
    }
}

impl FromStr for Mode {
    type Err = ConfigurationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_ascii_uppercase().as_str() {
            "ORCA" => Ok(Mode::Orca),
            "GPAW" => Ok(Mode::Gpaw),
            "VASP" => Ok(Mode::Vasp),
            _ => Err(ConfigurationError::UnsupportedMode(value.to_string())),
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
