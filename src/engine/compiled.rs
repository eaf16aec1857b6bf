//! Catalog compilation.
//!
//! A [`PatternCatalog`] is declarative; the engine runs on its compiled form:
//! the flattened, ordered pattern list with every regex built up front.
//! Compilation validates the catalog first, so a malformed configuration
//! fails fast here and never mid-segmentation.

use regex::Regex;

use crate::catalog::{PatternCatalog, PatternSpec};
use crate::error::ConfigurationError;

/// One flattened rule with its ready-to-use matcher.
#[derive(Debug, Clone)]
pub struct CompiledPattern {
    pub spec: PatternSpec,
    pub regex: Regex,
}

/// The ordered, fully compiled pattern list the segmenter applies.
#[derive(Debug, Clone)]
pub struct CompiledCatalog {
    pub patterns: Vec<CompiledPattern>,
}

impl CompiledCatalog {
    /// Validate, flatten, and compile `catalog`.
    pub fn compile(catalog: &PatternCatalog) -> Result<Self, ConfigurationError> {
        catalog.validate()?;
        let patterns = catalog
            .flatten()?
            .into_iter()
            .map(|spec| Ok(CompiledPattern { regex: spec.compile()?, spec }))
            .collect::<Result<Vec<_>, ConfigurationError>>()?;
        Ok(CompiledCatalog { patterns })
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}
