//! Pattern catalog: the declarative, ordered rule set driving segmentation.
//!
//! A catalog is an ordered tree whose leaves are [`PatternSpec`]s (one named
//! regex rule each), whose interior nodes are nested sub-catalogs, and whose
//! [`PatternBlueprint`] nodes stamp out families of structurally identical
//! rules from one template plus a list of literal anchor texts.
//!
//! ```text
//! JSON rule file ──▶ PatternCatalog::from_json_str   (config.rs)
//!                        │  validate()  fails fast on bad configuration
//!                        ▼
//!                    flatten()          depth-first, blueprint-expanded
//!                        │
//!                        ▼
//!               ordered Vec<PatternSpec> ──▶ CompiledCatalog (engine)
//! ```
//!
//! Order is significant and caller-controlled: earlier patterns consume text
//! before later ones see it, which is how specific rules win over generic
//! fallbacks. Catalogs are built once per mode, validated eagerly, and reused
//! across documents.

#[path = "catalog/blueprint.rs"]
mod blueprint;
#[path = "catalog/config.rs"]
mod config;
#[path = "catalog/spec.rs"]
mod spec;

pub use blueprint::{BlueprintTemplate, PatternBlueprint};
pub use spec::{PatternOptions, PatternSpec};

use crate::error::ConfigurationError;
use std::collections::HashMap;

/// One named node of the catalog tree.
#[derive(Debug, Clone)]
pub enum CatalogEntry {
    /// A direct pattern declaration.
    Pattern(PatternSpec),
    /// A template expanded into one pattern per anchor text.
    Blueprint(PatternBlueprint),
    /// A nested, independently ordered sub-catalog.
    Group(PatternCatalog),
}

impl CatalogEntry {
    fn validate(&self) -> Result<(), ConfigurationError> {
        match self {
            CatalogEntry::Pattern(spec) => spec.compile().map(drop),
            CatalogEntry::Blueprint(blueprint) => blueprint.validate(),
            CatalogEntry::Group(group) => group.validate(),
        }
    }
}

/// An ordered, hierarchical collection of pattern rules.
///
/// `order` names the entries to apply, in priority order; `items` may hold
/// more entries than `order` references (dead configuration), which is
/// reported as a non-fatal diagnostic rather than an error.
#[derive(Debug, Clone, Default)]
pub struct PatternCatalog {
    order: Vec<String>,
    items: HashMap<String, CatalogEntry>,
}

impl PatternCatalog {
    pub fn new() -> Self {
        PatternCatalog::default()
    }

    /// Parse and validate a catalog from its declarative JSON form.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigurationError> {
        let catalog = config::parse(json)?;
        catalog.validate()?;
        Ok(catalog)
    }

    /// Add an entry under `name`, appending it to the order if absent.
    ///
    /// Duplicates are rejected unless `overwrite` is set.
    pub fn add_entry(
        &mut self,
        name: impl Into<String>,
        entry: CatalogEntry,
        overwrite: bool,
    ) -> Result<(), ConfigurationError> {
        let name = name.into();
        if self.items.contains_key(&name) && !overwrite {
            return Err(ConfigurationError::DuplicateEntry(name));
        }
        if !self.order.contains(&name) {
            self.order.push(name.clone());
        }
        self.items.insert(name, entry);
        Ok(())
    }

    /// Replace the application order. Every name must have a backing entry.
    pub fn set_order(&mut self, order: Vec<String>) -> Result<(), ConfigurationError> {
        if let Some(missing) = order.iter().find(|name| !self.items.contains_key(*name)) {
            return Err(ConfigurationError::DanglingOrderRef(missing.clone()));
        }
        self.order = order;
        Ok(())
    }

    pub fn order(&self) -> &[String] {
        &self.order
    }

    pub fn get(&self, name: &str) -> Option<&CatalogEntry> {
        self.items.get(name)
    }

    /// Total number of flattened patterns this catalog would produce.
    pub fn len(&self) -> usize {
        self.order
            .iter()
            .filter_map(|name| self.items.get(name))
            .map(|entry| match entry {
                CatalogEntry::Pattern(_) => 1,
                CatalogEntry::Blueprint(blueprint) => blueprint.len(),
                CatalogEntry::Group(group) => group.len(),
            })
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Flatten to the single ordered pattern list applied by the engine.
    ///
    /// Nested groups are expanded depth-first in declared order; blueprints
    /// expand in their own declared order.
    pub fn flatten(&self) -> Result<Vec<PatternSpec>, ConfigurationError> {
        let mut flat = Vec::new();
        for name in &self.order {
            match self.items.get(name) {
                Some(CatalogEntry::Pattern(spec)) => flat.push(spec.clone()),
                Some(CatalogEntry::Blueprint(blueprint)) => flat.extend(blueprint.expand()?),
                Some(CatalogEntry::Group(group)) => flat.extend(group.flatten()?),
                None => return Err(ConfigurationError::DanglingOrderRef(name.clone())),
            }
        }
        Ok(flat)
    }

    /// Fail fast on inconsistent configuration.
    ///
    /// Errors: an ordered name without a backing entry, a blueprint anchor
    /// missing from its text mapping, an unknown matching option, or a
    /// pattern that does not compile (including the capture-group check).
    /// Entries present but unreachable from `order` are dead configuration:
    /// reported through `tracing::warn!`, not an error.
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        for name in &self.order {
            if !self.items.contains_key(name) {
                return Err(ConfigurationError::DanglingOrderRef(name.clone()));
            }
        }
        for (name, entry) in &self.items {
            entry.validate()?;
            if !self.order.contains(name) {
                tracing::warn!(target: "chemsect", "catalog entry `{name}` is defined but not reachable from `order`");
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ElementKind;

    fn spec(subtype: &str, pattern: &str) -> PatternSpec {
        PatternSpec::new(ElementKind::Block, subtype, pattern, PatternOptions::MULTILINE, "")
    }

    #[test]
    fn flatten_is_depth_first_in_declared_order() {
        let mut inner = PatternCatalog::new();
        inner.add_entry("B", CatalogEntry::Pattern(spec("B", r"^(b)$")), false).unwrap();
        inner.add_entry("C", CatalogEntry::Pattern(spec("C", r"^(c)$")), false).unwrap();

        let mut outer = PatternCatalog::new();
        outer.add_entry("A", CatalogEntry::Pattern(spec("A", r"^(a)$")), false).unwrap();
        outer.add_entry("Inner", CatalogEntry::Group(inner), false).unwrap();
        outer.add_entry("D", CatalogEntry::Pattern(spec("D", r"^(d)$")), false).unwrap();

        let names: Vec<_> = outer.flatten().unwrap().into_iter().map(|s| s.subtype).collect();
        assert_eq!(names, ["A", "B", "C", "D"]);
        assert_eq!(outer.len(), 4);
    }

    #[test]
    fn add_entry_rejects_duplicates_without_overwrite() {
        let mut catalog = PatternCatalog::new();
        catalog.add_entry("A", CatalogEntry::Pattern(spec("A", r"(a)")), false).unwrap();
        let err = catalog.add_entry("A", CatalogEntry::Pattern(spec("A", r"(x)")), false);
        assert!(matches!(err, Err(ConfigurationError::DuplicateEntry(_))));
        catalog.add_entry("A", CatalogEntry::Pattern(spec("A", r"(x)")), true).unwrap();
    }

    #[test]
    fn set_order_rejects_unknown_names() {
        let mut catalog = PatternCatalog::new();
        catalog.add_entry("A", CatalogEntry::Pattern(spec("A", r"(a)")), false).unwrap();
        let err = catalog.set_order(vec!["A".into(), "Ghost".into()]);
        assert!(matches!(err, Err(ConfigurationError::DanglingOrderRef(name)) if name == "Ghost"));
    }

    #[test]
    fn validate_rejects_dangling_order_reference() {
        let mut catalog = PatternCatalog::new();
        catalog.add_entry("A", CatalogEntry::Pattern(spec("A", r"(a)")), false).unwrap();
        catalog.order.push("Missing".into());
        assert!(matches!(catalog.validate(), Err(ConfigurationError::DanglingOrderRef(_))));
    }

    #[test]
    fn validate_rejects_patterns_without_a_capture_group() {
        let mut catalog = PatternCatalog::new();
        catalog.add_entry("A", CatalogEntry::Pattern(spec("A", r"^a$")), false).unwrap();
        assert!(matches!(catalog.validate(), Err(ConfigurationError::MissingCaptureGroup(_))));
    }
}
