//! Blueprint expansion: one structural template, many literal anchors.
//!
//! Program outputs contain families of look-alike regions that differ only in
//! one literal line ("paragraph starting with `Program Version`", "paragraph
//! starting with `With contributions from`", ...). A blueprint captures the
//! shared regex skeleton once and stamps out a [`PatternSpec`] per anchor,
//! with the anchor's name as the produced subtype.

use std::collections::BTreeMap;

use crate::ElementKind;
use crate::error::ConfigurationError;

use super::spec::{PatternOptions, PatternSpec};

/// The shared regex skeleton: `prefix` + anchor text + `suffix`.
#[derive(Debug, Clone, PartialEq)]
pub struct BlueprintTemplate {
    pub prefix: String,
    pub suffix: String,
    pub options: PatternOptions,
}

/// A family of structurally identical patterns.
#[derive(Debug, Clone, PartialEq)]
pub struct PatternBlueprint {
    /// Names, in the order their expanded patterns are applied.
    pub order: Vec<String>,
    pub template: BlueprintTemplate,
    /// Name -> literal anchor text inserted into the template.
    pub anchor_texts: BTreeMap<String, String>,
    pub description: String,
}

impl PatternBlueprint {
    pub fn new(
        order: Vec<String>,
        template: BlueprintTemplate,
        anchor_texts: BTreeMap<String, String>,
        description: impl Into<String>,
    ) -> Self {
        PatternBlueprint { order, template, anchor_texts, description: description.into() }
    }

    /// Number of patterns this blueprint expands to.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    fn instantiate(&self, name: &str) -> Result<PatternSpec, ConfigurationError> {
        let anchor = self
            .anchor_texts
            .get(name)
            .ok_or_else(|| ConfigurationError::MissingAnchorText(name.to_string()))?;
        let pattern = format!("{}{}{}", self.template.prefix, anchor, self.template.suffix);
        Ok(PatternSpec::new(
            ElementKind::Block,
            name,
            pattern,
            self.template.options,
            self.description.clone(),
        ))
    }

    /// Expand into one [`PatternSpec`] per ordered anchor.
    pub fn expand(&self) -> Result<Vec<PatternSpec>, ConfigurationError> {
        self.order.iter().map(|name| self.instantiate(name)).collect()
    }

    /// Check anchors and the combined patterns without keeping the expansion.
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        for name in &self.order {
            self.instantiate(name)?.compile()?;
        }
        for name in self.anchor_texts.keys() {
            if !self.order.iter().any(|ordered| ordered == name) {
                tracing::warn!(target: "chemsect", "blueprint anchor `{name}` is defined but not reachable from `order`");
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paragraph_blueprint() -> PatternBlueprint {
        PatternBlueprint::new(
            vec!["BlockVersion".into(), "BlockContributions".into()],
            BlueprintTemplate {
                prefix: r"^([ \t]*".into(),
                suffix: r"[^\n]*\n(?:[ \t]*[^ \t\n][^\n]*\n)*)".into(),
                options: PatternOptions::MULTILINE,
            },
            BTreeMap::from([
                ("BlockVersion".to_string(), "Program Version".to_string()),
                ("BlockContributions".to_string(), "With contributions from".to_string()),
            ]),
            "Paragraph starting with the given literal line.",
        )
    }

    #[test]
    fn expansion_follows_declared_order() {
        let specs = paragraph_blueprint().expand().unwrap();
        let subtypes: Vec<_> = specs.iter().map(|s| s.subtype.as_str()).collect();
        assert_eq!(subtypes, ["BlockVersion", "BlockContributions"]);
        assert!(specs[0].pattern.contains("Program Version"));
        assert_eq!(specs[0].kind, ElementKind::Block);
        assert_eq!(specs[0].options, PatternOptions::MULTILINE);
    }

    #[test]
    fn missing_anchor_text_is_a_configuration_error() {
        let mut blueprint = paragraph_blueprint();
        blueprint.order.push("BlockGhost".into());
        assert!(matches!(
            blueprint.validate(),
            Err(ConfigurationError::MissingAnchorText(name)) if name == "BlockGhost"
        ));
    }

    #[test]
    fn expanded_patterns_capture_their_whole_match() {
        let specs = paragraph_blueprint().expand().unwrap();
        let regex = specs[0].compile().unwrap();
        let text = "Program Version 5.0.0\n(SVN: $Rev: 19529$)\n\nrest\n";
        let caps = regex.captures(text).unwrap();
        assert_eq!(caps.get(1).unwrap().as_str(), caps.get(0).unwrap().as_str());
        assert_eq!(caps.get(0).unwrap().as_str(), "Program Version 5.0.0\n(SVN: $Rev: 19529$)\n");
    }
}
