//! Declarative JSON rule-file loading.
//!
//! A rule file is an ordered tree of named entries. Each node is a JSON
//! object with an `order` array naming its children; every other key is one
//! of:
//!
//! - a direct pattern: `{kind, subtype, pattern, options[], description}`
//! - a blueprint: `{order[], template: {prefix, suffix, options[]},
//!   anchor_texts: {name: literal, ...}, description}`
//! - a nested sub-tree (an object that itself carries an `order`).
//!
//! Files are loaded once per mode at startup and validated eagerly; a
//! malformed file never reaches segmentation.

use std::collections::BTreeMap;

use serde::Deserialize;
use serde_json::Value;

use crate::ElementKind;
use crate::error::ConfigurationError;

use super::blueprint::{BlueprintTemplate, PatternBlueprint};
use super::spec::{PatternOptions, PatternSpec};
use super::{CatalogEntry, PatternCatalog};

#[derive(Debug, Deserialize)]
struct RawPattern {
    kind: String,
    subtype: String,
    pattern: String,
    #[serde(default)]
    options: Vec<String>,
    #[serde(default)]
    description: String,
}

#[derive(Debug, Deserialize)]
struct RawTemplate {
    prefix: String,
    suffix: String,
    #[serde(default)]
    options: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct RawBlueprint {
    order: Vec<String>,
    template: RawTemplate,
    anchor_texts: BTreeMap<String, String>,
    #[serde(default)]
    description: String,
}

pub(super) fn parse(json: &str) -> Result<PatternCatalog, ConfigurationError> {
    let value: Value = serde_json::from_str(json)
        .map_err(|err| ConfigurationError::MalformedCatalog(err.to_string()))?;
    parse_group(&value)
}

fn parse_group(value: &Value) -> Result<PatternCatalog, ConfigurationError> {
    let map = value.as_object().ok_or_else(|| {
        ConfigurationError::MalformedCatalog("catalog node must be a JSON object".into())
    })?;
    let order: Vec<String> = match map.get("order") {
        Some(order) => serde_json::from_value(order.clone())
            .map_err(|err| ConfigurationError::MalformedCatalog(format!("bad `order`: {err}")))?,
        None => {
            return Err(ConfigurationError::MalformedCatalog(
                "catalog node is missing `order`".into(),
            ));
        }
    };

    let mut catalog = PatternCatalog::new();
    for (name, entry_value) in map {
        if name == "order" {
            continue;
        }
        catalog.add_entry(name.clone(), parse_entry(name, entry_value)?, false)?;
    }
    catalog.set_order(order)?;
    Ok(catalog)
}

fn parse_entry(name: &str, value: &Value) -> Result<CatalogEntry, ConfigurationError> {
    let map = value.as_object().ok_or_else(|| {
        ConfigurationError::MalformedCatalog(format!("entry `{name}` must be a JSON object"))
    })?;

    if map.contains_key("pattern") {
        let raw: RawPattern = serde_json::from_value(value.clone()).map_err(|err| {
            ConfigurationError::MalformedCatalog(format!("entry `{name}`: {err}"))
        })?;
        let spec = PatternSpec::new(
            parse_kind(name, &raw.kind)?,
            raw.subtype,
            raw.pattern,
            PatternOptions::from_names(&raw.options)?,
            raw.description,
        );
        return Ok(CatalogEntry::Pattern(spec));
    }

    if map.contains_key("template") {
        let raw: RawBlueprint = serde_json::from_value(value.clone()).map_err(|err| {
            ConfigurationError::MalformedCatalog(format!("blueprint `{name}`: {err}"))
        })?;
        let blueprint = PatternBlueprint::new(
            raw.order,
            BlueprintTemplate {
                prefix: raw.template.prefix,
                suffix: raw.template.suffix,
                options: PatternOptions::from_names(&raw.template.options)?,
            },
            raw.anchor_texts,
            raw.description,
        );
        return Ok(CatalogEntry::Blueprint(blueprint));
    }

    if map.contains_key("order") {
        return Ok(CatalogEntry::Group(parse_group(value)?));
    }

    Err(ConfigurationError::MalformedCatalog(format!(
        "entry `{name}` is neither a pattern, a blueprint, nor a sub-tree"
    )))
}

fn parse_kind(name: &str, kind: &str) -> Result<ElementKind, ConfigurationError> {
    match kind {
        "Block" => Ok(ElementKind::Block),
        "Spacer" => Ok(ElementKind::Spacer),
        other => Err(ConfigurationError::MalformedCatalog(format!(
            "entry `{name}` has unknown kind `{other}` (expected Block or Spacer)"
        ))),
    }
}
