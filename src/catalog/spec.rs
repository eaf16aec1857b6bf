//! Pattern specifications and their matching options.

use regex::{Regex, RegexBuilder};

use crate::ElementKind;
use crate::error::ConfigurationError;

bitflags::bitflags! {
    /// Matching options a rule file can name per pattern.
    ///
    /// The names follow the rule-file vocabulary: `IGNORECASE`, `MULTILINE`,
    /// `DOTALL`, `UNICODE`, `VERBOSE`. `UNICODE` is accepted for
    /// compatibility and is a no-op (matching is Unicode-aware by default).
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct PatternOptions: u8 {
        const IGNORECASE = 1 << 0;
        const MULTILINE  = 1 << 1;
        const DOTALL     = 1 << 2;
        const UNICODE    = 1 << 3;
        const VERBOSE    = 1 << 4;
    }
}

impl PatternOptions {
    /// Parse a list of option names as they appear in a rule file.
    pub fn from_names<S: AsRef<str>>(names: &[S]) -> Result<Self, ConfigurationError> {
        let mut options = PatternOptions::empty();
        for name in names {
            options |= match name.as_ref().to_ascii_uppercase().as_str() {
                "IGNORECASE" => PatternOptions::IGNORECASE,
                "MULTILINE" => PatternOptions::MULTILINE,
                "DOTALL" => PatternOptions::DOTALL,
                "UNICODE" => PatternOptions::UNICODE,
                "VERBOSE" => PatternOptions::VERBOSE,
                _ => return Err(ConfigurationError::UnknownOption(name.as_ref().to_string())),
            };
        }
        Ok(options)
    }

    /// The rule-file names of the set options.
    pub fn names(&self) -> Vec<&'static str> {
        let mut names = Vec::new();
        if self.contains(PatternOptions::IGNORECASE) {
            names.push("IGNORECASE");
        }
        if self.contains(PatternOptions::MULTILINE) {
            names.push("MULTILINE");
        }
        if self.contains(PatternOptions::DOTALL) {
            names.push("DOTALL");
        }
        if self.contains(PatternOptions::UNICODE) {
            names.push("UNICODE");
        }
        if self.contains(PatternOptions::VERBOSE) {
            names.push("VERBOSE");
        }
        names
    }
}

/// One immutable, named regex rule.
///
/// The pattern must contain a capturing group, and for every match group 1
/// must equal the full match. The engine relies on that invariant to slice
/// exact spans; it is checked structurally at compile time (a group must
/// exist) and semantically at match time.
#[derive(Debug, Clone, PartialEq)]
pub struct PatternSpec {
    /// Whether matches become meaningful blocks or filler spacers.
    pub kind: ElementKind,
    /// Name resolved through the element registry when a match is finalized.
    pub subtype: String,
    /// The regular-expression source text.
    pub pattern: String,
    /// Matching options applied when compiling.
    pub options: PatternOptions,
    /// Free-form note about what the rule recognizes.
    pub description: String,
}

impl PatternSpec {
    pub fn new(
        kind: ElementKind,
        subtype: impl Into<String>,
        pattern: impl Into<String>,
        options: PatternOptions,
        description: impl Into<String>,
    ) -> Self {
        PatternSpec {
            kind,
            subtype: subtype.into(),
            pattern: pattern.into(),
            options,
            description: description.into(),
        }
    }

    /// Compile the pattern with its options into a ready matcher.
    ///
    /// Fails when the pattern does not compile or lacks a capturing group.
    pub fn compile(&self) -> Result<Regex, ConfigurationError> {
        let regex = RegexBuilder::new(&self.pattern)
            .case_insensitive(self.options.contains(PatternOptions::IGNORECASE))
            .multi_line(self.options.contains(PatternOptions::MULTILINE))
            .dot_matches_new_line(self.options.contains(PatternOptions::DOTALL))
            .ignore_whitespace(self.options.contains(PatternOptions::VERBOSE))
            .build()
            .map_err(|source| ConfigurationError::InvalidPattern {
                subtype: self.subtype.clone(),
                source: Box::new(source),
            })?;
        // captures_len counts group 0, so a usable pattern reports >= 2.
        if regex.captures_len() < 2 {
            return Err(ConfigurationError::MissingCaptureGroup(self.subtype.clone()));
        }
        Ok(regex)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn option_names_round_trip() {
        let options =
            PatternOptions::from_names(&["MULTILINE", "ignorecase", "DOTALL"]).unwrap();
        assert!(options.contains(PatternOptions::MULTILINE));
        assert!(options.contains(PatternOptions::IGNORECASE));
        assert_eq!(options.names(), ["IGNORECASE", "MULTILINE", "DOTALL"]);
    }

    #[test]
    fn unknown_option_is_a_configuration_error() {
        let err = PatternOptions::from_names(&["SINGLELINE"]);
        assert!(matches!(err, Err(ConfigurationError::UnknownOption(name)) if name == "SINGLELINE"));
    }

    #[test]
    fn compile_honors_multiline_and_case() {
        let spec = PatternSpec::new(
            ElementKind::Block,
            "Test",
            r"^(final energy.*)$",
            PatternOptions::MULTILINE | PatternOptions::IGNORECASE,
            "",
        );
        let regex = spec.compile().unwrap();
        let text = "noise\nFINAL ENERGY -1.0\n";
        let m = regex.find(text).unwrap();
        assert_eq!(m.as_str(), "FINAL ENERGY -1.0");
    }

    #[test]
    fn compile_rejects_group_free_patterns() {
        let spec =
            PatternSpec::new(ElementKind::Block, "Test", r"^abc$", PatternOptions::empty(), "");
        assert!(matches!(spec.compile(), Err(ConfigurationError::MissingCaptureGroup(_))));
    }

    #[test]
    fn compile_reports_syntax_errors_with_the_subtype() {
        let spec =
            PatternSpec::new(ElementKind::Block, "Broken", r"((", PatternOptions::empty(), "");
        match spec.compile() {
            Err(ConfigurationError::InvalidPattern { subtype, .. }) => assert_eq!(subtype, "Broken"),
            other => panic!("expected InvalidPattern, got {other:?}"),
        }
    }
}
