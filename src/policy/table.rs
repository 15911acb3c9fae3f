//! The externalized policy table: crisis phrases, ordered category rules,
//! and the fallback response.
//!
//! The table ships with compiled-in German defaults and can be replaced
//! wholesale from a JSON file, so the routing policy is tunable without
//! touching any rendering or channel code.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::PolicyError;

/// Which agent persona a canned response is attributed to.
///
/// Mirrors the visual treatment of the widget: each category has its own
/// badge and display name. The router only ever emits `Orchestrator`,
/// `Information`, `HelpFinder`, and (crisis path) `Safety`; the remaining
/// variants exist for display parity with the rendering layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ResponseCategory {
    Orchestrator,
    Information,
    HelpFinder,
    Resource,
    Safety,
    Validation,
}

impl ResponseCategory {
    /// Display name shown next to agent message bubbles.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Orchestrator => "Orchestrator",
            Self::Information => "Info-Agent",
            Self::HelpFinder => "Hilfe-Finder",
            Self::Resource => "Ressourcen-Agent",
            Self::Safety => "Sicherheits-Agent",
            Self::Validation => "Validierungs-Agent",
        }
    }

    /// Short label for logging.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Orchestrator => "orchestrator",
            Self::Information => "information",
            Self::HelpFinder => "help-finder",
            Self::Resource => "resource",
            Self::Safety => "safety",
            Self::Validation => "validation",
        }
    }
}

/// One ordered entry of the category check: a pattern set, the category
/// it selects, and the fixed response text.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResponseRule {
    /// Substrings matched case-insensitively against the user text.
    pub patterns: Vec<String>,
    /// Category assigned when any pattern matches.
    pub category: ResponseCategory,
    /// Canned response text for this category.
    pub response: String,
}

/// Response used when no rule matches.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FallbackRule {
    pub category: ResponseCategory,
    pub response: String,
}

/// The complete routing policy as configuration data.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PolicyTable {
    /// Phrases that force the crisis path. Checked before any rule.
    pub crisis_phrases: Vec<String>,
    /// Lead text presented with the crisis resource directory.
    pub crisis_notice: String,
    /// Category rules, checked in order. First match wins.
    pub rules: Vec<ResponseRule>,
    /// Default category and text when nothing matches.
    pub fallback: FallbackRule,
}

impl Default for PolicyTable {
    fn default() -> Self {
        Self {
            crisis_phrases: [
                "umbringen",
                "kann nicht mehr",
                "möchte nicht mehr leben",
                "selbstmord",
                "suizid",
                "töten",
                "sterben will",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            crisis_notice: "Du bist nicht allein. Es gibt Menschen, die dir helfen möchten. \
                Bei Gedanken an Selbstverletzung oder Suizid wende dich bitte sofort an eines \
                der folgenden Hilfsangebote."
                .to_string(),
            rules: vec![
                ResponseRule {
                    patterns: vec!["hilfe".to_string(), "unterstützung".to_string()],
                    category: ResponseCategory::HelpFinder,
                    response: "Ich verstehe, dass du nach Hilfe suchst. Um dir die passende \
                        Unterstützung zu empfehlen, möchte ich dir ein paar Fragen stellen. \
                        Wie lange fühlst du dich schon so? Beeinträchtigt das deinen Alltag?"
                        .to_string(),
                },
                ResponseRule {
                    patterns: vec!["depression".to_string(), "angst".to_string()],
                    category: ResponseCategory::Information,
                    response: "Das sind wichtige Themen. Depression und Angststörungen sind \
                        häufige psychische Erkrankungen, die gut behandelbar sind. Möchtest du \
                        mehr über die Symptome erfahren oder suchst du nach konkreter Hilfe?"
                        .to_string(),
                },
            ],
            fallback: FallbackRule {
                category: ResponseCategory::Orchestrator,
                response: "Danke für deine Nachricht. Ich bin hier, um dir zu helfen. Kannst \
                    du mir etwas mehr darüber erzählen, womit du dich beschäftigst?"
                    .to_string(),
            },
        }
    }
}

impl PolicyTable {
    /// Load a policy table from a JSON file.
    pub fn load_from_file(path: &Path) -> Result<Self, PolicyError> {
        let contents = fs::read_to_string(path).map_err(|source| PolicyError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let table: PolicyTable =
            serde_json::from_str(&contents).map_err(|source| PolicyError::Parse {
                path: path.to_path_buf(),
                source,
            })?;

        table.validate()?;
        Ok(table)
    }

    /// Check the table for entries that would make routing degenerate.
    pub fn validate(&self) -> Result<(), PolicyError> {
        if self.crisis_phrases.is_empty() {
            return Err(PolicyError::Invalid("crisis phrase list is empty".into()));
        }
        if self.crisis_phrases.iter().any(|p| p.trim().is_empty()) {
            return Err(PolicyError::Invalid("blank crisis phrase".into()));
        }
        for (i, rule) in self.rules.iter().enumerate() {
            if rule.patterns.is_empty() {
                return Err(PolicyError::Invalid(format!("rule {i} has no patterns")));
            }
            if rule.patterns.iter().any(|p| p.trim().is_empty()) {
                return Err(PolicyError::Invalid(format!("rule {i} has a blank pattern")));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn default_table_is_valid() {
        assert!(PolicyTable::default().validate().is_ok());
    }

    #[test]
    fn default_table_keeps_group_order() {
        let table = PolicyTable::default();
        assert_eq!(table.rules[0].category, ResponseCategory::HelpFinder);
        assert_eq!(table.rules[1].category, ResponseCategory::Information);
    }

    #[test]
    fn empty_crisis_list_is_rejected() {
        let table = PolicyTable {
            crisis_phrases: vec![],
            ..PolicyTable::default()
        };
        assert!(matches!(table.validate(), Err(PolicyError::Invalid(_))));
    }

    #[test]
    fn rule_without_patterns_is_rejected() {
        let mut table = PolicyTable::default();
        table.rules[0].patterns.clear();
        assert!(matches!(table.validate(), Err(PolicyError::Invalid(_))));
    }

    #[test]
    fn loads_from_json_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        let json = serde_json::to_string(&PolicyTable::default()).unwrap();
        file.write_all(json.as_bytes()).unwrap();

        let table = PolicyTable::load_from_file(file.path()).unwrap();
        assert_eq!(table.rules.len(), 2);
        assert!(table.crisis_phrases.contains(&"suizid".to_string()));
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"{not json").unwrap();

        let err = PolicyTable::load_from_file(file.path()).unwrap_err();
        assert!(matches!(err, PolicyError::Parse { .. }));
    }

    #[test]
    fn missing_file_is_a_read_error() {
        let err = PolicyTable::load_from_file(Path::new("/nonexistent/policy.json")).unwrap_err();
        assert!(matches!(err, PolicyError::Read { .. }));
    }

    #[test]
    fn category_serializes_kebab_case() {
        let json = serde_json::to_value(ResponseCategory::HelpFinder).unwrap();
        assert_eq!(json, "help-finder");
    }
}
