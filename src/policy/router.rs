//! The message router.
//!
//! Decides, for each user message, whether to take the crisis path or
//! which canned response category applies:
//! 1. Crisis check — any configured crisis phrase, substring match.
//!    Pre-empts everything else.
//! 2. Category rules in table order — first matching group wins.
//! 3. Fallback category otherwise.
//!
//! Matching is pure case-insensitive substring containment, no
//! tokenization or stemming. A crisis phrase embedded in an otherwise
//! unrelated message still triggers the crisis path; in this domain
//! false positives are preferred over false negatives.

use std::path::Path;

use crate::error::PolicyError;
use crate::policy::table::{PolicyTable, ResponseCategory};

/// Outcome of routing one user message. Computed per input, consumed to
/// construct the agent reply, never stored.
#[derive(Debug, Clone)]
pub struct RoutingDecision {
    /// Whether the crisis path was taken. When set, categorized response
    /// generation is suppressed for this turn.
    pub is_crisis: bool,
    /// Category of the canned reply, or `Safety` on the crisis path.
    pub category: ResponseCategory,
    /// Canned response text, or the crisis notice.
    pub response: String,
}

/// A validated, ready-to-route policy.
#[derive(Debug, Clone)]
pub struct RoutingPolicy {
    table: PolicyTable,
}

impl RoutingPolicy {
    /// Build a policy from a table, rejecting degenerate tables.
    pub fn new(table: PolicyTable) -> Result<Self, PolicyError> {
        table.validate()?;
        Ok(Self { table })
    }

    /// Build a policy from the compiled-in default table.
    pub fn with_defaults() -> Self {
        Self {
            table: PolicyTable::default(),
        }
    }

    /// Load and validate a policy from a JSON file.
    pub fn load_from_file(path: &Path) -> Result<Self, PolicyError> {
        Ok(Self {
            table: PolicyTable::load_from_file(path)?,
        })
    }

    /// Route one user message.
    ///
    /// Empty/whitespace input is the caller's responsibility to reject;
    /// the router itself will happily fall back for it.
    pub fn route(&self, text: &str) -> RoutingDecision {
        let lower = text.to_lowercase();

        if let Some(phrase) = self
            .table
            .crisis_phrases
            .iter()
            .find(|p| lower.contains(&p.to_lowercase()))
        {
            tracing::warn!(phrase = %phrase, "Crisis phrase detected");
            return RoutingDecision {
                is_crisis: true,
                category: ResponseCategory::Safety,
                response: self.table.crisis_notice.clone(),
            };
        }

        for rule in &self.table.rules {
            if let Some(pattern) = rule
                .patterns
                .iter()
                .find(|p| lower.contains(&p.to_lowercase()))
            {
                tracing::debug!(
                    pattern = %pattern,
                    category = rule.category.label(),
                    "Message matched response rule"
                );
                return RoutingDecision {
                    is_crisis: false,
                    category: rule.category,
                    response: rule.response.clone(),
                };
            }
        }

        RoutingDecision {
            is_crisis: false,
            category: self.table.fallback.category,
            response: self.table.fallback.response.clone(),
        }
    }
}
