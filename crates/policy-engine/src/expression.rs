//! Policy Expression Parsing and Matching
//!
//! The grammar is `Policy := Clause (OR Clause)*`,
//! `Clause := Condition (AND Condition)*`,
//! `Condition := "role:" Role | "attribute:" Attribute`.
//! Keywords are case-insensitive and must stand alone between whitespace;
//! condition values compare case-sensitively after trimming.
//!
//! Parsing is total: malformed input never errors, it simply fails to
//! match (with one deliberate exception noted on [`Condition::Unrecognized`]).

use serde::{Deserialize, Serialize};
use tracing::debug;

/// One equality condition inside a clause
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Condition {
    /// `role:` prefix; satisfied when the caller's role equals the suffix
    Role(String),
    /// `attribute:` prefix; satisfied when the caller's attribute equals the suffix
    Attribute(String),
    /// A condition with neither prefix. Known weakness kept for
    /// compatibility: such a condition is treated as satisfied, so a
    /// typo'd condition (`Role:` with a capital R, say) silently widens
    /// the clause instead of denying it.
    Unrecognized(String),
}

impl Condition {
    fn parse(raw: &str) -> Self {
        if let Some(role) = raw.strip_prefix("role:") {
            Condition::Role(role.trim().to_string())
        } else if let Some(attribute) = raw.strip_prefix("attribute:") {
            Condition::Attribute(attribute.trim().to_string())
        } else {
            Condition::Unrecognized(raw.to_string())
        }
    }

    /// Whether the condition holds for the given caller
    pub fn is_satisfied(&self, role: &str, attribute: &str) -> bool {
        match self {
            Condition::Role(required) => role == required,
            Condition::Attribute(required) => attribute == required,
            Condition::Unrecognized(_) => true,
        }
    }
}

/// An AND-conjunction of conditions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Clause {
    pub conditions: Vec<Condition>,
}

impl Clause {
    fn parse(raw: &str) -> Self {
        Self {
            conditions: split_keyword(raw, "AND")
                .into_iter()
                .map(Condition::parse)
                .collect(),
        }
    }

    /// A clause holds iff every condition in it holds
    pub fn is_satisfied(&self, role: &str, attribute: &str) -> bool {
        self.conditions
            .iter()
            .all(|c| c.is_satisfied(role, attribute))
    }
}

/// A parsed policy: OR across clauses, AND within each.
///
/// Policies are stored as strings and normally parsed fresh per
/// evaluation via [`evaluate`]; this precompiled form exists for callers
/// that evaluate one policy against many requests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicyExpression {
    pub clauses: Vec<Clause>,
}

impl PolicyExpression {
    /// Parse a policy string. Total; never fails.
    ///
    /// The empty string parses to a policy with no clauses, which
    /// matches nothing.
    pub fn parse(policy: &str) -> Self {
        if policy.is_empty() {
            return Self { clauses: Vec::new() };
        }
        Self {
            clauses: split_keyword(policy, "OR")
                .into_iter()
                .map(Clause::parse)
                .collect(),
        }
    }

    /// Whether the policy has no clauses at all
    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }

    /// Grant iff at least one clause is fully satisfied
    pub fn matches(&self, role: &str, attribute: &str) -> bool {
        self.clauses
            .iter()
            .any(|clause| clause.is_satisfied(role, attribute))
    }
}

/// Evaluate a policy string for a caller.
///
/// Missing/empty policies deny. Anything else is parsed on the spot;
/// there is no cached state between calls.
pub fn evaluate(policy: &str, role: &str, attribute: &str) -> bool {
    if policy.is_empty() {
        return false;
    }
    let granted = PolicyExpression::parse(policy).matches(role, attribute);
    debug!(policy, role, attribute, granted, "policy evaluated");
    granted
}

/// Split on a keyword that stands alone between whitespace, matched
/// case-insensitively. A keyword at the very start or end of the input
/// has no whitespace on one side and is not a separator. Each split
/// consumes the whitespace run after the keyword, so a second keyword
/// immediately following the first is part of the next fragment, not
/// another separator. Returned parts are trimmed.
fn split_keyword<'a>(input: &'a str, keyword: &str) -> Vec<&'a str> {
    let haystack = input.to_ascii_lowercase();
    let needle = keyword.to_ascii_lowercase();
    let bytes = haystack.as_bytes();

    let mut parts = Vec::new();
    let mut part_start = 0;
    let mut search_from = 0;

    while let Some(found) = haystack[search_from..].find(&needle) {
        let at = search_from + found;
        let end = at + needle.len();

        let ws_before = at > part_start && bytes[at - 1].is_ascii_whitespace();
        let ws_after = end < bytes.len() && bytes[end].is_ascii_whitespace();

        if ws_before && ws_after {
            parts.push(input[part_start..at].trim());
            let mut next = end;
            while next < bytes.len() && bytes[next].is_ascii_whitespace() {
                next += 1;
            }
            part_start = next;
            search_from = next;
        } else {
            search_from = end;
        }
    }

    parts.push(input[part_start..].trim());
    parts
}
