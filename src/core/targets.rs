// src/core/targets.rs

use crate::models::TargetSet;
use regex::RegexBuilder;
use std::collections::HashSet;
use thiserror::Error;

/// A pattern that selects nothing or does not compile.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TargetError {
    /// No name in the universe contains the pattern.
    #[error("No target matches '{0}'.")]
    NoMatch(String),
    /// Regex mode only.
    #[error("Invalid pattern '{pattern}': {reason}")]
    InvalidPattern {
        /// The pattern as typed.
        pattern: String,
        /// The regex compiler's message.
        reason: String,
    },
}

type Matcher = Box<dyn Fn(&str) -> bool>;

/// Bulk resolution: an empty request means the whole universe, in the order the
/// runtime reported it. Otherwise the request is deduplicated by first occurrence.
///
/// Requested names are not checked against the universe here. Unknown names are
/// left for the runtime to reject.
pub fn resolve(requested: &[String], universe: &[String]) -> TargetSet {
    let resolved = if requested.is_empty() {
        universe.to_vec()
    } else {
        dedup_first(requested)
    };
    TargetSet {
        requested: requested.to_vec(),
        resolved,
        universe: universe.to_vec(),
    }
}

/// Quick-exec resolution: the first name in enumeration order that contains
/// `pattern`, ignoring case.
pub fn first_match(pattern: &str, universe: &[String]) -> Result<String, TargetError> {
    let needle = pattern.to_lowercase();
    universe
        .iter()
        .find(|name| name.to_lowercase().contains(&needle))
        .cloned()
        .ok_or_else(|| TargetError::NoMatch(pattern.to_string()))
}

/// Pattern-set resolution used by log filtering.
///
/// Exact mode matches a name iff some pattern equals it. Regex mode anchors each
/// pattern to the whole name. Results follow universe order, not pattern order.
/// No patterns selects the whole universe.
pub fn resolve_many(
    patterns: &[String],
    universe: &[String],
    regex_mode: bool,
) -> Result<Vec<String>, TargetError> {
    if patterns.is_empty() {
        return Ok(dedup_first(universe));
    }

    let matchers: Vec<Matcher> = if regex_mode {
        patterns
            .iter()
            .map(|pattern| -> Result<Matcher, TargetError> {
                let re = RegexBuilder::new(&format!("^(?:{})$", pattern))
                    .build()
                    .map_err(|e| TargetError::InvalidPattern {
                        pattern: pattern.clone(),
                        reason: e.to_string(),
                    })?;
                Ok(Box::new(move |name: &str| re.is_match(name)) as Matcher)
            })
            .collect::<Result<_, TargetError>>()?
    } else {
        patterns
            .iter()
            .map(|pattern| {
                let pattern = pattern.clone();
                Box::new(move |name: &str| name == pattern) as Matcher
            })
            .collect()
    };

    let matched: Vec<String> = universe
        .iter()
        .filter(|name| matchers.iter().any(|m| m(name.as_str())))
        .cloned()
        .collect();

    if matched.is_empty() {
        return Err(TargetError::NoMatch(patterns.join(", ")));
    }
    Ok(dedup_first(&matched))
}

fn dedup_first(items: &[String]) -> Vec<String> {
    let mut seen = HashSet::new();
    items
        .iter()
        .filter(|item| seen.insert(item.as_str()))
        .cloned()
        .collect()
}
