//! Restricting a comparison to a pasted list of ids

use indexmap::IndexSet;
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

use crate::model::{CellValue, Number};

use super::join::JoinKey;

/// Split free text on commas and newlines, dropping blank tokens
pub fn parse_filter_tokens(text: &str) -> Vec<String> {
    text.split([',', '\n'])
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(str::to_string)
        .collect()
}

/// Coerce every token to a number, or give up on all of them
pub fn try_coerce_all(tokens: &[String]) -> Option<Vec<Number>> {
    tokens.iter().map(|t| Number::parse_token(t)).collect()
}

/// How filter tokens were matched against identifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterMode {
    /// Tokens coerced to numbers and compared numerically
    Numeric,
    /// Identifier column is not numeric; tokens compared as text
    Text,
    /// Identifier column is numeric but some token was not a number
    TextFallback,
}

impl std::fmt::Display for FilterMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FilterMode::Numeric => write!(f, "numeric"),
            FilterMode::Text => write!(f, "text"),
            FilterMode::TextFallback => write!(f, "text (numeric coercion failed)"),
        }
    }
}

/// What the filter did, for reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterReport {
    /// Distinct tokens in the filter
    pub tokens: usize,
    pub mode: FilterMode,
    /// Joined rows removed by the filter
    pub rows_removed: usize,
}

/// Set of identifiers to keep
#[derive(Debug, Clone)]
pub enum IdFilter {
    Numeric(FxHashSet<JoinKey>),
    Text {
        tokens: IndexSet<String>,
        fallback: bool,
    },
}

impl IdFilter {
    /// Build a filter from raw text. Numeric coercion is attempted only
    /// when the identifier column is numeric, and is all-or-nothing.
    ///
    /// Text tokens are compared with the displayed identifier, numeric
    /// columns included. Integral floats display without a fraction, so in
    /// text mode `3` selects an id read as `3.0` but the token `3.0` does not.
    pub fn build(text: &str, id_numeric: bool) -> Self {
        let tokens = parse_filter_tokens(text);

        if id_numeric {
            if let Some(numbers) = try_coerce_all(&tokens) {
                return IdFilter::Numeric(numbers.into_iter().map(JoinKey::from).collect());
            }
            log::warn!(
                "Some of the {} filter ids are not numbers; matching all of them as text",
                tokens.len()
            );
        }

        IdFilter::Text {
            tokens: tokens.into_iter().collect(),
            fallback: id_numeric,
        }
    }

    /// Check whether an identifier passes the filter
    pub fn matches(&self, id: &CellValue) -> bool {
        match self {
            IdFilter::Numeric(keys) => keys.contains(&JoinKey::of(id)),
            IdFilter::Text { tokens, .. } => {
                !id.is_null() && tokens.contains(&*id.display())
            }
        }
    }

    pub fn mode(&self) -> FilterMode {
        match self {
            IdFilter::Numeric(_) => FilterMode::Numeric,
            IdFilter::Text { fallback: true, .. } => FilterMode::TextFallback,
            IdFilter::Text { fallback: false, .. } => FilterMode::Text,
        }
    }

    /// Number of distinct tokens
    pub fn len(&self) -> usize {
        match self {
            IdFilter::Numeric(keys) => keys.len(),
            IdFilter::Text { tokens, .. } => tokens.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_filter_tokens() {
        assert_eq!(
            parse_filter_tokens(" 1, 3\n\n 7 ,,\r\n9"),
            vec!["1", "3", "7", "9"]
        );
        assert!(parse_filter_tokens(" , \n ").is_empty());
    }

    #[test]
    fn test_try_coerce_all() {
        let tokens = vec!["1".to_string(), "2.5".to_string()];
        assert_eq!(
            try_coerce_all(&tokens),
            Some(vec![Number::Int(1), Number::Float(2.5)])
        );

        let tokens = vec!["1".to_string(), "abc".to_string()];
        assert_eq!(try_coerce_all(&tokens), None);
    }

    #[test]
    fn test_numeric_filter() {
        let filter = IdFilter::build("1, 3", true);
        assert_eq!(filter.mode(), FilterMode::Numeric);
        assert!(filter.matches(&CellValue::Int(1)));
        assert!(filter.matches(&CellValue::Float(3.0)));
        assert!(!filter.matches(&CellValue::Int(2)));
    }

    #[test]
    fn test_decimal_tokens_match_floats() {
        let filter = IdFilter::build("2.5\n4.0", true);
        assert!(filter.matches(&CellValue::Float(2.5)));
        assert!(filter.matches(&CellValue::Int(4)));
    }

    #[test]
    fn test_one_bad_token_disables_coercion() {
        let filter = IdFilter::build("1, x", true);
        assert_eq!(filter.mode(), FilterMode::TextFallback);
        assert_eq!(filter.len(), 2);
        // text matching still compares against the displayed id
        assert!(filter.matches(&CellValue::Int(1)));
        assert!(!filter.matches(&CellValue::Int(2)));
    }

    #[test]
    fn test_text_fallback_compares_displayed_ids() {
        let filter = IdFilter::build("3.0, x", true);
        assert_eq!(filter.mode(), FilterMode::TextFallback);
        assert!(!filter.matches(&CellValue::Float(3.0)));

        let filter = IdFilter::build("3, x", true);
        assert!(filter.matches(&CellValue::Float(3.0)));
        assert!(filter.matches(&CellValue::Int(3)));
    }

    #[test]
    fn test_text_filter() {
        let filter = IdFilter::build("a-1\nb-2, a-1", false);
        assert_eq!(filter.mode(), FilterMode::Text);
        assert_eq!(filter.len(), 2);
        assert!(filter.matches(&CellValue::from("b-2")));
        assert!(!filter.matches(&CellValue::from("c-3")));
        assert!(!filter.matches(&CellValue::Null));
    }
}
