//! Attribute filters applied to overlays
//!
//! A [`FilterSet`] is an ordered list of `(attribute, expected value)` pairs
//! combined with logical AND. Empty values do not constrain anything.

use crate::FeatureRecord;
use crate::record::STATUS;
use indexmap::IndexMap;
use regex::Regex;
use serde::Deserialize;

/// Expected value of one filter
#[derive(Debug, Clone, Deserialize)]
#[serde(try_from = "RawFilterValue")]
pub enum FilterValue {
    /// No constraint
    Any,
    /// Attribute must equal this text exactly
    Exact(String),
    /// Attribute must match this pattern
    Pattern(Regex),
}

/// Config form of a filter value: a literal string or `{ "pattern": "..." }`
#[derive(Deserialize)]
#[serde(untagged)]
enum RawFilterValue {
    Exact(String),
    Pattern { pattern: String },
}

impl TryFrom<RawFilterValue> for FilterValue {
    type Error = regex::Error;

    fn try_from(raw: RawFilterValue) -> Result<Self, Self::Error> {
        match raw {
            RawFilterValue::Exact(text) if text.is_empty() => Ok(FilterValue::Any),
            RawFilterValue::Exact(text) => Ok(FilterValue::Exact(text)),
            RawFilterValue::Pattern { pattern } => Ok(FilterValue::Pattern(Regex::new(&pattern)?)),
        }
    }
}

impl FilterValue {
    #[inline]
    fn test(&self, attribute: &str) -> bool {
        match self {
            FilterValue::Any => true,
            FilterValue::Exact(expected) => attribute == expected,
            FilterValue::Pattern(pattern) => pattern.is_match(attribute),
        }
    }
}

/// Translation of status names offered to the user into the values records carry
#[derive(Debug, Clone, Deserialize)]
#[serde(transparent)]
pub struct StatusLookup(IndexMap<String, FilterValue>);

impl StatusLookup {
    pub fn new() -> Self {
        Self(IndexMap::new())
    }

    pub fn insert(&mut self, name: impl Into<String>, value: FilterValue) {
        self.0.insert(name.into(), value);
    }

    #[inline]
    pub fn get(&self, name: &str) -> Option<&FilterValue> {
        self.0.get(name)
    }

    /// Status names in configuration order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }
}

impl Default for StatusLookup {
    fn default() -> Self {
        let mut lookup = Self::new();
        for status in ["Active", "Pre-planning", "Completed"] {
            lookup.insert(status, FilterValue::Exact(status.to_string()));
        }
        if let Ok(pattern) = Regex::new("(?i)planning") {
            lookup.insert("Any planning stage", FilterValue::Pattern(pattern));
        }
        lookup
    }
}

/// One `(attribute, expected value)` constraint
#[derive(Debug, Clone)]
pub struct Filter {
    pub key: String,
    pub value: FilterValue,
}

impl Filter {
    /// Literal filter; an empty value leaves the attribute unconstrained
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        let value = value.into();
        let value = if value.trim().is_empty() {
            FilterValue::Any
        } else {
            FilterValue::Exact(value)
        };
        Self {
            key: key.into(),
            value,
        }
    }

    /// Pattern filter
    pub fn pattern(key: impl Into<String>, pattern: Regex) -> Self {
        Self {
            key: key.into(),
            value: FilterValue::Pattern(pattern),
        }
    }

    /// Whether this filter constrains anything
    #[inline]
    pub fn is_constraint(&self) -> bool {
        !matches!(self.value, FilterValue::Any)
    }

    /// Test one record
    ///
    /// Status literals go through the lookup first; a literal with no entry
    /// matches nothing. A missing attribute fails every constraint.
    pub fn matches(&self, record: &FeatureRecord, status_lookup: &StatusLookup) -> bool {
        let expected = match &self.value {
            FilterValue::Any => return true,
            FilterValue::Exact(literal) if self.key == STATUS => {
                match status_lookup.get(literal) {
                    Some(translated) => translated,
                    None => return false,
                }
            }
            other => other,
        };

        match record.attribute(&self.key) {
            Some(attribute) => expected.test(attribute),
            None => false,
        }
    }
}

/// Ordered filters combined with logical AND
#[derive(Debug, Clone, Default)]
pub struct FilterSet(Vec<Filter>);

impl FilterSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a filter (builder style)
    pub fn with(mut self, filter: Filter) -> Self {
        self.0.push(filter);
        self
    }

    pub fn push(&mut self, filter: Filter) {
        self.0.push(filter);
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of filters that actually constrain
    pub fn constraint_count(&self) -> usize {
        self.0.iter().filter(|f| f.is_constraint()).count()
    }

    /// Whether a record passes every filter
    pub fn matches(&self, record: &FeatureRecord, status_lookup: &StatusLookup) -> bool {
        self.0
            .iter()
            .all(|filter| filter.matches(record, status_lookup))
    }
}

impl From<Vec<Filter>> for FilterSet {
    fn from(filters: Vec<Filter>) -> Self {
        Self(filters)
    }
}

impl FromIterator<Filter> for FilterSet {
    fn from_iter<I: IntoIterator<Item = Filter>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(country: &str, status: &str) -> FeatureRecord {
        FeatureRecord::from_attributes([("ID", "1"), ("Country", country), ("Status", status)])
    }

    #[test]
    fn test_empty_value_always_passes() {
        let filter = Filter::new("Country", "");
        assert!(!filter.is_constraint());
        assert!(filter.matches(&record("Chile", "Active"), &StatusLookup::default()));
        assert!(filter.matches(&FeatureRecord::default(), &StatusLookup::default()));
    }

    #[test]
    fn test_exact_match() {
        let lookup = StatusLookup::default();
        let filter = Filter::new("Country", "Chile");
        assert!(filter.matches(&record("Chile", "Active"), &lookup));
        assert!(!filter.matches(&record("chile", "Active"), &lookup));
        assert!(!filter.matches(&record("Peru", "Active"), &lookup));
    }

    #[test]
    fn test_missing_attribute_fails() {
        let filter = Filter::new("Lead", "Ministry");
        assert!(!filter.matches(&record("Chile", "Active"), &StatusLookup::default()));
    }

    #[test]
    fn test_pattern_match() {
        let filter = Filter::pattern("Country", Regex::new("(?i)^ch").unwrap());
        let lookup = StatusLookup::default();
        assert!(filter.matches(&record("Chile", "Active"), &lookup));
        assert!(filter.matches(&record("China", "Active"), &lookup));
        assert!(!filter.matches(&record("Peru", "Active"), &lookup));
    }

    #[test]
    fn test_status_goes_through_lookup() {
        let mut lookup = StatusLookup::new();
        lookup.insert("Current", FilterValue::Exact("Active".to_string()));

        let filter = Filter::new("Status", "Current");
        assert!(filter.matches(&record("Chile", "Active"), &lookup));
        assert!(!filter.matches(&record("Chile", "Current"), &lookup));
    }

    #[test]
    fn test_status_without_lookup_entry_matches_nothing() {
        let lookup = StatusLookup::new();
        let filter = Filter::new("Status", "Active");
        assert!(!filter.matches(&record("Chile", "Active"), &lookup));
    }

    #[test]
    fn test_status_lookup_to_pattern() {
        let lookup = StatusLookup::default();
        let filter = Filter::new("Status", "Any planning stage");
        assert!(filter.matches(&record("Chile", "Pre-planning"), &lookup));
        assert!(!filter.matches(&record("Chile", "Active"), &lookup));
    }

    #[test]
    fn test_filter_set_is_conjunction() {
        let lookup = StatusLookup::default();
        let filters = FilterSet::new()
            .with(Filter::new("Country", "Chile"))
            .with(Filter::new("Scale", ""))
            .with(Filter::new("Status", "Active"));

        assert_eq!(filters.constraint_count(), 2);
        assert!(filters.matches(&record("Chile", "Active"), &lookup));
        assert!(!filters.matches(&record("Chile", "Completed"), &lookup));
        assert!(!filters.matches(&record("Peru", "Active"), &lookup));
        assert!(FilterSet::new().matches(&record("Peru", "Active"), &lookup));
    }

    #[test]
    fn test_status_lookup_from_json() {
        let json = r#"{
            "Current": "Active",
            "Planned": { "pattern": "^Pre-" },
            "Anything": ""
        }"#;
        let lookup: StatusLookup = serde_json::from_str(json).unwrap();

        assert_eq!(
            lookup.names().collect::<Vec<_>>(),
            vec!["Current", "Planned", "Anything"]
        );
        assert!(matches!(lookup.get("Planned"), Some(FilterValue::Pattern(_))));
        assert!(matches!(lookup.get("Anything"), Some(FilterValue::Any)));
    }

    #[test]
    fn test_status_lookup_rejects_bad_pattern() {
        let json = r#"{ "Broken": { "pattern": "(" } }"#;
        assert!(serde_json::from_str::<StatusLookup>(json).is_err());
    }
}
