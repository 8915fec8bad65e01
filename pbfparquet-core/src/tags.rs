//! Tag maps and tag-based feature selection.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// OSM tags keyed by tag key. Ordered so written maps are deterministic.
pub type Tags = BTreeMap<String, String>;

/// Synthetic tag listing the ids of relations nested inside a relation.
pub const NESTED_RELATION_IDS_TAG: &str = "quackosm:nested_relation_ids";

/// Collect borrowed key/value pairs into an owned [`Tags`] map.
pub fn collect_tags<'a, T>(tags: T) -> Tags
where
    T: IntoIterator<Item = (&'a str, &'a str)>,
{
    tags.into_iter()
        .map(|(key, value)| (key.to_owned(), value.to_owned()))
        .collect()
}

/// Values accepted for one key of a [`TagsFilter`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TagSelector {
    /// `true` accepts any value; `false` disables the entry.
    Any(bool),
    /// Accept exactly this value.
    Value(String),
    /// Accept any of these values.
    Values(Vec<String>),
}

impl TagSelector {
    fn accepts(&self, value: &str) -> bool {
        match self {
            Self::Any(enabled) => *enabled,
            Self::Value(expected) => expected == value,
            Self::Values(expected) => expected.iter().any(|candidate| candidate == value),
        }
    }

    fn feed(&self, hasher: &mut Sha256) {
        match self {
            Self::Any(enabled) => hasher.update(if *enabled { b"?1" } else { b"?0" }),
            Self::Value(value) => {
                hasher.update(b"=");
                hasher.update(value.as_bytes());
            }
            Self::Values(values) => {
                for value in values {
                    hasher.update(b"[");
                    hasher.update(value.as_bytes());
                }
            }
        }
    }
}

/// Keep only features carrying at least one matching tag.
///
/// The JSON form mirrors the usual OSM filter notation:
///
/// ```
/// use pbfparquet_core::{Tags, TagsFilter};
///
/// let filter: TagsFilter =
///     serde_json::from_str(r#"{"building": true, "amenity": ["cafe", "bar"]}"#)?;
/// let cafe = Tags::from([("amenity".to_owned(), "cafe".to_owned())]);
/// let bank = Tags::from([("amenity".to_owned(), "bank".to_owned())]);
/// assert!(filter.matches(&cafe));
/// assert!(!filter.matches(&bank));
/// # Ok::<(), serde_json::Error>(())
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TagsFilter(BTreeMap<String, TagSelector>);

impl TagsFilter {
    /// An empty filter, which keeps every feature.
    #[must_use]
    pub const fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Add or replace the selector for `key`.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, selector: TagSelector) -> Self {
        self.0.insert(key.into(), selector);
        self
    }

    /// Whether the filter has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Whether `tags` satisfy the filter. An empty filter matches everything.
    #[must_use]
    pub fn matches(&self, tags: &Tags) -> bool {
        if self.is_empty() {
            return true;
        }
        self.0.iter().any(|(key, selector)| {
            tags.get(key)
                .is_some_and(|value| selector.accepts(value))
        })
    }

    /// Stable short digest identifying the filter in result file names.
    ///
    /// Returns `"nofilter"` for an empty filter.
    #[must_use]
    pub fn digest(&self) -> String {
        if self.is_empty() {
            return "nofilter".to_owned();
        }
        // Keys are ordered; separators keep adjacent entries distinct.
        let mut hasher = Sha256::new();
        for (key, selector) in &self.0 {
            hasher.update(key.as_bytes());
            hasher.update(b"\x1f");
            selector.feed(&mut hasher);
            hasher.update(b"\x1e");
        }
        format!("{:x}", hasher.finalize()).chars().take(12).collect()
    }
}
