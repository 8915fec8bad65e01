//! Conversion options and the result file naming they imply.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::TagsFilter;

/// File-name marker appended when non-closed relations are included.
pub const NON_CLOSED_RELATIONS_SUFFIX: &str = "_nonclosedrelas";

/// File-name marker appended when node-only relations are included.
pub const NODE_ONLY_RELATIONS_SUFFIX: &str = "_nodeonlyrelas";

/// How much progress output a conversion emits.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VerbosityMode {
    /// No progress output.
    Silent,
    /// Stage summaries only.
    #[default]
    Transient,
    /// Stage summaries plus per-stage detail.
    Verbose,
}

impl VerbosityMode {
    /// Return the mode as a lowercase `&str`.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Silent => "silent",
            Self::Transient => "transient",
            Self::Verbose => "verbose",
        }
    }

    /// Whether stage summaries are reported.
    #[must_use]
    pub const fn reports_stages(&self) -> bool {
        !matches!(self, Self::Silent)
    }

    /// Whether per-stage detail is reported.
    #[must_use]
    pub const fn reports_detail(&self) -> bool {
        matches!(self, Self::Verbose)
    }
}

impl fmt::Display for VerbosityMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown [`VerbosityMode`].
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown verbosity mode '{0}' (expected silent, transient or verbose)")]
pub struct ParseVerbosityModeError(String);

impl FromStr for VerbosityMode {
    type Err = ParseVerbosityModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "silent" => Ok(Self::Silent),
            "transient" => Ok(Self::Transient),
            "verbose" => Ok(Self::Verbose),
            _ => Err(ParseVerbosityModeError(s.to_owned())),
        }
    }
}

/// Options controlling which elements are converted and how.
///
/// Defaults keep only `multipolygon` and `boundary` relations, as areas.
///
/// # Examples
/// ```
/// use pbfparquet_core::ConversionOptions;
///
/// let options = ConversionOptions::default()
///     .with_non_closed_relations(true)
///     .with_node_only_relations(true);
/// assert_eq!(
///     options.result_file_name("monaco"),
///     "monaco_nofilter_noclip_compact_nonclosedrelas_nodeonlyrelas.parquet"
/// );
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConversionOptions {
    /// Consider every relation type and allow line-shaped relation geometries.
    pub include_non_closed_relations: bool,
    /// Emit relations made only of node members as points.
    ///
    /// Only takes effect together with
    /// [`Self::include_non_closed_relations`].
    pub include_node_only_relations: bool,
    /// Restrict features to those with matching tags.
    pub tags_filter: TagsFilter,
    /// Re-run the conversion even when a cached result exists.
    pub ignore_cache: bool,
    /// Progress reporting level.
    pub verbosity_mode: VerbosityMode,
    /// Keep the temporary working directory and its statistics file.
    pub debug_memory: bool,
    /// Log the duration of every pipeline stage.
    pub debug_times: bool,
}

impl ConversionOptions {
    /// Set [`Self::include_non_closed_relations`].
    #[must_use]
    pub const fn with_non_closed_relations(mut self, enabled: bool) -> Self {
        self.include_non_closed_relations = enabled;
        self
    }

    /// Set [`Self::include_node_only_relations`].
    #[must_use]
    pub const fn with_node_only_relations(mut self, enabled: bool) -> Self {
        self.include_node_only_relations = enabled;
        self
    }

    /// Whether node-only relations become point features.
    #[must_use]
    pub const fn emits_node_only_relations(&self) -> bool {
        self.include_node_only_relations && self.include_non_closed_relations
    }

    /// Set [`Self::tags_filter`].
    #[must_use]
    pub fn with_tags_filter(mut self, filter: TagsFilter) -> Self {
        self.tags_filter = filter;
        self
    }

    /// Set [`Self::ignore_cache`].
    #[must_use]
    pub const fn with_ignore_cache(mut self, ignore: bool) -> Self {
        self.ignore_cache = ignore;
        self
    }

    /// Set [`Self::verbosity_mode`].
    #[must_use]
    pub const fn with_verbosity(mut self, mode: VerbosityMode) -> Self {
        self.verbosity_mode = mode;
        self
    }

    /// Set [`Self::debug_memory`].
    #[must_use]
    pub const fn with_debug_memory(mut self, enabled: bool) -> Self {
        self.debug_memory = enabled;
        self
    }

    /// Set [`Self::debug_times`].
    #[must_use]
    pub const fn with_debug_times(mut self, enabled: bool) -> Self {
        self.debug_times = enabled;
        self
    }

    /// Name of the result file for an input whose stem is `stem`.
    ///
    /// Only options that change the produced rows take part in the name, so
    /// diagnostic toggles share a cache entry.
    #[must_use]
    pub fn result_file_name(&self, stem: &str) -> String {
        let mut name = format!("{stem}_{}_noclip_compact", self.tags_filter.digest());
        if self.include_non_closed_relations {
            name.push_str(NON_CLOSED_RELATIONS_SUFFIX);
        }
        if self.include_node_only_relations {
            name.push_str(NODE_ONLY_RELATIONS_SUFFIX);
        }
        name.push_str(".parquet");
        name
    }
}

/// Strip `.osm.pbf` or `.pbf` from a file name to obtain the result stem.
///
/// # Examples
/// ```
/// use pbfparquet_core::pbf_stem;
///
/// assert_eq!(pbf_stem("monaco-latest.osm.pbf"), "monaco-latest");
/// assert_eq!(pbf_stem("extract.pbf"), "extract");
/// assert_eq!(pbf_stem("raw"), "raw");
/// ```
#[must_use]
pub fn pbf_stem(file_name: &str) -> &str {
    file_name
        .strip_suffix(".osm.pbf")
        .or_else(|| file_name.strip_suffix(".pbf"))
        .unwrap_or(file_name)
}
