//! OSM PBF ingestion into an in-memory [`OsmDataset`].
//!
//! The first pass decodes blobs in parallel and keeps tagged nodes, every way
//! and every relation. A second, sequential pass fetches the coordinates of
//! untagged nodes that assembly will need.

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use geo::{Coord, Rect};
use log::{debug, warn};
use osmpbf::{Element, ElementReader};
use pbfparquet_core::{ConversionOptions, OsmDataset, validated_coord};
use thiserror::Error;

mod accumulator;

use accumulator::{CoordinateResolver, OsmDatasetAccumulator};

/// Summary of raw OSM elements discovered during ingestion.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct OsmIngestSummary {
    /// Number of nodes discovered, including dense-node entries.
    pub nodes: u64,
    /// Number of ways discovered.
    pub ways: u64,
    /// Number of relations discovered.
    pub relations: u64,
    /// Bounding box covering all valid node coordinates, if any nodes were present.
    /// Coordinates are WGS84 with `x = longitude`, `y = latitude`.
    pub bounds: Option<Rect<f64>>,
}

impl OsmIngestSummary {
    fn combine(mut self, other: Self) -> Self {
        self.nodes += other.nodes;
        self.ways += other.ways;
        self.relations += other.relations;
        if let Some(bounds) = other.bounds {
            self.include_bounds(bounds);
        }
        self
    }

    fn include_bounds(&mut self, bounds: Rect<f64>) {
        match &mut self.bounds {
            Some(existing) => {
                let min = Coord {
                    x: existing.min().x.min(bounds.min().x),
                    y: existing.min().y.min(bounds.min().y),
                };
                let max = Coord {
                    x: existing.max().x.max(bounds.max().x),
                    y: existing.max().y.max(bounds.max().y),
                };
                *existing = Rect::new(min, max);
            }
            None => self.bounds = Some(bounds),
        }
    }

    fn record_node(&mut self, lon: f64, lat: f64) {
        self.nodes += 1;
        if let Some(coordinate) = validated_coord(lon, lat) {
            self.include_bounds(Rect::new(coordinate, coordinate));
        }
    }

    fn record_way(&mut self) {
        self.ways += 1;
    }

    fn record_relation(&mut self) {
        self.relations += 1;
    }
}

/// Everything read from a PBF file for one conversion.
#[derive(Debug, Clone, PartialEq)]
pub struct OsmIngestReport {
    /// Element counts and bounding box information.
    pub summary: OsmIngestSummary,
    /// Tagged nodes, ways, relations and resolved coordinates.
    pub dataset: OsmDataset,
    /// Referenced nodes whose coordinates were absent or invalid.
    pub unresolved_nodes: usize,
}

/// Errors returned when ingesting an OSM PBF file.
#[derive(Debug, Error)]
pub enum OsmIngestError {
    /// The file could not be opened.
    #[error("failed to open OSM PBF file at {path:?}")]
    Open {
        /// Underlying reader error.
        #[source]
        source: osmpbf::Error,
        /// Path that failed to open.
        path: PathBuf,
    },
    /// The file opened but its blobs could not be decoded.
    #[error("failed to decode OSM PBF data at {path:?}")]
    Decode {
        /// Underlying reader error.
        #[source]
        source: osmpbf::Error,
        /// Path being decoded.
        path: PathBuf,
    },
}

type PbfReader = ElementReader<BufReader<File>>;

fn open_reader(path: &Path) -> Result<PbfReader, OsmIngestError> {
    ElementReader::from_path(path).map_err(|source| OsmIngestError::Open {
        source,
        path: path.to_path_buf(),
    })
}

/// Read a PBF file into an [`OsmDataset`] ready for assembly.
///
/// Node coordinates are resolved for every node `options` make assembly ask
/// for; references that stay unresolved are counted, not fatal.
///
/// # Examples
/// ```no_run
/// use std::path::Path;
/// use pbfparquet_core::ConversionOptions;
/// use pbfparquet_data::load_osm_dataset;
///
/// # fn main() -> Result<(), pbfparquet_data::OsmIngestError> {
/// let report = load_osm_dataset(Path::new("monaco.osm.pbf"), &ConversionOptions::default())?;
/// let (nodes, ways, relations) = report.dataset.counts();
/// assert!(nodes + ways + relations > 0);
/// # Ok(())
/// # }
/// ```
pub fn load_osm_dataset(
    path: &Path,
    options: &ConversionOptions,
) -> Result<OsmIngestReport, OsmIngestError> {
    let accumulator = open_reader(path)?
        .par_map_reduce(
            |element| {
                let mut accumulator = OsmDatasetAccumulator::default();
                accumulator.process_element(element);
                accumulator
            },
            OsmDatasetAccumulator::default,
            OsmDatasetAccumulator::combine,
        )
        .map_err(|source| OsmIngestError::Decode {
            source,
            path: path.to_path_buf(),
        })?;
    let (summary, mut dataset) = accumulator.into_parts();

    let pending = dataset.missing_coordinates(options);
    let mut unresolved_nodes = 0;
    if !pending.is_empty() {
        debug!("Resolving {} untagged node coordinates", pending.len());
        let mut resolver = CoordinateResolver::new(pending, &mut dataset);
        open_reader(path)?
            .for_each(|element| match element {
                Element::Node(node) => resolver.resolve(node.id(), node.lon(), node.lat()),
                Element::DenseNode(node) => resolver.resolve(node.id(), node.lon(), node.lat()),
                Element::Way(_) | Element::Relation(_) => {}
            })
            .map_err(|source| OsmIngestError::Decode {
                source,
                path: path.to_path_buf(),
            })?;
        unresolved_nodes = resolver.pending_count();
        if unresolved_nodes > 0 {
            warn!("Skipped {unresolved_nodes} node references without coordinates");
        }
    }

    Ok(OsmIngestReport {
        summary,
        dataset,
        unresolved_nodes,
    })
}

#[cfg(test)]
mod tests;
