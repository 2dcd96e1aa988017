//! Data loading for planning areas
//!
//! Areas with a drawn boundary come as one GeoJSON layer per area; the full
//! area table comes as CSV with optional `Latitude`/`Longitude` columns for
//! areas that only have a location.

use crate::{DataError, FeatureRecord, Result};
use geo::{Geometry, MultiPolygon, Polygon};
use geojson::GeoJson;
use rayon::prelude::*;
use std::io::Read;
use std::path::{Path, PathBuf};

/// Property holding the area id of a GeoJSON layer
pub const SOURCE_ID_PROPERTY: &str = "csv_id";

/// One area with a polygonal boundary
#[derive(Debug, Clone)]
pub struct PolygonRecord {
    /// Id of the area in the area table
    pub source_id: String,
    /// Properties of the layer's first feature
    pub record: FeatureRecord,
    /// All polygonal geometry of the layer, in WGS84
    pub geometry: MultiPolygon<f64>,
}

/// Everything loaded for one map
#[derive(Debug, Default)]
pub struct Dataset {
    pub polygons: Vec<PolygonRecord>,
    pub points: Vec<FeatureRecord>,
    /// Files that could not be loaded
    pub failures: Vec<(PathBuf, DataError)>,
}

impl Dataset {
    /// Load polygon layers (in parallel) and the point table
    ///
    /// A file that fails is reported in `failures`; the rest still load.
    pub fn load<P: AsRef<Path> + Sync>(polygon_paths: &[P], point_path: Option<&Path>) -> Self {
        #[cfg(feature = "profiling")]
        profiling::scope!("loader::load_dataset");

        let mut dataset = Dataset::default();

        for (path, result) in load_polygon_files(polygon_paths) {
            match result {
                Ok(polygon) => dataset.polygons.push(polygon),
                Err(e) => {
                    tracing::warn!("Failed to load polygon layer {}: {}", path.display(), e);
                    dataset.failures.push((path, e));
                }
            }
        }

        if let Some(path) = point_path {
            match load_point_file(path) {
                Ok(points) => dataset.points = points,
                Err(e) => {
                    tracing::warn!("Failed to load area table {}: {}", path.display(), e);
                    dataset.failures.push((path.to_path_buf(), e));
                }
            }
        }

        tracing::info!(
            "Loaded {} polygon layers and {} table rows ({} failures)",
            dataset.polygons.len(),
            dataset.points.len(),
            dataset.failures.len()
        );
        dataset
    }
}

/// Parse one GeoJSON layer
///
/// The area id is taken from the `csv_id` property of the first feature, or
/// `fallback_id` (typically the file stem) when absent.
pub fn load_polygon_layer<R: Read>(reader: R, fallback_id: &str) -> Result<PolygonRecord> {
    let geojson = GeoJson::from_reader(reader)
        .map_err(|e| DataError::GeoJson(geojson::Error::MalformedJson(e)))?;

    let parts: Vec<(Option<geojson::JsonObject>, Option<geojson::Geometry>)> = match geojson {
        GeoJson::FeatureCollection(collection) => collection
            .features
            .into_iter()
            .map(|feature| (feature.properties, feature.geometry))
            .collect(),
        GeoJson::Feature(feature) => vec![(feature.properties, feature.geometry)],
        GeoJson::Geometry(geometry) => vec![(None, Some(geometry))],
    };

    if parts.is_empty() {
        return Err(DataError::EmptyLayer);
    }

    let properties = parts
        .first()
        .and_then(|(properties, _)| properties.clone())
        .unwrap_or_default();
    let source_id = properties
        .get(SOURCE_ID_PROPERTY)
        .and_then(|value| match value {
            serde_json::Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
            serde_json::Value::Number(n) => Some(n.to_string()),
            _ => None,
        })
        .unwrap_or_else(|| fallback_id.to_string());
    let record = FeatureRecord::from_json_properties(&properties);

    let mut polygons = Vec::new();
    for geometry in parts.into_iter().filter_map(|(_, geometry)| geometry) {
        let geometry: Geometry<f64> = Geometry::try_from(geometry.value)?;
        collect_polygons(geometry, &mut polygons);
    }

    if polygons.is_empty() {
        return Err(DataError::InvalidGeometry(format!(
            "layer {} has no polygonal geometry",
            source_id
        )));
    }

    Ok(PolygonRecord {
        source_id,
        record,
        geometry: MultiPolygon::new(polygons),
    })
}

fn collect_polygons(geometry: Geometry<f64>, out: &mut Vec<Polygon<f64>>) {
    match geometry {
        Geometry::Polygon(polygon) => out.push(polygon),
        Geometry::MultiPolygon(multi) => out.extend(multi.0),
        Geometry::Rect(rect) => out.push(rect.to_polygon()),
        Geometry::GeometryCollection(collection) => {
            for inner in collection.0 {
                collect_polygons(inner, out);
            }
        }
        other => tracing::debug!("Ignoring non-polygonal geometry: {:?}", other),
    }
}

/// Load one GeoJSON layer from disk
pub fn load_polygon_file<P: AsRef<Path>>(path: P) -> Result<PolygonRecord> {
    let path = path.as_ref();
    let fallback_id = path
        .file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or_default();
    let file = std::fs::File::open(path)?;
    load_polygon_layer(std::io::BufReader::new(file), fallback_id)
}

/// Load many GeoJSON layers in parallel, keeping one result per file
pub fn load_polygon_files<P: AsRef<Path> + Sync>(
    paths: &[P],
) -> Vec<(PathBuf, Result<PolygonRecord>)> {
    #[cfg(feature = "profiling")]
    profiling::scope!("loader::load_polygon_files");

    paths
        .par_iter()
        .map(|path| {
            let path = path.as_ref();
            (path.to_path_buf(), load_polygon_file(path))
        })
        .collect()
}

/// Parse the area table
///
/// The first row holds attribute names. Short rows are accepted; missing
/// cells are absent attributes.
pub fn load_point_records<R: Read>(reader: R) -> Result<Vec<FeatureRecord>> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::Headers)
        .from_reader(reader);
    let headers = reader.headers()?.clone();

    let mut records = Vec::new();
    for row in reader.records() {
        let row = row?;
        records.push(FeatureRecord::from_attributes(
            headers.iter().zip(row.iter()),
        ));
    }
    Ok(records)
}

/// Load the area table from disk
pub fn load_point_file<P: AsRef<Path>>(path: P) -> Result<Vec<FeatureRecord>> {
    let file = std::fs::File::open(path.as_ref())?;
    load_point_records(std::io::BufReader::new(file))
}
