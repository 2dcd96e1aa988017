//! Typed attribute records for planning areas
//!
//! Records arrive as loosely typed attribute maps (GeoJSON properties or CSV
//! rows). The attributes every part of the map relies on get named fields;
//! everything else is kept verbatim in a side map so filters can still reach it.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Attribute names with dedicated fields
pub const ID: &str = "ID";
pub const COUNTRY: &str = "Country";
pub const SCALE: &str = "Scale";
pub const STATUS: &str = "Status";
pub const LOCATION: &str = "Location";
pub const LATITUDE: &str = "Latitude";
pub const LONGITUDE: &str = "Longitude";

/// A single planning-area record. Immutable once loaded.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FeatureRecord {
    pub id: Option<String>,
    pub country: Option<String>,
    pub scale: Option<String>,
    pub status: Option<String>,
    pub location: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    /// Every attribute without a dedicated field
    #[serde(default)]
    pub extra: BTreeMap<String, String>,
}

impl FeatureRecord {
    /// Build a record from raw attribute pairs.
    ///
    /// Empty values are treated as absent. Coordinates that do not parse as
    /// numbers are dropped.
    pub fn from_attributes<K, V, I>(attributes: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut record = FeatureRecord::default();
        for (key, value) in attributes {
            let key = key.into();
            let value = value.into();
            let trimmed = value.trim();
            if trimmed.is_empty() {
                continue;
            }
            match key.as_str() {
                ID => record.id = Some(trimmed.to_string()),
                COUNTRY => record.country = Some(value),
                SCALE => record.scale = Some(value),
                STATUS => record.status = Some(value),
                LOCATION => record.location = Some(value),
                LATITUDE => record.latitude = parse_coordinate(trimmed),
                LONGITUDE => record.longitude = parse_coordinate(trimmed),
                _ => {
                    record.extra.insert(key, value);
                }
            }
        }
        record
    }

    /// Build a record from GeoJSON feature properties.
    ///
    /// Non-string JSON values are stored in their JSON text form, nulls are skipped.
    pub fn from_json_properties(properties: &serde_json::Map<String, serde_json::Value>) -> Self {
        Self::from_attributes(properties.iter().filter_map(|(key, value)| {
            let text = match value {
                serde_json::Value::Null => return None,
                serde_json::Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            Some((key.clone(), text))
        }))
    }

    /// Read an attribute by its source name
    ///
    /// Coordinates are numeric and not reachable through this accessor.
    pub fn attribute(&self, name: &str) -> Option<&str> {
        match name {
            ID => self.id.as_deref(),
            COUNTRY => self.country.as_deref(),
            SCALE => self.scale.as_deref(),
            STATUS => self.status.as_deref(),
            LOCATION => self.location.as_deref(),
            _ => self.extra.get(name).map(String::as_str),
        }
    }

    /// Both coordinates, when present
    #[inline]
    pub fn coordinates(&self) -> Option<(f64, f64)> {
        Some((self.latitude?, self.longitude?))
    }

    /// Whether this record carries the given status
    #[inline]
    pub fn has_status(&self, status: &str) -> bool {
        self.status.as_deref() == Some(status)
    }
}

/// Parse an identifier as a number, the way ids are ordered on ingestion
#[inline]
pub fn parse_numeric_id(id: &str) -> Option<f64> {
    id.trim().parse::<f64>().ok().filter(|n| n.is_finite())
}

fn parse_coordinate(value: &str) -> Option<f64> {
    value.parse::<f64>().ok().filter(|n| n.is_finite())
}
