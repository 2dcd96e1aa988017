//! Grouped layer control
//!
//! Overlays are grouped by country, then by scale. Each group can be switched
//! on and off; the resulting [`GroupVisibility`] gates filtering.

use crate::OverlayKey;
use indexmap::IndexMap;

/// Group name used when a record has no country or scale
pub const UNSPECIFIED_GROUP: &str = "Unspecified";

/// One toggleable group of overlays
#[derive(Debug, Clone, PartialEq)]
pub struct LayerGroup {
    members: Vec<OverlayKey>,
    enabled: bool,
}

impl LayerGroup {
    fn new() -> Self {
        Self {
            members: Vec::new(),
            enabled: true,
        }
    }

    #[inline]
    pub fn members(&self) -> &[OverlayKey] {
        &self.members
    }

    #[inline]
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }
}

/// Per (country, scale) on/off state
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GroupVisibility(IndexMap<String, IndexMap<String, bool>>);

impl GroupVisibility {
    /// Whether the group is switched on; `None` when the group does not exist
    pub fn get(&self, country: &str, scale: &str) -> Option<bool> {
        self.0.get(country)?.get(scale).copied()
    }

    /// Whether overlays of this group may be shown (unknown groups may not)
    #[inline]
    pub fn is_visible(&self, country: &str, scale: &str) -> bool {
        self.get(country, scale).unwrap_or(false)
    }
}

/// Overlays grouped by country and scale, in first-seen order
#[derive(Debug, Clone, Default)]
pub struct LayerControl {
    groups: IndexMap<String, IndexMap<String, LayerGroup>>,
}

impl LayerControl {
    pub fn new() -> Self {
        Self::default()
    }

    /// Put an overlay into its (country, scale) group, creating the group switched on
    pub fn insert(&mut self, country: &str, scale: &str, key: OverlayKey) {
        self.groups
            .entry(country.to_string())
            .or_default()
            .entry(scale.to_string())
            .or_insert_with(LayerGroup::new)
            .members
            .push(key);
    }

    pub fn group(&self, country: &str, scale: &str) -> Option<&LayerGroup> {
        self.groups.get(country)?.get(scale)
    }

    /// Switch a group; returns `false` when it does not exist
    pub fn set_enabled(&mut self, country: &str, scale: &str, enabled: bool) -> bool {
        match self
            .groups
            .get_mut(country)
            .and_then(|scales| scales.get_mut(scale))
        {
            Some(group) => {
                group.enabled = enabled;
                true
            }
            None => false,
        }
    }

    /// Read the current on/off state of every group
    pub fn visibility(&self) -> GroupVisibility {
        GroupVisibility(
            self.groups
                .iter()
                .map(|(country, scales)| {
                    let states = scales
                        .iter()
                        .map(|(scale, group)| (scale.clone(), group.enabled))
                        .collect();
                    (country.clone(), states)
                })
                .collect(),
        )
    }

    /// Countries in first-seen order
    pub fn countries(&self) -> impl Iterator<Item = &str> {
        self.groups.keys().map(String::as_str)
    }

    /// Scale groups of one country
    pub fn scales(&self, country: &str) -> impl Iterator<Item = (&str, &LayerGroup)> {
        self.groups
            .get(country)
            .into_iter()
            .flat_map(|scales| scales.iter().map(|(scale, group)| (scale.as_str(), group)))
    }

    /// Whether an overlay is part of any group
    pub fn contains(&self, key: &OverlayKey) -> bool {
        self.groups
            .values()
            .flat_map(|scales| scales.values())
            .any(|group| group.members.contains(key))
    }

    /// Total number of grouped overlays
    pub fn member_count(&self) -> usize {
        self.groups
            .values()
            .flat_map(|scales| scales.values())
            .map(|group| group.members.len())
            .sum()
    }
}
