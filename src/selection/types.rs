//! Selection snapshot and its error type.

use crate::map::BuildingType;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use thiserror::Error;

/// Why a selection mutation was rejected. The snapshot is untouched in every case.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectionError {
    #[error("map data has not finished loading")]
    DataNotReady,
    #[error("unknown camp '{0}'")]
    UnknownCamp(String),
    #[error("camp '{camp}' has no unit '{unit}'")]
    UnknownUnit { camp: String, unit: String },
    #[error("unknown building type '{0}'")]
    UnknownBuilding(String),
    #[error("militia count {0} is outside 1-8")]
    MilitiaCountOutOfRange(u8),
    #[error("no militia prompt is open for camp '{0}'")]
    MilitiaNotPending(String),
}

/// Immutable value of all camp, unit and building selection for one map.
///
/// Updated only through the functions in `selection::logic`, which return a
/// fresh snapshot. A camp is in `camp_order` exactly when its unit set is
/// non-empty; empty unit sets are never stored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Selection {
    pub(crate) units: BTreeMap<String, BTreeSet<String>>,
    pub(crate) camp_order: Vec<String>,
    pub(crate) buildings: BTreeMap<String, BTreeSet<BuildingType>>,
    pub(crate) militia_counts: BTreeMap<String, u8>,
    pub(crate) pending_militia: Option<String>,
}

impl Selection {
    pub fn is_empty(&self) -> bool {
        *self == Selection::default()
    }

    /// Activation-ordered camp ids.
    pub fn camp_order(&self) -> &[String] {
        &self.camp_order
    }

    /// 1-based route step of a camp, if active.
    pub fn order_index(&self, camp_id: &str) -> Option<usize> {
        self.camp_order
            .iter()
            .position(|c| c == camp_id)
            .map(|i| i + 1)
    }

    pub fn is_camp_active(&self, camp_id: &str) -> bool {
        self.units.contains_key(camp_id)
    }

    pub fn selected_units(&self, camp_id: &str) -> Option<&BTreeSet<String>> {
        self.units.get(camp_id)
    }

    pub fn is_unit_selected(&self, camp_id: &str, unit_id: &str) -> bool {
        self.units
            .get(camp_id)
            .is_some_and(|set| set.contains(unit_id))
    }

    /// Every (camp, unit) pair currently selected.
    pub fn all_selected_units(&self) -> impl Iterator<Item = (&str, &str)> + '_ {
        self.units.iter().flat_map(|(camp, set)| {
            set.iter().map(move |unit| (camp.as_str(), unit.as_str()))
        })
    }

    pub fn buildings(&self, camp_id: &str) -> Option<&BTreeSet<BuildingType>> {
        self.buildings.get(camp_id)
    }

    pub fn is_building_selected(&self, camp_id: &str, building: BuildingType) -> bool {
        self.buildings
            .get(camp_id)
            .is_some_and(|set| set.contains(&building))
    }

    pub fn militia_count(&self, camp_id: &str) -> Option<u8> {
        self.militia_counts.get(camp_id).copied()
    }

    /// Camp currently waiting for a militia count, if any.
    pub fn pending_militia(&self) -> Option<&str> {
        self.pending_militia.as_deref()
    }
}
