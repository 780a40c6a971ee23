//! Selection store: current snapshot plus the values derived from it.

use super::logic;
use super::types::{Selection, SelectionError};
use crate::items::{aggregate_items, CampItems};
use crate::map::{BuildingType, MapData};
use crate::progression::{calculate_progression, raw_xp_for_unit_level, ProgressionState};
use std::sync::Arc;
use tracing::debug;

/// Everything the render surface reads after a mutation.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RouteSnapshot {
    pub total_raw_xp: f64,
    pub progression: ProgressionState,
    pub camp_items: Vec<CampItems>,
}

impl RouteSnapshot {
    pub fn derive(selection: &Selection, map: Option<&MapData>) -> Self {
        let Some(map) = map else {
            return Self::default();
        };
        let total_raw_xp = total_raw_xp(selection, map);
        Self {
            total_raw_xp,
            progression: calculate_progression(total_raw_xp),
            camp_items: aggregate_items(selection.camp_order(), map),
        }
    }
}

/// Sum of the level table over every selected unit instance.
pub fn total_raw_xp(selection: &Selection, map: &MapData) -> f64 {
    selection
        .all_selected_units()
        .filter_map(|(camp_id, unit_id)| map.camp(camp_id)?.unit_group_for(unit_id))
        .map(|group| raw_xp_for_unit_level(group.level))
        .sum()
}

/// Owns the selection for the loaded map.
///
/// Until a map is loaded every mutation fails with `DataNotReady` and the
/// store stays empty. The snapshot is replaced only after a mutation has
/// fully succeeded.
#[derive(Debug, Default)]
pub struct SelectionStore {
    map: Option<Arc<MapData>>,
    selection: Selection,
    snapshot: RouteSnapshot,
}

impl SelectionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Installs map data and starts from an empty selection.
    pub fn load_map(&mut self, map: Arc<MapData>) {
        self.map = Some(map);
        self.commit(Selection::default());
    }

    /// Drops the map data; the store goes back to not-ready.
    pub fn unload(&mut self) {
        self.map = None;
        self.commit(Selection::default());
    }

    pub fn is_ready(&self) -> bool {
        self.map.is_some()
    }

    pub fn map(&self) -> Option<&MapData> {
        self.map.as_deref()
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn snapshot(&self) -> &RouteSnapshot {
        &self.snapshot
    }

    pub fn toggle_unit(&mut self, camp_id: &str, unit_id: &str) -> Result<(), SelectionError> {
        self.apply(|sel, map| logic::toggle_unit(sel, map, camp_id, unit_id))
    }

    pub fn toggle_camp_all(&mut self, camp_id: &str) -> Result<(), SelectionError> {
        self.apply(|sel, map| logic::toggle_camp_all(sel, map, camp_id))
    }

    pub fn toggle_building(
        &mut self,
        camp_id: &str,
        building: BuildingType,
    ) -> Result<(), SelectionError> {
        self.apply(|sel, map| logic::toggle_building(sel, map, camp_id, building))
    }

    /// Like `toggle_building`, addressed by tag such as `"militia"`.
    pub fn toggle_building_tag(&mut self, camp_id: &str, tag: &str) -> Result<(), SelectionError> {
        let building = tag
            .parse::<BuildingType>()
            .map_err(SelectionError::UnknownBuilding)?;
        self.toggle_building(camp_id, building)
    }

    pub fn select_militia_count(&mut self, camp_id: &str, count: u8) -> Result<(), SelectionError> {
        self.apply(|sel, map| logic::select_militia_count(sel, map, camp_id, count))
    }

    pub fn cancel_militia_prompt(&mut self) {
        let next = logic::cancel_militia_prompt(&self.selection);
        self.commit(next);
    }

    /// Empties every selection structure and the militia prompt at once.
    pub fn reset(&mut self) {
        self.commit(Selection::default());
    }

    fn apply<F>(&mut self, update: F) -> Result<(), SelectionError>
    where
        F: FnOnce(&Selection, &MapData) -> Result<Selection, SelectionError>,
    {
        let map = self.map.as_deref().ok_or(SelectionError::DataNotReady)?;
        let next = update(&self.selection, map).map_err(|e| {
            debug!(error = %e, "selection change rejected");
            e
        })?;
        self.commit(next);
        Ok(())
    }

    fn commit(&mut self, next: Selection) {
        self.snapshot = RouteSnapshot::derive(&next, self.map.as_deref());
        self.selection = next;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::map::{Camp, Dimensions, Loot, Position, UnitGroup};

    fn map() -> Arc<MapData> {
        Arc::new(MapData {
            map_name: "Test".to_string(),
            dimensions: Dimensions {
                width: 100.0,
                height: 100.0,
            },
            camps: vec![
                Camp {
                    id: "green-a".to_string(),
                    position: Position::default(),
                    units: vec![
                        UnitGroup {
                            name: "Kobold".to_string(),
                            count: 2,
                            level: 1,
                            xp: 999.0,
                            loot: None,
                        },
                        UnitGroup {
                            name: "Geomancer".to_string(),
                            count: 1,
                            level: 3,
                            xp: 999.0,
                            loot: Some(Loot {
                                level: 1,
                                kind: "Power Up".to_string(),
                                items: vec!["tome_of_experience".to_string()],
                            }),
                        },
                    ],
                },
                Camp {
                    id: "red-b".to_string(),
                    position: Position::default(),
                    units: vec![UnitGroup {
                        name: "Golem".to_string(),
                        count: 1,
                        level: 12,
                        xp: 0.0,
                        loot: None,
                    }],
                },
            ],
        })
    }

    #[test]
    fn test_mutations_before_load_are_rejected() {
        let mut store = SelectionStore::new();
        assert_eq!(
            store.toggle_camp_all("green-a"),
            Err(SelectionError::DataNotReady)
        );
        assert_eq!(
            store.toggle_unit("green-a", "0-0"),
            Err(SelectionError::DataNotReady)
        );
        assert!(store.selection().is_empty());
        assert_eq!(store.snapshot(), &RouteSnapshot::default());
    }

    #[test]
    fn test_raw_xp_uses_level_table_not_unit_xp_field() {
        let mut store = SelectionStore::new();
        store.load_map(map());
        store.toggle_camp_all("green-a").unwrap();
        // 2 x level 1 (25) + 1 x level 3 (60)
        assert_eq!(store.snapshot().total_raw_xp, 110.0);
        assert_eq!(store.snapshot().progression.level, 1);
        assert_eq!(store.snapshot().camp_items.len(), 1);
    }

    #[test]
    fn test_out_of_table_levels_contribute_nothing() {
        let mut store = SelectionStore::new();
        store.load_map(map());
        store.toggle_unit("red-b", "0-0").unwrap();
        assert_eq!(store.snapshot().total_raw_xp, 0.0);
        assert_eq!(store.selection().camp_order(), ["red-b".to_string()]);
    }

    #[test]
    fn test_items_follow_camp_not_unit_selection() {
        let mut store = SelectionStore::new();
        store.load_map(map());
        // The loot carrier (group 1) stays unselected
        store.toggle_unit("green-a", "0-0").unwrap();
        let items = &store.snapshot().camp_items;
        assert_eq!(items[0].items[0].icon_key, "tomeofexperience");
    }

    #[test]
    fn test_rejected_mutation_keeps_snapshot() {
        let mut store = SelectionStore::new();
        store.load_map(map());
        store.toggle_camp_all("green-a").unwrap();
        let before = store.snapshot().clone();

        assert!(store.toggle_unit("green-a", "9-9").is_err());
        assert!(store.toggle_building_tag("green-a", "barracks").is_err());
        assert_eq!(store.snapshot(), &before);
    }

    #[test]
    fn test_reset_restores_initial_state() {
        let mut store = SelectionStore::new();
        store.load_map(map());
        store.toggle_camp_all("green-a").unwrap();
        store.toggle_building_tag("red-b", "militia").unwrap();
        store.reset();
        assert!(store.selection().is_empty());
        assert!(store.snapshot().camp_items.is_empty());
        assert_eq!(store.snapshot().total_raw_xp, 0.0);
        store.reset();
        assert!(store.selection().is_empty());
    }
}
