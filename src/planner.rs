//! Route planner: the single actor that owns map state, selection and notes.
//!
//! Every user action lands here as one synchronous call. Derived values are
//! recomputed by the store after the mutation completes, then pushed to the
//! registered route observers.

use crate::items::CampItems;
use crate::map::{BuildingType, LoadTicket, MapData, MapLoadError};
use crate::notes::NotesStore;
use crate::selection::{RouteSnapshot, Selection, SelectionError, SelectionStore};
use std::sync::Arc;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MapStatus {
    /// No map requested yet.
    Idle,
    Loading,
    Ready,
    /// The source rejected the load; nothing is selectable.
    Failed(String),
}

/// Receives the route after every recompute.
pub trait RouteObserver {
    fn route_changed(&mut self, total_raw_xp: f64, camp_items: &[CampItems]);
}

impl<F> RouteObserver for F
where
    F: FnMut(f64, &[CampItems]),
{
    fn route_changed(&mut self, total_raw_xp: f64, camp_items: &[CampItems]) {
        self(total_raw_xp, camp_items)
    }
}

/// Logs a one-line summary of the route.
pub struct RouteSummaryLogger;

impl RouteObserver for RouteSummaryLogger {
    fn route_changed(&mut self, total_raw_xp: f64, camp_items: &[CampItems]) {
        let item_count: usize = camp_items.iter().map(|c| c.items.len()).sum();
        info!(
            camps = camp_items.len(),
            items = item_count,
            raw_xp = total_raw_xp,
            "route updated"
        );
    }
}

pub struct RoutePlanner {
    active_map: Option<String>,
    status: MapStatus,
    next_ticket: u64,
    pending_ticket: Option<LoadTicket>,
    store: SelectionStore,
    notes: NotesStore,
    observers: Vec<Box<dyn RouteObserver>>,
}

impl Default for RoutePlanner {
    fn default() -> Self {
        Self::new()
    }
}

impl RoutePlanner {
    pub fn new() -> Self {
        Self {
            active_map: None,
            status: MapStatus::Idle,
            next_ticket: 0,
            pending_ticket: None,
            store: SelectionStore::new(),
            notes: NotesStore::new(),
            observers: Vec::new(),
        }
    }

    pub fn add_observer(&mut self, observer: Box<dyn RouteObserver>) {
        self.observers.push(observer);
    }

    pub fn active_map(&self) -> Option<&str> {
        self.active_map.as_deref()
    }

    pub fn status(&self) -> &MapStatus {
        &self.status
    }

    pub fn map(&self) -> Option<&MapData> {
        self.store.map()
    }

    pub fn selection(&self) -> &Selection {
        self.store.selection()
    }

    pub fn snapshot(&self) -> &RouteSnapshot {
        self.store.snapshot()
    }

    pub fn notes(&self) -> &NotesStore {
        &self.notes
    }

    pub fn notes_mut(&mut self) -> &mut NotesStore {
        &mut self.notes
    }

    /// Switches the active map and returns the ticket its data must arrive with.
    ///
    /// Camp state is cleared immediately; any load still in flight for an
    /// earlier request becomes stale.
    pub fn select_map(&mut self, map_name: &str) -> LoadTicket {
        let ticket = LoadTicket(self.next_ticket);
        self.next_ticket += 1;

        info!(map = map_name, ticket = ticket.0, "loading map");
        self.active_map = Some(map_name.to_string());
        self.pending_ticket = Some(ticket);
        self.status = MapStatus::Loading;
        self.store.unload();
        self.notify();
        ticket
    }

    /// Stops waiting for any load and drops the current map.
    pub fn clear_map(&mut self) {
        self.active_map = None;
        self.pending_ticket = None;
        self.status = MapStatus::Idle;
        self.store.unload();
        self.notify();
    }

    /// Applies a finished load. Returns false when the ticket is stale.
    pub fn complete_load(
        &mut self,
        ticket: LoadTicket,
        result: Result<MapData, MapLoadError>,
    ) -> bool {
        if self.pending_ticket != Some(ticket) {
            debug!(ticket = ticket.0, "ignoring stale map load");
            return false;
        }
        self.pending_ticket = None;

        match result {
            Ok(data) => {
                info!(map = %data.map_name, camps = data.camps.len(), "map ready");
                self.store.load_map(Arc::new(data));
                self.status = MapStatus::Ready;
            }
            Err(e) => {
                warn!(error = %e, "map load failed");
                self.store.unload();
                self.status = MapStatus::Failed(e.to_string());
            }
        }
        self.notify();
        true
    }

    pub fn toggle_unit(&mut self, camp_id: &str, unit_id: &str) -> Result<(), SelectionError> {
        self.store.toggle_unit(camp_id, unit_id)?;
        self.notify();
        Ok(())
    }

    pub fn toggle_camp_all(&mut self, camp_id: &str) -> Result<(), SelectionError> {
        self.store.toggle_camp_all(camp_id)?;
        self.notify();
        Ok(())
    }

    pub fn toggle_building(
        &mut self,
        camp_id: &str,
        building: BuildingType,
    ) -> Result<(), SelectionError> {
        self.store.toggle_building(camp_id, building)?;
        self.notify();
        Ok(())
    }

    pub fn toggle_building_tag(&mut self, camp_id: &str, tag: &str) -> Result<(), SelectionError> {
        self.store.toggle_building_tag(camp_id, tag)?;
        self.notify();
        Ok(())
    }

    pub fn select_militia_count(&mut self, camp_id: &str, count: u8) -> Result<(), SelectionError> {
        self.store.select_militia_count(camp_id, count)?;
        self.notify();
        Ok(())
    }

    pub fn cancel_militia_prompt(&mut self) {
        self.store.cancel_militia_prompt();
    }

    /// Clears all camp state. Notes are kept.
    pub fn reset(&mut self) {
        info!("route reset");
        self.store.reset();
        self.notify();
    }

    fn notify(&mut self) {
        let snapshot = self.store.snapshot();
        for observer in &mut self.observers {
            observer.route_changed(snapshot.total_raw_xp, &snapshot.camp_items);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::map::parse_map_data;
    use std::cell::RefCell;
    use std::rc::Rc;

    const MAP: &str = r#"{
        "mapName": "Tiny",
        "dimensions": {"width": 100, "height": 100},
        "camps": [
            {"id": "green-a", "position": {"x": 10, "y": 10},
             "units": [{"name": "Kobold", "count": 2, "level": 1, "xp": 25}]}
        ]
    }"#;

    fn tiny() -> MapData {
        parse_map_data("tiny", MAP).unwrap()
    }

    #[test]
    fn test_mutations_wait_for_data() {
        let mut planner = RoutePlanner::new();
        let ticket = planner.select_map("Tiny");
        assert_eq!(planner.status(), &MapStatus::Loading);
        assert_eq!(
            planner.toggle_camp_all("green-a"),
            Err(SelectionError::DataNotReady)
        );

        assert!(planner.complete_load(ticket, Ok(tiny())));
        assert_eq!(planner.status(), &MapStatus::Ready);
        planner.toggle_camp_all("green-a").unwrap();
        assert_eq!(planner.snapshot().total_raw_xp, 50.0);
    }

    #[test]
    fn test_stale_load_is_ignored() {
        let mut planner = RoutePlanner::new();
        let old = planner.select_map("Tiny");
        let new = planner.select_map("Other");
        assert!(!planner.complete_load(old, Ok(tiny())));
        assert!(planner.map().is_none());
        assert_eq!(planner.status(), &MapStatus::Loading);
        assert!(planner.complete_load(new, Ok(tiny())));
        assert!(planner.map().is_some());
    }

    #[test]
    fn test_failed_load_leaves_store_empty() {
        let mut planner = RoutePlanner::new();
        let ticket = planner.select_map("Nowhere");
        planner.complete_load(ticket, Err(MapLoadError::NotFound("nowhere".to_string())));
        assert!(matches!(planner.status(), MapStatus::Failed(_)));
        assert!(planner.map().is_none());
        assert!(planner.selection().is_empty());
    }

    #[test]
    fn test_observers_receive_every_recompute() {
        let seen: Rc<RefCell<Vec<(f64, usize)>>> = Rc::default();
        let sink = Rc::clone(&seen);

        let mut planner = RoutePlanner::new();
        planner.add_observer(Box::new(move |xp: f64, items: &[CampItems]| {
            sink.borrow_mut().push((xp, items.len()));
        }));
        let ticket = planner.select_map("Tiny");
        planner.complete_load(ticket, Ok(tiny()));
        planner.toggle_unit("green-a", "0-1").unwrap();
        let _ = planner.toggle_unit("green-a", "5-0");
        planner.reset();

        assert_eq!(
            *seen.borrow(),
            vec![(0.0, 0), (0.0, 0), (25.0, 1), (0.0, 0)]
        );
    }

    #[test]
    fn test_reset_and_map_change_keep_notes() {
        let mut planner = RoutePlanner::new();
        let ticket = planner.select_map("Tiny");
        planner.complete_load(ticket, Ok(tiny()));
        planner.notes_mut().set_placement_mode(true);
        planner.notes_mut().add(5.0, 5.0).unwrap();

        planner.toggle_camp_all("green-a").unwrap();
        planner.reset();
        planner.select_map("Other");
        assert_eq!(planner.notes().len(), 1);
        assert!(planner.selection().is_empty());
    }
}
