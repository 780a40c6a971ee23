//! Pure selection updates. Each function maps a snapshot to a new snapshot.

use super::types::{Selection, SelectionError};
use crate::constants::{MAX_MILITIA_COUNT, MIN_MILITIA_COUNT};
use crate::map::{BuildingType, Camp, MapData};
use std::collections::BTreeSet;

fn find_camp<'a>(map: &'a MapData, camp_id: &str) -> Result<&'a Camp, SelectionError> {
    map.camp(camp_id)
        .ok_or_else(|| SelectionError::UnknownCamp(camp_id.to_string()))
}

/// The only place unit sets and `camp_order` change.
///
/// Empty -> non-empty appends the camp to the order; non-empty -> empty
/// removes it. Any other change leaves the order untouched.
fn with_camp_units(mut next: Selection, camp_id: &str, units: BTreeSet<String>) -> Selection {
    let was_active = next.units.contains_key(camp_id);

    if units.is_empty() {
        next.units.remove(camp_id);
        next.camp_order.retain(|c| c != camp_id);
    } else {
        next.units.insert(camp_id.to_string(), units);
        if !was_active && !next.camp_order.iter().any(|c| c == camp_id) {
            next.camp_order.push(camp_id.to_string());
        }
    }

    next
}

/// Flips one unit instance in a camp.
pub fn toggle_unit(
    current: &Selection,
    map: &MapData,
    camp_id: &str,
    unit_id: &str,
) -> Result<Selection, SelectionError> {
    let camp = find_camp(map, camp_id)?;
    if !camp.has_unit(unit_id) {
        return Err(SelectionError::UnknownUnit {
            camp: camp_id.to_string(),
            unit: unit_id.to_string(),
        });
    }

    let mut units = current.units.get(camp_id).cloned().unwrap_or_default();
    if !units.remove(unit_id) {
        units.insert(unit_id.to_string());
    }

    Ok(with_camp_units(current.clone(), camp_id, units))
}

/// Camp-level all-or-nothing toggle.
///
/// An inactive camp gets every unit instance selected. An active camp loses
/// its units, buildings, militia count and any open militia prompt.
pub fn toggle_camp_all(
    current: &Selection,
    map: &MapData,
    camp_id: &str,
) -> Result<Selection, SelectionError> {
    let camp = find_camp(map, camp_id)?;

    if current.camp_order.iter().any(|c| c == camp_id) {
        let mut next = with_camp_units(current.clone(), camp_id, BTreeSet::new());
        next.buildings.remove(camp_id);
        next.militia_counts.remove(camp_id);
        if next.pending_militia.as_deref() == Some(camp_id) {
            next.pending_militia = None;
        }
        return Ok(next);
    }

    let all: BTreeSet<String> = camp.unit_instances().map(|u| u.unique_id).collect();
    Ok(with_camp_units(current.clone(), camp_id, all))
}

/// Flips a building on a camp. Militia goes through the count prompt instead
/// of being selected directly.
pub fn toggle_building(
    current: &Selection,
    map: &MapData,
    camp_id: &str,
    building: BuildingType,
) -> Result<Selection, SelectionError> {
    find_camp(map, camp_id)?;
    let mut next = current.clone();

    if building == BuildingType::Militia && !current.is_building_selected(camp_id, building) {
        next.pending_militia = if current.pending_militia.as_deref() == Some(camp_id) {
            None
        } else {
            Some(camp_id.to_string())
        };
        return Ok(next);
    }

    let set = next.buildings.entry(camp_id.to_string()).or_default();
    if !set.remove(&building) {
        set.insert(building);
    }
    if set.is_empty() {
        next.buildings.remove(camp_id);
    }
    if building == BuildingType::Militia {
        next.militia_counts.remove(camp_id);
    }

    Ok(next)
}

/// Answers the militia prompt for `camp_id`, or changes the count of an
/// already selected militia.
pub fn select_militia_count(
    current: &Selection,
    map: &MapData,
    camp_id: &str,
    count: u8,
) -> Result<Selection, SelectionError> {
    find_camp(map, camp_id)?;
    if !(MIN_MILITIA_COUNT..=MAX_MILITIA_COUNT).contains(&count) {
        return Err(SelectionError::MilitiaCountOutOfRange(count));
    }

    let pending_here = current.pending_militia.as_deref() == Some(camp_id);
    if !pending_here && !current.is_building_selected(camp_id, BuildingType::Militia) {
        return Err(SelectionError::MilitiaNotPending(camp_id.to_string()));
    }

    let mut next = current.clone();
    next.buildings
        .entry(camp_id.to_string())
        .or_default()
        .insert(BuildingType::Militia);
    next.militia_counts.insert(camp_id.to_string(), count);
    if pending_here {
        next.pending_militia = None;
    }

    Ok(next)
}

/// Closes an open militia prompt without selecting anything.
pub fn cancel_militia_prompt(current: &Selection) -> Selection {
    let mut next = current.clone();
    next.pending_militia = None;
    next
}
