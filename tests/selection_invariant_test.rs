//! Selection invariant tests
//!
//! Drives the selection store with random operation sequences against the
//! built-in map and checks the camp-order invariants after every step.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::sync::Arc;
use w3atlas::map::{BuildingType, FsMapSource, MapData, MapSource};
use w3atlas::selection::{total_raw_xp, SelectionError, SelectionStore};

fn builtin_map() -> MapData {
    FsMapSource::new("/nonexistent/w3atlas-maps")
        .load("Concealed Hill")
        .expect("built-in map should load")
}

fn loaded_store() -> (SelectionStore, Arc<MapData>) {
    let map = Arc::new(builtin_map());
    let mut store = SelectionStore::new();
    store.load_map(Arc::clone(&map));
    (store, map)
}

fn assert_order_invariant(store: &SelectionStore, map: &MapData) {
    let selection = store.selection();
    let order = selection.camp_order();

    for (i, camp_id) in order.iter().enumerate() {
        assert!(
            !order[i + 1..].contains(camp_id),
            "camp {} appears twice in {:?}",
            camp_id,
            order
        );
    }

    for camp in &map.camps {
        let non_empty = selection
            .selected_units(&camp.id)
            .is_some_and(|set| !set.is_empty());
        assert_eq!(
            order.contains(&camp.id),
            non_empty,
            "order membership and unit selection disagree for {}",
            camp.id
        );
    }

    for (camp_id, unit_id) in selection.all_selected_units() {
        let camp = map.camp(camp_id).expect("selected camp exists");
        assert!(
            camp.unit_instances().any(|u| u.unique_id == unit_id),
            "{} holds non-instance id {}",
            camp_id,
            unit_id
        );
    }

    let snapshot = store.snapshot();
    assert_eq!(snapshot.total_raw_xp, total_raw_xp(selection, map));
    assert_eq!(snapshot.camp_items.len(), order.len());
    for (i, entry) in snapshot.camp_items.iter().enumerate() {
        assert_eq!(entry.camp_order, i + 1);
        assert_eq!(&entry.camp_id, &order[i]);
    }
}

/// Spellings that parse to the same indices as `unit` but are not instance ids.
fn aliases(unit: &str) -> [String; 3] {
    let (group, instance) = unit.split_once('-').expect("instance id has a dash");
    [
        format!("0{}-{}", group, instance),
        format!("+{}-{}", group, instance),
        format!("{}-0{}", group, instance),
    ]
}

fn random_step(rng: &mut ChaCha8Rng, store: &mut SelectionStore, map: &MapData) {
    let camp = &map.camps[rng.gen_range(0..map.camps.len())];
    match rng.gen_range(0..10) {
        0..=3 => {
            let units: Vec<String> = camp.unit_instances().map(|u| u.unique_id).collect();
            if units.is_empty() {
                return;
            }
            let unit = &units[rng.gen_range(0..units.len())];
            store.toggle_unit(&camp.id, unit).expect("known unit");
        }
        4 => {
            let units: Vec<String> = camp.unit_instances().map(|u| u.unique_id).collect();
            if units.is_empty() {
                return;
            }
            let unit = &units[rng.gen_range(0..units.len())];
            let alias = aliases(unit)[rng.gen_range(0..3)].clone();
            let before = store.selection().clone();
            assert!(matches!(
                store.toggle_unit(&camp.id, &alias),
                Err(SelectionError::UnknownUnit { .. })
            ));
            assert_eq!(store.selection(), &before);
        }
        5 | 6 => store.toggle_camp_all(&camp.id).expect("known camp"),
        7 => {
            let building = BuildingType::ALL[rng.gen_range(0..BuildingType::ALL.len())];
            store.toggle_building(&camp.id, building).expect("known camp");
        }
        8 => {
            // May be rejected when no prompt is open; the snapshot must not change then.
            let before = store.selection().clone();
            let count = rng.gen_range(0..=9);
            if store.select_militia_count(&camp.id, count).is_err() {
                assert_eq!(store.selection(), &before);
            }
        }
        _ => {
            if rng.gen_bool(0.2) {
                store.reset();
            } else {
                store.cancel_militia_prompt();
            }
        }
    }
}

#[test]
fn test_random_sequences_keep_order_invariant() {
    let (mut store, map) = loaded_store();

    for seed in 0..20u64 {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        store.reset();
        for _ in 0..200 {
            random_step(&mut rng, &mut store, &map);
            assert_order_invariant(&store, &map);
        }
    }
}

#[test]
fn test_double_unit_toggle_restores_snapshot() {
    let (mut store, map) = loaded_store();
    let mut rng = ChaCha8Rng::seed_from_u64(42);

    for _ in 0..50 {
        random_step(&mut rng, &mut store, &map);
    }

    for camp in &map.camps {
        for unit in camp.unit_instances() {
            let before = store.selection().clone();
            store.toggle_unit(&camp.id, &unit.unique_id).expect("first toggle");
            store.toggle_unit(&camp.id, &unit.unique_id).expect("second toggle");

            // Emptying a camp and refilling it moves the camp to the end.
            let moved = before.selected_units(&camp.id).map(|s| s.len()) == Some(1);
            if !moved {
                assert_eq!(store.selection(), &before);
            }
            assert_eq!(
                store.selection().selected_units(&camp.id),
                before.selected_units(&camp.id)
            );
        }
    }
}

#[test]
fn test_reset_returns_to_empty_from_any_state() {
    let (mut store, map) = loaded_store();
    let mut rng = ChaCha8Rng::seed_from_u64(7);

    for _ in 0..100 {
        random_step(&mut rng, &mut store, &map);
    }
    store.reset();

    assert!(store.selection().is_empty());
    assert_eq!(store.snapshot().total_raw_xp, 0.0);
    assert_eq!(store.snapshot().progression.level, 1);
    assert!(store.snapshot().camp_items.is_empty());
}

#[test]
fn test_toggle_camp_all_round_trip_on_inactive_camp() {
    let (mut store, map) = loaded_store();
    let camp = map.camp("orange-east").expect("camp exists");

    store.toggle_camp_all("orange-east").unwrap();
    assert_eq!(
        store.selection().selected_units("orange-east").map(|s| s.len()),
        Some(camp.unit_count())
    );
    assert_eq!(store.selection().camp_order(), ["orange-east".to_string()]);

    store.toggle_camp_all("orange-east").unwrap();
    assert!(store.selection().is_empty());
}

#[test]
fn test_aliased_unit_ids_are_unknown_units() {
    let (mut store, _map) = loaded_store();
    store.toggle_unit("red-hilltop", "0-0").unwrap();
    let xp = store.snapshot().total_raw_xp;

    for alias in ["00-0", "+0-0", "0-00"] {
        assert_eq!(
            store.toggle_unit("red-hilltop", alias),
            Err(SelectionError::UnknownUnit {
                camp: "red-hilltop".to_string(),
                unit: alias.to_string(),
            })
        );
    }
    assert_eq!(
        store.selection().selected_units("red-hilltop").map(|s| s.len()),
        Some(1)
    );
    assert_eq!(store.snapshot().total_raw_xp, xp);
}

#[test]
fn test_toggle_camp_all_on_full_camp_clears_buildings_and_militia() {
    let (mut store, _map) = loaded_store();

    store.toggle_camp_all("orange-center").unwrap();
    store.toggle_camp_all("green-south").unwrap();
    store
        .toggle_building("orange-center", BuildingType::AncientOfWar)
        .unwrap();
    store
        .toggle_building("orange-center", BuildingType::Militia)
        .unwrap();
    store.select_militia_count("orange-center", 5).unwrap();
    assert_eq!(store.selection().militia_count("orange-center"), Some(5));

    store.toggle_camp_all("orange-center").unwrap();

    let selection = store.selection();
    assert!(!selection.is_camp_active("orange-center"));
    assert_eq!(selection.selected_units("orange-center"), None);
    assert_eq!(selection.buildings("orange-center"), None);
    assert_eq!(selection.militia_count("orange-center"), None);
    assert_eq!(selection.pending_militia(), None);
    assert_eq!(selection.camp_order(), ["green-south".to_string()]);
}

#[test]
fn test_militia_count_nine_is_rejected() {
    let (mut store, _map) = loaded_store();

    store.toggle_building("green-west", BuildingType::Militia).unwrap();
    assert_eq!(store.selection().pending_militia(), Some("green-west"));

    let before = store.selection().clone();
    assert_eq!(
        store.select_militia_count("green-west", 9),
        Err(SelectionError::MilitiaCountOutOfRange(9))
    );
    assert_eq!(store.selection(), &before);

    store.select_militia_count("green-west", 8).unwrap();
    assert_eq!(store.selection().militia_count("green-west"), Some(8));
    assert_eq!(store.selection().pending_militia(), None);
}

#[test]
fn test_mutations_before_load_are_rejected() {
    let mut store = SelectionStore::new();
    assert_eq!(
        store.toggle_camp_all("green-north"),
        Err(SelectionError::DataNotReady)
    );
    assert!(store.selection().is_empty());
}
