//! Loot items of activated camps, in route order.

use crate::map::{title_case, MapData};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RouteItem {
    pub name: String,
    pub icon_key: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub level: u32,
}

impl RouteItem {
    pub fn display_name(&self) -> String {
        item_display_name(&self.name)
    }

    pub fn category(&self) -> ItemCategory {
        ItemCategory::from_loot_type(&self.kind)
    }
}

/// Items dropped by one camp on the route.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CampItems {
    pub camp_id: String,
    /// 1-based position in the camp order.
    pub camp_order: usize,
    pub items: Vec<RouteItem>,
}

impl CampItems {
    /// Items grouped by loot type, groups in first-seen order.
    pub fn grouped_by_type(&self) -> Vec<(&str, Vec<&RouteItem>)> {
        let mut groups: Vec<(&str, Vec<&RouteItem>)> = Vec::new();
        for item in &self.items {
            match groups.iter_mut().find(|(kind, _)| *kind == item.kind) {
                Some((_, members)) => members.push(item),
                None => groups.push((item.kind.as_str(), vec![item])),
            }
        }
        groups
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemCategory {
    Permanent,
    PowerUp,
    Custom,
    Other,
}

impl ItemCategory {
    pub fn from_loot_type(kind: &str) -> Self {
        match kind {
            "permanent" => ItemCategory::Permanent,
            "Power Up" => ItemCategory::PowerUp,
            "custom" => ItemCategory::Custom,
            _ => ItemCategory::Other,
        }
    }
}

/// Lowercased name with every non-alphanumeric character removed.
pub fn icon_key(item_name: &str) -> String {
    item_name
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

/// "claws_of_attack_+6" -> "Claws Of Attack +6"
pub fn item_display_name(item_name: &str) -> String {
    title_case(&item_name.replace('_', " "))
}

/// Builds the ordered item list for the activated camps.
///
/// Items come from the camp's loot-bearing unit groups regardless of which
/// instances are selected. Ids missing from `map` are skipped but still
/// consume their order index.
pub fn aggregate_items(camp_order: &[String], map: &MapData) -> Vec<CampItems> {
    camp_order
        .iter()
        .enumerate()
        .filter_map(|(index, camp_id)| {
            let camp = map.camp(camp_id)?;
            let items = camp
                .units
                .iter()
                .filter_map(|group| group.loot.as_ref())
                .flat_map(|loot| {
                    loot.items.iter().map(move |name| RouteItem {
                        name: name.clone(),
                        icon_key: icon_key(name),
                        kind: loot.kind.clone(),
                        level: loot.level,
                    })
                })
                .collect();
            Some(CampItems {
                camp_id: camp_id.clone(),
                camp_order: index + 1,
                items,
            })
        })
        .collect()
}
