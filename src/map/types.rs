//! Static map data: camps, unit groups, loot and buildings.

use crate::constants::MARKER_SIZE_PX;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A point in source-image pixel space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Dimensions {
    pub width: f64,
    pub height: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Loot {
    pub level: u32,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub items: Vec<String>,
}

/// A named enemy template placed `count` times in a camp.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnitGroup {
    pub name: String,
    #[serde(default = "default_unit_count")]
    pub count: u32,
    pub level: u32,
    /// Carried by the map files but never consulted; see `RAW_XP_BY_UNIT_LEVEL`.
    #[serde(default)]
    pub xp: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub loot: Option<Loot>,
}

const fn default_unit_count() -> u32 {
    1
}

impl UnitGroup {
    /// Expands the group into its individually addressable instances.
    pub fn instances(&self, group_index: usize) -> impl Iterator<Item = UnitInstance<'_>> + '_ {
        (0..self.count.max(1)).map(move |instance_index| UnitInstance {
            unique_id: unit_instance_id(group_index, instance_index as usize),
            group: self,
        })
    }
}

/// One count-expanded copy of a unit group.
#[derive(Debug, Clone, PartialEq)]
pub struct UnitInstance<'a> {
    pub unique_id: String,
    pub group: &'a UnitGroup,
}

pub fn unit_instance_id(group_index: usize, instance_index: usize) -> String {
    format!("{}-{}", group_index, instance_index)
}

/// Splits `"{group}-{instance}"` back into its indices.
///
/// Only the exact form produced by `unit_instance_id` is accepted, so
/// aliases such as `"00-0"` or `"+0-0"` never resolve.
pub fn parse_unit_instance_id(unique_id: &str) -> Option<(usize, usize)> {
    let (group, instance) = unique_id.split_once('-')?;
    let indices = (group.parse().ok()?, instance.parse().ok()?);
    (unit_instance_id(indices.0, indices.1) == unique_id).then_some(indices)
}

/// Difficulty tier encoded as the prefix of a camp id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Difficulty {
    Green,
    Orange,
    Red,
    Unknown,
}

impl Difficulty {
    pub fn from_camp_id(camp_id: &str) -> Self {
        let prefix = camp_id.split('-').next().unwrap_or_default();
        match prefix.to_ascii_lowercase().as_str() {
            "green" => Difficulty::Green,
            "orange" => Difficulty::Orange,
            "red" => Difficulty::Red,
            _ => Difficulty::Unknown,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Difficulty::Green => "Easy",
            Difficulty::Orange => "Medium",
            Difficulty::Red => "Hard",
            Difficulty::Unknown => "Unknown",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Camp {
    pub id: String,
    pub position: Position,
    #[serde(default)]
    pub units: Vec<UnitGroup>,
}

impl Camp {
    pub fn difficulty(&self) -> Difficulty {
        Difficulty::from_camp_id(&self.id)
    }

    /// "green-north-1" -> "Green North 1"
    pub fn display_name(&self) -> String {
        title_case(&self.id.replace('-', " "))
    }

    /// Every unit instance of the camp, in group order.
    pub fn unit_instances(&self) -> impl Iterator<Item = UnitInstance<'_>> + '_ {
        self.units
            .iter()
            .enumerate()
            .flat_map(|(index, group)| group.instances(index))
    }

    /// Resolves an instance id to its group, if the id addresses a real instance.
    pub fn unit_group_for(&self, unique_id: &str) -> Option<&UnitGroup> {
        let (group_index, instance_index) = parse_unit_instance_id(unique_id)?;
        let group = self.units.get(group_index)?;
        (instance_index < group.count.max(1) as usize).then_some(group)
    }

    pub fn has_unit(&self, unique_id: &str) -> bool {
        self.unit_group_for(unique_id).is_some()
    }

    pub fn unit_count(&self) -> usize {
        self.units.iter().map(|g| g.count.max(1) as usize).sum()
    }

    /// Marker centre as percentages of the map dimensions.
    pub fn marker_percent(&self, dimensions: &Dimensions) -> (f64, f64) {
        (
            self.position.x / dimensions.width * 100.0,
            self.position.y / dimensions.height * 100.0,
        )
    }
}

/// Marker diameter as a percentage of map width.
pub fn marker_size_percent(dimensions: &Dimensions) -> f64 {
    MARKER_SIZE_PX / dimensions.width * 100.0
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MapData {
    pub map_name: String,
    pub dimensions: Dimensions,
    #[serde(default)]
    pub camps: Vec<Camp>,
}

impl MapData {
    pub fn camp(&self, camp_id: &str) -> Option<&Camp> {
        self.camps.iter().find(|c| c.id == camp_id)
    }
}

/// Structure types attachable to a camp.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BuildingType {
    AncientOfWar,
    Militia,
    Ghoul,
}

impl BuildingType {
    pub const ALL: [BuildingType; 3] = [
        BuildingType::AncientOfWar,
        BuildingType::Militia,
        BuildingType::Ghoul,
    ];

    pub fn tag(&self) -> &'static str {
        match self {
            BuildingType::AncientOfWar => "ancientofwar",
            BuildingType::Militia => "militia",
            BuildingType::Ghoul => "ghoul",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            BuildingType::AncientOfWar => "Ancient of War",
            BuildingType::Militia => "Militia",
            BuildingType::Ghoul => "Ghoul",
        }
    }
}

impl fmt::Display for BuildingType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for BuildingType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        BuildingType::ALL
            .into_iter()
            .find(|b| b.tag() == s)
            .ok_or_else(|| s.to_string())
    }
}

/// Capitalizes the first letter of every word.
pub fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut at_word_start = true;
    for ch in text.chars() {
        if at_word_start && ch.is_alphanumeric() {
            out.extend(ch.to_uppercase());
        } else {
            out.push(ch);
        }
        at_word_start = !(ch.is_alphanumeric() || ch == '_');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn camp() -> Camp {
        Camp {
            id: "orange-east".to_string(),
            position: Position { x: 100.0, y: 50.0 },
            units: vec![
                UnitGroup {
                    name: "Ogre".to_string(),
                    count: 2,
                    level: 3,
                    xp: 0.0,
                    loot: None,
                },
                UnitGroup {
                    name: "Ogre Magi".to_string(),
                    count: 1,
                    level: 5,
                    xp: 0.0,
                    loot: None,
                },
            ],
        }
    }

    #[test]
    fn test_unit_instance_ids_follow_group_and_instance_index() {
        let ids: Vec<String> = camp().unit_instances().map(|u| u.unique_id).collect();
        assert_eq!(ids, vec!["0-0", "0-1", "1-0"]);
    }

    #[test]
    fn test_unit_group_lookup_rejects_out_of_range_instances() {
        let camp = camp();
        assert_eq!(camp.unit_group_for("1-0").map(|g| g.level), Some(5));
        assert!(camp.unit_group_for("0-2").is_none());
        assert!(camp.unit_group_for("2-0").is_none());
        assert!(camp.unit_group_for("garbage").is_none());
    }

    #[test]
    fn test_only_canonical_instance_ids_resolve() {
        let camp = camp();
        assert_eq!(parse_unit_instance_id("1-0"), Some((1, 0)));
        for alias in ["00-0", "+0-0", "0-00", "0-+1", " 0-0", "0-0-0"] {
            assert_eq!(parse_unit_instance_id(alias), None, "{alias} resolved");
            assert!(!camp.has_unit(alias), "{alias} accepted");
        }
    }

    #[test]
    fn test_difficulty_from_prefix() {
        assert_eq!(Difficulty::from_camp_id("green-1"), Difficulty::Green);
        assert_eq!(Difficulty::from_camp_id("red"), Difficulty::Red);
        assert_eq!(Difficulty::from_camp_id("orange-east"), Difficulty::Orange);
        assert_eq!(Difficulty::from_camp_id("shop-1"), Difficulty::Unknown);
        assert_eq!(Difficulty::Green.label(), "Easy");
    }

    #[test]
    fn test_marker_percent() {
        let dims = Dimensions {
            width: 400.0,
            height: 200.0,
        };
        assert_eq!(camp().marker_percent(&dims), (25.0, 25.0));
        assert!((marker_size_percent(&dims) - 7.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_camp_display_name() {
        assert_eq!(camp().display_name(), "Orange East");
    }

    #[test]
    fn test_building_tags_round_trip_through_from_str() {
        assert_eq!("militia".parse::<BuildingType>(), Ok(BuildingType::Militia));
        assert_eq!(
            "ancientofwar".parse::<BuildingType>(),
            Ok(BuildingType::AncientOfWar)
        );
        assert!("barracks".parse::<BuildingType>().is_err());
    }

    #[test]
    fn test_unit_count_defaults_to_one_when_missing() {
        let group: UnitGroup =
            serde_json::from_str(r#"{"name":"Kobold","level":1,"xp":25}"#).unwrap();
        assert_eq!(group.count, 1);
        assert!(group.loot.is_none());
    }
}
