//! Typed snapshot of a Foothold campaign
//!
//! Serialized field names follow the export (`upgradesUsed`, `lat_long`,
//! `isEscortMission`, ...) so the JSON dump reads like the source table.

use chrono::{DateTime, Local};
use serde::{Serialize, Serializer};
use std::collections::BTreeMap;

use crate::parser::LuaTable;

/// Coalition owning a zone
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Side {
    #[default]
    Neutral,
    Red,
    Blue,
}

impl Side {
    /// Map the export's side number; unknown numbers are neutral
    pub fn from_number(n: i64) -> Self {
        match n {
            1 => Side::Red,
            2 => Side::Blue,
            _ => Side::Neutral,
        }
    }

    pub fn number(&self) -> u8 {
        match self {
            Side::Neutral => 0,
            Side::Red => 1,
            Side::Blue => 2,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Side::Neutral => "neutral",
            Side::Red => "red",
            Side::Blue => "blue",
        }
    }
}

impl Serialize for Side {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.number())
    }
}

fn table_as_json<S: Serializer>(table: &LuaTable, serializer: S) -> Result<S::Ok, S::Error> {
    table.to_json().serialize(serializer)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Position {
    pub latitude: f64,
    pub longitude: f64,
    pub altitude: Option<i64>,
}

impl Position {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
            altitude: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Zone {
    #[serde(rename = "upgradesUsed")]
    pub upgrades_used: i64,
    pub side: Side,
    pub active: bool,
    /// Either `{ [i] = name }` or empty; kept as exported
    #[serde(serialize_with = "table_as_json")]
    pub destroyed: LuaTable,
    #[serde(rename = "extraUpgrade", serialize_with = "table_as_json")]
    pub extra_upgrade: LuaTable,
    /// Group id -> unit index -> unit type
    #[serde(rename = "remainingUnits")]
    pub remaining_units: BTreeMap<i64, BTreeMap<i64, String>>,
    #[serde(rename = "firstCaptureByRed")]
    pub first_capture_by_red: bool,
    pub level: i64,
    #[serde(rename = "wasBlue")]
    pub was_blue: bool,
    pub triggers: BTreeMap<String, i64>,
    #[serde(rename = "lat_long")]
    pub position: Position,
    pub hidden: bool,
    #[serde(rename = "flavorText")]
    pub flavor_text: Option<String>,
}

/// Unit count per type for one group of a zone
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UnitGroup {
    pub group_id: i64,
    pub units: BTreeMap<String, usize>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PlayerStats {
    #[serde(rename = "Air")]
    pub air: i64,
    #[serde(rename = "SAM")]
    pub sam: i64,
    #[serde(rename = "Points")]
    pub points: f64,
    #[serde(rename = "Deaths")]
    pub deaths: i64,
    #[serde(rename = "Zone capture")]
    pub zone_capture: i64,
    #[serde(rename = "Zone upgrade")]
    pub zone_upgrade: i64,
    #[serde(rename = "CAS mission")]
    pub cas_mission: i64,
    #[serde(rename = "Points spent")]
    pub points_spent: i64,
    #[serde(rename = "Infantry")]
    pub infantry: i64,
    #[serde(rename = "Ground Units")]
    pub ground_units: i64,
    #[serde(rename = "Helo")]
    pub helo: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Mission {
    pub title: String,
    pub description: String,
    #[serde(rename = "isEscortMission")]
    pub is_escort_mission: bool,
    #[serde(rename = "isRunning")]
    pub is_running: bool,
}

/// Supply route between two zones
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Connection {
    #[serde(rename = "from")]
    pub from_zone: String,
    #[serde(rename = "to")]
    pub to_zone: String,
}

/// Player currently in a slot
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Player {
    #[serde(rename = "playerName")]
    pub player_name: String,
    pub coalition: String,
    #[serde(rename = "unitType")]
    pub unit_type: String,
    pub latitude: f64,
    pub longitude: f64,
    pub altitude: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EjectedPilot {
    #[serde(rename = "playerName")]
    pub player_name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub altitude: f64,
    #[serde(rename = "lostCredits")]
    pub lost_credits: f64,
}

/// Coalition credit balances
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Accounts {
    pub red: f64,
    pub blue: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Sitac {
    /// Modification time of the export file
    pub updated_at: DateTime<Local>,
    pub zones: BTreeMap<String, Zone>,
    #[serde(rename = "playerStats")]
    pub player_stats: BTreeMap<String, PlayerStats>,
    pub missions: Vec<Mission>,
    pub connections: Vec<Connection>,
    pub players: Vec<Player>,
    #[serde(rename = "ejectedPilots")]
    pub ejected_pilots: Vec<EjectedPilot>,
    pub accounts: Option<Accounts>,
}
