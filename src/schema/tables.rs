//! Field tables for every record found in a Foothold export

use super::types::*;

// =============================================================================
// Zone records
// =============================================================================

pub static POSITION: RecordSchema = RecordSchema {
    name: "position",
    fields: &[
        Field::required("latitude", FieldType::Real),
        Field::required("longitude", FieldType::Real),
        // Still written by older exports, no longer used
        Field::new("altitude", FieldType::Integer),
    ],
};

pub static ZONE: RecordSchema = RecordSchema {
    name: "zone",
    fields: &[
        Field::required("upgrades_used", FieldType::Integer).lua("upgradesUsed"),
        Field::required("side", FieldType::Integer),
        Field::required("active", FieldType::Boolean),
        Field::required("destroyed", FieldType::Table),
        Field::required("extra_upgrade", FieldType::Table).lua("extraUpgrade"),
        Field::required("remaining_units", FieldType::Table).lua("remainingUnits"),
        Field::required("first_capture_by_red", FieldType::Boolean).lua("firstCaptureByRed"),
        Field::required("level", FieldType::Integer),
        Field::required("was_blue", FieldType::Boolean).lua("wasBlue"),
        Field::required("triggers", FieldType::Table),
        Field::required("position", FieldType::Table).lua("lat_long"),
        Field::new("hidden", FieldType::Boolean),
        Field::new("flavor_text", FieldType::Text).lua("flavorText"),
    ],
};

// =============================================================================
// Player records
// =============================================================================

pub static PLAYER_STATS: RecordSchema = RecordSchema {
    name: "player_stats",
    fields: &[
        Field::new("air", FieldType::Integer).lua("Air"),
        Field::new("sam", FieldType::Integer).lua("SAM"),
        Field::new("points", FieldType::Real).lua("Points"),
        Field::new("deaths", FieldType::Integer).lua("Deaths"),
        Field::new("zone_capture", FieldType::Integer).lua("Zone capture"),
        Field::new("zone_upgrade", FieldType::Integer).lua("Zone upgrade"),
        Field::new("cas_mission", FieldType::Integer).lua("CAS mission"),
        Field::new("points_spent", FieldType::Integer).lua("Points spent"),
        Field::new("infantry", FieldType::Integer).lua("Infantry"),
        Field::new("ground_units", FieldType::Integer).lua("Ground Units"),
        Field::new("helo", FieldType::Integer).lua("Helo"),
    ],
};

pub static PLAYER: RecordSchema = RecordSchema {
    name: "player",
    fields: &[
        Field::required("player_name", FieldType::Text).lua("playerName"),
        Field::required("coalition", FieldType::Text),
        Field::required("unit_type", FieldType::Text).lua("unitType"),
        Field::required("latitude", FieldType::Real),
        Field::required("longitude", FieldType::Real),
        Field::new("altitude", FieldType::Real),
    ],
};

pub static EJECTED_PILOT: RecordSchema = RecordSchema {
    name: "ejected_pilot",
    fields: &[
        Field::required("player_name", FieldType::Text).lua("playerName"),
        Field::required("latitude", FieldType::Real),
        Field::required("longitude", FieldType::Real),
        Field::new("altitude", FieldType::Real),
        Field::new("lost_credits", FieldType::Real).lua("lostCredits"),
    ],
};

// =============================================================================
// Campaign records
// =============================================================================

pub static MISSION: RecordSchema = RecordSchema {
    name: "mission",
    fields: &[
        Field::required("title", FieldType::Text),
        Field::required("description", FieldType::Text),
        Field::required("is_escort_mission", FieldType::Boolean).lua("isEscortMission"),
        Field::required("is_running", FieldType::Boolean).lua("isRunning"),
    ],
};

pub static CONNECTION: RecordSchema = RecordSchema {
    name: "connection",
    fields: &[
        Field::required("from_zone", FieldType::Text).lua("from"),
        Field::required("to_zone", FieldType::Text).lua("to"),
    ],
};

/// Credits per coalition, keyed by side number
pub static ACCOUNTS: RecordSchema = RecordSchema {
    name: "accounts",
    fields: &[
        Field::new("red", FieldType::Real).lua("1"),
        Field::new("blue", FieldType::Real).lua("2"),
    ],
};

/// Root of the `zonePersistance` table
pub static SITAC: RecordSchema = RecordSchema {
    name: "sitac",
    fields: &[
        Field::required("zones", FieldType::Table),
        Field::new("player_stats", FieldType::Table).lua("playerStats"),
        Field::new("missions", FieldType::List),
        Field::new("connections", FieldType::List),
        Field::new("players", FieldType::List),
        Field::new("ejected_pilots", FieldType::List).lua("ejectedPilots"),
        Field::new("accounts", FieldType::Table),
    ],
};

// =============================================================================
// Registry
// =============================================================================

pub static ALL_RECORDS: &[&RecordSchema] = &[
    &SITAC,
    &ZONE,
    &POSITION,
    &PLAYER_STATS,
    &MISSION,
    &CONNECTION,
    &PLAYER,
    &EJECTED_PILOT,
    &ACCOUNTS,
];

/// Get a record schema by name
pub fn get_record(name: &str) -> Option<&'static RecordSchema> {
    ALL_RECORDS.iter().find(|r| r.name == name).copied()
}

/// Get all record names
pub fn record_names() -> Vec<&'static str> {
    ALL_RECORDS.iter().map(|r| r.name).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_field_names_unique_per_record() {
        for record in ALL_RECORDS {
            let names: HashSet<_> = record.fields.iter().map(|f| f.name).collect();
            assert_eq!(names.len(), record.fields.len(), "duplicate field in {}", record.name);

            let keys: HashSet<_> = record.fields.iter().map(|f| f.source_key()).collect();
            assert_eq!(keys.len(), record.fields.len(), "duplicate key in {}", record.name);
        }
    }

    #[test]
    fn test_zone_aliases() {
        let aliases: Vec<_> = ZONE.aliases().collect();
        assert!(aliases.contains(&("upgradesUsed", "upgrades_used")));
        assert!(aliases.contains(&("lat_long", "position")));
        assert_eq!(ZONE.field("hidden").map(|f| f.required), Some(false));
    }

    #[test]
    fn test_get_record() {
        assert_eq!(get_record("mission").map(|r| r.name), Some("mission"));
        assert!(get_record("unknown").is_none());
        assert_eq!(record_names().len(), ALL_RECORDS.len());
        assert!(record_names().contains(&"zone"));
    }
}
