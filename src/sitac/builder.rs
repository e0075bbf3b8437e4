use chrono::{DateTime, Local};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::{debug, warn};

use super::model::*;
use crate::error::{Result, ValidationError};
use crate::parser::{load_global, LuaTable, LuaValue, Record, ZONE_PERSISTENCE_GLOBAL};
use crate::schema::{
    ACCOUNTS, CONNECTION, EJECTED_PILOT, MISSION, PLAYER, PLAYER_STATS, POSITION, SITAC, ZONE,
};

/// Load an export file into a fresh sitac
///
/// `updated_at` comes from the file modification time, never from the
/// file content.
pub fn load_sitac(path: &Path) -> Result<Sitac> {
    let table = load_global(path, ZONE_PERSISTENCE_GLOBAL)?;

    let modified = std::fs::metadata(path)
        .and_then(|m| m.modified())
        .map_err(|source| crate::error::LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;

    let sitac = build_sitac(&table, DateTime::<Local>::from(modified))?;
    debug!(
        path = %path.display(),
        zones = sitac.zones.len(),
        missions = sitac.missions.len(),
        players = sitac.players.len(),
        "built sitac"
    );
    Ok(sitac)
}

/// Map a raw `zonePersistance` table to the typed model
pub fn build_sitac(
    table: &LuaTable,
    updated_at: DateTime<Local>,
) -> Result<Sitac, ValidationError> {
    let root = Record::new(&SITAC, table, "zonePersistance");

    let mut zones = BTreeMap::new();
    if let Some(zone_table) = root.opt_table("zones")? {
        for (name, value) in zone_table.iter() {
            let path = format!("zonePersistance.zones.{}", name);
            let zone = expect_table(value, &path)?;
            zones.insert(name.to_string(), build_zone(&Record::new(&ZONE, zone, path))?);
        }
    }

    let mut player_stats = BTreeMap::new();
    if let Some(stats_table) = root.opt_table("player_stats")? {
        for (name, value) in stats_table.iter() {
            let path = format!("zonePersistance.playerStats.{}", name);
            let stats = expect_table(value, &path)?;
            player_stats.insert(
                name.to_string(),
                build_player_stats(&Record::new(&PLAYER_STATS, stats, path))?,
            );
        }
    }

    let missions = root
        .records("missions", &MISSION)?
        .iter()
        .map(build_mission)
        .collect::<Result<Vec<_>, _>>()?;
    let connections = root
        .records("connections", &CONNECTION)?
        .iter()
        .map(build_connection)
        .collect::<Result<Vec<_>, _>>()?;
    let players = root
        .records("players", &PLAYER)?
        .iter()
        .map(build_player)
        .collect::<Result<Vec<_>, _>>()?;
    let ejected_pilots = root
        .records("ejected_pilots", &EJECTED_PILOT)?
        .iter()
        .map(build_ejected_pilot)
        .collect::<Result<Vec<_>, _>>()?;

    let accounts = match root.record("accounts", &ACCOUNTS)? {
        Some(record) => Some(Accounts {
            red: record.real("red")?,
            blue: record.real("blue")?,
        }),
        None => None,
    };

    Ok(Sitac {
        updated_at,
        zones,
        player_stats,
        missions,
        connections,
        players,
        ejected_pilots,
        accounts,
    })
}

fn expect_table<'a>(value: &'a LuaValue, path: &str) -> Result<&'a LuaTable, ValidationError> {
    value.as_table().ok_or_else(|| {
        ValidationError::new(path, "", format!("expected table, got {}", value.type_name()))
    })
}

pub fn build_zone(record: &Record) -> Result<Zone, ValidationError> {
    let position = record
        .record("position", &POSITION)?
        .ok_or_else(|| ValidationError::new(record.path(), "lat_long", "field required"))?;

    Ok(Zone {
        upgrades_used: record.integer("upgrades_used")?,
        side: Side::from_number(record.integer("side")?),
        active: record.boolean("active")?,
        destroyed: record.opt_table("destroyed")?.cloned().unwrap_or_default(),
        extra_upgrade: record.opt_table("extra_upgrade")?.cloned().unwrap_or_default(),
        remaining_units: build_remaining_units(record)?,
        first_capture_by_red: record.boolean("first_capture_by_red")?,
        level: record.integer("level")?,
        was_blue: record.boolean("was_blue")?,
        triggers: build_triggers(record)?,
        position: Position {
            latitude: position.real("latitude")?,
            longitude: position.real("longitude")?,
            altitude: position.opt_integer("altitude")?,
        },
        hidden: record.boolean("hidden")?,
        flavor_text: record.opt_text("flavor_text")?,
    })
}

/// Unit groups of a zone; entries that are not `{ [group] = { [i] = "type" } }`
/// are skipped so one odd group does not hide the whole sitac
fn build_remaining_units(
    record: &Record,
) -> Result<BTreeMap<i64, BTreeMap<i64, String>>, ValidationError> {
    let mut groups = BTreeMap::new();
    let Some(table) = record.opt_table("remaining_units")? else {
        return Ok(groups);
    };

    for (group_key, group_value) in table.iter() {
        let (Some(group_id), Some(units_table)) = (group_key.as_integer(), group_value.as_table())
        else {
            warn!(zone = record.path(), group = %group_key, "skipping malformed unit group");
            continue;
        };

        let mut units = BTreeMap::new();
        for (unit_key, unit_value) in units_table.iter() {
            match (unit_key.as_integer(), unit_value.as_str()) {
                (Some(index), Some(unit_type)) => {
                    units.insert(index, unit_type.to_string());
                }
                _ => warn!(
                    zone = record.path(),
                    group = group_id,
                    unit = %unit_key,
                    "skipping malformed unit entry"
                ),
            }
        }
        groups.insert(group_id, units);
    }

    Ok(groups)
}

fn build_triggers(record: &Record) -> Result<BTreeMap<String, i64>, ValidationError> {
    let mut triggers = BTreeMap::new();
    if let Some(table) = record.opt_table("triggers")? {
        for (key, value) in table.iter() {
            let state = value.as_i64().ok_or_else(|| {
                ValidationError::new(
                    record.path(),
                    format!("triggers.{}", key),
                    format!("expected integer, got {}", value.type_name()),
                )
            })?;
            triggers.insert(key.to_string(), state);
        }
    }
    Ok(triggers)
}

pub fn build_player_stats(record: &Record) -> Result<PlayerStats, ValidationError> {
    Ok(PlayerStats {
        air: record.integer("air")?,
        sam: record.integer("sam")?,
        points: record.real("points")?,
        deaths: record.integer("deaths")?,
        zone_capture: record.integer("zone_capture")?,
        zone_upgrade: record.integer("zone_upgrade")?,
        cas_mission: record.integer("cas_mission")?,
        points_spent: record.integer("points_spent")?,
        infantry: record.integer("infantry")?,
        ground_units: record.integer("ground_units")?,
        helo: record.integer("helo")?,
    })
}

pub fn build_mission(record: &Record) -> Result<Mission, ValidationError> {
    Ok(Mission {
        title: record.text("title")?,
        description: record.text("description")?,
        is_escort_mission: record.boolean("is_escort_mission")?,
        is_running: record.boolean("is_running")?,
    })
}

pub fn build_connection(record: &Record) -> Result<Connection, ValidationError> {
    Ok(Connection {
        from_zone: record.text("from_zone")?,
        to_zone: record.text("to_zone")?,
    })
}

pub fn build_player(record: &Record) -> Result<Player, ValidationError> {
    Ok(Player {
        player_name: record.text("player_name")?,
        coalition: record.text("coalition")?,
        unit_type: record.text("unit_type")?,
        latitude: record.real("latitude")?,
        longitude: record.real("longitude")?,
        altitude: record.opt_real("altitude")?,
    })
}

pub fn build_ejected_pilot(record: &Record) -> Result<EjectedPilot, ValidationError> {
    Ok(EjectedPilot {
        player_name: record.text("player_name")?,
        latitude: record.real("latitude")?,
        longitude: record.real("longitude")?,
        altitude: record.real("altitude")?,
        lost_credits: record.real("lost_credits")?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_value;

    const BASE_ZONE: &str = r#"{
        ["upgradesUsed"] = 0,
        ["side"] = 1,
        ["active"] = true,
        ["destroyed"] = {},
        ["extraUpgrade"] = {},
        ["remainingUnits"] = {},
        ["firstCaptureByRed"] = true,
        ["level"] = 1,
        ["wasBlue"] = false,
        ["triggers"] = { ["missioncompleted"] = 0 },
        ["lat_long"] = { ["latitude"] = 33.0, ["longitude"] = 36.0, ["altitude"] = 0 },
    "#;

    fn zone(extra: &str) -> Result<Zone, ValidationError> {
        let src = format!("{}{} }}", BASE_ZONE, extra);
        let table = match parse_value(&src).unwrap() {
            Some(LuaValue::Table(t)) => t,
            other => panic!("not a table: {:?}", other),
        };
        build_zone(&Record::new(&ZONE, &table, "zone"))
    }

    #[test]
    fn test_zone_defaults() {
        let z = zone("").unwrap();
        assert_eq!(z.side, Side::Red);
        assert!(!z.hidden);
        assert_eq!(z.flavor_text, None);
        assert_eq!(z.triggers.get("missioncompleted"), Some(&0));
        assert_eq!(z.position, Position { latitude: 33.0, longitude: 36.0, altitude: Some(0) });
    }

    #[test]
    fn test_zone_hidden_and_flavor_text() {
        let z = zone(r#"["hidden"] = true, ["flavorText"] = "WPT 1","#).unwrap();
        assert!(z.hidden);
        assert_eq!(z.flavor_text.as_deref(), Some("WPT 1"));

        let z = zone(r#"["hidden"] = false,"#).unwrap();
        assert!(!z.hidden);
    }

    #[test]
    fn test_unknown_side_is_neutral() {
        let src = BASE_ZONE.replace(r#"["side"] = 1"#, r#"["side"] = 7"#);
        let table = match parse_value(&format!("{} }}", src)).unwrap() {
            Some(LuaValue::Table(t)) => t,
            other => panic!("not a table: {:?}", other),
        };
        let z = build_zone(&Record::new(&ZONE, &table, "zone")).unwrap();
        assert_eq!(z.side, Side::Neutral);
    }

    #[test]
    fn test_remaining_units() {
        let z = zone(
            r#"["remainingUnits"] = {
                [1] = { [1] = "T-72B3", [2] = "T-72B3", [3] = "BMP-1" },
                [2] = { [1] = "SA-11 Buk CC 9S470M1" },
            },"#,
        )
        .unwrap();
        assert_eq!(z.remaining_units.len(), 2);
        assert_eq!(z.remaining_units[&1][&3], "BMP-1");
    }

    #[test]
    fn test_malformed_unit_groups_are_skipped() {
        let z = zone(
            r#"["remainingUnits"] = {
                [1] = { [1] = "T-72B3", [2] = 42, ["x"] = "BMP-1" },
                [2] = "SA-11",
                ["convoy"] = { [1] = "Ural-375" },
            },"#,
        )
        .unwrap();
        assert_eq!(z.remaining_units.len(), 1);
        assert_eq!(z.remaining_units[&1].len(), 1);
        assert_eq!(z.remaining_units[&1][&1], "T-72B3");
    }

    #[test]
    fn test_missing_position_is_a_validation_error() {
        let src = BASE_ZONE.replace(
            r#"["lat_long"] = { ["latitude"] = 33.0, ["longitude"] = 36.0, ["altitude"] = 0 },"#,
            "",
        );
        let table = match parse_value(&format!("{} }}", src)).unwrap() {
            Some(LuaValue::Table(t)) => t,
            other => panic!("not a table: {:?}", other),
        };
        let err = build_zone(&Record::new(&ZONE, &table, "zones.Aleppo")).unwrap_err();
        assert_eq!(err.record, "zones.Aleppo");
        assert_eq!(err.field, "lat_long");
    }

    #[test]
    fn test_wrong_side_type_is_a_validation_error() {
        let src = BASE_ZONE.replace(r#"["side"] = 1"#, r#"["side"] = "red""#);
        let table = match parse_value(&format!("{} }}", src)).unwrap() {
            Some(LuaValue::Table(t)) => t,
            other => panic!("not a table: {:?}", other),
        };
        let err = build_zone(&Record::new(&ZONE, &table, "zone")).unwrap_err();
        assert_eq!(err.field, "side");
    }

    #[test]
    fn test_optional_sections_default_to_empty() {
        let table = match parse_value(r#"{ ["zones"] = {} }"#).unwrap() {
            Some(LuaValue::Table(t)) => t,
            other => panic!("not a table: {:?}", other),
        };
        let sitac = build_sitac(&table, Local::now()).unwrap();
        assert!(sitac.zones.is_empty());
        assert!(sitac.player_stats.is_empty());
        assert!(sitac.missions.is_empty());
        assert!(sitac.connections.is_empty());
        assert!(sitac.players.is_empty());
        assert!(sitac.ejected_pilots.is_empty());
        assert_eq!(sitac.accounts, None);
    }

    #[test]
    fn test_missing_zones_is_a_validation_error() {
        let err = build_sitac(&LuaTable::new(), Local::now()).unwrap_err();
        assert_eq!(err.field, "zones");
    }
}
