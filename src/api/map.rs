//! Flattened sitac view consumed by the map page

use chrono::{DateTime, Local};
use serde::Serialize;

use crate::sitac::{Sitac, UnitGroup};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapZone {
    pub name: String,
    pub lat: f64,
    pub lon: f64,
    pub side: &'static str,
    pub color: &'static str,
    pub units: usize,
    pub level: i64,
    pub flavor_text: Option<String>,
    pub upgrades_used: i64,
    /// Only filled when zone forces are shown
    pub unit_groups: Option<Vec<UnitGroup>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapConnection {
    pub from_zone: String,
    pub to_zone: String,
    pub from_lat: f64,
    pub from_lon: f64,
    pub to_lat: f64,
    pub to_lon: f64,
    pub color: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapPlayer {
    pub player_name: String,
    pub lat: f64,
    pub lon: f64,
    pub coalition: String,
    pub unit_type: String,
    pub color: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapEjectedPilot {
    pub player_name: String,
    pub lat: f64,
    pub lon: f64,
    pub altitude: f64,
    pub lost_credits: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapData {
    pub updated_at: DateTime<Local>,
    pub age_seconds: f64,
    pub zones: Vec<MapZone>,
    pub connections: Vec<MapConnection>,
    pub players: Vec<MapPlayer>,
    pub ejected_pilots: Vec<MapEjectedPilot>,
    pub progress: f64,
    pub missions_count: usize,
    pub ejected_pilots_count: usize,
    pub red_credits: f64,
    pub blue_credits: f64,
    pub show_zone_forces: bool,
}

impl MapData {
    pub fn from_sitac(sitac: &Sitac, show_zone_forces: bool, now: DateTime<Local>) -> Self {
        let zones = sitac
            .visible_zones()
            .map(|(name, zone)| MapZone {
                name: name.clone(),
                lat: zone.position.latitude,
                lon: zone.position.longitude,
                side: zone.side_str(),
                color: zone.side_color(),
                units: zone.total_units(),
                level: zone.level,
                flavor_text: zone.flavor_text.clone(),
                upgrades_used: zone.upgrades_used,
                unit_groups: show_zone_forces.then(|| zone.unit_groups()),
            })
            .collect();

        let connections = sitac
            .connections
            .iter()
            .filter_map(|conn| {
                let from = sitac.zones.get(&conn.from_zone).filter(|z| !z.hidden)?;
                let to = sitac.zones.get(&conn.to_zone).filter(|z| !z.hidden)?;
                Some(MapConnection {
                    from_zone: conn.from_zone.clone(),
                    to_zone: conn.to_zone.clone(),
                    from_lat: from.position.latitude,
                    from_lon: from.position.longitude,
                    to_lat: to.position.latitude,
                    to_lon: to.position.longitude,
                    color: from.side_color(),
                })
            })
            .collect();

        let players = sitac
            .players
            .iter()
            .map(|p| MapPlayer {
                player_name: p.player_name.clone(),
                lat: p.latitude,
                lon: p.longitude,
                coalition: p.coalition.clone(),
                unit_type: p.unit_type.clone(),
                color: p.side_color(),
            })
            .collect();

        let ejected_pilots: Vec<_> = sitac
            .ejected_pilots
            .iter()
            .map(|p| MapEjectedPilot {
                player_name: p.player_name.clone(),
                lat: p.latitude,
                lon: p.longitude,
                altitude: p.altitude,
                lost_credits: p.lost_credits,
            })
            .collect();

        let age = now.signed_duration_since(sitac.updated_at);

        Self {
            updated_at: sitac.updated_at,
            age_seconds: age.num_milliseconds() as f64 / 1000.0,
            zones,
            connections,
            players,
            ejected_pilots_count: ejected_pilots.len(),
            ejected_pilots,
            progress: sitac.campaign_progress(),
            missions_count: sitac.missions.len(),
            red_credits: sitac.red_credits(),
            blue_credits: sitac.blue_credits(),
            show_zone_forces,
        }
    }
}

/// Names of non-hidden zones, sorted
pub fn visible_zone_names(sitac: &Sitac) -> Vec<String> {
    // zones are kept in a BTreeMap, so iteration is already sorted
    sitac.visible_zones().map(|(name, _)| name.clone()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::LuaTable;
    use crate::sitac::{Accounts, Connection, EjectedPilot, Player, Position, Side, Zone};
    use chrono::Duration;
    use std::collections::BTreeMap;

    fn zone(side: Side, hidden: bool) -> Zone {
        Zone {
            upgrades_used: 2,
            side,
            active: true,
            destroyed: LuaTable::new(),
            extra_upgrade: LuaTable::new(),
            remaining_units: BTreeMap::from([(
                1,
                BTreeMap::from([(1, "T-72B3".to_string()), (2, "BMP-2".to_string())]),
            )]),
            first_capture_by_red: false,
            level: 3,
            was_blue: false,
            triggers: BTreeMap::new(),
            position: Position::new(35.0, 36.0),
            hidden,
            flavor_text: None,
        }
    }

    fn sample() -> Sitac {
        let mut zones = BTreeMap::new();
        zones.insert("Bravo".to_string(), zone(Side::Blue, false));
        zones.insert("Alpha".to_string(), zone(Side::Red, false));
        zones.insert("Hidden".to_string(), zone(Side::Red, true));

        Sitac {
            updated_at: Local::now() - Duration::seconds(30),
            zones,
            player_stats: BTreeMap::new(),
            missions: Vec::new(),
            connections: vec![
                Connection { from_zone: "Alpha".into(), to_zone: "Bravo".into() },
                Connection { from_zone: "Alpha".into(), to_zone: "Hidden".into() },
                Connection { from_zone: "Alpha".into(), to_zone: "Nowhere".into() },
            ],
            players: vec![Player {
                player_name: "Mobius".into(),
                coalition: "blue".into(),
                unit_type: "F-15C".into(),
                latitude: 1.0,
                longitude: 2.0,
                altitude: Some(8000.0),
            }],
            ejected_pilots: vec![EjectedPilot {
                player_name: "Goose".into(),
                latitude: 3.0,
                longitude: 4.0,
                altitude: 0.0,
                lost_credits: 150.0,
            }],
            accounts: Some(Accounts { red: 736.0, blue: 33218.0 }),
        }
    }

    #[test]
    fn test_map_projection() {
        let sitac = sample();
        let data = MapData::from_sitac(&sitac, true, Local::now());

        let names: Vec<_> = data.zones.iter().map(|z| z.name.as_str()).collect();
        assert_eq!(names, vec!["Alpha", "Bravo"]);
        assert_eq!(data.zones[0].color, "red");
        assert_eq!(data.zones[1].side, "blue");
        assert_eq!(data.zones[0].units, 2);
        assert_eq!(data.zones[0].upgrades_used, 2);
        assert!(data.zones[0].unit_groups.is_some());

        assert_eq!(data.connections.len(), 1);
        assert_eq!(data.connections[0].to_zone, "Bravo");
        assert_eq!(data.connections[0].color, "red");

        assert_eq!(data.players[0].color, "blue");
        assert_eq!(data.ejected_pilots_count, 1);
        assert_eq!(data.ejected_pilots[0].lost_credits, 150.0);
        assert_eq!(data.progress, 50.0);
        assert_eq!((data.red_credits, data.blue_credits), (736.0, 33218.0));
        assert!(data.age_seconds >= 30.0);
    }

    #[test]
    fn test_zone_forces_hidden_when_disabled() {
        let data = MapData::from_sitac(&sample(), false, Local::now());
        assert!(!data.show_zone_forces);
        assert!(data.zones.iter().all(|z| z.unit_groups.is_none()));
    }

    #[test]
    fn test_visible_zone_names() {
        assert_eq!(visible_zone_names(&sample()), vec!["Alpha", "Bravo"]);
    }
}
