//! Integration tests loading Foothold exports from `tests/fixtures`.
//!
//! Each fixture server follows the saved-games layout
//! `<server>/Missions/Saves/foothold_*.lua`; the progress fixtures are bare
//! files.

use once_cell::sync::Lazy;
use std::path::{Path, PathBuf};

use foothold_sitac::discovery::ServerDirectory;
use foothold_sitac::parser::{load_global, ZONE_PERSISTENCE_GLOBAL};
use foothold_sitac::sitac::{load_sitac, sitac_center, Side, Sitac};

// =============================================================================
// Fixtures
// =============================================================================

static FIXTURES: Lazy<PathBuf> =
    Lazy::new(|| Path::new(env!("CARGO_MANIFEST_DIR")).join("tests").join("fixtures"));

fn servers() -> ServerDirectory {
    ServerDirectory::new(FIXTURES.as_path())
}

fn server_sitac(server: &str) -> Sitac {
    servers()
        .active_sitac(server)
        .unwrap_or_else(|e| panic!("Failed to load {}: {}", server, e))
}

fn progress_sitac(file: &str) -> Sitac {
    let path = FIXTURES.join("test_progress").join(file);
    load_sitac(&path).unwrap_or_else(|e| panic!("Failed to load {:?}: {}", path, e))
}

// =============================================================================
// Discovery
// =============================================================================

#[test]
fn test_fixture_servers_are_listed() {
    let names = servers().list_servers().unwrap();
    assert_eq!(
        names,
        vec!["test_accounts", "test_forces", "test_hidden", "test_missions"]
    );
}

#[test]
fn test_detect_mission_path() {
    let path = servers().detect_mission_path("test_hidden").unwrap();
    assert_eq!(
        path.file_name().and_then(|n| n.to_str()),
        Some("foothold_hidden_test.lua")
    );
}

// =============================================================================
// Hidden zones
// =============================================================================

#[test]
fn test_hidden_zones_are_loaded() {
    let sitac = server_sitac("test_hidden");
    assert_eq!(sitac.zones.len(), 4);

    assert!(!sitac.zones["VisibleZone1"].hidden);
    assert!(!sitac.zones["VisibleZone2"].hidden);
    assert!(sitac.zones["HiddenZone1"].hidden);
    assert!(sitac.zones["HiddenZone2"].hidden);

    assert_eq!(sitac.visible_zones().count(), 2);
}

#[test]
fn test_progress_excludes_hidden_zones() {
    assert_eq!(server_sitac("test_hidden").campaign_progress(), 50.0);
}

#[test]
fn test_missing_sections_default_to_empty() {
    let sitac = server_sitac("test_hidden");
    assert!(sitac.missions.is_empty());
    assert!(sitac.connections.is_empty());
    assert!(sitac.players.is_empty());
    assert!(sitac.ejected_pilots.is_empty());
    assert!(sitac.player_stats.is_empty());
    assert_eq!(sitac.accounts, None);
    assert_eq!((sitac.red_credits(), sitac.blue_credits()), (0.0, 0.0));
}

// =============================================================================
// Missions, connections, players
// =============================================================================

#[test]
fn test_missions_keep_list_order() {
    let sitac = server_sitac("test_missions");
    assert_eq!(sitac.missions.len(), 2);

    assert_eq!(sitac.missions[0].title, "Attack Hahn (3)");
    assert_eq!(sitac.missions[0].description, "Destroy enemy forces at Hahn");
    assert!(!sitac.missions[0].is_escort_mission);
    assert!(sitac.missions[0].is_running);

    assert_eq!(sitac.missions[1].title, "Convoy Escort");
    assert!(sitac.missions[1].is_escort_mission);
    assert!(!sitac.missions[1].is_running);
}

#[test]
fn test_connections() {
    let sitac = server_sitac("test_missions");
    let pairs: Vec<_> = sitac
        .connections
        .iter()
        .map(|c| (c.from_zone.as_str(), c.to_zone.as_str()))
        .collect();
    assert_eq!(pairs, vec![("TestZone1", "TestZone2"), ("TestZone2", "TestZone3")]);
}

#[test]
fn test_flavor_text() {
    let sitac = server_sitac("test_missions");
    assert_eq!(sitac.zones["TestZone1"].flavor_text.as_deref(), Some("WPT 1"));
    assert_eq!(sitac.zones["TestZone2"].flavor_text.as_deref(), Some("WPT 2"));
    assert_eq!(sitac.zones["TestZone3"].flavor_text, None);
}

#[test]
fn test_players_and_stats() {
    let sitac = server_sitac("test_missions");

    let player = &sitac.players[0];
    assert_eq!(player.player_name, "Viper");
    assert_eq!(player.side_color(), "blue");
    assert_eq!(player.altitude, Some(6096.5));

    let stats = &sitac.player_stats["Viper"];
    assert_eq!(stats.air, 3);
    assert_eq!(stats.points, 125.5);
    assert_eq!(stats.zone_capture, 1);
    assert_eq!(stats.deaths, 0);

    let pilot = &sitac.ejected_pilots[0];
    assert_eq!(pilot.player_name, "Goose");
    assert_eq!(pilot.lost_credits, 150.0);
}

// =============================================================================
// Credits and forces
// =============================================================================

#[test]
fn test_accounts_from_index_assignment() {
    let sitac = server_sitac("test_accounts");
    assert_eq!(sitac.red_credits(), 736.0);
    assert_eq!(sitac.blue_credits(), 33218.0);
}

#[test]
fn test_zone_forces() {
    let sitac = server_sitac("test_forces");
    let aleppo = &sitac.zones["Aleppo"];

    assert_eq!(aleppo.side, Side::Red);
    assert_eq!(aleppo.total_units(), 4);
    assert_eq!(aleppo.upgrades_used, 2);
    assert_eq!(aleppo.level, 3);

    let groups = aleppo.unit_groups();
    assert_eq!(groups.len(), 2);
    assert_eq!(groups[0].group_id, 1);
    assert_eq!(groups[0].units["T-72B3"], 2);
    assert_eq!(groups[0].units["BMP-1"], 1);
    assert_eq!(groups[1].units["SA-11 Buk CC 9S470M1"], 1);

    let empty = &sitac.zones["EmptyZone"];
    assert_eq!(empty.side, Side::Neutral);
    assert_eq!(empty.total_units(), 0);
    assert!(empty.unit_groups().is_empty());
}

// =============================================================================
// Campaign progress
// =============================================================================

#[test]
fn test_progress_all_red() {
    assert_eq!(progress_sitac("foothold_all_red.lua").campaign_progress(), 0.0);
}

#[test]
fn test_progress_all_blue() {
    assert_eq!(progress_sitac("foothold_all_blue.lua").campaign_progress(), 100.0);
}

#[test]
fn test_progress_mixed() {
    assert_eq!(progress_sitac("foothold_mixed.lua").campaign_progress(), 50.0);
}

#[test]
fn test_progress_with_neutral() {
    let progress = progress_sitac("foothold_with_neutral.lua").campaign_progress();
    assert!((progress - 66.67).abs() < 0.01, "progress was {}", progress);
}

#[test]
fn test_progress_without_zones() {
    let sitac = progress_sitac("foothold_empty.lua");
    assert!(sitac.zones.is_empty());
    assert_eq!(sitac.campaign_progress(), 0.0);
    assert!(sitac_center(&sitac).is_err());
}

#[test]
fn test_center_of_mixed() {
    let center = sitac_center(&progress_sitac("foothold_mixed.lua")).unwrap();
    assert_eq!((center.latitude, center.longitude), (20.0, 30.0));
}

// =============================================================================
// Raw tables and JSON dump
// =============================================================================

#[test]
fn test_raw_global_to_json() {
    let path = FIXTURES.join("test_accounts/Missions/Saves/foothold_accounts.lua");
    let table = load_global(&path, ZONE_PERSISTENCE_GLOBAL).unwrap();
    let json = table.to_json();
    assert_eq!(json["accounts"]["1"], 736);
    assert_eq!(json["zones"]["Aleppo"]["side"], 1);
}

#[test]
fn test_sitac_json_uses_export_names() {
    let json = serde_json::to_value(server_sitac("test_missions")).unwrap();

    let zone = &json["zones"]["TestZone1"];
    assert!(zone.get("upgradesUsed").is_some());
    assert!(zone.get("lat_long").is_some());
    assert_eq!(zone["hidden"], false);
    assert_eq!(zone["side"], 2);

    assert_eq!(json["missions"][1]["isEscortMission"], true);
    assert_eq!(json["playerStats"]["Viper"]["Zone capture"], 1);
    assert_eq!(json["ejectedPilots"][0]["lostCredits"], 150.0);
    assert_eq!(json["connections"][0]["from"], "TestZone1");
}
