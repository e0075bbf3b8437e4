//! Briefing / ATO documents and the request bodies that edit them

use chrono::{DateTime, Local};
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MissionType {
    #[serde(rename = "CAP")]
    Cap,
    #[serde(rename = "SEAD")]
    Sead,
    #[serde(rename = "DEAD")]
    Dead,
    #[serde(rename = "CAS")]
    Cas,
    Strike,
    Sweep,
    Escort,
    Recce,
    Transport,
    #[serde(rename = "CSAR")]
    Csar,
}

/// Airbase a briefing departs from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Homeplate {
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default)]
    pub runway_heading: Option<u16>,
    /// e.g. "21X ICK"
    #[serde(default)]
    pub tacan: Option<String>,
    #[serde(default)]
    pub frequencies: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Waypoint {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default)]
    pub altitude_ft: Option<i32>,
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Flight {
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,
    pub callsign: String,
    pub aircraft_type: String,
    #[serde(default = "one")]
    pub num_aircraft: u32,
    pub mission_type: MissionType,
    /// e.g. "0900L" or "ASAP"
    #[serde(default)]
    pub push_time: Option<String>,
    #[serde(default)]
    pub tot: Option<String>,
    #[serde(default)]
    pub waypoints: Vec<Waypoint>,
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Package {
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub target_zone: Option<String>,
    #[serde(default)]
    pub mission_type: Option<MissionType>,
    #[serde(default)]
    pub flights: Vec<Flight>,
    #[serde(default)]
    pub notes: Option<String>,
}

/// Target linked to a sitac zone by name
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Objective {
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,
    pub zone_name: String,
    #[serde(default)]
    pub mission_requirements: Vec<MissionType>,
    /// 1 is the highest priority
    #[serde(default = "one")]
    pub priority: u32,
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Briefing {
    pub id: Uuid,
    /// Secret required by every write
    pub edit_token: Uuid,
    pub server_name: String,
    pub title: String,
    pub created_at: DateTime<Local>,
    pub updated_at: DateTime<Local>,
    #[serde(default)]
    pub homeplates: Vec<Homeplate>,
    #[serde(default)]
    pub mission_date: Option<String>,
    #[serde(default)]
    pub mission_time: Option<String>,
    #[serde(default)]
    pub situation: Option<String>,
    #[serde(default)]
    pub objectives: Vec<Objective>,
    #[serde(default)]
    pub packages: Vec<Package>,
    #[serde(default)]
    pub weather: Option<String>,
    #[serde(default)]
    pub comms_plan: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

fn one() -> u32 {
    1
}

impl Briefing {
    pub fn new(server_name: impl Into<String>, title: impl Into<String>) -> Self {
        let now = Local::now();
        Self {
            id: Uuid::new_v4(),
            edit_token: Uuid::new_v4(),
            server_name: server_name.into(),
            title: title.into(),
            created_at: now,
            updated_at: now,
            homeplates: Vec::new(),
            mission_date: None,
            mission_time: None,
            situation: None,
            objectives: Vec::new(),
            packages: Vec::new(),
            weather: None,
            comms_plan: None,
            notes: None,
        }
    }

    /// Copy safe to hand to readers: the edit token is zeroed
    pub fn redacted(&self) -> Self {
        Self {
            edit_token: Uuid::nil(),
            ..self.clone()
        }
    }

    pub fn touch(&mut self) {
        self.updated_at = Local::now();
    }

    pub fn package_mut(&mut self, id: Uuid) -> Option<&mut Package> {
        self.packages.iter_mut().find(|p| p.id == id)
    }
}

// =============================================================================
// Requests
// =============================================================================

#[derive(Debug, Clone, Deserialize)]
pub struct BriefingCreate {
    pub server_name: String,
    pub title: String,
    #[serde(default)]
    pub mission_date: Option<String>,
    #[serde(default)]
    pub mission_time: Option<String>,
}

/// Field that may be absent (`None`), explicitly null (`Some(None)`) or set
fn nullable<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct BriefingUpdate {
    pub title: Option<String>,
    #[serde(deserialize_with = "nullable")]
    pub mission_date: Option<Option<String>>,
    #[serde(deserialize_with = "nullable")]
    pub mission_time: Option<Option<String>>,
    #[serde(deserialize_with = "nullable")]
    pub situation: Option<Option<String>>,
    #[serde(deserialize_with = "nullable")]
    pub weather: Option<Option<String>>,
    #[serde(deserialize_with = "nullable")]
    pub comms_plan: Option<Option<String>>,
    #[serde(deserialize_with = "nullable")]
    pub notes: Option<Option<String>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HomeplateCreate {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default)]
    pub runway_heading: Option<u16>,
    #[serde(default)]
    pub tacan: Option<String>,
    #[serde(default)]
    pub frequencies: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct HomeplateUpdate {
    pub name: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    #[serde(deserialize_with = "nullable")]
    pub runway_heading: Option<Option<u16>>,
    #[serde(deserialize_with = "nullable")]
    pub tacan: Option<Option<String>>,
    pub frequencies: Option<Vec<String>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ObjectiveCreate {
    pub zone_name: String,
    #[serde(default)]
    pub mission_requirements: Vec<MissionType>,
    #[serde(default = "one")]
    pub priority: u32,
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ObjectiveUpdate {
    pub mission_requirements: Option<Vec<MissionType>>,
    pub priority: Option<u32>,
    #[serde(deserialize_with = "nullable")]
    pub notes: Option<Option<String>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PackageCreate {
    pub name: String,
    #[serde(default)]
    pub target_zone: Option<String>,
    #[serde(default)]
    pub mission_type: Option<MissionType>,
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PackageUpdate {
    pub name: Option<String>,
    #[serde(deserialize_with = "nullable")]
    pub target_zone: Option<Option<String>>,
    #[serde(deserialize_with = "nullable")]
    pub mission_type: Option<Option<MissionType>>,
    #[serde(deserialize_with = "nullable")]
    pub notes: Option<Option<String>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FlightCreate {
    pub callsign: String,
    pub aircraft_type: String,
    #[serde(default = "one")]
    pub num_aircraft: u32,
    pub mission_type: MissionType,
    #[serde(default)]
    pub push_time: Option<String>,
    #[serde(default)]
    pub tot: Option<String>,
    #[serde(default)]
    pub waypoints: Vec<Waypoint>,
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct FlightUpdate {
    pub callsign: Option<String>,
    pub aircraft_type: Option<String>,
    pub num_aircraft: Option<u32>,
    pub mission_type: Option<MissionType>,
    #[serde(deserialize_with = "nullable")]
    pub push_time: Option<Option<String>>,
    #[serde(deserialize_with = "nullable")]
    pub tot: Option<Option<String>>,
    pub waypoints: Option<Vec<Waypoint>>,
    #[serde(deserialize_with = "nullable")]
    pub notes: Option<Option<String>>,
}

// =============================================================================
// Conversions and partial updates
// =============================================================================

impl From<HomeplateCreate> for Homeplate {
    fn from(data: HomeplateCreate) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: data.name,
            latitude: data.latitude,
            longitude: data.longitude,
            runway_heading: data.runway_heading,
            tacan: data.tacan,
            frequencies: data.frequencies,
        }
    }
}

impl From<ObjectiveCreate> for Objective {
    fn from(data: ObjectiveCreate) -> Self {
        Self {
            id: Uuid::new_v4(),
            zone_name: data.zone_name,
            mission_requirements: data.mission_requirements,
            priority: data.priority,
            notes: data.notes,
        }
    }
}

impl From<PackageCreate> for Package {
    fn from(data: PackageCreate) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: data.name,
            target_zone: data.target_zone,
            mission_type: data.mission_type,
            flights: Vec::new(),
            notes: data.notes,
        }
    }
}

impl From<FlightCreate> for Flight {
    fn from(data: FlightCreate) -> Self {
        Self {
            id: Uuid::new_v4(),
            callsign: data.callsign,
            aircraft_type: data.aircraft_type,
            num_aircraft: data.num_aircraft,
            mission_type: data.mission_type,
            push_time: data.push_time,
            tot: data.tot,
            waypoints: data.waypoints,
            notes: data.notes,
        }
    }
}

fn apply<T>(target: &mut T, value: Option<T>) {
    if let Some(value) = value {
        *target = value;
    }
}


impl BriefingUpdate {
    pub fn apply_to(self, briefing: &mut Briefing) {
        apply(&mut briefing.title, self.title);
        apply(&mut briefing.mission_date, self.mission_date);
        apply(&mut briefing.mission_time, self.mission_time);
        apply(&mut briefing.situation, self.situation);
        apply(&mut briefing.weather, self.weather);
        apply(&mut briefing.comms_plan, self.comms_plan);
        apply(&mut briefing.notes, self.notes);
    }
}

impl HomeplateUpdate {
    pub fn apply_to(self, homeplate: &mut Homeplate) {
        apply(&mut homeplate.name, self.name);
        apply(&mut homeplate.latitude, self.latitude);
        apply(&mut homeplate.longitude, self.longitude);
        apply(&mut homeplate.runway_heading, self.runway_heading);
        apply(&mut homeplate.tacan, self.tacan);
        apply(&mut homeplate.frequencies, self.frequencies);
    }
}

impl ObjectiveUpdate {
    pub fn apply_to(self, objective: &mut Objective) {
        apply(&mut objective.mission_requirements, self.mission_requirements);
        apply(&mut objective.priority, self.priority);
        apply(&mut objective.notes, self.notes);
    }
}

impl PackageUpdate {
    pub fn apply_to(self, package: &mut Package) {
        apply(&mut package.name, self.name);
        apply(&mut package.target_zone, self.target_zone);
        apply(&mut package.mission_type, self.mission_type);
        apply(&mut package.notes, self.notes);
    }
}

impl FlightUpdate {
    pub fn apply_to(self, flight: &mut Flight) {
        apply(&mut flight.callsign, self.callsign);
        apply(&mut flight.aircraft_type, self.aircraft_type);
        apply(&mut flight.num_aircraft, self.num_aircraft);
        apply(&mut flight.mission_type, self.mission_type);
        apply(&mut flight.push_time, self.push_time);
        apply(&mut flight.tot, self.tot);
        apply(&mut flight.waypoints, self.waypoints);
        apply(&mut flight.notes, self.notes);
    }
}

// =============================================================================
// Responses
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BriefingLinks {
    pub view_url: String,
    pub edit_url: String,
}

impl BriefingLinks {
    pub fn for_briefing(briefing: &Briefing) -> Self {
        Self {
            view_url: format!("/foothold/briefing/{}", briefing.id),
            edit_url: format!(
                "/foothold/briefing/{}/edit?token={}",
                briefing.id, briefing.edit_token
            ),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BriefingCreateResponse {
    pub briefing: Briefing,
    pub links: BriefingLinks,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BriefingListItem {
    pub id: Uuid,
    pub title: String,
    pub server_name: String,
    pub created_at: DateTime<Local>,
    pub updated_at: DateTime<Local>,
    pub packages_count: usize,
    pub objectives_count: usize,
}

impl From<&Briefing> for BriefingListItem {
    fn from(b: &Briefing) -> Self {
        Self {
            id: b.id,
            title: b.title.clone(),
            server_name: b.server_name.clone(),
            created_at: b.created_at,
            updated_at: b.updated_at,
            packages_count: b.packages.len(),
            objectives_count: b.objectives.len(),
        }
    }
}
