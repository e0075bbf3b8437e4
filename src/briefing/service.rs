use tracing::info;
use uuid::Uuid;

use super::model::*;
use super::store::BriefingStore;
use crate::error::{Result, SitacError};

/// Token-guarded edits over a briefing store
///
/// Every write loads the briefing, checks the edit token, applies the
/// change, bumps `updated_at` and saves. A rejected token writes nothing.
#[derive(Debug, Clone)]
pub struct BriefingService {
    store: BriefingStore,
}

impl BriefingService {
    pub fn new(store: BriefingStore) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &BriefingStore {
        &self.store
    }

    fn load(&self, id: Uuid) -> Result<Briefing> {
        self.store
            .load(id)?
            .ok_or_else(|| SitacError::not_found("briefing"))
    }

    fn load_for_edit(&self, id: Uuid, token: Uuid) -> Result<Briefing> {
        let briefing = self.load(id)?;
        if briefing.edit_token != token {
            return Err(SitacError::Forbidden);
        }
        Ok(briefing)
    }

    /// Token-checked read-modify-write of one briefing
    fn edit<T, F>(&self, id: Uuid, token: Uuid, change: F) -> Result<T>
    where
        F: FnOnce(&mut Briefing) -> Result<T>,
    {
        let mut briefing = self.load_for_edit(id, token)?;
        briefing.touch();
        let out = change(&mut briefing)?;
        self.store.save(&briefing)?;
        Ok(out)
    }

    pub fn create(&self, data: BriefingCreate) -> Result<BriefingCreateResponse> {
        let mut briefing = Briefing::new(data.server_name, data.title);
        briefing.mission_date = data.mission_date;
        briefing.mission_time = data.mission_time;
        self.store.save(&briefing)?;

        info!(id = %briefing.id, server = %briefing.server_name, "created briefing");
        let links = BriefingLinks::for_briefing(&briefing);
        Ok(BriefingCreateResponse { briefing, links })
    }

    /// Read-only view, edit token redacted
    pub fn get(&self, id: Uuid) -> Result<Briefing> {
        Ok(self.load(id)?.redacted())
    }

    pub fn list_items(&self, server: Option<&str>) -> Result<Vec<BriefingListItem>> {
        Ok(self
            .store
            .list(server)?
            .iter()
            .map(BriefingListItem::from)
            .collect())
    }

    pub fn update(&self, id: Uuid, token: Uuid, data: BriefingUpdate) -> Result<Briefing> {
        self.edit(id, token, |briefing| {
            data.apply_to(briefing);
            Ok(briefing.clone())
        })
    }

    pub fn delete(&self, id: Uuid, token: Uuid) -> Result<()> {
        self.load_for_edit(id, token)?;
        self.store.delete(id)?;
        info!(id = %id, "deleted briefing");
        Ok(())
    }

    // Homeplates

    pub fn add_homeplate(&self, id: Uuid, token: Uuid, data: HomeplateCreate) -> Result<Homeplate> {
        self.edit(id, token, |briefing| {
            let homeplate = Homeplate::from(data);
            briefing.homeplates.push(homeplate.clone());
            Ok(homeplate)
        })
    }

    pub fn update_homeplate(
        &self,
        id: Uuid,
        token: Uuid,
        homeplate_id: Uuid,
        data: HomeplateUpdate,
    ) -> Result<Homeplate> {
        self.edit(id, token, |briefing| {
            let homeplate = briefing
                .homeplates
                .iter_mut()
                .find(|h| h.id == homeplate_id)
                .ok_or_else(|| SitacError::not_found("homeplate"))?;
            data.apply_to(homeplate);
            Ok(homeplate.clone())
        })
    }

    pub fn remove_homeplate(&self, id: Uuid, token: Uuid, homeplate_id: Uuid) -> Result<()> {
        self.edit(id, token, |briefing| {
            briefing.homeplates.retain(|h| h.id != homeplate_id);
            Ok(())
        })
    }

    // Objectives

    pub fn add_objective(&self, id: Uuid, token: Uuid, data: ObjectiveCreate) -> Result<Objective> {
        self.edit(id, token, |briefing| {
            let objective = Objective::from(data);
            briefing.objectives.push(objective.clone());
            Ok(objective)
        })
    }

    pub fn update_objective(
        &self,
        id: Uuid,
        token: Uuid,
        objective_id: Uuid,
        data: ObjectiveUpdate,
    ) -> Result<Objective> {
        self.edit(id, token, |briefing| {
            let objective = briefing
                .objectives
                .iter_mut()
                .find(|o| o.id == objective_id)
                .ok_or_else(|| SitacError::not_found("objective"))?;
            data.apply_to(objective);
            Ok(objective.clone())
        })
    }

    pub fn remove_objective(&self, id: Uuid, token: Uuid, objective_id: Uuid) -> Result<()> {
        self.edit(id, token, |briefing| {
            briefing.objectives.retain(|o| o.id != objective_id);
            Ok(())
        })
    }

    // Packages

    pub fn add_package(&self, id: Uuid, token: Uuid, data: PackageCreate) -> Result<Package> {
        self.edit(id, token, |briefing| {
            let package = Package::from(data);
            briefing.packages.push(package.clone());
            Ok(package)
        })
    }

    pub fn update_package(
        &self,
        id: Uuid,
        token: Uuid,
        package_id: Uuid,
        data: PackageUpdate,
    ) -> Result<Package> {
        self.edit(id, token, |briefing| {
            let package = briefing
                .package_mut(package_id)
                .ok_or_else(|| SitacError::not_found("package"))?;
            data.apply_to(package);
            Ok(package.clone())
        })
    }

    pub fn remove_package(&self, id: Uuid, token: Uuid, package_id: Uuid) -> Result<()> {
        self.edit(id, token, |briefing| {
            briefing.packages.retain(|p| p.id != package_id);
            Ok(())
        })
    }

    // Flights

    pub fn add_flight(
        &self,
        id: Uuid,
        token: Uuid,
        package_id: Uuid,
        data: FlightCreate,
    ) -> Result<Flight> {
        self.edit(id, token, |briefing| {
            let package = briefing
                .package_mut(package_id)
                .ok_or_else(|| SitacError::not_found("package"))?;
            let flight = Flight::from(data);
            package.flights.push(flight.clone());
            Ok(flight)
        })
    }

    pub fn update_flight(
        &self,
        id: Uuid,
        token: Uuid,
        package_id: Uuid,
        flight_id: Uuid,
        data: FlightUpdate,
    ) -> Result<Flight> {
        self.edit(id, token, |briefing| {
            let flight = briefing
                .package_mut(package_id)
                .ok_or_else(|| SitacError::not_found("package"))?
                .flights
                .iter_mut()
                .find(|f| f.id == flight_id)
                .ok_or_else(|| SitacError::not_found("flight"))?;
            data.apply_to(flight);
            Ok(flight.clone())
        })
    }

    pub fn remove_flight(
        &self,
        id: Uuid,
        token: Uuid,
        package_id: Uuid,
        flight_id: Uuid,
    ) -> Result<()> {
        self.edit(id, token, |briefing| {
            briefing
                .package_mut(package_id)
                .ok_or_else(|| SitacError::not_found("package"))?
                .flights
                .retain(|f| f.id != flight_id);
            Ok(())
        })
    }
}
