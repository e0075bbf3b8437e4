//! Read-only figures derived from a loaded sitac

use std::collections::BTreeMap;

use super::model::*;
use crate::error::{Result, SitacError};

impl Zone {
    pub fn side_color(&self) -> &'static str {
        match self.side {
            Side::Red => "red",
            Side::Blue => "blue",
            Side::Neutral => "lightgray",
        }
    }

    pub fn side_str(&self) -> &'static str {
        self.side.as_str()
    }

    /// Remaining units across all groups
    pub fn total_units(&self) -> usize {
        self.remaining_units.values().map(|group| group.len()).sum()
    }

    /// Unit count per type for each group, ordered by group id
    pub fn unit_groups(&self) -> Vec<UnitGroup> {
        self.remaining_units
            .iter()
            .map(|(group_id, units)| {
                let mut counts = BTreeMap::new();
                for unit_type in units.values() {
                    *counts.entry(unit_type.clone()).or_insert(0) += 1;
                }
                UnitGroup {
                    group_id: *group_id,
                    units: counts,
                }
            })
            .collect()
    }
}

impl Player {
    pub fn side_color(&self) -> &'static str {
        match self.coalition.to_ascii_lowercase().as_str() {
            "red" => "red",
            "blue" => "blue",
            _ => "gray",
        }
    }
}

impl Sitac {
    /// Zones shown to players, by name
    pub fn visible_zones(&self) -> impl Iterator<Item = (&String, &Zone)> {
        self.zones.iter().filter(|(_, zone)| !zone.hidden)
    }

    /// Share of visible zones not held by red, in percent
    ///
    /// Neutral zones count as progress whether active or not. No visible
    /// zone gives 0.
    pub fn campaign_progress(&self) -> f64 {
        let (total, not_red) = self
            .visible_zones()
            .fold((0usize, 0usize), |(total, not_red), (_, zone)| {
                (total + 1, not_red + usize::from(zone.side != Side::Red))
            });

        if total == 0 {
            return 0.0;
        }
        not_red as f64 / total as f64 * 100.0
    }

    pub fn red_credits(&self) -> f64 {
        self.accounts.as_ref().map_or(0.0, |a| a.red)
    }

    pub fn blue_credits(&self) -> f64 {
        self.accounts.as_ref().map_or(0.0, |a| a.blue)
    }
}

/// Bounding box of all zones, hidden ones included
///
/// Returns the (min, max) corners.
pub fn sitac_range(sitac: &Sitac) -> Result<(Position, Position)> {
    let mut positions = sitac.zones.values().map(|zone| &zone.position);
    let first = positions.next().ok_or(SitacError::EmptyZones)?;

    let mut min = Position::new(first.latitude, first.longitude);
    let mut max = min.clone();
    for position in positions {
        min.latitude = min.latitude.min(position.latitude);
        min.longitude = min.longitude.min(position.longitude);
        max.latitude = max.latitude.max(position.latitude);
        max.longitude = max.longitude.max(position.longitude);
    }

    Ok((min, max))
}

/// Midpoint of the bounding box
pub fn sitac_center(sitac: &Sitac) -> Result<Position> {
    let (min, max) = sitac_range(sitac)?;
    Ok(Position::new(
        (min.latitude + max.latitude) / 2.0,
        (min.longitude + max.longitude) / 2.0,
    ))
}
