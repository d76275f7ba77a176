//! Shelter look-ups that need no policy.

use serde::Serialize;

use crate::{ShelterRecord, ZoneRecord};

/// Assumed driving speed through flooded streets.
pub const FLOOD_TRAVEL_SPEED_KMH: f64 = 12.0;

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ShelterRecommendation {
    pub shelter_id:             String,
    pub distance_km:            f64,
    pub estimated_time_minutes: f64,
    pub capacity_remaining:     i64,
}

/// The `k` nearest operational shelters to `zone`, closest first.
///
/// Distance is great-circle; the ETA assumes [`FLOOD_TRAVEL_SPEED_KMH`]
/// rounded to whole minutes.
pub fn quick_recommendations(zone: &ZoneRecord, shelters: &[ShelterRecord], k: usize) -> Vec<ShelterRecommendation> {
    let origin = zone.position();
    let mut recs: Vec<ShelterRecommendation> = shelters
        .iter()
        .filter(|s| s.operational)
        .map(|s| {
            let distance_km = origin.distance_km(s.position());
            ShelterRecommendation {
                shelter_id: s.id.clone(),
                distance_km,
                estimated_time_minutes: (distance_km / FLOOD_TRAVEL_SPEED_KMH * 60.0).round(),
                capacity_remaining: s.remaining_capacity(),
            }
        })
        .collect();
    recs.sort_by(|a, b| a.distance_km.total_cmp(&b.distance_km));
    recs.truncate(k);
    recs
}

// ── Capacity overview ─────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ShelterCapacity {
    pub id:          String,
    pub capacity:    u32,
    pub occupancy:   u32,
    pub available:   i64,
    pub operational: bool,
}

/// Aggregate capacity across all shelters, operational or not.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ShelterCapacityOverview {
    pub total_shelters:       usize,
    pub operational_shelters: usize,
    pub total_capacity:       u64,
    pub current_occupancy:    u64,
    pub available_capacity:   i64,
    /// Occupancy over capacity, percent to one decimal.  0 with no capacity.
    pub utilisation_percent:  f64,
    pub shelters:             Vec<ShelterCapacity>,
}

impl ShelterCapacityOverview {
    pub fn from_shelters(shelters: &[ShelterRecord]) -> Self {
        let total_capacity: u64 = shelters.iter().map(|s| u64::from(s.env_capacity())).sum();
        let current_occupancy: u64 = shelters.iter().map(|s| u64::from(s.current_occupancy)).sum();
        let utilisation_percent = if total_capacity > 0 {
            (current_occupancy as f64 / total_capacity as f64 * 1000.0).round() / 10.0
        } else {
            0.0
        };

        Self {
            total_shelters: shelters.len(),
            operational_shelters: shelters.iter().filter(|s| s.operational).count(),
            total_capacity,
            current_occupancy,
            available_capacity: total_capacity as i64 - current_occupancy as i64,
            utilisation_percent,
            shelters: shelters
                .iter()
                .map(|s| ShelterCapacity {
                    id:          s.id.clone(),
                    capacity:    s.env_capacity(),
                    occupancy:   s.current_occupancy,
                    available:   s.remaining_capacity(),
                    operational: s.operational,
                })
                .collect(),
        }
    }
}
