//! Simulated fraud screening for attendance submissions.
//!
//! This is a demonstration heuristic, not a real detector: a random share of
//! submissions is flagged, then a flat-earth distance test against a single
//! reference coordinate decides the outcome for submissions carrying a
//! location. Submissions without a location are always flagged.

use rand::Rng;
use rand::seq::SliceRandom;

use crate::models::attendance_record::{FraudCheck, Geolocation};

/// Kilometres per degree of latitude (and of longitude at the equator).
const KM_PER_DEGREE: f64 = 111.0;

pub const NO_ISSUES: &str = "No issues detected.";
pub const OUTSIDE_AREA: &str = "Geolocation is outside the expected classroom area.";
pub const LOCATION_MISSING: &str = "Geolocation data missing or could not be obtained.";

pub const RANDOM_REASONS: [&str; 3] = [
    "Unusual activity pattern detected.",
    "Potential VPN usage identified.",
    "High velocity movement detected.",
];

/// Tunables of the heuristic.
#[derive(Debug, Clone, PartialEq)]
pub struct FraudPolicy {
    pub reference: Geolocation,
    pub radius_km: f64,
    /// Probability in `[0, 1]` of a random suspicion flag.
    pub random_rate: f64,
}

impl Default for FraudPolicy {
    fn default() -> Self {
        Self {
            reference: Geolocation {
                latitude: 41.5369,
                longitude: -8.4239,
            },
            radius_km: 0.5,
            random_rate: 0.2,
        }
    }
}

impl FraudPolicy {
    pub fn from_config() -> Self {
        let (latitude, longitude) = util::config::classroom_location();
        Self {
            reference: Geolocation {
                latitude,
                longitude,
            },
            radius_km: util::config::fraud_radius_km(),
            random_rate: probability(util::config::fraud_random_rate()),
        }
    }

    /// Per-axis distance in km between `geo` and the reference point.
    pub fn axis_distances_km(&self, geo: &Geolocation) -> (f64, f64) {
        let lat_km = (geo.latitude - self.reference.latitude).abs() * KM_PER_DEGREE;
        let lon_km = (geo.longitude - self.reference.longitude).abs()
            * KM_PER_DEGREE
            * self.reference.latitude.to_radians().cos().abs();
        (lat_km, lon_km)
    }

    pub fn is_outside(&self, geo: &Geolocation) -> bool {
        let (lat_km, lon_km) = self.axis_distances_km(geo);
        lat_km > self.radius_km || lon_km > self.radius_km
    }
}

fn probability(rate: f64) -> f64 {
    if rate.is_finite() { rate.clamp(0.0, 1.0) } else { 0.0 }
}

/// Screens one submission.
///
/// The random draw happens first; a location outside the radius, or no
/// location at all, then overrides its explanation.
pub fn assess<R: Rng + ?Sized>(
    rng: &mut R,
    geolocation: Option<&Geolocation>,
    policy: &FraudPolicy,
) -> FraudCheck {
    let mut check = FraudCheck {
        is_fraudulent: false,
        explanation: NO_ISSUES.to_string(),
    };

    if rng.gen_bool(probability(policy.random_rate)) {
        let reason = RANDOM_REASONS.choose(rng).copied().unwrap_or(RANDOM_REASONS[0]);
        check.is_fraudulent = true;
        check.explanation = reason.to_string();
    }

    match geolocation {
        Some(geo) if policy.is_outside(geo) => {
            check.is_fraudulent = true;
            check.explanation = OUTSIDE_AREA.to_string();
        }
        Some(_) => {}
        None => {
            check.is_fraudulent = true;
            check.explanation = LOCATION_MISSING.to_string();
        }
    }

    check
}
