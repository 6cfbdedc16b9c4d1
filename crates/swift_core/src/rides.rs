//! Ride type catalog and fare estimates.

/// Fare before the ride type multiplier is applied.
pub const BASE_FARE: f64 = 12.50;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum RideTypeId {
    #[default]
    Economy,
    Comfort,
    Express,
    Premium,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RideType {
    pub id: RideTypeId,
    pub name: &'static str,
    pub description: &'static str,
    pub multiplier: f64,
    /// Pickup wait shown next to the fare.
    pub eta_label: &'static str,
}

pub const RIDE_TYPES: [RideType; 4] = [
    RideType {
        id: RideTypeId::Economy,
        name: "Economy",
        description: "Affordable rides",
        multiplier: 1.0,
        eta_label: "3 min",
    },
    RideType {
        id: RideTypeId::Comfort,
        name: "Comfort",
        description: "Extra legroom",
        multiplier: 1.3,
        eta_label: "5 min",
    },
    RideType {
        id: RideTypeId::Express,
        name: "Express",
        description: "Fastest pickup",
        multiplier: 1.5,
        eta_label: "2 min",
    },
    RideType {
        id: RideTypeId::Premium,
        name: "Premium",
        description: "Luxury vehicles",
        multiplier: 2.0,
        eta_label: "7 min",
    },
];

impl RideTypeId {
    pub fn ride_type(self) -> &'static RideType {
        match self {
            RideTypeId::Economy => &RIDE_TYPES[0],
            RideTypeId::Comfort => &RIDE_TYPES[1],
            RideTypeId::Express => &RIDE_TYPES[2],
            RideTypeId::Premium => &RIDE_TYPES[3],
        }
    }
}

impl RideType {
    pub fn fare(&self, base_fare: f64) -> f64 {
        base_fare * self.multiplier
    }
}

/// Dollar amount with two decimals, e.g. `$16.25`.
pub fn format_fare(amount: f64) -> String {
    format!("${amount:.2}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_lookup_matches_ids() {
        for ride in &RIDE_TYPES {
            assert_eq!(ride.id.ride_type().id, ride.id);
        }
    }

    #[test]
    fn fares_scale_the_base_fare() {
        let fares: Vec<String> = RIDE_TYPES
            .iter()
            .map(|ride| format_fare(ride.fare(BASE_FARE)))
            .collect();
        assert_eq!(fares, vec!["$12.50", "$16.25", "$18.75", "$25.00"]);
    }
}
