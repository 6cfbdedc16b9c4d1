use serde::{Deserialize, Serialize};

use crate::geo::Coordinate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MarkerRole {
    Driver,
    Pickup,
    Dropoff,
}

impl MarkerRole {
    pub const ALL: [MarkerRole; 3] = [MarkerRole::Driver, MarkerRole::Pickup, MarkerRole::Dropoff];

    pub fn style(self) -> MarkerStyle {
        match self {
            MarkerRole::Driver => MarkerStyle::DriverArrow,
            MarkerRole::Pickup => MarkerStyle::PickupDot,
            MarkerRole::Dropoff => MarkerStyle::DropoffPin,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            MarkerRole::Driver => "Driver",
            MarkerRole::Pickup => "Pickup",
            MarkerRole::Dropoff => "Drop-off",
        }
    }
}

/// Visual shape a renderer should draw for a marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MarkerStyle {
    DriverArrow,
    PickupDot,
    DropoffPin,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MarkerId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Marker {
    pub id: MarkerId,
    pub role: MarkerRole,
    pub coordinate: Coordinate,
    pub style: MarkerStyle,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MarkerChange {
    Created(Marker),
    Moved {
        id: MarkerId,
        role: MarkerRole,
        coordinate: Coordinate,
    },
    Removed {
        id: MarkerId,
        role: MarkerRole,
    },
}

/// At most one marker per role. Ids are never reused.
#[derive(Debug, Default)]
pub struct MarkerSet {
    driver: Option<Marker>,
    pickup: Option<Marker>,
    dropoff: Option<Marker>,
    next_id: u64,
}

impl MarkerSet {
    fn slot_mut(&mut self, role: MarkerRole) -> &mut Option<Marker> {
        match role {
            MarkerRole::Driver => &mut self.driver,
            MarkerRole::Pickup => &mut self.pickup,
            MarkerRole::Dropoff => &mut self.dropoff,
        }
    }

    pub fn get(&self, role: MarkerRole) -> Option<&Marker> {
        match role {
            MarkerRole::Driver => self.driver.as_ref(),
            MarkerRole::Pickup => self.pickup.as_ref(),
            MarkerRole::Dropoff => self.dropoff.as_ref(),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Marker> {
        [&self.driver, &self.pickup, &self.dropoff]
            .into_iter()
            .filter_map(Option::as_ref)
    }

    /// Bring the marker for `role` in line with `coordinate`: create on
    /// absent->defined, move in place on a changed value, remove on
    /// defined->absent.
    pub fn reconcile(
        &mut self,
        role: MarkerRole,
        coordinate: Option<Coordinate>,
    ) -> Option<MarkerChange> {
        let next_id = self.next_id;
        let slot = self.slot_mut(role);
        match (slot.as_mut(), coordinate) {
            (None, None) => None,
            (None, Some(coordinate)) => {
                let marker = Marker {
                    id: MarkerId(next_id),
                    role,
                    coordinate,
                    style: role.style(),
                };
                *slot = Some(marker);
                self.next_id += 1;
                Some(MarkerChange::Created(marker))
            }
            (Some(marker), Some(coordinate)) => {
                if marker.coordinate == coordinate {
                    return None;
                }
                marker.coordinate = coordinate;
                Some(MarkerChange::Moved {
                    id: marker.id,
                    role,
                    coordinate,
                })
            }
            (Some(marker), None) => {
                let id = marker.id;
                *slot = None;
                Some(MarkerChange::Removed { id, role })
            }
        }
    }

    /// Remove every marker.
    pub fn clear(&mut self) -> Vec<MarkerChange> {
        MarkerRole::ALL
            .into_iter()
            .filter_map(|role| self.reconcile(role, None))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lifecycle_create_move_remove() {
        let mut markers = MarkerSet::default();
        let a = Coordinate::new(1.0, 2.0);
        let b = Coordinate::new(1.5, 2.5);

        let Some(MarkerChange::Created(created)) = markers.reconcile(MarkerRole::Pickup, Some(a))
        else {
            panic!("expected creation");
        };
        assert_eq!(created.style, MarkerStyle::PickupDot);

        assert_eq!(markers.reconcile(MarkerRole::Pickup, Some(a)), None);
        assert_eq!(
            markers.reconcile(MarkerRole::Pickup, Some(b)),
            Some(MarkerChange::Moved {
                id: created.id,
                role: MarkerRole::Pickup,
                coordinate: b,
            })
        );
        assert_eq!(
            markers.reconcile(MarkerRole::Pickup, None),
            Some(MarkerChange::Removed {
                id: created.id,
                role: MarkerRole::Pickup,
            })
        );
        assert!(markers.get(MarkerRole::Pickup).is_none());
    }

    #[test]
    fn roles_are_independent() {
        let mut markers = MarkerSet::default();
        markers.reconcile(MarkerRole::Driver, Some(Coordinate::new(0.0, 0.0)));
        markers.reconcile(MarkerRole::Dropoff, Some(Coordinate::new(1.0, 1.0)));
        markers.reconcile(MarkerRole::Driver, None);

        assert!(markers.get(MarkerRole::Driver).is_none());
        assert!(markers.get(MarkerRole::Dropoff).is_some());
        assert_eq!(markers.iter().count(), 1);
    }

    #[test]
    fn recreated_marker_gets_a_new_id() {
        let mut markers = MarkerSet::default();
        let point = Coordinate::new(0.0, 0.0);
        let first = markers.reconcile(MarkerRole::Driver, Some(point));
        markers.reconcile(MarkerRole::Driver, None);
        let second = markers.reconcile(MarkerRole::Driver, Some(point));
        match (first, second) {
            (Some(MarkerChange::Created(a)), Some(MarkerChange::Created(b))) => {
                assert_ne!(a.id, b.id)
            }
            other => panic!("unexpected changes: {other:?}"),
        }
    }
}
