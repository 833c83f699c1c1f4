//! Selection state and the single current-route slot.
use chrono::{DateTime, Utc};

use crate::data::{Catalog, Port};
use crate::rng::RngBundle;
use crate::route::{Route, assemble_route};

/// Session wrapper binding port selections to route assembly.
///
/// Every successful calculation replaces the current route wholesale.
#[derive(Debug)]
pub struct RoutePlanner<'a> {
    catalog: &'a Catalog,
    rngs: RngBundle,
    departure: Option<String>,
    arrival: Option<String>,
    current: Option<Route>,
}

impl<'a> RoutePlanner<'a> {
    /// Planner drawing from operating-system entropy.
    #[must_use]
    pub fn new(catalog: &'a Catalog) -> Self {
        Self::with_rngs(catalog, RngBundle::from_entropy())
    }

    /// Planner whose routes are reproducible from `seed`.
    #[must_use]
    pub fn seeded(catalog: &'a Catalog, seed: u64) -> Self {
        Self::with_rngs(catalog, RngBundle::from_user_seed(seed))
    }

    #[must_use]
    pub const fn with_rngs(catalog: &'a Catalog, rngs: RngBundle) -> Self {
        Self {
            catalog,
            rngs,
            departure: None,
            arrival: None,
            current: None,
        }
    }

    #[must_use]
    pub fn ports(&self) -> &'a [Port] {
        self.catalog.ports()
    }

    /// Ids are stored as given; unknown ids surface when calculating.
    pub fn set_departure(&mut self, id: Option<&str>) {
        self.departure = id.map(str::to_string);
    }

    pub fn set_arrival(&mut self, id: Option<&str>) {
        self.arrival = id.map(str::to_string);
    }

    #[must_use]
    pub fn departure(&self) -> Option<&str> {
        self.departure.as_deref()
    }

    #[must_use]
    pub fn arrival(&self) -> Option<&str> {
        self.arrival.as_deref()
    }

    /// Restart every random stream from `seed`. The current route is kept.
    pub fn reseed(&mut self, seed: u64) {
        self.rngs = RngBundle::from_user_seed(seed);
    }

    /// Assemble a route for the current selection.
    ///
    /// Leaves the slot untouched and returns `None` when either selection is
    /// missing or does not resolve to a catalog port.
    pub fn calculate_route(&mut self, now: DateTime<Utc>) -> Option<&Route> {
        let (Some(departure), Some(arrival)) = (self.departure.as_deref(), self.arrival.as_deref())
        else {
            log::debug!("route calculation skipped: selection incomplete");
            return None;
        };
        let Some(route) = assemble_route(self.catalog, departure, arrival, &self.rngs, now) else {
            log::warn!("route calculation failed for {departure}-{arrival}");
            return None;
        };
        Some(&*self.current.insert(route))
    }

    #[must_use]
    pub const fn current_route(&self) -> Option<&Route> {
        self.current.as_ref()
    }

    #[must_use]
    pub const fn rngs(&self) -> &RngBundle {
        &self.rngs
    }
}
