mod consumption;
mod grid;
mod production;
mod storage;

use serde::Serialize;

pub use self::{
    consumption::ConsumptionSummary,
    grid::GridSummary,
    production::ProductionSummary,
    storage::{StorageDirection, StorageSummary},
};
use crate::{config::Configuration, prelude::*, snapshot::RawSnapshot};

/// Power balance of the site at the moment of the snapshot.
#[must_use]
#[derive(Copy, Clone, Debug, PartialEq, Serialize)]
pub struct Summary {
    pub storage: StorageSummary,
    pub grid: GridSummary,
    pub production: ProductionSummary,
    pub consumption: ConsumptionSummary,
}

impl Summary {
    /// Consumption is derived from the other three categories, hence aggregated last.
    #[instrument(skip_all)]
    pub fn compute(snapshot: &RawSnapshot, configuration: &Configuration) -> Self {
        let storage = StorageSummary::aggregate(snapshot, configuration);
        let grid = GridSummary::aggregate(snapshot, configuration);
        let production = ProductionSummary::aggregate(snapshot, configuration);
        let consumption = ConsumptionSummary::balance(&storage, &grid, &production);
        debug!(
            consumption = ?consumption.active_power,
            production = ?production.active_power,
            grid = ?grid.active_power(),
            storage = ?storage.active_power(),
            "computed"
        );
        Self { storage, grid, production, consumption }
    }
}
