use serde::Serialize;

use crate::{
    arithmetic::{add_safely, divide_safely, subtract_safely},
    quantity::{Zero, power::Watts},
    summary::{GridSummary, ProductionSummary, StorageSummary},
};

/// Household consumption, derived from the other categories.
#[must_use]
#[derive(Copy, Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsumptionSummary {
    /// Percentage of the combined rated power.
    pub power_ratio: Option<f64>,

    pub active_power: Option<Watts>,
}

impl ConsumptionSummary {
    /// Close the balance: `buy + production AC + discharge - sell - charge`.
    ///
    /// DC production is not part of the balance: the storage active power already includes it.
    pub fn balance(
        storage: &StorageSummary,
        grid: &GridSummary,
        production: &ProductionSummary,
    ) -> Self {
        let plus = add_safely(
            add_safely(grid.buy_active_power, production.active_power_ac),
            storage.discharge_active_power,
        );
        let minus = add_safely(grid.sell_active_power, storage.charge_active_power);
        let active_power = subtract_safely(plus, minus);

        let max_active_power = grid.max_buy_active_power - grid.max_sell_active_power
            + production.max_active_power
            + storage.max_charge_active_power.unwrap_or(Watts::ZERO)
            - storage.max_discharge_active_power.unwrap_or(Watts::ZERO);

        Self {
            power_ratio: divide_safely(active_power, Some(max_active_power / 100.0)),
            active_power,
        }
    }
}
