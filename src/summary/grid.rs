use serde::Serialize;

use crate::{
    arithmetic::{add_safely, divide_safely},
    config::Configuration,
    quantity::{Zero, power::Watts},
    snapshot::{DeviceReading, RawSnapshot},
};

/// Grid meters.
///
/// Positive active power means buying from the grid, negative means selling to it.
#[must_use]
#[derive(Copy, Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GridSummary {
    /// Buy or sell power relative to the sell-side capacity, negative when selling.
    ///
    /// It is `0` when no meter reports any power, and unknown when the sell-side capacity is zero.
    pub power_ratio: Option<f64>,

    pub buy_active_power: Option<Watts>,
    pub max_buy_active_power: Watts,
    pub sell_active_power: Option<Watts>,

    /// Magnitude of the summed minimum active power.
    pub max_sell_active_power: Watts,
}

impl GridSummary {
    pub fn aggregate(snapshot: &RawSnapshot, configuration: &Configuration) -> Self {
        let mut active_power = None;
        let mut max_buy = Watts::ZERO;
        let mut max_sell = Watts::ZERO;

        for meter in configuration.grid_meters() {
            active_power = add_safely(
                active_power,
                snapshot.get(meter.as_str()).and_then(DeviceReading::active_power),
            );
            if let Some(attributes) = configuration.attributes(meter.as_str()) {
                max_buy += attributes.max_active_power.unwrap_or(Watts::ZERO);
                max_sell += attributes.min_active_power.unwrap_or(Watts::ZERO);
            }
        }

        let max_sell_active_power = Watts::ZERO - max_sell;
        let (buy_active_power, sell_active_power, power_ratio) = match active_power {
            None => (None, None, Some(0.0)),
            Some(active_power) if active_power > Watts::ZERO => (
                Some(active_power),
                Some(Watts::ZERO),
                divide_safely(Some(active_power), Some(max_sell_active_power)),
            ),
            Some(active_power) => {
                let sell_active_power = Watts::ZERO - active_power;
                let ratio = divide_safely(Some(sell_active_power), Some(max_sell_active_power));
                (Some(Watts::ZERO), Some(sell_active_power), ratio.map(|ratio| 0.0 - ratio))
            }
        };

        Self {
            power_ratio,
            buy_active_power,
            max_buy_active_power: max_buy,
            sell_active_power,
            max_sell_active_power,
        }
    }

    /// Power flowing through the grid connection, whichever the direction.
    #[must_use]
    pub fn active_power(&self) -> Option<Watts> {
        match self.buy_active_power {
            Some(power) if power > Watts::ZERO => Some(power),
            _ => self.sell_active_power,
        }
    }
}
