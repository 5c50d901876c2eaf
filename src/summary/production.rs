use serde::Serialize;

use crate::{
    arithmetic::{add_safely, divide_safely},
    config::Configuration,
    prelude::*,
    quantity::{Zero, power::Watts},
    snapshot::{DeviceReading, RawSnapshot},
};

/// Production meters and DC chargers.
#[must_use]
#[derive(Copy, Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductionSummary {
    /// Percentage of the rated production, `100` when nothing is rated.
    pub power_ratio: Option<f64>,

    /// AC and DC production combined.
    pub active_power: Option<Watts>,

    #[serde(rename = "activePowerAC")]
    pub active_power_ac: Option<Watts>,

    #[serde(rename = "activePowerDC")]
    pub active_power_dc: Option<Watts>,

    pub max_active_power: Watts,
}

impl ProductionSummary {
    pub fn aggregate(snapshot: &RawSnapshot, configuration: &Configuration) -> Self {
        let mut active_power_ac = None;
        let mut active_power_dc = None;
        let mut max_active_power = Watts::ZERO;

        for meter in configuration.production_meters() {
            let reading = snapshot.get(meter.as_str());
            active_power_ac =
                add_safely(active_power_ac, reading.and_then(DeviceReading::active_power));
            if let Some(actual_power) = reading.and_then(DeviceReading::actual_power) {
                active_power_dc = add_safely(active_power_dc, Some(actual_power));
            }
            if let Some(attributes) = configuration.attributes(meter.as_str()) {
                max_active_power += attributes.max_active_power.unwrap_or(Watts::ZERO);
                max_active_power += attributes.max_actual_power.unwrap_or(Watts::ZERO);
            }
        }

        // Published as is, a negative production hints at a misconfigured meter:
        if let Some(active_power_ac) = active_power_ac
            && active_power_ac < Watts::ZERO
        {
            let meters = configuration.production_meters().collect::<Vec<_>>();
            warn!(?meters, %active_power_ac, "negative production");
        }
        let max_active_power = max_active_power.max(Watts::ZERO);

        let active_power = add_safely(active_power_ac, active_power_dc);
        let power_ratio = if max_active_power == Watts::ZERO {
            Some(100.0)
        } else {
            divide_safely(active_power, Some(max_active_power / 100.0))
        };

        Self { power_ratio, active_power, active_power_ac, active_power_dc, max_active_power }
    }
}
