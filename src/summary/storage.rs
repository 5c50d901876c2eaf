use serde::Serialize;

use crate::{
    arithmetic::{add_safely, divide_safely},
    config::Configuration,
    quantity::{Zero, percent::Percent, power::Watts},
    snapshot::RawSnapshot,
};

/// Energy storage systems.
///
/// Positive active power means discharging, negative means charging.
#[must_use]
#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StorageSummary {
    /// Average over the devices reporting the state of charge.
    pub soc: Option<Percent>,

    pub charge_active_power: Option<Watts>,

    /// Never populated: there is no rated charge power to aggregate yet.
    pub max_charge_active_power: Option<Watts>,

    pub discharge_active_power: Option<Watts>,

    /// Never populated, see [`StorageSummary::max_charge_active_power`].
    pub max_discharge_active_power: Option<Watts>,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, derive_more::Display)]
pub enum StorageDirection {
    #[display("charging")]
    Charging,

    #[display("discharging")]
    Discharging,

    #[display("idle")]
    Idle,
}

impl StorageSummary {
    pub fn aggregate(snapshot: &RawSnapshot, configuration: &Configuration) -> Self {
        let mut soc = None;
        let mut n_soc_readings = 0_u32;
        let mut active_power = None;

        for reading in configuration.storage_devices().filter_map(|id| snapshot.get(id.as_str())) {
            let reading_soc = reading.soc();
            if reading_soc.is_present() {
                soc = add_safely(soc, reading_soc.known().map(Percent));
                n_soc_readings += 1;
            }
            active_power = add_safely(active_power, reading.active_power());
        }

        let (charge_active_power, discharge_active_power) = match active_power {
            None => (None, None),
            Some(active_power) if active_power > Watts::ZERO => {
                (Some(Watts::ZERO), Some(active_power))
            }
            Some(active_power) => (Some(Watts::ZERO - active_power), Some(Watts::ZERO)),
        };

        Self {
            soc: divide_safely(soc, Some(f64::from(n_soc_readings))),
            charge_active_power,
            max_charge_active_power: None,
            discharge_active_power,
            max_discharge_active_power: None,
        }
    }

    pub fn direction(&self) -> StorageDirection {
        if self.charge_active_power.is_some_and(|power| power > Watts::ZERO) {
            StorageDirection::Charging
        } else if self.discharge_active_power.is_some_and(|power| power > Watts::ZERO) {
            StorageDirection::Discharging
        } else {
            StorageDirection::Idle
        }
    }

    /// Power flowing in the current [direction][`StorageSummary::direction`].
    #[must_use]
    pub fn active_power(&self) -> Option<Watts> {
        match self.direction() {
            StorageDirection::Charging => self.charge_active_power,
            StorageDirection::Discharging | StorageDirection::Idle => self.discharge_active_power,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        device::DeviceId,
        snapshot::{Channel, DeviceReading},
    };

    fn configuration(ids: &[&str]) -> Configuration {
        Configuration::builder()
            .storage_devices(ids.iter().copied().map(DeviceId::from).collect())
            .build()
    }

    #[test]
    fn soc_average_ignores_devices_without_channel() {
        let snapshot: RawSnapshot = [
            ("ess0", DeviceReading::default().with(Channel::Soc, 40.0)),
            ("ess1", DeviceReading::default().with(Channel::Soc, 60.0)),
            ("ess2", DeviceReading::default().with(Channel::ActivePower, 100.0)),
        ]
        .into_iter()
        .collect();
        let summary =
            StorageSummary::aggregate(&snapshot, &configuration(&["ess0", "ess1", "ess2"]));
        assert_eq!(summary.soc, Some(Percent(50.0)));
    }

    #[test]
    fn soc_unknown_value_still_counts() {
        let snapshot: RawSnapshot = [
            ("ess0", DeviceReading::default().with(Channel::Soc, 40.0)),
            ("ess1", DeviceReading::default().with_unknown(Channel::Soc)),
        ]
        .into_iter()
        .collect();
        let summary = StorageSummary::aggregate(&snapshot, &configuration(&["ess0", "ess1"]));
        assert_eq!(summary.soc, Some(Percent(20.0)));
    }

    #[test]
    fn discharging() {
        let snapshot: RawSnapshot = [
            ("ess0", DeviceReading::default().with(Channel::ActivePower, 300.0)),
            ("ess1", DeviceReading::default().with(Channel::ActivePower, 200.0)),
        ]
        .into_iter()
        .collect();
        let summary = StorageSummary::aggregate(&snapshot, &configuration(&["ess0", "ess1"]));
        assert_eq!(summary.charge_active_power, Some(Watts::ZERO));
        assert_eq!(summary.discharge_active_power, Some(Watts(500.0)));
        assert_eq!(summary.direction(), StorageDirection::Discharging);
        assert_eq!(summary.active_power(), Some(Watts(500.0)));
    }

    #[test]
    fn charging() {
        let snapshot: RawSnapshot =
            [("ess0", DeviceReading::default().with(Channel::ActivePower, -750.0))]
                .into_iter()
                .collect();
        let summary = StorageSummary::aggregate(&snapshot, &configuration(&["ess0"]));
        assert_eq!(summary.charge_active_power, Some(Watts(750.0)));
        assert_eq!(summary.discharge_active_power, Some(Watts::ZERO));
        assert_eq!(summary.direction(), StorageDirection::Charging);
        assert_eq!(summary.active_power(), Some(Watts(750.0)));
    }

    #[test]
    fn no_data() {
        let summary = StorageSummary::aggregate(&RawSnapshot::default(), &configuration(&["ess0"]));
        assert_eq!(summary, StorageSummary::default());
        assert_eq!(summary.direction(), StorageDirection::Idle);
    }

    #[test]
    fn capacity_is_never_populated() {
        let snapshot: RawSnapshot =
            [("ess0", DeviceReading::default().with(Channel::ActivePower, 100.0))]
                .into_iter()
                .collect();
        let summary = StorageSummary::aggregate(&snapshot, &configuration(&["ess0"]));
        assert_eq!(summary.max_charge_active_power, None);
        assert_eq!(summary.max_discharge_active_power, None);
    }
}
