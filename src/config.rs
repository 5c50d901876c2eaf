//! Device categories and rated power.

use std::{collections::BTreeMap, fs, path::Path, str::FromStr};

use bon::Builder;
use itertools::Itertools;
use serde::Deserialize;

use crate::{
    device::DeviceId,
    prelude::*,
    quantity::{Finite, Zero, power::Watts},
};

/// Which devices contribute to which category, and how powerful they are.
///
/// The category lists behave like ordered sets: a repeated identifier only counts once.
#[must_use]
#[derive(Clone, Debug, Default, Deserialize, Builder)]
pub struct Configuration {
    #[serde(default, alias = "storageDevices")]
    #[builder(default)]
    storage_devices: Vec<DeviceId>,

    #[serde(default, alias = "gridMeters")]
    #[builder(default)]
    grid_meters: Vec<DeviceId>,

    #[serde(default, alias = "productionMeters")]
    #[builder(default)]
    production_meters: Vec<DeviceId>,

    /// Rated power per device.
    #[serde(default)]
    #[builder(default)]
    devices: BTreeMap<DeviceId, DeviceAttributes>,
}

/// Rated power of a single device. Missing values contribute nothing.
#[must_use]
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Deserialize, Builder)]
pub struct DeviceAttributes {
    /// Import, charge, or production ceiling.
    #[serde(default, alias = "maxActivePower")]
    pub max_active_power: Option<Watts>,

    /// Export or discharge floor, non-positive.
    #[serde(default, alias = "minActivePower")]
    pub min_active_power: Option<Watts>,

    /// DC production ceiling.
    #[serde(default, alias = "maxActualPower")]
    pub max_actual_power: Option<Watts>,
}

impl Configuration {
    pub fn from_toml_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read the configuration from `{}`", path.display()))?;
        contents
            .parse::<Self>()
            .with_context(|| format!("failed to parse the configuration from `{}`", path.display()))
    }

    pub fn storage_devices(&self) -> impl Iterator<Item = &DeviceId> {
        self.storage_devices.iter().unique()
    }

    pub fn grid_meters(&self) -> impl Iterator<Item = &DeviceId> {
        self.grid_meters.iter().unique()
    }

    pub fn production_meters(&self) -> impl Iterator<Item = &DeviceId> {
        self.production_meters.iter().unique()
    }

    #[must_use]
    pub fn attributes(&self, id: &str) -> Option<&DeviceAttributes> {
        self.devices.get(id)
    }

    /// Grid and production meters without rated power. Storage devices have none to look up.
    fn unrated_meters(&self) -> impl Iterator<Item = &DeviceId> {
        self.grid_meters()
            .chain(self.production_meters())
            .filter(|id| !self.devices.contains_key(id.as_str()))
    }

    fn validate(&self) -> Result {
        for (id, attributes) in &self.devices {
            for (name, power) in [
                ("max_active_power", attributes.max_active_power),
                ("min_active_power", attributes.min_active_power),
                ("max_actual_power", attributes.max_actual_power),
            ] {
                if let Some(power) = power {
                    ensure!(power.is_finite(), "`{id}`: `{name}` must be finite, got `{power:?}`");
                }
            }
        }
        Ok(())
    }

    fn lint(&self) {
        for (category, ids) in [
            ("storage", &self.storage_devices),
            ("grid", &self.grid_meters),
            ("production", &self.production_meters),
        ] {
            for id in ids.iter().duplicates() {
                warn!(category, %id, "duplicate device identifier");
            }
        }
        for id in self.unrated_meters() {
            debug!(%id, "no rated power, assuming zero");
        }
        for (id, attributes) in &self.devices {
            if let Some(min_active_power) = attributes.min_active_power
                && min_active_power > Watts::ZERO
            {
                warn!(%id, %min_active_power, "minimum active power is expected to be non-positive");
            }
        }
    }
}

impl FromStr for Configuration {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let configuration: Self = toml::from_str(s)?;
        configuration.validate()?;
        configuration.lint();
        Ok(configuration)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_ok() -> Result {
        // language=toml
        let toml = r#"
            storage_devices = ["ess0"]
            gridMeters = ["meter0"]
            production_meters = ["meter1", "charger0"]

            [devices.meter0]
            maxActivePower = 10000
            minActivePower = -5000

            [devices.meter1]
            max_active_power = 3000.5

            [devices.charger0]
            max_actual_power = 1500
        "#;
        let configuration: Configuration = toml.parse()?;
        assert_eq!(configuration.storage_devices().collect_vec(), [&DeviceId::from("ess0")]);
        assert_eq!(configuration.grid_meters().collect_vec(), [&DeviceId::from("meter0")]);
        assert_eq!(configuration.production_meters().count(), 2);
        assert_eq!(
            configuration.attributes("meter0"),
            Some(&DeviceAttributes {
                max_active_power: Some(Watts(10000.0)),
                min_active_power: Some(Watts(-5000.0)),
                max_actual_power: None,
            }),
        );
        assert_eq!(
            configuration.attributes("meter1").and_then(|it| it.max_active_power),
            Some(Watts(3000.5)),
        );
        assert_eq!(
            configuration.attributes("charger0").and_then(|it| it.max_actual_power),
            Some(Watts(1500.0)),
        );
        assert!(configuration.attributes("ess0").is_none());
        Ok(())
    }

    #[test]
    fn parse_empty() -> Result {
        let configuration: Configuration = "".parse()?;
        assert_eq!(configuration.storage_devices().count(), 0);
        assert_eq!(configuration.grid_meters().count(), 0);
        assert_eq!(configuration.production_meters().count(), 0);
        Ok(())
    }

    #[test]
    fn duplicates_count_once() {
        let configuration = Configuration::builder()
            .grid_meters(["meter0", "meter1", "meter0"].map(DeviceId::from).into())
            .build();
        assert_eq!(
            configuration.grid_meters().collect_vec(),
            [&DeviceId::from("meter0"), &DeviceId::from("meter1")],
        );
    }

    #[test]
    fn unrated_meters_exclude_storage() {
        let configuration = Configuration::builder()
            .storage_devices(vec![DeviceId::from("ess0")])
            .grid_meters(vec![DeviceId::from("meter0")])
            .production_meters(vec![DeviceId::from("meter1")])
            .devices(BTreeMap::from([(DeviceId::from("meter1"), DeviceAttributes::default())]))
            .build();
        assert_eq!(configuration.unrated_meters().collect_vec(), [&DeviceId::from("meter0")]);
    }

    #[test]
    fn non_finite_power_is_rejected() {
        for value in ["nan", "inf", "-inf"] {
            let toml = format!("[devices.meter1]\nmax_active_power = {value}");
            assert!(toml.parse::<Configuration>().is_err(), "{value}");
        }
        let error = "[devices.meter0]\nmin_active_power = -nan"
            .parse::<Configuration>()
            .unwrap_err();
        assert!(error.to_string().contains("min_active_power"));
    }

    #[test]
    fn parse_invalid() {
        assert!("grid_meters = 42".parse::<Configuration>().is_err());
    }
}
