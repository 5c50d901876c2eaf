//! Raw current-data snapshot as delivered by the edge.

mod address;

use std::collections::BTreeMap;

use serde::Deserialize;
use serde_json::Value;

pub use self::address::{ChannelAddress, ChannelAddressError};
use crate::{
    device::DeviceId,
    prelude::*,
    quantity::{Finite, power::Watts},
};

/// Channels the summary cares about.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum Channel {
    /// State of charge, percent.
    Soc,

    /// Total active power, watts.
    ActivePower,

    ActivePowerL1,
    ActivePowerL2,
    ActivePowerL3,

    /// DC production power of a charger, watts.
    ActualPower,
}

impl Channel {
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Soc => "Soc",
            Self::ActivePower => "ActivePower",
            Self::ActivePowerL1 => "ActivePowerL1",
            Self::ActivePowerL2 => "ActivePowerL2",
            Self::ActivePowerL3 => "ActivePowerL3",
            Self::ActualPower => "ActualPower",
        }
    }
}

/// Channel lookup result, distinguishing a missing channel from one reported without a value.
#[must_use]
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum ChannelValue {
    Absent,
    Unknown,
    Known(f64),
}

impl ChannelValue {
    pub const fn is_present(self) -> bool {
        !matches!(self, Self::Absent)
    }

    pub const fn known(self) -> Option<f64> {
        match self {
            Self::Known(value) => Some(value),
            Self::Absent | Self::Unknown => None,
        }
    }
}

/// Numeric value of a raw channel, `Some(None)` for `null`.
///
/// Text and boolean channels are of no interest to the summary, and are skipped.
fn numeric_value(channel: &str, value: &Value) -> Option<Option<f64>> {
    match value {
        Value::Null => Some(None),
        Value::Number(number) => Some(number.as_f64()),
        _ => {
            trace!(channel, %value, "skipping non-numeric channel");
            None
        }
    }
}

/// Channel values of a single device.
#[must_use]
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(from = "BTreeMap<String, Value>")]
pub struct DeviceReading(BTreeMap<String, Option<f64>>);

impl DeviceReading {
    pub fn with(mut self, channel: Channel, value: f64) -> Self {
        self.0.insert(channel.name().to_owned(), Some(value));
        self
    }

    /// Add the channel without a value.
    pub fn with_unknown(mut self, channel: Channel) -> Self {
        self.0.insert(channel.name().to_owned(), None);
        self
    }

    /// Set the channel value, returning the replaced one, if any.
    pub fn insert(&mut self, channel: impl Into<String>, value: Option<f64>) -> Option<Option<f64>> {
        self.0.insert(channel.into(), value)
    }

    /// Non-finite numbers are reported as unknown.
    pub fn channel(&self, channel: Channel) -> ChannelValue {
        match self.0.get(channel.name()) {
            None => ChannelValue::Absent,
            Some(Some(value)) if value.is_finite() => ChannelValue::Known(*value),
            Some(_) => ChannelValue::Unknown,
        }
    }

    pub fn soc(&self) -> ChannelValue {
        self.channel(Channel::Soc)
    }

    /// Total active power: the sum of all three phases when each of them is known,
    /// otherwise the aggregated `ActivePower` channel.
    ///
    /// A phase sum overflowing into an infinity counts as unknown.
    #[must_use]
    pub fn active_power(&self) -> Option<Watts> {
        let phases = [Channel::ActivePowerL1, Channel::ActivePowerL2, Channel::ActivePowerL3]
            .map(|phase| self.channel(phase).known());
        let total = match phases {
            [Some(l1), Some(l2), Some(l3)] => Some(Watts(l1 + l2 + l3)).filter(Finite::is_finite),
            _ => None,
        };
        total.or_else(|| self.channel(Channel::ActivePower).known().map(Watts))
    }

    /// DC power, if reported.
    #[must_use]
    pub fn actual_power(&self) -> Option<Watts> {
        self.channel(Channel::ActualPower).known().map(Watts)
    }
}

impl From<BTreeMap<String, Value>> for DeviceReading {
    fn from(channels: BTreeMap<String, Value>) -> Self {
        Self(
            channels
                .into_iter()
                .filter_map(|(channel, value)| {
                    numeric_value(&channel, &value).map(|value| (channel, value))
                })
                .collect(),
        )
    }
}

impl FromIterator<(Channel, Option<f64>)> for DeviceReading {
    fn from_iter<I: IntoIterator<Item = (Channel, Option<f64>)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(channel, value)| (channel.name().to_owned(), value)).collect())
    }
}

/// Current data of all devices, keyed by device identifier.
#[must_use]
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(transparent)]
pub struct RawSnapshot(BTreeMap<DeviceId, DeviceReading>);

impl RawSnapshot {
    /// Group flat `component/channel` values into device readings.
    ///
    /// A repeated address overwrites the earlier value.
    pub fn from_channel_values<I, A>(values: I) -> Result<Self>
    where
        I: IntoIterator<Item = (A, Option<f64>)>,
        A: AsRef<str>,
    {
        let mut snapshot = Self::default();
        for (address, value) in values {
            let address = address.as_ref();
            let ChannelAddress { component, channel } = address
                .parse::<ChannelAddress>()
                .with_context(|| format!("invalid channel address `{address}`"))?;
            if snapshot.0.entry(component).or_default().insert(channel, value).is_some() {
                warn!(address, "repeated channel address, overwriting the earlier value");
            }
        }
        Ok(snapshot)
    }

    /// Parse a flat JSON object like `{"ess0/Soc": 55, "meter0/ActivePower": null}`.
    ///
    /// Non-numeric values are skipped.
    pub fn from_flat_json(json: &str) -> Result<Self> {
        let values: BTreeMap<String, Value> =
            serde_json::from_str(json).context("failed to deserialize the channel values")?;
        Self::from_channel_values(values.iter().filter_map(|(address, value)| {
            numeric_value(address, value).map(|value| (address, value))
        }))
    }

    #[must_use]
    pub fn get(&self, id: &str) -> Option<&DeviceReading> {
        let reading = self.0.get(id);
        if reading.is_none() {
            debug!(id, "device is missing from the snapshot");
        }
        reading
    }
}

impl<I: Into<DeviceId>> FromIterator<(I, DeviceReading)> for RawSnapshot {
    fn from_iter<T: IntoIterator<Item = (I, DeviceReading)>>(iter: T) -> Self {
        Self(iter.into_iter().map(|(id, reading)| (id.into(), reading)).collect())
    }
}
