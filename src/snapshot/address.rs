use std::str::FromStr;

use crate::device::DeviceId;

/// Channel address in the `<component>/<channel>` notation, for example `ess0/Soc`.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ChannelAddress {
    pub component: DeviceId,
    pub channel: String,
}

#[derive(Debug, Eq, PartialEq, thiserror::Error)]
pub enum ChannelAddressError {
    #[error("missing the `/` separator")]
    MissingSeparator,

    #[error("empty component identifier")]
    EmptyComponent,

    #[error("empty channel name")]
    EmptyChannel,

    #[error("more than one `/` separator")]
    TooManySeparators,
}

impl FromStr for ChannelAddress {
    type Err = ChannelAddressError;

    fn from_str(address: &str) -> Result<Self, Self::Err> {
        let (component, channel) =
            address.split_once('/').ok_or(ChannelAddressError::MissingSeparator)?;
        if channel.contains('/') {
            return Err(ChannelAddressError::TooManySeparators);
        }
        let (component, channel) = (component.trim(), channel.trim());
        if component.is_empty() {
            return Err(ChannelAddressError::EmptyComponent);
        }
        if channel.is_empty() {
            return Err(ChannelAddressError::EmptyChannel);
        }
        Ok(Self { component: component.into(), channel: channel.to_owned() })
    }
}
