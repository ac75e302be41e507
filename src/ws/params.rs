//! Relay request parameters: dial query, network kind, and frame mode.

use std::fmt;
use std::net::SocketAddr;
use std::str::FromStr;

use serde::Deserialize;

use crate::config::RelayConfig;
use crate::error::RelayError;

/// Query string of `GET /ws?network=tcp&address=host:port`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DialParams {
    /// Network kind: `tcp`, `tcp4`, or `tcp6`.
    pub network: Option<String>,
    /// Upstream `host:port`.
    pub address: Option<String>,
}

/// Network kinds the relay can dial.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Network {
    /// Any address family.
    Tcp,
    /// IPv4 only.
    Tcp4,
    /// IPv6 only.
    Tcp6,
}

impl Network {
    /// Returns `true` if `addr` belongs to this network kind.
    #[must_use]
    pub const fn accepts(self, addr: &SocketAddr) -> bool {
        match self {
            Self::Tcp => true,
            Self::Tcp4 => addr.is_ipv4(),
            Self::Tcp6 => addr.is_ipv6(),
        }
    }
}

impl FromStr for Network {
    type Err = RelayError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "tcp" => Ok(Self::Tcp),
            "tcp4" => Ok(Self::Tcp4),
            "tcp6" => Ok(Self::Tcp6),
            other => Err(RelayError::UnsupportedNetwork(other.to_owned())),
        }
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Tcp => "tcp",
            Self::Tcp4 => "tcp4",
            Self::Tcp6 => "tcp6",
        })
    }
}

/// A validated upstream to dial.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DialTarget {
    /// Address family restriction.
    pub network: Network,
    /// Upstream `host:port`.
    pub address: String,
}

impl DialTarget {
    /// A plain TCP target, used by the fixed relay routes.
    #[must_use]
    pub fn tcp(address: impl Into<String>) -> Self {
        Self {
            network: Network::Tcp,
            address: address.into(),
        }
    }
}

impl DialParams {
    /// Validates the query against the gateway's dial policy.
    ///
    /// # Errors
    ///
    /// - [`RelayError::InvalidRequest`] if `network` or `address` is missing
    ///   or blank.
    /// - [`RelayError::UnsupportedNetwork`] for anything but `tcp`, `tcp4`,
    ///   `tcp6`.
    /// - [`RelayError::TargetNotAllowed`] if the allowlist excludes `address`.
    pub fn validate(&self, config: &RelayConfig) -> Result<DialTarget, RelayError> {
        let network = self.network.as_deref().map(str::trim).filter(|s| !s.is_empty());
        let address = self.address.as_deref().map(str::trim).filter(|s| !s.is_empty());
        let (Some(network), Some(address)) = (network, address) else {
            return Err(RelayError::InvalidRequest(
                "missing 'network' or 'address' query parameters".to_string(),
            ));
        };

        let network: Network = network.parse()?;
        if !config.dial_allowed(address) {
            return Err(RelayError::TargetNotAllowed(address.to_owned()));
        }

        Ok(DialTarget {
            network,
            address: address.to_owned(),
        })
    }
}

/// Frame type used for upstream-to-client traffic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameMode {
    /// UTF-8 text frames; browser terminals write `event.data` directly.
    Text,
    /// Binary frames, byte-exact.
    Binary,
}
