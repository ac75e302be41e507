//! Page location and the socket URL derived from it.

use url::Url;

use crate::error::BridgeError;

/// Fixed path of the terminal endpoint on the serving host.
pub const SSH_PATH: &str = "/ssh";

/// Host name and port of the page that loaded the bridge.
///
/// The socket URL is always derived from these two values, mirroring what a
/// browser exposes as `location.hostname` and `location.port`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageLocation {
    hostname: String,
    port: Option<u16>,
}

impl PageLocation {
    /// Creates a location from a host name and optional port.
    #[must_use]
    pub fn new(hostname: impl Into<String>, port: Option<u16>) -> Self {
        Self {
            hostname: hostname.into(),
            port,
        }
    }

    /// Parses a page address such as `http://example.com:8080/index.html`
    /// or a bare `example.com:8080`.
    ///
    /// A scheme's default port (80 for `http`) is reported as no port, the
    /// same way a browser leaves `location.port` empty.
    ///
    /// # Errors
    ///
    /// Returns [`BridgeError::InvalidLocation`] if the input is not a URL or
    /// carries no host.
    pub fn parse(input: &str) -> Result<Self, BridgeError> {
        let input = input.trim();
        let candidate = if input.contains("://") {
            input.to_owned()
        } else {
            format!("http://{input}")
        };
        let url = Url::parse(&candidate)
            .map_err(|err| BridgeError::InvalidLocation(format!("{input}: {err}")))?;
        let hostname = url
            .host_str()
            .filter(|host| !host.is_empty())
            .ok_or_else(|| BridgeError::InvalidLocation(format!("{input}: missing host")))?;
        Ok(Self::new(hostname, url.port()))
    }

    /// Page host name. IPv6 literals keep their brackets.
    #[must_use]
    pub fn hostname(&self) -> &str {
        &self.hostname
    }

    /// Page port, if one was given explicitly.
    #[must_use]
    pub const fn port(&self) -> Option<u16> {
        self.port
    }

    /// Builds `ws://<hostname>:<port>/ssh`.
    ///
    /// The scheme is always plain `ws`. Without an explicit port the colon is
    /// omitted so the URL stays valid.
    #[must_use]
    pub fn socket_url(&self) -> String {
        match self.port {
            Some(port) => format!("ws://{}:{port}{SSH_PATH}", self.hostname),
            None => format!("ws://{}{SSH_PATH}", self.hostname),
        }
    }
}
