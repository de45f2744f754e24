use std::fmt::{Display, Formatter};
use std::time::Duration;

use url::Url;

use crate::error::ConfigError;

/// Default per-attempt request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Validated scoring API location.
///
/// Construction is the only place the url shape is checked; holding an
/// `Endpoint` means the url is an absolute `http` or `https` url with a host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    url: Url,
    timeout: Duration,
}

impl Endpoint {
    pub fn new(url: &str, timeout: Duration) -> Result<Self, ConfigError> {
        let invalid = || ConfigError::InvalidUrl {
            value: url.to_owned(),
        };

        let parsed = Url::parse(url.trim()).map_err(|_| invalid())?;
        if !matches!(parsed.scheme(), "http" | "https") || !parsed.has_host() {
            return Err(invalid());
        }
        if timeout.is_zero() {
            return Err(ConfigError::ZeroTimeout);
        }

        Ok(Self {
            url: parsed,
            timeout,
        })
    }

    pub fn with_default_timeout(url: &str) -> Result<Self, ConfigError> {
        Self::new(url, DEFAULT_TIMEOUT)
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn as_str(&self) -> &str {
        self.url.as_str()
    }

    pub const fn timeout(&self) -> Duration {
        self.timeout
    }
}

impl Display for Endpoint {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.url.as_str())
    }
}
