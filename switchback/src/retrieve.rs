//! Running-configuration retrieval.

use std::sync::Arc;
use std::time::Duration;

use log::{debug, warn};
use memchr::memmem;

use crate::channel::end_marker_pattern;
use crate::dialect::Dialect;
use crate::driver::{Connector, Driver, Response};
use crate::error::{ChannelError, DriverError, Result};
use crate::hosts::HostCredential;

/// Fetches the running configuration of a device in a known dialect.
pub struct ConfigRetriever<C> {
    connector: Arc<C>,
    read_timeout: Duration,
}

impl<C: Connector> ConfigRetriever<C> {
    /// Create a retriever using `connector` for its sessions.
    pub fn new(connector: Arc<C>, read_timeout: Duration) -> Self {
        Self {
            connector,
            read_timeout,
        }
    }

    /// Log in to `host` and return its configuration text.
    ///
    /// The session is closed whether or not retrieval succeeds.
    pub async fn retrieve(&self, host: &HostCredential, dialect: Dialect) -> Result<String> {
        let profile = dialect.profile();
        let mut driver = self.connector.connect(host, profile).await?;

        let result = self.fetch(&mut driver, host, dialect).await;

        if let Err(e) = driver.close().await {
            warn!("{}: session close failed: {}", host.address, e);
        }

        result
    }

    async fn fetch(
        &self,
        driver: &mut C::Driver,
        host: &HostCredential,
        dialect: Dialect,
    ) -> Result<String> {
        let profile = dialect.profile();
        let retrieval = &profile.retrieval;

        let response: Response = match &retrieval.end_marker {
            Some(marker) => {
                let pattern = end_marker_pattern(marker).map_err(ChannelError::from)?;
                driver
                    .send_command_until(&retrieval.command, &pattern, self.read_timeout)
                    .await?
            }
            None => {
                driver
                    .send_command(&retrieval.command, self.read_timeout)
                    .await?
            }
        };
        debug!(
            "{}: '{}' returned {} bytes in {:?}",
            host.address,
            response.command,
            response.result.len(),
            response.elapsed
        );

        if let Some(message) = response.failure_message {
            return Err(DriverError::CommandRejected {
                command: response.command,
                message,
            }
            .into());
        }

        let config = if profile.extract_span {
            extract_config_span(&response.result).to_string()
        } else {
            response.result
        };

        if config.trim().is_empty() {
            return Err(DriverError::EmptyConfig {
                host: host.address.clone(),
            }
            .into());
        }

        Ok(config)
    }
}

/// Cut the configuration out of a Comware transcript.
///
/// Returns the text from the first `#` through the first `return` after
/// it, inclusive. Without such a span the input is returned unchanged.
pub fn extract_config_span(raw: &str) -> &str {
    let bytes = raw.as_bytes();
    let Some(start) = memchr::memchr(b'#', bytes) else {
        return raw;
    };
    match memmem::find(&bytes[start..], b"return") {
        Some(offset) => &raw[start..start + offset + "return".len()],
        None => raw,
    }
}
