//! Host list parsing.
//!
//! The input is free-form text with one device per line:
//!
//! ```text
//! 10.0.0.1    admin   secret
//! core-sw2    netops  s3cr3t
//! ```
//!
//! Fields are separated by any run of whitespace. Blank lines are skipped.
//! A line with any other number of fields rejects the whole batch, so a
//! half-pasted list never results in a partial backup run.

use std::fmt;

use secrecy::SecretString;

use crate::error::ParseError;

/// Connection record for one device.
#[derive(Clone)]
pub struct HostCredential {
    /// IP address or hostname.
    pub address: String,

    /// Login username.
    pub username: String,

    /// Login password.
    pub password: SecretString,
}

impl HostCredential {
    /// Create a credential record.
    pub fn new(
        address: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<SecretString>,
    ) -> Self {
        Self {
            address: address.into(),
            username: username.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for HostCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HostCredential")
            .field("address", &self.address)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Parse a host list into credentials, preserving input order.
///
/// Duplicate addresses are kept; each is backed up independently.
pub fn parse_host_list(text: &str) -> Result<Vec<HostCredential>, ParseError> {
    let mut hosts = Vec::new();

    for (index, line) in text.lines().enumerate() {
        let fields: Vec<&str> = line.split_whitespace().collect();
        match fields.as_slice() {
            [] => continue,
            [address, username, password] => {
                if !is_valid_file_name(address) {
                    return Err(ParseError::InvalidAddress {
                        line: index + 1,
                        address: address.to_string(),
                    });
                }
                hosts.push(HostCredential::new(
                    *address,
                    *username,
                    password.to_string(),
                ));
            }
            _ => {
                return Err(ParseError::Malformed {
                    line: index + 1,
                    fields: fields.len(),
                });
            }
        }
    }

    Ok(hosts)
}

/// The address names the artifact file, so it must stay inside the date directory.
fn is_valid_file_name(address: &str) -> bool {
    !(address == "." || address == ".." || address.contains(['/', '\\']))
}
