//! Error types for switchback.
//!
//! Every error that can end a single host's backup maps to a short,
//! stable class name through [`Error::kind`]. That name is what the
//! per-host report shows; the full message only goes to the log.

use std::io;
use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

/// Main error type for switchback operations.
#[derive(Error, Debug)]
pub enum Error {
    /// SSH transport-level errors
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    /// Channel operation errors
    #[error("Channel error: {0}")]
    Channel(#[from] ChannelError),

    /// Driver-level errors
    #[error("Driver error: {0}")]
    Driver(#[from] DriverError),

    /// Host list errors
    #[error("Host list error: {0}")]
    Parse(#[from] ParseError),

    /// Backup store errors
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Run configuration errors
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
}

impl Error {
    /// Short class name of the failure, used in `<address>_<kind>` report lines.
    pub fn kind(&self) -> &'static str {
        match self {
            Error::Transport(e) => e.kind(),
            Error::Channel(e) => e.kind(),
            Error::Driver(e) => e.kind(),
            Error::Parse(_) => "MalformedInput",
            Error::Store(e) => e.kind(),
            Error::Config(_) => "InvalidConfig",
        }
    }
}

/// Transport layer errors (SSH connection, authentication).
#[derive(Error, Debug)]
pub enum TransportError {
    /// Failed to connect to host
    #[error("Connection failed to {host}:{port}: {source}")]
    ConnectionFailed {
        host: String,
        port: u16,
        #[source]
        source: io::Error,
    },

    /// TCP connect plus SSH handshake did not finish in time
    #[error("Connection to {host}:{port} timed out after {timeout:?}")]
    ConnectTimeout {
        host: String,
        port: u16,
        timeout: Duration,
    },

    /// SSH handshake or protocol error
    #[error("SSH error: {0}")]
    Ssh(#[from] russh::Error),

    /// Authentication failed
    #[error("Authentication failed for user '{user}'")]
    AuthenticationFailed { user: String },

    /// Authentication did not finish in time
    #[error("Authentication for user '{user}' timed out after {timeout:?}")]
    AuthTimeout { user: String, timeout: Duration },

    /// Host key not present in known_hosts (strict mode)
    #[error("Host key for {host}:{port} is not in known_hosts")]
    HostKeyUnknown { host: String, port: u16 },

    /// Host key differs from the one recorded in known_hosts
    #[error("Host key for {host}:{port} changed (known_hosts line {line})")]
    HostKeyChanged { host: String, port: u16, line: usize },

    /// known_hosts could not be read or written
    #[error("known_hosts error: {0}")]
    KnownHosts(String),

    /// Connection was closed unexpectedly
    #[error("Connection disconnected")]
    Disconnected,
}

impl TransportError {
    fn kind(&self) -> &'static str {
        match self {
            TransportError::ConnectionFailed { source, .. } => match source.kind() {
                io::ErrorKind::ConnectionRefused => "ConnectionRefused",
                io::ErrorKind::TimedOut => "ConnectTimeout",
                _ => "ConnectionFailed",
            },
            TransportError::ConnectTimeout { .. } => "ConnectTimeout",
            TransportError::Ssh(_) => "SshError",
            TransportError::AuthenticationFailed { .. } => "AuthenticationFailed",
            TransportError::AuthTimeout { .. } => "AuthTimeout",
            TransportError::HostKeyUnknown { .. } => "HostKeyUnknown",
            TransportError::HostKeyChanged { .. } => "HostKeyChanged",
            TransportError::KnownHosts(_) => "KnownHosts",
            TransportError::Disconnected => "Disconnected",
        }
    }
}

/// Channel layer errors (pattern matching, PTY operations).
#[derive(Error, Debug)]
pub enum ChannelError {
    /// Pattern matching timed out
    #[error("Pattern not found within {0:?}")]
    PatternTimeout(Duration),

    /// Channel closed unexpectedly
    #[error("Channel closed")]
    Closed,

    /// SSH protocol error on the channel
    #[error("Channel SSH error: {0}")]
    Ssh(russh::Error),

    /// Invalid regex pattern
    #[error("Invalid regex pattern: {0}")]
    InvalidPattern(#[from] regex::Error),
}

impl ChannelError {
    fn kind(&self) -> &'static str {
        match self {
            ChannelError::PatternTimeout(_) => "ReadTimeout",
            ChannelError::Closed => "ChannelClosed",
            ChannelError::Ssh(_) => "ChannelError",
            ChannelError::InvalidPattern(_) => "InvalidPattern",
        }
    }
}

/// Driver layer errors (command execution).
#[derive(Error, Debug)]
pub enum DriverError {
    /// Driver not connected
    #[error("Driver not connected")]
    NotConnected,

    /// The device answered the retrieval command with nothing usable
    #[error("Device {host} returned an empty configuration")]
    EmptyConfig { host: String },

    /// The device printed an error for the command
    #[error("Command '{command}' rejected: {message}")]
    CommandRejected { command: String, message: String },
}

impl DriverError {
    fn kind(&self) -> &'static str {
        match self {
            DriverError::NotConnected => "NotConnected",
            DriverError::EmptyConfig { .. } => "EmptyConfig",
            DriverError::CommandRejected { .. } => "CommandRejected",
        }
    }
}

/// Host list parse errors. A single bad line rejects the whole batch.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// A line did not split into address, username and password
    #[error("line {line}: expected 3 fields (address username password), found {fields}")]
    Malformed { line: usize, fields: usize },

    /// The address cannot be used as a file name
    #[error("line {line}: address '{address}' cannot be used as a backup file name")]
    InvalidAddress { line: usize, address: String },
}

/// Backup store errors.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Filesystem failure while persisting an artifact
    #[error("Failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl StoreError {
    fn kind(&self) -> &'static str {
        match self {
            StoreError::Io { .. } => "Io",
        }
    }
}

/// Run configuration errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The configuration file could not be read
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The configuration file is not valid TOML for [`RunConfig`](crate::RunConfig)
    #[error("Failed to parse config: {0}")]
    Toml(#[from] toml::de::Error),

    /// A value is out of range
    #[error("Invalid configuration: {message}")]
    Invalid { message: String },
}

/// Result type alias using switchback's Error.
pub type Result<T> = std::result::Result<T, Error>;
