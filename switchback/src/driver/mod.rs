//! Command execution over device sessions.
//!
//! [`Connector`] opens a session to one host for a given dialect profile
//! and returns a [`Driver`]; the detector and the retriever only ever
//! talk to devices through these two traits. [`SshConnector`] is the real
//! implementation; tests substitute scripted ones.

mod builder;
mod generic;
mod response;

pub use builder::DriverBuilder;
pub use generic::{GenericDriver, SessionSettings, SshConnector};
pub use response::Response;

use std::future::Future;
use std::time::Duration;

use regex::bytes::Regex;

use crate::dialect::DialectProfile;
use crate::error::Result;
use crate::hosts::HostCredential;

/// An open, prepared CLI session on one device.
pub trait Driver: Send {
    /// Send a command and read until the next prompt.
    fn send_command(
        &mut self,
        command: &str,
        timeout: Duration,
    ) -> impl Future<Output = Result<Response>> + Send;

    /// Send a command and read until `end_marker` matches.
    ///
    /// Used when the output ends with a known marker line rather than
    /// (or before) a prompt.
    fn send_command_until(
        &mut self,
        command: &str,
        end_marker: &Regex,
        timeout: Duration,
    ) -> impl Future<Output = Result<Response>> + Send;

    /// Close the session.
    fn close(&mut self) -> impl Future<Output = Result<()>> + Send;
}

/// Opens device sessions.
pub trait Connector: Send + Sync {
    /// Session type produced by this connector.
    type Driver: Driver + 'static;

    /// Connect and authenticate to `host`, wait for the prompt described
    /// by `profile` and run its session-preparation commands.
    fn connect(
        &self,
        host: &HostCredential,
        profile: &DialectProfile,
    ) -> impl Future<Output = Result<Self::Driver>> + Send;
}
