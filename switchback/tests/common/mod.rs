//! Scripted in-memory devices for driving the orchestrator without SSH.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use regex::bytes::Regex;
use switchback::error::{ChannelError, TransportError};
use switchback::{Connector, DialectProfile, Driver, Error, HostCredential, Response};

pub const UNKNOWN_COMMAND: &str = "% Unrecognized command found at '^' position.";

/// How a scripted device fails to open a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectFailure {
    Timeout,
    AuthRejected,
}

/// Behaviour of one scripted device.
#[derive(Debug, Clone, Default)]
pub struct MockDevice {
    responses: HashMap<String, String>,
    read_timeouts: Vec<String>,
    connect_failure: Option<ConnectFailure>,
    panic_on_connect: bool,
    delay: Duration,
}

impl MockDevice {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cisco_ios(config: &str) -> Self {
        Self::new()
            .respond(
                "show version",
                "Cisco IOS Software, C2960 Software (C2960-LANBASEK9-M), Version 15.0(2)SE",
            )
            .respond("show running-config", config)
    }

    pub fn respond(mut self, command: &str, output: &str) -> Self {
        self.responses.insert(command.to_string(), output.to_string());
        self
    }

    pub fn time_out_on(mut self, command: &str) -> Self {
        self.read_timeouts.push(command.to_string());
        self
    }

    pub fn fail_connect(mut self, failure: ConnectFailure) -> Self {
        self.connect_failure = Some(failure);
        self
    }

    pub fn panic_on_connect(mut self) -> Self {
        self.panic_on_connect = true;
        self
    }

    /// Delay applied to every command.
    pub fn delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

/// Shared counters and logs across every session of a connector.
#[derive(Debug, Default)]
pub struct Activity {
    open: AtomicUsize,
    max_open: AtomicUsize,
    closed: AtomicUsize,
    sessions: Mutex<Vec<(String, String)>>,
    commands: Mutex<Vec<(String, String)>>,
}

impl Activity {
    pub fn max_open(&self) -> usize {
        self.max_open.load(Ordering::SeqCst)
    }

    pub fn open(&self) -> usize {
        self.open.load(Ordering::SeqCst)
    }

    pub fn closed(&self) -> usize {
        self.closed.load(Ordering::SeqCst)
    }

    /// `(address, profile name)` for each opened session, in order.
    pub fn sessions(&self) -> Vec<(String, String)> {
        self.sessions.lock().unwrap().clone()
    }

    /// Commands sent to `address`, in order.
    pub fn commands_for(&self, address: &str) -> Vec<String> {
        self.commands
            .lock()
            .unwrap()
            .iter()
            .filter(|(a, _)| a == address)
            .map(|(_, c)| c.clone())
            .collect()
    }
}

/// Connector answering from a table of scripted devices.
#[derive(Debug, Default)]
pub struct MockConnector {
    devices: HashMap<String, MockDevice>,
    user_devices: HashMap<(String, String), MockDevice>,
    pub activity: Arc<Activity>,
}

impl MockConnector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn device(mut self, address: &str, device: MockDevice) -> Self {
        self.devices.insert(address.to_string(), device);
        self
    }

    /// Script the device seen by `username` at `address`; takes precedence
    /// over [`device`](Self::device).
    pub fn device_for_user(mut self, address: &str, username: &str, device: MockDevice) -> Self {
        self.user_devices
            .insert((address.to_string(), username.to_string()), device);
        self
    }
}

impl Connector for MockConnector {
    type Driver = MockDriver;

    async fn connect(
        &self,
        host: &HostCredential,
        profile: &DialectProfile,
    ) -> switchback::error::Result<MockDriver> {
        self.activity
            .sessions
            .lock()
            .unwrap()
            .push((host.address.clone(), profile.name.clone()));

        let device = self
            .user_devices
            .get(&(host.address.clone(), host.username.clone()))
            .or_else(|| self.devices.get(&host.address));
        let Some(device) = device else {
            return Err(TransportError::ConnectTimeout {
                host: host.address.clone(),
                port: 22,
                timeout: Duration::from_secs(5),
            }
            .into());
        };

        if device.panic_on_connect {
            panic!("scripted panic for {}", host.address);
        }

        match device.connect_failure {
            Some(ConnectFailure::Timeout) => {
                return Err(TransportError::ConnectTimeout {
                    host: host.address.clone(),
                    port: 22,
                    timeout: Duration::from_secs(5),
                }
                .into());
            }
            Some(ConnectFailure::AuthRejected) => {
                return Err(TransportError::AuthenticationFailed {
                    user: host.username.clone(),
                }
                .into());
            }
            None => {}
        }

        let open = self.activity.open.fetch_add(1, Ordering::SeqCst) + 1;
        self.activity.max_open.fetch_max(open, Ordering::SeqCst);

        Ok(MockDriver {
            address: host.address.clone(),
            device: device.clone(),
            profile: profile.clone(),
            activity: self.activity.clone(),
            closed: false,
        })
    }
}

/// Session on a scripted device.
pub struct MockDriver {
    address: String,
    device: MockDevice,
    profile: DialectProfile,
    activity: Arc<Activity>,
    closed: bool,
}

impl MockDriver {
    async fn answer(&mut self, command: &str) -> Result<Response, Error> {
        self.activity
            .commands
            .lock()
            .unwrap()
            .push((self.address.clone(), command.to_string()));

        tokio::time::sleep(self.device.delay).await;

        if self.device.read_timeouts.iter().any(|c| c == command) {
            return Err(ChannelError::PatternTimeout(Duration::from_secs(30)).into());
        }

        let output = self
            .device
            .responses
            .get(command)
            .map(String::as_str)
            .unwrap_or(UNKNOWN_COMMAND);
        let response = Response::new(command, output, self.device.delay);
        Ok(match self.profile.detect_failure(output) {
            Some(pattern) => response.with_failure(pattern),
            None => response,
        })
    }
}

impl Driver for MockDriver {
    async fn send_command(&mut self, command: &str, _timeout: Duration) -> Result<Response, Error> {
        self.answer(command).await
    }

    async fn send_command_until(
        &mut self,
        command: &str,
        _end_marker: &Regex,
        _timeout: Duration,
    ) -> Result<Response, Error> {
        self.answer(command).await
    }

    async fn close(&mut self) -> Result<(), Error> {
        if !self.closed {
            self.closed = true;
            self.activity.open.fetch_sub(1, Ordering::SeqCst);
            self.activity.closed.fetch_add(1, Ordering::SeqCst);
        }
        Ok(())
    }
}

pub fn host(address: &str) -> HostCredential {
    HostCredential::new(address, "admin", "secret".to_string())
}
