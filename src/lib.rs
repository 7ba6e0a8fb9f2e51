//! NetMaster appliance service
//!
//! Brings up a WiFi radio as access point or station and serves a small
//! HTTP interface for:
//! - WiFi commands (`/cmd/wifi?scan`, `/cmd/wifi?connect&ssid=..&password=..`)
//! - Temperature and humidity telemetry (`/dht11`, `/telemetry`)

pub mod backend;
pub mod config;
pub mod core;
pub mod protocol;
pub mod transport;

pub use core::{
    error::{CommandError, DriverError, RadioError, TransportError},
    types::{IpConfig, NetworkCredentials, RadioStatus, SensorReading, WifiNetwork},
};
