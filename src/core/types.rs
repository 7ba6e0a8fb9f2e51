//! Domain types for the appliance

use std::{fmt, net::Ipv4Addr, time::Duration};

use serde::{Deserialize, Serialize};

/// Credentials supplied for a single connect or advertise call
#[derive(Clone, PartialEq, Eq)]
pub struct NetworkCredentials {
    pub ssid: String,
    /// May be empty for open networks
    pub password: String,
}

impl NetworkCredentials {
    pub fn new(ssid: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            ssid: ssid.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for NetworkCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NetworkCredentials")
            .field("ssid", &self.ssid)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// IPv4 interface configuration (address, netmask, gateway, DNS)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IpConfig {
    pub ip: Ipv4Addr,
    pub subnet: Ipv4Addr,
    pub gateway: Ipv4Addr,
    pub dns: Ipv4Addr,
}

impl IpConfig {
    pub const UNSPECIFIED: IpConfig = IpConfig {
        ip: Ipv4Addr::UNSPECIFIED,
        subnet: Ipv4Addr::UNSPECIFIED,
        gateway: Ipv4Addr::UNSPECIFIED,
        dns: Ipv4Addr::UNSPECIFIED,
    };
}

impl Default for IpConfig {
    /// Fixed configuration applied when the device hosts its own network
    fn default() -> Self {
        Self {
            ip: Ipv4Addr::new(192, 168, 1, 1),
            subnet: Ipv4Addr::new(255, 255, 255, 0),
            gateway: Ipv4Addr::new(192, 168, 1, 1),
            dns: Ipv4Addr::new(8, 8, 8, 8),
        }
    }
}

/// Radio operating mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RadioMode {
    Station,
    AccessPoint,
}

/// Connectivity state owned by the radio controller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum RadioStatus {
    Disconnected,
    Connecting,
    Connected(IpConfig),
    ApActive(IpConfig),
}

impl RadioStatus {
    pub fn is_connected(&self) -> bool {
        matches!(self, RadioStatus::Connected(_))
    }

    pub fn ip_config(&self) -> Option<&IpConfig> {
        match self {
            RadioStatus::Connected(config) | RadioStatus::ApActive(config) => Some(config),
            RadioStatus::Disconnected | RadioStatus::Connecting => None,
        }
    }
}

/// Security scheme advertised by a scanned network
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[repr(u8)]
pub enum SecurityKind {
    #[serde(rename = "Open")]
    Open = 0,
    #[serde(rename = "WEP")]
    Wep = 1,
    #[serde(rename = "WPA-PSK")]
    WpaPsk = 2,
    #[serde(rename = "WPA2-PSK")]
    Wpa2Psk = 3,
    /// Labelled `WPA/WPA2-PSK` as the device firmware reports it
    #[serde(rename = "WPA/WPA2-PSK")]
    WpaWpa2Psk = 4,
    #[serde(rename = "Unknown")]
    Unknown = 255,
}

impl From<u8> for SecurityKind {
    fn from(code: u8) -> Self {
        match code {
            0 => SecurityKind::Open,
            1 => SecurityKind::Wep,
            2 => SecurityKind::WpaPsk,
            3 => SecurityKind::Wpa2Psk,
            4 => SecurityKind::WpaWpa2Psk,
            _ => SecurityKind::Unknown,
        }
    }
}

impl SecurityKind {
    /// Label used on the wire
    pub fn label(&self) -> &'static str {
        match self {
            SecurityKind::Open => "Open",
            SecurityKind::Wep => "WEP",
            SecurityKind::WpaPsk => "WPA-PSK",
            SecurityKind::Wpa2Psk => "WPA2-PSK",
            SecurityKind::WpaWpa2Psk => "WPA/WPA2-PSK",
            SecurityKind::Unknown => "Unknown",
        }
    }
}

/// Network entry as reported by the radio driver
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisibleNetwork {
    pub ssid: String,
    /// Signal strength in dBm
    pub rssi: i16,
    /// Driver security code (0..=4, anything else is unknown)
    pub security_code: u8,
}

/// Represents a discovered WiFi network
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct WifiNetwork {
    /// Network SSID
    pub ssid: String,
    /// Signal strength in dBm
    pub rssi: i16,
    pub security: SecurityKind,
}

impl From<VisibleNetwork> for WifiNetwork {
    fn from(network: VisibleNetwork) -> Self {
        Self {
            ssid: network.ssid,
            rssi: network.rssi,
            security: SecurityKind::from(network.security_code),
        }
    }
}

/// One environmental measurement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SensorReading {
    #[serde(rename = "temperature")]
    pub temperature_celsius: i32,
    #[serde(rename = "humidity")]
    pub humidity_percent: i32,
}

/// Visual feedback patterns driven on the indicator LED
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IndicatorPattern {
    On,
    Off,
    /// Rapid blinking, shown after a successful association
    FastBlink,
    /// Slow on/off cycles, shown after a failed association
    SlowPulse,
}

impl IndicatorPattern {
    /// Half-period and number of on/off cycles for the animated patterns
    pub fn timing(&self) -> Option<(Duration, u32)> {
        match self {
            IndicatorPattern::FastBlink => Some((Duration::from_millis(200), 10)),
            IndicatorPattern::SlowPulse => Some((Duration::from_secs(2), 2)),
            IndicatorPattern::On | IndicatorPattern::Off => None,
        }
    }
}

/// Identifier attached to every accepted connection in logs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConnectionId(uuid::Uuid);

impl ConnectionId {
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4())
    }
}

impl Default for ConnectionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
