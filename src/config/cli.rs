//! Command-line argument parsing

use clap::{Parser, ValueEnum};

/// Network brought up at boot
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum BootMode {
    /// Host the device's own network
    AccessPoint,
    /// Join an existing network
    Station,
}

/// Radio driver implementation
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum RadioBackend {
    /// In-memory radio, LED and sensor for development hosts
    Simulated,
    /// wpa_supplicant control socket (station mode only)
    Wpa,
}

#[derive(Parser, Clone)]
#[clap(name = "netmaster", version, author)]
#[clap(about = "WiFi appliance serving commands and sensor telemetry over HTTP")]
pub struct CliArgs {
    /// Address the HTTP server binds to
    #[clap(long, default_value = "0.0.0.0")]
    pub bind: String,

    /// HTTP port
    #[clap(short, long, default_value = "80")]
    pub port: u16,

    /// Device name shown on the welcome page and used as default AP name
    #[clap(short = 'n', long, default_value = "NetMaster")]
    pub device_name: String,

    /// Network mode at boot
    #[clap(long, value_enum, default_value = "access-point")]
    pub mode: BootMode,

    /// SSID to join in station mode
    #[clap(long)]
    pub ssid: Option<String>,

    /// Password for the station network
    #[clap(long, default_value = "")]
    pub password: String,

    /// SSID advertised in access-point mode (defaults to the device name)
    #[clap(long)]
    pub ap_ssid: Option<String>,

    /// Password of the advertised network (empty for an open network)
    #[clap(long, default_value = "")]
    pub ap_password: String,

    /// Access-point interface address
    #[clap(long, default_value = "192.168.1.1")]
    pub ap_ip: String,

    /// Access-point subnet mask
    #[clap(long, default_value = "255.255.255.0")]
    pub ap_subnet: String,

    /// Access-point gateway (defaults to the interface address)
    #[clap(long)]
    pub ap_gateway: Option<String>,

    /// DNS server handed out in access-point mode
    #[clap(long, default_value = "8.8.8.8")]
    pub ap_dns: String,

    /// Radio driver
    #[clap(long, value_enum, default_value = "simulated")]
    pub radio: RadioBackend,

    /// Wireless network interface name (wpa backend)
    #[clap(short, long, default_value = "wlan0")]
    pub interface: String,

    /// Seconds a client has to send its request head
    #[clap(long, default_value = "10")]
    pub read_timeout_secs: u64,

    /// Association checks before a connect attempt is reported as failed
    #[clap(long, default_value = "5")]
    pub association_polls: u32,

    /// Milliseconds between association checks
    #[clap(long, default_value = "1000")]
    pub association_interval_ms: u64,

    /// Activity checks before access-point activation fails
    #[clap(long, default_value = "50")]
    pub activation_attempts: u32,
}
