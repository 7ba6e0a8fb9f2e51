//! wpa_supplicant radio driver for Linux hosts
//!
//! Station mode only: scanning, association and interface configuration go
//! through the wpa_supplicant control socket via `wifi-ctrl`. Hosting an
//! access point is left to hostapd and reported as unsupported.

use std::net::Ipv4Addr;

use tokio::process::Command;
use tracing::{debug, error};
use wifi_ctrl::sta::{RequestClient, WifiSetup};

use crate::{
    backend::RadioDriver,
    core::{
        error::{DriverError, DriverResult},
        types::{IpConfig, RadioMode, VisibleNetwork},
    },
};

const RESOLV_CONF: &str = "/etc/resolv.conf";

pub struct WpaRadioDriver {
    interface: String,
    client: RequestClient,
}

impl WpaRadioDriver {
    pub async fn new(interface: String) -> DriverResult<Self> {
        let path = format!("/var/run/wpa_supplicant/{}", interface);
        let mut setup =
            WifiSetup::new().map_err(|e| DriverError::WpaSupplicantError(e.to_string()))?;
        setup.set_socket_path(path);

        let client = setup.get_request_client();
        let station = setup.complete();

        // Spawn the station runtime
        tokio::spawn(async move {
            if let Err(e) = station.run().await {
                error!("WifiStation runtime error: {}", e);
            }
        });

        Ok(Self { interface, client })
    }

    /// Map wpa_supplicant scan flags onto the driver security codes
    fn security_code(flags: &str) -> u8 {
        let wpa = flags.contains("WPA-PSK");
        let wpa2 = flags.contains("WPA2-PSK") || flags.contains("RSN-PSK");
        match (wpa, wpa2) {
            (true, true) => 4,
            (false, true) => 3,
            (true, false) => 2,
            (false, false) if flags.contains("WEP") => 1,
            (false, false) if !flags.contains("WPA") && !flags.contains("RSN") => 0,
            _ => u8::MAX,
        }
    }

    /// Parse `inet a.b.c.d/len` from `ip -4 addr show` output
    fn parse_inet(output: &str) -> Option<(Ipv4Addr, Ipv4Addr)> {
        output.lines().map(str::trim).find_map(|line| {
            let cidr = line.strip_prefix("inet ")?.split_whitespace().next()?;
            let (ip, prefix) = cidr.split_once('/')?;
            let prefix: u32 = prefix.parse().ok().filter(|p| *p <= 32)?;
            let mask = u32::MAX.checked_shl(32 - prefix).unwrap_or(0);
            Some((ip.parse().ok()?, Ipv4Addr::from(mask)))
        })
    }

    /// Parse `default via a.b.c.d` from `ip -4 route` output
    fn parse_default_gateway(output: &str) -> Option<Ipv4Addr> {
        output.lines().find_map(|line| {
            let mut parts = line.split_whitespace();
            match (parts.next(), parts.next(), parts.next()) {
                (Some("default"), Some("via"), Some(gateway)) => gateway.parse().ok(),
                _ => None,
            }
        })
    }

    /// First IPv4 `nameserver` entry of a resolv.conf
    fn parse_nameserver(contents: &str) -> Option<Ipv4Addr> {
        contents.lines().find_map(|line| {
            line.trim()
                .strip_prefix("nameserver")?
                .trim()
                .parse()
                .ok()
        })
    }

    async fn ip_output(&self, args: &[&str]) -> Option<String> {
        let output = Command::new("ip").args(args).output().await.ok()?;
        Some(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

impl RadioDriver for WpaRadioDriver {
    async fn set_mode(&self, mode: RadioMode) -> DriverResult<()> {
        match mode {
            RadioMode::Station => Ok(()),
            RadioMode::AccessPoint => Err(DriverError::Unsupported(
                "access-point mode requires hostapd".into(),
            )),
        }
    }

    async fn is_associated(&self) -> DriverResult<bool> {
        let status =
            self.client.get_status().await.map_err(|e| {
                DriverError::WpaSupplicantError(format!("Failed to get status: {}", e))
            })?;

        Ok(status.get("wpa_state").map(|s| s.as_str()) == Some("COMPLETED"))
    }

    async fn associate(&self, ssid: &str, password: &str) -> DriverResult<()> {
        debug!("Associating with network: {}", ssid);

        let network_id =
            self.client.add_network().await.map_err(|e| {
                DriverError::WpaSupplicantError(format!("Failed to add network: {}", e))
            })?;

        // Set SSID (wifi-ctrl handles quoting internally via conf_escape)
        self.client
            .set_network_ssid(network_id, ssid.to_string())
            .await
            .map_err(|e| DriverError::WpaSupplicantError(format!("Failed to set SSID: {}", e)))?;

        if password.is_empty() {
            self.client
                .send_custom(format!("SET_NETWORK {} key_mgmt NONE", network_id))
                .await
                .map_err(|e| {
                    DriverError::WpaSupplicantError(format!("Failed to set key_mgmt: {}", e))
                })?;
        } else {
            self.client
                .set_network_psk(network_id, password.to_string())
                .await
                .map_err(|e| {
                    DriverError::WpaSupplicantError(format!("Failed to set PSK: {}", e))
                })?;
        }

        self.client.select_network(network_id).await.map_err(|e| {
            DriverError::WpaSupplicantError(format!("Failed to select network: {}", e))
        })?;

        debug!("Association initiated");
        Ok(())
    }

    async fn interface_config(&self) -> DriverResult<IpConfig> {
        let addr = self
            .ip_output(&["-4", "addr", "show", &self.interface])
            .await
            .unwrap_or_default();
        let route = self
            .ip_output(&["-4", "route", "show", "default", "dev", &self.interface])
            .await
            .unwrap_or_default();
        let resolv = tokio::fs::read_to_string(RESOLV_CONF)
            .await
            .unwrap_or_default();

        let (ip, subnet) = Self::parse_inet(&addr)
            .ok_or_else(|| DriverError::Radio(format!("No IPv4 address on {}", self.interface)))?;

        Ok(IpConfig {
            ip,
            subnet,
            gateway: Self::parse_default_gateway(&route).unwrap_or(Ipv4Addr::UNSPECIFIED),
            dns: Self::parse_nameserver(&resolv).unwrap_or(Ipv4Addr::UNSPECIFIED),
        })
    }

    async fn scan_visible_networks(&self) -> DriverResult<Vec<VisibleNetwork>> {
        debug!("Starting WiFi scan on interface: {}", self.interface);

        let results = self
            .client
            .get_scan()
            .await
            .map_err(|e| DriverError::WpaSupplicantError(format!("Scan failed: {}", e)))?;

        let networks: Vec<VisibleNetwork> = results
            .iter()
            .map(|res| VisibleNetwork {
                ssid: res.name.clone(),
                rssi: i16::try_from(res.signal).unwrap_or(i16::MIN),
                security_code: Self::security_code(&res.flags),
            })
            .collect();

        debug!("Scan complete, found {} networks", networks.len());
        Ok(networks)
    }

    async fn configure_access_point(&self, _ssid: &str, _password: &str) -> DriverResult<()> {
        Err(DriverError::Unsupported(
            "access-point mode requires hostapd".into(),
        ))
    }

    async fn set_interface_config(&self, _config: IpConfig) -> DriverResult<()> {
        Err(DriverError::Unsupported(
            "static addressing is managed by the host network stack".into(),
        ))
    }

    async fn is_active(&self) -> DriverResult<bool> {
        Ok(false)
    }
}
