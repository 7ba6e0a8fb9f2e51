//! Runtime settings

use std::{
    net::{IpAddr, Ipv4Addr, SocketAddr},
    time::Duration,
};

use tracing::warn;

use crate::{
    config::{
        CliArgs,
        cli::{BootMode, RadioBackend},
    },
    core::{
        radio::RadioTiming,
        types::{IpConfig, NetworkCredentials},
    },
};

/// Network brought up before the server starts
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BootNetwork {
    AccessPoint {
        credentials: NetworkCredentials,
        ip_config: IpConfig,
    },
    Station {
        credentials: NetworkCredentials,
    },
}

/// Runtime configuration settings
#[derive(Debug, Clone)]
pub struct Settings {
    pub listen_addr: SocketAddr,
    pub device_name: String,
    pub boot_network: BootNetwork,
    pub radio_backend: RadioBackend,
    pub interface: String,
    pub read_timeout: Duration,
    pub radio_timing: RadioTiming,
}

/// Parse an address, falling back to `default` on invalid input
fn parse_ipv4(field: &str, value: &str, default: Ipv4Addr) -> Ipv4Addr {
    value.parse().unwrap_or_else(|_| {
        warn!("Invalid {} '{}', using {}", field, value, default);
        default
    })
}

impl From<CliArgs> for Settings {
    fn from(args: CliArgs) -> Self {
        let defaults = IpConfig::default();

        let bind: IpAddr = args.bind.parse().unwrap_or_else(|_| {
            warn!("Invalid bind address '{}', using 0.0.0.0", args.bind);
            IpAddr::V4(Ipv4Addr::UNSPECIFIED)
        });

        let boot_network = match args.mode {
            BootMode::AccessPoint => {
                let ip = parse_ipv4("AP address", &args.ap_ip, defaults.ip);
                let gateway = args
                    .ap_gateway
                    .as_deref()
                    .map(|gateway| parse_ipv4("AP gateway", gateway, ip))
                    .unwrap_or(ip);

                BootNetwork::AccessPoint {
                    credentials: NetworkCredentials::new(
                        args.ap_ssid.unwrap_or_else(|| args.device_name.clone()),
                        args.ap_password,
                    ),
                    ip_config: IpConfig {
                        ip,
                        subnet: parse_ipv4("AP subnet", &args.ap_subnet, defaults.subnet),
                        gateway,
                        dns: parse_ipv4("AP DNS", &args.ap_dns, defaults.dns),
                    },
                }
            }
            BootMode::Station => BootNetwork::Station {
                credentials: NetworkCredentials::new(args.ssid.unwrap_or_default(), args.password),
            },
        };

        let radio_timing = RadioTiming {
            association_polls: args.association_polls,
            association_interval: Duration::from_millis(args.association_interval_ms),
            activation_attempts: args.activation_attempts.max(1),
            ..RadioTiming::default()
        };

        Settings {
            listen_addr: SocketAddr::new(bind, args.port),
            device_name: args.device_name,
            boot_network,
            radio_backend: args.radio,
            interface: args.interface,
            read_timeout: Duration::from_secs(args.read_timeout_secs.max(1)),
            radio_timing,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use pretty_assertions::assert_eq;

    fn settings(args: &[&str]) -> Settings {
        let argv = std::iter::once("netmaster").chain(args.iter().copied());
        Settings::from(CliArgs::parse_from(argv))
    }

    #[test]
    fn test_defaults() {
        let settings = settings(&[]);

        assert_eq!(settings.listen_addr, "0.0.0.0:80".parse().unwrap());
        assert_eq!(settings.device_name, "NetMaster");
        assert_eq!(settings.radio_backend, RadioBackend::Simulated);
        assert_eq!(settings.read_timeout, Duration::from_secs(10));
        assert_eq!(settings.radio_timing, RadioTiming::default());
        assert_eq!(
            settings.boot_network,
            BootNetwork::AccessPoint {
                credentials: NetworkCredentials::new("NetMaster", ""),
                ip_config: IpConfig::default(),
            }
        );
    }

    #[test]
    fn test_station_mode() {
        let settings = settings(&["--mode", "station", "--ssid", "HomeNet", "--password", "pw"]);

        assert_eq!(
            settings.boot_network,
            BootNetwork::Station {
                credentials: NetworkCredentials::new("HomeNet", "pw"),
            }
        );
    }

    #[test]
    fn test_access_point_overrides() {
        let settings = settings(&[
            "--ap-ssid",
            "Lab",
            "--ap-ip",
            "10.0.0.1",
            "--ap-dns",
            "1.1.1.1",
            "--port",
            "8080",
        ]);

        assert_eq!(settings.listen_addr.port(), 8080);
        let BootNetwork::AccessPoint {
            credentials,
            ip_config,
        } = settings.boot_network
        else {
            panic!("expected access point");
        };
        assert_eq!(credentials.ssid, "Lab");
        assert_eq!(ip_config.ip, Ipv4Addr::new(10, 0, 0, 1));
        assert_eq!(ip_config.gateway, Ipv4Addr::new(10, 0, 0, 1));
        assert_eq!(ip_config.dns, Ipv4Addr::new(1, 1, 1, 1));
    }

    #[test]
    fn test_invalid_addresses_fall_back() {
        let settings = settings(&["--bind", "nowhere", "--ap-subnet", "255.255.x.0"]);

        assert_eq!(settings.listen_addr.ip(), IpAddr::V4(Ipv4Addr::UNSPECIFIED));
        let BootNetwork::AccessPoint { ip_config, .. } = settings.boot_network else {
            panic!("expected access point");
        };
        assert_eq!(ip_config.subnet, Ipv4Addr::new(255, 255, 255, 0));
    }

    #[test]
    fn test_association_timing() {
        let settings = settings(&[
            "--association-polls",
            "3",
            "--association-interval-ms",
            "250",
            "--activation-attempts",
            "0",
        ]);

        assert_eq!(settings.radio_timing.association_polls, 3);
        assert_eq!(
            settings.radio_timing.association_interval,
            Duration::from_millis(250)
        );
        assert_eq!(settings.radio_timing.activation_attempts, 1);
    }
}
