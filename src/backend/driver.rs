//! Hardware collaborator traits
//!
//! The service owns no hardware itself. Radio, indicator LED and sensor are
//! injected as capability objects implementing these traits, which keeps the
//! request path testable against mock implementations.

use trait_variant::make;

use crate::core::{
    error::DriverResult,
    types::{IndicatorPattern, IpConfig, RadioMode, VisibleNetwork},
};

/// Abstraction over the WiFi radio
#[make(Send)]
pub trait RadioDriver: Send + Sync + 'static {
    /// Activate the given interface mode
    ///
    /// Activating a mode that is already active must be a no-op.
    async fn set_mode(&self, mode: RadioMode) -> DriverResult<()>;

    /// Whether the station interface is associated with an access point
    async fn is_associated(&self) -> DriverResult<bool>;

    /// Issue an association request; completion is observed via `is_associated`
    async fn associate(&self, ssid: &str, password: &str) -> DriverResult<()>;

    /// Current interface configuration (ip, subnet, gateway, dns)
    async fn interface_config(&self) -> DriverResult<IpConfig>;

    /// Scan and return every visible network
    async fn scan_visible_networks(&self) -> DriverResult<Vec<VisibleNetwork>>;

    /// Set essid and password of the advertised network
    async fn configure_access_point(&self, ssid: &str, password: &str) -> DriverResult<()>;

    /// Apply a static interface configuration
    async fn set_interface_config(&self, config: IpConfig) -> DriverResult<()>;

    /// Whether the access-point interface reports active
    async fn is_active(&self) -> DriverResult<bool>;
}

/// Visual indicator (status LED)
#[make(Send)]
pub trait IndicatorDriver: Send + Sync + 'static {
    async fn set_indicator(&self, pattern: IndicatorPattern) -> DriverResult<()>;
}

/// Single-shot environmental sensor
#[make(Send)]
pub trait SensorDriver: Send + Sync + 'static {
    /// Trigger one measurement and return (temperature °C, humidity %)
    async fn measure(&self) -> DriverResult<(i32, i32)>;
}
