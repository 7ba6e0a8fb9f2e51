//! Mock hardware drivers
//!
//! Used by the test suite and as the simulated backend when the service runs
//! on a development host without a radio, LED or sensor attached.

use std::sync::Arc;
use tokio::sync::Mutex;

use crate::backend::{IndicatorDriver, RadioDriver, SensorDriver};
use crate::core::error::{DriverError, DriverResult};
use crate::core::types::{IndicatorPattern, IpConfig, RadioMode, VisibleNetwork};

/// Internal state for the mock radio
#[derive(Debug, Clone)]
struct MockRadioState {
    modes: Vec<RadioMode>,
    associated: bool,
    association_pending: bool,
    association_polls: u32,
    /// Failed status checks before association completes; `None` never completes
    associate_after: Option<u32>,
    associate_calls: Vec<String>,
    is_associated_calls: u32,
    station_config: IpConfig,
    applied_config: Option<IpConfig>,
    access_point: Option<String>,
    active_polls: u32,
    /// Failed activity checks before the AP comes up; `None` never comes up
    active_after: Option<u32>,
    scan_results: Vec<VisibleNetwork>,
    should_fail_scan: bool,
    should_fail_associate: bool,
    should_fail_interface_config: bool,
    should_fail_access_point: bool,
}

/// Mock radio driver
///
/// Association and access-point activation complete after a configurable
/// number of status checks, which lets tests drive the polling loops.
#[derive(Debug, Clone)]
pub struct MockRadioDriver {
    inner: Arc<Mutex<MockRadioState>>,
}

impl MockRadioDriver {
    /// Create a mock radio that associates and activates immediately
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(MockRadioState {
                modes: vec![],
                associated: false,
                association_pending: false,
                association_polls: 0,
                associate_after: Some(0),
                associate_calls: vec![],
                is_associated_calls: 0,
                station_config: IpConfig {
                    ip: [192, 168, 0, 42].into(),
                    subnet: [255, 255, 255, 0].into(),
                    gateway: [192, 168, 0, 1].into(),
                    dns: [192, 168, 0, 1].into(),
                },
                applied_config: None,
                access_point: None,
                active_polls: 0,
                active_after: Some(0),
                scan_results: vec![],
                should_fail_scan: false,
                should_fail_associate: false,
                should_fail_interface_config: false,
                should_fail_access_point: false,
            })),
        }
    }

    /// Number of failed status checks before association completes
    ///
    /// `None` makes association never complete.
    pub async fn set_associate_after(&self, checks: Option<u32>) {
        self.inner.lock().await.associate_after = checks;
    }

    /// Mark the station as already associated
    pub async fn set_associated(&self, associated: bool) {
        self.inner.lock().await.associated = associated;
    }

    /// Number of failed activity checks before the access point comes up
    pub async fn set_active_after(&self, checks: Option<u32>) {
        self.inner.lock().await.active_after = checks;
    }

    /// Configure mock to return specific networks on scan
    pub async fn set_scan_results(&self, networks: Vec<VisibleNetwork>) {
        self.inner.lock().await.scan_results = networks;
    }

    /// Configure mock to fail scan operations
    pub async fn set_scan_failure(&self, should_fail: bool) {
        self.inner.lock().await.should_fail_scan = should_fail;
    }

    /// Configure mock to fail association requests
    pub async fn set_associate_failure(&self, should_fail: bool) {
        self.inner.lock().await.should_fail_associate = should_fail;
    }

    /// Configure mock to report no interface configuration
    pub async fn set_interface_config_failure(&self, should_fail: bool) {
        self.inner.lock().await.should_fail_interface_config = should_fail;
    }

    /// Configure mock to fail access-point configuration
    pub async fn set_access_point_failure(&self, should_fail: bool) {
        self.inner.lock().await.should_fail_access_point = should_fail;
    }

    /// SSIDs passed to `associate`, in call order
    pub async fn associate_calls(&self) -> Vec<String> {
        self.inner.lock().await.associate_calls.clone()
    }

    /// Number of `is_associated` checks performed
    pub async fn is_associated_calls(&self) -> u32 {
        self.inner.lock().await.is_associated_calls
    }

    /// Modes activated, in call order
    pub async fn modes(&self) -> Vec<RadioMode> {
        self.inner.lock().await.modes.clone()
    }

    /// Essid of the configured access point
    pub async fn access_point(&self) -> Option<String> {
        self.inner.lock().await.access_point.clone()
    }

    /// Last static configuration applied to the interface
    pub async fn applied_config(&self) -> Option<IpConfig> {
        self.inner.lock().await.applied_config
    }
}

impl Default for MockRadioDriver {
    fn default() -> Self {
        Self::new()
    }
}

impl RadioDriver for MockRadioDriver {
    async fn set_mode(&self, mode: RadioMode) -> DriverResult<()> {
        self.inner.lock().await.modes.push(mode);
        Ok(())
    }

    async fn is_associated(&self) -> DriverResult<bool> {
        let mut state = self.inner.lock().await;
        state.is_associated_calls += 1;

        if !state.associated && state.association_pending {
            match state.associate_after {
                Some(after) if state.association_polls >= after => {
                    state.associated = true;
                    state.association_pending = false;
                }
                _ => state.association_polls += 1,
            }
        }

        Ok(state.associated)
    }

    async fn associate(&self, ssid: &str, _password: &str) -> DriverResult<()> {
        let mut state = self.inner.lock().await;
        if state.should_fail_associate {
            return Err(DriverError::Radio("Mock association failure".into()));
        }
        state.associate_calls.push(ssid.to_string());
        state.association_pending = true;
        state.association_polls = 0;
        Ok(())
    }

    async fn interface_config(&self) -> DriverResult<IpConfig> {
        let state = self.inner.lock().await;
        if state.should_fail_interface_config {
            return Err(DriverError::Radio("Mock interface has no address".into()));
        }
        Ok(state.applied_config.unwrap_or(state.station_config))
    }

    async fn scan_visible_networks(&self) -> DriverResult<Vec<VisibleNetwork>> {
        let state = self.inner.lock().await;
        if state.should_fail_scan {
            Err(DriverError::Radio("Mock scan failure".into()))
        } else {
            Ok(state.scan_results.clone())
        }
    }

    async fn configure_access_point(&self, ssid: &str, _password: &str) -> DriverResult<()> {
        let mut state = self.inner.lock().await;
        if state.should_fail_access_point {
            return Err(DriverError::Radio("Mock access point failure".into()));
        }
        state.access_point = Some(ssid.to_string());
        Ok(())
    }

    async fn set_interface_config(&self, config: IpConfig) -> DriverResult<()> {
        self.inner.lock().await.applied_config = Some(config);
        Ok(())
    }

    async fn is_active(&self) -> DriverResult<bool> {
        let mut state = self.inner.lock().await;
        if !state.modes.contains(&RadioMode::AccessPoint) {
            return Ok(false);
        }
        match state.active_after {
            Some(after) if state.active_polls >= after => Ok(true),
            _ => {
                state.active_polls += 1;
                Ok(false)
            }
        }
    }
}

/// Mock indicator recording every pattern it is asked to show
#[derive(Debug, Clone, Default)]
pub struct MockIndicator {
    patterns: Arc<Mutex<Vec<IndicatorPattern>>>,
    should_fail: Arc<Mutex<bool>>,
}

impl MockIndicator {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn patterns(&self) -> Vec<IndicatorPattern> {
        self.patterns.lock().await.clone()
    }

    pub async fn set_failure(&self, should_fail: bool) {
        *self.should_fail.lock().await = should_fail;
    }
}

impl IndicatorDriver for MockIndicator {
    async fn set_indicator(&self, pattern: IndicatorPattern) -> DriverResult<()> {
        if *self.should_fail.lock().await {
            return Err(DriverError::Indicator("Mock indicator failure".into()));
        }
        self.patterns.lock().await.push(pattern);
        Ok(())
    }
}

/// Mock environmental sensor
#[derive(Debug, Clone)]
pub struct MockSensor {
    reading: Arc<Mutex<Option<(i32, i32)>>>,
    measure_calls: Arc<Mutex<u32>>,
}

impl MockSensor {
    /// Create a sensor reporting 24 °C / 40 %
    pub fn new() -> Self {
        Self {
            reading: Arc::new(Mutex::new(Some((24, 40)))),
            measure_calls: Arc::new(Mutex::new(0)),
        }
    }

    /// Set the next readings; `None` makes every measurement fail
    pub async fn set_reading(&self, reading: Option<(i32, i32)>) {
        *self.reading.lock().await = reading;
    }

    pub async fn measure_calls(&self) -> u32 {
        *self.measure_calls.lock().await
    }
}

impl Default for MockSensor {
    fn default() -> Self {
        Self::new()
    }
}

impl SensorDriver for MockSensor {
    async fn measure(&self) -> DriverResult<(i32, i32)> {
        *self.measure_calls.lock().await += 1;
        self.reading
            .lock()
            .await
            .ok_or_else(|| DriverError::Sensor("Mock sensor timeout".into()))
    }
}
