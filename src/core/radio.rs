//! Radio controller with connectivity state machine

use std::{sync::Arc, time::Duration};
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info, warn};

use crate::{
    backend::{IndicatorDriver, RadioDriver},
    core::{
        clock::Clock,
        error::{RadioError, RadioResult},
        types::{IndicatorPattern, IpConfig, NetworkCredentials, RadioMode, RadioStatus, WifiNetwork},
    },
};

/// Polling budgets for the bounded waits of the radio controller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RadioTiming {
    /// Association checks after the initial one
    pub association_polls: u32,
    pub association_interval: Duration,
    /// Activity checks before access-point activation is declared failed
    pub activation_attempts: u32,
    pub activation_interval: Duration,
}

impl Default for RadioTiming {
    fn default() -> Self {
        Self {
            association_polls: 5,
            association_interval: Duration::from_secs(1),
            activation_attempts: 50,
            activation_interval: Duration::from_millis(100),
        }
    }
}

/// Connectivity state machine
#[derive(Debug)]
struct RadioStateMachine {
    status: RadioStatus,
    ssid: Option<String>,
}

impl RadioStateMachine {
    fn new() -> Self {
        Self {
            status: RadioStatus::Disconnected,
            ssid: None,
        }
    }

    /// Start association attempt
    fn begin_connect(&mut self, ssid: &str) {
        self.status = RadioStatus::Connecting;
        self.ssid = Some(ssid.to_string());
    }

    /// Mark association as successful
    fn complete_connect(&mut self, config: IpConfig) {
        self.status = RadioStatus::Connected(config);
    }

    /// Association timed out or the driver failed
    fn fail_connect(&mut self) {
        self.status = RadioStatus::Disconnected;
        self.ssid = None;
    }

    fn activate_access_point(&mut self, ssid: &str, config: IpConfig) {
        self.status = RadioStatus::ApActive(config);
        self.ssid = Some(ssid.to_string());
    }

    fn status(&self) -> RadioStatus {
        self.status
    }

    fn ssid(&self) -> Option<&str> {
        self.ssid.as_deref()
    }
}

/// Owns the radio mode and the device's connectivity status
///
/// Association, advertising and scanning are serialized: only one radio
/// operation is in flight at a time.
pub struct RadioController<R: RadioDriver, I: IndicatorDriver, C: Clock> {
    radio: Arc<R>,
    indicator: Arc<I>,
    clock: Arc<C>,
    timing: RadioTiming,
    state_machine: Arc<RwLock<RadioStateMachine>>,
    operation: Mutex<()>,
}

impl<R: RadioDriver, I: IndicatorDriver, C: Clock> RadioController<R, I, C> {
    /// Create a new radio controller
    pub fn new(radio: Arc<R>, indicator: Arc<I>, clock: Arc<C>, timing: RadioTiming) -> Self {
        Self {
            radio,
            indicator,
            clock,
            timing,
            state_machine: Arc::new(RwLock::new(RadioStateMachine::new())),
            operation: Mutex::new(()),
        }
    }

    /// Current connectivity status
    pub async fn status(&self) -> RadioStatus {
        self.state_machine.read().await.status()
    }

    /// SSID joined or advertised by the last successful operation
    pub async fn ssid(&self) -> Option<String> {
        self.state_machine.read().await.ssid().map(str::to_string)
    }

    /// Switch to access-point mode and advertise a network
    ///
    /// Waits for the interface to report active within the configured number
    /// of attempts, failing with [`RadioError::HardwareFault`] otherwise.
    pub async fn activate_access_point(
        &self,
        credentials: &NetworkCredentials,
        config: IpConfig,
    ) -> RadioResult<RadioStatus> {
        let _operation = self.operation.lock().await;

        self.radio.set_mode(RadioMode::AccessPoint).await?;
        self.radio
            .configure_access_point(&credentials.ssid, &credentials.password)
            .await?;
        self.radio.set_interface_config(config).await?;

        let attempts = self.timing.activation_attempts.max(1);
        let mut active = false;
        for attempt in 1..=attempts {
            if self.radio.is_active().await? {
                active = true;
                break;
            }
            if attempt < attempts {
                self.clock.sleep(self.timing.activation_interval).await;
            }
        }

        if !active {
            warn!(ssid = %credentials.ssid, attempts, "Access point did not become active");
            return Err(RadioError::HardwareFault { attempts });
        }

        self.state_machine
            .write()
            .await
            .activate_access_point(&credentials.ssid, config);

        info!(
            ssid = %credentials.ssid,
            ip = %config.ip,
            subnet = %config.subnet,
            gateway = %config.gateway,
            dns = %config.dns,
            "Access point configured"
        );

        Ok(RadioStatus::ApActive(config))
    }

    /// Join a network in station mode
    ///
    /// Association is polled for a bounded budget. Timing out is a normal
    /// outcome reported as [`RadioStatus::Disconnected`]; only driver
    /// failures before association are returned as errors. Once associated,
    /// a missing interface configuration is reported as unspecified.
    pub async fn connect_station(
        &self,
        credentials: &NetworkCredentials,
    ) -> RadioResult<RadioStatus> {
        let _operation = self.operation.lock().await;

        let associated = match self.associate(credentials).await {
            Ok(associated) => associated,
            Err(e) => {
                self.state_machine.write().await.fail_connect();
                warn!(ssid = %credentials.ssid, "Association failed: {}", e);
                self.signal(IndicatorPattern::SlowPulse).await;
                return Err(e);
            }
        };

        if !associated {
            self.state_machine.write().await.fail_connect();
            warn!(ssid = %credentials.ssid, "Failed to connect");
            self.signal(IndicatorPattern::SlowPulse).await;
            return Ok(RadioStatus::Disconnected);
        }

        // Associated without an address yet (e.g. DHCP still pending)
        let config = self.radio.interface_config().await.unwrap_or_else(|e| {
            warn!(ssid = %credentials.ssid, "No interface configuration: {}", e);
            IpConfig::UNSPECIFIED
        });

        {
            let mut state_machine = self.state_machine.write().await;
            state_machine.begin_connect(&credentials.ssid);
            state_machine.complete_connect(config);
        }

        info!(
            ssid = %credentials.ssid,
            ip = %config.ip,
            subnet = %config.subnet,
            gateway = %config.gateway,
            dns = %config.dns,
            "Connected"
        );
        self.signal(IndicatorPattern::FastBlink).await;
        Ok(RadioStatus::Connected(config))
    }

    /// Switch to station mode, issue the association request unless already
    /// associated and poll until associated or the budget is spent
    async fn associate(&self, credentials: &NetworkCredentials) -> RadioResult<bool> {
        self.radio.set_mode(RadioMode::Station).await?;

        if self.radio.is_associated().await? {
            debug!("Station already associated");
            return Ok(true);
        }

        info!(ssid = %credentials.ssid, "Connecting");
        self.state_machine
            .write()
            .await
            .begin_connect(&credentials.ssid);
        self.radio
            .associate(&credentials.ssid, &credentials.password)
            .await?;

        let mut remaining = self.timing.association_polls;
        let mut associated = self.radio.is_associated().await?;
        while !associated && remaining > 0 {
            self.clock.sleep(self.timing.association_interval).await;
            remaining -= 1;
            associated = self.radio.is_associated().await?;
        }

        Ok(associated)
    }

    /// Scan for visible networks in station mode
    pub async fn scan(&self) -> RadioResult<Vec<WifiNetwork>> {
        let _operation = self.operation.lock().await;

        self.radio.set_mode(RadioMode::Station).await?;
        let networks: Vec<WifiNetwork> = self
            .radio
            .scan_visible_networks()
            .await?
            .into_iter()
            .map(WifiNetwork::from)
            .collect();

        debug!("Scan complete, found {} networks", networks.len());
        Ok(networks)
    }

    /// Drive the indicator; failures only affect feedback, never the result
    pub async fn signal(&self, pattern: IndicatorPattern) {
        if let Err(e) = self.indicator.set_indicator(pattern).await {
            warn!(?pattern, "Failed to drive indicator: {}", e);
        }
    }
}
