//! Device service facade

use std::sync::Arc;

use crate::{
    backend::{IndicatorDriver, RadioDriver, SensorDriver},
    core::{
        clock::Clock,
        error::RadioResult,
        radio::{RadioController, RadioTiming},
        sensor::SensorGateway,
        types::{IndicatorPattern, IpConfig, NetworkCredentials, RadioStatus, SensorReading},
    },
};

/// Owns the injected hardware capabilities and the components built on them
pub struct DeviceService<R, I, C, S>
where
    R: RadioDriver,
    I: IndicatorDriver,
    C: Clock,
    S: SensorDriver,
{
    pub radio: Arc<RadioController<R, I, C>>,
    pub sensor: Arc<SensorGateway<S>>,
}

impl<R, I, C, S> DeviceService<R, I, C, S>
where
    R: RadioDriver,
    I: IndicatorDriver,
    C: Clock,
    S: SensorDriver,
{
    pub fn new(
        radio: Arc<R>,
        indicator: Arc<I>,
        clock: Arc<C>,
        sensor: Arc<S>,
        timing: RadioTiming,
    ) -> Self {
        Self {
            radio: Arc::new(RadioController::new(radio, indicator, clock, timing)),
            sensor: Arc::new(SensorGateway::new(sensor)),
        }
    }

    /// Host the device's own network
    pub async fn advertise(
        &self,
        credentials: &NetworkCredentials,
        config: IpConfig,
    ) -> RadioResult<RadioStatus> {
        self.radio.activate_access_point(credentials, config).await
    }

    /// Join an existing network
    pub async fn join(&self, credentials: &NetworkCredentials) -> RadioResult<RadioStatus> {
        self.radio.connect_station(credentials).await
    }

    pub async fn radio_status(&self) -> RadioStatus {
        self.radio.status().await
    }

    pub async fn read_environment(&self) -> Option<SensorReading> {
        self.sensor.read_environment().await
    }

    pub async fn indicate(&self, pattern: IndicatorPattern) {
        self.radio.signal(pattern).await
    }
}
