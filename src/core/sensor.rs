//! Sensor gateway: single-shot environmental measurements

use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::{backend::SensorDriver, core::types::SensorReading};

/// Wraps the environmental sensor driver
///
/// Every call triggers exactly one physical measurement. Faults are logged
/// and reported as `None`; the gateway never retries because the sensor
/// enforces a minimum interval between measurements.
pub struct SensorGateway<S: SensorDriver> {
    sensor: Arc<S>,
    busy: Mutex<()>,
}

impl<S: SensorDriver> SensorGateway<S> {
    pub fn new(sensor: Arc<S>) -> Self {
        Self {
            sensor,
            busy: Mutex::new(()),
        }
    }

    pub async fn read_environment(&self) -> Option<SensorReading> {
        let _busy = self.busy.lock().await;

        match self.sensor.measure().await {
            Ok((temperature_celsius, humidity_percent)) => {
                debug!(temperature_celsius, humidity_percent, "Sensor measurement");
                Some(SensorReading {
                    temperature_celsius,
                    humidity_percent,
                })
            }
            Err(e) => {
                warn!("Failed to read sensor: {}", e);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::MockSensor;

    #[tokio::test]
    async fn test_read_environment() {
        let sensor = MockSensor::new();
        sensor.set_reading(Some((21, 55))).await;
        let gateway = SensorGateway::new(Arc::new(sensor.clone()));

        assert_eq!(
            gateway.read_environment().await,
            Some(SensorReading {
                temperature_celsius: 21,
                humidity_percent: 55,
            })
        );
        assert_eq!(sensor.measure_calls().await, 1);
    }

    #[tokio::test]
    async fn test_read_environment_fault_is_not_retried() {
        let sensor = MockSensor::new();
        sensor.set_reading(None).await;
        let gateway = SensorGateway::new(Arc::new(sensor.clone()));

        assert_eq!(gateway.read_environment().await, None);
        assert_eq!(sensor.measure_calls().await, 1);
    }

    #[tokio::test]
    async fn test_readings_are_not_cached() {
        let sensor = MockSensor::new();
        let gateway = SensorGateway::new(Arc::new(sensor.clone()));

        sensor.set_reading(Some((20, 30))).await;
        let first = gateway.read_environment().await;
        sensor.set_reading(Some((22, 35))).await;
        let second = gateway.read_environment().await;

        assert_ne!(first, second);
        assert_eq!(sensor.measure_calls().await, 2);
    }
}
