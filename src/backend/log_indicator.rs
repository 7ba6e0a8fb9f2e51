//! Indicator driver for hosts without a status LED

use tracing::info;

use crate::{
    backend::IndicatorDriver,
    core::{error::DriverResult, types::IndicatorPattern},
};

/// Reports indicator changes through the log instead of a GPIO pin
#[derive(Debug, Clone, Copy, Default)]
pub struct LogIndicator;

impl IndicatorDriver for LogIndicator {
    async fn set_indicator(&self, pattern: IndicatorPattern) -> DriverResult<()> {
        match pattern.timing() {
            Some((half_period, cycles)) => {
                info!(?pattern, ?half_period, cycles, "[LED] animating indicator")
            }
            None => info!(?pattern, "[LED] set indicator"),
        }
        Ok(())
    }
}
