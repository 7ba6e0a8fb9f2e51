//! Hardware driver abstraction layer

pub mod driver;
pub mod log_indicator;
pub mod mock_backend;
pub mod wpa_radio;

pub use driver::{IndicatorDriver, RadioDriver, SensorDriver};
pub use log_indicator::LogIndicator;
pub use mock_backend::{MockIndicator, MockRadioDriver, MockSensor};
pub use wpa_radio::WpaRadioDriver;
