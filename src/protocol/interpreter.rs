//! Command interpreter
//!
//! Every outcome, including malformed input and driver failures, is a
//! human-readable string meant to be embedded directly in a response body.

use std::sync::Arc;
use tracing::{debug, warn};

use crate::{
    backend::{IndicatorDriver, RadioDriver},
    core::{clock::Clock, radio::RadioController, types::NetworkCredentials},
    protocol::command::{self, Command},
};

pub const HELP_MESSAGE: &str = "
    WIFI HELP
        wifi connect ssid=NAME password=PASSWORD
        wifi scan <a href='/cmd/wifi?scan'>wifi scan</a>
    ";

pub const CONNECTED_MESSAGE: &str = "Connected successfully.";
pub const CONNECT_FAILED_MESSAGE: &str = "Failed to connect.";
pub const INVALID_WIFI_COMMAND_MESSAGE: &str =
    "Invalid 'wifi' command. Type '/cmd=help' for a list of available commands.";

/// Decodes commands and dispatches them to the radio controller
pub struct CommandInterpreter<R: RadioDriver, I: IndicatorDriver, C: Clock> {
    radio: Arc<RadioController<R, I, C>>,
}

impl<R: RadioDriver, I: IndicatorDriver, C: Clock> CommandInterpreter<R, I, C> {
    pub fn new(radio: Arc<RadioController<R, I, C>>) -> Self {
        Self { radio }
    }

    /// Decode a transport-escaped command and interpret it
    pub async fn execute(&self, raw: &str) -> String {
        self.interpret(&command::decode(raw)).await
    }

    /// Interpret an already decoded command line
    pub async fn interpret(&self, decoded: &str) -> String {
        let command = match command::parse(decoded) {
            Ok(command) => command,
            Err(e) => {
                debug!("Rejected command: {}", e);
                return e.to_string();
            }
        };

        debug!(?command, "Dispatching command");

        match command {
            Command::Help => HELP_MESSAGE.to_string(),
            Command::Connect(credentials) => self.connect(&credentials).await,
            Command::Scan => self.scan().await,
            Command::Unknown(_) => INVALID_WIFI_COMMAND_MESSAGE.to_string(),
        }
    }

    async fn connect(&self, credentials: &NetworkCredentials) -> String {
        match self.radio.connect_station(credentials).await {
            Ok(status) if status.is_connected() => CONNECTED_MESSAGE.to_string(),
            Ok(_) => CONNECT_FAILED_MESSAGE.to_string(),
            Err(e) => {
                warn!(ssid = %credentials.ssid, "Connect failed: {}", e);
                CONNECT_FAILED_MESSAGE.to_string()
            }
        }
    }

    async fn scan(&self) -> String {
        let networks = match self.radio.scan().await {
            Ok(networks) => networks,
            Err(e) => {
                warn!("Scan failed: {}", e);
                return format!("Error: {}", e);
            }
        };

        serde_json::to_string(&networks).unwrap_or_else(|e| format!("Error: {}", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        backend::{MockIndicator, MockRadioDriver},
        core::{
            clock::RecordingClock,
            radio::RadioTiming,
            types::{IndicatorPattern, RadioStatus, VisibleNetwork},
        },
    };
    use pretty_assertions::assert_eq;
    use serde_json::Value;

    type TestInterpreter = CommandInterpreter<MockRadioDriver, MockIndicator, RecordingClock>;

    fn interpreter_with_indicator() -> (TestInterpreter, MockRadioDriver, MockIndicator) {
        let radio = MockRadioDriver::new();
        let indicator = MockIndicator::new();
        let controller = RadioController::new(
            Arc::new(radio.clone()),
            Arc::new(indicator.clone()),
            Arc::new(RecordingClock::new()),
            RadioTiming::default(),
        );
        (CommandInterpreter::new(Arc::new(controller)), radio, indicator)
    }

    fn interpreter() -> (TestInterpreter, MockRadioDriver) {
        let (interpreter, radio, _) = interpreter_with_indicator();
        (interpreter, radio)
    }

    #[tokio::test]
    async fn test_help() {
        let (interpreter, _) = interpreter();
        let output = interpreter.interpret("help").await;
        assert!(output.contains("WIFI HELP"));
        assert!(output.contains("wifi connect ssid=NAME password=PASSWORD"));
    }

    #[tokio::test]
    async fn test_connect_success_calls_radio_once() {
        let (interpreter, radio) = interpreter();

        let output = interpreter
            .execute("wifi connect&ssid=HomeNet&password=secret")
            .await;

        assert_eq!(output, CONNECTED_MESSAGE);
        assert_eq!(radio.associate_calls().await, vec!["HomeNet".to_string()]);
    }

    #[tokio::test]
    async fn test_connect_timeout_reports_failure() {
        let (interpreter, radio) = interpreter();
        radio.set_associate_after(None).await;

        let output = interpreter
            .interpret("wifi connect ssid=HomeNet password=wrong")
            .await;

        assert_eq!(output, CONNECT_FAILED_MESSAGE);
        assert_eq!(radio.associate_calls().await.len(), 1);
    }

    #[tokio::test]
    async fn test_connect_driver_error_reports_failure() {
        let (interpreter, radio, indicator) = interpreter_with_indicator();
        radio.set_associate_failure(true).await;

        let output = interpreter
            .interpret("wifi connect ssid=HomeNet password=secret")
            .await;

        assert_eq!(output, CONNECT_FAILED_MESSAGE);
        assert_eq!(interpreter.radio.status().await, RadioStatus::Disconnected);
        assert_eq!(indicator.patterns().await, vec![IndicatorPattern::SlowPulse]);
    }

    #[tokio::test]
    async fn test_connect_without_address_reports_success() {
        let (interpreter, radio, indicator) = interpreter_with_indicator();
        radio.set_interface_config_failure(true).await;

        let output = interpreter
            .interpret("wifi connect ssid=HomeNet password=secret")
            .await;

        assert_eq!(output, CONNECTED_MESSAGE);
        assert!(interpreter.radio.status().await.is_connected());
        assert_eq!(indicator.patterns().await, vec![IndicatorPattern::FastBlink]);
    }

    #[tokio::test]
    async fn test_connect_without_ssid_never_touches_radio() {
        let (interpreter, radio) = interpreter();

        let output = interpreter
            .interpret("wifi connect ssid= password=secret")
            .await;

        assert_eq!(output, "SSID is required for connecting.");
        assert!(radio.modes().await.is_empty());
        assert!(radio.associate_calls().await.is_empty());
    }

    #[tokio::test]
    async fn test_connect_malformed_parameters() {
        let (interpreter, radio) = interpreter();

        let output = interpreter.interpret("wifi connect").await;

        assert!(output.starts_with("Error: "));
        assert!(radio.modes().await.is_empty());
    }

    #[tokio::test]
    async fn test_scan_json() {
        let (interpreter, radio) = interpreter();
        radio
            .set_scan_results(
                (0..7u8)
                    .map(|code| VisibleNetwork {
                        ssid: format!("Net{}", code),
                        rssi: -50 - i16::from(code),
                        security_code: code,
                    })
                    .collect(),
            )
            .await;

        let output = interpreter.execute("wifi scan").await;
        let value: Value = serde_json::from_str(&output).unwrap();
        let entries = value.as_array().unwrap();

        assert_eq!(entries.len(), 7);
        let labels = ["Open", "WEP", "WPA-PSK", "WPA2-PSK", "WPA/WPA2-PSK", "Unknown"];
        for entry in entries {
            assert!(entry["ssid"].is_string());
            assert!(entry["rssi"].is_i64());
            assert!(labels.contains(&entry["security"].as_str().unwrap()));
        }
        assert_eq!(entries[3]["security"], "WPA2-PSK");
    }

    #[tokio::test]
    async fn test_scan_empty() {
        let (interpreter, _) = interpreter();
        assert_eq!(interpreter.interpret("wifi scan").await, "[]");
    }

    #[tokio::test]
    async fn test_scan_failure_is_textual() {
        let (interpreter, radio) = interpreter();
        radio.set_scan_failure(true).await;

        let output = interpreter.interpret("wifi scan").await;
        assert_eq!(output, "Error: Radio driver error: Mock scan failure");
    }

    #[tokio::test]
    async fn test_unknown_wifi_action() {
        let (interpreter, _) = interpreter();
        let output = interpreter.interpret("wifi bogus").await;
        assert!(output.starts_with("Invalid 'wifi' command"));
    }

    #[tokio::test]
    async fn test_invalid_command() {
        let (interpreter, _) = interpreter();
        assert!(interpreter.interpret("reboot now").await.starts_with("Invalid command."));
        assert!(interpreter.interpret("wifi").await.starts_with("Invalid command."));
    }
}
