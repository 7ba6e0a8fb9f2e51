//! Error types for the appliance service

use thiserror::Error;

/// Result type for driver (collaborator) operations
pub type DriverResult<T> = Result<T, DriverError>;

/// Result type for radio controller operations
pub type RadioResult<T> = Result<T, RadioError>;

/// Result type for transport operations
pub type TransportResult<T> = Result<T, TransportError>;

/// Failures reported by the hardware collaborators
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DriverError {
    #[error("Radio driver error: {0}")]
    Radio(String),

    #[error("Sensor read failed: {0}")]
    Sensor(String),

    #[error("Indicator driver error: {0}")]
    Indicator(String),

    #[error("Operation not supported by this driver: {0}")]
    Unsupported(String),

    #[error("wpa_supplicant error: {0}")]
    WpaSupplicantError(String),
}

/// Errors raised by the radio controller
///
/// An association timeout is not an error: it is reported as
/// [`RadioStatus::Disconnected`](crate::core::types::RadioStatus).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RadioError {
    #[error("Access point did not become active after {attempts} attempts")]
    HardwareFault { attempts: u32 },

    #[error(transparent)]
    Driver(#[from] DriverError),
}

/// Command decoding failures
///
/// The `Display` text of each variant is sent verbatim as the response body.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    #[error("Invalid command. Type '/cmd=help' for a list of available commands.")]
    InvalidCommand,

    #[error("SSID is required for connecting.")]
    MissingSsid,

    #[error("Error: malformed parameter '{0}', expected key=value")]
    MalformedParameter(String),
}

/// Errors related to the connection transport
#[derive(Error, Debug)]
pub enum TransportError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Client did not complete the request within {0:?}")]
    RequestTimeout(std::time::Duration),

    #[error("Malformed request: {0}")]
    MalformedRequest(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_error_messages() {
        assert_eq!(
            CommandError::InvalidCommand.to_string(),
            "Invalid command. Type '/cmd=help' for a list of available commands."
        );
        assert_eq!(
            CommandError::MissingSsid.to_string(),
            "SSID is required for connecting."
        );
        assert!(
            CommandError::MalformedParameter("ssid".into())
                .to_string()
                .starts_with("Error: ")
        );
    }

    #[test]
    fn test_radio_error_wraps_driver_error() {
        let err: RadioError = DriverError::Radio("no carrier".into()).into();
        assert_eq!(err.to_string(), "Radio driver error: no carrier");
    }
}
