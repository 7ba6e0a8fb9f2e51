//! Command vocabulary and decoding
//!
//! Commands arrive as a space separated line such as
//! `wifi connect ssid=Home password=secret`. The transport escapes spaces as
//! `%20` or `&`, which [`decode`] turns back into spaces.

use crate::core::{error::CommandError, types::NetworkCredentials};

const VERB_WIFI: &str = "wifi";
const ACTION_CONNECT: &str = "connect";
const ACTION_SCAN: &str = "scan";

/// Escapes replaced by a space; nothing else is unescaped
const SPACE_ESCAPES: [&str; 2] = ["%20", "&"];

/// A decoded command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Help,
    Connect(NetworkCredentials),
    Scan,
    /// `wifi` followed by an action outside the vocabulary
    Unknown(String),
}

/// Reverse the transport's space escaping
///
/// Only `%20` and `&` are replaced. Other percent escapes are left as is.
pub fn decode(raw: &str) -> String {
    SPACE_ESCAPES
        .iter()
        .fold(raw.to_string(), |decoded, escape| decoded.replace(*escape, " "))
}

/// Parse a decoded command line
pub fn parse(decoded: &str) -> Result<Command, CommandError> {
    if decoded == "help" {
        return Ok(Command::Help);
    }

    let tokens: Vec<&str> = decoded.split_whitespace().collect();
    let action = match tokens.as_slice() {
        [VERB_WIFI, action, ..] => *action,
        _ => return Err(CommandError::InvalidCommand),
    };

    match action {
        ACTION_CONNECT => parse_connect(&tokens),
        ACTION_SCAN => Ok(Command::Scan),
        other => Ok(Command::Unknown(other.to_string())),
    }
}

/// ssid and password are taken by position from the last two tokens,
/// whatever their keys are named
fn parse_connect(tokens: &[&str]) -> Result<Command, CommandError> {
    let [.., ssid_token, password_token] = tokens else {
        return Err(CommandError::InvalidCommand);
    };

    let ssid = parameter_value(ssid_token)?;
    let password = parameter_value(password_token)?;

    if ssid.is_empty() {
        return Err(CommandError::MissingSsid);
    }

    Ok(Command::Connect(NetworkCredentials::new(ssid, password)))
}

/// Value of a `key=value` token: everything after the first `=`, so
/// `password=a=b` yields `a=b`
fn parameter_value<'a>(token: &'a str) -> Result<&'a str, CommandError> {
    token
        .split_once('=')
        .map(|(_, value)| value)
        .ok_or_else(|| CommandError::MalformedParameter(token.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_decode_replaces_space_escapes() {
        assert_eq!(decode("connect&ssid=Home&password=pw"), "connect ssid=Home password=pw");
        assert_eq!(decode("connect%20ssid=My%20Net"), "connect ssid=My Net");
    }

    #[test]
    fn test_decode_leaves_other_escapes() {
        assert_eq!(decode("ssid=caf%C3%A9%21"), "ssid=caf%C3%A9%21");
        assert_eq!(decode("a+b"), "a+b");
    }

    #[test]
    fn test_decode_idempotent_without_escapes() {
        for input in ["scan", "connect ssid=x password=y", "%41%2", "", "100%"] {
            let once = decode(input);
            assert_eq!(decode(&once), once);
        }
    }

    #[test]
    fn test_parse_help() {
        assert_eq!(parse("help"), Ok(Command::Help));
    }

    #[test]
    fn test_parse_scan() {
        assert_eq!(parse("wifi scan"), Ok(Command::Scan));
        assert_eq!(parse("  wifi   scan  extra"), Ok(Command::Scan));
    }

    #[test]
    fn test_parse_connect() {
        assert_eq!(
            parse("wifi connect ssid=Home password=secret"),
            Ok(Command::Connect(NetworkCredentials::new("Home", "secret")))
        );
    }

    #[test]
    fn test_parse_connect_empty_password() {
        assert_eq!(
            parse("wifi connect ssid=Cafe password="),
            Ok(Command::Connect(NetworkCredentials::new("Cafe", "")))
        );
    }

    #[test]
    fn test_parse_connect_is_positional() {
        assert_eq!(
            parse("wifi connect password=secret ssid=Home"),
            Ok(Command::Connect(NetworkCredentials::new("secret", "Home")))
        );
        assert_eq!(
            parse("wifi connect extra=1 a=Net b=pw"),
            Ok(Command::Connect(NetworkCredentials::new("Net", "pw")))
        );
    }

    #[test]
    fn test_parse_connect_value_keeps_equals_signs() {
        assert_eq!(
            parse("wifi connect ssid=Home password=a=b"),
            Ok(Command::Connect(NetworkCredentials::new("Home", "a=b")))
        );
    }

    #[test]
    fn test_parse_connect_missing_ssid() {
        assert_eq!(
            parse("wifi connect ssid= password=secret"),
            Err(CommandError::MissingSsid)
        );
    }

    #[test]
    fn test_parse_connect_malformed() {
        assert_eq!(
            parse("wifi connect"),
            Err(CommandError::MalformedParameter("wifi".into()))
        );
        assert_eq!(
            parse("wifi connect ssid=Home"),
            Err(CommandError::MalformedParameter("connect".into()))
        );
    }

    #[test]
    fn test_parse_invalid() {
        assert_eq!(parse(""), Err(CommandError::InvalidCommand));
        assert_eq!(parse("wifi"), Err(CommandError::InvalidCommand));
        assert_eq!(parse("led on"), Err(CommandError::InvalidCommand));
        assert_eq!(parse("wifi help"), Ok(Command::Unknown("help".into())));
    }

    #[test]
    fn test_parse_unknown_action() {
        assert_eq!(parse("wifi bogus"), Ok(Command::Unknown("bogus".into())));
    }
}
