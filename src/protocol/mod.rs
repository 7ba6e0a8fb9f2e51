//! Command language: decoding, parsing and interpretation

pub mod command;
pub mod interpreter;

pub use {
    command::{Command, decode, parse},
    interpreter::CommandInterpreter,
};
