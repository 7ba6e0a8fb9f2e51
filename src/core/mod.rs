//! Core device logic module

pub mod clock;
pub mod error;
pub mod radio;
pub mod sensor;
pub mod service;
pub mod types;
