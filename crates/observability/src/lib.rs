//! Logging setup shared by every binary.

pub mod subscriber;

pub use subscriber::{LogConfig, LogFormat, UnknownLogFormat, init, init_with};
