pub mod config;
pub mod curves;
pub mod simulate;
