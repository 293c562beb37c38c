//! Enviro station: configuration, collaborators and the sampling loop
//!
//! Wires [`enviro_core::Engine`] to real or simulated sources and to the
//! collector through [`enviro_connectors`].

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod config;
pub mod render;
pub mod runner;
pub mod sources;

pub use config::{ConfigError, StationConfig};
pub use render::{LogRenderer, LogSink};
pub use runner::{RunSummary, Station};
pub use sources::{SimulatedSensor, ThermalZone};
