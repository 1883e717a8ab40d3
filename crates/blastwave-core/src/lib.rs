//! Core types and definitions for the BLASTWAVE propagation engine.
//!
//! This crate defines the vocabulary shared across all other crates:
//! components, events, configuration, collaborator traits and constants.
//! It has no dependency on any host game framework.

pub mod components;
pub mod config;
pub mod constants;
pub mod enums;
pub mod events;
pub mod registry;
pub mod services;
pub mod state;
pub mod types;

pub use config::{ConfigError, ObstacleLayers, PresetCatalog, PropagationEvent};
