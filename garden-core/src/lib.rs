//! Core plant growth and genome crossover library.
//!
//! Main components:
//! - [`math`]: `Vec2` rotation helpers and the clamped [`math::Color`].
//! - [`types`]: the [`types::Circle`] primitive emitted by growth.
//! - [`genome`]: per-generation trait sets and whole-plant genomes.
//! - [`codec`]: the plain-text genome table format.
//! - [`agent`]: a single growing tip.
//! - [`plant`]: the frontier of agents and the lazy circle stream.
//! - [`smash`]: crossover and mutation of plant genomes.
//! - [`config`]: growth and crossover parameters.

pub mod agent;
pub mod codec;
pub mod config;
pub mod genome;
pub mod math;
pub mod plant;
pub mod smash;
pub mod types;
