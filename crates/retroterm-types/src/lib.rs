//! Foundation types for RETROTERM.
//!
//! This crate contains the platform-agnostic core types shared by all
//! RETROTERM crates: errors, colors, key events, configuration loading, and
//! the injectable random source used by every randomized timer.

pub mod color;
pub mod config;
pub mod error;
pub mod input;
pub mod rng;
