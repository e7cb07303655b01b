//! Warband skirmish engine library.
//!
//! Exposes the unit and band model, combat resolution, and the battle
//! driver for use by integration tests and the binary entry point.

pub mod army;
pub mod battle;
pub mod combat;
