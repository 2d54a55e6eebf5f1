//! Dino Stopper: dinosaurs cross the field, the player clicks to stop them.
//!
//! The library holds the whole game model and is independent of any
//! renderer; the `dino_stopper` binary drives it from a terminal.

pub mod collision;
pub mod config;
pub mod effects;
pub mod entities;
pub mod error;
pub mod pool;
pub mod schedule;
pub mod session;
pub mod spawn;
pub mod state;
pub mod storage;
