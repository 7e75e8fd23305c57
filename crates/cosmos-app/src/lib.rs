//! Cosmos sandbox application: fixed-timestep loop, platform directories,
//! and the headless scenario runner.

pub mod game_loop;
pub mod platform;
pub mod runner;

pub use runner::{AppError, BodyReport, RunSummary, Sandbox, run};
