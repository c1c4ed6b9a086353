// Library root: re-exports all modules so the CLI, integration tests and
// other front ends can reach the drafting core.

pub mod backend;
pub mod catalog;
pub mod config;
pub mod detail;
pub mod display;
pub mod draft;
pub mod events;
pub mod prediction;
pub mod session;
pub mod suggest;
