// src/lib.rs

#[macro_use]
pub mod macros;
#[macro_use]
pub mod log;

pub mod cli;
pub mod core;
pub mod specs;

pub mod csv;
pub mod dedup;
pub mod fetch;
pub mod file;
pub mod net;
pub mod params;
pub mod progress;
pub mod record;
pub mod runner;
pub mod store;
