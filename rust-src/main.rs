//! Mobile Data Guard CLI
//!
//! Samples mobile data usage, enforces per-app background blocks and
//! asks for mobile data to be turned off on idle, screen lock or overuse.

mod actions;
mod aggregation;
mod cli;
mod commands;
mod config;
mod daemon;
mod error;
mod format;
mod logging;
mod models;
mod platform;
mod policy;
mod sampler;
mod storage;
mod visualization;


fn main() {
    if let Err(e) = cli::run() {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}
