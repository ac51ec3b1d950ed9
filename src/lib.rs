// src/lib.rs

#[macro_use]
pub mod macros;
#[macro_use]
pub mod log;

pub mod cli;
pub mod config;
pub mod core;
pub mod specs;

pub mod assets;
pub mod csv;
pub mod data;
pub mod embed;
pub mod export;
pub mod file;
pub mod filter;
pub mod format;
pub mod gui;
pub mod progress;
pub mod render;
pub mod runner;
pub mod sources;
pub mod wiring;
