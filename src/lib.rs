//! Incon Tools Library
//!
//! Tracking map generation and incident email notifications for the INCON
//! security operations system.

pub mod cli;
pub mod commands;
pub mod config;
pub mod email;
pub mod error;
pub mod infrastructure;
pub mod map;
pub mod money;
pub mod output;
pub mod palette;
pub mod text;
pub mod track;
pub mod types;
