//! ilog - leveled file logging with daily rotation
//!
//! This library provides the rotating log writer, its color policy and
//! level model, plus the environment settings and HTTP endpoint used by the
//! `ilog` binary.

pub mod config;
pub mod logging;
pub mod server;
