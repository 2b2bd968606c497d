//! Simsweep Core
//!
//! Core types for the ODD simulation sweep driver.
//!
//! This crate contains:
//! - Domain types: the job record describing one simulation invocation
//! - Sweeps: the parameter grids that expand into job records

pub mod domain;
pub mod sweep;
