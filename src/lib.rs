//! Covenant compliance schedule generator.
//!
//! This crate computes the due dates on which financial covenants attached
//! to a transaction must be reported, moving each due date off weekends and
//! holidays, and stores the resulting schedules in SQLite.

#![warn(missing_docs)]

pub mod api;
pub mod calendar;
pub mod config;
pub mod error;
pub mod models;
pub mod schedule;
pub mod store;
