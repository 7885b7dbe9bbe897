//! Snake-draft turn scheduling for a shared booking calendar.
//!
//! Whose turn it is, until when, and which phase the season is in are
//! reconstructed from the rotation order, the action log and the current
//! instant on every call; see [`schedule::calculate_draft_status`].

pub mod config;
pub mod display;
pub mod error;
pub mod logging;
pub mod names;
pub mod parser;
pub mod schedule;
pub mod web;
