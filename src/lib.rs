//! Squad Tactics - turn-based tactical combat engine
//!
//! The presentation layer issues commands through [`battle::TurnController`] and
//! renders the state and event log it gets back.

pub mod battle;
pub mod core;
