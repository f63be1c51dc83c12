//! Per-kind resource logic.
//!
//! Each submodule implements the framework traits for one collection and
//! offers a `new()` factory that wires its store and controller together.
//!
//! - [`skill`] - duplicate-name rule on create
//! - [`project`] - GitHub link rule and comma-separated tech tags
//! - [`message`] - read-only, delete-only, listed with the credential

pub mod message;
pub mod project;
pub mod skill;
