//! Shared helpers for unit tests.

#![allow(clippy::unwrap_used)]

pub mod listener;
pub mod socket_guard;
