//! Core of a wave-based arcade shooter.
//!
//! The library owns the per-tick game rules; everything that touches the
//! outside world (window, images, keyboard, clock) is supplied by the caller
//! through the [`stage::Stage`] and [`stage::Hud`] traits.

pub mod compute;
pub mod config;
pub mod entities;
pub mod error;
pub mod session;
pub mod stage;
pub mod store;
pub mod timer;
