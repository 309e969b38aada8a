//! Boolean state tracking for firmware UIs
//!
//! Tracks a fixed-size set of boolean states with exclusive selection, bulk
//! operations, a save/restore snapshot and a compact `'0'`/`'1'` text form.
//! Meant for microcontroller firmware that needs to remember which menu,
//! screen or mode is active with a minimal memory footprint.
//!
//! # Modules
//! - [`state_control`]: the tracker itself
//! - [`options`]: named indices for the trackers a typical UI keeps
//! - [`shared`]: mutex-guarded tracker for use across tasks
//! - [`text`]: bounded writes into caller-supplied byte buffers
//!
//! # Features
//! - `defmt`: log through `defmt` and derive `defmt::Format` on public types

#![cfg_attr(not(test), no_std)]

extern crate alloc;

// Logging macros, must come first so the other modules see them
mod fmt;

pub mod options;
pub mod shared;
pub mod state_control;
pub mod text;

pub use options::{OptionsGsm, OptionsShow, OptionsView, StateIndex};
pub use shared::SharedStateControl;
pub use state_control::{CopyError, CurrentIndexText, StateControl, MAX_CAPACITY, MIN_CAPACITY};
