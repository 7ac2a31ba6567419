//! SoulCanvas: BaZi "Four Pillars" charts rendered as soul-landscape portraits.
//!
//! A birth moment is converted to four stem-branch pillars, the five elements
//! are tallied, and deterministic prompts drive a remote text call (poetic
//! interpretation) followed by a remote image call (the portrait).
//!
//! See `DESIGN.md` for the architecture notes.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod config;
pub mod credentials;
pub mod logging;
pub mod types;

pub mod calendar;
pub mod elements;
pub mod pillar;
pub mod symbols;

pub mod analysis;
pub mod pipeline;
pub mod prompt;
pub mod providers;
