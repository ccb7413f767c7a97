//! Format converters
//!
//! This module contains converters from events to synthesis input formats.

pub mod isis;
