//! UI module - contains UI rendering components
//!
//! Widgets here know nothing about `App`; they take the state they draw.

pub mod components;
pub mod signature_pad;
