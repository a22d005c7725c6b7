//! Presentation Layer
//!
//! Inbound gateway events and their handlers.

pub mod gateway;
