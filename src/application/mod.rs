//! Application layer orchestrating notification verification.
//!
//! `NotificationProcessor` is the entry point: it parses a notification,
//! confirms it with the gateway, reconciles it against the stored
//! transaction and applies the resulting state transition.

pub mod locks;
pub mod processor;
pub mod state_machine;
pub mod validator;
