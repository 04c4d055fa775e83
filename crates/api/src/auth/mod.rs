//! Caller authentication: bearer-token claims validation.

pub mod jwt;
