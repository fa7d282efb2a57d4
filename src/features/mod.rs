//! Feature implementations for studyfocus.
//!
//! - Focus timer engine, session stores, and statistics
//! - Phase-completion notifications

pub mod focus;
