//! Grouped watering-reminder job and its daily scheduler.
//!
//! The job scans every plant record, groups the ones not watered today
//! (reference timezone) by owner, sends one push notification per owner
//! across all of their registered device tokens, and prunes tokens the
//! delivery provider reports as permanently invalid.

pub mod job;
pub mod scheduler;

pub use job::{ReminderError, ReminderJob};
