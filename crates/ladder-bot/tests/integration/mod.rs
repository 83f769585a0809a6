//! Integration tests for ladder-bot.
//!
//! These tests drive the runner against the paper venue:
//! - Full ladder lifecycle (arm, fill, OCO, trailing, stop-out, re-arm)
//! - Ownership isolation between controllers sharing a venue
//! - Recovery from rejected ledger commands

pub mod common;
