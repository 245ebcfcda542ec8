//! Stackwright: declarative stack lifecycle management.
//!
//! Drives infrastructure stacks on a provisioning engine to a terminal state
//! (create, update, recover-and-recreate, delete) and federates credentials
//! into directory accounts by assuming their CLI role.

pub mod account;
pub mod aws;
pub mod cli;
pub mod config;
pub mod credentials;
pub mod error;
pub mod federation;
pub mod logging;
pub mod stack;
pub mod template;
