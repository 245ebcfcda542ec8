//! Integration tests for Stackwright

mod cli_binary;
mod cli_parse;
mod config_integration;
mod federation;
mod stack_lifecycle;
mod support;
