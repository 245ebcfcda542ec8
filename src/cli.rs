//! CLI domain: parse, route and output only.
//! No stack orchestration here; the route table dispatches to domain services.

mod output;
mod parse;
mod route;

pub use output::{
    format_accounts_table, format_deleted, format_diagnostics, format_export_lines,
    format_stack_report, map_error,
};
pub use parse::{Cli, Commands, EventFormat, TargetArgs};
pub use route::RunContext;
