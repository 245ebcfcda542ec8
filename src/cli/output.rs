//! CLI output: error mapping and result formatting for the terminal.

use crate::account::Account;
use crate::credentials::TemporaryCredentials;
use crate::error::{AppError, StackError};
use crate::stack::{ResourceFailure, StackReport, UpsertAction};
use comfy_table::presets::UTF8_FULL;
use comfy_table::Table;
use owo_colors::OwoColorize;

/// Map an application error to the text printed on stderr.
///
/// Rejected stack operations carry their resource-level diagnostics as a table.
pub fn map_error(e: &AppError) -> String {
    let mut out = format!("{} {}", "error:".red().bold(), e);
    match e {
        AppError::Stack(err @ StackError::StackOperationFailed { .. }) => {
            let diagnostics = err.diagnostics();
            if diagnostics.is_empty() {
                out.push_str("\nNo resource-level failure reasons were reported.");
            } else {
                out.push('\n');
                out.push_str(&format_diagnostics(diagnostics));
            }
        }
        AppError::Stack(StackError::Timeout(_)) => {
            out.push_str("\nThe operation may still finish remotely; re-run to pick it up.");
        }
        _ => {}
    }
    out
}

pub fn format_diagnostics(diagnostics: &[ResourceFailure]) -> String {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["Resource", "Reason"]);
    for failure in diagnostics {
        table.add_row(vec![failure.logical_resource_id.as_str(), failure.reason.as_str()]);
    }
    table.to_string()
}

pub fn format_stack_report(report: &StackReport) -> String {
    let verb = match report.action {
        UpsertAction::Created => "created",
        UpsertAction::Updated => "updated",
        UpsertAction::Unchanged => "unchanged",
        UpsertAction::Recreated => "recreated",
    };
    let mut out = format!(
        "Stack {} {} ({})",
        report.stack_name.bold(),
        verb.green(),
        report.status
    );
    if !report.outputs.is_empty() {
        let mut table = Table::new();
        table.load_preset(UTF8_FULL);
        table.set_header(vec!["Output", "Value", "Description"]);
        for output in &report.outputs {
            table.add_row(vec![
                output.key.as_str(),
                output.value.as_str(),
                output.description.as_deref().unwrap_or(""),
            ]);
        }
        out.push('\n');
        out.push_str(&table.to_string());
    }
    out
}

pub fn format_deleted(stack_name: &str) -> String {
    format!("Stack {} {}", stack_name.bold(), "deleted".green())
}

/// Shell `export` lines for the minted credentials.
pub fn format_export_lines(account: Account, credentials: &TemporaryCredentials) -> String {
    [
        format!("# {} credentials, expire {}", account, credentials.expiration.to_rfc3339()),
        format!("export AWS_ACCESS_KEY_ID={}", credentials.access_key_id),
        format!("export AWS_SECRET_ACCESS_KEY={}", credentials.secret_access_key),
        format!("export AWS_SESSION_TOKEN={}", credentials.session_token),
    ]
    .join("\n")
}

pub fn format_accounts_table() -> String {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["Name", "Account", "Id", "Email", "Role"]);
    for account in Account::ALL {
        table.add_row(vec![
            account.logical_id().to_string(),
            account.display_name().to_string(),
            account.account_id().to_string(),
            account.email().to_string(),
            account.role_arn(),
        ]);
    }
    table.to_string()
}
