//! Command-line parsing.

use clap::Parser;
use stackwright::account::Account;
use stackwright::cli::{Cli, Commands, EventFormat};
use std::path::PathBuf;

#[test]
fn apply_collects_repeated_params_in_order() {
    let cli = Cli::try_parse_from([
        "stackwright",
        "apply",
        "--stack-name",
        "network",
        "--template",
        "templates/vpc.json",
        "--param",
        "ClassB=10",
        "--param",
        "Env=staging",
        "--account",
        "staging",
        "--region",
        "eu-west-1",
    ])
    .unwrap();

    match cli.command {
        Commands::Apply {
            stack_name,
            template,
            params,
            target,
        } => {
            assert_eq!(stack_name, "network");
            assert_eq!(template, PathBuf::from("templates/vpc.json"));
            assert_eq!(params, vec!["ClassB=10", "Env=staging"]);
            assert_eq!(target.account, Some(Account::Staging));
            assert_eq!(target.region.as_deref(), Some("eu-west-1"));
            assert_eq!(target.profile, None);
        }
        other => panic!("unexpected command: {other:?}"),
    }
}

#[test]
fn delete_takes_positional_name_and_force() {
    let cli = Cli::try_parse_from(["stackwright", "delete", "legacy", "--force"]).unwrap();
    match cli.command {
        Commands::Delete {
            stack_name, force, ..
        } => {
            assert_eq!(stack_name, "legacy");
            assert!(force);
        }
        other => panic!("unexpected command: {other:?}"),
    }
}

#[test]
fn assume_role_accepts_numeric_account_id() {
    let id = Account::Housekeeping.account_id();
    let cli = Cli::try_parse_from(["stackwright", "assume-role", "--account", id]).unwrap();
    match cli.command {
        Commands::AssumeRole {
            account,
            session_name,
            ..
        } => {
            assert_eq!(account, Account::Housekeeping);
            assert_eq!(session_name, None);
        }
        other => panic!("unexpected command: {other:?}"),
    }
}

#[test]
fn unknown_account_is_rejected() {
    assert!(Cli::try_parse_from(["stackwright", "assume-role", "--account", "marketing"]).is_err());
}

#[test]
fn apply_requires_stack_name_and_template() {
    assert!(Cli::try_parse_from(["stackwright", "apply", "--template", "t.json"]).is_err());
    assert!(Cli::try_parse_from(["stackwright", "apply", "--stack-name", "s"]).is_err());
}

#[test]
fn global_flags_work_after_subcommand() {
    let cli =
        Cli::try_parse_from(["stackwright", "accounts", "--events", "json", "--verbose"]).unwrap();
    assert_eq!(cli.events, EventFormat::Json);
    assert!(cli.verbose);
}

#[test]
fn verbose_and_quiet_conflict() {
    assert!(Cli::try_parse_from(["stackwright", "--verbose", "--quiet", "accounts"]).is_err());
}
