//! Account directory: the closed set of accounts the CLI can federate into.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Role every member account exposes to the management identity.
pub const CLI_ROLE_NAME: &str = "StackwrightCLIRole";

/// Role ARN for an account id. The only place role identifiers are derived.
pub fn role_arn_for(account_id: &str) -> String {
    format!("arn:aws:iam::{}:role/{}", account_id, CLI_ROLE_NAME)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Account {
    Management,
    Production,
    Staging,
    Housekeeping,
    Sandbox,
}

impl Account {
    pub const ALL: [Account; 5] = [
        Account::Management,
        Account::Production,
        Account::Staging,
        Account::Housekeeping,
        Account::Sandbox,
    ];

    pub fn logical_id(self) -> &'static str {
        match self {
            Account::Management => "management",
            Account::Production => "production",
            Account::Staging => "staging",
            Account::Housekeeping => "housekeeping",
            Account::Sandbox => "sandbox",
        }
    }

    /// Twelve-digit account id.
    pub fn account_id(self) -> &'static str {
        match self {
            Account::Management => "514302877461",
            Account::Production => "683920145530",
            Account::Staging => "297461830012",
            Account::Housekeeping => "450118692374",
            Account::Sandbox => "822037564198",
        }
    }

    pub fn role_arn(self) -> String {
        role_arn_for(self.account_id())
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Account::Management => "Management",
            Account::Production => "Production",
            Account::Staging => "Staging",
            Account::Housekeeping => "Housekeeping",
            Account::Sandbox => "Sandbox",
        }
    }

    pub fn email(self) -> &'static str {
        match self {
            Account::Management => "aws-management@stackwright.dev",
            Account::Production => "aws-production@stackwright.dev",
            Account::Staging => "aws-staging@stackwright.dev",
            Account::Housekeeping => "aws-housekeeping@stackwright.dev",
            Account::Sandbox => "aws-sandbox@stackwright.dev",
        }
    }
}

impl fmt::Display for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.display_name(), self.account_id())
    }
}

/// Accepts a logical id (case-insensitive) or a numeric account id.
impl FromStr for Account {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim();
        Account::ALL
            .into_iter()
            .find(|a| a.logical_id().eq_ignore_ascii_case(needle) || a.account_id() == needle)
            .ok_or_else(|| {
                let known: Vec<&str> = Account::ALL.iter().map(|a| a.logical_id()).collect();
                format!("unknown account '{}' (expected one of: {})", s, known.join(", "))
            })
    }
}
