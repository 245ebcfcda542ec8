//! Stack status enumeration and its classification into terminal and transient sets.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Stack status as reported by the provisioning engine.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", from = "String")]
pub enum StackStatus {
    CreateInProgress,
    CreateFailed,
    CreateComplete,
    RollbackInProgress,
    RollbackFailed,
    RollbackComplete,
    DeleteInProgress,
    DeleteFailed,
    DeleteComplete,
    UpdateInProgress,
    UpdateCompleteCleanupInProgress,
    UpdateComplete,
    UpdateFailed,
    UpdateRollbackInProgress,
    UpdateRollbackFailed,
    UpdateRollbackCompleteCleanupInProgress,
    UpdateRollbackComplete,
    ReviewInProgress,
    ImportInProgress,
    ImportComplete,
    ImportRollbackInProgress,
    ImportRollbackFailed,
    ImportRollbackComplete,
    /// A status this build does not know about. Always transient.
    Unknown(String),
}

/// Disjoint classes used by the lifecycle state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusClass {
    SuccessTerminal,
    FailureTerminal,
    Transient,
}

const KNOWN: &[(&str, StackStatus)] = &[
    ("CREATE_IN_PROGRESS", StackStatus::CreateInProgress),
    ("CREATE_FAILED", StackStatus::CreateFailed),
    ("CREATE_COMPLETE", StackStatus::CreateComplete),
    ("ROLLBACK_IN_PROGRESS", StackStatus::RollbackInProgress),
    ("ROLLBACK_FAILED", StackStatus::RollbackFailed),
    ("ROLLBACK_COMPLETE", StackStatus::RollbackComplete),
    ("DELETE_IN_PROGRESS", StackStatus::DeleteInProgress),
    ("DELETE_FAILED", StackStatus::DeleteFailed),
    ("DELETE_COMPLETE", StackStatus::DeleteComplete),
    ("UPDATE_IN_PROGRESS", StackStatus::UpdateInProgress),
    (
        "UPDATE_COMPLETE_CLEANUP_IN_PROGRESS",
        StackStatus::UpdateCompleteCleanupInProgress,
    ),
    ("UPDATE_COMPLETE", StackStatus::UpdateComplete),
    ("UPDATE_FAILED", StackStatus::UpdateFailed),
    ("UPDATE_ROLLBACK_IN_PROGRESS", StackStatus::UpdateRollbackInProgress),
    ("UPDATE_ROLLBACK_FAILED", StackStatus::UpdateRollbackFailed),
    (
        "UPDATE_ROLLBACK_COMPLETE_CLEANUP_IN_PROGRESS",
        StackStatus::UpdateRollbackCompleteCleanupInProgress,
    ),
    ("UPDATE_ROLLBACK_COMPLETE", StackStatus::UpdateRollbackComplete),
    ("REVIEW_IN_PROGRESS", StackStatus::ReviewInProgress),
    ("IMPORT_IN_PROGRESS", StackStatus::ImportInProgress),
    ("IMPORT_COMPLETE", StackStatus::ImportComplete),
    ("IMPORT_ROLLBACK_IN_PROGRESS", StackStatus::ImportRollbackInProgress),
    ("IMPORT_ROLLBACK_FAILED", StackStatus::ImportRollbackFailed),
    ("IMPORT_ROLLBACK_COMPLETE", StackStatus::ImportRollbackComplete),
];

impl StackStatus {
    /// Parse the engine's wire value. Unrecognised values map to `Unknown`.
    pub fn parse(raw: &str) -> Self {
        KNOWN
            .iter()
            .find(|(name, _)| *name == raw)
            .map(|(_, status)| status.clone())
            .unwrap_or_else(|| StackStatus::Unknown(raw.to_string()))
    }

    pub fn as_str(&self) -> &str {
        if let StackStatus::Unknown(raw) = self {
            return raw;
        }
        KNOWN
            .iter()
            .find(|(_, status)| status == self)
            .map(|(name, _)| *name)
            .unwrap_or("UNKNOWN")
    }

    pub fn class(&self) -> StatusClass {
        use StackStatus::*;
        match self {
            CreateComplete | UpdateComplete | ImportComplete => StatusClass::SuccessTerminal,
            CreateFailed
            | RollbackComplete
            | RollbackFailed
            | UpdateFailed
            | UpdateRollbackComplete
            | UpdateRollbackFailed
            | DeleteFailed
            | DeleteComplete
            | ImportRollbackComplete
            | ImportRollbackFailed => StatusClass::FailureTerminal,
            _ => StatusClass::Transient,
        }
    }

    pub fn is_success_terminal(&self) -> bool {
        self.class() == StatusClass::SuccessTerminal
    }

    pub fn is_failure_terminal(&self) -> bool {
        self.class() == StatusClass::FailureTerminal
    }

    pub fn is_transient(&self) -> bool {
        self.class() == StatusClass::Transient
    }

    /// The engine refuses to update a stack in these states; it has to be
    /// deleted and created again.
    pub fn requires_recreate(&self) -> bool {
        use StackStatus::*;
        matches!(
            self,
            RollbackComplete
                | RollbackFailed
                | CreateFailed
                | DeleteComplete
                | ImportRollbackComplete
                | ImportRollbackFailed
        )
    }

    /// All known statuses, in engine declaration order.
    pub fn known() -> impl Iterator<Item = StackStatus> {
        KNOWN.iter().map(|(_, status)| status.clone())
    }
}

impl fmt::Display for StackStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<String> for StackStatus {
    fn from(raw: String) -> Self {
        StackStatus::parse(&raw)
    }
}

impl From<StackStatus> for String {
    fn from(status: StackStatus) -> Self {
        status.as_str().to_string()
    }
}

/// Whether a per-resource event status denotes a failure worth reporting.
pub fn is_failed_resource_status(raw: &str) -> bool {
    raw.ends_with("_FAILED")
}
