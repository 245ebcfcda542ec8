//! Cross-account credential federation.
//!
//! Exchanges the caller's ambient identity for temporary credentials in a
//! directory account by assuming that account's CLI role. Each call opens a
//! throwaway identity transport and releases it on every exit path before
//! returning.

use crate::account::Account;
use crate::credentials::TemporaryCredentials;
use crate::error::{FederationError, IdentityError};
use async_trait::async_trait;
use tracing::{info, instrument, warn};
use uuid::Uuid;

/// Shared secret the member accounts' trust policies require.
pub const EXTERNAL_ID: &str = "stackwright-cli";

/// Prefix of generated role session names.
pub const SESSION_NAME_PREFIX: &str = "stackwright-cli";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssumeRoleRequest {
    pub role_arn: String,
    pub session_name: String,
    pub external_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssumeRoleResponse {
    /// Absent when the service answered without a credentials block.
    pub credentials: Option<TemporaryCredentials>,
}

/// An identity service connection bound to ambient credentials.
#[async_trait]
pub trait IdentityTransport: Send + Sync {
    async fn assume_role(
        &self,
        request: &AssumeRoleRequest,
    ) -> Result<AssumeRoleResponse, IdentityError>;

    async fn shutdown(&self) -> Result<(), IdentityError>;
}

/// Opens identity transports for a region.
#[async_trait]
pub trait IdentityTransportFactory: Send + Sync {
    type Transport: IdentityTransport;

    async fn connect(&self, region: &str) -> Result<Self::Transport, IdentityError>;
}

/// `stackwright-cli-` followed by eight random hex characters.
pub fn generate_session_name() -> String {
    let suffix = Uuid::new_v4().simple().to_string();
    format!("{}-{}", SESSION_NAME_PREFIX, &suffix[..8])
}

pub struct FederationService<F> {
    factory: F,
}

impl<F: IdentityTransportFactory> FederationService<F> {
    pub fn new(factory: F) -> Self {
        Self { factory }
    }

    /// Assume the CLI role in `target`. No retries, no caching.
    #[instrument(skip(self, session_name), fields(account = target.logical_id()))]
    pub async fn assume_role(
        &self,
        target: Account,
        region: &str,
        session_name: Option<&str>,
    ) -> Result<TemporaryCredentials, FederationError> {
        let request = AssumeRoleRequest {
            role_arn: target.role_arn(),
            session_name: session_name
                .map(str::to_string)
                .unwrap_or_else(generate_session_name),
            external_id: EXTERNAL_ID.to_string(),
        };

        info!(
            account = %target,
            role_arn = %request.role_arn,
            session = %request.session_name,
            "Assuming role"
        );

        let transport = self
            .factory
            .connect(region)
            .await
            .map_err(FederationError::AssumeRoleFailed)?;

        let result = request_credentials(&transport, &request).await;

        if let Err(e) = transport.shutdown().await {
            warn!("Failed to release identity transport: {}", e);
        }

        match &result {
            Ok(credentials) => info!(
                account = %target,
                expires_at = %credentials.expiration.to_rfc3339(),
                "Assumed role"
            ),
            Err(e) => warn!(account = %target, error = %e, "Failed to assume role"),
        }
        result
    }
}

async fn request_credentials<T: IdentityTransport>(
    transport: &T,
    request: &AssumeRoleRequest,
) -> Result<TemporaryCredentials, FederationError> {
    let response = transport
        .assume_role(request)
        .await
        .map_err(FederationError::AssumeRoleFailed)?;
    response.credentials.ok_or(FederationError::MissingCredentials)
}
