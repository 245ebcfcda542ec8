//! AWS SDK-backed transports for the provisioning engine (CloudFormation) and
//! the identity service (STS).

use crate::credentials::CredentialSource;
use aws_config::{BehaviorVersion, Region, SdkConfig};
use std::time::SystemTime;
use tracing::info;

pub mod cloudformation;
pub mod sts;

pub use cloudformation::{CloudFormationConnector, CloudFormationEngine};
pub use sts::{AmbientIdentityFactory, StsTransport};

/// Endpoint selection resolved at the process boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEndpoint {
    Production,
    /// Local emulator or other override URL.
    Override(String),
}

impl EngineEndpoint {
    pub fn url(&self) -> Option<&str> {
        match self {
            EngineEndpoint::Production => None,
            EngineEndpoint::Override(url) => Some(url),
        }
    }
}

/// Load SDK configuration for one region, credential source and endpoint.
pub async fn load_sdk_config(
    region: &str,
    source: &CredentialSource,
    endpoint: &EngineEndpoint,
) -> SdkConfig {
    let mut loader =
        aws_config::defaults(BehaviorVersion::latest()).region(Region::new(region.to_string()));

    match source {
        CredentialSource::Ambient { profile: Some(profile) } => {
            loader = loader.profile_name(profile);
        }
        CredentialSource::Ambient { profile: None } => {}
        CredentialSource::Federated(credentials) => {
            loader = loader.credentials_provider(aws_sdk_sts::config::Credentials::new(
                credentials.access_key_id.clone(),
                credentials.secret_access_key.clone(),
                Some(credentials.session_token.clone()),
                Some(SystemTime::from(credentials.expiration)),
                "stackwright-federation",
            ));
        }
    }

    match endpoint {
        EngineEndpoint::Override(url) => {
            info!(endpoint = %url, "Using endpoint override");
            loader = loader.endpoint_url(url);
        }
        EngineEndpoint::Production => info!("Using production AWS endpoints"),
    }

    loader.load().await
}

/// Convert an SDK timestamp into chrono.
pub(crate) fn to_chrono(
    ts: &aws_sdk_sts::primitives::DateTime,
) -> Option<chrono::DateTime<chrono::Utc>> {
    chrono::DateTime::from_timestamp(ts.secs(), ts.subsec_nanos())
}
