//! STS implementation of the identity transport.

use crate::aws::{load_sdk_config, to_chrono, EngineEndpoint};
use crate::credentials::{CredentialSource, TemporaryCredentials};
use crate::error::IdentityError;
use crate::federation::{
    AssumeRoleRequest, AssumeRoleResponse, IdentityTransport, IdentityTransportFactory,
};
use async_trait::async_trait;
use aws_sdk_sts::error::{DisplayErrorContext, ProvideErrorMetadata};
use aws_sdk_sts::primitives::DateTime;
use aws_sdk_sts::types::Credentials;
use aws_sdk_sts::Client;
use tracing::debug;

pub struct StsTransport {
    client: Client,
}

impl StsTransport {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

fn convert(credentials: &Credentials) -> Result<TemporaryCredentials, IdentityError> {
    // Required members are plain references in some SDK releases and options in others.
    let access_key_id: Option<&str> = Option::from(credentials.access_key_id());
    let secret_access_key: Option<&str> = Option::from(credentials.secret_access_key());
    let session_token: Option<&str> = Option::from(credentials.session_token());
    let expiration: Option<&DateTime> = Option::from(credentials.expiration());

    let missing = |field: &str| IdentityError::new(format!("credentials block missing {}", field));
    Ok(TemporaryCredentials {
        access_key_id: access_key_id.ok_or_else(|| missing("AccessKeyId"))?.to_string(),
        secret_access_key: secret_access_key
            .ok_or_else(|| missing("SecretAccessKey"))?
            .to_string(),
        session_token: session_token.ok_or_else(|| missing("SessionToken"))?.to_string(),
        expiration: expiration
            .and_then(to_chrono)
            .ok_or_else(|| missing("Expiration"))?,
    })
}

#[async_trait]
impl IdentityTransport for StsTransport {
    async fn assume_role(
        &self,
        request: &AssumeRoleRequest,
    ) -> Result<AssumeRoleResponse, IdentityError> {
        let output = self
            .client
            .assume_role()
            .role_arn(&request.role_arn)
            .role_session_name(&request.session_name)
            .external_id(&request.external_id)
            .send()
            .await
            .map_err(|err| IdentityError {
                code: err.code().map(str::to_string),
                message: DisplayErrorContext(&err).to_string(),
            })?;

        let credentials = output.credentials().map(convert).transpose()?;
        Ok(AssumeRoleResponse { credentials })
    }

    /// The SDK client pools connections per client; dropping the transport
    /// closes them.
    async fn shutdown(&self) -> Result<(), IdentityError> {
        debug!("Releasing identity transport");
        Ok(())
    }
}

/// Opens STS transports bound to the caller's ambient credentials.
pub struct AmbientIdentityFactory {
    profile: Option<String>,
    endpoint: EngineEndpoint,
}

impl AmbientIdentityFactory {
    pub fn new(profile: Option<String>, endpoint: EngineEndpoint) -> Self {
        Self { profile, endpoint }
    }
}

#[async_trait]
impl IdentityTransportFactory for AmbientIdentityFactory {
    type Transport = StsTransport;

    async fn connect(&self, region: &str) -> Result<StsTransport, IdentityError> {
        let source = CredentialSource::ambient(self.profile.clone());
        let config = load_sdk_config(region, &source, &self.endpoint).await;
        Ok(StsTransport::new(Client::new(&config)))
    }
}
