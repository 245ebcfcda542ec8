//! Federation through a stand-in identity service.

use async_trait::async_trait;
use chrono::{Duration, Utc};
use parking_lot::Mutex;
use stackwright::account::Account;
use stackwright::credentials::TemporaryCredentials;
use stackwright::error::{FederationError, IdentityError};
use stackwright::federation::{
    AssumeRoleRequest, AssumeRoleResponse, FederationService, IdentityTransport,
    IdentityTransportFactory, EXTERNAL_ID,
};
use std::sync::Arc;

#[derive(Default)]
struct Ledger {
    opened: Vec<String>,
    released: usize,
    requests: Vec<AssumeRoleRequest>,
}

/// Grants credentials only for the accounts listed in `trusted`.
struct Directory {
    trusted: Vec<Account>,
    ledger: Arc<Mutex<Ledger>>,
}

struct Connection {
    trusted: Vec<String>,
    ledger: Arc<Mutex<Ledger>>,
}

#[async_trait]
impl IdentityTransport for Connection {
    async fn assume_role(
        &self,
        request: &AssumeRoleRequest,
    ) -> Result<AssumeRoleResponse, IdentityError> {
        self.ledger.lock().requests.push(request.clone());
        if !self.trusted.contains(&request.role_arn) {
            return Err(IdentityError {
                code: Some("AccessDenied".to_string()),
                message: format!("not authorized to assume {}", request.role_arn),
            });
        }
        Ok(AssumeRoleResponse {
            credentials: Some(TemporaryCredentials {
                access_key_id: "ASIAINTEGRATION".to_string(),
                secret_access_key: "secret".to_string(),
                session_token: "token".to_string(),
                expiration: Utc::now() + Duration::hours(1),
            }),
        })
    }

    async fn shutdown(&self) -> Result<(), IdentityError> {
        self.ledger.lock().released += 1;
        Ok(())
    }
}

#[async_trait]
impl IdentityTransportFactory for Directory {
    type Transport = Connection;

    async fn connect(&self, region: &str) -> Result<Connection, IdentityError> {
        self.ledger.lock().opened.push(region.to_string());
        Ok(Connection {
            trusted: self.trusted.iter().map(|a| a.role_arn()).collect(),
            ledger: self.ledger.clone(),
        })
    }
}

fn service(trusted: Vec<Account>) -> (FederationService<Directory>, Arc<Mutex<Ledger>>) {
    let ledger = Arc::new(Mutex::new(Ledger::default()));
    let service = FederationService::new(Directory {
        trusted,
        ledger: ledger.clone(),
    });
    (service, ledger)
}

#[tokio::test]
async fn every_account_is_reachable_through_its_cli_role() {
    let (service, ledger) = service(Account::ALL.to_vec());

    for account in Account::ALL {
        let creds = service
            .assume_role(account, "us-west-2", None)
            .await
            .unwrap();
        assert!(!creds.is_expired(Utc::now()));
    }

    let ledger = ledger.lock();
    assert_eq!(ledger.opened.len(), Account::ALL.len());
    assert_eq!(ledger.released, Account::ALL.len());
    for (request, account) in ledger.requests.iter().zip(Account::ALL) {
        assert_eq!(
            request.role_arn,
            format!("arn:aws:iam::{}:role/StackwrightCLIRole", account.account_id())
        );
        assert_eq!(request.external_id, EXTERNAL_ID);
    }
}

#[tokio::test]
async fn untrusted_account_fails_and_still_releases() {
    let (service, ledger) = service(vec![Account::Sandbox]);

    let err = service
        .assume_role(Account::Production, "eu-west-1", Some("audit"))
        .await
        .unwrap_err();

    match err {
        FederationError::AssumeRoleFailed(cause) => {
            assert_eq!(cause.code.as_deref(), Some("AccessDenied"))
        }
        other => panic!("unexpected error: {other:?}"),
    }
    let ledger = ledger.lock();
    assert_eq!(ledger.opened, vec!["eu-west-1".to_string()]);
    assert_eq!(ledger.released, 1);
    assert_eq!(ledger.requests[0].session_name, "audit");
}
