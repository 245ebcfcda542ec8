//! CLI route: run context and single route table. Dispatches to the stack
//! session, the federation service and output formatting.

use crate::account::Account;
use crate::aws::{AmbientIdentityFactory, CloudFormationConnector};
use crate::cli::output::{
    format_accounts_table, format_deleted, format_export_lines, format_stack_report,
};
use crate::cli::parse::{Commands, EventFormat, TargetArgs};
use crate::config::{ConfigLoader, StackwrightConfig};
use crate::credentials::CredentialSource;
use crate::error::{AppError, StackError};
use crate::federation::FederationService;
use crate::stack::{
    EngineFactory, JsonLinesObserver, LifecycleObserver, ProvisioningEngine, StackDescriptor,
    StackSession, TracingObserver,
};
use crate::template::{parse_parameters, FileTemplate};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, warn};

/// Runtime context for CLI execution: resolved configuration, output mode and
/// the factory that opens engine transports.
pub struct RunContext<E = CloudFormationConnector> {
    config: StackwrightConfig,
    events: EventFormat,
    engines: E,
}

impl RunContext {
    /// Load configuration for `workspace_root`, or from `config_path` when given.
    pub fn new(
        workspace_root: PathBuf,
        config_path: Option<PathBuf>,
        events: EventFormat,
    ) -> Result<Self, AppError> {
        let config = ConfigLoader::load(&workspace_root, config_path.as_deref())?;
        Ok(Self::from_config(config, events))
    }

    pub fn from_config(config: StackwrightConfig, events: EventFormat) -> Self {
        let engines = CloudFormationConnector::new(config.aws.endpoint());
        Self::with_engines(config, events, engines)
    }
}

impl<E: EngineFactory> RunContext<E> {
    pub fn with_engines(config: StackwrightConfig, events: EventFormat, engines: E) -> Self {
        Self {
            config,
            events,
            engines,
        }
    }

    pub fn config(&self) -> &StackwrightConfig {
        &self.config
    }

    pub async fn execute(&self, command: &Commands) -> Result<String, AppError> {
        match command {
            Commands::Apply {
                stack_name,
                template,
                params,
                target,
            } => self.handle_apply(stack_name, template, params, target).await,
            Commands::Delete {
                stack_name,
                target,
                force,
            } => self.handle_delete(stack_name, target, *force).await,
            Commands::AssumeRole {
                account,
                region,
                session_name,
            } => {
                self.handle_assume_role(*account, region.as_deref(), session_name.as_deref())
                    .await
            }
            Commands::Accounts => Ok(format_accounts_table()),
        }
    }

    async fn handle_apply(
        &self,
        stack_name: &str,
        template: &Path,
        params: &[String],
        target: &TargetArgs,
    ) -> Result<String, AppError> {
        let parameters = parse_parameters(params)?;
        let template = FileTemplate::load(stack_name, template, parameters)?;
        let descriptor = StackDescriptor::from_source(&template)?;

        let mut session = self.open_session(target).await?;
        let result = session.upsert_stack(&descriptor).await;
        close_session(session).await;

        let report = result?;
        info!(stack = %report.stack_name, action = ?report.action, "Apply finished");
        Ok(format_stack_report(&report))
    }

    async fn handle_delete(
        &self,
        stack_name: &str,
        target: &TargetArgs,
        force: bool,
    ) -> Result<String, AppError> {
        if !force {
            use dialoguer::Confirm;
            let confirmed = Confirm::new()
                .with_prompt(format!("Delete stack '{}'?", stack_name))
                .default(false)
                .interact()
                .map_err(|e| {
                    AppError::InvalidArgument(format!("Failed to get user input: {}", e))
                })?;
            if !confirmed {
                return Err(AppError::Aborted(format!(
                    "deletion of stack '{}' cancelled",
                    stack_name
                )));
            }
        }

        let mut session = self.open_session(target).await?;
        let result = session.delete_stack(stack_name).await;
        close_session(session).await;

        result?;
        Ok(format_deleted(stack_name))
    }

    async fn handle_assume_role(
        &self,
        account: Account,
        region: Option<&str>,
        session_name: Option<&str>,
    ) -> Result<String, AppError> {
        let region = region.unwrap_or(&self.config.aws.region);
        let credentials = self
            .federation()
            .assume_role(account, region, session_name)
            .await?;
        Ok(format_export_lines(account, &credentials))
    }

    fn federation(&self) -> FederationService<AmbientIdentityFactory> {
        FederationService::new(AmbientIdentityFactory::new(
            self.config.aws.profile.clone(),
            self.config.aws.endpoint(),
        ))
    }

    /// Resolve the credential source: an explicit account federates into it,
    /// otherwise the (flag or configured) profile is used as-is.
    pub(crate) async fn credential_source(
        &self,
        target: &TargetArgs,
        region: &str,
    ) -> Result<CredentialSource, AppError> {
        match target.account {
            Some(account) => {
                if let Some(profile) = &target.profile {
                    warn!(
                        profile = %profile,
                        account = account.logical_id(),
                        "--profile is ignored when --account is given"
                    );
                }
                let credentials = self.federation().assume_role(account, region, None).await?;
                Ok(CredentialSource::Federated(credentials))
            }
            None => Ok(CredentialSource::ambient(
                target
                    .profile
                    .clone()
                    .or_else(|| self.config.aws.profile.clone()),
            )),
        }
    }

    async fn open_session(
        &self,
        target: &TargetArgs,
    ) -> Result<StackSession<E::Engine>, AppError> {
        let region = target
            .region
            .clone()
            .unwrap_or_else(|| self.config.aws.region.clone());
        let source = self.credential_source(target, &region).await?;
        let engine = self
            .engines
            .connect(&region, &source)
            .await
            .map_err(StackError::from)?;
        Ok(StackSession::new(engine, region).with_observer(self.observer()))
    }

    fn observer(&self) -> Arc<dyn LifecycleObserver> {
        match self.events {
            EventFormat::Text => Arc::new(TracingObserver),
            EventFormat::Json => Arc::new(JsonLinesObserver::stderr()),
        }
    }
}

/// Release the engine transport; a failed release is logged, never surfaced.
async fn close_session<E: ProvisioningEngine>(session: StackSession<E>) {
    if let Err(e) = session.shutdown().await {
        warn!("Failed to release engine transport: {}", e);
    }
}
