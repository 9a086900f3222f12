//! Application context - dependency injection container

use std::sync::Arc;

use daybrief_core::{
    escalate_best_effort, BatchDriver, DirectoryGateway, EscalationNotice, Escalator,
    NotificationOrchestrator, ScheduleAnalyzer, TokenProvider,
};
use daybrief_domain::{AdminConfig, ChannelKind, DigestConfig, DigestError, Result, RunReport};
use daybrief_infra::{
    build_channels, build_escalator, ClientCredentialsAuthenticator, GraphClient, GraphDirectory,
};
use tracing::{error, info};

/// Everything one run needs, built from a validated configuration.
pub struct AppContext {
    pub config: Arc<DigestConfig>,
    pub escalator: Arc<dyn Escalator>,
    channels: Vec<ChannelKind>,
    driver: BatchDriver,
}

impl AppContext {
    /// Wire the Graph adapters and the SMTP escalator (or a disabled one when
    /// no administrator is configured).
    pub fn new(config: DigestConfig) -> Result<Self> {
        let escalator = build_escalator(&config.admin)?;
        Self::with_escalator(config, escalator)
    }

    /// Same as [`new`](Self::new) with a caller-supplied escalator.
    pub fn with_escalator(config: DigestConfig, escalator: Arc<dyn Escalator>) -> Result<Self> {
        config.validate()?;
        let config = Arc::new(config);

        let graph = GraphClient::from_config(&config)?;
        let tokens: Arc<dyn TokenProvider> =
            Arc::new(ClientCredentialsAuthenticator::from_config(&config)?);
        let gateway: Arc<dyn DirectoryGateway> = Arc::new(GraphDirectory::new(graph.clone()));
        let analyzer = ScheduleAnalyzer::from_config(&config.schedule)?;

        let orchestrator = NotificationOrchestrator::new(gateway.clone(), escalator.clone(), analyzer)
            .with_channels(build_channels(&config, &graph)?);
        let channels = orchestrator.channel_kinds();

        let driver = BatchDriver::new(tokens, gateway, escalator.clone(), Arc::new(orchestrator))
            .with_concurrency(config.delivery.max_concurrency);

        info!(
            graph = %config.endpoints.graph_base_url,
            channels = ?channels,
            timezone = %config.schedule.timezone,
            max_concurrency = config.delivery.max_concurrency,
            "Application context ready"
        );

        Ok(Self { config, escalator, channels, driver })
    }

    /// Delivery channels in the order they are attempted.
    pub fn channels(&self) -> &[ChannelKind] {
        &self.channels
    }

    pub async fn run(&self) -> RunReport {
        self.driver.run().await
    }
}

/// Tell the administrator the run could not start.
///
/// Returns whether the notice went out. When no escalation path can be built
/// from `admin` the failure is only logged.
pub async fn escalate_configuration_error(admin: &AdminConfig, err: &DigestError) -> bool {
    let escalator = match build_escalator(admin) {
        Ok(escalator) => escalator,
        Err(build_err) => {
            error!(error = %build_err, "Escalation path unavailable");
            return false;
        }
    };
    let notice = EscalationNotice::Configuration { detail: err.to_string() };
    escalate_best_effort(escalator.as_ref(), &notice).await
}
