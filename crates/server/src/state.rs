use std::sync::Arc;

use tracing::info;

use ren_core::{
    load_actuator_limits, CommandExecutor, Config, ContractError, InMemoryTicketStore,
    SafetyExecutor, SafetyLimits, TelemetrySink, TicketOrchestrator, TicketStore,
};

/// Shared application state
pub struct AppState {
    config: Config,
    orchestrator: Arc<TicketOrchestrator>,
    limits: SafetyLimits,
    actuator_contract: Option<String>,
}

impl AppState {
    pub fn new(
        config: Config,
        orchestrator: Arc<TicketOrchestrator>,
        limits: SafetyLimits,
        actuator_contract: Option<String>,
    ) -> Self {
        Self {
            config,
            orchestrator,
            limits,
            actuator_contract,
        }
    }

    /// Wire the in-memory store, safety executor and telemetry sink from config.
    ///
    /// When a contracts directory is configured, the latest actuator contract
    /// supplies the executor limits; the `[executor]` section is the fallback.
    pub fn from_config(config: Config) -> Result<Self, ContractError> {
        let fallback = SafetyLimits::from(&config.executor);
        let (limits, actuator_contract) = match &config.contracts.dir {
            Some(dir) => {
                let (limits, contract) =
                    load_actuator_limits(dir, &config.contracts.actuator, fallback)?;
                (limits, Some(contract.file_name()))
            }
            None => {
                info!("No contracts directory configured, using [executor] limits");
                (fallback, None)
            }
        };

        let telemetry = Arc::new(
            TelemetrySink::new(config.telemetry.retention)
                .with_logging(config.telemetry.log_records),
        );
        let store: Arc<dyn TicketStore> = Arc::new(InMemoryTicketStore::new());
        let executor: Arc<dyn CommandExecutor> = Arc::new(SafetyExecutor::new(limits));
        let orchestrator = Arc::new(TicketOrchestrator::new(store, executor, telemetry));

        Ok(Self::new(config, orchestrator, limits, actuator_contract))
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn orchestrator(&self) -> &TicketOrchestrator {
        &self.orchestrator
    }

    pub fn telemetry(&self) -> &TelemetrySink {
        self.orchestrator.telemetry()
    }

    /// Limits the executor actually enforces.
    pub fn limits(&self) -> &SafetyLimits {
        &self.limits
    }

    pub fn actuator_contract(&self) -> Option<&str> {
        self.actuator_contract.as_deref()
    }
}
