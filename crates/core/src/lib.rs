pub mod config;
pub mod contracts;
pub mod executor;
pub mod metrics;
pub mod orchestrator;
pub mod telemetry;
pub mod testing;
pub mod ticket;

pub use config::{
    load_config, load_config_from_str, validate_config, Config, ConfigError, ContractsConfig,
    ExecutorConfig, ServerConfig, TelemetryConfig,
};
pub use contracts::{load_actuator_limits, ContractError, ContractRegistry, GoldenHashes};
pub use executor::{CommandExecutor, ExecutionError, Params, SafetyExecutor, SafetyLimits};
pub use orchestrator::{
    CreateTicketRequest, ExecuteResponse, OrchestratorError, StatusCounts, TicketOrchestrator,
    TicketPage,
};
pub use telemetry::{EventRecord, MetricRecord, TelemetrySink, TelemetrySnapshot};
pub use ticket::{
    InMemoryTicketStore, Ticket, TicketError, TicketFilter, TicketPriority, TicketStatus,
    TicketStore,
};
