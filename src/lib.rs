// Bankforge - Synthetic Banking Dataset Forge
// Generates a relationally-consistent banking dataset with controlled defect
// injection, then replays a weighted random change workload against the
// persisted copy.

pub mod config;
pub mod corruption;
pub mod export;
pub mod generators;
pub mod model;
pub mod orchestrator;
pub mod simulator;
pub mod store;
pub mod vocab;

// Re-export commonly used types
pub use config::{
    AppConfig, BadDataRates, DefectClassSwitches, FanOut, GeneratorConfig, OperationWeights,
    SimulatorConfig,
};
pub use corruption::{
    Corruptible, DefectClass, DefectInjector, DefectLedger, DefectReport, TableDefectReport,
};
pub use model::{
    Account, AuditLog, Branch, Card, Customer, CustomerDetail, Dataset, Employee, ExchangeRate,
    FraudAlert, InvestmentAccount, Loan, LoanPayment, Merchant, TableKind, Transaction, UserLogin,
};
pub use orchestrator::{generate_dataset, GenerationOutput, GenerationSummary, TableSummary};
pub use simulator::{MutationSimulator, OperationKind, OperationRecord, SimulationReport};
pub use store::{SqliteStore, StoreGateway};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
