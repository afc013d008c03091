pub mod api;
pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod service;

pub use api::{router, AppState};
pub use config::{AppConfig, StorageBackend};
pub use db::{create_pool, run_migrations, BillRepository, MemoryBillRepository, PgBillRepository};
pub use error::{AppError, AppResult};
pub use service::{BillService, StatisticsService};
