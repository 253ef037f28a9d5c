//! Service layer
//!
//! Business logic between the command boundary and the store/HTTP clients.

pub mod forecast_service;
pub mod geocode_service;
pub mod ingest_service;
pub mod maintenance_service;
pub mod report_service;

pub use forecast_service::ForecastService;
pub use geocode_service::{GeocodeClient, GeocodeOutcome};
pub use ingest_service::{IngestClient, IngestService};
pub use maintenance_service::{deduplicate_and_sort, MaintenanceService, MergeCleanResult};
pub use report_service::{LatestReading, ReportService, TrendPoint};
