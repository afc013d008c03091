pub mod bill;
pub mod statistics;

pub use bill::BillService;
pub use statistics::StatisticsService;
