pub mod auth;
pub mod handlers;
pub mod params;

pub use auth::OwnerId;
pub use handlers::*;

use crate::db::BillRepository;
use crate::service::{BillService, StatisticsService};
use axum::{routing::get, Router};
use std::sync::Arc;

/// 共享状态：账单服务与统计服务共用同一个存储
#[derive(Clone)]
pub struct AppState {
    pub bills: Arc<BillService>,
    pub statistics: Arc<StatisticsService>,
}

impl AppState {
    pub fn new(repo: Arc<dyn BillRepository>) -> Self {
        Self {
            bills: Arc::new(BillService::new(repo.clone())),
            statistics: Arc::new(StatisticsService::new(repo)),
        }
    }
}

/// 构建全部路由
pub fn router(state: AppState) -> Router {
    // 账单路由 (静态路径优先于 /:id)
    let bill_routes = Router::new()
        .route("/", get(list_bills).post(create_bill))
        .route("/types", get(bill_types))
        .route("/currencies", get(currencies))
        .route("/:id", get(get_bill).put(update_bill).delete(delete_bill));

    // 统计路由
    let statistics_routes = Router::new()
        .route("/summary", get(statistics_summary))
        .route("/category", get(statistics_category))
        .route("/trend", get(statistics_trend));

    let api = Router::new()
        .nest("/bills", bill_routes)
        .nest("/statistics", statistics_routes);

    Router::new()
        .route("/health", get(health_check))
        .nest("/api/v1", api)
        .with_state(state)
}
