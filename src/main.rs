use billfold_rust::{
    create_pool, router, run_migrations, AppConfig, AppState, BillRepository,
    MemoryBillRepository, PgBillRepository, StorageBackend,
};
use std::str::FromStr;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::fmt::time::ChronoLocal;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 加载配置
    let config = AppConfig::load()?;

    // 初始化日志 - 使用本地时间格式 (类似Java格式)
    let level = tracing::Level::from_str(&config.logging.level).unwrap_or(tracing::Level::INFO);
    tracing_subscriber::fmt()
        .with_timer(ChronoLocal::new("%Y-%m-%d %H:%M:%S".to_string()))
        .with_target(true)
        .with_level(true)
        .with_max_level(level)
        .init();

    info!("Starting server with config: {:?}", config);

    // 选择存储后端
    let repo: Arc<dyn BillRepository> = match config.storage.backend {
        StorageBackend::Postgres => {
            let pool = create_pool(&config.database).await?;
            info!("Database pool created");
            run_migrations(&pool).await?;
            info!("Migrations applied");
            Arc::new(PgBillRepository::new(pool))
        }
        StorageBackend::Memory => {
            warn!("Using in-memory storage, data will be lost on exit");
            Arc::new(MemoryBillRepository::new())
        }
    };

    let app = router(AppState::new(repo));

    // 启动服务器
    let addr = format!("{}:{}", config.server.host, config.server.port);
    info!("Server listening on {}", addr);
    info!("API Endpoints:");
    info!("  GET    /health");
    info!("  POST   /api/v1/bills");
    info!("  GET    /api/v1/bills");
    info!("  GET    /api/v1/bills/types");
    info!("  GET    /api/v1/bills/currencies");
    info!("  GET    /api/v1/bills/:id");
    info!("  PUT    /api/v1/bills/:id");
    info!("  DELETE /api/v1/bills/:id");
    info!("  GET    /api/v1/statistics/summary");
    info!("  GET    /api/v1/statistics/category");
    info!("  GET    /api/v1/statistics/trend");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
