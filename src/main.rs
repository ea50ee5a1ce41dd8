use bakery_fulfillment::adapter::driven::{
    MySqlCatalogRepository, MySqlOrderRepository, MySqlUnitOfWorkFactory,
};
use bakery_fulfillment::adapter::driver::{create_router, AppState};
use bakery_fulfillment::adapter::{DatabaseConfig, DatabaseMigration, ServerConfig};
use bakery_fulfillment::application::service::{
    CatalogQueryService, MaterialApplicationService, OrderFulfillmentApplicationService,
    OrderQueryService, ProductionApplicationService,
};
use bakery_fulfillment::domain::port::UnitOfWorkFactory;

use sqlx::mysql::MySqlPoolOptions;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // .envファイルから環境変数を読み込む
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "bakery_fulfillment=info,tower_http=info,sqlx=warn".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = DatabaseConfig::from_env()?;
    let server_config = ServerConfig::from_env()?;
    tracing::info!(
        host = %config.host,
        port = config.port,
        database = %config.database,
        "database configuration loaded"
    );

    // 接続プールを作成
    let pool = MySqlPoolOptions::new()
        .max_connections(config.max_connections)
        .connect(&config.connection_string())
        .await?;

    DatabaseMigration::new(pool.clone()).run().await?;

    let uow_factory: Arc<dyn UnitOfWorkFactory> =
        Arc::new(MySqlUnitOfWorkFactory::new(pool.clone()));

    // アプリケーション状態を作成
    let app_state = AppState {
        production_service: Arc::new(ProductionApplicationService::new(uow_factory.clone())),
        fulfillment_service: Arc::new(OrderFulfillmentApplicationService::new(
            uow_factory.clone(),
        )),
        material_service: Arc::new(MaterialApplicationService::new(uow_factory)),
        catalog_query_service: Arc::new(CatalogQueryService::new(Arc::new(
            MySqlCatalogRepository::new(pool.clone()),
        ))),
        order_query_service: Arc::new(OrderQueryService::new(Arc::new(
            MySqlOrderRepository::new(pool),
        ))),
    };

    let app = create_router().with_state(app_state).layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(CorsLayer::permissive()),
    );

    let addr = server_config.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "REST API server listening");

    axum::serve(listener, app).await?;

    Ok(())
}
