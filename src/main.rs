use clap::Parser;
use ekart::infrastructure::{
    config::{Config, ServerArgs},
    database::open_store,
    logger::Logger,
};
use ekart::{router, AppState, CatalogService};
use tokio::net::TcpListener;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let args = ServerArgs::parse();
    let config = Config::load(&args)?;
    config.validate()?;

    let _guard = Logger::init(&config.logging)?;
    info!("启动 Ekart 商品目录服务...");

    let store = open_store(&config.database).await?;
    let state = AppState::new(CatalogService::new(store));
    let app = router(state, &config.http);

    let addr = config.http.socket_addr()?;
    let listener = TcpListener::bind(addr).await?;

    info!("🚀 Ekart 服务运行在 http://{}", listener.local_addr()?);
    info!("📖 API 端点:");
    info!("   GET    /products     - 获取全部商品");
    info!("   POST   /products     - 上架商品");
    info!("   DELETE /products/:id - 购买（下架）商品");
    info!("   GET    /health       - 健康检查");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("服务已停止");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("监听退出信号失败: {}", e);
        std::future::pending::<()>().await;
    }
    info!("收到退出信号，正在关闭...");
}
