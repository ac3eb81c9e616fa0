#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().init();
    let config = planboard_server::config::Config::from_env()?;
    planboard_server::web::start_web_server(config).await
}
