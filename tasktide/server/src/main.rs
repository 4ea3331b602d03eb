#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().init();
    let config = tasktide_server::config::Config::from_env()?;
    tasktide_server::web::start_web_server(config).await
}
