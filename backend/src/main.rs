#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().init();
    let config = todo_backend::config::Config::from_env()?;
    todo_backend::web::start_web_server(config).await
}
