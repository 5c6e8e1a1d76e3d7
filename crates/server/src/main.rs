use server::ServerConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env before the config reads the environment.
    dotenvy::dotenv().ok();

    let config = ServerConfig::load()?;
    server::start_server(config).await
}
