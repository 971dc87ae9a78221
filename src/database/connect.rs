use std::sync::Arc;
use tokio_postgres::Client;
use tokio_postgres::Config;
use tokio_postgres::NoTls;

/// Establish the bootstrap connection from the environment.
///
/// DB_URL takes precedence; otherwise the connection is assembled
/// from DB_HOST / DB_PORT / DB_USER / DB_PASS / DB_NAME with defaults
/// matching the deployment compose file. One connection serves both
/// phases and is released when the process exits.
pub async fn db() -> anyhow::Result<Arc<Client>> {
    log::info!("connecting to database");
    let (client, connection) = match std::env::var("DB_URL") {
        Ok(ref url) => tokio_postgres::connect(url, NoTls).await,
        Err(_) => config().connect(NoTls).await,
    }
    .map_err(|e| anyhow::anyhow!("database connection failed: {}", e))?;
    tokio::spawn(connection);
    client
        .execute("SET client_min_messages TO WARNING", &[])
        .await
        .map_err(|e| anyhow::anyhow!("set client_min_messages: {}", e))?;
    Ok(Arc::new(client))
}

fn config() -> Config {
    let mut config = Config::default();
    config
        .host(&var("DB_HOST", "db"))
        .port(var("DB_PORT", "5432").parse().unwrap_or(5432))
        .user(&var("DB_USER", "postgres"))
        .password(var("DB_PASS", "postgres"))
        .dbname(&var("DB_NAME", "pokemon"));
    config
}

fn var(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}
