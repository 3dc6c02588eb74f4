use anyhow::Context;
use redis::aio::MultiplexedConnection;
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct RedisConfig {
    pub host: String,
}

#[derive(Clone)]
pub struct Client {
    pub(crate) conn: MultiplexedConnection,
}

impl Client {
    pub async fn connect(config: &RedisConfig) -> anyhow::Result<Self> {
        let conn = redis::Client::open(config.host.as_ref())
            .with_context(|| format!("Invalid redis host {}", config.host))?
            .get_multiplexed_tokio_connection()
            .await
            .context("Failed to connect to redis")?;
        Ok(Self { conn })
    }
}
