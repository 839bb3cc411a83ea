use redis::AsyncCommands;
use redis::Client;
use serde::{de::DeserializeOwned, Serialize};
use std::fmt::Display;
use std::future::Future;
use std::time::Duration;
use tokio::sync::mpsc;

use crate::error::AppError;
use crate::error::AppResult;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CacheKey {
    /// Scraped title and description of a course page, keyed by URL
    LinkPreview(String),
}

impl Display for CacheKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CacheKey::LinkPreview(url) => write!(f, "preview:{}", url.trim()),
        }
    }
}

/// Opens a Redis client; no connection is made until first use
pub fn create_redis_client(redis_url: &str) -> AppResult<Client> {
    Ok(Client::open(redis_url)?)
}

struct CacheWrite {
    key: String,
    value: String,
    ttl: u64,
}

/// Read-through cache for link previews
///
/// Reads hit Redis directly. Writes are queued to a background task so a slow
/// or unavailable Redis never delays a response. Every Redis round trip,
/// connecting included, is bounded by the operation timeout.
#[derive(Clone)]
pub struct Cache {
    redis_client: Client,
    op_timeout: Duration,
    write_tx: mpsc::UnboundedSender<CacheWrite>,
}

/// Stops the background writer after draining queued writes
pub struct CacheWriterHandle {
    shutdown_tx: mpsc::Sender<()>,
}

impl CacheWriterHandle {
    pub async fn shutdown(self) {
        let _ = self.shutdown_tx.send(()).await;
        tracing::info!("Cache writer shutdown signal sent");
    }
}

impl Cache {
    /// Creates the cache and spawns its writer task (requires a Tokio runtime)
    pub fn spawn(redis_client: Client, op_timeout: Duration) -> (Self, CacheWriterHandle) {
        let (write_tx, write_rx) = mpsc::unbounded_channel();
        let (shutdown_tx, shutdown_rx) = mpsc::channel(1);

        tokio::spawn(Self::writer_task(
            redis_client.clone(),
            op_timeout,
            write_rx,
            shutdown_rx,
        ));

        (
            Self {
                redis_client,
                op_timeout,
                write_tx,
            },
            CacheWriterHandle { shutdown_tx },
        )
    }

    async fn writer_task(
        client: Client,
        op_timeout: Duration,
        mut write_rx: mpsc::UnboundedReceiver<CacheWrite>,
        mut shutdown_rx: mpsc::Receiver<()>,
    ) {
        tracing::info!("Cache writer task started");

        loop {
            tokio::select! {
                Some(write) = write_rx.recv() => {
                    if let Err(e) = bounded(op_timeout, Self::write_to_redis(&client, write)).await {
                        tracing::error!(error = %e, "Failed to write to Redis cache");
                    }
                }
                _ = shutdown_rx.recv() => {
                    // Cache clones may still hold senders, so drain without waiting
                    let mut flushed = 0usize;
                    while let Ok(write) = write_rx.try_recv() {
                        match bounded(op_timeout, Self::write_to_redis(&client, write)).await {
                            Ok(()) => flushed += 1,
                            Err(e) => tracing::error!(error = %e, "Failed to flush cache write during shutdown"),
                        }
                    }
                    tracing::info!(flushed, "Cache writer task stopped");
                    break;
                }
                else => break,
            }
        }
    }

    async fn write_to_redis(client: &Client, write: CacheWrite) -> AppResult<()> {
        let mut conn = client.get_multiplexed_async_connection().await?;
        let _: () = conn.set_ex(write.key, write.value, write.ttl).await?;
        Ok(())
    }

    /// Cached value for `key`, or `None` on a miss
    pub async fn get_from_cache<T: DeserializeOwned>(&self, key: &CacheKey) -> AppResult<Option<T>> {
        let cached: Option<String> = bounded(self.op_timeout, async {
            let mut conn = self.redis_client.get_multiplexed_async_connection().await?;
            let value: Option<String> = conn.get(key.to_string()).await?;
            Ok::<_, AppError>(value)
        })
        .await?;

        cached
            .map(|json| {
                serde_json::from_str(&json)
                    .map_err(|e| AppError::Internal(format!("Cache deserialization error: {}", e)))
            })
            .transpose()
    }

    /// Queues a write and returns immediately; failures are only logged
    pub fn set_in_background<T: Serialize>(&self, key: &CacheKey, value: &T, ttl: u64) {
        let json = match serde_json::to_string(value) {
            Ok(j) => j,
            Err(e) => {
                tracing::error!(error = %e, "Cache serialization error");
                return;
            }
        };

        let write = CacheWrite {
            key: key.to_string(),
            value: json,
            ttl,
        };

        if self.write_tx.send(write).is_err() {
            tracing::error!(key = %key, "Cache writer is gone, dropping write");
        }
    }
}

/// Runs a Redis operation, failing it once `limit` elapses
async fn bounded<T, F>(limit: Duration, operation: F) -> AppResult<T>
where
    F: Future<Output = AppResult<T>>,
{
    match tokio::time::timeout(limit, operation).await {
        Ok(result) => result,
        Err(_) => Err(redis::RedisError::from((
            redis::ErrorKind::IoError,
            "Redis operation timed out",
        ))
        .into()),
    }
}
