//! Redis implementation of the link repository.
//!
//! Each link is a hash at `url_code:<code>` with fields `url` and `hits`.
//! Both contract operations run as Lua scripts so the existence check and the
//! write happen in one server-side step.

use async_trait::async_trait;
use redis::{Client, Script, aio::ConnectionManager};
use tracing::{debug, info};

use crate::domain::entities::ShortLink;
use crate::domain::errors::StorageError;
use crate::domain::repositories::LinkRepository;

const KEY_PREFIX: &str = "url_code:";

/// Sets `url` and `hits = 0` only when `url` is absent. Returns 1 on insert.
const CREATE_SCRIPT: &str = r#"
if redis.call('HSETNX', KEYS[1], 'url', ARGV[1]) == 1 then
    redis.call('HSET', KEYS[1], 'hits', 0)
    return 1
end
return 0
"#;

/// Returns `{url, hits}` after incrementing `hits`, or nil for a missing link.
const GET_AND_TOUCH_SCRIPT: &str = r#"
local url = redis.call('HGET', KEYS[1], 'url')
if not url then
    return nil
end
local hits = redis.call('HINCRBY', KEYS[1], 'hits', 1)
return {url, hits}
"#;

/// Redis repository for short links.
///
/// Uses `ConnectionManager` for automatic reconnection; clones are cheap and
/// share one multiplexed connection.
pub struct RedisLinkRepository {
    conn: ConnectionManager,
    create_script: Script,
    get_and_touch_script: Script,
}

impl RedisLinkRepository {
    /// Connects to Redis and validates the connection with a PING.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Backend`] if the URL is invalid, the connection
    /// can't be established, or the PING fails.
    pub async fn connect(redis_url: &str) -> Result<Self, StorageError> {
        info!("Connecting to Redis");

        let client = Client::open(redis_url)?;
        let conn = ConnectionManager::new(client).await?;
        let repo = Self::with_connection(conn);

        let mut conn = repo.conn.clone();
        let _: String = redis::cmd("PING").query_async(&mut conn).await?;

        info!("Connected to Redis");
        Ok(repo)
    }

    /// Wraps an existing connection.
    pub fn with_connection(conn: ConnectionManager) -> Self {
        Self {
            conn,
            create_script: Script::new(CREATE_SCRIPT),
            get_and_touch_script: Script::new(GET_AND_TOUCH_SCRIPT),
        }
    }

    fn build_key(code: &str) -> String {
        format!("{KEY_PREFIX}{code}")
    }
}

#[async_trait]
impl LinkRepository for RedisLinkRepository {
    async fn create(&self, code: &str, original_url: &str) -> Result<(), StorageError> {
        let mut conn = self.conn.clone();

        let inserted: i64 = self
            .create_script
            .key(Self::build_key(code))
            .arg(original_url)
            .invoke_async(&mut conn)
            .await?;

        if inserted == 1 {
            Ok(())
        } else {
            Err(StorageError::DuplicateKey(code.to_string()))
        }
    }

    async fn get_and_touch(&self, code: &str) -> Result<ShortLink, StorageError> {
        let mut conn = self.conn.clone();

        let found: Option<(String, i64)> = self
            .get_and_touch_script
            .key(Self::build_key(code))
            .invoke_async(&mut conn)
            .await?;

        let (url, hits) = found.ok_or_else(|| StorageError::NotFound(code.to_string()))?;
        debug!(code, hits, "link resolved");

        Ok(ShortLink::new(code, url).with_hits(u64::try_from(hits).unwrap_or(0)))
    }

    async fn list(&self) -> Result<Vec<ShortLink>, StorageError> {
        let mut conn = self.conn.clone();
        let pattern = format!("{KEY_PREFIX}*");
        let mut cursor: u64 = 0;
        let mut keys = Vec::new();

        loop {
            let (next, batch): (u64, Vec<String>) = redis::cmd("SCAN")
                .arg(cursor)
                .arg("MATCH")
                .arg(&pattern)
                .arg("COUNT")
                .arg(500)
                .query_async(&mut conn)
                .await?;

            keys.extend(batch);
            if next == 0 {
                break;
            }
            cursor = next;
        }

        let mut links = Vec::with_capacity(keys.len());
        for key in keys {
            let (url, hits): (Option<String>, Option<i64>) = redis::cmd("HMGET")
                .arg(&key)
                .arg("url")
                .arg("hits")
                .query_async(&mut conn)
                .await?;

            let (Some(url), Some(code)) = (url, key.strip_prefix(KEY_PREFIX)) else {
                continue;
            };
            let hits = hits.and_then(|h| u64::try_from(h).ok()).unwrap_or(0);
            links.push(ShortLink::new(code, url).with_hits(hits));
        }

        links.sort_by(|a, b| a.code.cmp(&b.code));
        Ok(links)
    }

    async fn health_check(&self) -> bool {
        let mut conn = self.conn.clone();
        let pong: redis::RedisResult<String> = redis::cmd("PING").query_async(&mut conn).await;
        pong.is_ok()
    }

    fn backend_name(&self) -> &'static str {
        "redis"
    }
}
