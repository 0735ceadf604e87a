//! Redis implementation of `ViewerRepository`.
//!
//! Layout:
//! - `viewers:{len(type)}:{type}:{id}`: hash, field = user id, value = JSON
//!   `{"id": "<record id>", "last_active_at": <unix ms>}`
//! - `viewers:by_last_active`: sorted set over every record, member =
//!   `{user}:{hash key}`, score = last activity in unix ms
//!
//! Entity parts may contain any character, including `:`. The byte length of
//! the type pins where it ends, and the user id is all digits, so both the
//! hash key and the index member split unambiguously.
//! Every mutation touching both structures runs as one Lua script or MULTI
//! block. Scripts address per-entity hashes derived from index members, so
//! this layout targets a single Redis node, not a cluster.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use redis::{AsyncCommands, Script};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use presence_core::entities::ViewerRecord;
use presence_core::traits::{HeartbeatOutcome, RepoResult, ViewerRepository};
use presence_core::value_objects::{EntityKey, Snowflake, ViewerKey};

use crate::pool::{RedisPool, RedisPoolError, RedisResult};

/// Key prefix for per-entity viewer hashes
pub const VIEWERS_PREFIX: &str = "viewers:";
/// Sorted set of all records by last activity
pub const ACTIVITY_INDEX_KEY: &str = "viewers:by_last_active";

/// KEYS[1] entity hash, KEYS[2] activity index
/// ARGV[1] user id, ARGV[2] new record id, ARGV[3] unix ms, ARGV[4] index member
/// Returns 1 when a record was created, 0 when refreshed.
const HEARTBEAT_SCRIPT: &str = r#"
local at = tonumber(ARGV[3])
local existing = redis.call('HGET', KEYS[1], ARGV[1])
local id = ARGV[2]
local created = 1
if existing then
  created = 0
  id = string.match(existing, '"id":"(%-?%d+)"') or id
  local current = redis.call('ZSCORE', KEYS[2], ARGV[4])
  if current and tonumber(current) >= at then
    return created
  end
end
redis.call('HSET', KEYS[1], ARGV[1], string.format('{"id":"%s","last_active_at":%s}', id, ARGV[3]))
redis.call('ZADD', KEYS[2], at, ARGV[4])
return created
"#;

/// KEYS[1] activity index
/// ARGV[1] cutoff unix ms (exclusive), ARGV[2] batch limit
/// Returns the number of records removed.
const REAP_SCRIPT: &str = r"
local members = redis.call('ZRANGEBYSCORE', KEYS[1], '-inf', '(' .. ARGV[1], 'LIMIT', 0, tonumber(ARGV[2]))
for _, member in ipairs(members) do
  local user_id, hash_key = string.match(member, '^(%-?%d+):(.+)$')
  if user_id then
    redis.call('HDEL', hash_key, user_id)
  end
  redis.call('ZREM', KEYS[1], member)
end
return #members
";

/// Stored hash value
#[derive(Debug, Serialize, Deserialize)]
struct StoredViewer {
    id: Snowflake,
    last_active_at: i64,
}

/// Redis-backed viewer registry
#[derive(Clone)]
pub struct RedisViewerRepository {
    pool: RedisPool,
    heartbeat: Script,
    reap: Script,
}

impl RedisViewerRepository {
    #[must_use]
    pub fn new(pool: RedisPool) -> Self {
        Self {
            pool,
            heartbeat: Script::new(HEARTBEAT_SCRIPT),
            reap: Script::new(REAP_SCRIPT),
        }
    }

    /// Hash key holding every viewer of an entity
    pub(crate) fn entity_key(entity: &EntityKey) -> String {
        format!(
            "{VIEWERS_PREFIX}{}:{}:{}",
            entity.entity_type().len(),
            entity.entity_type(),
            entity.entity_id()
        )
    }

    /// Member of the activity index for one record
    pub(crate) fn index_member(key: &ViewerKey) -> String {
        format!("{}:{}", key.user_id, Self::entity_key(&key.entity))
    }

    fn decode(entity: &EntityKey, field: &str, value: &str) -> RedisResult<Option<ViewerRecord>> {
        let Ok(user_id) = field.parse::<Snowflake>() else {
            tracing::warn!(entity = %entity, field, "Skipping viewer with malformed user id");
            return Ok(None);
        };
        let stored: StoredViewer = serde_json::from_str(value)?;
        let Some(last_active_at) = DateTime::from_timestamp_millis(stored.last_active_at) else {
            tracing::warn!(entity = %entity, field, "Skipping viewer with out-of-range timestamp");
            return Ok(None);
        };

        Ok(Some(ViewerRecord {
            id: stored.id,
            entity: entity.clone(),
            user_id,
            last_active_at,
        }))
    }
}

impl std::fmt::Debug for RedisViewerRepository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisViewerRepository")
            .field("pool", &self.pool)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl ViewerRepository for RedisViewerRepository {
    #[instrument(skip(self, key), fields(key = %key))]
    async fn find_by_key(&self, key: &ViewerKey) -> RepoResult<Option<ViewerRecord>> {
        let mut conn = self.pool.get().await?;
        let user_field = key.user_id.to_string();
        let value: Option<String> = conn
            .hget(Self::entity_key(&key.entity), &user_field)
            .await
            .map_err(RedisPoolError::from)?;

        match value {
            Some(value) => Ok(Self::decode(&key.entity, &user_field, &value)?),
            None => Ok(None),
        }
    }

    #[instrument(skip(self, key), fields(key = %key))]
    async fn record_heartbeat(
        &self,
        key: &ViewerKey,
        new_id: Snowflake,
        at: DateTime<Utc>,
    ) -> RepoResult<HeartbeatOutcome> {
        let mut conn = self.pool.get().await?;
        let created: i32 = self
            .heartbeat
            .key(Self::entity_key(&key.entity))
            .key(ACTIVITY_INDEX_KEY)
            .arg(key.user_id.to_string())
            .arg(new_id.to_string())
            .arg(at.timestamp_millis())
            .arg(Self::index_member(key))
            .invoke_async(&mut conn)
            .await
            .map_err(RedisPoolError::from)?;

        Ok(if created == 1 {
            HeartbeatOutcome::Created
        } else {
            HeartbeatOutcome::Refreshed
        })
    }

    #[instrument(skip(self, key), fields(key = %key))]
    async fn delete_by_key(&self, key: &ViewerKey) -> RepoResult<bool> {
        let mut conn = self.pool.get().await?;
        let (removed, _): (i32, i32) = redis::pipe()
            .atomic()
            .hdel(Self::entity_key(&key.entity), key.user_id.to_string())
            .zrem(ACTIVITY_INDEX_KEY, Self::index_member(key))
            .query_async(&mut conn)
            .await
            .map_err(RedisPoolError::from)?;

        Ok(removed > 0)
    }

    #[instrument(skip(self, entity), fields(entity = %entity))]
    async fn find_by_entity(
        &self,
        entity: &EntityKey,
        active_after: DateTime<Utc>,
    ) -> RepoResult<Vec<ViewerRecord>> {
        let mut conn = self.pool.get().await?;
        let entries: Vec<(String, String)> = conn
            .hgetall(Self::entity_key(entity))
            .await
            .map_err(RedisPoolError::from)?;

        let mut records = Vec::with_capacity(entries.len());
        for (field, value) in entries {
            if let Some(record) = Self::decode(entity, &field, &value)? {
                if record.last_active_at > active_after {
                    records.push(record);
                }
            }
        }
        Ok(records)
    }

    #[instrument(skip(self))]
    async fn delete_stale(&self, before: DateTime<Utc>, limit: u32) -> RepoResult<u64> {
        let mut conn = self.pool.get().await?;
        let removed: u64 = self
            .reap
            .key(ACTIVITY_INDEX_KEY)
            .arg(before.timestamp_millis())
            .arg(limit)
            .invoke_async(&mut conn)
            .await
            .map_err(RedisPoolError::from)?;

        Ok(removed)
    }
}
