//! Selftest command - round-trip a record through the cache.

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use cache_connector::KeyGenerator;
use common::{AppError, AppResult};

use super::{open_handle, Context};

const SELFTEST_TTL: Duration = Duration::from_secs(60);

/// Record written and read back by the selftest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelfTestRecord {
    pub id: Uuid,
    pub written_at: DateTime<Utc>,
}

impl SelfTestRecord {
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            written_at: Utc::now(),
        }
    }

    pub fn key(&self) -> String {
        KeyGenerator::for_type::<Self>().key("roundtrip", [self.id])
    }
}

impl Default for SelfTestRecord {
    fn default() -> Self {
        Self::new()
    }
}

/// Execute the selftest command
pub async fn execute(ctx: Context) -> AppResult<()> {
    let handle = open_handle(&ctx).await?;
    if handle.is_placeholder() {
        warn!("Cache unavailable, selftest skipped");
        println!("SKIPPED (placeholder handle)");
        return Ok(());
    }

    let record = SelfTestRecord::new();
    let key = record.key();

    handle.set_with_ttl(&key, &record, SELFTEST_TTL)?;
    let read_back: Option<SelfTestRecord> = handle.get(&key)?;
    handle.delete(&key)?;

    if read_back.as_ref() != Some(&record) {
        return Err(AppError::internal(format!(
            "Selftest record mismatch for key {}",
            key
        )));
    }

    info!(key = %key, "Cache selftest passed");
    println!("PASSED");
    handle.close();
    Ok(())
}
