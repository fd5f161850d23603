//! Cache size and time limits.
//!
//! Time limits carry a legacy sentinel problem: "no limit" was written as `0`,
//! as `i32::MAX`, or as `i64::MAX` truncated into 32 bits (which reads back as
//! `-1`).  All three normalise to `0`.  Any other negative value is corrupt.

use crate::context::LegacyContext;
use crate::error::{Result, SettingsError};
use crate::stream::Cursor;

/// Largest single cached item; a total limit must exceed it.
pub const MAX_CACHE_DATA_SIZE: i64 = 10 * 1024 * 1024 - 1;

/// Whether a stored time limit means "unlimited".
pub fn no_time_limit(stored: i32) -> bool {
    stored == 0 || stored == i32::MAX || stored == i64::MAX as i32
}

/// Map a stored time limit to its normalised form (`0` = unlimited).
pub fn normalize_time_limit(stored: i32) -> Result<i32> {
    if no_time_limit(stored) {
        Ok(0)
    } else if stored < 0 {
        Err(SettingsError::NegativeTimeLimit(stored))
    } else {
        Ok(stored)
    }
}

fn check_size_limit(size: i64) -> Result<i64> {
    if size <= MAX_CACHE_DATA_SIZE {
        return Err(SettingsError::CacheSizeTooSmall { size, minimum: MAX_CACHE_DATA_SIZE + 1 });
    }
    Ok(size)
}

/// `CacheSettingsOld`: one size/time pair used for both cache classes.
pub fn cache_settings_old(cur: &mut Cursor<'_>, ctx: &mut LegacyContext) -> Result<()> {
    let size = cur.read_i64()?;
    let time = cur.read_i32()?;
    let size = check_size_limit(size)?;
    let time = normalize_time_limit(time)?;

    ctx.cache_total_size_limit = size;
    ctx.cache_total_time_limit = time;
    ctx.cache_big_file_total_size_limit = size;
    ctx.cache_big_file_total_time_limit = time;
    Ok(())
}

/// `CacheSettings`: separate limits for the regular and big-file caches.
pub fn cache_settings(cur: &mut Cursor<'_>, ctx: &mut LegacyContext) -> Result<()> {
    let size = cur.read_i64()?;
    let time = cur.read_i32()?;
    let size_big = cur.read_i64()?;
    let time_big = cur.read_i32()?;
    let size = check_size_limit(size)?;
    let size_big = check_size_limit(size_big)?;
    let time = normalize_time_limit(time)?;
    let time_big = normalize_time_limit(time_big)?;

    ctx.cache_total_size_limit = size;
    ctx.cache_total_time_limit = time;
    ctx.cache_big_file_total_size_limit = size_big;
    ctx.cache_big_file_total_time_limit = time_big;
    Ok(())
}
