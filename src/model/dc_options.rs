//! Datacenter endpoint table built from legacy settings.
//!
//! Two legacy sources feed this table: single-endpoint blocks (`add_one`) and
//! a serialized table blob (`construct_from_serialized`).  The reconciler then
//! merges the result into the fallback configuration with `add_from_other`.
//!
//! # Serialized layout
//! ```text
//! i32  minus_version   negative: -version, otherwise this is the count
//! i32  count           only when versioned
//! repeat count:
//!   i32 id, i32 flags, i32 port, i32 ip_len (1..=45), raw ip
//!   i32 secret_len (0..=32), raw secret          only when versioned
//! ```
//! Trailing data (CDN public keys in newer writers) is not needed here and is
//! ignored.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::stream::Cursor;

/// Shifted dc ids carry a purpose multiplier on top of the bare id.
pub const DC_SHIFT: u32 = 10_000;

const MAX_IP_SIZE:     i32 = 45;
const MAX_SECRET_SIZE: i32 = 32;

/// Endpoint flag bits.
pub mod flags {
    pub const IPV6:       i32 = 1 << 0;
    pub const MEDIA_ONLY: i32 = 1 << 1;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DcEndpoint {
    pub ip:     String,
    pub port:   u32,
    pub flags:  i32,
    #[serde(with = "hex")]
    pub secret: Vec<u8>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DcOptions {
    endpoints: BTreeMap<u32, Vec<DcEndpoint>>,
}

impl DcOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.endpoints.is_empty()
    }

    /// Endpoints of one bare dc id.
    pub fn endpoints(&self, dc_id: u32) -> &[DcEndpoint] {
        self.endpoints.get(&dc_id).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn dc_ids(&self) -> impl Iterator<Item = u32> + '_ {
        self.endpoints.keys().copied()
    }

    /// Total number of endpoints across all dcs.
    pub fn len(&self) -> usize {
        self.endpoints.values().map(Vec::len).sum()
    }

    /// Add one endpoint for a (possibly shifted) dc id.
    pub fn add_one(&mut self, dc_id: u32, flags: i32, ip: &str, port: u32) {
        self.apply_one(dc_id % DC_SHIFT, flags, ip, port, &[]);
    }

    /// Insert an endpoint unless an identical address is already known; a
    /// known address only has its flags refreshed.  Returns whether anything
    /// changed.
    fn apply_one(&mut self, dc_id: u32, flags: i32, ip: &str, port: u32, secret: &[u8]) -> bool {
        let list = self.endpoints.entry(dc_id).or_default();
        if let Some(existing) = list
            .iter_mut()
            .find(|e| e.ip == ip && e.port == port && e.secret == secret)
        {
            if existing.flags == flags {
                return false;
            }
            existing.flags = flags;
            return true;
        }
        list.push(DcEndpoint {
            ip: ip.to_owned(),
            port,
            flags,
            secret: secret.to_vec(),
        });
        true
    }

    /// Merge every endpoint of `other` with the same de-duplication rule.
    pub fn add_from_other(&mut self, other: DcOptions) {
        for (dc_id, list) in other.endpoints {
            for e in list {
                self.apply_one(dc_id, e.flags, &e.ip, e.port, &e.secret);
            }
        }
    }

    /// Add endpoints from a serialized table.
    ///
    /// A corrupt blob is not an error for the caller: entries decoded before
    /// the corruption are kept and the rest is dropped.
    pub fn construct_from_serialized(&mut self, serialized: &[u8]) {
        let mut cur = Cursor::new(serialized);
        let Ok(minus_version) = cur.read_i32() else {
            tracing::warn!(len = serialized.len(), "dc options blob too short");
            return;
        };
        let version = if minus_version < 0 { minus_version.saturating_neg() } else { 0 };
        let count = if version > 0 {
            match cur.read_i32() {
                Ok(count) => count,
                Err(e) => {
                    tracing::warn!(error = %e, "dc options blob missing count");
                    return;
                }
            }
        } else {
            minus_version
        };

        for index in 0..count.max(0) {
            match read_serialized_endpoint(&mut cur, version) {
                Ok(Some((id, flags, ip, port, secret))) => {
                    self.apply_one(id % DC_SHIFT, flags, &ip, port, &secret);
                }
                Ok(None) => {
                    tracing::warn!(index, "dc options blob has an out-of-range field");
                    return;
                }
                Err(e) => {
                    tracing::warn!(index, error = %e, "dc options blob truncated");
                    return;
                }
            }
        }
    }
}

type SerializedEndpoint = (u32, i32, String, u32, Vec<u8>);

fn read_serialized_endpoint(
    cur:     &mut Cursor<'_>,
    version: i32,
) -> Result<Option<SerializedEndpoint>, crate::stream::StreamError> {
    let id = cur.read_i32()?;
    let flags = cur.read_i32()?;
    let port = cur.read_i32()?;
    let ip_size = cur.read_i32()?;
    if ip_size <= 0 || ip_size > MAX_IP_SIZE {
        return Ok(None);
    }
    let ip = String::from_utf8_lossy(&cur.read_raw(ip_size as usize)?).into_owned();
    let secret = if version > 0 {
        let secret_size = cur.read_i32()?;
        if !(0..=MAX_SECRET_SIZE).contains(&secret_size) {
            return Ok(None);
        }
        cur.read_raw(secret_size as usize)?
    } else {
        Vec::new()
    };
    Ok(Some((id as u32, flags, ip, port as u32, secret)))
}
