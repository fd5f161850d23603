//! Per-audience, per-content-type automatic download limits.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Limit applied to every pair until a block or the session blob says
/// otherwise.
pub const DEFAULT_BYTES_LIMIT: i64 = 8 * 1024 * 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum DownloadSource {
    User,
    Group,
    Channel,
}

impl DownloadSource {
    pub const ALL: [DownloadSource; 3] =
        [DownloadSource::User, DownloadSource::Group, DownloadSource::Channel];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum DownloadType {
    Photo,
    AutoPlayVideo,
    VoiceMessage,
    AutoPlayVideoMessage,
    Music,
    AutoPlayGif,
    File,
}

impl DownloadType {
    pub const ALL: [DownloadType; 7] = [
        DownloadType::Photo,
        DownloadType::AutoPlayVideo,
        DownloadType::VoiceMessage,
        DownloadType::AutoPlayVideoMessage,
        DownloadType::Music,
        DownloadType::AutoPlayGif,
        DownloadType::File,
    ];
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AutoDownloadSettings {
    limits: BTreeMap<DownloadSource, BTreeMap<DownloadType, i64>>,
}

impl Default for AutoDownloadSettings {
    fn default() -> Self {
        let limits = DownloadSource::ALL
            .into_iter()
            .map(|source| {
                let per_type = DownloadType::ALL
                    .into_iter()
                    .map(|t| (t, DEFAULT_BYTES_LIMIT))
                    .collect();
                (source, per_type)
            })
            .collect();
        Self { limits }
    }
}

impl AutoDownloadSettings {
    pub fn bytes_limit(&self, source: DownloadSource, kind: DownloadType) -> i64 {
        self.limits
            .get(&source)
            .and_then(|m| m.get(&kind))
            .copied()
            .unwrap_or(DEFAULT_BYTES_LIMIT)
    }

    pub fn set_bytes_limit(&mut self, source: DownloadSource, kind: DownloadType, limit: i64) {
        self.limits.entry(source).or_default().insert(kind, limit);
    }
}
