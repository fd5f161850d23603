//! Host loop: version, blocks, reconciler.
//!
//! ```no_run
//! use legacy_settings::loader::{load_file, LoadOptions};
//!
//! let loaded = load_file("settings.bin", &LoadOptions::default())?;
//! println!("{} blocks, version {}", loaded.report.blocks_read, loaded.report.version);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! A load either succeeds as a whole or is thrown away: the first fatal block
//! error stops the pass and the reconciler does not run.  Collaborators may
//! already hold values from earlier blocks at that point, so a caller that
//! needs the all-or-nothing guarantee decodes into fresh state and discards
//! it on failure, which is what [`load_or_default`] does.

use serde::Serialize;
use std::path::Path;

use crate::block::BlockId;
use crate::collab::memory::MemoryConfig;
use crate::collab::Collaborators;
use crate::context::LegacyContext;
use crate::dispatch;
use crate::error::Result;
use crate::reconcile::{apply_read_fallback_config, FallbackSource};
use crate::stream::Cursor;

// ── LoadOptions ──────────────────────────────────────────────────────────────

/// Facts about the stream known before it is read.
#[derive(Debug, Clone, Default)]
pub struct LoadOptions {
    /// The owner had a custom day background (found in a separate file).
    /// Gates `TileBackgroundOld` for streams older than the tile fix.
    pub legacy_has_custom_day_background: bool,
}

// ── LoadReport ───────────────────────────────────────────────────────────────

/// Result of a clean pass.
#[derive(Debug, Clone, Serialize)]
pub struct LoadReport {
    pub version:         i32,
    pub blocks_read:     usize,
    pub fallback_source: FallbackSource,
    /// Context after the reconciler took its fields.
    pub context:         LegacyContext,
}

/// In-memory state plus the report of the pass that produced it.
#[derive(Debug, Clone, Serialize)]
pub struct Loaded {
    pub config: MemoryConfig,
    pub report: LoadReport,
}

// ── Decoding ─────────────────────────────────────────────────────────────────

/// Decode a whole stream into `collab`.
///
/// `on_block` is called after each block decoded successfully, with its id
/// and the offset of the id field.
pub fn decode<F>(
    bytes:    &[u8],
    options:  &LoadOptions,
    collab:   &mut Collaborators<'_>,
    mut on_block: F,
) -> Result<LoadReport>
where
    F: FnMut(BlockId, u64),
{
    let mut cur = Cursor::new(bytes);
    let version = cur.read_i32()?;
    let mut ctx = LegacyContext::with_custom_day_background(options.legacy_has_custom_day_background);
    tracing::debug!(version, len = bytes.len(), "reading legacy settings");

    let mut blocks_read = 0usize;
    while !cur.at_end() {
        let offset = cur.position();
        let raw_id = cur.read_u32()?;
        let id = dispatch::read_raw_setting(raw_id, &mut cur, version, &mut ctx, collab)?;
        blocks_read += 1;
        on_block(id, offset);
    }

    let fallback_source = apply_read_fallback_config(&mut ctx, &mut *collab.fallback);
    tracing::info!(version, blocks_read, ?fallback_source, "legacy settings loaded");
    Ok(LoadReport { version, blocks_read, fallback_source, context: ctx })
}

/// Decode into fresh in-memory state.
pub fn load(bytes: &[u8], options: &LoadOptions) -> Result<Loaded> {
    let mut config = MemoryConfig::default();
    let report = decode(bytes, options, &mut config.collaborators(), |_, _| {})?;
    Ok(Loaded { config, report })
}

/// Decode into fresh state; any fatal error yields the default state.
pub fn load_or_default(bytes: &[u8], options: &LoadOptions) -> MemoryConfig {
    match load(bytes, options) {
        Ok(loaded) => loaded.config,
        Err(e) => {
            tracing::warn!(error = %e, "legacy settings unreadable, using defaults");
            MemoryConfig::default()
        }
    }
}

/// Read a stream file in full and decode it.
pub fn load_file<P: AsRef<Path>>(path: P, options: &LoadOptions) -> Result<Loaded> {
    let bytes = std::fs::read(path.as_ref())?;
    load(&bytes, options)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SettingsError;

    fn stream(version: i32, blocks: &[(u32, &[u8])]) -> Vec<u8> {
        let mut out = version.to_be_bytes().to_vec();
        for (id, payload) in blocks {
            out.extend_from_slice(&id.to_be_bytes());
            out.extend_from_slice(payload);
        }
        out
    }

    #[test]
    fn version_only_stream_is_clean() {
        let loaded = load(&stream(2_000_000, &[]), &LoadOptions::default()).unwrap();
        assert_eq!(loaded.report.version, 2_000_000);
        assert_eq!(loaded.report.blocks_read, 0);
        assert_eq!(loaded.report.fallback_source, FallbackSource::LegacyFields);
    }

    #[test]
    fn empty_input_is_fatal() {
        assert!(matches!(load(&[], &LoadOptions::default()), Err(SettingsError::Stream(_))));
    }

    #[test]
    fn observer_sees_ids_and_offsets() {
        let bytes = stream(
            1_000_000,
            &[
                (BlockId::AutoStart.raw(), &1i32.to_be_bytes()),
                (BlockId::LangPackKey.raw(), &7u64.to_be_bytes()),
            ],
        );
        let mut seen = Vec::new();
        let mut config = MemoryConfig::default();
        let report = decode(&bytes, &LoadOptions::default(), &mut config.collaborators(), |id, at| {
            seen.push((id, at))
        })
        .unwrap();
        assert_eq!(seen, vec![(BlockId::AutoStart, 4), (BlockId::LangPackKey, 12)]);
        assert_eq!(report.context.lang_pack_key, 7);
        assert!(config.runtime.auto_start);
    }

    #[test]
    fn unknown_id_reports_its_offset() {
        let bytes = stream(1_000_000, &[(BlockId::AutoStart.raw(), &1i32.to_be_bytes()), (0x10, &[])]);
        match load(&bytes, &LoadOptions::default()) {
            Err(SettingsError::UnknownBlock { id, offset }) => {
                assert_eq!(id, 0x10);
                assert_eq!(offset, 12);
            }
            other => panic!("expected unknown block, got {other:?}"),
        }
    }
}
