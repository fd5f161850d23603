//! Post-pass merge of legacy fallback-config fields.
//!
//! Runs once, after the block stream was exhausted without a fatal error.  An
//! embedded current-format config wins outright; otherwise the scattered
//! legacy fields are applied one by one, each only if it was actually seen
//! (positive limit, non-empty string).  Consumed fields are moved out of the
//! context.

use serde::Serialize;
use std::mem;

use crate::collab::FallbackConfigStore;
use crate::context::LegacyContext;

/// Which path the reconciler took.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FallbackSource {
    /// Built from individual legacy fields.
    LegacyFields,
    /// Replaced from the embedded serialized config.
    Serialized,
}

pub fn apply_read_fallback_config(
    ctx:      &mut LegacyContext,
    fallback: &mut dyn FallbackConfigStore,
) -> FallbackSource {
    if !ctx.fallback_config.is_empty() {
        let serialized = mem::take(&mut ctx.fallback_config);
        tracing::debug!(len = serialized.len(), "fallback config replaced from embedded blob");
        fallback.construct_from_serialized(&serialized);
        return FallbackSource::Serialized;
    }

    let dc_options = mem::take(&mut ctx.fallback_legacy_dc_options);
    tracing::debug!(endpoints = dc_options.len(), "merging legacy fallback config fields");
    fallback.add_dc_options(dc_options);

    if ctx.fallback_legacy_chat_size_max > 0 {
        fallback.set_chat_size_max(ctx.fallback_legacy_chat_size_max);
    }
    if ctx.fallback_legacy_saved_gifs_limit > 0 {
        fallback.set_saved_gifs_limit(ctx.fallback_legacy_saved_gifs_limit);
    }
    if ctx.fallback_legacy_stickers_recent_limit > 0 {
        fallback.set_stickers_recent_limit(ctx.fallback_legacy_stickers_recent_limit);
    }
    if ctx.fallback_legacy_stickers_faved_limit > 0 {
        fallback.set_stickers_faved_limit(ctx.fallback_legacy_stickers_faved_limit);
    }
    if ctx.fallback_legacy_megagroup_size_max > 0 {
        fallback.set_megagroup_size_max(ctx.fallback_legacy_megagroup_size_max);
    }

    let txt_domain = mem::take(&mut ctx.fallback_legacy_txt_domain_string);
    if !txt_domain.is_empty() {
        fallback.set_txt_domain_string(txt_domain);
    }
    FallbackSource::LegacyFields
}
