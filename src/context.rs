//! Accumulator for values that cannot be applied while the stream is read.
//!
//! A [`LegacyContext`] lives for one load attempt.  Blocks overwrite its
//! fields (last write wins) except the endpoint table, which accumulates, and
//! the legacy key list, which appends.  After a clean pass the reconciler
//! moves the fallback-config fields out; the rest is handed to the host.

use serde::Serialize;

use crate::model::{DcOptions, LegacyAuthKey};

#[derive(Debug, Clone, Serialize)]
pub struct LegacyContext {
    // ── Fallback config (consumed by the reconciler) ────────────────────────
    pub fallback_legacy_dc_options:             DcOptions,
    pub fallback_legacy_chat_size_max:          i32,
    pub fallback_legacy_saved_gifs_limit:       i32,
    pub fallback_legacy_stickers_recent_limit:  i32,
    pub fallback_legacy_stickers_faved_limit:   i32,
    pub fallback_legacy_megagroup_size_max:     i32,
    pub fallback_legacy_txt_domain_string:      String,
    /// Embedded current-format fallback config; wins over every field above.
    #[serde(with = "hex")]
    pub fallback_config:                        Vec<u8>,

    // ── Cache limits (`0` time = unlimited) ─────────────────────────────────
    pub cache_total_size_limit:                 i64,
    pub cache_total_time_limit:                 i32,
    pub cache_big_file_total_size_limit:        i64,
    pub cache_big_file_total_time_limit:        i32,

    // ── Theme and background ────────────────────────────────────────────────
    pub theme_key_legacy:                       u64,
    pub theme_key_day:                          u64,
    pub theme_key_night:                        u64,
    pub background_key_day:                     u64,
    pub background_key_night:                   u64,
    pub background_keys_read:                   bool,
    pub tile_day:                               bool,
    pub tile_night:                             bool,
    pub tile_read:                              bool,
    /// Known before the pass; gates the legacy tile flag.
    pub legacy_has_custom_day_background:       bool,

    // ── Language ────────────────────────────────────────────────────────────
    pub lang_pack_key:                          u64,
    pub languages_key:                          u64,

    // ── Authorization ───────────────────────────────────────────────────────
    #[serde(with = "hex")]
    pub mtp_authorization:                      Vec<u8>,
    pub mtp_legacy_keys:                        Vec<LegacyAuthKey>,
    pub mtp_legacy_main_dc_id:                  i32,
    pub mtp_legacy_user_id:                     i32,
}

impl Default for LegacyContext {
    fn default() -> Self {
        Self {
            fallback_legacy_dc_options:            DcOptions::new(),
            fallback_legacy_chat_size_max:         0,
            fallback_legacy_saved_gifs_limit:      0,
            fallback_legacy_stickers_recent_limit: 0,
            fallback_legacy_stickers_faved_limit:  0,
            fallback_legacy_megagroup_size_max:    0,
            fallback_legacy_txt_domain_string:     String::new(),
            fallback_config:                       Vec::new(),
            cache_total_size_limit:                0,
            cache_total_time_limit:                0,
            cache_big_file_total_size_limit:       0,
            cache_big_file_total_time_limit:       0,
            theme_key_legacy:                      0,
            theme_key_day:                         0,
            theme_key_night:                       0,
            background_key_day:                    0,
            background_key_night:                  0,
            background_keys_read:                  false,
            tile_day:                              false,
            tile_night:                            true,
            tile_read:                             false,
            legacy_has_custom_day_background:      false,
            lang_pack_key:                         0,
            languages_key:                         0,
            mtp_authorization:                     Vec::new(),
            mtp_legacy_keys:                       Vec::new(),
            mtp_legacy_main_dc_id:                 0,
            mtp_legacy_user_id:                    0,
        }
    }
}

impl LegacyContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// A context for a stream whose owner had a custom day background.
    pub fn with_custom_day_background(has_custom: bool) -> Self {
        Self {
            legacy_has_custom_day_background: has_custom,
            ..Self::default()
        }
    }

    /// Whether a cache settings block was decoded.
    pub fn has_cache_limits(&self) -> bool {
        self.cache_total_size_limit > 0
    }
}
