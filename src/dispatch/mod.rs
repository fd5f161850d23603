//! Block dispatcher: one decode routine per historical block id.
//!
//! # Contract
//! [`read_setting`] is called with the cursor positioned at the first payload
//! byte of a block.  The routine reads the payload in exactly the order the
//! writer emitted it and only then applies the result, either through a
//! collaborator setter or into the [`LegacyContext`].  Any read failure is
//! propagated with `?` before anything is applied, so a failing block never
//! leaves a partial write behind.
//!
//! Unknown ids are fatal: payloads carry no length, so there is no way to skip
//! one and stay aligned with the blocks that follow.
//!
//! The larger routine families live in submodules:
//!
//! | Module | Blocks |
//! |--------|--------|
//! | [`cache`] | cache size/time limits with sentinel normalisation |
//! | [`emoji`] | recent emoji and skin-tone variants, legacy key remapping |
//! | [`media`] | auto-download bitmasks, auto-play, nested call settings |
//! | [`proxy`] | connection type and proxy lists |

pub mod cache;
pub mod emoji;
pub mod media;
pub mod proxy;

use crate::block::{BlockId, TILE_BACKGROUND_FIX_VERSION};
use crate::collab::{AppSetting, Collaborators, RuntimeSetting};
use crate::context::LegacyContext;
use crate::error::{Result, SettingsError};
use crate::model::{
    check_scale, LegacyAuthKey, NotifyView, ScreenCorner, SendFilesWay, SendSubmitWay,
    WindowPosition, WorkMode, AUTH_KEY_SIZE, SCALE_AUTO,
};
use crate::stream::Cursor;

/// Resolve a raw id and decode its block.  The cursor sits just past the
/// `u32` id.
pub fn read_raw_setting(
    raw_id:  u32,
    cur:     &mut Cursor<'_>,
    version: i32,
    ctx:     &mut LegacyContext,
    c:       &mut Collaborators<'_>,
) -> Result<BlockId> {
    let Some(id) = BlockId::from_raw(raw_id) else {
        let offset = cur.position().saturating_sub(4);
        tracing::error!(block_id = raw_id, offset, "unknown block id in settings stream");
        return Err(SettingsError::UnknownBlock { id: raw_id, offset });
    };
    read_setting(id, cur, version, ctx, c)?;
    Ok(id)
}

/// Decode one block and apply it.
pub fn read_setting(
    id:      BlockId,
    cur:     &mut Cursor<'_>,
    version: i32,
    ctx:     &mut LegacyContext,
    c:       &mut Collaborators<'_>,
) -> Result<()> {
    match id {
        // ── Endpoints and fallback config ───────────────────────────────────
        BlockId::DcOptionOldOld => {
            let dc_id = cur.read_u32()?;
            let _host = cur.read_string()?;
            let ip = cur.read_string()?;
            let port = cur.read_u32()?;
            ctx.fallback_legacy_dc_options.add_one(dc_id, 0, &ip, port);
        }
        BlockId::DcOptionOld => {
            let dc_id_with_shift = cur.read_u32()?;
            let flags = cur.read_i32()?;
            let ip = cur.read_string()?;
            let port = cur.read_u32()?;
            ctx.fallback_legacy_dc_options.add_one(dc_id_with_shift, flags, &ip, port);
        }
        BlockId::DcOptionsOld => {
            let serialized = cur.read_bytes()?;
            ctx.fallback_legacy_dc_options.construct_from_serialized(&serialized);
        }
        BlockId::ChatSizeMaxOld => ctx.fallback_legacy_chat_size_max = cur.read_i32()?,
        BlockId::SavedGifsLimitOld => ctx.fallback_legacy_saved_gifs_limit = cur.read_i32()?,
        BlockId::StickersRecentLimitOld => {
            ctx.fallback_legacy_stickers_recent_limit = cur.read_i32()?;
        }
        BlockId::StickersFavedLimitOld => {
            ctx.fallback_legacy_stickers_faved_limit = cur.read_i32()?;
        }
        BlockId::MegagroupSizeMaxOld => ctx.fallback_legacy_megagroup_size_max = cur.read_i32()?,
        BlockId::TxtDomainStringOld => {
            ctx.fallback_legacy_txt_domain_string = cur.read_string()?;
        }
        BlockId::FallbackProductionConfig => ctx.fallback_config = cur.read_bytes()?,

        // ── Authorization ───────────────────────────────────────────────────
        BlockId::User => {
            let user_id = cur.read_i32()?;
            let dc_id = cur.read_u32()?;
            tracing::debug!(dc_id, user_id, "legacy user found");
            ctx.mtp_legacy_main_dc_id = dc_id as i32;
            ctx.mtp_legacy_user_id = user_id;
        }
        BlockId::Key => {
            let dc_id = cur.read_i32()?;
            let data = cur.read_raw(AUTH_KEY_SIZE)?;
            ctx.mtp_legacy_keys.push(LegacyAuthKey { dc_id, data });
        }
        BlockId::MtpAuthorization => ctx.mtp_authorization = cur.read_bytes()?,

        // ── Current-format blobs ────────────────────────────────────────────
        BlockId::ApplicationSettings => {
            let serialized = cur.read_bytes()?;
            c.settings.add_from_serialized(&serialized);
        }
        BlockId::SessionSettings => {
            let serialized = cur.read_bytes()?;
            c.session.add_from_serialized(&serialized);
        }

        // ── Runtime flags ───────────────────────────────────────────────────
        BlockId::AutoStart => c.runtime.apply(RuntimeSetting::AutoStart(read_flag(cur)?)),
        BlockId::StartMinimized => {
            c.runtime.apply(RuntimeSetting::StartMinimized(read_flag(cur)?));
        }
        BlockId::SendToMenu => c.runtime.apply(RuntimeSetting::SendToMenu(read_flag(cur)?)),
        BlockId::UseExternalVideoPlayer => {
            c.runtime.apply(RuntimeSetting::UseExternalVideoPlayer(read_flag(cur)?));
        }
        BlockId::AnimationsDisabled => {
            c.runtime.apply(RuntimeSetting::AnimationsDisabled(read_flag(cur)?));
        }
        BlockId::SeenTrayTooltip => {
            c.runtime.apply(RuntimeSetting::SeenTrayTooltip(read_flag(cur)?));
        }
        BlockId::TryIPv6 => c.runtime.apply(RuntimeSetting::TryIpv6(read_flag(cur)?)),
        BlockId::AutoUpdate => {
            let enabled = read_flag(cur)?;
            c.runtime.apply(RuntimeSetting::AutoUpdate(enabled));
            if !c.runtime.updater_disabled() && !enabled {
                c.runtime.stop_update_checker();
            }
        }
        BlockId::LastUpdateCheck => {
            c.runtime.apply(RuntimeSetting::LastUpdateCheck(cur.read_i32()?));
        }
        BlockId::WorkMode => {
            let mode = WorkMode::from_raw(cur.read_i32()?);
            c.runtime.apply(RuntimeSetting::WorkMode(mode));
        }
        BlockId::WindowPosition => {
            let position = WindowPosition {
                x:         cur.read_i32()?,
                y:         cur.read_i32()?,
                w:         cur.read_i32()?,
                h:         cur.read_i32()?,
                moncrc:    cur.read_i32()?,
                maximized: cur.read_i32()?,
            };
            tracing::debug!(
                x = position.x,
                y = position.y,
                w = position.w,
                h = position.h,
                maximized = position.maximized,
                "window position read from storage"
            );
            c.runtime.apply(RuntimeSetting::WindowPosition(position));
        }
        BlockId::DialogLastPath => {
            c.runtime.apply(RuntimeSetting::DialogLastPath(cur.read_string()?));
        }
        BlockId::ScaleOld => {
            let stored = cur.read_i32()?;
            let scale = match stored {
                0 => SCALE_AUTO,
                1 => 100,
                2 => 125,
                3 => 150,
                4 => 200,
                _ => c.runtime.config_scale(),
            };
            c.runtime.apply(RuntimeSetting::ConfigScale(check_scale(scale)));
        }
        BlockId::ScalePercent => {
            let scale = cur.read_i32()?;
            // A non-auto scale at this point came from the command line.
            if c.runtime.config_scale() == SCALE_AUTO {
                c.runtime.apply(RuntimeSetting::ConfigScale(check_scale(scale)));
            }
        }

        // ── Application settings ────────────────────────────────────────────
        BlockId::SoundFlashBounceNotifyOld => {
            let v = cur.read_i32()?;
            c.settings.apply(AppSetting::SoundNotify((v & 0x01) == 0x01));
            c.settings.apply(AppSetting::FlashBounceNotify((v & 0x02) == 0x00));
        }
        BlockId::DesktopNotifyOld => c.settings.apply(AppSetting::DesktopNotify(read_flag(cur)?)),
        BlockId::NativeNotificationsOld => {
            c.settings.apply(AppSetting::NativeNotifications(read_flag(cur)?));
        }
        BlockId::NotificationsCountOld => {
            let v = cur.read_i32()?;
            c.settings.apply(AppSetting::NotificationsCount(if v > 0 { v } else { 3 }));
        }
        BlockId::NotificationsCornerOld => {
            let corner = ScreenCorner::from_raw(cur.read_i32()?);
            c.settings.apply(AppSetting::NotificationsCorner(corner));
        }
        BlockId::NotifyViewOld => {
            let view = NotifyView::from_raw(cur.read_i32()?);
            c.settings.apply(AppSetting::NotifyView(view));
        }
        BlockId::IncludeMutedOld => {
            c.settings.apply(AppSetting::IncludeMutedCounter(read_flag(cur)?));
        }
        BlockId::ModerateModeOld => {
            c.settings.apply(AppSetting::ModerateModeEnabled(read_flag(cur)?));
        }
        BlockId::DialogsWidthRatioOld => {
            let v = cur.read_i32()?;
            c.settings.apply(AppSetting::DialogsWidthRatio(f64::from(v) / 1_000_000.0));
        }
        BlockId::LastSeenWarningSeenOld => {
            c.settings.apply(AppSetting::LastSeenWarningSeen(read_flag(cur)?));
        }
        BlockId::AdaptiveForWideOld => {
            c.settings.apply(AppSetting::AdaptiveForWide(read_flag(cur)?));
        }
        BlockId::AutoLockOld => {
            c.settings.apply(AppSetting::AutoLock(cur.read_i32()?));
            c.runtime.notify_local_passcode_changed();
        }
        BlockId::ReplaceEmojiOld => c.settings.apply(AppSetting::ReplaceEmoji(read_flag(cur)?)),
        BlockId::SuggestEmojiOld => c.settings.apply(AppSetting::SuggestEmoji(read_flag(cur)?)),
        BlockId::SuggestStickersByEmojiOld => {
            c.settings.apply(AppSetting::SuggestStickersByEmoji(read_flag(cur)?));
        }
        BlockId::AskDownloadPathOld => {
            c.settings.apply(AppSetting::AskDownloadPath(read_flag(cur)?));
        }
        BlockId::DownloadPathOldOld => {
            let path = cur.read_string()?;
            c.settings.apply(AppSetting::DownloadPathBookmark(Vec::new()));
            c.settings.apply(AppSetting::DownloadPath(normalize_download_path(path)));
        }
        BlockId::DownloadPathOld => {
            let path = cur.read_string()?;
            let bookmark = cur.read_bytes()?;
            c.settings.apply(AppSetting::DownloadPathBookmark(bookmark));
            c.settings.apply(AppSetting::DownloadPath(normalize_download_path(path)));
        }
        BlockId::SendKeyOld => {
            let v = cur.read_i32()?;
            let way = SendSubmitWay::from_raw(v).ok_or(SettingsError::InvalidSendKey(v))?;
            c.settings.apply(AppSetting::SendSubmitWay(way));
        }
        BlockId::CompressPastedImageOld => {
            let way = if cur.read_i32()? == 1 { SendFilesWay::Album } else { SendFilesWay::Files };
            c.settings.apply(AppSetting::SendFilesWay(way));
        }
        BlockId::SongVolumeOld => {
            c.settings.apply(AppSetting::SongVolume(volume_from_stored(cur.read_i32()?)));
        }
        BlockId::VideoVolumeOld => {
            c.settings.apply(AppSetting::VideoVolume(volume_from_stored(cur.read_i32()?)));
        }
        BlockId::PlaybackSpeedOld => {
            c.settings.apply(AppSetting::VoiceMsgPlaybackDoubled(cur.read_i32()? == 2));
        }

        // ── Session settings ────────────────────────────────────────────────
        BlockId::DialogsFiltersOld => {
            c.session.set_dialogs_filters_enabled(read_flag(cur)?);
        }
        BlockId::HiddenPinnedMessagesOld => {
            let hidden = cur.read_map(|s| s.read_u64(), |s| s.read_i32())?;
            for (peer_id, msg_id) in hidden {
                c.session.set_hidden_pinned_message(peer_id, msg_id);
            }
        }
        BlockId::AutoDownloadOld => media::auto_download_old(cur, c)?,
        BlockId::AutoPlayOld => media::auto_play_old(cur, c)?,
        BlockId::CallSettingsOld => media::call_settings_old(cur, c)?,

        // ── Proxy ───────────────────────────────────────────────────────────
        BlockId::ConnectionTypeOld => proxy::connection_type_old(cur, c)?,
        BlockId::ConnectionType => proxy::connection_type(cur, c)?,

        // ── Cache ───────────────────────────────────────────────────────────
        BlockId::CacheSettingsOld => cache::cache_settings_old(cur, ctx)?,
        BlockId::CacheSettings => cache::cache_settings(cur, ctx)?,

        // ── Theme, background, language ─────────────────────────────────────
        BlockId::ThemeKeyOld => ctx.theme_key_legacy = cur.read_u64()?,
        BlockId::ThemeKey => {
            let key_day = cur.read_u64()?;
            let key_night = cur.read_u64()?;
            let night_mode = cur.read_u32()?;
            ctx.theme_key_day = key_day;
            ctx.theme_key_night = key_night;
            c.theme.set_night_mode(night_mode == 1);
        }
        BlockId::BackgroundKey => {
            let key_day = cur.read_u64()?;
            let key_night = cur.read_u64()?;
            ctx.background_key_day = key_day;
            ctx.background_key_night = key_night;
            ctx.background_keys_read = true;
        }
        BlockId::TileBackgroundOld => {
            let v = cur.read_i32()?;
            let tile = if version < TILE_BACKGROUND_FIX_VERSION
                && !ctx.legacy_has_custom_day_background
            {
                false
            } else {
                v == 1
            };
            // The single legacy flag lands on the palette that is not active.
            if c.theme.is_night_mode() {
                ctx.tile_day = tile;
            } else {
                ctx.tile_night = tile;
            }
            ctx.tile_read = true;
        }
        BlockId::TileBackground => {
            let tile_day = cur.read_i32()?;
            let tile_night = cur.read_i32()?;
            ctx.tile_day = tile_day != 0;
            ctx.tile_night = tile_night != 0;
            ctx.tile_read = true;
        }
        BlockId::LangPackKey => ctx.lang_pack_key = cur.read_u64()?,
        BlockId::LanguagesKey => ctx.languages_key = cur.read_u64()?,

        // ── Emoji and stickers ──────────────────────────────────────────────
        BlockId::RecentEmojiOldOld => emoji::recent_emoji_old_old(cur, c)?,
        BlockId::RecentEmojiOld => emoji::recent_emoji_old(cur, c)?,
        BlockId::RecentEmoji => {
            let recent = cur.read_vec(|s| Ok((s.read_string()?, s.read_u16()?)))?;
            c.emoji.set_recent_emoji(recent);
        }
        BlockId::EmojiVariantsOld => emoji::emoji_variants_old(cur, c)?,
        BlockId::EmojiVariants => {
            let variants = cur.read_map(|s| s.read_string(), |s| s.read_i32())?;
            c.emoji.set_emoji_variants(variants);
        }
        BlockId::RecentStickers => {
            let recent = cur.read_vec(|s| Ok((s.read_u64()?, s.read_u16()?)))?;
            c.emoji.set_recent_stickers(recent);
        }

        // ── Deprecated: read to stay aligned, then drop ─────────────────────
        BlockId::MutePeerOld => {
            cur.read_u64()?;
        }
        BlockId::MutedPeersOld => {
            let count = cur.read_u32()?;
            for _ in 0..count {
                cur.read_u64()?;
            }
        }
        BlockId::DialogsModeOld => {
            cur.read_i32()?;
            cur.read_i32()?;
        }
        BlockId::TxtDomainStringOldOld
        | BlockId::LangFileOld
        | BlockId::LoggedPhoneNumberOld => {
            cur.read_string()?;
        }
        BlockId::ShowingSavedGifsOld
        | BlockId::WindowsNotificationsOld
        | BlockId::LangOld
        | BlockId::CatsAndDogs
        | BlockId::DefaultAttach
        | BlockId::EmojiTabOld => {
            cur.read_i32()?;
        }
    }
    Ok(())
}

/// Legacy booleans are `i32` fields that are set only when exactly `1`.
fn read_flag(cur: &mut Cursor<'_>) -> Result<bool> {
    Ok(cur.read_i32()? == 1)
}

/// Stored volumes are millionths, clamped to `0.0..=1.0`.
fn volume_from_stored(v: i32) -> f64 {
    (f64::from(v) / 1e6).clamp(0.0, 1.0)
}

/// Directory paths get a trailing slash; empty and the `tmp` marker are kept.
fn normalize_download_path(mut path: String) -> String {
    if !path.is_empty() && path != "tmp" && !path.ends_with('/') {
        path.push('/');
    }
    path
}
