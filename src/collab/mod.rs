//! Interfaces of the configuration objects the decoder writes into.
//!
//! The decoder never owns configuration.  A load borrows one handle per
//! collaborator for the duration of the pass through [`Collaborators`] and
//! calls setters in stream order, so later blocks of the same field win.
//! [`memory`] holds plain in-memory implementations used by the CLI and by
//! tests.

pub mod memory;

use crate::model::{
    DcOptions, DownloadSource, DownloadType, EmojiId, EmojiVariants, NotifyView, ProxyData,
    ProxySettings, RecentEmoji, RecentStickers, ScreenCorner, SendFilesWay, SendSubmitWay,
    WindowPosition, WorkMode,
};

// ── Setting values ───────────────────────────────────────────────────────────

/// One named field of the application settings store.
#[derive(Debug, Clone, PartialEq)]
pub enum AppSetting {
    SoundNotify(bool),
    FlashBounceNotify(bool),
    DesktopNotify(bool),
    NativeNotifications(bool),
    NotificationsCount(i32),
    NotificationsCorner(ScreenCorner),
    NotifyView(NotifyView),
    IncludeMutedCounter(bool),
    ModerateModeEnabled(bool),
    DialogsWidthRatio(f64),
    LastSeenWarningSeen(bool),
    AdaptiveForWide(bool),
    AutoLock(i32),
    ReplaceEmoji(bool),
    SuggestEmoji(bool),
    SuggestStickersByEmoji(bool),
    AskDownloadPath(bool),
    DownloadPath(String),
    DownloadPathBookmark(Vec<u8>),
    SendSubmitWay(SendSubmitWay),
    SendFilesWay(SendFilesWay),
    SongVolume(f64),
    VideoVolume(f64),
    VoiceMsgPlaybackDoubled(bool),
    CallOutputDeviceId(String),
    CallOutputVolume(i32),
    CallInputDeviceId(String),
    CallInputVolume(i32),
    CallAudioDuckingEnabled(bool),
}

/// One process-wide runtime flag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuntimeSetting {
    AutoStart(bool),
    StartMinimized(bool),
    SendToMenu(bool),
    UseExternalVideoPlayer(bool),
    AnimationsDisabled(bool),
    SeenTrayTooltip(bool),
    AutoUpdate(bool),
    /// Unix seconds.
    LastUpdateCheck(i32),
    TryIpv6(bool),
    WorkMode(WorkMode),
    /// Already range-checked.
    ConfigScale(i32),
    WindowPosition(WindowPosition),
    DialogLastPath(String),
}

// ── Collaborator traits ──────────────────────────────────────────────────────

/// Application-wide settings store.
pub trait SettingsStore {
    fn apply(&mut self, setting: AppSetting);
    /// Merge a current-format settings blob embedded in the legacy stream.
    fn add_from_serialized(&mut self, serialized: &[u8]);
}

/// Per-account session settings.
pub trait SessionStore {
    fn set_bytes_limit(&mut self, source: DownloadSource, kind: DownloadType, limit: i64);
    fn set_dialogs_filters_enabled(&mut self, enabled: bool);
    fn set_hidden_pinned_message(&mut self, peer_id: u64, msg_id: i32);
    fn add_from_serialized(&mut self, serialized: &[u8]);
}

pub trait ProxyRegistry {
    /// Replace the whole list.
    fn set_list(&mut self, list: Vec<ProxyData>);
    /// An empty (invalid) entry means "nothing selected".
    fn set_selected(&mut self, proxy: ProxyData);
    fn set_settings(&mut self, settings: ProxySettings);
    fn set_use_for_calls(&mut self, enabled: bool);
    /// Re-apply the global proxy after a proxy block changed it.
    fn refresh(&mut self);
}

/// Process-wide runtime state.
pub trait RuntimeState {
    fn apply(&mut self, setting: RuntimeSetting);
    /// Scale set before the load (e.g. on the command line); `SCALE_AUTO` if none.
    fn config_scale(&self) -> i32;
    /// Whether this build has the updater compiled out or disabled.
    fn updater_disabled(&self) -> bool;
    fn stop_update_checker(&mut self);
    fn notify_local_passcode_changed(&mut self);
}

pub trait ThemeRegistry {
    fn is_night_mode(&self) -> bool;
    fn set_night_mode(&mut self, night: bool);
}

/// Recent emoji, sticker and skin-tone caches, plus legacy key resolution.
pub trait EmojiStore {
    fn set_recent_emoji(&mut self, recent: RecentEmoji);
    fn set_recent_stickers(&mut self, recent: RecentStickers);
    fn set_emoji_variants(&mut self, variants: EmojiVariants);

    /// Resolve a legacy packed UTF-16 key.  The default accepts any key that
    /// unpacks into valid, non-empty text.
    fn id_from_old_key(&self, key: u64) -> Option<EmojiId> {
        unpack_old_key(key)
    }

    /// Resolve a legacy skin-tone modifier key to a colour index (1..=5).
    /// Only the low 32 bits (the modifier's surrogate pair) are significant,
    /// so full emoji+modifier keys resolve as well.
    fn color_index_from_old_key(&self, key: u64) -> Option<i32> {
        match key & 0xFFFF_FFFF {
            modifier @ 0xD83C_DFFB..=0xD83C_DFFF => Some((modifier - 0xD83C_DFFA) as i32),
            _ => None,
        }
    }
}

/// The long-lived fallback network configuration.
pub trait FallbackConfigStore {
    fn add_dc_options(&mut self, options: DcOptions);
    fn set_chat_size_max(&mut self, value: i32);
    fn set_saved_gifs_limit(&mut self, value: i32);
    fn set_stickers_recent_limit(&mut self, value: i32);
    fn set_stickers_faved_limit(&mut self, value: i32);
    fn set_megagroup_size_max(&mut self, value: i32);
    fn set_txt_domain_string(&mut self, value: String);
    /// Replace the whole configuration from an embedded serialized config.
    fn construct_from_serialized(&mut self, serialized: &[u8]);
}

/// Split a legacy emoji key into its UTF-16 code units, most significant
/// first, skipping zero padding.
pub fn unpack_old_key(key: u64) -> Option<EmojiId> {
    let units: Vec<u16> = (0..4)
        .rev()
        .map(|i| (key >> (i * 16)) as u16)
        .skip_while(|&u| u == 0)
        .collect();
    if units.is_empty() {
        return None;
    }
    String::from_utf16(&units).ok()
}

// ── Handle bundle ────────────────────────────────────────────────────────────

/// Borrowed handles to every collaborator, valid for one decode pass.
pub struct Collaborators<'a> {
    pub settings: &'a mut dyn SettingsStore,
    pub session:  &'a mut dyn SessionStore,
    pub proxies:  &'a mut dyn ProxyRegistry,
    pub runtime:  &'a mut dyn RuntimeState,
    pub theme:    &'a mut dyn ThemeRegistry,
    pub emoji:    &'a mut dyn EmojiStore,
    pub fallback: &'a mut dyn FallbackConfigStore,
}
