//! Plain in-memory collaborators.
//!
//! Every store is a value type: it can be cloned, compared and dumped as JSON,
//! which is what the CLI prints and what the tests assert against.  Blobs in
//! current formats (application settings, session settings, fallback config)
//! are kept verbatim; decoding them belongs to their owners.

use serde::{Deserialize, Serialize};

use super::{
    AppSetting, Collaborators, EmojiStore, FallbackConfigStore, ProxyRegistry, RuntimeSetting,
    RuntimeState, SessionStore, SettingsStore, ThemeRegistry,
};
use crate::model::{
    AutoDownloadSettings, DcOptions, DownloadSource, DownloadType, EmojiVariants, NotifyView,
    ProxyData, ProxySettings, RecentEmoji, RecentStickers, ScreenCorner, SendFilesWay,
    SendSubmitWay, WindowPosition, WorkMode, SCALE_AUTO,
};
use std::collections::BTreeMap;

// ── Application settings ─────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemorySettings {
    pub sound_notify:               bool,
    pub flash_bounce_notify:        bool,
    pub desktop_notify:             bool,
    pub native_notifications:       bool,
    pub notifications_count:        i32,
    pub notifications_corner:       ScreenCorner,
    pub notify_view:                NotifyView,
    pub include_muted_counter:      bool,
    pub moderate_mode_enabled:      bool,
    pub dialogs_width_ratio:        f64,
    pub last_seen_warning_seen:     bool,
    pub adaptive_for_wide:          bool,
    pub auto_lock:                  i32,
    pub replace_emoji:              bool,
    pub suggest_emoji:              bool,
    pub suggest_stickers_by_emoji:  bool,
    pub ask_download_path:          bool,
    pub download_path:              String,
    #[serde(with = "hex")]
    pub download_path_bookmark:     Vec<u8>,
    pub send_submit_way:            SendSubmitWay,
    pub send_files_way:             SendFilesWay,
    pub song_volume:                f64,
    pub video_volume:               f64,
    pub voice_msg_playback_doubled: bool,
    pub call_output_device_id:      String,
    pub call_output_volume:         i32,
    pub call_input_device_id:       String,
    pub call_input_volume:          i32,
    pub call_audio_ducking_enabled: bool,
    /// Current-format blobs merged in stream order.
    #[serde(with = "hex_list")]
    pub serialized:                 Vec<Vec<u8>>,
}

impl Default for MemorySettings {
    fn default() -> Self {
        Self {
            sound_notify:               true,
            flash_bounce_notify:        true,
            desktop_notify:             true,
            native_notifications:       false,
            notifications_count:        3,
            notifications_corner:       ScreenCorner::BottomRight,
            notify_view:                NotifyView::ShowPreview,
            include_muted_counter:      true,
            moderate_mode_enabled:      false,
            dialogs_width_ratio:        0.0,
            last_seen_warning_seen:     false,
            adaptive_for_wide:          true,
            auto_lock:                  3600,
            replace_emoji:              true,
            suggest_emoji:              true,
            suggest_stickers_by_emoji:  true,
            ask_download_path:          false,
            download_path:              String::new(),
            download_path_bookmark:     Vec::new(),
            send_submit_way:            SendSubmitWay::Enter,
            send_files_way:             SendFilesWay::Album,
            song_volume:                0.9,
            video_volume:               0.9,
            voice_msg_playback_doubled: false,
            call_output_device_id:      "default".into(),
            call_output_volume:         100,
            call_input_device_id:       "default".into(),
            call_input_volume:          100,
            call_audio_ducking_enabled: true,
            serialized:                 Vec::new(),
        }
    }
}

impl SettingsStore for MemorySettings {
    fn apply(&mut self, setting: AppSetting) {
        match setting {
            AppSetting::SoundNotify(v)             => self.sound_notify = v,
            AppSetting::FlashBounceNotify(v)       => self.flash_bounce_notify = v,
            AppSetting::DesktopNotify(v)           => self.desktop_notify = v,
            AppSetting::NativeNotifications(v)     => self.native_notifications = v,
            AppSetting::NotificationsCount(v)      => self.notifications_count = v,
            AppSetting::NotificationsCorner(v)     => self.notifications_corner = v,
            AppSetting::NotifyView(v)              => self.notify_view = v,
            AppSetting::IncludeMutedCounter(v)     => self.include_muted_counter = v,
            AppSetting::ModerateModeEnabled(v)     => self.moderate_mode_enabled = v,
            AppSetting::DialogsWidthRatio(v)       => self.dialogs_width_ratio = v,
            AppSetting::LastSeenWarningSeen(v)     => self.last_seen_warning_seen = v,
            AppSetting::AdaptiveForWide(v)         => self.adaptive_for_wide = v,
            AppSetting::AutoLock(v)                => self.auto_lock = v,
            AppSetting::ReplaceEmoji(v)            => self.replace_emoji = v,
            AppSetting::SuggestEmoji(v)            => self.suggest_emoji = v,
            AppSetting::SuggestStickersByEmoji(v)  => self.suggest_stickers_by_emoji = v,
            AppSetting::AskDownloadPath(v)         => self.ask_download_path = v,
            AppSetting::DownloadPath(v)            => self.download_path = v,
            AppSetting::DownloadPathBookmark(v)    => self.download_path_bookmark = v,
            AppSetting::SendSubmitWay(v)           => self.send_submit_way = v,
            AppSetting::SendFilesWay(v)            => self.send_files_way = v,
            AppSetting::SongVolume(v)              => self.song_volume = v,
            AppSetting::VideoVolume(v)             => self.video_volume = v,
            AppSetting::VoiceMsgPlaybackDoubled(v) => self.voice_msg_playback_doubled = v,
            AppSetting::CallOutputDeviceId(v)      => self.call_output_device_id = v,
            AppSetting::CallOutputVolume(v)        => self.call_output_volume = v,
            AppSetting::CallInputDeviceId(v)       => self.call_input_device_id = v,
            AppSetting::CallInputVolume(v)         => self.call_input_volume = v,
            AppSetting::CallAudioDuckingEnabled(v) => self.call_audio_ducking_enabled = v,
        }
    }

    fn add_from_serialized(&mut self, serialized: &[u8]) {
        self.serialized.push(serialized.to_vec());
    }
}

// ── Session settings ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MemorySession {
    pub auto_download:           AutoDownloadSettings,
    pub dialogs_filters_enabled: bool,
    pub hidden_pinned_messages:  BTreeMap<u64, i32>,
    #[serde(with = "hex_list")]
    pub serialized:              Vec<Vec<u8>>,
}

impl SessionStore for MemorySession {
    fn set_bytes_limit(&mut self, source: DownloadSource, kind: DownloadType, limit: i64) {
        self.auto_download.set_bytes_limit(source, kind, limit);
    }

    fn set_dialogs_filters_enabled(&mut self, enabled: bool) {
        self.dialogs_filters_enabled = enabled;
    }

    fn set_hidden_pinned_message(&mut self, peer_id: u64, msg_id: i32) {
        self.hidden_pinned_messages.insert(peer_id, msg_id);
    }

    fn add_from_serialized(&mut self, serialized: &[u8]) {
        self.serialized.push(serialized.to_vec());
    }
}

// ── Proxies ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MemoryProxies {
    pub list:           Vec<ProxyData>,
    pub selected:       ProxyData,
    pub settings:       ProxySettings,
    pub use_for_calls:  bool,
    /// Number of refresh requests; each proxy block issues exactly one.
    pub refreshes:      u32,
}

impl ProxyRegistry for MemoryProxies {
    fn set_list(&mut self, list: Vec<ProxyData>) { self.list = list; }
    fn set_selected(&mut self, proxy: ProxyData) { self.selected = proxy; }
    fn set_settings(&mut self, settings: ProxySettings) { self.settings = settings; }
    fn set_use_for_calls(&mut self, enabled: bool) { self.use_for_calls = enabled; }
    fn refresh(&mut self) { self.refreshes += 1; }
}

// ── Runtime ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemoryRuntime {
    pub auto_start:                bool,
    pub start_minimized:           bool,
    pub send_to_menu:              bool,
    pub use_external_video_player: bool,
    pub animations_disabled:       bool,
    pub seen_tray_tooltip:         bool,
    pub auto_update:               bool,
    pub last_update_check:         i32,
    pub try_ipv6:                  bool,
    pub work_mode:                 WorkMode,
    pub config_scale:              i32,
    pub window_position:           WindowPosition,
    pub dialog_last_path:          String,
    pub updater_disabled:          bool,
    pub update_checker_stopped:    bool,
    pub passcode_notifications:    u32,
}

impl Default for MemoryRuntime {
    fn default() -> Self {
        Self {
            auto_start:                false,
            start_minimized:           false,
            send_to_menu:              false,
            use_external_video_player: false,
            animations_disabled:       false,
            seen_tray_tooltip:         false,
            auto_update:               true,
            last_update_check:         0,
            try_ipv6:                  false,
            work_mode:                 WorkMode::WindowAndTray,
            config_scale:              SCALE_AUTO,
            window_position:           WindowPosition::default(),
            dialog_last_path:          String::new(),
            updater_disabled:          false,
            update_checker_stopped:    false,
            passcode_notifications:    0,
        }
    }
}

impl RuntimeState for MemoryRuntime {
    fn apply(&mut self, setting: RuntimeSetting) {
        match setting {
            RuntimeSetting::AutoStart(v)              => self.auto_start = v,
            RuntimeSetting::StartMinimized(v)         => self.start_minimized = v,
            RuntimeSetting::SendToMenu(v)             => self.send_to_menu = v,
            RuntimeSetting::UseExternalVideoPlayer(v) => self.use_external_video_player = v,
            RuntimeSetting::AnimationsDisabled(v)     => self.animations_disabled = v,
            RuntimeSetting::SeenTrayTooltip(v)        => self.seen_tray_tooltip = v,
            RuntimeSetting::AutoUpdate(v)             => self.auto_update = v,
            RuntimeSetting::LastUpdateCheck(v)        => self.last_update_check = v,
            RuntimeSetting::TryIpv6(v)                => self.try_ipv6 = v,
            RuntimeSetting::WorkMode(v)               => self.work_mode = v,
            RuntimeSetting::ConfigScale(v)            => self.config_scale = v,
            RuntimeSetting::WindowPosition(v)         => self.window_position = v,
            RuntimeSetting::DialogLastPath(v)         => self.dialog_last_path = v,
        }
    }

    fn config_scale(&self) -> i32 { self.config_scale }
    fn updater_disabled(&self) -> bool { self.updater_disabled }
    fn stop_update_checker(&mut self) { self.update_checker_stopped = true; }
    fn notify_local_passcode_changed(&mut self) { self.passcode_notifications += 1; }
}

// ── Theme ────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemoryTheme {
    pub night_mode: bool,
}

impl ThemeRegistry for MemoryTheme {
    fn is_night_mode(&self) -> bool { self.night_mode }
    fn set_night_mode(&mut self, night: bool) { self.night_mode = night; }
}

// ── Emoji ────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemoryEmoji {
    pub recent_emoji:    RecentEmoji,
    pub recent_stickers: RecentStickers,
    pub variants:        EmojiVariants,
}

impl EmojiStore for MemoryEmoji {
    fn set_recent_emoji(&mut self, recent: RecentEmoji) { self.recent_emoji = recent; }
    fn set_recent_stickers(&mut self, recent: RecentStickers) { self.recent_stickers = recent; }
    fn set_emoji_variants(&mut self, variants: EmojiVariants) { self.variants = variants; }
}

// ── Fallback config ──────────────────────────────────────────────────────────

/// Fallback production configuration.  Zero / empty means "built-in default".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FallbackConfig {
    pub dc_options:            DcOptions,
    pub chat_size_max:         i32,
    pub saved_gifs_limit:      i32,
    pub stickers_recent_limit: i32,
    pub stickers_faved_limit:  i32,
    pub megagroup_size_max:    i32,
    pub txt_domain_string:     String,
    /// Set when the configuration was replaced by an embedded blob.
    #[serde(with = "hex")]
    pub serialized:            Vec<u8>,
}

impl FallbackConfigStore for FallbackConfig {
    fn add_dc_options(&mut self, options: DcOptions) { self.dc_options.add_from_other(options); }
    fn set_chat_size_max(&mut self, value: i32) { self.chat_size_max = value; }
    fn set_saved_gifs_limit(&mut self, value: i32) { self.saved_gifs_limit = value; }
    fn set_stickers_recent_limit(&mut self, value: i32) { self.stickers_recent_limit = value; }
    fn set_stickers_faved_limit(&mut self, value: i32) { self.stickers_faved_limit = value; }
    fn set_megagroup_size_max(&mut self, value: i32) { self.megagroup_size_max = value; }
    fn set_txt_domain_string(&mut self, value: String) { self.txt_domain_string = value; }

    fn construct_from_serialized(&mut self, serialized: &[u8]) {
        *self = FallbackConfig {
            serialized: serialized.to_vec(),
            ..FallbackConfig::default()
        };
    }
}

// ── Aggregate ────────────────────────────────────────────────────────────────

/// Every collaborator in one value.  `Default` is the fallback state a failed
/// load resets to.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MemoryConfig {
    pub settings: MemorySettings,
    pub session:  MemorySession,
    pub proxies:  MemoryProxies,
    pub runtime:  MemoryRuntime,
    pub theme:    MemoryTheme,
    pub emoji:    MemoryEmoji,
    pub fallback: FallbackConfig,
}

impl MemoryConfig {
    pub fn collaborators(&mut self) -> Collaborators<'_> {
        Collaborators {
            settings: &mut self.settings,
            session:  &mut self.session,
            proxies:  &mut self.proxies,
            runtime:  &mut self.runtime,
            theme:    &mut self.theme,
            emoji:    &mut self.emoji,
            fallback: &mut self.fallback,
        }
    }
}

mod hex_list {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(blobs: &[Vec<u8>], s: S) -> Result<S::Ok, S::Error> {
        s.collect_seq(blobs.iter().map(hex::encode))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<Vec<u8>>, D::Error> {
        Vec::<String>::deserialize(d)?
            .into_iter()
            .map(|s| hex::decode(s).map_err(serde::de::Error::custom))
            .collect()
    }
}
