//! Block identifiers of the historical settings stream.
//!
//! The id set is closed: every id that any released writer ever emitted has a
//! variant here, and ids are never reused.  Gaps in the numbering (`0x10`,
//! `0x1b`, `0x2a`..`0x2f`, `0x3c`..`0x3f`) were never written.

use serde::Serialize;

/// Format version below which a legacy tile flag is ignored unless the user
/// had a custom day background.
pub const TILE_BACKGROUND_FIX_VERSION: i32 = 8005;

macro_rules! block_ids {
    ($( $(#[$meta:meta])* $name:ident = $value:literal, )+) => {
        /// One historical block kind.  The discriminant is the on-disk id.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
        #[repr(u32)]
        pub enum BlockId {
            $( $(#[$meta])* $name = $value, )+
        }

        impl BlockId {
            /// Every known block kind, in id order.
            pub const ALL: &'static [BlockId] = &[ $( BlockId::$name, )+ ];

            /// Resolve an on-disk id.  Returns `None` for ids no writer emitted.
            pub fn from_raw(raw: u32) -> Option<Self> {
                match raw {
                    $( $value => Some(BlockId::$name), )+
                    _ => None,
                }
            }

            /// Historical name, for diagnostics only.
            pub fn name(self) -> &'static str {
                match self {
                    $( BlockId::$name => concat!("dbi", stringify!($name)), )+
                }
            }
        }
    };
}

block_ids! {
    Key                       = 0x00,
    User                      = 0x01,
    DcOptionOldOld            = 0x02,
    ChatSizeMaxOld            = 0x03,
    MutePeerOld               = 0x04,
    SendKeyOld                = 0x05,
    AutoStart                 = 0x06,
    StartMinimized            = 0x07,
    SoundFlashBounceNotifyOld = 0x08,
    WorkMode                  = 0x09,
    SeenTrayTooltip           = 0x0a,
    DesktopNotifyOld          = 0x0b,
    AutoUpdate                = 0x0c,
    LastUpdateCheck           = 0x0d,
    WindowPosition            = 0x0e,
    ConnectionTypeOld         = 0x0f,
    DefaultAttach             = 0x11,
    CatsAndDogs               = 0x12,
    ReplaceEmojiOld           = 0x13,
    AskDownloadPathOld        = 0x14,
    DownloadPathOldOld        = 0x15,
    ScaleOld                  = 0x16,
    EmojiTabOld               = 0x17,
    RecentEmojiOldOld         = 0x18,
    LoggedPhoneNumberOld      = 0x19,
    MutedPeersOld             = 0x1a,
    NotifyViewOld             = 0x1c,
    SendToMenu                = 0x1d,
    CompressPastedImageOld    = 0x1e,
    LangOld                   = 0x1f,
    LangFileOld               = 0x20,
    TileBackgroundOld         = 0x21,
    AutoLockOld               = 0x22,
    DialogLastPath            = 0x23,
    RecentEmojiOld            = 0x24,
    EmojiVariantsOld          = 0x25,
    RecentStickers            = 0x26,
    DcOptionOld               = 0x27,
    TryIPv6                   = 0x28,
    SongVolumeOld             = 0x29,
    WindowsNotificationsOld   = 0x30,
    IncludeMutedOld           = 0x31,
    MegagroupSizeMaxOld       = 0x32,
    DownloadPathOld           = 0x33,
    AutoDownloadOld           = 0x34,
    SavedGifsLimitOld         = 0x35,
    ShowingSavedGifsOld       = 0x36,
    AutoPlayOld               = 0x37,
    AdaptiveForWideOld        = 0x38,
    HiddenPinnedMessagesOld   = 0x39,
    RecentEmoji               = 0x3a,
    EmojiVariants             = 0x3b,
    DialogsModeOld            = 0x40,
    ModerateModeOld           = 0x41,
    VideoVolumeOld            = 0x42,
    StickersRecentLimitOld    = 0x43,
    NativeNotificationsOld    = 0x44,
    NotificationsCountOld     = 0x45,
    NotificationsCornerOld    = 0x46,
    ThemeKeyOld               = 0x47,
    DialogsWidthRatioOld      = 0x48,
    UseExternalVideoPlayer    = 0x49,
    DcOptionsOld              = 0x4a,
    MtpAuthorization          = 0x4b,
    LastSeenWarningSeenOld    = 0x4c,
    SessionSettings           = 0x4d,
    LangPackKey               = 0x4e,
    ConnectionType            = 0x4f,
    StickersFavedLimitOld     = 0x50,
    SuggestStickersByEmojiOld = 0x51,
    SuggestEmojiOld           = 0x52,
    TxtDomainStringOldOld     = 0x53,
    ThemeKey                  = 0x54,
    TileBackground            = 0x55,
    CacheSettingsOld          = 0x56,
    AnimationsDisabled        = 0x57,
    ScalePercent              = 0x58,
    PlaybackSpeedOld          = 0x59,
    LanguagesKey              = 0x5a,
    CallSettingsOld           = 0x5b,
    CacheSettings             = 0x5c,
    TxtDomainStringOld        = 0x5d,
    ApplicationSettings       = 0x5e,
    DialogsFiltersOld         = 0x5f,
    FallbackProductionConfig  = 0x60,
    BackgroundKey             = 0x61,
}

impl BlockId {
    #[inline]
    pub fn raw(self) -> u32 {
        self as u32
    }
}

// ── Connection type values (ConnectionType / ConnectionTypeOld) ──────────────

pub mod connection {
    pub const HTTP_PROXY:        i32 = 2;
    pub const TCP_PROXY:         i32 = 3;
    pub const PROXIES_LIST_OLD:  i32 = 4;
    pub const PROXIES_LIST:      i32 = 5;

    /// Proxy entry types at or above this value carry a `ProxyType` offset.
    pub const PROXY_TYPE_SHIFT:  i32 = 1024;
}
