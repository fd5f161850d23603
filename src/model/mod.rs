//! Value types shared by the dispatcher, the collaborators and the reconciler.

pub mod auto_download;
pub mod dc_options;
pub mod proxy;

use serde::{Deserialize, Serialize};

pub use auto_download::{AutoDownloadSettings, DownloadSource, DownloadType};
pub use dc_options::{DcEndpoint, DcOptions};
pub use proxy::{ProxyData, ProxySettings, ProxyType};

/// Emoji identity in the current scheme (the emoji text itself).
pub type EmojiId = String;

/// Recent emoji with their use counters.
pub type RecentEmoji = Vec<(EmojiId, u16)>;

/// Recent sticker document ids with their use counters.
pub type RecentStickers = Vec<(u64, u16)>;

/// Selected skin-tone index per emoji.
pub type EmojiVariants = std::collections::BTreeMap<EmojiId, i32>;

/// Scale value meaning "follow the system".
pub const SCALE_AUTO: i32 = 0;
pub const SCALE_MIN:  i32 = 50;
pub const SCALE_MAX:  i32 = 300;

/// Clamp a stored interface scale to the supported range, keeping `auto`.
pub fn check_scale(scale: i32) -> i32 {
    if scale == SCALE_AUTO {
        SCALE_AUTO
    } else {
        scale.clamp(SCALE_MIN, SCALE_MAX)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum WorkMode {
    #[default]
    WindowAndTray,
    TrayOnly,
    WindowOnly,
}

impl WorkMode {
    /// Unknown values fall back to window-and-tray.
    pub fn from_raw(raw: i32) -> Self {
        match raw {
            1 => WorkMode::TrayOnly,
            2 => WorkMode::WindowOnly,
            _ => WorkMode::WindowAndTray,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum NotifyView {
    #[default]
    ShowPreview,
    ShowName,
    ShowNothing,
}

impl NotifyView {
    pub fn from_raw(raw: i32) -> Self {
        match raw {
            2 => NotifyView::ShowNothing,
            1 => NotifyView::ShowName,
            _ => NotifyView::ShowPreview,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScreenCorner {
    TopLeft,
    TopRight,
    #[default]
    BottomRight,
    BottomLeft,
}

impl ScreenCorner {
    /// Values outside `0..4` fall back to bottom right.
    pub fn from_raw(raw: i32) -> Self {
        match raw {
            0 => ScreenCorner::TopLeft,
            1 => ScreenCorner::TopRight,
            3 => ScreenCorner::BottomLeft,
            _ => ScreenCorner::BottomRight,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SendSubmitWay {
    #[default]
    Enter,
    CtrlEnter,
}

impl SendSubmitWay {
    /// Strict: any other stored value is corrupt.
    pub fn from_raw(raw: i32) -> Option<Self> {
        match raw {
            0 => Some(SendSubmitWay::Enter),
            1 => Some(SendSubmitWay::CtrlEnter),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SendFilesWay {
    #[default]
    Album,
    Files,
}

/// Main window geometry as last saved.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowPosition {
    pub x:         i32,
    pub y:         i32,
    pub w:         i32,
    pub h:         i32,
    /// CRC of the monitor name the window was on.
    pub moncrc:    i32,
    pub maximized: i32,
}

/// A legacy per-datacenter authorization key.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegacyAuthKey {
    pub dc_id: i32,
    #[serde(with = "hex")]
    pub data:  Vec<u8>,
}

/// Byte length of a legacy authorization key.
pub const AUTH_KEY_SIZE: usize = 256;

impl std::fmt::Debug for LegacyAuthKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Never print key material.
        f.debug_struct("LegacyAuthKey")
            .field("dc_id", &self.dc_id)
            .field("len", &self.data.len())
            .finish()
    }
}
