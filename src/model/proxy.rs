//! Proxy entries and the registry-wide proxy mode.

use serde::{Deserialize, Serialize};

use crate::block::connection::{HTTP_PROXY, PROXY_TYPE_SHIFT, TCP_PROXY};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[repr(i32)]
pub enum ProxyType {
    #[default]
    None    = 0,
    Socks5  = 1,
    Http    = 2,
    Mtproto = 3,
}

impl ProxyType {
    /// Map the type field of a stored proxy entry.
    ///
    /// Early writers stored the connection type (`TCP_PROXY`, `HTTP_PROXY`);
    /// later ones stored `PROXY_TYPE_SHIFT + ProxyType`.
    pub fn from_stored(raw: i32) -> Self {
        match raw {
            TCP_PROXY => ProxyType::Socks5,
            HTTP_PROXY => ProxyType::Http,
            r if r == PROXY_TYPE_SHIFT + ProxyType::Socks5 as i32 => ProxyType::Socks5,
            r if r == PROXY_TYPE_SHIFT + ProxyType::Http as i32 => ProxyType::Http,
            r if r == PROXY_TYPE_SHIFT + ProxyType::Mtproto as i32 => ProxyType::Mtproto,
            _ => ProxyType::None,
        }
    }
}

/// Registry-wide proxy mode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[repr(i32)]
pub enum ProxySettings {
    #[default]
    System   = 0,
    Enabled  = 1,
    Disabled = 2,
}

impl ProxySettings {
    pub fn from_raw(raw: i32) -> Option<Self> {
        match raw {
            0 => Some(ProxySettings::System),
            1 => Some(ProxySettings::Enabled),
            2 => Some(ProxySettings::Disabled),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProxyData {
    pub proxy_type: ProxyType,
    pub host:       String,
    pub port:       u32,
    pub user:       String,
    pub password:   String,
}

impl ProxyData {
    /// An entry is usable when it names a type, a host and a port, and an
    /// MTProto entry additionally carries a well-formed secret.
    pub fn is_valid(&self) -> bool {
        if self.proxy_type == ProxyType::None || self.host.is_empty() || self.port == 0 {
            return false;
        }
        self.proxy_type != ProxyType::Mtproto || valid_mtproto_secret(&self.password)
    }
}

/// Accepts the plain (32 hex), padded (`dd` + 32 hex) and fake-TLS
/// (`ee` + 32 hex + hex domain) secret forms.
pub fn valid_mtproto_secret(secret: &str) -> bool {
    let is_hex = |s: &str| !s.is_empty() && s.bytes().all(|b| b.is_ascii_hexdigit());
    match secret.len() {
        32 => is_hex(secret),
        34 if secret.starts_with("dd") => is_hex(secret),
        n if n >= 36 && n % 2 == 0 && secret.starts_with("ee") => is_hex(secret),
        _ => false,
    }
}
