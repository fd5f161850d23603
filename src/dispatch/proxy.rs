//! Connection-type blocks: single proxies and proxy lists.
//!
//! Both routines finish by asking the registry to re-apply the global proxy.
//! Invalid entries inside a list are dropped without failing the block; the
//! stored selection index is shifted so it keeps pointing at the same entry.

use crate::block::connection::{HTTP_PROXY, PROXIES_LIST, PROXIES_LIST_OLD, TCP_PROXY};
use crate::collab::{Collaborators, ProxyRegistry};
use crate::error::Result;
use crate::model::{ProxyData, ProxySettings, ProxyType};
use crate::stream::Cursor;

/// `ConnectionTypeOld`: a connection type optionally followed by one proxy.
pub fn connection_type_old(cur: &mut Cursor<'_>, c: &mut Collaborators<'_>) -> Result<()> {
    let connection_type = cur.read_i32()?;
    let mut proxy = ProxyData::default();
    if connection_type == HTTP_PROXY || connection_type == TCP_PROXY {
        let host = cur.read_string()?;
        let port = cur.read_i32()?;
        let user = cur.read_string()?;
        let password = cur.read_string()?;
        proxy = ProxyData {
            proxy_type: if connection_type == TCP_PROXY {
                ProxyType::Socks5
            } else {
                ProxyType::Http
            },
            host,
            port: port as u32,
            user,
            password,
        };
    }

    if proxy.is_valid() {
        c.proxies.set_selected(proxy.clone());
        c.proxies.set_settings(ProxySettings::Enabled);
        c.proxies.set_list(vec![proxy]);
    } else {
        c.proxies.set_selected(ProxyData::default());
        c.proxies.set_settings(ProxySettings::System);
        c.proxies.set_list(Vec::new());
    }
    c.proxies.refresh();
    Ok(())
}

/// `ConnectionType`: either a proxy list (old or new layout) or one proxy.
pub fn connection_type(cur: &mut Cursor<'_>, c: &mut Collaborators<'_>) -> Result<()> {
    let connection_type = cur.read_i32()?;
    if connection_type == PROXIES_LIST_OLD || connection_type == PROXIES_LIST {
        let count = cur.read_i32()?;
        let index = cur.read_i32()?;
        let (settings, calls) = if connection_type == PROXIES_LIST {
            (Some(cur.read_i32()?), cur.read_i32()?)
        } else {
            (None, 0)
        };
        let mut list = ProxyList::new(count, index, calls, connection_type == PROXIES_LIST_OLD);
        for _ in 0..count.max(0) {
            list.push(read_proxy(cur)?);
        }
        list.apply(settings, &mut *c.proxies);
    } else {
        let proxy = read_proxy(cur)?;
        if proxy.is_valid() {
            let settings = if connection_type == TCP_PROXY || connection_type == HTTP_PROXY {
                ProxySettings::Enabled
            } else {
                ProxySettings::System
            };
            c.proxies.set_list(vec![proxy.clone()]);
            c.proxies.set_selected(proxy);
            c.proxies.set_settings(settings);
        } else {
            c.proxies.set_list(Vec::new());
            c.proxies.set_selected(ProxyData::default());
            c.proxies.set_settings(ProxySettings::System);
        }
    }
    c.proxies.refresh();
    Ok(())
}

fn read_proxy(cur: &mut Cursor<'_>) -> Result<ProxyData> {
    let stored_type = cur.read_i32()?;
    let host = cur.read_string()?;
    let port = cur.read_i32()?;
    let user = cur.read_string()?;
    let password = cur.read_string()?;
    Ok(ProxyData {
        proxy_type: ProxyType::from_stored(stored_type),
        host,
        port: port as u32,
        user,
        password,
    })
}

// ── List accumulation ────────────────────────────────────────────────────────

/// Valid entries collected so far plus the 1-based selection index.
///
/// The index is signed: in the old layout a negative value means "this entry,
/// but proxying disabled".  Arithmetic is done in `i64` so corrupt counts
/// cannot overflow.
struct ProxyList {
    entries: Vec<ProxyData>,
    index:   i64,
    calls:   i32,
    old:     bool,
}

impl ProxyList {
    fn new(count: i32, index: i32, calls: i32, old: bool) -> Self {
        let count = i64::from(count);
        let mut index = i64::from(index);
        let mut calls = calls;
        // Old writers folded the "use for calls" flag into the index.
        if old && index.abs() > count {
            calls = 1;
            index -= if index > 0 { count } else { -count };
        }
        Self { entries: Vec::new(), index, calls, old }
    }

    fn len(&self) -> i64 {
        self.entries.len() as i64
    }

    fn push(&mut self, proxy: ProxyData) {
        if proxy.is_valid() {
            self.entries.push(proxy);
        } else if self.index < -self.len() {
            self.index += 1;
        } else if self.index > self.len() {
            self.index -= 1;
        }
    }

    fn selected(&self) -> Option<&ProxyData> {
        if self.index > 0 && self.index <= self.len() {
            self.entries.get((self.index - 1) as usize)
        } else {
            None
        }
    }

    fn apply(mut self, stored_settings: Option<i32>, proxies: &mut dyn ProxyRegistry) {
        proxies.set_list(self.entries.clone());

        let settings = match stored_settings {
            Some(raw) => ProxySettings::from_raw(raw),
            None => {
                let enabled = self.selected().is_some();
                self.index = self.index.abs();
                Some(if enabled { ProxySettings::Enabled } else { ProxySettings::System })
            }
        };

        let selected = self.selected().cloned();
        let has_selection = selected.is_some();
        proxies.set_selected(selected.unwrap_or_default());

        let settings = match settings {
            Some(ProxySettings::Enabled) if has_selection => ProxySettings::Enabled,
            Some(ProxySettings::Enabled) | None => ProxySettings::System,
            Some(other) => other,
        };
        tracing::debug!(
            entries = self.entries.len(),
            selected = has_selection,
            ?settings,
            old_layout = self.old,
            "proxy list read"
        );
        proxies.set_settings(settings);
        proxies.set_use_for_calls(self.calls == 1);
    }
}
