//! Legacy emoji blocks keyed by packed UTF-16 code units.
//!
//! Keys are resolved through [`EmojiStore::id_from_old_key`]; entries whose
//! key no longer resolves are dropped.

use crate::collab::{Collaborators, EmojiStore};
use crate::error::Result;
use crate::model::{EmojiVariants, RecentEmoji};
use crate::stream::Cursor;

/// The oldest writer stored only the first regional indicator of some flags.
const TRUNCATED_FLAG_KEYS: [(u64, u64); 10] = [
    (0xD83C_DDEF, 0xD83C_DDEF_D83C_DDF5),
    (0xD83C_DDF0, 0xD83C_DDF0_D83C_DDF7),
    (0xD83C_DDE9, 0xD83C_DDE9_D83C_DDEA),
    (0xD83C_DDE8, 0xD83C_DDE8_D83C_DDF3),
    (0xD83C_DDFA, 0xD83C_DDFA_D83C_DDF8),
    (0xD83C_DDEB, 0xD83C_DDEB_D83C_DDF7),
    (0xD83C_DDEA, 0xD83C_DDEA_D83C_DDF8),
    (0xD83C_DDEE, 0xD83C_DDEE_D83C_DDF9),
    (0xD83C_DDF7, 0xD83C_DDF7_D83C_DDFA),
    (0xD83C_DDEC, 0xD83C_DDEC_D83C_DDE7),
];

/// Complete a truncated flag key; every other key is returned unchanged.
pub fn fix_truncated_flag_key(key: u64) -> u64 {
    TRUNCATED_FLAG_KEYS
        .iter()
        .find(|&&(short, _)| short == key)
        .map_or(key, |&(_, full)| full)
}

/// `RecentEmojiOldOld`: `vec<(u32 key, u16 count)>`.
pub fn recent_emoji_old_old(cur: &mut Cursor<'_>, c: &mut Collaborators<'_>) -> Result<()> {
    let stored = cur.read_vec(|s| Ok((s.read_u32()?, s.read_u16()?)))?;
    if stored.is_empty() {
        return Ok(());
    }
    let keys = stored
        .into_iter()
        .map(|(key, count)| (fix_truncated_flag_key(u64::from(key)), count));
    let recent = resolve_recent(&*c.emoji, keys);
    c.emoji.set_recent_emoji(recent);
    Ok(())
}

/// `RecentEmojiOld`: `vec<(u64 key, u16 count)>`.
pub fn recent_emoji_old(cur: &mut Cursor<'_>, c: &mut Collaborators<'_>) -> Result<()> {
    let stored = cur.read_vec(|s| Ok((s.read_u64()?, s.read_u16()?)))?;
    if stored.is_empty() {
        return Ok(());
    }
    let recent = resolve_recent(&*c.emoji, stored);
    c.emoji.set_recent_emoji(recent);
    Ok(())
}

/// `EmojiVariantsOld`: `map<u32 key, u64 colour key>`.  Always replaces the
/// stored variants, even when nothing resolves.
pub fn emoji_variants_old(cur: &mut Cursor<'_>, c: &mut Collaborators<'_>) -> Result<()> {
    let stored = cur.read_map(|s| s.read_u32(), |s| s.read_u64())?;
    let mut variants = EmojiVariants::new();
    for (key, colour_key) in stored {
        let Some(id) = c.emoji.id_from_old_key(u64::from(key)) else {
            continue;
        };
        match c.emoji.color_index_from_old_key(colour_key) {
            Some(index) if index >= 0 => {
                variants.insert(id, index);
            }
            _ => {}
        }
    }
    c.emoji.set_emoji_variants(variants);
    Ok(())
}

fn resolve_recent(
    emoji: &dyn EmojiStore,
    stored: impl IntoIterator<Item = (u64, u16)>,
) -> RecentEmoji {
    let mut dropped = 0usize;
    let recent: RecentEmoji = stored
        .into_iter()
        .filter_map(|(key, count)| {
            let id = emoji.id_from_old_key(key);
            if id.is_none() {
                dropped += 1;
            }
            id.map(|id| (id, count))
        })
        .collect();
    if dropped > 0 {
        tracing::debug!(dropped, kept = recent.len(), "unresolved legacy emoji keys dropped");
    }
    recent
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collab::memory::MemoryConfig;

    fn recent_old_old(items: &[(u32, u16)]) -> Vec<u8> {
        let mut out = (items.len() as u32).to_be_bytes().to_vec();
        for &(key, count) in items {
            out.extend_from_slice(&key.to_be_bytes());
            out.extend_from_slice(&count.to_be_bytes());
        }
        out
    }

    #[test]
    fn truncated_flags_are_completed() {
        assert_eq!(fix_truncated_flag_key(0xD83C_DDEF), 0xD83C_DDEF_D83C_DDF5);
        assert_eq!(fix_truncated_flag_key(0xD83C_DDEC), 0xD83C_DDEC_D83C_DDE7);
        assert_eq!(fix_truncated_flag_key(0x263A), 0x263A);
    }

    #[test]
    fn oldest_recent_emoji_resolves_flags_and_drops_garbage() {
        let bytes = recent_old_old(&[(0xD83C_DDEF, 5), (0x263A, 2), (0xD83C, 1)]);
        let mut config = MemoryConfig::default();
        let mut cur = Cursor::new(&bytes);
        recent_emoji_old_old(&mut cur, &mut config.collaborators()).unwrap();
        assert_eq!(
            config.emoji.recent_emoji,
            vec![("🇯🇵".to_string(), 5), ("\u{263A}".to_string(), 2)]
        );
    }

    #[test]
    fn empty_recent_list_leaves_store_untouched() {
        let mut config = MemoryConfig::default();
        config.emoji.recent_emoji = vec![("x".into(), 1)];
        let bytes = recent_old_old(&[]);
        let mut cur = Cursor::new(&bytes);
        recent_emoji_old_old(&mut cur, &mut config.collaborators()).unwrap();
        assert_eq!(config.emoji.recent_emoji, vec![("x".to_string(), 1)]);
    }

    #[test]
    fn fully_unresolved_list_still_replaces() {
        let mut config = MemoryConfig::default();
        config.emoji.recent_emoji = vec![("x".into(), 1)];
        let bytes = recent_old_old(&[(0xD83C, 1)]);
        let mut cur = Cursor::new(&bytes);
        recent_emoji_old_old(&mut cur, &mut config.collaborators()).unwrap();
        assert!(config.emoji.recent_emoji.is_empty());
    }

    #[test]
    fn old_variants_keep_only_resolvable_pairs() {
        let mut bytes = 3u32.to_be_bytes().to_vec();
        for (key, colour) in [(0x270Bu32, 0xD83C_DFFCu64), (0xD83Cu32, 0xD83C_DFFB), (0x261D, 7)] {
            bytes.extend_from_slice(&key.to_be_bytes());
            bytes.extend_from_slice(&colour.to_be_bytes());
        }
        let mut config = MemoryConfig::default();
        let mut cur = Cursor::new(&bytes);
        emoji_variants_old(&mut cur, &mut config.collaborators()).unwrap();
        assert_eq!(config.emoji.variants.len(), 1);
        assert_eq!(config.emoji.variants.get("\u{270B}"), Some(&2));
    }

    #[test]
    fn old_variants_accept_full_emoji_colour_keys() {
        let mut bytes = 2u32.to_be_bytes().to_vec();
        for (key, colour) in [(0x270Cu32, 0x270C_D83C_DFFEu64), (0x261D, 0x261D_D83C_DFFB)] {
            bytes.extend_from_slice(&key.to_be_bytes());
            bytes.extend_from_slice(&colour.to_be_bytes());
        }
        let mut config = MemoryConfig::default();
        let mut cur = Cursor::new(&bytes);
        emoji_variants_old(&mut cur, &mut config.collaborators()).unwrap();
        assert!(cur.at_end());
        assert_eq!(config.emoji.variants.get("\u{270C}"), Some(&4));
        assert_eq!(config.emoji.variants.get("\u{261D}"), Some(&1));
    }
}
