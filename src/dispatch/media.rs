//! Media-related legacy blocks: auto-download masks, auto-play and the nested
//! call settings record.

use crate::collab::{AppSetting, Collaborators};
use crate::error::Result;
use crate::model::{DownloadSource, DownloadType};
use crate::stream::{Cursor, StreamError};

const NO_PRIVATE: i32 = 0x01;
const NO_GROUPS:  i32 = 0x02;

/// `AutoDownloadOld`: three bitmasks (photo, audio, gif).  A set bit turns
/// auto-download off for that source class; a clear bit leaves it alone.
pub fn auto_download_old(cur: &mut Cursor<'_>, c: &mut Collaborators<'_>) -> Result<()> {
    let photo = cur.read_i32()?;
    let audio = cur.read_i32()?;
    let gif = cur.read_i32()?;

    let mut disable = |kind: DownloadType, mask: i32| {
        if mask & NO_PRIVATE != 0 {
            c.session.set_bytes_limit(DownloadSource::User, kind, 0);
        }
        if mask & NO_GROUPS != 0 {
            c.session.set_bytes_limit(DownloadSource::Group, kind, 0);
            c.session.set_bytes_limit(DownloadSource::Channel, kind, 0);
        }
    };
    disable(DownloadType::Photo, photo);
    disable(DownloadType::VoiceMessage, audio);
    disable(DownloadType::AutoPlayGif, gif);
    disable(DownloadType::AutoPlayVideoMessage, gif);
    Ok(())
}

/// `AutoPlayOld`: zero disables every auto-play type for every source.
pub fn auto_play_old(cur: &mut Cursor<'_>, c: &mut Collaborators<'_>) -> Result<()> {
    let gif = cur.read_i32()?;
    if gif == 0 {
        for source in DownloadSource::ALL {
            for kind in [
                DownloadType::AutoPlayGif,
                DownloadType::AutoPlayVideo,
                DownloadType::AutoPlayVideoMessage,
            ] {
                c.session.set_bytes_limit(source, kind, 0);
            }
        }
    }
    Ok(())
}

struct CallSettings {
    output_device: String,
    output_volume: i32,
    input_device:  String,
    input_volume:  i32,
    ducking:       bool,
}

fn read_call_settings(inner: &mut Cursor<'_>) -> std::result::Result<CallSettings, StreamError> {
    Ok(CallSettings {
        output_device: inner.read_string()?,
        output_volume: inner.read_i32()?,
        input_device:  inner.read_string()?,
        input_volume:  inner.read_i32()?,
        ducking:       inner.read_i32()? != 0,
    })
}

/// `CallSettingsOld`: a byte array holding its own stream.  Only the outer
/// array must decode; a damaged inner record is skipped without failing the
/// block.
pub fn call_settings_old(cur: &mut Cursor<'_>, c: &mut Collaborators<'_>) -> Result<()> {
    let blob = cur.read_bytes()?;
    match read_call_settings(&mut Cursor::new(&blob)) {
        Ok(call) => {
            c.settings.apply(AppSetting::CallOutputDeviceId(call.output_device));
            c.settings.apply(AppSetting::CallOutputVolume(call.output_volume));
            c.settings.apply(AppSetting::CallInputDeviceId(call.input_device));
            c.settings.apply(AppSetting::CallInputVolume(call.input_volume));
            c.settings.apply(AppSetting::CallAudioDuckingEnabled(call.ducking));
        }
        Err(e) => {
            tracing::warn!(error = %e, len = blob.len(), "ignoring unreadable call settings");
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collab::memory::MemoryConfig;
    use crate::model::auto_download::DEFAULT_BYTES_LIMIT;

    fn i32s(values: &[i32]) -> Vec<u8> {
        values.iter().flat_map(|v| v.to_be_bytes()).collect()
    }

    #[test]
    fn photo_mask_three_disables_every_source() {
        let bytes = i32s(&[0x03, 0x00, 0x00]);
        let mut config = MemoryConfig::default();
        auto_download_old(&mut Cursor::new(&bytes), &mut config.collaborators()).unwrap();
        let limits = &config.session.auto_download;
        for source in DownloadSource::ALL {
            assert_eq!(limits.bytes_limit(source, DownloadType::Photo), 0);
            assert_eq!(limits.bytes_limit(source, DownloadType::VoiceMessage), DEFAULT_BYTES_LIMIT);
            assert_eq!(limits.bytes_limit(source, DownloadType::AutoPlayGif), DEFAULT_BYTES_LIMIT);
        }
    }

    #[test]
    fn all_masks_three_zero_every_covered_pair() {
        let bytes = i32s(&[0x03, 0x03, 0x03]);
        let mut config = MemoryConfig::default();
        let mut cur = Cursor::new(&bytes);
        auto_download_old(&mut cur, &mut config.collaborators()).unwrap();
        assert!(cur.at_end());
        let limits = &config.session.auto_download;
        for source in DownloadSource::ALL {
            for kind in [
                DownloadType::Photo,
                DownloadType::VoiceMessage,
                DownloadType::AutoPlayGif,
                DownloadType::AutoPlayVideoMessage,
            ] {
                assert_eq!(limits.bytes_limit(source, kind), 0, "{source:?} {kind:?}");
            }
            for kind in [DownloadType::AutoPlayVideo, DownloadType::Music, DownloadType::File] {
                assert_eq!(limits.bytes_limit(source, kind), DEFAULT_BYTES_LIMIT);
            }
        }
    }

    #[test]
    fn all_masks_clear_touch_nothing() {
        let bytes = i32s(&[0x00, 0x00, 0x00]);
        let mut config = MemoryConfig::default();
        let mut cur = Cursor::new(&bytes);
        auto_download_old(&mut cur, &mut config.collaborators()).unwrap();
        assert!(cur.at_end());
        assert_eq!(config, MemoryConfig::default());
    }

    #[test]
    fn gif_mask_covers_video_messages() {
        let bytes = i32s(&[0x00, 0x01, 0x02]);
        let mut config = MemoryConfig::default();
        auto_download_old(&mut Cursor::new(&bytes), &mut config.collaborators()).unwrap();
        let limits = &config.session.auto_download;
        assert_eq!(limits.bytes_limit(DownloadSource::User, DownloadType::VoiceMessage), 0);
        assert_eq!(
            limits.bytes_limit(DownloadSource::Group, DownloadType::VoiceMessage),
            DEFAULT_BYTES_LIMIT
        );
        assert_eq!(limits.bytes_limit(DownloadSource::Channel, DownloadType::AutoPlayGif), 0);
        assert_eq!(
            limits.bytes_limit(DownloadSource::Group, DownloadType::AutoPlayVideoMessage),
            0
        );
        assert_eq!(
            limits.bytes_limit(DownloadSource::User, DownloadType::AutoPlayGif),
            DEFAULT_BYTES_LIMIT
        );
    }

    #[test]
    fn auto_play_off_zeroes_autoplay_types_only() {
        let bytes = i32s(&[0]);
        let mut config = MemoryConfig::default();
        auto_play_old(&mut Cursor::new(&bytes), &mut config.collaborators()).unwrap();
        let limits = &config.session.auto_download;
        for source in DownloadSource::ALL {
            assert_eq!(limits.bytes_limit(source, DownloadType::AutoPlayVideo), 0);
            assert_eq!(limits.bytes_limit(source, DownloadType::Photo), DEFAULT_BYTES_LIMIT);
        }

        let mut untouched = MemoryConfig::default();
        auto_play_old(&mut Cursor::new(&i32s(&[1])), &mut untouched.collaborators()).unwrap();
        assert_eq!(untouched, MemoryConfig::default());
    }

    fn blob(inner: &[u8]) -> Vec<u8> {
        let mut out = (inner.len() as u32).to_be_bytes().to_vec();
        out.extend_from_slice(inner);
        out
    }

    #[test]
    fn nested_call_settings_apply() {
        // Two empty device ids and three ints.
        let mut inner = 0u32.to_be_bytes().to_vec();
        inner.extend_from_slice(&80i32.to_be_bytes());
        inner.extend_from_slice(&0u32.to_be_bytes());
        inner.extend_from_slice(&i32s(&[60, 1]));
        let mut config = MemoryConfig::default();
        call_settings_old(&mut Cursor::new(&blob(&inner)), &mut config.collaborators()).unwrap();
        assert_eq!(config.settings.call_output_volume, 80);
        assert_eq!(config.settings.call_input_volume, 60);
        assert!(config.settings.call_audio_ducking_enabled);
    }

    #[test]
    fn broken_nested_record_is_soft() {
        let bytes = blob(&[0, 0]);
        let mut cur = Cursor::new(&bytes);
        let mut config = MemoryConfig::default();
        call_settings_old(&mut cur, &mut config.collaborators()).unwrap();
        assert!(cur.at_end());
        assert_eq!(config, MemoryConfig::default());
    }
}
