use legacy_settings::block::{connection, BlockId};
use legacy_settings::collab::memory::MemoryConfig;
use legacy_settings::loader::{decode, load, load_file, load_or_default, LoadOptions};
use legacy_settings::model::{ProxySettings, ProxyType, SendSubmitWay, WorkMode};
use legacy_settings::reconcile::FallbackSource;
use legacy_settings::SettingsError;
use proptest::prelude::*;
use std::io::Write;
use tempfile::NamedTempFile;

/// Writes a settings stream the way the historical writer did.
struct StreamWriter {
    buf: Vec<u8>,
}

impl StreamWriter {
    fn new(version: i32) -> Self {
        Self { buf: version.to_be_bytes().to_vec() }
    }

    fn block(mut self, id: BlockId) -> Self {
        self.buf.extend_from_slice(&id.raw().to_be_bytes());
        self
    }

    fn raw_id(mut self, id: u32) -> Self {
        self.buf.extend_from_slice(&id.to_be_bytes());
        self
    }

    fn i32(mut self, v: i32) -> Self {
        self.buf.extend_from_slice(&v.to_be_bytes());
        self
    }

    fn u32(mut self, v: u32) -> Self {
        self.buf.extend_from_slice(&v.to_be_bytes());
        self
    }

    fn i64(mut self, v: i64) -> Self {
        self.buf.extend_from_slice(&v.to_be_bytes());
        self
    }

    fn u64(mut self, v: u64) -> Self {
        self.buf.extend_from_slice(&v.to_be_bytes());
        self
    }

    fn str(mut self, s: &str) -> Self {
        let units: Vec<u16> = s.encode_utf16().collect();
        self.buf.extend_from_slice(&((units.len() * 2) as u32).to_be_bytes());
        for u in units {
            self.buf.extend_from_slice(&u.to_be_bytes());
        }
        self
    }

    fn raw(mut self, b: &[u8]) -> Self {
        self.buf.extend_from_slice(b);
        self
    }

    fn bytes(mut self, b: &[u8]) -> Self {
        self.buf.extend_from_slice(&(b.len() as u32).to_be_bytes());
        self.buf.extend_from_slice(b);
        self
    }

    fn finish(self) -> Vec<u8> {
        self.buf
    }
}

fn night_mode_with_old_tile(version: i32) -> Vec<u8> {
    StreamWriter::new(version)
        .block(BlockId::ThemeKey).u64(11).u64(22).u32(1)
        .block(BlockId::TileBackgroundOld).i32(1)
        .finish()
}

#[test]
fn test_old_tile_flag_ignored_before_fix_version() {
    let old = load(&night_mode_with_old_tile(8000), &LoadOptions::default()).unwrap();
    assert!(old.config.theme.night_mode);
    assert!(!old.report.context.tile_day);
    assert!(old.report.context.tile_read);

    let fixed = load(&night_mode_with_old_tile(8006), &LoadOptions::default()).unwrap();
    assert!(fixed.report.context.tile_day);
    assert!(fixed.report.context.tile_read);
    assert_eq!(fixed.report.context.theme_key_day, 11);
    assert_eq!(fixed.report.context.theme_key_night, 22);
}

#[test]
fn test_old_tile_flag_kept_with_custom_day_background() {
    let opts = LoadOptions { legacy_has_custom_day_background: true };
    let loaded = load(&night_mode_with_old_tile(8000), &opts).unwrap();
    assert!(loaded.report.context.tile_day);
}

#[test]
fn test_old_tile_flag_targets_night_palette_in_day_mode() {
    let bytes = StreamWriter::new(8006)
        .block(BlockId::TileBackgroundOld).i32(0)
        .finish();
    let loaded = load(&bytes, &LoadOptions::default()).unwrap();
    assert!(!loaded.report.context.tile_night);
    assert!(!loaded.report.context.tile_day);
}

#[test]
fn test_unknown_id_after_valid_blocks_resets_to_defaults() {
    let bytes = StreamWriter::new(1_000_000)
        .block(BlockId::AutoStart).i32(1)
        .block(BlockId::WorkMode).i32(1)
        .block(BlockId::NotificationsCountOld).i32(5)
        .raw_id(0x2a)
        .i32(0)
        .finish();

    match load(&bytes, &LoadOptions::default()) {
        Err(SettingsError::UnknownBlock { id, .. }) => assert_eq!(id, 0x2a),
        other => panic!("expected unknown block, got {other:?}"),
    }
    assert_eq!(load_or_default(&bytes, &LoadOptions::default()), MemoryConfig::default());
}

#[test]
fn test_truncated_block_is_fatal() {
    let bytes = StreamWriter::new(1_000_000)
        .block(BlockId::AutoStart).i32(1)
        .block(BlockId::WindowPosition).i32(10).i32(20)
        .finish();
    assert!(matches!(
        load(&bytes, &LoadOptions::default()),
        Err(SettingsError::Stream(_))
    ));
}

#[test]
fn test_invalid_send_key_is_fatal() {
    let bytes = StreamWriter::new(1_000_000).block(BlockId::SendKeyOld).i32(4).finish();
    assert!(matches!(
        load(&bytes, &LoadOptions::default()),
        Err(SettingsError::InvalidSendKey(4))
    ));

    let bytes = StreamWriter::new(1_000_000).block(BlockId::SendKeyOld).i32(1).finish();
    let loaded = load(&bytes, &LoadOptions::default()).unwrap();
    assert_eq!(loaded.config.settings.send_submit_way, SendSubmitWay::CtrlEnter);
}

#[test]
fn test_cache_sentinel_in_full_stream() {
    let bytes = StreamWriter::new(1_000_000)
        .block(BlockId::CacheSettings)
        .i64(1 << 30).i32(i32::MAX)
        .i64(1 << 32).i32(-1)
        .finish();
    let loaded = load(&bytes, &LoadOptions::default()).unwrap();
    let ctx = &loaded.report.context;
    assert_eq!(ctx.cache_total_size_limit, 1 << 30);
    assert_eq!(ctx.cache_total_time_limit, 0);
    assert_eq!(ctx.cache_big_file_total_size_limit, 1 << 32);
    assert_eq!(ctx.cache_big_file_total_time_limit, 0);

    let bytes = StreamWriter::new(1_000_000)
        .block(BlockId::CacheSettingsOld).i64(1024).i32(60)
        .finish();
    assert!(matches!(
        load(&bytes, &LoadOptions::default()),
        Err(SettingsError::CacheSizeTooSmall { size: 1024, .. })
    ));
}

#[test]
fn test_mixed_stream_applies_in_order() {
    let bytes = StreamWriter::new(1_002_003)
        .block(BlockId::User).i32(777).u32(2)
        .block(BlockId::Key).i32(2).raw(&[0x5a; 256])
        .block(BlockId::DcOptionOldOld).u32(2).str("").str("149.154.167.51").u32(443)
        .block(BlockId::DcOptionOld).u32(10_004).i32(1).str("2001:67c:4e8:f004::a").u32(443)
        .block(BlockId::ChatSizeMaxOld).i32(200)
        .block(BlockId::TxtDomainStringOld).str("apv3.stel.com")
        .block(BlockId::WorkMode).i32(2)
        .block(BlockId::DownloadPathOldOld).str("/home/u/Downloads")
        .block(BlockId::SongVolumeOld).i32(250_000)
        .block(BlockId::NotificationsCornerOld).i32(9)
        .block(BlockId::MutedPeersOld).u32(2).u64(1).u64(2)
        .block(BlockId::LoggedPhoneNumberOld).str("+000")
        .block(BlockId::ConnectionType)
            .i32(connection::PROXIES_LIST).i32(1).i32(1)
            .i32(ProxySettings::Enabled as i32).i32(1)
            .i32(connection::PROXY_TYPE_SHIFT + ProxyType::Socks5 as i32)
            .str("proxy.example").i32(1080).str("").str("")
        .block(BlockId::ScaleOld).i32(3)
        .block(BlockId::ScalePercent).i32(200)
        .block(BlockId::WorkMode).i32(1)
        .finish();

    let loaded = load(&bytes, &LoadOptions::default()).unwrap();
    let (config, report) = (&loaded.config, &loaded.report);

    assert_eq!(report.version, 1_002_003);
    assert_eq!(report.blocks_read, 16);
    assert_eq!(report.fallback_source, FallbackSource::LegacyFields);
    assert_eq!(report.context.mtp_legacy_user_id, 777);
    assert_eq!(report.context.mtp_legacy_main_dc_id, 2);
    assert_eq!(report.context.mtp_legacy_keys.len(), 1);
    assert_eq!(report.context.mtp_legacy_keys[0].data.len(), 256);

    assert_eq!(config.fallback.dc_options.endpoints(2).len(), 1);
    assert_eq!(config.fallback.dc_options.endpoints(4).len(), 1);
    assert_eq!(config.fallback.chat_size_max, 200);
    assert_eq!(config.fallback.txt_domain_string, "apv3.stel.com");

    assert_eq!(config.runtime.work_mode, WorkMode::TrayOnly);
    assert_eq!(config.settings.download_path, "/home/u/Downloads/");
    assert!(config.settings.download_path_bookmark.is_empty());
    assert_eq!(config.settings.song_volume, 0.25);
    assert_eq!(config.proxies.list.len(), 1);
    assert_eq!(config.proxies.selected.host, "proxy.example");
    assert_eq!(config.proxies.settings, ProxySettings::Enabled);
    assert!(config.proxies.use_for_calls);
    assert_eq!(config.proxies.refreshes, 1);
    // ScaleOld set a non-auto scale, so ScalePercent is ignored.
    assert_eq!(config.runtime.config_scale, 150);
}

#[test]
fn test_embedded_fallback_config_wins() {
    let bytes = StreamWriter::new(1_000_000)
        .block(BlockId::ChatSizeMaxOld).i32(200)
        .block(BlockId::FallbackProductionConfig).bytes(&[9, 8, 7])
        .finish();
    let loaded = load(&bytes, &LoadOptions::default()).unwrap();
    assert_eq!(loaded.report.fallback_source, FallbackSource::Serialized);
    assert_eq!(loaded.config.fallback.serialized, vec![9, 8, 7]);
    assert_eq!(loaded.config.fallback.chat_size_max, 0);
}

#[test]
fn test_scale_percent_respects_preset_scale() {
    let bytes = StreamWriter::new(1_000_000).block(BlockId::ScalePercent).i32(175).finish();

    let loaded = load(&bytes, &LoadOptions::default()).unwrap();
    assert_eq!(loaded.config.runtime.config_scale, 175);

    let mut config = MemoryConfig::default();
    config.runtime.config_scale = 125;
    decode(&bytes, &LoadOptions::default(), &mut config.collaborators(), |_, _| {}).unwrap();
    assert_eq!(config.runtime.config_scale, 125);
}

#[test]
fn test_auto_update_off_stops_checker_unless_updater_disabled() {
    let bytes = StreamWriter::new(1_000_000).block(BlockId::AutoUpdate).i32(0).finish();

    let loaded = load(&bytes, &LoadOptions::default()).unwrap();
    assert!(!loaded.config.runtime.auto_update);
    assert!(loaded.config.runtime.update_checker_stopped);

    let mut config = MemoryConfig::default();
    config.runtime.updater_disabled = true;
    decode(&bytes, &LoadOptions::default(), &mut config.collaborators(), |_, _| {}).unwrap();
    assert!(!config.runtime.update_checker_stopped);
}

#[test]
fn test_auto_lock_notifies_passcode_change() {
    let bytes = StreamWriter::new(1_000_000).block(BlockId::AutoLockOld).i32(3600).finish();
    let loaded = load(&bytes, &LoadOptions::default()).unwrap();
    assert_eq!(loaded.config.settings.auto_lock, 3600);
    assert_eq!(loaded.config.runtime.passcode_notifications, 1);
}

#[test]
fn test_load_file_roundtrip() {
    let bytes = StreamWriter::new(1_000_000)
        .block(BlockId::LangPackKey).u64(0xABCD)
        .block(BlockId::BackgroundKey).u64(1).u64(2)
        .finish();
    let mut temp_file = NamedTempFile::new().unwrap();
    temp_file.write_all(&bytes).unwrap();
    temp_file.flush().unwrap();

    let loaded = load_file(temp_file.path(), &LoadOptions::default()).unwrap();
    assert_eq!(loaded.report.context.lang_pack_key, 0xABCD);
    assert!(loaded.report.context.background_keys_read);
    assert_eq!(loaded.report.context.background_key_night, 2);
}

#[test]
fn test_load_file_missing_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("settings0");
    assert!(matches!(
        load_file(&missing, &LoadOptions::default()),
        Err(SettingsError::Io(_))
    ));
}

proptest! {
    #[test]
    fn test_arbitrary_input_never_panics(bytes in proptest::collection::vec(any::<u8>(), 0..256)) {
        let _ = load(&bytes, &LoadOptions::default());
    }

    #[test]
    fn test_failed_load_always_resets(
        valid in 0usize..6,
        unknown in prop_oneof![Just(0x10u32), Just(0x1b), 0x2au32..0x30, 0x3cu32..0x40, 0x62u32..0x1000],
    ) {
        let mut writer = StreamWriter::new(1_000_000);
        for i in 0..valid {
            writer = writer.block(BlockId::NotificationsCountOld).i32(i as i32 + 1);
        }
        let bytes = writer.raw_id(unknown).finish();
        prop_assert_eq!(load_or_default(&bytes, &LoadOptions::default()), MemoryConfig::default());
    }
}
