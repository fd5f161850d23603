use chrono::DateTime;
use clap::{Parser, Subcommand};
use legacy_settings::block::BlockId;
use legacy_settings::collab::memory::MemoryConfig;
use legacy_settings::loader::{decode, load_file, LoadOptions};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "legacy-settings", about = "Decode historical local-settings streams")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Decode a stream and print the resulting state as JSON
    Decode {
        input: PathBuf,
        /// The owner had a custom day background (affects old tile flags)
        #[arg(long)]
        custom_day_background: bool,
        /// Compact single-line JSON
        #[arg(long)]
        compact: bool,
    },
    /// Decode a stream and print a short human-readable summary
    Info {
        input: PathBuf,
        #[arg(long)]
        custom_day_background: bool,
    },
    /// List every block of a stream with its offset
    Trace {
        input: PathBuf,
    },
    /// List all known block ids
    Ids,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("warn".parse()?))
        .with_writer(std::io::stderr)
        .init();

    match Cli::parse().command {

        // ── Decode ───────────────────────────────────────────────────────────
        Commands::Decode { input, custom_day_background, compact } => {
            let opts = LoadOptions { legacy_has_custom_day_background: custom_day_background };
            let loaded = load_file(&input, &opts)?;
            let json = if compact {
                serde_json::to_string(&loaded)?
            } else {
                serde_json::to_string_pretty(&loaded)?
            };
            println!("{json}");
        }

        // ── Info ─────────────────────────────────────────────────────────────
        Commands::Info { input, custom_day_background } => {
            let opts = LoadOptions { legacy_has_custom_day_background: custom_day_background };
            let loaded = load_file(&input, &opts)?;
            let (config, report) = (&loaded.config, &loaded.report);
            let last_check = DateTime::from_timestamp(i64::from(config.runtime.last_update_check), 0)
                .filter(|_| config.runtime.last_update_check > 0)
                .map(|t| t.format("%Y-%m-%d %H:%M:%S UTC").to_string())
                .unwrap_or_else(|| "never".into());

            println!("── Legacy settings ──────────────────────────────────────");
            println!("  Path              {}", input.display());
            println!("  Format version    {}", report.version);
            println!("  Blocks            {}", report.blocks_read);
            println!("  Fallback config   {:?}", report.fallback_source);
            println!("  Last update check {last_check}");
            println!("  Auto update       {}", config.runtime.auto_update);
            println!("  Interface scale   {}", scale_label(config.runtime.config_scale));
            println!("  Download path     {:?}", config.settings.download_path);
            println!("  Proxies           {} ({:?})", config.proxies.list.len(), config.proxies.settings);
            println!("  Night mode        {}", config.theme.night_mode);
            println!("  Tile day/night    {}/{}", report.context.tile_day, report.context.tile_night);
            println!("  Legacy auth keys  {}", report.context.mtp_legacy_keys.len());
            for key in &report.context.mtp_legacy_keys {
                println!("    dc {:<4} {}…", key.dc_id, hex::encode(&key.data[..key.data.len().min(6)]));
            }
            if report.context.has_cache_limits() {
                println!("  Cache limit       {} B / {} s",
                    report.context.cache_total_size_limit, report.context.cache_total_time_limit);
            }
        }

        // ── Trace ────────────────────────────────────────────────────────────
        Commands::Trace { input } => {
            let bytes = std::fs::read(&input)?;
            let mut config = MemoryConfig::default();
            let mut count = 0usize;
            let result = decode(&bytes, &LoadOptions::default(), &mut config.collaborators(), |id, at| {
                count += 1;
                println!("{at:>8}  {:#04x}  {}", id.raw(), id.name());
            });
            match result {
                Ok(report) => println!("{count} block(s), version {}", report.version),
                Err(e) => {
                    println!("stopped after {count} block(s): {e}");
                    return Err(e.into());
                }
            }
        }

        // ── Ids ──────────────────────────────────────────────────────────────
        Commands::Ids => {
            for id in BlockId::ALL {
                println!("{:#04x}  {}", id.raw(), id.name());
            }
        }
    }

    Ok(())
}

// ── helpers ──────────────────────────────────────────────────────────────────

fn scale_label(scale: i32) -> String {
    if scale == legacy_settings::model::SCALE_AUTO {
        "auto".into()
    } else {
        format!("{scale}%")
    }
}
