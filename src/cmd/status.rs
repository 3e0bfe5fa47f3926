use std::path::Path;

use anyhow::Result;

use trendcast::video::{AssemblerConfig, VideoAssembler};
use trendcast::{Capabilities, Capability, ConfigStore, Settings};

fn line<T>(name: &str, capability: &Capability<T>, fallback: Option<&str>) {
    let icon = match capability {
        Capability::Enabled(_) => "✅",
        Capability::Disabled { .. } => "⏭️ ",
        Capability::NotImplemented => "🚧",
    };
    print!("{icon} {name:<9} {}", capability.label());
    if let Capability::Disabled { missing } = capability {
        print!(" (missing {})", missing.join(", "));
        if let Some(fallback) = fallback {
            print!(", using {fallback}");
        }
    }
    println!();
}

pub async fn cmd_status(config_path: &Path, settings: &Settings) -> Result<()> {
    let store = ConfigStore::new(config_path);
    let config = store.load_or_create_interactive()?;
    let caps = Capabilities::resolve(&config);

    eprintln!("📄 Config: {}", store.path().display());

    line("script", &caps.script, Some("template"));
    line("voice", &caps.voice, Some("free voice"));
    line("youtube", &caps.youtube, None);
    line("twitter", &caps.twitter, None);
    line("tiktok", &caps.tiktok, None);
    println!("🏷️  affiliate keyword: {}", config.affiliate_keyword());

    let assembler = VideoAssembler::with_config(AssemblerConfig::from_settings(settings));
    if assembler.check_available().await {
        println!("🎬 ffmpeg    {}", settings.ffmpeg_path);
    } else {
        println!("⚠️  ffmpeg not found at {}", settings.ffmpeg_path);
    }

    Ok(())
}
