use std::path::Path;

use anyhow::Result;

use trendcast::video::{AssemblerConfig, VideoAssembler};
use trendcast::Settings;

pub async fn cmd_assemble(
    settings: &Settings,
    images: Option<&Path>,
    audio: Option<&Path>,
    output: Option<&Path>,
) -> Result<()> {
    let images = images.unwrap_or(settings.image_dir.as_path());
    let audio = audio.unwrap_or(settings.audio_file.as_path());
    let output = output.unwrap_or(settings.video_file.as_path());

    let config = AssemblerConfig::from_settings(settings);
    let assembler = VideoAssembler::with_config(config);

    let plan = assembler.plan(images, audio, output).await?;

    if !assembler.check_available().await {
        anyhow::bail!("ffmpeg not found at {}", settings.ffmpeg_path);
    }

    eprintln!("🎬 Assembling: {}", output.display());
    eprintln!("   Audio: {}", audio.display());
    for (index, image) in plan.images.iter().enumerate() {
        eprintln!(
            "   Clip {index}: {} ({}s)",
            image.display(),
            plan.seconds_per_image
        );
    }
    eprintln!("   Duration: {}s", plan.nominal_duration().as_secs());

    assembler.render(&plan).await?;

    println!("✅ Saved {}", output.display());
    Ok(())
}
