use std::path::Path;

use anyhow::Result;

use trendcast::error::StageContext;
use trendcast::{ConfigStore, HttpClient, Pipeline, Settings, Stage};

pub async fn cmd_run(config_path: &Path, settings: &Settings) -> Result<()> {
    let config = ConfigStore::new(config_path)
        .load_or_create_interactive()
        .stage(Stage::Config)?;

    eprintln!("🚀 Starting trendcast run");
    eprintln!("   Images: {}", settings.image_dir.display());
    eprintln!("   Audio:  {}", settings.audio_file.display());
    eprintln!("   Video:  {}", settings.video_file.display());

    let pipeline = Pipeline::from_config(&config, settings, HttpClient::new()?);
    let report = pipeline.run().await?;

    eprintln!("\n✅ Run complete\n");
    print!("{report}");
    Ok(())
}
