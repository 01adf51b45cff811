use std::path::PathBuf;

use anyhow::Context;
use box_annotate::app::AnnotatorApp;
use box_annotate::config;
use clap::Parser;
use eframe::egui;

#[derive(Parser, Debug)]
#[command(name = "box-annotate", about = "Draw and edit labeled bounding boxes on an image")]
struct Cli {
    /// Image to annotate. Prompts with a file dialog when omitted.
    image: Option<PathBuf>,

    /// Config file (defaults to <config dir>/box-annotate/config.toml)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Class selected at startup
    #[arg(long)]
    class: Option<String>,
}

fn pick_image() -> Option<PathBuf> {
    rfd::FileDialog::new()
        .add_filter("images", &["png", "jpg", "jpeg", "bmp", "gif", "webp"])
        .pick_file()
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();

    let Some(image_path) = cli.image.or_else(pick_image) else {
        anyhow::bail!("no image selected");
    };
    if !image_path.exists() {
        anyhow::bail!("file not found: {}", image_path.display());
    }

    let config = config::load_config(cli.config.as_deref()).context("loading config")?;
    let app = AnnotatorApp::new(image_path.clone(), &config, cli.class)
        .with_context(|| format!("opening {}", image_path.display()))?;

    let title = format!(
        "box-annotate - {}",
        image_path.file_name().unwrap_or_default().to_string_lossy()
    );
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 800.0])
            .with_title(&title),
        ..Default::default()
    };

    eframe::run_native(&title, options, Box::new(move |_cc| Ok(Box::new(app))))
        .map_err(|e| anyhow::anyhow!("eframe: {e}"))
}
