//! Biochar site map preview.
//!
//! Mounts the map widget headless, drives it with a paced frame host and
//! prints every [`MapFrame`](biocharmap::resources::mapsurface::MapFrame) as
//! a JSON line, the way a map renderer would consume them.
//!
//! # Main Loop
//!
//! 1. Load `config.ini` (defaults if missing) and the site content
//! 2. Mount the view, which requests the first frame
//! 3. For each due frame: tick, print the published frames
//! 4. Unmount, which cancels the outstanding request
//!
//! # Running
//!
//! ```sh
//! cargo run --release -- --frames 120
//! cargo run --release -- --print-page
//! ```

use biocharmap::page::render_page;
use biocharmap::resources::framehost::PacedFrameHost;
use biocharmap::resources::mapconfig::MapConfig;
use biocharmap::resources::mapsurface::MapSurface;
use biocharmap::resources::sitecontent::SiteContent;
use biocharmap::view::MapView;
use clap::Parser;
use log::{error, info, warn};
use std::path::PathBuf;

/// Biochar site map preview
#[derive(Parser)]
#[command(
    version,
    about = "Runs the biochar site map animation headless and prints marker frames as JSON lines."
)]
struct Cli {
    /// Animation settings (INI). Defaults to ./config.ini.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Site content (JSON). Defaults to the built-in biochar site.
    #[arg(long, value_name = "PATH")]
    content: Option<PathBuf>,

    /// Number of frames to run before unmounting.
    #[arg(long)]
    frames: Option<u64>,

    /// Override the target frames per second.
    #[arg(long)]
    fps: Option<u32>,

    /// Print the page text and exit.
    #[arg(long)]
    print_page: bool,

    /// Do not print frames, only log.
    #[arg(long, short)]
    quiet: bool,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let content = match &cli.content {
        Some(path) => match SiteContent::load_from_file(path) {
            Ok(content) => content,
            Err(e) => {
                error!("{e}");
                std::process::exit(1);
            }
        },
        None => SiteContent::biochar(),
    };

    // Early-exit: page text only, no animation needed
    if cli.print_page {
        print!("{}", render_page(&content));
        return;
    }

    let mut config = match &cli.config {
        Some(path) => MapConfig::with_path(path),
        None => MapConfig::new(),
    };
    if let Err(e) = config.load_from_file() {
        warn!("{e}; using default animation settings");
    }
    if let Some(fps) = cli.fps {
        config.target_fps = fps;
    }
    let frames = cli.frames.unwrap_or(config.preview_frames);

    let (surface, frames_rx) = MapSurface::with_channel(None);
    let host = PacedFrameHost::new(config.target_fps);
    let mut view = MapView::new(host, config).with_surface(surface);
    if let Err(e) = view.mount(&content) {
        error!("Cannot mount '{}': {e}", content.title);
        std::process::exit(1);
    }

    for _ in 0..frames {
        let Some((handle, dt)) = view.host_mut().wait_next() else {
            warn!("No frame pending, stopping early");
            break;
        };
        view.on_frame(handle, dt);
        for frame in frames_rx.try_iter() {
            if cli.quiet {
                continue;
            }
            match serde_json::to_string(&frame) {
                Ok(line) => println!("{line}"),
                Err(e) => warn!("Cannot serialize frame {}: {e}", frame.frame),
            }
        }
    }

    let arrivals = view.arrivals().total();
    view.unmount();
    info!("Done: {frames} frames, {arrivals} arrivals");
}
