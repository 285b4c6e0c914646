// mascot: headless driver for the presentation engine.
//
// Loads a theme from the built-in catalog and replays a sensor trace against
// it on a simulated clock, logging every display decision.

mod demo;
mod logging;
mod trace;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Result, bail};
use clap::Parser;
use log::info;

use mascot_core::traits::{MockClock, ThemeCatalog};
use mascot_core::{EngineConfig, PresentationController, PresentationState};

use demo::{LoggingListener, SyntheticDecoder};
use trace::Trace;

#[derive(Parser, Debug)]
#[command(name = "mascot", about = "Animated mascot presentation engine")]
struct Args {
    /// Path to engine config JSON file.
    #[arg(long, default_value = "mascot.json")]
    config: PathBuf,

    /// Theme to show; overrides `initial_theme` from the config.
    #[arg(long)]
    theme: Option<String>,

    /// JSON sensor trace to replay instead of the built-in one.
    #[arg(long)]
    trace: Option<PathBuf>,

    /// Screen rotation in degrees (0, 90, 180 or 270).
    #[arg(long, default_value_t = 0)]
    rotation: u32,

    /// Largest single decode in bytes; bigger images are subsampled.
    #[arg(long, env = "MASCOT_MEMORY_BUDGET")]
    memory_budget: Option<usize>,

    /// Print the available themes and exit.
    #[arg(long)]
    list_themes: bool,

    /// Enable debug logging.
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    logging::init_logging(args.verbose);

    let catalog = demo::catalog()?;
    if args.list_themes {
        for id in catalog.theme_ids() {
            if let Some(theme) = catalog.theme(&id) {
                let menu: Vec<&str> = theme.menu_animations().map(|a| a.id().as_str()).collect();
                println!("{id}: {} images, menu [{}]", theme.images.len(), menu.join(", "));
            }
        }
        return Ok(());
    }

    let config = EngineConfig::load_from(&args.config)?;
    info!("Loaded config from {}", args.config.display());

    let theme = args
        .theme
        .clone()
        .or_else(|| config.initial_theme.clone())
        .or_else(|| catalog.theme_ids().into_iter().next());
    let Some(theme) = theme else {
        bail!("no theme available");
    };

    let trace = match &args.trace {
        Some(path) => Trace::load_from(path)?,
        None => Trace::demo(),
    };

    let clock = Arc::new(MockClock::new());
    let mut controller = PresentationController::new(
        config,
        Box::new(catalog),
        Arc::new(SyntheticDecoder::new(args.memory_budget)),
        Box::new(clock.clone()),
        Box::new(LoggingListener),
    );
    controller.on_screen_rotation(args.rotation)?;

    controller.use_theme(&theme)?;
    controller.block_until_loaded();
    if !matches!(controller.state(), PresentationState::Ready(_)) {
        bail!("theme {theme} could not be shown");
    }

    trace::replay(&mut controller, &clock, &trace);

    if let Some(resources) = controller.resources() {
        info!(
            "Finished in state {:?}: {} assets resident ({} bytes), {} animations expanded",
            controller.state(),
            resources.cache.len(),
            resources.cache.resident_bytes(),
            resources.sequencer.len()
        );
    }
    Ok(())
}
