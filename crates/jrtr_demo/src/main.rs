//! jrtr demo runner.
//!
//! Renders one of the bundled demo scenes with the software rasterizer and
//! writes every frame as a PNG.
//!
//! Usage: jrtr_demo [cube|house|textured|bezier|robot] [--config FILE]
//!        [--frames N] [--size WxH] [--out DIR] [--texture IMAGE]
//!        [--parallel] [--no-cull]

mod app;
mod config;
mod demos;

use anyhow::Result;

use app::AppContext;
use config::DemoConfig;

fn main() -> Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.iter().any(|a| a == "--help" || a == "-h") {
        println!("Usage: jrtr_demo [DEMO] [--config FILE] [--frames N] [--size WxH]");
        println!("                 [--out DIR] [--texture IMAGE] [--parallel] [--no-cull]");
        println!("\nDemos: {}", demos::DEMO_NAMES.join(", "));
        return Ok(());
    }

    let config = DemoConfig::from_args(&args)?;
    log::info!(
        "Starting demo '{}' at {}x{} for {} frames",
        config.demo,
        config.width,
        config.height,
        config.frames
    );

    let mut demo = demos::create(&config.demo)?;
    let mut ctx = AppContext::new(&config)?;
    let paths = app::run(
        demo.as_mut(),
        &mut ctx,
        config.frames,
        config.frame_time,
        &config.output_dir,
    )?;

    log::info!("Wrote {} frames to {}", paths.len(), config.output_dir.display());
    Ok(())
}
