//! Markup Example - static page skeleton
//!
//! Prints the HTML the animation layer attaches to. Optional arguments:
//! a content JSON file and a motion config TOML file.
//!
//! Run with: cargo run --example markup -- [content.json] [motion.toml]

use spark_folio::{render_markup, MotionConfig, PortfolioContent};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let mut args = std::env::args().skip(1);
    let content = match args.next() {
        Some(path) => PortfolioContent::load(path)?,
        None => PortfolioContent::placeholder(),
    };
    let config = match args.next() {
        Some(path) => MotionConfig::load(path)?,
        None => MotionConfig::default(),
    };

    print!("{}", render_markup(&content, &config));
    Ok(())
}
