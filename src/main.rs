use anyhow::Context;
use clap::Parser;

use xcspost::{init_logging, post_process, Cli, Config, BUILD_DATE, VERSION};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging()?;

    tracing::info!("xcspost {} (built {})", VERSION, BUILD_DATE);

    let mut config = match &cli.config {
        Some(path) => Config::load_from_file(path)
            .with_context(|| format!("Failed to load settings from {}", path.display()))?,
        None => {
            let path = Config::default_path();
            Config::load_or_default(&path)
                .with_context(|| format!("Failed to load settings from {}", path.display()))?
        }
    };
    cli.apply(&mut config.post);
    config.validate().context("Invalid settings")?;

    let result = post_process(&cli.input, &cli.output, &config)?;
    for warning in &result.warnings {
        eprintln!("warning: {}", warning);
    }
    println!("{}", result.gcode_path.display());
    println!("{}", result.xcs_path.display());

    Ok(())
}
