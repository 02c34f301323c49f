//! paint-session - replays a recorded session headlessly
//!
//! Loads the built-in plugin module, applies a session script to an input
//! image and writes the result.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use log::{error, info};

use paint_plugin_host::plugins::BasicModule;
use paint_plugin_host::{Color, Host, HostConfig, PixelBuffer, SessionScript};

#[derive(Parser)]
#[command(name = "paint-session")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Session script (JSON) to replay
    #[arg(short, long)]
    script: PathBuf,

    /// Image to start from; a blank canvas is used when omitted
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Where to write the resulting image
    #[arg(short, long)]
    output: PathBuf,

    /// Host configuration (JSON)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Size of the blank canvas, as WIDTHxHEIGHT
    #[arg(long, default_value = "256x256", value_parser = parse_size)]
    size: (usize, usize),

    /// Print the toolbar layout as JSON after loading the plugins
    #[arg(long)]
    toolbar: bool,
}

fn parse_size(s: &str) -> Result<(usize, usize), String> {
    let (w, h) = s
        .split_once('x')
        .ok_or_else(|| format!("expected WIDTHxHEIGHT, got {s:?}"))?;
    let w = w.parse().map_err(|e| format!("bad width: {e}"))?;
    let h = h.parse().map_err(|e| format!("bad height: {e}"))?;
    Ok((w, h))
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    let config = match &cli.config {
        Some(path) => HostConfig::load(path).with_context(|| format!("loading {}", path.display()))?,
        None => HostConfig::default(),
    };

    let mut image = match &cli.input {
        Some(path) => PixelBuffer::open(path).with_context(|| format!("opening {}", path.display()))?,
        None => {
            let (w, h) = cli.size;
            PixelBuffer::new(w, h, config.background).context("creating blank canvas")?
        }
    };

    let script = SessionScript::load(&cli.script).with_context(|| format!("loading {}", cli.script.display()))?;

    let mut host = Host::new(config);
    host.load_module(&BasicModule)?;

    if cli.toolbar {
        let toolbar = host.toolbar()?;
        println!("{}", serde_json::to_string_pretty(&toolbar)?);
    }

    script.run(&mut host, &mut image)?;

    let context = host.context().snapshot();
    info!(
        "Final colors: foreground {} background {}",
        context.fg_color, context.bg_color
    );
    host.shutdown();

    image
        .save(&cli.output)
        .with_context(|| format!("saving {}", cli.output.display()))?;
    info!("Wrote {}", cli.output.display());
    Ok(())
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{:#}", err);
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_size() {
        assert_eq!(parse_size("32x16"), Ok((32, 16)));
        assert!(parse_size("32").is_err());
        assert!(parse_size("ax1").is_err());
    }

    #[test]
    fn test_blank_canvas_uses_background() {
        let config = HostConfig {
            background: Color::BLUE,
            ..HostConfig::default()
        };
        let image = PixelBuffer::new(2, 2, config.background).unwrap();
        assert!(image.pixels().iter().all(|&c| c == Color::BLUE));
    }
}
