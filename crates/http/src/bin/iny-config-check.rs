//! iny-config-check: validate an Iny configuration file
//!
//! Loads the file, runs validation, and prints what a listener built from it
//! would advertise over ALPN and send as its initial HTTP/2 SETTINGS.

use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use tracing::{error, info};

use iny_config::Config;
use iny_http::{Http2Settings, ProtocolNegotiator};

/// Validate an Iny configuration file
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the configuration file (.kdl or .json)
    #[arg(short, long, default_value = "iny.kdl")]
    config: PathBuf,

    /// Print the effective configuration as JSON
    #[arg(long)]
    json: bool,
}

fn main() -> ExitCode {
    let args = Args::parse();

    if let Err(e) = iny_common::init_tracing() {
        eprintln!("Failed to initialize logging: {:#}", e);
        return ExitCode::FAILURE;
    }

    match run(&args, &mut io::stdout().lock()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(config = %args.config.display(), error = %format!("{:#}", e), "Invalid configuration");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args, out: &mut impl Write) -> Result<()> {
    let config = Config::from_file(&args.config)?;

    if args.json {
        writeln!(out, "{}", serde_json::to_string_pretty(&config)?)?;
        return Ok(());
    }

    let protocols: Vec<&str> = config
        .negotiation
        .protocols
        .iter()
        .map(|p| p.as_str())
        .collect();
    let fallback = ProtocolNegotiator::new().fallback_protocol();
    let settings = Http2Settings::from_config(&config.http2);

    writeln!(out, "ALPN protocols:   {}", protocols.join(", "))?;
    writeln!(out, "Fallback:         {}", fallback)?;
    writeln!(out, "Initial settings: {}", settings)?;
    writeln!(
        out,
        "Frame logging:    {}",
        if config.http2.frame_logging {
            config.http2.frame_log_level.as_str()
        } else {
            "off"
        }
    )?;

    info!(config = %args.config.display(), "Configuration is valid");
    Ok(())
}
