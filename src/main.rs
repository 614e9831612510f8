//! pageprobe - headless browser smoke test
//!
//! Main entry point for the CLI application.

use std::process::ExitCode;

use clap::Parser;
use pageprobe::cli::Args;
use pageprobe::probe::report::{render_json, render_text};
use pageprobe::{BrowserExecutor, Config, PageProbe, ProbeResult};
use tracing::warn;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn init_tracing(level: &str, json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let registry = tracing_subscriber::registry().with(filter);

    if json {
        registry
            .with(fmt::layer().json().with_target(true).with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_writer(std::io::stderr),
            )
            .init();
    }
}

fn print_result(args: &Args, result: &ProbeResult, expected_text: Option<&str>) -> anyhow::Result<()> {
    if args.json {
        println!("{}", render_json(result)?);
    } else {
        println!("{}", render_text(result, expected_text));
    }
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let args = Args::parse();

    if args.print_config {
        print!("{}", Config::default_config_toml());
        return Ok(ExitCode::SUCCESS);
    }

    // Build configuration; a broken config file is reported once logging is up
    let (mut config, config_error) = match Config::load() {
        Ok(config) => (config, None),
        Err(e) => (Config::default(), Some(e)),
    };

    // Apply CLI overrides
    if let Some(ref level) = args.log_level {
        config.logging.level = level.clone();
    }
    if args.json_logs {
        config.logging.json = true;
    }
    if args.headed {
        config.browser.headed = true;
    }

    init_tracing(&config.logging.level, config.logging.json);

    if let Some(e) = config_error {
        warn!(
            path = %Config::config_file().display(),
            "ignoring config file, using defaults: {}", e
        );
    }

    let request = match args.resolve_request(&config.probe, |key| std::env::var(key).ok()) {
        Ok(request) => request,
        Err(e) => {
            let result = ProbeResult::from_error(args.url.clone().unwrap_or_default(), &e);
            print_result(&args, &result, None)?;
            return Ok(ExitCode::from(result.exit_code()));
        }
    };

    if !args.json {
        println!("🔍 Navigating to {}", request.url);
    }

    let probe = PageProbe::new(BrowserExecutor::from_config(&config.browser));
    let result = probe.run(&request).await;

    print_result(&args, &result, request.expected_text.as_deref())?;

    Ok(ExitCode::from(result.exit_code()))
}
