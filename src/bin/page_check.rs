//! page-check
//!
//! Runs a JSON check plan against a Chrome session and reports each step.

use anyhow::Context;
use browser_assert::{BrowserSession, ConnectionOptions, LaunchOptions, Plan, TestSession};
use clap::Parser;
use std::{path::PathBuf, process::ExitCode};

#[derive(Parser)]
#[command(name = "page-check")]
#[command(version)]
#[command(about = "Run browser page assertions from a JSON check plan", long_about = None)]
struct Cli {
    /// Check plan to run
    #[arg(value_name = "PLAN", required_unless_present = "schema")]
    plan: Option<PathBuf>,

    /// Base URL relative URIs are joined to (overrides the plan and BROWSER_ASSERT_BASE_URL)
    #[arg(long, value_name = "URL")]
    base_url: Option<String>,

    /// Launch browser in headed mode (default: headless)
    #[arg(long, short = 'H')]
    headed: bool,

    /// Path to custom browser executable
    #[arg(long, value_name = "PATH")]
    executable_path: Option<PathBuf>,

    /// WebSocket endpoint URL for remote browser connection
    #[arg(long, value_name = "URL")]
    ws_endpoint: Option<String>,

    /// Persistent browser profile directory
    #[arg(long, value_name = "DIR")]
    user_data_dir: Option<PathBuf>,

    /// Print the JSON schema of check plans and exit
    #[arg(long)]
    schema: bool,
}

fn main() -> anyhow::Result<ExitCode> {
    env_logger::init();
    let cli = Cli::parse();

    if cli.schema {
        println!("{}", serde_json::to_string_pretty(&Plan::schema())?);
        return Ok(ExitCode::SUCCESS);
    }

    let path = cli.plan.context("a check plan is required")?;
    let plan = Plan::load(&path).with_context(|| format!("loading {}", path.display()))?;
    let config = plan.session_config(cli.base_url.as_deref())?;

    let session = match cli.ws_endpoint {
        Some(ref endpoint) => {
            eprintln!("WebSocket endpoint: {}", endpoint);
            BrowserSession::connect(ConnectionOptions::new(endpoint))?
        }
        None => {
            let mut options = LaunchOptions::new().headless(!cli.headed);
            if let Some(ref path) = cli.executable_path {
                eprintln!("Browser executable: {}", path.display());
                options = options.chrome_path(path.clone());
            }
            if let Some(ref dir) = cli.user_data_dir {
                eprintln!("User data directory: {}", dir.display());
                options = options.user_data_dir(dir.clone());
            }
            eprintln!("Browser mode: {}", if cli.headed { "headed" } else { "headless" });
            BrowserSession::launch(options)?
        }
    };
    let session = session.status_timeout(config.status_timeout())?;

    eprintln!("Base URL: {}", config.base_url);
    let mut page = TestSession::new(session, config);
    let report = plan.run(&mut page);

    println!("{}", report);

    Ok(if report.passed() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
