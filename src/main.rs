//! Command line entry point: runs one workflow against live services and exits
//! with the code the summary dictates.

use anyhow::Result;
use clap::{Parser, ValueEnum};
use journal_e2e::report::{render_header, render_summary};
use journal_e2e::{exit_codes, logging, HarnessConfig, RunMode, SessionContext, WorkflowRunner};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ModeArg {
    /// Backend CRUD plus every AI step
    Full,
    /// Backend CRUD only
    BackendOnly,
    /// Short smoke run across both services
    Mvp,
}

impl From<ModeArg> for RunMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Full => RunMode::Full,
            ModeArg::BackendOnly => RunMode::BackendOnly,
            ModeArg::Mvp => RunMode::Mvp,
        }
    }
}

#[derive(Parser)]
#[command(
    name = "journal-e2e",
    version,
    about = "End-to-end check of the health journal backend and AI analysis service"
)]
struct Cli {
    /// Workflow to run (overrides E2E_MODE).
    #[arg(long, value_enum)]
    mode: Option<ModeArg>,

    /// Backend base URL, including the /api prefix (overrides BACKEND_URL).
    #[arg(long)]
    backend_url: Option<String>,

    /// Analysis service base URL (overrides AI_SERVICE_URL).
    #[arg(long)]
    analysis_url: Option<String>,

    /// Analysis service API key (overrides AI_API_KEY).
    #[arg(long)]
    api_key: Option<String>,

    /// Identity to register as; a fresh one is generated by default.
    #[arg(long)]
    email: Option<String>,

    /// Password for the test identity (overrides TEST_PASSWORD).
    #[arg(long)]
    password: Option<String>,

    /// Count AI steps towards the exit code.
    #[arg(long)]
    require_ai: bool,

    /// Skip the pauses before rate-limited calls.
    #[arg(long)]
    no_pacing: bool,
}

fn main() {
    logging::init();

    let cli = Cli::parse();
    let config = match build_config(cli) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("{:#}", err);
            std::process::exit(exit_codes::CONFIGURATION);
        }
    };

    let runtime = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(err) => {
            eprintln!("failed to start runtime: {err}");
            std::process::exit(exit_codes::CONFIGURATION);
        }
    };

    let code = runtime.block_on(run(config));
    std::process::exit(code);
}

fn build_config(cli: Cli) -> Result<HarnessConfig> {
    let mut config = HarnessConfig::from_env()?;

    if let Some(mode) = cli.mode {
        config.mode = mode.into();
        config.pacing = HarnessConfig::pacing_for(config.mode);
    }
    if let Some(url) = cli.backend_url {
        config.backend.base_url = url;
    }
    if let Some(url) = cli.analysis_url {
        config.analysis.base_url = url;
    }
    if let Some(key) = cli.api_key {
        config.analysis.api_key = Some(key);
    }
    if let Some(email) = cli.email {
        config.credentials.email = email;
    }
    if let Some(password) = cli.password {
        config.credentials.password = password;
    }
    config.require_ai |= cli.require_ai;
    if cli.no_pacing {
        config.pacing = config.pacing.without_delays();
    }

    config.validate()?;
    Ok(config)
}

async fn run(config: HarnessConfig) -> i32 {
    println!("{}", render_header(&config));

    let runner = WorkflowRunner::from_config(&config);
    let mut ctx = SessionContext::new(config.credentials.clone());
    let summary = runner.run(&mut ctx).await;

    println!("{}", render_summary(&summary));
    summary.exit_code()
}
