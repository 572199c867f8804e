mod pipeline;

use std::process::ExitCode;

use analysis_service::telemetry;
use analysis_service::{AnalysisClient, AnalysisServiceConfig};
use change_collector::ActionContext;
use pipeline::Outcome;
use tracing::{Level, error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> ExitCode {
    // Local runs may keep their variables in a .env file; on CI it is absent.
    let dotenv = dotenvy::dotenv();

    let level = if telemetry::runner_debug_enabled(|k| std::env::var(k).ok()) {
        Level::DEBUG
    } else {
        Level::INFO
    };

    tracing_subscriber::registry()
        .with(telemetry::env_filter_with_level("warn", level))
        .with(telemetry::layer())
        .init();

    if let Ok(path) = dotenv {
        info!(path = %path.display(), "loaded .env");
    }

    match run().await {
        Ok(outcome) => {
            info!(?outcome, "done");
            ExitCode::SUCCESS
        }
        Err(err) => {
            error!("general error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run() -> anyhow::Result<Outcome> {
    let Some(ctx) = ActionContext::from_env()? else {
        return Ok(Outcome::Skipped);
    };

    let github = ctx.provider.build_client()?;
    let analysis = AnalysisClient::new(AnalysisServiceConfig::from_env()?)?;
    info!(endpoint = analysis.endpoint(), "analysis service configured");

    pipeline::run(&ctx, &github, &analysis).await
}
