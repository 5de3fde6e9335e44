//! Logging setup, component wiring and server startup.

use std::path::PathBuf;
use std::sync::Arc;

use tracing::{info, warn};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use stepgate_api::{ApiConfig, ApiServer, AppState};
use stepgate_channel_slack::{SlackChannel, SlackConfig as SlackChannelConfig};
use stepgate_config::{Config, ConfigLoader, ConfigValidator, LoggingConfig};
use stepgate_core::{DecisionGate, GateSettings, MemoryEngine, Notifier, RecordingChannel};
use stepgate_engine_stepfunctions::{Credentials, StepFunctionsConfig, StepFunctionsEngine};
use stepgate_protocols::{NotificationChannel, WorkflowEngine};

type BoxError = Box<dyn std::error::Error>;

/// Region and account used by dry runs when none are configured.
const DRY_RUN_REGION: &str = "us-east-1";
const DRY_RUN_ACCOUNT: &str = "000000000000";

/// Get the ~/.stepgate directory path.
pub(crate) fn stepgate_dir() -> PathBuf {
    dirs::home_dir()
        .map(|h| h.join(".stepgate"))
        .unwrap_or_else(|| PathBuf::from(".stepgate"))
}

/// Initialize tracing with console and, unless disabled, daily-rotated file
/// output (default `~/.stepgate/logs`).
pub(crate) fn init_tracing(logging: &LoggingConfig) -> Result<(), BoxError> {
    let file_layer = if logging.file {
        let log_dir = match logging.directory {
            Some(ref dir) => PathBuf::from(ConfigLoader::expand_path(&dir.to_string_lossy())),
            None => stepgate_dir().join("logs"),
        };
        std::fs::create_dir_all(&log_dir)?;

        let file_appender = RollingFileAppender::builder()
            .rotation(Rotation::DAILY)
            .filename_prefix("stepgate")
            .filename_suffix("log")
            .max_log_files(30)
            .build(&log_dir)?;
        let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

        // The guard flushes on drop; keep it for the life of the process.
        static GUARD: std::sync::OnceLock<tracing_appender::non_blocking::WorkerGuard> =
            std::sync::OnceLock::new();
        let _ = GUARD.set(guard);

        Some(fmt::layer().with_writer(non_blocking).with_ansi(false))
    } else {
        None
    };

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.level));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_target(true).with_ansi(true))
        .with(file_layer)
        .try_init()?;

    Ok(())
}

/// Fail on validation errors; log warnings.
pub(crate) fn validate(config: &Config) -> Result<(), BoxError> {
    let result = ConfigValidator::validate(config)?;
    for warning in &result.warnings {
        warn!("Config {}: {}", warning.path, warning.message);
    }
    if !result.is_valid() {
        let errors: Vec<String> = result
            .errors
            .iter()
            .map(|e| format!("{}: {}", e.path, e.message))
            .collect();
        return Err(format!("Invalid configuration:\n  {}", errors.join("\n  ")).into());
    }
    Ok(())
}

pub(crate) fn build_channel(
    config: &Config,
    dry_run: bool,
) -> Result<Arc<dyn NotificationChannel>, BoxError> {
    if dry_run {
        return Ok(Arc::new(RecordingChannel::new()));
    }
    let slack = SlackChannelConfig {
        webhook_url: config.slack.webhook_url()?.to_string(),
        timeout_seconds: config.slack.timeout_seconds,
    };
    Ok(Arc::new(SlackChannel::new(slack)?))
}

pub(crate) fn build_engine(
    config: &Config,
    dry_run: bool,
) -> Result<Arc<dyn WorkflowEngine>, BoxError> {
    if dry_run {
        return Ok(Arc::new(MemoryEngine::permissive()));
    }
    Ok(Arc::new(engine_with_credentials(config, Credentials::from_env())?))
}

/// Unsigned requests are only allowed against an overridden endpoint (local
/// emulators); AWS itself rejects them.
pub(crate) fn engine_with_credentials(
    config: &Config,
    credentials: Option<Credentials>,
) -> Result<StepFunctionsEngine, BoxError> {
    let sfn = StepFunctionsConfig {
        region: config.engine.region()?.to_string(),
        endpoint: config.engine.endpoint.clone(),
        timeout_seconds: config.engine.timeout_seconds,
    };
    let engine = StepFunctionsEngine::new(sfn)?.with_credentials(credentials);
    if !engine.is_signing() {
        match config.engine.endpoint {
            Some(ref endpoint) => warn!("No AWS credentials, requests to {} are unsigned", endpoint),
            None => {
                return Err("No AWS credentials found: set AWS_ACCESS_KEY_ID and \
                            AWS_SECRET_ACCESS_KEY, or point engine.endpoint at a local emulator"
                    .into());
            }
        }
    }
    Ok(engine)
}

/// Callback URL from config, or the local decision endpoint in dry runs.
pub(crate) fn callback_url(config: &Config, dry_run: bool) -> Result<String, BoxError> {
    match config.notifier.callback_url() {
        Ok(url) => Ok(url.to_string()),
        Err(_) if dry_run => Ok(format!(
            "http://{}:{}{}",
            config.server.host,
            config.server.port,
            stepgate_api::http::routes::DECISION_PATH
        )),
        Err(e) => Err(e.into()),
    }
}

pub(crate) fn build_notifier(
    config: &Config,
    channel: Arc<dyn NotificationChannel>,
    dry_run: bool,
) -> Result<Notifier, BoxError> {
    Ok(Notifier::new(&callback_url(config, dry_run)?, channel)?)
}

pub(crate) fn build_gate(
    config: &Config,
    engine: Arc<dyn WorkflowEngine>,
    channel: Arc<dyn NotificationChannel>,
    dry_run: bool,
) -> Result<DecisionGate, BoxError> {
    let (region, account_id) = match (config.engine.region(), config.engine.account_id()) {
        (Ok(region), Ok(account)) => (region.to_string(), account.to_string()),
        _ if dry_run => (
            config.engine.region.clone().unwrap_or_else(|| DRY_RUN_REGION.to_string()),
            config.engine.account_id.clone().unwrap_or_else(|| DRY_RUN_ACCOUNT.to_string()),
        ),
        (Err(e), _) | (_, Err(e)) => return Err(e.into()),
    };

    let settings = GateSettings::new(region, account_id)
        .with_ordered_approvals(config.gate.ordered_approvals)
        .with_max_listed_executions(config.gate.max_listed_executions);
    Ok(DecisionGate::new(settings, engine, channel))
}

/// Build the application state.
pub(crate) fn build_state(config: &Config, dry_run: bool) -> Result<Arc<AppState>, BoxError> {
    let channel = build_channel(config, dry_run)?;
    let engine = build_engine(config, dry_run)?;
    let notifier = build_notifier(config, channel.clone(), dry_run)?;
    let gate = build_gate(config, engine, channel, dry_run)?;
    Ok(Arc::new(AppState::new(Arc::new(gate), Arc::new(notifier))))
}

/// Run the server in foreground.
pub(crate) async fn run_server(
    mut config: Config,
    host: Option<String>,
    port: Option<u16>,
    dry_run: bool,
) -> Result<(), BoxError> {
    if let Some(host) = host {
        config.server.host = host;
    }
    if let Some(port) = port {
        config.server.port = port;
    }

    info!("Starting stepgate v{}", env!("CARGO_PKG_VERSION"));
    if dry_run {
        warn!("Dry run: decisions go to an in-memory engine, messages are only logged");
    } else {
        validate(&config)?;
    }

    let state = build_state(&config, dry_run)?;
    info!(
        "Decision gate ready (engine: {}, channel: {}, ordered approvals: {})",
        state.gate.engine_id(),
        state.gate.channel_id(),
        config.gate.ordered_approvals
    );
    info!("Approval links point at {}", state.notifier.callback_url());

    let server = ApiServer::new(
        ApiConfig::new(config.server.host.clone(), config.server.port),
        state,
    );
    server.run().await
}
