//! Application startup and command dispatch

use super::cli::api::{load_config, Args, Command};
use crate::client::api::{ClientError, HttpFetcher, UpdateChecker, UpdateResult};
use crate::core::error_handling::{log_error_with_context, ContextualError};
use crate::core::logging::init_logging;
use crate::delivery::api::serve;
use crate::plugin::api::{
    ConfigError, PluginConfig, PluginError, ResolvedConfig, VersionPlugin, WriteOutcome,
};
use clap::Parser;
use futures::StreamExt;
use std::io::IsTerminal;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Plugin(#[from] PluginError),

    #[error(transparent)]
    Client(#[from] ClientError),

    #[error("cannot listen on {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        source: std::io::Error,
    },

    #[error("server failed: {0}")]
    Serve(std::io::Error),

    #[error("no local artifact at {}; run 'verstamp build' first", path.display())]
    MissingBaseline { path: PathBuf },

    #[error("could not write {}: {message}", path.display())]
    Output { path: PathBuf, message: String },
}

impl ContextualError for StartupError {
    fn is_user_actionable(&self) -> bool {
        match self {
            StartupError::Config(_) => true,
            StartupError::Plugin(e) => e.is_user_actionable(),
            _ => false,
        }
    }

    fn user_message(&self) -> Option<&str> {
        match self {
            StartupError::Config(e) => e.user_message(),
            StartupError::Plugin(e) => e.user_message(),
            _ => None,
        }
    }
}

/// Parse arguments, start logging and run the selected command
pub fn startup() -> ExitCode {
    let args = Args::parse();

    let use_color = args.use_color(std::io::stderr().is_terminal());
    let log_file = args.log_file.as_ref().map(|p| p.to_string_lossy().to_string());
    if let Err(e) = init_logging(
        args.log_level.as_deref(),
        args.log_format(),
        log_file.as_deref(),
        use_color,
    ) {
        eprintln!("Error: cannot initialise logging: {}", e);
        return ExitCode::FAILURE;
    }
    log::debug!("arguments: {:?}", args);

    let runtime = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            log::error!("FATAL: cannot start async runtime: {}", e);
            return ExitCode::FAILURE;
        }
    };

    match runtime.block_on(run(args)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            let fallback = e.to_string();
            log_error_with_context(&e, &fallback);
            ExitCode::FAILURE
        }
    }
}

/// Run one command to completion
pub async fn run(args: Args) -> Result<(), StartupError> {
    let config = load_config(&args).await?;

    match args.command {
        Command::Build { mode } => build(&config, &mode).await,
        Command::Serve { addr, mode } => serve_dev(&config, addr, &mode).await,
        Command::Show { mode } => show(&config, &mode).await,
        Command::Check { url, watch } => check(&config, &url, watch).await,
    }
}

async fn build(config: &PluginConfig, mode: &str) -> Result<(), StartupError> {
    let mut plugin = VersionPlugin::new();
    plugin.config_resolved(config, mode)?;
    plugin.build_start().await?;
    let output = plugin.generate_bundle().await?;

    // the declaration file is a convenience, the artifact is not
    if let WriteOutcome::Failed { path, message } = output.artifact {
        return Err(StartupError::Output { path, message });
    }
    Ok(())
}

async fn serve_dev(config: &PluginConfig, addr: SocketAddr, mode: &str) -> Result<(), StartupError> {
    let mut plugin = VersionPlugin::new();
    plugin.config_resolved(config, mode)?;
    let state = plugin.configure_server().await?;

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|source| StartupError::Bind { addr, source })?;
    serve(listener, state).await.map_err(StartupError::Serve)
}

async fn show(config: &PluginConfig, mode: &str) -> Result<(), StartupError> {
    let mut plugin = VersionPlugin::new();
    plugin.config_resolved(config, mode)?;
    let artifact = plugin.build_start().await?;
    print!("{}", artifact.text());
    Ok(())
}

async fn check(config: &PluginConfig, url: &str, watch: Option<u64>) -> Result<(), StartupError> {
    let resolved = ResolvedConfig::resolve(config)?;
    let path = resolved.artifact_path;
    let baseline: serde_json::Value = match tokio::fs::read_to_string(&path).await {
        Ok(text) => serde_json::from_str(&text).map_err(|e| ClientError::Parse {
            message: format!("{}: {}", path.display(), e),
        })?,
        Err(_) => return Err(StartupError::MissingBaseline { path }),
    };

    let fetcher = Arc::new(HttpFetcher::new()?);
    let checker = Arc::new(UpdateChecker::new(baseline, url, fetcher));

    match watch {
        None => {
            report(&checker.check().await);
            Ok(())
        }
        Some(secs) => {
            let interval = Duration::from_secs(secs.max(1));
            log::info!("checking {} every {}s, press Ctrl+C to stop", url, interval.as_secs());
            let mut updates = Box::pin(checker.watch(interval));
            loop {
                tokio::select! {
                    next = updates.next() => match next {
                        Some(result) => report(&result),
                        None => break,
                    },
                    _ = tokio::signal::ctrl_c() => break,
                }
            }
            Ok(())
        }
    }
}

fn report(result: &UpdateResult) {
    let line = serde_json::json!({
        "updated": result.updated,
        "latest": result.latest,
    });
    println!("{}", line);
}
