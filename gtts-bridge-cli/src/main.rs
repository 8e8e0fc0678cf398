use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use gtts_bridge_core::{parse_slow, Backend, Bridge, Settings, SettingsManager, SynthesisOptions};
use std::fs::OpenOptions;
use std::io::IsTerminal;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Mutex;
use tracing::info;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum BackendArg {
    GoogleTranslate,
    GttsCli,
}

impl From<BackendArg> for Backend {
    fn from(arg: BackendArg) -> Self {
        match arg {
            BackendArg::GoogleTranslate => Backend::GoogleTranslate,
            BackendArg::GttsCli => Backend::GttsCli,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "gtts-bridge")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Read text from stdin and write spoken MP3 audio to stdout")]
struct Args {
    /// Language code, e.g. ar, en, fr-CA
    lang: Option<String>,

    /// Speak slowly when this is "true" (any case); every other value means normal speed
    slow: Option<String>,

    /// Load settings from a specific file
    #[arg(long, value_name = "PATH")]
    settings_path: Option<PathBuf>,

    /// Synthesis backend
    #[arg(long, value_enum)]
    backend: Option<BackendArg>,

    /// Allow installing gtts-cli when the gtts-cli backend cannot find it
    #[arg(long)]
    auto_install: bool,

    /// Top-level domain of the Google host, e.g. com, co.uk
    #[arg(long)]
    tld: Option<String>,

    /// Print supported language codes and exit
    #[arg(long)]
    list_languages: bool,

    /// Debug logging
    #[arg(short, long)]
    verbose: bool,

    /// Write logs to this file instead of stderr
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,
}

fn main() -> ExitCode {
    let args = Args::parse();

    if let Err(e) = setup_tracing(args.verbose, args.log_file.as_deref()) {
        eprintln!("ERROR: {e:#}");
        return ExitCode::FAILURE;
    }

    let result = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to start runtime")
        .and_then(|runtime| runtime.block_on(async_main(args)));

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("ERROR: {e:#}");
            ExitCode::FAILURE
        }
    }
}

async fn async_main(args: Args) -> Result<()> {
    let settings = resolve_settings(&args, load_settings(args.settings_path.clone())?);
    let options = resolve_options(&args, &settings);

    info!(
        "CLI startup: lang={}, slow={}, backend={:?}, auto_install={}",
        options.lang, options.slow, settings.backend, settings.auto_install
    );

    let bridge = Bridge::new(&settings)?;

    if args.list_languages {
        for language in bridge.provider().supported_languages() {
            println!("{}\t{}", language.code, language.name);
        }
        return Ok(());
    }

    let mut stdin = tokio::io::stdin();
    let mut stdout = tokio::io::stdout();
    let mut stderr = std::io::stderr();
    if let Err(e) = bridge
        .run(&options, &mut stdin, &mut stdout, &mut stderr)
        .await
    {
        tracing::debug!(kind = e.kind(), retryable = e.is_retryable(), "Bridge run failed");
        return Err(e.into());
    }
    Ok(())
}

fn load_settings(path: Option<PathBuf>) -> Result<Settings> {
    let path = match path {
        Some(path) => path,
        None => match SettingsManager::default_settings_path() {
            Ok(path) => path,
            Err(e) => {
                tracing::debug!(error = %e, "No home directory, using default settings");
                return Ok(Settings::default());
            }
        },
    };
    Ok(SettingsManager::from_path(path)?.into_settings())
}

/// Command-line flags win over the settings file.
fn resolve_settings(args: &Args, mut settings: Settings) -> Settings {
    if let Some(backend) = args.backend {
        settings.backend = backend.into();
    }
    if args.auto_install {
        settings.auto_install = true;
    }
    if let Some(tld) = &args.tld {
        settings.google.tld = tld.clone();
    }
    settings
}

fn resolve_options(args: &Args, settings: &Settings) -> SynthesisOptions {
    SynthesisOptions {
        lang: args
            .lang
            .clone()
            .unwrap_or_else(|| settings.default_lang.clone()),
        slow: args
            .slow
            .as_deref()
            .map(parse_slow)
            .unwrap_or(settings.slow),
    }
}

fn setup_tracing(verbose: bool, log_file: Option<&Path>) -> Result<()> {
    use tracing_subscriber::fmt;

    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    match log_file {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Failed to open log file {path:?}"))?;

            tracing_subscriber::registry()
                .with(
                    fmt::layer()
                        .with_writer(Mutex::new(file))
                        .with_ansi(false)
                        .with_target(true)
                        .with_file(true)
                        .with_line_number(true),
                )
                .with(filter)
                .init();
        }
        None => {
            // stdout carries audio, so logs must never go there.
            tracing_subscriber::registry()
                .with(
                    fmt::layer()
                        .with_writer(std::io::stderr)
                        .with_ansi(std::io::stderr().is_terminal())
                        .with_target(false),
                )
                .with(filter)
                .init();
        }
    }
    Ok(())
}
