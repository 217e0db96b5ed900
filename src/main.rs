/// Version injected at compile time via AUDITBASE_VERSION env var (set by CI/CD),
/// or "dev" for local builds.
pub const VERSION: &str = match option_env!("AUDITBASE_VERSION") {
    Some(v) => v,
    None => "dev",
};

use anyhow::Result;
use auditbase_backoffice::backoffice::http::format_api_error;
use auditbase_backoffice::config::{self, Config};
use auditbase_backoffice::{
    BackOffice, HttpTransport, ListParams, ResourceClient, ResourceKind,
};
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use serde_json::{json, Value};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use tracing::Level;
use tracing_subscriber::fmt::writer::MakeWriterExt;

/// Query the Auditbase back office
#[derive(Parser, Debug)]
#[command(name = "auditbase-backoffice", version = VERSION, about, long_about = None)]
struct Args {
    /// Back office base URL
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// Bearer token
    #[arg(long, global = true)]
    token: Option<String>,

    /// Extra request header, as `Name: value` (repeatable)
    #[arg(long = "header", global = true, value_parser = config::parse_header)]
    headers: Vec<(String, String)>,

    /// Output format
    #[arg(long, value_enum, default_value = "json", global = true)]
    output: OutputFormat,

    /// Persist the effective connection settings
    #[arg(long, global = true)]
    save: bool,

    /// Log level for debugging
    #[arg(long, value_enum, default_value = "off", global = true)]
    log_level: LogLevel,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Fetch a single resource by id
    One {
        /// entities, events, microservices, properties or changes
        kind: ResourceKind,
        id: String,
    },
    /// Fetch one page of a resource collection
    Many {
        kind: ResourceKind,

        /// Filter as `key=value` (repeatable)
        #[arg(long = "filter", value_parser = ListParams::parse_filter)]
        filters: Vec<(String, String)>,

        #[arg(long)]
        page: Option<u32>,

        #[arg(long)]
        per_page: Option<u32>,
    },
    /// Count stored events
    Count,
    /// Fetch the first page of every resource type
    Summary,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    Json,
    Yaml,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    fn to_tracing_level(self) -> Option<Level> {
        match self {
            LogLevel::Off => None,
            LogLevel::Error => Some(Level::ERROR),
            LogLevel::Warn => Some(Level::WARN),
            LogLevel::Info => Some(Level::INFO),
            LogLevel::Debug => Some(Level::DEBUG),
            LogLevel::Trace => Some(Level::TRACE),
        }
    }
}

fn setup_logging(level: LogLevel) -> Result<Option<tracing_appender::non_blocking::WorkerGuard>> {
    let Some(tracing_level) = level.to_tracing_level() else {
        return Ok(None);
    };

    let log_path = get_log_path();

    if let Some(parent) = log_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)?;

    let (non_blocking, guard) = tracing_appender::non_blocking(file);

    tracing_subscriber::fmt()
        .with_max_level(tracing_level)
        .with_writer(non_blocking.with_max_level(tracing_level))
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(true)
        .with_line_number(true)
        .init();

    tracing::info!("auditbase-backoffice {} started with log level: {:?}", VERSION, level);
    tracing::info!("Log file: {:?}", log_path);

    Ok(Some(guard))
}

fn get_log_path() -> PathBuf {
    if let Some(config_dir) = dirs::config_dir() {
        return config_dir.join("auditbase").join("backoffice.log");
    }
    if let Some(home) = dirs::home_dir() {
        return home.join(".auditbase").join("backoffice.log");
    }
    PathBuf::from("backoffice.log")
}

fn print_output<T: Serialize>(value: &T, format: OutputFormat) -> Result<()> {
    let rendered = match format {
        OutputFormat::Json => serde_json::to_string_pretty(value)?,
        OutputFormat::Yaml => serde_yaml::to_string(value)?,
    };
    println!("{}", rendered.trim_end());
    Ok(())
}

async fn run(args: Args) -> Result<()> {
    let config = Config::load().merge(args.base_url, args.token, args.headers);
    if args.save {
        config.save()?;
    }

    let base_url = config.effective_base_url();
    tracing::info!("Using back office at {}", base_url);

    let transport = HttpTransport::new(&base_url, &config.headers, config.token.clone())?;
    let back_office = BackOffice::new(ResourceClient::new(Arc::new(transport)));

    match args.command {
        Command::One { kind, id } => {
            let resource = back_office.proxy(kind).one(&id).await?;
            print_output(&resource, args.output)
        }
        Command::Many {
            kind,
            filters,
            page,
            per_page,
        } => {
            let mut params = ListParams::new();
            for (key, value) in &filters {
                params = params.filter(key, value);
            }
            if let Some(page) = page {
                params = params.page(page);
            }
            if let Some(per_page) = per_page {
                params = params.per_page(per_page);
            }

            let page = back_office
                .proxy(kind)
                .many(&params.into_parameters())
                .await?;
            print_output(&page, args.output)
        }
        Command::Count => {
            let count = back_office.count_events().await?;
            print_output(&json!({ "count": count }), args.output)
        }
        Command::Summary => {
            let parameters = ListParams::new().into_parameters();
            let proxies: Vec<_> = ResourceKind::ALL
                .into_iter()
                .map(|kind| back_office.proxy(kind))
                .collect();

            let results =
                futures::future::join_all(proxies.iter().map(|proxy| proxy.many(&parameters)))
                    .await;

            let mut summary = serde_json::Map::new();
            for (proxy, result) in proxies.iter().zip(results) {
                let entry = match result {
                    Ok(page) => json!({ "items": page.items().len(), "meta": page.meta }),
                    Err(e) => {
                        tracing::warn!("Failed to list {}: {:#}", proxy.kind(), e);
                        json!({ "error": format_api_error(&e) })
                    }
                };
                summary.insert(proxy.kind().to_string(), entry);
            }

            print_output(&Value::Object(summary), args.output)
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    let _log_guard = match setup_logging(args.log_level) {
        Ok(guard) => guard,
        Err(err) => {
            eprintln!("Failed to set up logging: {err:?}");
            None
        }
    };

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!("Command failed: {:#}", err);
            eprintln!("Error: {}", format_api_error(&err));
            ExitCode::FAILURE
        }
    }
}
