/// Version injected at compile time via DOCEAN_VERSION env var (set by CI/CD),
/// or "dev" for local builds.
pub const VERSION: &str = match option_env!("DOCEAN_VERSION") {
    Some(v) => v,
    None => "dev",
};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use docean::api::http::format_api_error;
use docean::api::{auth, Client, ListOptions, Response};
use docean::config::{Config, OutputFormat};
use docean::resource::fetch_all;
use docean::webhook::{self, VerifyOptions};
use serde::Serialize;
use serde_json::Value;
use std::future::Future;
use std::path::PathBuf;
use tracing::Level;
use tracing_subscriber::fmt::writer::MakeWriterExt;

/// Command line client for the DigitalOcean API
#[derive(Parser, Debug)]
#[command(name = "docean", version = VERSION, about, long_about = None)]
struct Args {
    /// API token (defaults to DIGITALOCEAN_ACCESS_TOKEN or doctl's config)
    #[arg(short, long)]
    token: Option<String>,

    /// API endpoint
    #[arg(long)]
    api_url: Option<String>,

    /// Log level for debugging
    #[arg(long, value_enum, default_value = "off")]
    log_level: LogLevel,

    /// Output format
    #[arg(short, long, value_enum)]
    output: Option<OutputFormat>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show the account the token belongs to
    Account,
    /// Show the current API rate limit
    Rate,
    /// List resources of a kind
    List {
        #[arg(value_enum)]
        kind: Kind,
        /// Follow pagination and print every page
        #[arg(long)]
        all: bool,
        #[arg(long)]
        page: Option<u32>,
        #[arg(long)]
        per_page: Option<u32>,
    },
    /// Show a single resource
    Get {
        #[arg(value_enum)]
        kind: Kind,
        id: String,
    },
    /// Check a webhook delivery's Do-Signature header against its payload
    VerifyWebhook {
        #[arg(long)]
        secret: String,
        /// Value of the Do-Signature header
        #[arg(long)]
        signature: String,
        #[arg(long)]
        payload_file: PathBuf,
        /// Accept signatures of any age
        #[arg(long)]
        ignore_tolerance: bool,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Kind {
    Droplets,
    Images,
    Regions,
    Sizes,
    Snapshots,
    Domains,
    Vpcs,
    LoadBalancers,
    Databases,
    Kubernetes,
    Actions,
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

fn setup_logging(level: LogLevel) -> Option<tracing_appender::non_blocking::WorkerGuard> {
    let tracing_level = level.to_tracing_level()?;

    let log_path = get_log_path();

    if let Some(parent) = log_path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }

    let file = match std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
    {
        Ok(file) => file,
        Err(e) => {
            eprintln!("Failed to open log file {}: {}", log_path.display(), e);
            return None;
        }
    };

    let (non_blocking, guard) = tracing_appender::non_blocking(file);

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(tracing_level.as_str().to_lowercase())),
        )
        .with_writer(non_blocking.with_max_level(tracing_level))
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(true)
        .with_line_number(true)
        .init();

    tracing::info!("docean {} started with log level: {:?}", VERSION, level);
    tracing::info!("Log file: {:?}", log_path);

    Some(guard)
}

fn get_log_path() -> PathBuf {
    if let Some(config_dir) = dirs::config_dir() {
        return config_dir.join("docean").join("docean.log");
    }
    if let Some(home) = dirs::home_dir() {
        return home.join(".docean").join("docean.log");
    }
    PathBuf::from("docean.log")
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    let _log_guard = setup_logging(args.log_level);

    if let Err(err) = run(args).await {
        let message = match err.downcast_ref::<docean::Error>() {
            Some(api_err) => format_api_error(api_err),
            None => format!("{:#}", err),
        };
        tracing::error!("{}", message);
        eprintln!("Error: {}", message);
        std::process::exit(1);
    }
}

async fn run(args: Args) -> Result<()> {
    let config = Config::load();
    let output = config.effective_output(args.output);

    if let Command::VerifyWebhook {
        secret,
        signature,
        payload_file,
        ignore_tolerance,
    } = &args.command
    {
        let payload = std::fs::read(payload_file)
            .with_context(|| format!("reading {}", payload_file.display()))?;
        let opts = VerifyOptions {
            ignore_tolerance: *ignore_tolerance,
            ..Default::default()
        };
        webhook::verify(secret, &payload, signature, &opts)?;
        println!("signature verified");
        return Ok(());
    }

    let client = build_client(&args, &config)?;

    match args.command {
        Command::Account => {
            let (account, _) = client.account().get().await?;
            print_output(&account, output)
        }
        Command::Rate => {
            client.account().get().await?;
            print_output(&client.rate().await, output)
        }
        Command::List {
            kind,
            all,
            page,
            per_page,
        } => {
            let opts = ListOptions::new(page.unwrap_or(0), config.effective_per_page(per_page));
            let items = list_kind(&client, kind, opts, all).await?;
            print_output(&items, output)
        }
        Command::Get { kind, id } => {
            let item = get_kind(&client, kind, &id).await?;
            print_output(&item, output)
        }
        Command::VerifyWebhook { .. } => Ok(()),
    }
}

fn build_client(args: &Args, config: &Config) -> Result<Client> {
    let token = args
        .token
        .clone()
        .or_else(auth::default_token)
        .context("No API token. Pass --token, set DIGITALOCEAN_ACCESS_TOKEN, or run 'doctl auth init'")?;
    let api_url = config.effective_api_url(args.api_url.as_deref());

    tracing::info!("Using API endpoint {}", api_url);

    Ok(Client::builder()
        .token(&token)
        .base_url(&api_url)
        .user_agent(&format!("docean-cli/{}", VERSION))
        .build()?)
}

/// Run one list call, or every page with `all`, and render the items as JSON.
async fn collect<T, F, Fut>(opts: ListOptions, all: bool, mut list: F) -> docean::Result<Value>
where
    T: Serialize,
    F: FnMut(ListOptions) -> Fut,
    Fut: Future<Output = docean::Result<(Vec<T>, Response)>>,
{
    let items = if all {
        fetch_all(opts, list).await?
    } else {
        list(opts).await?.0
    };
    Ok(serde_json::to_value(items)?)
}

async fn list_kind(client: &Client, kind: Kind, opts: ListOptions, all: bool) -> Result<Value> {
    let value = match kind {
        Kind::Droplets => collect(opts, all, |o| async move { client.droplets().list(&o).await }).await?,
        Kind::Images => collect(opts, all, |o| async move { client.images().list(&o).await }).await?,
        Kind::Regions => collect(opts, all, |o| async move { client.regions().list(&o).await }).await?,
        Kind::Sizes => collect(opts, all, |o| async move { client.sizes().list(&o).await }).await?,
        Kind::Snapshots => {
            collect(opts, all, |o| async move { client.snapshots().list(&o).await }).await?
        }
        Kind::Domains => collect(opts, all, |o| async move { client.domains().list(&o).await }).await?,
        Kind::Vpcs => collect(opts, all, |o| async move { client.vpcs().list(&o).await }).await?,
        Kind::LoadBalancers => {
            collect(opts, all, |o| async move { client.load_balancers().list(&o).await }).await?
        }
        Kind::Databases => {
            collect(opts, all, |o| async move { client.databases().list(&o).await }).await?
        }
        Kind::Kubernetes => {
            collect(opts, all, |o| async move { client.kubernetes().list(&o).await }).await?
        }
        Kind::Actions => collect(opts, all, |o| async move { client.actions().list(&o).await }).await?,
    };
    Ok(value)
}

async fn get_kind(client: &Client, kind: Kind, id: &str) -> Result<Value> {
    let numeric = || -> Result<u64> {
        id.parse()
            .with_context(|| format!("{:?} ids are numeric, got '{}'", kind, id))
    };

    let value = match kind {
        Kind::Droplets => serde_json::to_value(client.droplets().get(numeric()?).await?.0)?,
        Kind::Images => match id.parse::<u64>() {
            Ok(image_id) => serde_json::to_value(client.images().get(image_id).await?.0)?,
            Err(_) => serde_json::to_value(client.images().get_by_slug(id).await?.0)?,
        },
        Kind::Actions => serde_json::to_value(client.actions().get(numeric()?).await?.0)?,
        Kind::Snapshots => serde_json::to_value(client.snapshots().get(id).await?.0)?,
        Kind::Domains => serde_json::to_value(client.domains().get(id).await?.0)?,
        Kind::Vpcs => serde_json::to_value(client.vpcs().get(id).await?.0)?,
        Kind::LoadBalancers => serde_json::to_value(client.load_balancers().get(id).await?.0)?,
        Kind::Databases => serde_json::to_value(client.databases().get(id).await?.0)?,
        Kind::Kubernetes => serde_json::to_value(client.kubernetes().get(id).await?.0)?,
        Kind::Regions | Kind::Sizes => bail!("{:?} cannot be fetched individually; use list", kind),
    };
    Ok(value)
}

fn print_output<T: Serialize>(value: &T, format: OutputFormat) -> Result<()> {
    let rendered = match format {
        OutputFormat::Json => serde_json::to_string_pretty(value)?,
        OutputFormat::Yaml => serde_yaml::to_string(value)?,
    };
    println!("{}", rendered.trim_end());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_list_command() {
        let args = Args::try_parse_from([
            "docean", "--output", "yaml", "list", "load-balancers", "--all", "--per-page", "200",
        ])
        .unwrap();

        assert_eq!(args.output, Some(OutputFormat::Yaml));
        match args.command {
            Command::List {
                kind,
                all,
                per_page,
                page,
            } => {
                assert_eq!(kind, Kind::LoadBalancers);
                assert!(all);
                assert_eq!(per_page, Some(200));
                assert_eq!(page, None);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_parse_verify_webhook() {
        let args = Args::try_parse_from([
            "docean",
            "verify-webhook",
            "--secret",
            "s3cret",
            "--signature",
            "t=1,v1=ab",
            "--payload-file",
            "body.json",
        ])
        .unwrap();

        assert!(matches!(args.command, Command::VerifyWebhook { ignore_tolerance: false, .. }));
    }

    #[test]
    fn test_unknown_kind_rejected() {
        assert!(Args::try_parse_from(["docean", "list", "floating-ips"]).is_err());
    }
}
