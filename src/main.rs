use clap::{Parser, Subcommand};
use image_resize_lambda::config::{self, HandlerConfig, LogConfig};
use image_resize_lambda::handler::{self, AppState};
use image_resize_lambda::imaging::{self, TargetSize};
use image_resize_lambda::storage::S3Store;
use lambda_http::{Error, service_fn};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

fn version_string() -> &'static str {
    let on_tag = env!("ON_RELEASE_TAG");
    if on_tag == "true" {
        env!("CARGO_PKG_VERSION")
    } else {
        let hash = env!("GIT_HASH");
        if hash.is_empty() {
            "dev@unknown"
        } else {
            // Leaked once at startup
            Box::leak(format!("dev@{hash}").into_boxed_str())
        }
    }
}

#[derive(Parser)]
#[command(name = "image-resize-lambda")]
#[command(about = "Resize uploaded images to 800x600 and store them in S3")]
#[command(long_about = "\
Resize uploaded images to 800x600 and store them in S3

Run without a subcommand (as the Lambda runtime does) to serve requests.
Each request body is JSON with a base64 image:

  {\"image\": \"<base64 or data URL>\"}

The image is resized to exactly 800x600 (aspect ratio is not kept),
re-encoded in its original format, uploaded to DESTINATION_BUCKET, and
answered with a presigned GET URL valid for PRESIGNED_URL_TTL_SECS.

Run 'image-resize-lambda gen-config' for all configuration options.")]
#[command(version = version_string())]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Serve Lambda invocations (the default)
    Serve {
        /// Config file layered under the environment (skipped if missing)
        #[arg(long, default_value = config::CONFIG_FILE)]
        config: PathBuf,
    },
    /// Print a config template with all options documented
    GenConfig,
    /// Resize a local image file the same way the handler does
    Resize {
        /// Image to resize
        input: PathBuf,
        /// Where to write the result (same format as the input)
        output: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    let cli = Cli::parse();

    let command = cli.command.unwrap_or(Command::Serve {
        config: PathBuf::from(config::CONFIG_FILE),
    });
    match command {
        Command::Serve { config } => serve(&config).await?,
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
        Command::Resize { input, output } => {
            let resized = imaging::resize_file(&input, &output, TargetSize::FIXED)?;
            println!(
                "{} -> {} ({}, {}x{}, {} bytes)",
                input.display(),
                output.display(),
                resized.format,
                resized.width,
                resized.height,
                resized.bytes.len()
            );
        }
    }

    Ok(())
}

/// Build the injected state once per container, then hand control to the runtime.
async fn serve(config_path: &Path) -> Result<(), Error> {
    let config = HandlerConfig::load(config_path)?;
    init_tracing(&config.log);
    tracing::info!(
        version = version_string(),
        bucket = %config.destination_bucket,
        url_expiry_secs = config.url_expiry_secs,
        "cold start"
    );

    let sdk_config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
    let store = S3Store::new(
        aws_sdk_s3::Client::new(&sdk_config),
        config.destination_bucket.clone(),
    );
    let state = Arc::new(AppState { store, config });

    lambda_http::run(service_fn(move |event| {
        let state = Arc::clone(&state);
        async move { handler::function_handler(event, &state).await }
    }))
    .await
}

/// JSON lines for CloudWatch, or human-readable text for local runs.
///
/// CloudWatch stamps every line itself, so the JSON output omits timestamps.
fn init_tracing(log: &LogConfig) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&log.level));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false);

    let result = if log.format == "json" {
        builder
            .json()
            .with_current_span(true)
            .without_time()
            .try_init()
    } else {
        builder.try_init()
    };
    if let Err(e) = result {
        eprintln!("tracing already initialised: {e}");
    }
}
