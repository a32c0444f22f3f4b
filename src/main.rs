use clap::{Parser, Subcommand};
use image_triage::config::{self, AppConfig};
use image_triage::report::AnalyzeResponse;
use image_triage::{output, pipeline, server};
use std::net::IpAddr;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "image-triage")]
#[command(about = "Rule-based image type classifier")]
#[command(long_about = "\
Rule-based image type classifier

Sorts an image into one of five coarse categories from six measurements
of noise, entropy, edge structure and color:

  Screenshot / UI / Text Image        straight edges, dense edges, low noise
  Digital Illustration / Artwork      few colors, low entropy, low noise
  Poster / Wallpaper / Stylized Art   strong saturation, moderate noise
  Photographic-looking Image          high entropy, high noise
  Unknown / Mixed                     none of the above

The first matching category wins. No model, no training data: the rules
are fixed.

Run 'image-triage gen-config' to generate a documented config.toml.")]
#[command(version)]
struct Cli {
    /// Config file (default: ./config.toml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the HTTP service
    Serve {
        /// Address to listen on (overrides server.bind)
        #[arg(long)]
        bind: Option<IpAddr>,
        /// TCP port (overrides server.port)
        #[arg(long)]
        port: Option<u16>,
    },
    /// Classify a single local image file
    Classify {
        /// Image file to classify
        file: PathBuf,
        /// Print the JSON body the HTTP service would return
        #[arg(long)]
        json: bool,
    },
    /// Print a stock config.toml with all options documented
    GenConfig,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Command::Serve { bind, port } => {
            let mut app_config = load_config(cli.config.as_deref())?;
            init_tracing(&app_config);
            if let Some(bind) = bind {
                app_config.server.bind = bind;
            }
            if let Some(port) = port {
                app_config.server.port = port;
            }
            tracing::info!("image-triage v{}", env!("CARGO_PKG_VERSION"));
            server::serve(&app_config.server).await?;
        }
        Command::Classify { file, json } => {
            let app_config = load_config(cli.config.as_deref())?;
            init_tracing(&app_config);
            let bytes = std::fs::read(&file)?;
            let filename = file
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            let analysis = tokio::task::spawn_blocking(move || pipeline::analyze(&bytes)).await??;

            if json {
                let body = AnalyzeResponse {
                    filename,
                    result: analysis.result,
                };
                println!("{}", serde_json::to_string_pretty(&body)?);
            } else {
                output::print_report(&filename, &analysis.result, Some(&analysis.features));
            }
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// An explicit `--config` must exist; the implicit `./config.toml` may not.
fn load_config(path: Option<&Path>) -> Result<AppConfig, config::ConfigError> {
    match path {
        Some(path) => config::load_config_file(path),
        None => config::load_config(Path::new(".")),
    }
}

/// Install the global subscriber. `RUST_LOG` wins over the config file.
///
/// Logs go to stderr so `classify --json` output stays parseable.
fn init_tracing(config: &AppConfig) {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.logging.filter)),
        )
        .init();
}
