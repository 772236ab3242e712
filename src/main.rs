use clap::{Args, Parser, Subcommand};
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

use detection_dashboard::{
    ChartRenderer, Dashboard, DashboardConfig, Pipeline, PlottersRenderer, SkipCharts, server,
};

#[derive(Parser)]
#[command(name = "detection-dashboard")]
#[command(about = "Compare detections across RAW, CLAHE and AOD-Net preprocessed images")]
struct Cli {
    #[command(flatten)]
    dirs: DirArgs,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Args)]
struct DirArgs {
    /// Root containing the *_images and *_detect run directories
    #[arg(long, global = true, env = "DASHBOARD_BASE_RUNS", default_value = ".")]
    base_runs: PathBuf,

    /// Override the RAW image directory
    #[arg(long, global = true, value_name = "DIR")]
    raw_images: Option<PathBuf>,

    /// Override the CLAHE image directory
    #[arg(long, global = true, value_name = "DIR")]
    clahe_images: Option<PathBuf>,

    /// Override the AOD-Net image directory
    #[arg(long, global = true, value_name = "DIR")]
    aodnet_images: Option<PathBuf>,

    /// Override the RAW label directory
    #[arg(long, global = true, value_name = "DIR")]
    raw_labels: Option<PathBuf>,

    /// Override the CLAHE label directory
    #[arg(long, global = true, value_name = "DIR")]
    clahe_labels: Option<PathBuf>,

    /// Override the AOD-Net label directory
    #[arg(long, global = true, value_name = "DIR")]
    aodnet_labels: Option<PathBuf>,

    /// Where generated charts are written (served under /static/plots)
    #[arg(long, global = true, env = "DASHBOARD_PLOTS_DIR", default_value = "static/plots")]
    plots_dir: PathBuf,
}

impl DirArgs {
    fn into_config(self) -> DashboardConfig {
        let mut config = DashboardConfig::from_base_runs(&self.base_runs, self.plots_dir);
        let overrides = [
            (Pipeline::Raw, self.raw_images, self.raw_labels),
            (Pipeline::Clahe, self.clahe_images, self.clahe_labels),
            (Pipeline::AodNet, self.aodnet_images, self.aodnet_labels),
        ];
        for (pipeline, images, labels) in overrides {
            if let Some(dir) = images {
                config = config.with_images_dir(pipeline, dir);
            }
            if let Some(dir) = labels {
                config = config.with_labels_dir(pipeline, dir);
            }
        }
        config
    }
}

#[derive(Subcommand)]
enum Command {
    /// Serve the comparison dashboard (default)
    Serve {
        #[arg(long, default_value = "0.0.0.0")]
        host: IpAddr,

        #[arg(long, default_value_t = 5000)]
        port: u16,
    },
    /// Print every stem found in the RAW image directory
    List,
    /// Print the detection comparison for one stem
    Compare {
        #[arg(value_name = "STEM")]
        stem: String,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,

        /// Skip writing the chart images
        #[arg(long)]
        no_charts: bool,
    },
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Cli::parse();
    init_tracing(args.verbose);

    let config = args.dirs.into_config();
    for (pipeline, dirs) in config.pipelines.iter() {
        tracing::debug!(
            "{}: images {} labels {}",
            pipeline,
            dirs.images.display(),
            dirs.labels.display()
        );
    }

    let command = args.command.unwrap_or(Command::Serve {
        host: IpAddr::from([0, 0, 0, 0]),
        port: 5000,
    });

    match command {
        Command::Serve { host, port } => {
            config.ensure_plots_dir()?;
            let dashboard = Dashboard::new(config, Arc::new(PlottersRenderer::new()));
            server::serve(dashboard, SocketAddr::new(host, port)).await?;
        }
        Command::List => {
            let dashboard = Dashboard::new(config, Arc::new(SkipCharts));
            for stem in dashboard.index()? {
                println!("{}", stem);
            }
        }
        Command::Compare {
            stem,
            json,
            no_charts,
        } => {
            let renderer: Arc<dyn ChartRenderer> = if no_charts {
                Arc::new(SkipCharts)
            } else {
                config.ensure_plots_dir()?;
                Arc::new(PlottersRenderer::new())
            };
            let dashboard = Dashboard::new(config, renderer);
            let result = dashboard.compare(&stem)?;

            if json {
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else {
                println!("\n=== Detection Comparison: {} ===", result.stem);
                for (pipeline, stats) in result.stats.iter() {
                    let image = result
                        .image_urls
                        .get(pipeline)
                        .as_deref()
                        .unwrap_or("no image");
                    println!(
                        "  {:<8} detections: {:>4}  confidence sum: {:>8.2}  {}",
                        pipeline.display_name(),
                        stats.count,
                        stats.confidence_sum,
                        image
                    );
                }
                if !no_charts {
                    println!("\nCharts written to {}", dashboard.config().plots_dir.display());
                }
            }
        }
    }

    Ok(())
}
