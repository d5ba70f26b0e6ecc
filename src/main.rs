use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};

use panel_lens::data::loader;
use panel_lens::{Metric, Session, View, ViewOutcome};

#[derive(Parser)]
#[command(name = "panel-lens")]
#[command(about = "Explore a weekly wellbeing panel and emit chart specs as JSON", long_about = None)]
struct Cli {
    /// Dataset source: a .csv/.json path or an http(s) URL.
    #[arg(long, default_value = "time_df.csv")]
    data: String,

    /// Write the chart specs to this file instead of stdout.
    #[arg(long)]
    out: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compare a metric's mean evolution across groups
    GroupComparison {
        #[arg(long, default_value = "wellbeing")]
        metric: String,
        /// Comma-separated groups for the time series; all groups when omitted
        #[arg(long, value_delimiter = ',')]
        groups: Vec<String>,
    },
    /// Follow one user's metric over time
    UserEvolution {
        #[arg(long, default_value = "wellbeing")]
        metric: String,
        #[arg(long)]
        group: String,
        #[arg(long)]
        user: String,
    },
    /// Scatter two metrics against each other in one week's snapshot
    Scatter {
        #[arg(long)]
        x: String,
        #[arg(long)]
        y: String,
        #[arg(long)]
        week: i64,
    },
    /// Boxplot of one metric by last-week quartiles of another
    QuartileBoxplot {
        #[arg(long)]
        plot: String,
        #[arg(long)]
        quartiles: String,
    },
}

impl Commands {
    fn into_view(self, all_groups: &[String]) -> View {
        match self {
            Commands::GroupComparison { metric, groups } => View::GroupComparison {
                metric: Metric::from_column(&metric),
                groups: if groups.is_empty() {
                    all_groups.to_vec()
                } else {
                    groups
                },
            },
            Commands::UserEvolution {
                metric,
                group,
                user,
            } => View::UserEvolution {
                metric: Metric::from_column(&metric),
                group,
                user_id: user,
            },
            Commands::Scatter { x, y, week } => View::ScatterComparison {
                metric_x: Metric::from_column(&x),
                metric_y: Metric::from_column(&y),
                week,
            },
            Commands::QuartileBoxplot { plot, quartiles } => View::QuartileBoxplot {
                metric_to_plot: Metric::from_column(&plot),
                metric_for_quartiles: Metric::from_column(&quartiles),
            },
        }
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let dataset = loader::load_session(&cli.data)?;
    let mut session = Session::new(dataset.clone());
    session.select_view(cli.command.into_view(&dataset.groups));

    match session.evaluate() {
        ViewOutcome::Charts(specs) => {
            let json =
                serde_json::to_string_pretty(&specs).context("serializing chart specs")?;
            match cli.out {
                Some(path) => {
                    std::fs::write(&path, json)
                        .with_context(|| format!("writing {}", path.display()))?;
                    println!("Wrote {} chart spec(s) to {}.", specs.len(), path.display());
                }
                None => println!("{json}"),
            }
        }
        ViewOutcome::NoChart(reason) => {
            println!("No chart for current selection: {reason}.");
        }
    }

    Ok(())
}
