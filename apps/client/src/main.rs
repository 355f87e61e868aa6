//! smartreps - command-line front end for the SmartReps workout planner

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use smartreps_client::api::DEFAULT_API_URL;
use smartreps_client::form::{Field, PlanRequest};
use smartreps_client::plan::{render_plan_text, DayBlock};
use smartreps_client::{ApiClient, PlanView};

#[derive(Parser)]
#[command(name = "smartreps")]
#[command(author, version, about = "Generate a personalized workout plan with AI")]
struct Cli {
    /// Base URL of the SmartReps API
    #[arg(long, env = "SMARTREPS_API_URL", default_value = DEFAULT_API_URL, global = true)]
    api_url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a workout plan
    Generate {
        /// Fitness goal (repeat for several, e.g. -g "Build Muscle" -g Yoga)
        #[arg(short, long = "goal", required = true)]
        goals: Vec<String>,

        /// Available equipment (repeatable)
        #[arg(short, long = "equipment", required = true)]
        equipment: Vec<String>,

        /// Workout days per week (1-7)
        #[arg(short, long, default_value = "3")]
        days: u8,

        /// Wait for the whole plan instead of streaming it
        #[arg(long)]
        no_stream: bool,

        /// Also save the plan as plain text
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Print the parsed plan as JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Suggest a replacement for one exercise
    Swap {
        /// Exercise to replace (e.g. "Barbell Bench Press 4x8")
        #[arg(short = 'x', long)]
        exercise: String,

        /// Available equipment (repeatable)
        #[arg(short, long = "equipment", required = true)]
        equipment: Vec<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let client = ApiClient::new(cli.api_url);

    match cli.command {
        Commands::Generate {
            goals,
            equipment,
            days,
            no_stream,
            output,
            json,
        } => {
            let mut request = PlanRequest::empty(days);
            for goal in &goals {
                request.select(Field::Goal, goal);
            }
            for item in &equipment {
                request.select(Field::Equipment, item);
            }

            let mut view = PlanView::default();
            view.begin();

            let result = if no_stream {
                client.generate_plan_full(&request).await
            } else {
                client
                    .generate_plan(&request, |plan| {
                        view.update(plan);
                        print_progress(plan);
                    })
                    .await
            };
            eprintln!();

            view.settle(result);
            if let Some(message) = view.error() {
                anyhow::bail!("{message}");
            }

            let text = render_plan_text(view.plan());
            if json {
                println!("{}", plan_json(view.plan())?);
            } else {
                print!("{text}");
            }

            if let Some(path) = output {
                save_plan(&path, &text)?;
                println!("Saved plan to {}", path.display());
            }
        }
        Commands::Swap {
            exercise,
            equipment,
        } => {
            let replacement = client
                .swap_exercise(&exercise, &equipment.join(", "))
                .await
                .context("Failed to swap exercise")?;
            println!("{replacement}");
        }
    }

    Ok(())
}

/// One-line live status on stderr, redrawn after every chunk.
fn print_progress(plan: &[DayBlock]) {
    let exercises: usize = plan.iter().map(|d| d.exercises.len()).sum();
    let mut stderr = std::io::stderr();
    let _ = write!(
        stderr,
        "\rGenerating... {} day(s), {} exercise(s)",
        plan.len(),
        exercises
    );
    let _ = stderr.flush();
}

fn plan_json(plan: &[DayBlock]) -> Result<String> {
    serde_json::to_string_pretty(plan).context("Failed to serialize plan")
}

fn save_plan(path: &Path, text: &str) -> Result<()> {
    std::fs::write(path, text).with_context(|| format!("Failed to write {}", path.display()))
}
