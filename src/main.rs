use std::fs;
use std::io::{self, Read};
use std::time::Duration;

use clap::{Args, Parser, Subcommand, ValueEnum};
use scenemap::catalog::Catalog;
use scenemap::confidence::{ConfidenceBand, ConfidenceScore};
use scenemap::config::{ConfigError, SceneConfig};
use scenemap::intake::Intake;
use scenemap::model::{Category, SceneGraph};
use scenemap::render::{CategoryFilter, Phase, RenderTimings, SceneView};
use scenemap::report;
use scenemap::session::{self, Command as SessionCommand, SessionError, SessionHandle, Update};
use serde::Serialize;
use tokio::sync::mpsc::UnboundedReceiver;
use tracing::{info, warn};

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("failed to read input: {0}")]
    Io(#[from] io::Error),
    #[error(transparent)]
    Session(#[from] SessionError),
    #[error("analysis rejected ({code}): {message}")]
    Rejected { code: &'static str, message: String },
    #[error("unknown category `{0}`; run `scenemap catalog` for the list")]
    UnknownCategory(String),
    #[error("session ended while waiting for {0}")]
    Incomplete(&'static str),
    #[error("invalid JSON payload: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Parser, Debug)]
#[command(name = "scenemap", about = "Turn forensic scene descriptions into interactive scene graphs")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Interpret a description, apply edits, and print the committed scene.
    Analyze(AnalyzeArgs),
    /// Print the detection rules.
    Catalog,
}

#[derive(Args, Debug)]
struct AnalyzeArgs {
    #[arg(long, help = "Description text; overrides --input")]
    text: Option<String>,

    #[arg(long, default_value = "-", help = "Input file path, or - for stdin")]
    input: String,

    #[arg(long, default_value_t = false, help = "Treat the input as extracted document text")]
    document: bool,

    #[arg(long = "label", value_name = "LABEL", help = "Image classifier label; marks the input as OCR text")]
    labels: Vec<String>,

    #[arg(long, help = "Confidence reported by an image classifier, 0 to 1")]
    confidence: Option<f64>,

    #[arg(long, env = "SCENE_SEED")]
    seed: Option<u64>,

    #[arg(long = "filter", value_name = "CATEGORY", help = "Show only these categories, or `none`")]
    filters: Vec<String>,

    #[arg(long = "add", value_name = "NAME")]
    add: Vec<String>,

    #[arg(long = "remove", value_name = "NAME")]
    remove: Vec<String>,

    #[arg(long, value_enum, default_value_t = Format::Json)]
    format: Format,

    #[arg(long, default_value_t = false, help = "Skip processing and animation delays")]
    instant: bool,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
enum Format {
    Json,
    Report,
}

/// What `analyze` prints in JSON mode.
#[derive(Debug, Serialize)]
struct AnalysisOutput {
    confidence: ConfidenceScore,
    band: ConfidenceBand,
    graph: SceneGraph,
    view: SceneView,
}

struct Reviewed {
    graph: SceneGraph,
    confidence: ConfidenceScore,
    band: ConfidenceBand,
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    tracing_subscriber::fmt().with_writer(io::stderr).init();
    let cli = Cli::parse();

    match cli.command {
        Command::Analyze(args) => run_analyze(args).await,
        Command::Catalog => {
            run_catalog();
            Ok(())
        }
    }
}

fn run_catalog() {
    for rule in Catalog::standard().rules() {
        println!(
            "{:<13} {}  {:<18} {}",
            rule.category.slug(),
            rule.color,
            rule.classification,
            rule.synonyms.join(", ")
        );
    }
}

async fn run_analyze(args: AnalyzeArgs) -> Result<(), CliError> {
    let mut config = SceneConfig::from_env()?;
    if args.seed.is_some() {
        config.seed = args.seed;
    }
    if args.instant {
        config.stage_delay = Duration::ZERO;
        config.timings = RenderTimings { appear: Duration::ZERO, connect: Duration::ZERO, stagger: Duration::ZERO };
    }
    let filter = parse_filter(&args.filters)?;
    let intake = build_intake(&args)?;

    let (handle, mut updates) = session::spawn(&config);
    let outcome = drive(&handle, &mut updates, intake, &args, filter).await;
    handle.shutdown().await?;
    let (reviewed, view) = outcome?;

    match args.format {
        Format::Json => {
            let output = AnalysisOutput {
                confidence: reviewed.confidence,
                band: reviewed.band,
                graph: reviewed.graph,
                view,
            };
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        Format::Report => {
            println!("{}", report::render_text(&reviewed.graph));
            println!();
            println!("Confidence: {}% ({})", reviewed.confidence.percent(), reviewed.band.label());
        }
    }
    Ok(())
}

fn build_intake(args: &AnalyzeArgs) -> Result<Intake, CliError> {
    let text = match &args.text {
        Some(text) => text.clone(),
        None if args.input == "-" => {
            let mut buf = String::new();
            io::stdin().read_to_string(&mut buf)?;
            buf
        }
        None => fs::read_to_string(&args.input)?,
    };

    if !args.labels.is_empty() || args.confidence.is_some() {
        return Ok(Intake::Image { ocr_text: text, labels: args.labels.clone(), confidence: args.confidence });
    }
    if args.document {
        return Ok(Intake::Document { text });
    }
    Ok(Intake::Typed { text })
}

fn parse_filter(raw: &[String]) -> Result<CategoryFilter, CliError> {
    if raw.iter().any(|r| r.trim().eq_ignore_ascii_case("none")) {
        return Ok(CategoryFilter::Nothing);
    }
    let categories = raw
        .iter()
        .map(|r| Category::from_slug(r).ok_or_else(|| CliError::UnknownCategory(r.clone())))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(CategoryFilter::from_categories(categories))
}

/// Run one analysis through the session and return the committed graph
/// together with the final frame.
async fn drive(
    handle: &SessionHandle,
    updates: &mut UnboundedReceiver<Update>,
    intake: Intake,
    args: &AnalyzeArgs,
    filter: CategoryFilter,
) -> Result<(Reviewed, SceneView), CliError> {
    handle.send(SessionCommand::Analyze(intake)).await?;
    let mut reviewed = wait_preview(updates).await?;

    if !args.add.is_empty() || !args.remove.is_empty() {
        handle.send(SessionCommand::BeginEdit).await?;
        reviewed = wait_preview(updates).await?;

        // Only send edits that will apply, so every one is answered by a preview.
        for name in &args.remove {
            let Some(index) = reviewed.graph.elements.iter().position(|e| &e.name == name) else {
                warn!(%name, "no such element; skipping removal");
                continue;
            };
            handle.send(SessionCommand::RemoveElement { index }).await?;
            reviewed = wait_preview(updates).await?;
        }
        for name in &args.add {
            if name.trim().is_empty() || reviewed.graph.contains(name.trim()) {
                warn!(%name, "blank or duplicate name; skipping add");
                continue;
            }
            handle.send(SessionCommand::AddElement { name: name.clone(), classification: String::new() }).await?;
            reviewed = wait_preview(updates).await?;
        }
    }

    handle.send(SessionCommand::Approve).await?;
    loop {
        match next_update(updates, "the render sequence").await? {
            Update::Committed { graph } => reviewed.graph = graph,
            Update::Phase { phase: Phase::Interactive, .. } => break,
            Update::Phase { phase, generation } => info!(?phase, generation, "render phase"),
            _ => {}
        }
    }
    // The frame that follows Interactive is superseded by the filter frame.
    next_update(updates, "the interactive frame").await?;

    handle.send(SessionCommand::SetFilter(filter)).await?;
    loop {
        if let Update::Frame(view) = next_update(updates, "the filtered frame").await? {
            return Ok((reviewed, view));
        }
    }
}

async fn wait_preview(updates: &mut UnboundedReceiver<Update>) -> Result<Reviewed, CliError> {
    loop {
        match next_update(updates, "the preview").await? {
            Update::Stage { index, label, .. } => info!(stage = index + 1, "{label}"),
            Update::Preview { graph, confidence, band, .. } => return Ok(Reviewed { graph, confidence, band }),
            Update::Rejected { code, message } => return Err(CliError::Rejected { code, message }),
            _ => {}
        }
    }
}

async fn next_update(updates: &mut UnboundedReceiver<Update>, what: &'static str) -> Result<Update, CliError> {
    updates.recv().await.ok_or(CliError::Incomplete(what))
}
