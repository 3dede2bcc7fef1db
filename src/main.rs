use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use futures::executor::block_on;
use tracing_subscriber::EnvFilter;

use funnel_deck::chart::SvgFunnelRenderer;
use funnel_deck::data::{ColorPolicy, DataResolver, FsFetcher, write_json_content};
use funnel_deck::deck::{Coordinator, Deck};
use funnel_deck::settings::FunnelSettings;
use funnel_deck::types::{Size, SourceFormat, Viewport};

#[derive(Parser, Debug)]
#[command(name = "funnel-deck", version)]
struct Cli {
    /// Settings JSON; defaults to the user config directory.
    #[arg(long, global = true)]
    settings: Option<PathBuf>,

    /// Directory data paths are resolved against.
    #[arg(long, global = true)]
    data_root: Option<PathBuf>,

    /// Seed random colors instead of using the stage palette.
    #[arg(long, global = true)]
    color_seed: Option<u64>,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Pre-render every funnel container of a deck.
    Render(RenderArgs),
    /// Print the resolved data of a data source as canonical JSON.
    Data(DataArgs),
}

#[derive(Parser, Debug)]
struct RenderArgs {
    /// Input deck HTML.
    deck: PathBuf,

    /// Output HTML path; stdout when absent.
    #[arg(long)]
    out: Option<PathBuf>,

    /// Viewport width used for direction and animation decisions.
    #[arg(long, default_value_t = 1280.0)]
    width: f64,

    /// Viewport height.
    #[arg(long, default_value_t = 720.0)]
    height: f64,
}

#[derive(Parser, Debug)]
struct DataArgs {
    /// Data source id.
    id: String,

    /// Source format.
    #[arg(long, default_value_t = SourceFormat::Json)]
    format: SourceFormat,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("funnel_deck=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let mut settings = match &cli.settings {
        Some(path) => FunnelSettings::load(path)
            .with_context(|| format!("load settings '{}'", path.display()))?,
        None => FunnelSettings::load_or_default(),
    };
    if let Some(seed) = cli.color_seed {
        settings.colors = ColorPolicy::Random { seed: Some(seed) };
    }

    match cli.cmd {
        Command::Render(args) => cmd_render(args, cli.data_root, &settings),
        Command::Data(args) => cmd_data(args, cli.data_root, &settings),
    }
}

fn cmd_render(args: RenderArgs, data_root: Option<PathBuf>, settings: &FunnelSettings) -> anyhow::Result<()> {
    let deck_dir = args.deck.parent().unwrap_or_else(|| Path::new("."));
    let data_root = data_root.unwrap_or_else(|| deck_dir.join(&settings.data_root));

    let mut deck = Deck::from_file(&args.deck, &settings.container_prefix)
        .with_context(|| format!("read deck '{}'", args.deck.display()))?
        .with_viewport(Viewport::new(args.width, args.height))
        .with_default_size(Size::new(settings.default_width, settings.default_height));
    let coordinator = Coordinator::from_settings(FsFetcher::new(data_root), SvgFunnelRenderer, settings);

    let slides = deck.slides().to_vec();
    let mut drawn = 0;
    let mut skipped = 0;

    let ready = deck.ready();
    let report = block_on(coordinator.handle(&mut deck, ready));
    drawn += report.drawn.len();
    skipped += report.skipped.len();

    for slide in slides.into_iter().skip(1) {
        let event = deck.navigate(slide)?;
        let report = block_on(coordinator.handle(&mut deck, event));
        drawn += report.drawn.len();
        skipped += report.skipped.len();
    }

    let html = deck.to_html()?;
    match &args.out {
        Some(out) => {
            if let Some(parent) = out.parent() {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("create output dir '{}'", parent.display()))?;
            }
            std::fs::write(out, html).with_context(|| format!("write deck '{}'", out.display()))?;
            eprintln!("wrote {} ({} charts drawn, {} skipped)", out.display(), drawn, skipped);
        }
        None => println!("{html}"),
    }
    Ok(())
}

fn cmd_data(args: DataArgs, data_root: Option<PathBuf>, settings: &FunnelSettings) -> anyhow::Result<()> {
    let data_root = data_root.unwrap_or_else(|| settings.data_root.clone());
    let resolver = DataResolver::new(FsFetcher::new(data_root))
        .with_layout(settings.source_layout())
        .with_color_policy(settings.colors);

    let resolved = block_on(resolver.resolve_source(&args.id, args.format))
        .with_context(|| format!("no data for '{}' ({})", args.id, args.format))?;
    println!("{}", write_json_content(&resolved.data)?);
    Ok(())
}
