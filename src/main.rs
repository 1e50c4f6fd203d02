use std::fs::{self, File};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use boardflip::script::Script;
use boardflip::terminal::{container_rows, terminal_size, App, TerminalRenderer};
use boardflip::{parse_deck, Capabilities, FlipWidget, RecordingRenderer, Settings};
use clap::Parser;
use log::info;

const DEFAULT_DECK: &str = "\
Welcome to boardflip

Drag upwards to flip to the next panel.
Drag downwards to go back.
---
Second panel

Release past halfway to commit the flip,
or before it to let the page fall back.
---
Third panel

Press d for debug details.
---
Last panel

There is nothing further up.
";

/// Flip through a deck of panels by dragging with the mouse
#[derive(Parser, Debug)]
#[command(version, about)]
struct Cli {
    /// Deck file; panels are separated by lines consisting of `---`
    deck: Option<PathBuf>,
    /// TOML file with [flip], [attach] and [terminal] tables
    #[arg(long)]
    config: Option<PathBuf>,
    /// Replay a gesture script and print each outcome instead of opening the viewer
    #[arg(long)]
    script: Option<PathBuf>,
    /// Print the render commands issued for every scripted event
    #[arg(long, requires = "script")]
    trace: bool,
    /// Bind touch event names instead of mouse ones when replaying
    #[arg(long, requires = "script")]
    touch: bool,
    /// Container height used when replaying a script
    #[arg(long, default_value_t = 200.0)]
    height: f64,
    /// Pointer units per terminal row
    #[arg(long)]
    cell_height: Option<f64>,
    /// Movement absorbed before a drag takes effect
    #[arg(long)]
    debounce: Option<f64>,
    /// Angle past which a release commits the flip
    #[arg(long)]
    snap_threshold: Option<f64>,
    /// Duration of the settle animation in milliseconds
    #[arg(long)]
    settle_ms: Option<u64>,
    /// Write logs to this file
    #[arg(long)]
    log_file: Option<PathBuf>,
}

impl Cli {
    fn settings(&self) -> Result<Settings> {
        let mut settings = match &self.config {
            Some(path) => Settings::load_from_file(path)?,
            None => Settings::default(),
        };
        if let Some(cell_height) = self.cell_height {
            settings.terminal.cell_height = cell_height;
        }
        if let Some(debounce) = self.debounce {
            settings.flip.debounce = debounce;
        }
        if let Some(threshold) = self.snap_threshold {
            settings.flip.snap_threshold = threshold;
        }
        if let Some(settle_ms) = self.settle_ms {
            settings.flip.settle_ms = settle_ms;
        }
        settings.flip.validate()?;
        Ok(settings)
    }

    fn deck_source(&self) -> Result<String> {
        match &self.deck {
            Some(path) => fs::read_to_string(path)
                .with_context(|| format!("failed to read deck {}", path.display())),
            None => Ok(DEFAULT_DECK.to_string()),
        }
    }
}

fn init_logging(log_file: Option<&Path>, interactive: bool) -> Result<()> {
    // Logging to stderr would scribble over the interactive view.
    let default_filter = if interactive && log_file.is_none() {
        "warn"
    } else {
        "info"
    };
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter));
    if let Some(path) = log_file {
        let file = File::create(path)
            .with_context(|| format!("failed to create log file {}", path.display()))?;
        builder.target(env_logger::Target::Pipe(Box::new(file)));
    }
    let _ = builder.try_init();
    Ok(())
}

fn replay(cli: &Cli, settings: &Settings, path: &Path) -> Result<()> {
    let caps = if cli.touch {
        Capabilities::touch()
    } else {
        Capabilities::detect()
    };
    let deck = parse_deck("board", &cli.deck_source()?);
    let mut widget = FlipWidget::attach(
        &deck,
        cli.height,
        &settings.attach,
        settings.flip,
        caps,
        RecordingRenderer::new(),
    )?;
    let script = Script::load(path, caps)?;
    if script.skipped > 0 {
        info!("{} events are not bound on this host and were skipped", script.skipped);
    }

    for step in &script.steps {
        let outcome = widget.handle_event(step.event.clone());
        println!("{:>4}  {:<16} {:?}", step.line, step.name, outcome);
        let commands = widget.renderer_mut().take();
        if cli.trace {
            for command in commands {
                println!("        {command:?}");
            }
        }
    }

    let current = widget.current_index();
    println!(
        "current panel: {} ({}), phase: {:?}",
        current,
        widget.panels()[current].title(),
        widget.phase()
    );
    Ok(())
}

fn interactive(cli: &Cli, settings: &Settings) -> Result<()> {
    let (_, rows) = terminal_size()?;
    let height = container_rows(rows) as f64 * settings.terminal.cell_height;
    let deck = parse_deck("board", &cli.deck_source()?);
    let widget = FlipWidget::attach(
        &deck,
        height,
        &settings.attach,
        settings.flip,
        Capabilities::detect(),
        TerminalRenderer::new(),
    )?;
    App::new(widget, settings.terminal).run()
}

/// Main function
fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.log_file.as_deref(), cli.script.is_none())?;
    let settings = cli.settings()?;

    match &cli.script {
        Some(path) => replay(&cli, &settings, path),
        None => interactive(&cli, &settings),
    }
}
