/// Event replay tool: runs a JSON event log through the composition
/// controller and prints the state after every event.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;
use texture_core::{Composition, Controller, DiagramConfig, Event, TextureClass};

#[derive(Parser, Debug)]
#[command(name = "replay", about = "Replay a JSON event log through the ternary diagram controller")]
struct Args {
    /// JSON array of events, e.g. [{"type":"slider","axis":"clay","value":40}].
    events: PathBuf,

    /// Diagram config JSON (defaults used when omitted).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Print only the final state.
    #[arg(long)]
    final_only: bool,

    /// Dump the full render scene after the last event.
    #[arg(long)]
    scene: bool,
}

#[derive(Serialize)]
struct Step<'a> {
    step: usize,
    event: &'a Event,
    changed: bool,
    composition: Composition,
    class: TextureClass,
    locks: [bool; 3],
    inputs: &'a [String; 3],
}

fn load_config(path: Option<&Path>) -> Result<DiagramConfig> {
    let Some(path) = path else {
        return Ok(DiagramConfig::default());
    };
    let json = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    DiagramConfig::from_json(&json).with_context(|| format!("parsing {}", path.display()))
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let args = Args::parse();

    let config = load_config(args.config.as_deref())?;
    let events: Vec<Event> = serde_json::from_str(
        &fs::read_to_string(&args.events).with_context(|| format!("reading {}", args.events.display()))?,
    )
    .with_context(|| format!("parsing {}", args.events.display()))?;

    let mut controller = Controller::new(config)?;
    eprintln!("Replaying {} events ...", events.len());

    let n = events.len();
    for (i, event) in events.iter().enumerate() {
        let changed = controller.dispatch(event.clone());
        if args.final_only && i + 1 < n {
            continue;
        }
        let state = controller.state();
        let step = Step {
            step: i + 1,
            event,
            changed,
            composition: state.composition,
            class: state.class(),
            locks: state.locks.as_array(),
            inputs: &state.inputs,
        };
        println!("{}", serde_json::to_string(&step)?);
    }

    if args.scene {
        println!("{}", serde_json::to_string_pretty(&controller.scene())?);
    }

    let c = controller.composition();
    eprintln!(
        "Final: clay {:.1}%  silt {:.1}%  sand {:.1}%  -> {}",
        c.clay * 100.0,
        c.silt * 100.0,
        c.sand * 100.0,
        controller.class()
    );
    Ok(())
}
