/// Texture classification tool: label one composition given on the command
/// line, or a JSON batch of samples.

use std::fs;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use texture_core::classifier::classify_composition;
use texture_core::regions::colors_for;
use texture_core::{Composition, TextureClass};

/// Sums further than this from 100% are rejected unless --normalize is set.
const SUM_TOLERANCE_PCT: f64 = 0.5;

#[derive(Parser, Debug)]
#[command(name = "classify", about = "Classify clay/silt/sand percentages into USDA texture classes")]
struct Args {
    /// Clay percentage (0-100).
    #[arg(long, requires_all = ["silt", "sand"], conflicts_with = "input")]
    clay: Option<f64>,

    /// Silt percentage (0-100).
    #[arg(long)]
    silt: Option<f64>,

    /// Sand percentage (0-100).
    #[arg(long)]
    sand: Option<f64>,

    /// JSON file with an array of {"id"?, "clay", "silt", "sand"} samples in percent.
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Rescale samples that do not sum to 100% instead of rejecting them.
    #[arg(long)]
    normalize: bool,

    /// Pretty-print the JSON output.
    #[arg(long)]
    pretty: bool,
}

#[derive(Debug, Deserialize)]
struct Sample {
    #[serde(default)]
    id: Option<String>,
    clay: f64,
    silt: f64,
    sand: f64,
}

#[derive(Debug, Serialize)]
struct Labelled {
    #[serde(skip_serializing_if = "Option::is_none")]
    id: Option<String>,
    composition: Composition,
    class: TextureClass,
    color: String,
}

fn to_composition(s: &Sample, normalize: bool) -> Result<Composition> {
    let c = Composition::from_percent(s.clay, s.silt, s.sand);
    if !c.is_finite() || c.has_negative() {
        bail!("negative or non-finite fraction in {c}");
    }
    let total_pct = c.sum() * 100.0;
    if (total_pct - 100.0).abs() > SUM_TOLERANCE_PCT {
        if !normalize {
            bail!("fractions sum to {total_pct:.2}%, expected 100% (use --normalize to rescale)");
        }
        log::debug!("rescaling sample summing to {total_pct:.2}%");
    }
    c.normalized().context("all fractions are zero")
}

fn label(s: Sample, normalize: bool) -> Result<Labelled> {
    let composition = to_composition(&s, normalize)
        .with_context(|| format!("sample {}", s.id.as_deref().unwrap_or("<unnamed>")))?;
    let class = classify_composition(composition);
    Ok(Labelled {
        id: s.id,
        composition,
        class,
        color: colors_for(class).base.to_string(),
    })
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let args = Args::parse();

    let output = if let Some(path) = &args.input {
        let samples: Vec<Sample> = serde_json::from_str(
            &fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?,
        )
        .with_context(|| format!("parsing {}", path.display()))?;

        eprintln!("Classifying {} samples from {} ...", samples.len(), path.display());
        let labelled: Vec<Result<Labelled>> = samples
            .into_par_iter()
            .map(|s| label(s, args.normalize))
            .collect();

        let mut ok = Vec::with_capacity(labelled.len());
        let mut skipped = 0usize;
        for res in labelled {
            match res {
                Ok(l) => ok.push(l),
                Err(e) => {
                    log::warn!("{e:#}");
                    skipped += 1;
                }
            }
        }
        if skipped > 0 {
            eprintln!("{skipped} samples skipped due to errors.");
        }
        serde_json::to_value(ok)?
    } else if let (Some(clay), Some(silt), Some(sand)) = (args.clay, args.silt, args.sand) {
        let sample = Sample { id: None, clay, silt, sand };
        serde_json::to_value(label(sample, args.normalize)?)?
    } else {
        bail!("give --clay/--silt/--sand or --input; see --help");
    };

    let text = if args.pretty {
        serde_json::to_string_pretty(&output)?
    } else {
        serde_json::to_string(&output)?
    };
    println!("{text}");
    Ok(())
}
