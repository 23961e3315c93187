//! CLI argument definitions.
//!
//! The main entry point is the [`Cli`] struct.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use super::commands::cache::CacheArgs;
use crate::registry::TextStyle;

/// memeplate - resolve meme templates and fit text to them.
#[derive(Debug, Parser)]
#[command(name = "memeplate")]
#[command(author, version, long_about = None)]
#[command(about = "memeplate - resolve meme templates and fit text to them")]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to a settings file (overrides the per-user config.yml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    /// Bypass the template cache
    #[arg(long, global = true)]
    pub no_cache: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Resolve a template reference and show its text slots
    Resolve(ResolveArgs),

    /// Search the template catalog
    Search(SearchArgs),

    /// List every catalog template
    List(ListArgs),

    /// Fit text into a box using approximate metrics
    Fit(FitArgs),

    /// Lay out text lines on a template
    Layout(LayoutArgs),

    /// Manage the template cache
    Cache(CacheArgs),
}

/// Arguments for the `resolve` command.
#[derive(Debug, Clone, clap::Args)]
pub struct ResolveArgs {
    /// Catalog ID, local image path or image URL
    pub reference: String,

    /// Number of text slots (defaults to the template's own)
    #[arg(short, long)]
    pub lines: Option<usize>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `search` command.
#[derive(Debug, Clone, clap::Args)]
pub struct SearchArgs {
    /// Case-insensitive text to look for in IDs, names and keywords
    pub query: String,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `list` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct ListArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `fit` command.
#[derive(Debug, Clone, clap::Args)]
pub struct FitArgs {
    /// Text to fit
    pub text: String,

    /// Box width as a fraction of the canvas
    #[arg(long, default_value_t = 1.0)]
    pub width: f64,

    /// Box height as a fraction of the canvas
    #[arg(long, default_value_t = 0.2)]
    pub height: f64,

    /// Canvas size in points, e.g. 800x600
    #[arg(long, default_value = "800x600", value_parser = parse_canvas)]
    pub canvas: (f64, f64),

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `layout` command.
#[derive(Debug, Clone, clap::Args)]
pub struct LayoutArgs {
    /// Catalog ID, local image path or image URL
    pub reference: String,

    /// Text lines, one per slot; use "" to leave a slot empty
    #[arg(required = true)]
    pub lines: Vec<String>,

    /// Text style for every slot: upper, lower or none
    #[arg(long)]
    pub style: Option<TextStyle>,

    /// Starting font size instead of the estimate
    #[arg(long)]
    pub font_size: Option<f64>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Parse a `WIDTHxHEIGHT` canvas size.
pub fn parse_canvas(value: &str) -> Result<(f64, f64), String> {
    let (w, h) = value
        .split_once(['x', 'X'])
        .ok_or_else(|| format!("expected WIDTHxHEIGHT, got '{}'", value))?;
    let parse = |s: &str| {
        s.trim()
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite() && *v > 0.0)
            .ok_or_else(|| format!("invalid canvas dimension '{}'", s))
    };
    Ok((parse(w)?, parse(h)?))
}
