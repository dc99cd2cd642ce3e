use crate::config::load_config;
use crate::parser::parse_graph;
use crate::scene_dump::{SceneDump, write_scene_dump};
use crate::view::TreeView;
use anyhow::{Context, Result};
use clap::Parser;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "pdgr", version, about = "Pedigree tree layout engine")]
pub struct Args {
    /// Input people file (.json) or '-' for stdin
    #[arg(short = 'i', long = "input")]
    pub input: Option<PathBuf>,

    /// Output scene file (json). Defaults to stdout if omitted.
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,

    /// Config JSON file
    #[arg(short = 'c', long = "configFile")]
    pub config: Option<PathBuf>,

    /// Center person xref (defaults to the first visible person)
    #[arg(short = 'p', long = "center")]
    pub center: Option<String>,

    /// Screen width
    #[arg(short = 'w', long = "width")]
    pub width: Option<i32>,

    /// Screen height
    #[arg(short = 'H', long = "height")]
    pub height: Option<i32>,

    /// Tree font size
    #[arg(short = 'f', long = "fontSize")]
    pub font_size: Option<i32>,

    /// Include people marked hidden
    #[arg(long = "showHidden")]
    pub show_hidden: bool,
}

pub fn run() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();
    let mut config = load_config(args.config.as_deref())?;
    if let Some(width) = args.width {
        config.screen.width = width;
    }
    if let Some(height) = args.height {
        config.screen.height = height;
    }
    if let Some(font_size) = args.font_size {
        config.layout.font_size = font_size;
    }

    let input = read_input(args.input.as_deref())?;
    let mut graph = parse_graph(&input)?;
    if args.show_hidden {
        graph.show_hidden();
    }

    let center = match &args.center {
        Some(xref) => graph
            .person_by_xref(xref)
            .with_context(|| format!("no person with xref {xref}"))?,
        None => graph
            .first_visible()
            .context("input contains no visible people")?,
    };

    let mut view = TreeView::new(graph, config);
    if !view.set_center_person(center) {
        anyhow::bail!("center person is hidden or incomplete");
    }

    match args.output.as_deref() {
        Some(path) => write_scene_dump(path, view.scene(), view.graph())
            .with_context(|| format!("writing {}", path.display()))?,
        None => {
            let dump = SceneDump::from_scene(view.scene(), view.graph());
            serde_json::to_writer_pretty(io::stdout().lock(), &dump)?;
            println!();
        }
    }
    Ok(())
}

fn read_input(path: Option<&Path>) -> Result<String> {
    if let Some(path) = path
        && path != Path::new("-")
    {
        return std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()));
    }
    let mut buf = String::new();
    io::stdin().read_to_string(&mut buf)?;
    Ok(buf)
}
