use std::path::PathBuf;

use clap::Parser;
use color_eyre::eyre::eyre;

use fieldmap_core::pipeline::{self, DatasetSpec, PageNaming, RenderConfig};

mod sink;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Field map container files, each optionally labelled (`FILE=TITLE`)
    #[arg(required = true, value_name = "FILE[=TITLE]")]
    datasets: Vec<String>,

    /// Directory the page images are written to
    #[arg(short, long, value_name = "DIR", default_value = ".")]
    out_dir: PathBuf,

    /// Page file name prefix
    #[arg(long, default_value = "2dfield")]
    prefix: String,
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    tracing_subscriber::fmt::init();

    let args = Cli::parse();

    let specs = args
        .datasets
        .iter()
        .map(|arg| parse_spec(arg))
        .collect::<color_eyre::Result<Vec<_>>>()?;

    let config = RenderConfig {
        naming: PageNaming {
            prefix: args.prefix,
            ..PageNaming::default()
        },
        ..RenderConfig::default()
    };

    let mut sink = sink::PlottersSink::new(args.out_dir);
    pipeline::run(&specs, &config, &mut sink)?;

    Ok(())
}

fn parse_spec(arg: &str) -> color_eyre::Result<DatasetSpec> {
    let (path, title) = match arg.split_once('=') {
        Some((path, title)) => (PathBuf::from(path), title.to_string()),
        None => {
            let path = PathBuf::from(arg);
            let title = path
                .file_stem()
                .and_then(|stem| stem.to_str())
                .ok_or_else(|| eyre!("cannot derive a title from {arg:?}"))?
                .to_string();
            (path, title)
        }
    };
    Ok(DatasetSpec { path, title })
}
