use anyhow::Result;
use clap::Parser;

mod args;
mod input;
mod svg;
mod triangulate;

fn main() -> Result<()> {
    env_logger::init();

    let args = args::Args::parse();
    match args.command {
        args::Commands::Triangulate(args) => triangulate::triangulate_command(args),
        args::Commands::Svg(args) => svg::svg_command(args),
    }
}
