use clap::{Parser, Subcommand};
use tessera::Quality;

/// Where the request comes from, and what to override in it.
#[derive(clap::Args, Debug)]
pub struct RequestArgs {
    /// Request JSON. `-` reads standard input.
    pub input: String,

    /// Replaces the request's maximum edge length.
    #[arg(long)]
    pub maxh: Option<f64>,

    /// Replaces the request's quality (default, moderate).
    #[arg(long)]
    pub quality: Option<Quality>,

    /// Replaces the minimum angle in degrees (0 to 35). Overrides the
    /// quality's angle.
    #[arg(long)]
    pub min_angle: Option<f64>,

    /// Meshes hole interiors instead of cutting them out.
    #[arg(long)]
    pub keep_holes: bool,

    /// Triangulates the convex hull without constraints.
    #[arg(long)]
    pub no_constraints: bool,
}

#[derive(clap::Args, Debug)]
pub struct TriangulateArgs {
    #[command(flatten)]
    pub request: RequestArgs,

    /// Output path for the result JSON. Standard output if omitted.
    #[arg(short, long)]
    pub output: Option<String>,

    /// Pretty print the result.
    #[arg(long)]
    pub pretty: bool,
}

#[derive(clap::Args, Debug)]
pub struct SvgArgs {
    #[command(flatten)]
    pub request: RequestArgs,

    /// Output path for the svg file.
    #[arg(short, long)]
    pub output: String,
}

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Triangulates a request and writes the mesh as JSON.
    Triangulate(TriangulateArgs),
    /// Triangulates a request and draws the mesh.
    Svg(SvgArgs),
}
