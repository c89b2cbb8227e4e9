use std::{
    fs::File,
    io::{BufWriter, Write},
    path::Path,
};

use anyhow::{Context, Result};
use tessera::TriangulationResult;

use crate::{args, input};

/// Width of the drawing in svg user units. Height follows the aspect ratio.
const WIDTH: f64 = 800.0;
const MARGIN: f64 = 10.0;

pub fn svg_command(args: args::SvgArgs) -> Result<()> {
    let request = input::load(&args.request)?;
    let result = request.triangulate()?;
    log::info!(
        "{} triangles, {} constrained edges",
        result.num_triangles(),
        result.num_edges()
    );
    generate_svg(&args.output, &result)
}

fn generate_svg<P: AsRef<Path>>(p: P, result: &TriangulationResult) -> Result<()> {
    let p = p.as_ref();
    let f = File::create(p).with_context(|| format!("creating {}", p.display()))?;
    let mut f = BufWriter::new(f);
    write_svg(&mut f, result)?;
    f.flush()?;
    Ok(())
}

/// Maps mesh coordinates onto the drawing, flipping y so that up is up.
struct Viewport {
    x0: f64,
    y1: f64,
    scale: f64,
    height: f64,
}

impl Viewport {
    fn fit(result: &TriangulationResult) -> Self {
        let (mut x0, mut y0) = (f64::INFINITY, f64::INFINITY);
        let (mut x1, mut y1) = (f64::NEG_INFINITY, f64::NEG_INFINITY);
        for p in &result.points {
            x0 = x0.min(p.x);
            y0 = y0.min(p.y);
            x1 = x1.max(p.x);
            y1 = y1.max(p.y);
        }
        if result.points.is_empty() {
            (x0, y0, x1, y1) = (0.0, 0.0, 1.0, 1.0);
        }
        let extent = (x1 - x0).max(y1 - y0).max(f64::EPSILON);
        let scale = (WIDTH - 2.0 * MARGIN) / extent;
        Self {
            x0,
            y1,
            scale,
            height: (y1 - y0) * scale + 2.0 * MARGIN,
        }
    }

    fn map(&self, x: f64, y: f64) -> (f64, f64) {
        (
            MARGIN + (x - self.x0) * self.scale,
            MARGIN + (self.y1 - y) * self.scale,
        )
    }
}

pub fn write_svg<W: Write>(f: &mut W, result: &TriangulationResult) -> Result<()> {
    let view = Viewport::fit(result);
    writeln!(
        f,
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{}\" height=\"{}\">",
        WIDTH, view.height
    )?;
    writeln!(f, "  <rect width=\"100%\" height=\"100%\" fill=\"white\"/>")?;

    writeln!(f, "  <g id=\"triangles\" fill=\"#dde8f0\" stroke=\"#678\" stroke-width=\"0.5\">")?;
    for t in &result.triangles {
        let corners = result
            .corners(t)
            .map(|c| view.map(c.x, c.y))
            .map(|(x, y)| format!("{:.3},{:.3}", x, y));
        writeln!(f, "    <polygon points=\"{}\"/>", corners.join(" "))?;
    }
    writeln!(f, "  </g>")?;

    writeln!(f, "  <g id=\"edges\" stroke=\"#c22\" stroke-width=\"1.5\">")?;
    for e in &result.edges {
        let (a, b) = (result.points[e.v0], result.points[e.v1]);
        let (x1, y1) = view.map(a.x, a.y);
        let (x2, y2) = view.map(b.x, b.y);
        writeln!(
            f,
            "    <line x1=\"{:.3}\" y1=\"{:.3}\" x2=\"{:.3}\" y2=\"{:.3}\"/>",
            x1, y1, x2, y2
        )?;
    }
    writeln!(f, "  </g>")?;
    writeln!(f, "</svg>")?;
    Ok(())
}
