use std::fs::File;
use std::io::{self, BufReader, Read};

use anyhow::{Context, Result};
use tessera::{PolygonLoop, TriangulationRequest};

use crate::args::RequestArgs;

/// Reads a request from `path` (`-` for standard input).
pub fn read_request(path: &str) -> Result<TriangulationRequest> {
    if path == "-" {
        parse_request(io::stdin().lock()).context("reading request from stdin")
    } else {
        let file = File::open(path).with_context(|| format!("opening {}", path))?;
        parse_request(BufReader::new(file)).with_context(|| format!("reading {}", path))
    }
}

pub fn parse_request<R: Read>(reader: R) -> Result<TriangulationRequest> {
    let request: TriangulationRequest = serde_json::from_reader(reader)?;
    warn_unclosed(&request);
    Ok(request)
}

/// Reads the request named by `args` and applies the command line overrides.
pub fn load(args: &RequestArgs) -> Result<TriangulationRequest> {
    let mut request = read_request(&args.input)?;
    if let Some(maxh) = args.maxh {
        request.maxh = maxh;
    }
    if let Some(quality) = args.quality {
        request.quality = quality;
    }
    if let Some(min_angle) = args.min_angle {
        request.min_angle = Some(min_angle);
    }
    if args.no_constraints {
        request.enforce_constraints = false;
    }
    if args.keep_holes {
        request.exclude_holes = false;
    }
    Ok(request)
}

// The engine closes open loops itself, but an open loop is usually a typo.
fn warn_unclosed(request: &TriangulationRequest) {
    let loops = std::iter::once(("outer", &request.outer))
        .chain(request.holes.iter().map(|l| ("hole", l)))
        .chain(request.building_loops.iter().map(|l| ("building", l)));
    for (i, (kind, points)) in loops.enumerate() {
        let ring = PolygonLoop::from(points.clone());
        if !ring.is_empty() && !ring.is_closed() {
            log::warn!("{} loop #{} is not closed", kind, i);
        }
    }
}
