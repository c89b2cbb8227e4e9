use std::{
    fs::File,
    io::{self, BufWriter, Write},
};

use anyhow::{Context, Result};
use tessera::TriangulationResult;

use crate::{args, input};

pub fn triangulate_command(args: args::TriangulateArgs) -> Result<()> {
    let request = input::load(&args.request)?;
    let result = request.triangulate()?;
    log::info!(
        "{} points, {} triangles, {} constrained edges",
        result.num_vertices(),
        result.num_triangles(),
        result.num_edges()
    );

    match &args.output {
        Some(path) => {
            let file = File::create(path).with_context(|| format!("creating {}", path))?;
            write_result(BufWriter::new(file), &result, args.pretty)
                .with_context(|| format!("writing {}", path))
        }
        None => write_result(io::stdout().lock(), &result, args.pretty),
    }
}

/// Writes `{points, triangles, edges}` followed by a newline.
pub fn write_result<W: Write>(mut w: W, result: &TriangulationResult, pretty: bool) -> Result<()> {
    if pretty {
        serde_json::to_writer_pretty(&mut w, result)?;
    } else {
        serde_json::to_writer(&mut w, result)?;
    }
    writeln!(w)?;
    w.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use tessera::{Point, TriangulationRequest};

    use super::*;
    use crate::args::{RequestArgs, TriangulateArgs};

    #[test]
    fn writes_points_triangles_edges() {
        let result = TriangulationRequest::new(vec![
            Point::new(0.0, 0.0, 2.0),
            Point::new(2.0, 0.0, 2.0),
            Point::new(1.0, 2.0, 2.0),
            Point::new(0.0, 0.0, 2.0),
        ])
        .triangulate()
        .unwrap();

        let mut out = Vec::new();
        write_result(&mut out, &result, false).unwrap();
        let json: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(3, json["points"].as_array().unwrap().len());
        assert_eq!(1, json["triangles"].as_array().unwrap().len());
        assert_eq!(3, json["edges"].as_array().unwrap().len());
        assert_eq!(serde_json::json!([0.0, 0.0, 2.0]), json["points"][0]);
    }

    #[test]
    fn command_writes_output_file() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("request.json");
        let output = dir.path().join("mesh.json");
        File::create(&input)
            .unwrap()
            .write_all(
                br#"{"outer": [[0, 0], [10, 0], [10, 10], [0, 10], [0, 0]],
                     "holes": [[[4, 4], [6, 4], [6, 6], [4, 6], [4, 4]]]}"#,
            )
            .unwrap();

        triangulate_command(TriangulateArgs {
            request: RequestArgs {
                input: input.to_str().unwrap().to_string(),
                maxh: Some(3.0),
                quality: None,
                min_angle: None,
                keep_holes: false,
                no_constraints: false,
            },
            output: Some(output.to_str().unwrap().to_string()),
            pretty: true,
        })
        .unwrap();

        let result: TriangulationResult =
            serde_json::from_reader(File::open(&output).unwrap()).unwrap();
        assert!(result.indices_in_bounds());
        assert!((result.area() - 96.0).abs() < 1e-9);

        triangulate_command(TriangulateArgs {
            request: RequestArgs {
                input: input.to_str().unwrap().to_string(),
                maxh: None,
                quality: None,
                min_angle: None,
                keep_holes: true,
                no_constraints: false,
            },
            output: Some(output.to_str().unwrap().to_string()),
            pretty: false,
        })
        .unwrap();

        let result: TriangulationResult =
            serde_json::from_reader(File::open(&output).unwrap()).unwrap();
        assert!((result.area() - 100.0).abs() < 1e-9);
    }

    #[test]
    fn engine_failure_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("request.json");
        std::fs::write(&input, r#"{"outer": [[0, 0], [1, 0], [0, 1]], "min_angle": 50}"#).unwrap();

        let err = triangulate_command(TriangulateArgs {
            request: RequestArgs {
                input: input.to_str().unwrap().to_string(),
                maxh: None,
                quality: None,
                min_angle: None,
                keep_holes: false,
                no_constraints: false,
            },
            output: None,
            pretty: false,
        })
        .unwrap_err();
        assert!(err.to_string().contains("triangulation failed"));
    }
}
