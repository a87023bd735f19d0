// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use lucas_kanade_rs as lkrs;

use log::info;
use std::{env, error::Error, fs, io, path::PathBuf};

use lkrs::core::track::lucas_kanade::{self as lk, Config};
use lkrs::dataset::points as points_file;
use lkrs::misc::{interop, view};

fn main() {
    env_logger::init();
    let args: Vec<String> = env::args().collect();
    if let Err(error) = my_run(&args) {
        eprintln!("{}", error);
        std::process::exit(1);
    }
}

const USAGE: &str = "Usage: ./lk_track frame_1.png frame_2.png points.txt [nb_iterations] [--view out.png] [--next next_points.txt]";

/// Scale applied to flow vectors in the visualization.
const VIEW_FLOW_SCALE: f32 = 4.0;

fn my_run(args: &[String]) -> Result<(), Box<dyn Error>> {
    // Check that the arguments are correct.
    let valid_args = check_args(args)?;

    // Load frames and tracked points.
    let frame_1 = interop::read_frame(&valid_args.frame_1_path)?;
    let frame_2 = interop::read_frame(&valid_args.frame_2_path)?;
    let (points, windows) = points_file::parse::points(&fs::read_to_string(&valid_args.points_path)?)?;
    info!(
        "Tracking {} points between frames of size {:?}",
        points.len(),
        frame_1.shape()
    );

    // Evaluate the flow.
    let mut tracker = Config {
        nb_iterations: valid_args.nb_iterations,
        ..Config::default()
    }
    .init();
    let flow = tracker.evaluate(&frame_1, &frame_2, &points, &windows)?;

    // Print to stdout one csv record per point.
    let mut writer = csv::Writer::from_writer(io::stdout());
    writer.write_record(["row", "col", "d_row", "d_col", "corner_response"])?;
    for ((p, f), response) in points.iter().zip(&flow).zip(tracker.corner_responses()) {
        writer.write_record(&[
            p[0].to_string(),
            p[1].to_string(),
            f[0].to_string(),
            f[1].to_string(),
            response.to_string(),
        ])?;
    }
    writer.flush()?;

    if let Some(view_path) = valid_args.view_path {
        view::flow_on_image(&frame_1, &points, &flow, VIEW_FLOW_SCALE).save(&view_path)?;
        info!("Flow visualization saved to {}", view_path.display());
    }
    if let Some(next_path) = valid_args.next_path {
        let next_points = lk::tracked_positions(&points, &flow);
        fs::write(&next_path, points_file::to_text(&next_points, &windows))?;
        info!("Tracked points saved to {}", next_path.display());
    }
    Ok(())
}

struct Args {
    frame_1_path: PathBuf,
    frame_2_path: PathBuf,
    points_path: PathBuf,
    nb_iterations: usize,
    view_path: Option<PathBuf>,
    next_path: Option<PathBuf>,
}

/// Verify that command line arguments are correct.
fn check_args(args: &[String]) -> Result<Args, String> {
    let mut positional = Vec::new();
    let mut view_path = None;
    let mut next_path = None;
    let mut remaining = args.iter().skip(1);
    while let Some(arg) = remaining.next() {
        match arg.as_str() {
            "--view" => view_path = Some(PathBuf::from(option_value(remaining.next(), arg)?)),
            "--next" => next_path = Some(PathBuf::from(option_value(remaining.next(), arg)?)),
            _ => positional.push(arg.as_str()),
        }
    }

    let (frame_1, frame_2, points, nb_iterations) = match positional.as_slice() {
        [f1, f2, p] => (f1, f2, p, Config::default().nb_iterations),
        [f1, f2, p, n] => {
            let nb = n
                .parse::<usize>()
                .map_err(|_| usage_error(format!("Invalid number of iterations: {}", n)))?;
            (f1, f2, p, nb)
        }
        _ => return Err(usage_error("Wrong number of arguments".to_string())),
    };

    let frame_1_path = existing_file(frame_1)?;
    let frame_2_path = existing_file(frame_2)?;
    let points_path = existing_file(points)?;
    Ok(Args {
        frame_1_path,
        frame_2_path,
        points_path,
        nb_iterations,
        view_path,
        next_path,
    })
}

fn option_value<'a>(value: Option<&'a String>, option: &str) -> Result<&'a String, String> {
    value.ok_or_else(|| usage_error(format!("Missing value after {}", option)))
}

fn existing_file(path_str: &str) -> Result<PathBuf, String> {
    let path = PathBuf::from(path_str);
    if path.is_file() {
        Ok(path)
    } else {
        Err(usage_error(format!(
            "The file does not exist or is not reachable: {}",
            path_str
        )))
    }
}

fn usage_error(message: String) -> String {
    eprintln!("{}", USAGE);
    message
}
