// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Text files of tracked points and their search windows.
//!
//! One point per line: `row col height width`, separated by spaces or tabs.
//! Row and column may be fractional, window sizes are integers.
//! Empty lines and lines starting with `#` are ignored.

use crate::core::window::{SearchWindow, Target};
use crate::error::FlowError;
use crate::misc::type_aliases::Vec2;

/// Write points and windows in the text format read by `parse::points`.
pub fn to_text(points: &[Vec2], windows: &[SearchWindow]) -> String {
    let mut text = String::from("# row col height width\n");
    for (p, w) in points.iter().zip(windows) {
        text.push_str(&format!("{} {} {} {}\n", p[0], p[1], w.height, w.width));
    }
    text
}

/// Parse files of tracked points.
pub mod parse {
    use super::*;
    use nom::{
        branch::alt,
        bytes::complete::tag,
        character::complete::{digit1, space1},
        combinator::{all_consuming, map, map_res, rest, value},
        number::complete::float,
        sequence::{pair, preceded, tuple},
        IResult,
    };

    /// Parse a points file into the points and their windows, in file order.
    pub fn points(file_content: &str) -> Result<(Vec<Vec2>, Vec<SearchWindow>), FlowError> {
        let targets = multi_line(file_content)?;
        Ok(targets.iter().map(|t| (t.point, t.window)).unzip())
    }

    fn multi_line(file_content: &str) -> Result<Vec<Target>, FlowError> {
        let mut targets = Vec::new();
        for (index, line) in file_content.lines().enumerate() {
            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }
            match all_consuming(record)(trimmed) {
                Ok((_, Some(target))) => targets.push(target),
                Ok(_) => (),
                Err(_) => {
                    return Err(FlowError::Parse {
                        line: index + 1,
                        content: line.to_string(),
                    })
                }
            }
        }
        Ok(targets)
    }

    // nom parsers #############################################################

    // A line is either a comment or a target.
    fn record(input: &str) -> IResult<&str, Option<Target>> {
        alt((value(None, comment), map(target, Some)))(input)
    }

    fn comment(input: &str) -> IResult<&str, ()> {
        value((), pair(tag("#"), rest))(input)
    }

    fn target(input: &str) -> IResult<&str, Target> {
        map(
            tuple((
                float,
                preceded(space1, float),
                preceded(space1, size),
                preceded(space1, size),
            )),
            |(row, col, height, width)| Target {
                point: Vec2::new(row, col),
                window: SearchWindow::new(height, width),
            },
        )(input)
    }

    fn size(input: &str) -> IResult<&str, usize> {
        map_res(digit1, str::parse)(input)
    }
} // pub mod parse

#[cfg(test)]
mod tests {

    use super::*;

    #[test]
    fn parse_with_comments_and_blank_lines() {
        let content = "# tracked corners\n\n12 40.5 7 9\n  3.25\t8 5 5  \n# end\n";
        let (points, windows) = parse::points(content).unwrap();
        assert_eq!(points, vec![Vec2::new(12.0, 40.5), Vec2::new(3.25, 8.0)]);
        assert_eq!(windows, vec![SearchWindow::new(7, 9), SearchWindow::new(5, 5)]);
    }

    #[test]
    fn parse_error_reports_line() {
        let content = "1 2 3 3\n4 5 six 3\n";
        match parse::points(content) {
            Err(FlowError::Parse { line, content }) => {
                assert_eq!(line, 2);
                assert_eq!(content, "4 5 six 3");
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn fractional_window_is_rejected() {
        assert!(parse::points("1 2 3.5 3").is_err());
        assert!(parse::points("1 2 3").is_err());
        assert!(parse::points("1 2 3 3 4").is_err());
    }

    #[test]
    fn written_text_is_parsed_back() {
        let points = vec![Vec2::new(1.5, 2.0), Vec2::new(-3.0, 100.25)];
        let windows = vec![SearchWindow::new(11, 11), SearchWindow::new(3, 21)];
        let text = to_text(&points, &windows);
        assert_eq!(parse::points(&text).unwrap(), (points, windows));
    }
}
