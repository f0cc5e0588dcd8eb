use arrayvec::ArrayVec;

use crate::arc::{ArcFlags, SvgArc};
use crate::error::ParseError;
use crate::math::{point, vector, Angle, Point};
use crate::pen::Pen;
use crate::scanner::Scanner;

/// Parses a path data string and replays it into a pen.
///
/// Commands are emitted in input order with all coordinates resolved to
/// absolute values. Elliptical arcs come out as runs of quadratic bézier
/// segments.
///
/// # Examples
///
/// ```
/// use svg_path_pen::{parse_path, RecordingPen};
///
/// let mut pen = RecordingPen::new();
/// parse_path("M 0 0 L 10 0 10 10 L 0 10 z", &mut pen).unwrap();
/// ```
pub fn parse_path<P: Pen>(path: &str, pen: &mut P) -> Result<(), ParseError> {
    PathParser::new().parse(&mut Scanner::new(path.chars()), pen)
}

/// The path data interpreter.
///
/// All state lives for the duration of a single `parse` call; a parser value
/// can be reused for several paths but never shares anything between them.
#[derive(Debug, Default)]
pub struct PathParser {
    current_position: Point,
    need_end: bool,
}

impl PathParser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn parse<Iter, P>(&mut self, src: &mut Scanner<Iter>, pen: &mut P) -> Result<(), ParseError>
    where
        Iter: Iterator<Item = char>,
        P: Pen,
    {
        self.need_end = false;

        let result = self.parse_path(src, pen);

        if result.is_ok() && self.need_end {
            pen.end_path();
            self.need_end = false;
        }

        result
    }

    fn parse_path(
        &mut self,
        src: &mut Scanner<impl Iterator<Item = char>>,
        pen: &mut impl Pen,
    ) -> Result<(), ParseError> {
        // SVG: a relative move-to at the start of the path is treated as a
        // pair of absolute coordinates.
        self.current_position = point(0.0, 0.0);
        let mut first_position = point(0.0, 0.0);

        let mut need_start = true;
        let mut prev_cubic_ctrl = None;
        let mut prev_quadratic_ctrl = None;
        // The command a bare number group repeats. None until the first
        // command letter, and cleared by Z/z which takes no arguments.
        let mut implicit_cmd: Option<char> = None;

        src.skip_separators();

        while !src.is_finished() {
            let (cmd_line, cmd_col) = (*src).position();

            let cmd = match src.command() {
                Some(cmd) => cmd,
                None => {
                    if !src.at_number() {
                        return Err(src.unexpected());
                    }
                    match implicit_cmd {
                        Some(cmd) => cmd,
                        None => {
                            return Err(ParseError::UnallowedImplicitCommand {
                                line: cmd_line,
                                column: cmd_col,
                            });
                        }
                    }
                }
            };

            if need_start && cmd != 'm' && cmd != 'M' {
                return Err(ParseError::MissingMoveTo {
                    command: cmd,
                    line: cmd_line,
                    column: cmd_col,
                });
            }

            let is_relative = cmd.is_lowercase();

            match cmd {
                'm' | 'M' => {
                    if self.need_end {
                        pen.end_path();
                    }

                    let to = self.parse_endpoint(cmd, is_relative, src)?;
                    first_position = to;
                    pen.move_to(to);
                    self.need_end = true;
                    need_start = false;
                }
                'l' | 'L' => {
                    let to = self.parse_endpoint(cmd, is_relative, src)?;
                    pen.line_to(to);
                }
                'h' | 'H' => {
                    let mut x = self.parse_number(cmd, src)?;
                    if is_relative {
                        x += self.current_position.x;
                    }
                    let to = point(x, self.current_position.y);
                    self.current_position = to;
                    pen.line_to(to);
                }
                'v' | 'V' => {
                    let mut y = self.parse_number(cmd, src)?;
                    if is_relative {
                        y += self.current_position.y;
                    }
                    let to = point(self.current_position.x, y);
                    self.current_position = to;
                    pen.line_to(to);
                }
                'c' | 'C' => {
                    let ctrl1 = self.parse_point(cmd, is_relative, src)?;
                    let ctrl2 = self.parse_point(cmd, is_relative, src)?;
                    let to = self.parse_endpoint(cmd, is_relative, src)?;
                    prev_cubic_ctrl = Some(ctrl2);
                    pen.curve_to(ctrl1, ctrl2, to);
                }
                's' | 'S' => {
                    let ctrl1 = self.smooth_ctrl(prev_cubic_ctrl);
                    let ctrl2 = self.parse_point(cmd, is_relative, src)?;
                    let to = self.parse_endpoint(cmd, is_relative, src)?;
                    prev_cubic_ctrl = Some(ctrl2);
                    pen.curve_to(ctrl1, ctrl2, to);
                }
                'q' | 'Q' => {
                    let ctrl = self.parse_point(cmd, is_relative, src)?;
                    let to = self.parse_endpoint(cmd, is_relative, src)?;
                    prev_quadratic_ctrl = Some(ctrl);
                    pen.qcurve_to(&[ctrl], to);
                }
                't' | 'T' => {
                    let ctrl = self.smooth_ctrl(prev_quadratic_ctrl);
                    let to = self.parse_endpoint(cmd, is_relative, src)?;
                    prev_quadratic_ctrl = Some(ctrl);
                    pen.qcurve_to(&[ctrl], to);
                }
                'a' | 'A' => {
                    let from = self.current_position;
                    let rx = self.parse_number(cmd, src)?;
                    let ry = self.parse_number(cmd, src)?;
                    let x_rotation = self.parse_number(cmd, src)?;
                    let large_arc = self.parse_flag(cmd, src)?;
                    let sweep = self.parse_flag(cmd, src)?;
                    let to = self.parse_endpoint(cmd, is_relative, src)?;
                    let svg_arc = SvgArc {
                        from,
                        to,
                        radii: vector(rx, ry),
                        x_rotation: Angle::degrees(x_rotation),
                        flags: ArcFlags { large_arc, sweep },
                    };

                    if svg_arc.is_zero_length() {
                        // An arc whose endpoints coincide draws nothing.
                        prev_quadratic_ctrl = None;
                    } else if svg_arc.is_straight_line() {
                        pen.line_to(to);
                        prev_quadratic_ctrl = None;
                    } else {
                        // At most ceil(360 / 45) segments per arc.
                        let mut ctrl_points = ArrayVec::<Point, 8>::new();
                        svg_arc.for_each_quadratic_bezier(&mut |ctrl, _| {
                            ctrl_points.push(ctrl);
                        });
                        prev_quadratic_ctrl = ctrl_points.last().copied();
                        pen.qcurve_to(&ctrl_points, to);
                    }
                }
                'z' | 'Z' => {
                    if self.current_position != first_position {
                        pen.line_to(first_position);
                    }
                    pen.close_path();
                    self.current_position = first_position;
                    self.need_end = false;
                    need_start = true;
                }
                _ => {
                    return Err(ParseError::Syntax {
                        found: cmd,
                        line: cmd_line,
                        column: cmd_col,
                    });
                }
            }

            match cmd {
                'c' | 'C' | 's' | 'S' => {
                    prev_quadratic_ctrl = None;
                }
                'q' | 'Q' | 't' | 'T' => {
                    prev_cubic_ctrl = None;
                }
                'a' | 'A' => {
                    // Arcs come out as quadratics; their last control point
                    // takes part in a following T/t reflection.
                    prev_cubic_ctrl = None;
                }
                _ => {
                    prev_cubic_ctrl = None;
                    prev_quadratic_ctrl = None;
                }
            }

            implicit_cmd = match cmd {
                'm' => Some('l'),
                'M' => Some('L'),
                'z' | 'Z' => None,
                cmd => Some(cmd),
            };

            src.skip_separators();
        }

        Ok(())
    }

    fn smooth_ctrl(&self, prev_ctrl: Option<Point>) -> Point {
        if let Some(prev_ctrl) = prev_ctrl {
            self.current_position + (self.current_position - prev_ctrl)
        } else {
            self.current_position
        }
    }

    fn parse_endpoint(
        &mut self,
        cmd: char,
        is_relative: bool,
        src: &mut Scanner<impl Iterator<Item = char>>,
    ) -> Result<Point, ParseError> {
        let position = self.parse_point(cmd, is_relative, src)?;
        self.current_position = position;

        Ok(position)
    }

    fn parse_point(
        &mut self,
        cmd: char,
        is_relative: bool,
        src: &mut Scanner<impl Iterator<Item = char>>,
    ) -> Result<Point, ParseError> {
        let mut x = self.parse_number(cmd, src)?;
        let mut y = self.parse_number(cmd, src)?;

        if is_relative {
            x += self.current_position.x;
            y += self.current_position.y;
        }

        Ok(point(x, y))
    }

    fn parse_number(
        &mut self,
        cmd: char,
        src: &mut Scanner<impl Iterator<Item = char>>,
    ) -> Result<f64, ParseError> {
        self.check_argument(cmd, src)?;
        src.number()
    }

    fn parse_flag(
        &mut self,
        cmd: char,
        src: &mut Scanner<impl Iterator<Item = char>>,
    ) -> Result<bool, ParseError> {
        self.check_argument(cmd, src)?;
        src.flag()
    }

    // A new command letter or the end of input in the middle of an argument
    // group means the group is incomplete.
    fn check_argument(
        &self,
        cmd: char,
        src: &mut Scanner<impl Iterator<Item = char>>,
    ) -> Result<(), ParseError> {
        src.skip_separators();
        if src.is_finished() || src.at_command_letter() {
            let (line, column) = (*src).position();
            return Err(ParseError::Arity {
                command: cmd,
                line,
                column,
            });
        }

        Ok(())
    }
}

#[cfg(test)]
use crate::pen::{PathCommand, RecordingPen};

#[cfg(test)]
fn record(path: &str) -> Vec<PathCommand> {
    let mut pen = RecordingPen::new();
    parse_path(path, &mut pen).unwrap();
    pen.commands
}

#[cfg(test)]
fn parse_err(path: &str) -> ParseError {
    parse_path(path, &mut RecordingPen::new()).unwrap_err()
}

#[cfg(test)]
fn assert_equivalent(path1: &str, path2: &str) {
    assert_eq!(record(path1), record(path2), "{:?} vs {:?}", path1, path2);
}

#[cfg(test)]
fn assert_point_approx(actual: Point, expected: Point) {
    assert!(
        (actual.x - expected.x).abs() < 1e-6 && (actual.y - expected.y).abs() < 1e-6,
        "{:?} != {:?}",
        actual,
        expected
    );
}

#[cfg(test)]
fn assert_commands_approx(actual: &[PathCommand], expected: &[PathCommand]) {
    assert_eq!(actual.len(), expected.len(), "{:?} vs {:?}", actual, expected);
    for (a, e) in actual.iter().zip(expected.iter()) {
        match (a, e) {
            (PathCommand::MoveTo(p1), PathCommand::MoveTo(p2))
            | (PathCommand::LineTo(p1), PathCommand::LineTo(p2)) => {
                assert_point_approx(*p1, *p2);
            }
            (PathCommand::CurveTo(a1, a2, a3), PathCommand::CurveTo(e1, e2, e3)) => {
                assert_point_approx(*a1, *e1);
                assert_point_approx(*a2, *e2);
                assert_point_approx(*a3, *e3);
            }
            (PathCommand::QCurveTo(ctrls1, to1), PathCommand::QCurveTo(ctrls2, to2)) => {
                assert_eq!(ctrls1.len(), ctrls2.len(), "{:?} vs {:?}", a, e);
                for (c1, c2) in ctrls1.iter().zip(ctrls2.iter()) {
                    assert_point_approx(*c1, *c2);
                }
                assert_point_approx(*to1, *to2);
            }
            (PathCommand::ClosePath, PathCommand::ClosePath)
            | (PathCommand::EndPath, PathCommand::EndPath) => {}
            _ => panic!("{:?} != {:?}", a, e),
        }
    }
}

#[test]
fn empty() {
    assert_eq!(record(""), vec![]);
    assert_eq!(record(" "), vec![]);
}

#[test]
fn triangle_with_close() {
    assert_eq!(
        record("M 100 100 L 300 100 L 200 300 z"),
        vec![
            PathCommand::MoveTo(point(100.0, 100.0)),
            PathCommand::LineTo(point(300.0, 100.0)),
            PathCommand::LineTo(point(200.0, 300.0)),
            PathCommand::LineTo(point(100.0, 100.0)),
            PathCommand::ClosePath,
        ]
    );
}

#[test]
fn multiple_subpaths() {
    // The open subpath ends before the second move-to, and only the closed
    // one emits a close.
    assert_eq!(
        record("M 0 0 L 50 20 M 100 100 L 300 100 L 200 300 z"),
        vec![
            PathCommand::MoveTo(point(0.0, 0.0)),
            PathCommand::LineTo(point(50.0, 20.0)),
            PathCommand::EndPath,
            PathCommand::MoveTo(point(100.0, 100.0)),
            PathCommand::LineTo(point(300.0, 100.0)),
            PathCommand::LineTo(point(200.0, 300.0)),
            PathCommand::LineTo(point(100.0, 100.0)),
            PathCommand::ClosePath,
        ]
    );
}

#[test]
fn relative_move_to() {
    assert_eq!(
        record("M 0 0 L 50 20 m 50 80 L 300 100 L 200 300 z"),
        vec![
            PathCommand::MoveTo(point(0.0, 0.0)),
            PathCommand::LineTo(point(50.0, 20.0)),
            PathCommand::EndPath,
            PathCommand::MoveTo(point(100.0, 100.0)),
            PathCommand::LineTo(point(300.0, 100.0)),
            PathCommand::LineTo(point(200.0, 300.0)),
            PathCommand::LineTo(point(100.0, 100.0)),
            PathCommand::ClosePath,
        ]
    );
}

#[test]
fn smooth_cubic() {
    // S reflects the previous cubic control point through the current point.
    assert_eq!(
        record("M100,200 C100,100 250,100 250,200 S400,300 400,200"),
        vec![
            PathCommand::MoveTo(point(100.0, 200.0)),
            PathCommand::CurveTo(
                point(100.0, 100.0),
                point(250.0, 100.0),
                point(250.0, 200.0)
            ),
            PathCommand::CurveTo(
                point(250.0, 300.0),
                point(400.0, 300.0),
                point(400.0, 200.0)
            ),
            PathCommand::EndPath,
        ]
    );
}

#[test]
fn smooth_quadratic() {
    assert_eq!(
        record("M200,300 Q400,50 600,300 T1000,300"),
        vec![
            PathCommand::MoveTo(point(200.0, 300.0)),
            PathCommand::QCurveTo(vec![point(400.0, 50.0)], point(600.0, 300.0)),
            PathCommand::QCurveTo(vec![point(800.0, 550.0)], point(1000.0, 300.0)),
            PathCommand::EndPath,
        ]
    );
}

#[test]
fn initial_smooth_cubic() {
    // No previous cubic to reflect: the first control point degenerates to
    // the current point.
    assert_eq!(
        record("M100,200 s 150,-100 150,0"),
        vec![
            PathCommand::MoveTo(point(100.0, 200.0)),
            PathCommand::CurveTo(
                point(100.0, 200.0),
                point(250.0, 100.0),
                point(250.0, 200.0)
            ),
            PathCommand::EndPath,
        ]
    );
}

#[test]
fn initial_smooth_quadratic() {
    assert_eq!(
        record("M100,200 t 150,0"),
        vec![
            PathCommand::MoveTo(point(100.0, 200.0)),
            PathCommand::QCurveTo(vec![point(100.0, 200.0)], point(250.0, 200.0)),
            PathCommand::EndPath,
        ]
    );
}

#[test]
fn smooth_cubic_after_non_cubic() {
    // The reflection is gated on the previous command being a cubic.
    assert_eq!(
        record("M 0 0 Q 10 0 20 0 S 30 30 40 40"),
        vec![
            PathCommand::MoveTo(point(0.0, 0.0)),
            PathCommand::QCurveTo(vec![point(10.0, 0.0)], point(20.0, 0.0)),
            PathCommand::CurveTo(point(20.0, 0.0), point(30.0, 30.0), point(40.0, 40.0)),
            PathCommand::EndPath,
        ]
    );
}

#[test]
fn smooth_quadratic_after_cubic() {
    assert_eq!(
        record("M 0 0 C 1 1 2 2 3 3 T 10 10"),
        vec![
            PathCommand::MoveTo(point(0.0, 0.0)),
            PathCommand::CurveTo(point(1.0, 1.0), point(2.0, 2.0), point(3.0, 3.0)),
            PathCommand::QCurveTo(vec![point(3.0, 3.0)], point(10.0, 10.0)),
            PathCommand::EndPath,
        ]
    );
}

#[test]
fn relative_quadratic() {
    assert_eq!(
        record("M200,300 q200,-250 400,0"),
        vec![
            PathCommand::MoveTo(point(200.0, 300.0)),
            PathCommand::QCurveTo(vec![point(400.0, 50.0)], point(600.0, 300.0)),
            PathCommand::EndPath,
        ]
    );
}

#[test]
fn horizontal_and_vertical_lines() {
    let expected = "M 100 100 L 300 100 L 200 300 z";
    assert_equivalent("M 100 100 H 300 L 200 300 z", expected);
    assert_equivalent("M 100 100 h 200 L 200 300 z", expected);

    let expected = "M 100 100 L 100 300 L 200 300 z";
    assert_equivalent("M 100 100 V 300 L 200 300 z", expected);
    assert_equivalent("M 100 100 v 200 L 200 300 z", expected);
}

#[test]
fn implicit_line_to_after_move_to() {
    assert_eq!(
        record("M 1 2 3 4"),
        vec![
            PathCommand::MoveTo(point(1.0, 2.0)),
            PathCommand::LineTo(point(3.0, 4.0)),
            PathCommand::EndPath,
        ]
    );
    assert_eq!(
        record("m 1 2 3 4"),
        vec![
            PathCommand::MoveTo(point(1.0, 2.0)),
            PathCommand::LineTo(point(4.0, 6.0)),
            PathCommand::EndPath,
        ]
    );
}

#[test]
fn equivalent_paths() {
    // No spaces needed between numbers and commands.
    assert_equivalent("M 100 100 L 200 200", "M100 100L200 200");
    // Repeated implicit command.
    assert_equivalent("M 100 200 L 200 100 L -100 -200", "M 100 200 L 200 100 -100 -200");
    // No spaces needed before a minus sign.
    assert_equivalent("M100,200c10-5,20-10,30-20", "M 100 200 c 10 -5 20 -10 30 -20");
    // Closing a path adds an implicit line-to back to the subpath start.
    assert_equivalent(
        "M 100 100 L 300 100 L 200 300 z",
        "M 100 100 L 300 100 L 200 300 L 100 100 z",
    );
    // Arc flags may be packed without separators.
    assert_equivalent("M 0 0 a5 5 0 1110 0", "M 0 0 a 5 5 0 1 1 10 0");
}

#[test]
fn relative_and_absolute_arcs() {
    assert_equivalent(
        "M 100 100 a 150 150 0 1 0 150 -150",
        "M 100 100 A 150 150 0 1 0 250 -50",
    );
}

#[test]
fn exponents() {
    // e or E, the plus is optional, and magnitudes through +/-3.4e38 are
    // preserved.
    assert_eq!(
        record("M-3.4e38 3.4E+38L-3.4E-38,3.4e-38"),
        vec![
            PathCommand::MoveTo(point(-3.4e38, 3.4e38)),
            PathCommand::LineTo(point(-3.4e-38, 3.4e-38)),
            PathCommand::EndPath,
        ]
    );
}

#[test]
fn arc_quarter_circle() {
    assert_commands_approx(
        &record("M 100 0 A 100 100 0 0 1 0 100"),
        &[
            PathCommand::MoveTo(point(100.0, 0.0)),
            PathCommand::QCurveTo(
                vec![
                    point(100.0, 41.42135623730951),
                    point(41.42135623730951, 100.0),
                ],
                point(0.0, 100.0),
            ),
            PathCommand::EndPath,
        ],
    );
}

#[test]
fn arc_half_circle() {
    // 180 degrees of sweep subdivides into four 45 degree segments.
    assert_commands_approx(
        &record("M 100 0 A 100 100 0 0 1 -100 0 z"),
        &[
            PathCommand::MoveTo(point(100.0, 0.0)),
            PathCommand::QCurveTo(
                vec![
                    point(100.0, 41.42135623730951),
                    point(41.42135623730951, 100.0),
                    point(-41.42135623730951, 100.0),
                    point(-100.0, 41.42135623730951),
                ],
                point(-100.0, 0.0),
            ),
            PathCommand::LineTo(point(100.0, 0.0)),
            PathCommand::ClosePath,
        ],
    );
}

#[test]
fn smooth_quadratic_after_arc() {
    // Arcs are emitted as quadratics, so a following T reflects the arc's
    // last control point.
    assert_commands_approx(
        &record("M 100 0 A 100 100 0 0 1 0 100 T -100 100"),
        &[
            PathCommand::MoveTo(point(100.0, 0.0)),
            PathCommand::QCurveTo(
                vec![
                    point(100.0, 41.42135623730951),
                    point(41.42135623730951, 100.0),
                ],
                point(0.0, 100.0),
            ),
            PathCommand::QCurveTo(vec![point(-41.42135623730951, 100.0)], point(-100.0, 100.0)),
            PathCommand::EndPath,
        ],
    );
}

#[test]
fn arc_zero_radius() {
    // A zero radius degenerates to a straight line.
    assert_eq!(
        record("M 0 0 A 0 50 0 0 1 100 100"),
        vec![
            PathCommand::MoveTo(point(0.0, 0.0)),
            PathCommand::LineTo(point(100.0, 100.0)),
            PathCommand::EndPath,
        ]
    );
}

#[test]
fn arc_zero_length() {
    // An arc whose endpoints coincide draws nothing.
    assert_eq!(
        record("M 5 5 A 10 10 0 1 1 5 5 L 6 6"),
        vec![
            PathCommand::MoveTo(point(5.0, 5.0)),
            PathCommand::LineTo(point(6.0, 6.0)),
            PathCommand::EndPath,
        ]
    );
}

#[test]
fn unallowed_implicit_command() {
    assert!(matches!(
        parse_err("M 100 100 L 200 200 Z 100 200"),
        ParseError::UnallowedImplicitCommand { .. }
    ));
    assert!(matches!(
        parse_err("100 200 L 300 300"),
        ParseError::UnallowedImplicitCommand { .. }
    ));
}

#[test]
fn missing_move_to() {
    assert!(matches!(
        parse_err("L 10 10"),
        ParseError::MissingMoveTo { command: 'L', .. }
    ));
    assert!(matches!(
        parse_err("M 0 0 Z L 1 1"),
        ParseError::MissingMoveTo { command: 'L', .. }
    ));
}

#[test]
fn incomplete_argument_group() {
    assert!(matches!(
        parse_err("M 10 10 L 20"),
        ParseError::Arity { command: 'L', .. }
    ));
    assert!(matches!(
        parse_err("M"),
        ParseError::Arity { command: 'M', .. }
    ));
    assert!(matches!(
        parse_err("M 0 0 C 1 1 2 2"),
        ParseError::Arity { command: 'C', .. }
    ));
    assert!(matches!(
        parse_err("M 0 0 A 5 5 0 1"),
        ParseError::Arity { command: 'A', .. }
    ));
    assert!(matches!(
        parse_err("M 1 2 3"),
        ParseError::Arity { command: 'L', .. }
    ));
}

#[test]
fn syntax_errors() {
    assert!(matches!(
        parse_err("M 0 0 x 2 2"),
        ParseError::Syntax { found: 'x', .. }
    ));
    assert!(matches!(
        parse_err("M 0 *2"),
        ParseError::Syntax { found: '*', .. }
    ));
    assert!(matches!(parse_err("M 0 --1"), ParseError::Syntax { .. }));
    assert!(matches!(parse_err("M 0 1ee2"), ParseError::Syntax { .. }));
    assert!(matches!(parse_err("M 0 0 A 5 5 0 2 0 1 1"), ParseError::Syntax { .. }));
}

#[test]
fn error_positions() {
    assert_eq!(
        parse_err("x 0 0"),
        ParseError::Syntax {
            found: 'x',
            line: 0,
            column: 0,
        }
    );
    assert_eq!(
        parse_err("\n M 0 \n0 1 x 1 1 1"),
        ParseError::Syntax {
            found: 'x',
            line: 2,
            column: 4,
        }
    );
}
