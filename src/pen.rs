use crate::math::Point;

/// The sink the parser draws into.
///
/// The operations mirror the pen protocol of font tooling: every subpath is
/// opened by `move_to` and terminated by exactly one of `close_path` or
/// `end_path`. `qcurve_to` receives one or more off-curve control points
/// followed by the on-curve end point; when several control points are
/// given, the implied on-curve point between two consecutive control points
/// is their midpoint.
///
/// Implementations only ever receive calls, the parser never reads back.
pub trait Pen {
    fn move_to(&mut self, to: Point);
    fn line_to(&mut self, to: Point);
    /// A cubic bézier curve with two control points.
    fn curve_to(&mut self, ctrl1: Point, ctrl2: Point, to: Point);
    /// One or more quadratic bézier segments sharing implied on-curve
    /// midpoints.
    fn qcurve_to(&mut self, ctrl_points: &[Point], to: Point);
    /// Close the current subpath.
    fn close_path(&mut self);
    /// Finish the current subpath without closing it.
    fn end_path(&mut self);
}

/// A single recorded pen operation.
#[derive(Clone, Debug, PartialEq)]
pub enum PathCommand {
    MoveTo(Point),
    LineTo(Point),
    CurveTo(Point, Point, Point),
    QCurveTo(Vec<Point>, Point),
    ClosePath,
    EndPath,
}

/// A pen that records everything it is asked to draw.
///
/// Useful for testing, for transforming a path before handing it to another
/// pen, or for re-encoding it in another representation.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RecordingPen {
    pub commands: Vec<PathCommand>,
}

impl RecordingPen {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replay the recorded commands into another pen.
    pub fn replay<P: Pen>(&self, pen: &mut P) {
        for command in &self.commands {
            match command {
                PathCommand::MoveTo(to) => pen.move_to(*to),
                PathCommand::LineTo(to) => pen.line_to(*to),
                PathCommand::CurveTo(ctrl1, ctrl2, to) => pen.curve_to(*ctrl1, *ctrl2, *to),
                PathCommand::QCurveTo(ctrl_points, to) => pen.qcurve_to(ctrl_points, *to),
                PathCommand::ClosePath => pen.close_path(),
                PathCommand::EndPath => pen.end_path(),
            }
        }
    }
}

impl Pen for RecordingPen {
    fn move_to(&mut self, to: Point) {
        self.commands.push(PathCommand::MoveTo(to));
    }

    fn line_to(&mut self, to: Point) {
        self.commands.push(PathCommand::LineTo(to));
    }

    fn curve_to(&mut self, ctrl1: Point, ctrl2: Point, to: Point) {
        self.commands.push(PathCommand::CurveTo(ctrl1, ctrl2, to));
    }

    fn qcurve_to(&mut self, ctrl_points: &[Point], to: Point) {
        self.commands
            .push(PathCommand::QCurveTo(ctrl_points.to_vec(), to));
    }

    fn close_path(&mut self) {
        self.commands.push(PathCommand::ClosePath);
    }

    fn end_path(&mut self) {
        self.commands.push(PathCommand::EndPath);
    }
}
