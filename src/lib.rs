#![deny(bare_trait_objects)]
#![allow(clippy::many_single_char_names)]

//! Parse [SVG path data](https://svgwg.org/specs/paths/#PathData) and replay
//! it through a pen.
//!
//! The parser resolves relative coordinates, smooth curve shorthands and
//! implicit command repetitions, converts elliptical arcs into quadratic
//! bézier curves, and hands the resulting sequence of normalized drawing
//! commands to a [`Pen`](trait.Pen.html). How those commands are rendered,
//! recorded or transformed is entirely up to the pen implementation.
//!
//! # Examples
//!
//! ```
//! use svg_path_pen::{parse_path, PathCommand, RecordingPen};
//! use svg_path_pen::math::point;
//!
//! let mut pen = RecordingPen::new();
//! parse_path("M 10 10 L 90 10 L 50 90 Z", &mut pen).unwrap();
//!
//! assert_eq!(
//!     pen.commands,
//!     vec![
//!         PathCommand::MoveTo(point(10.0, 10.0)),
//!         PathCommand::LineTo(point(90.0, 10.0)),
//!         PathCommand::LineTo(point(50.0, 90.0)),
//!         PathCommand::LineTo(point(10.0, 10.0)),
//!         PathCommand::ClosePath,
//!     ],
//! );
//! ```

pub mod arc;
mod error;
pub mod math;
mod pen;
mod scanner;
mod parser;

#[doc(inline)]
pub use crate::arc::{Arc, ArcFlags, SvgArc};
pub use crate::error::ParseError;
pub use crate::parser::{parse_path, PathParser};
pub use crate::pen::{PathCommand, Pen, RecordingPen};
pub use crate::scanner::{Scanner, Token};
