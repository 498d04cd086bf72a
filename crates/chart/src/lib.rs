//! # Z-test Chart Renderer
//!
//! Draws the standard normal density as an SVG image, shades the rejection region of a
//! test and marks the observed z value. Rendering is kept apart from the statistics so a
//! failure here never hides a computed result.

pub mod error;
pub mod render;

pub use error::RenderError;
pub use render::{ChartSpec, check_canvas, render_svg};
