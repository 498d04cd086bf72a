use crate::error::RenderError;
use analytics::CriticalRegion;
use analytics::distribution;
use svg::Document;
use svg::node::element::{Group, Line, Path, Rectangle, Text};

const MARGIN_LEFT: f64 = 80.0;
const MARGIN_RIGHT: f64 = 30.0;
const MARGIN_TOP: f64 = 60.0;
const MARGIN_BOTTOM: f64 = 60.0;

const CURVE_COLOR: &str = "#1f4fd1";
const REGION_COLOR: &str = "#d62728";
const OBSERVED_COLOR: &str = "#2ca02c";
const GRID_COLOR: &str = "#b0b0b0";

const FONT: &str = "sans-serif";

/// What to draw: the observed z, the rejection region, and the canvas to draw them on.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChartSpec {
    pub z_value: f64,
    pub critical_region: CriticalRegion,
    pub width: u32,
    pub height: u32,
    /// Number of points used to trace the density curve.
    pub samples: usize,
    pub x_min: f64,
    pub x_max: f64,
}

impl ChartSpec {
    /// A 1200x500 chart of the density between -4 and 4, traced with 1000 points.
    pub fn new(z_value: f64, critical_region: CriticalRegion) -> Self {
        Self {
            z_value,
            critical_region,
            width: 1200,
            height: 500,
            samples: 1000,
            x_min: -4.0,
            x_max: 4.0,
        }
    }

    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn with_samples(mut self, samples: usize) -> Self {
        self.samples = samples;
        self
    }

    pub fn with_x_range(mut self, x_min: f64, x_max: f64) -> Self {
        self.x_min = x_min;
        self.x_max = x_max;
        self
    }

    fn validate(&self) -> Result<(), RenderError> {
        if !self.z_value.is_finite() {
            return Err(RenderError::NonFiniteValue {
                name: "z value",
                value: self.z_value,
            });
        }
        if let Some(value) = self
            .critical_region
            .boundaries()
            .into_iter()
            .find(|b| !b.is_finite())
        {
            return Err(RenderError::NonFiniteValue {
                name: "critical value",
                value,
            });
        }
        check_canvas(self.width, self.height, self.samples, self.x_min, self.x_max)
    }
}

/// Checks that a canvas of this size and x range can hold a plot, without any test result.
///
/// The density must be visibly above zero somewhere in `[x_min, x_max]`; far out in the
/// tails it underflows to 0 and there is no curve to scale.
pub fn check_canvas(
    width: u32,
    height: u32,
    samples: usize,
    x_min: f64,
    x_max: f64,
) -> Result<(), RenderError> {
    if f64::from(width) <= MARGIN_LEFT + MARGIN_RIGHT
        || f64::from(height) <= MARGIN_TOP + MARGIN_BOTTOM
    {
        return Err(RenderError::InvalidDimensions { width, height });
    }
    if samples < 2 {
        return Err(RenderError::TooFewSamples(samples));
    }
    // Written so that NaN bounds are rejected too.
    if !(x_min < x_max) || !x_min.is_finite() || !x_max.is_finite() {
        return Err(RenderError::EmptyRange {
            min: x_min,
            max: x_max,
        });
    }
    if !(density_peak(&sample_density(x_min, x_max, samples)) > 0.0) {
        return Err(RenderError::FlatDensity {
            min: x_min,
            max: x_max,
        });
    }
    Ok(())
}

/// Maps data coordinates onto the plot area of the canvas.
struct Frame {
    x_min: f64,
    x_max: f64,
    y_max: f64,
    left: f64,
    right: f64,
    top: f64,
    bottom: f64,
}

impl Frame {
    fn new(spec: &ChartSpec, y_max: f64) -> Self {
        Self {
            x_min: spec.x_min,
            x_max: spec.x_max,
            y_max,
            left: MARGIN_LEFT,
            right: f64::from(spec.width) - MARGIN_RIGHT,
            top: MARGIN_TOP,
            bottom: f64::from(spec.height) - MARGIN_BOTTOM,
        }
    }

    fn px(&self, x: f64) -> f64 {
        self.left + (x - self.x_min) / (self.x_max - self.x_min) * (self.right - self.left)
    }

    fn py(&self, y: f64) -> f64 {
        self.bottom - y / self.y_max * (self.bottom - self.top)
    }
}

/// Renders the chart described by `spec` as a standalone SVG document.
pub fn render_svg(spec: &ChartSpec) -> Result<String, RenderError> {
    spec.validate()?;

    let curve = sample_density(spec.x_min, spec.x_max, spec.samples);
    let peak = density_peak(&curve);
    if !(peak > 0.0) {
        return Err(RenderError::FlatDensity {
            min: spec.x_min,
            max: spec.x_max,
        });
    }
    let frame = Frame::new(spec, peak * 1.1);

    let mut document = Document::new()
        .set("width", spec.width.to_string())
        .set("height", spec.height.to_string())
        .set("viewBox", format!("0 0 {} {}", spec.width, spec.height))
        .add(
            Rectangle::new()
                .set("width", "100%")
                .set("height", "100%")
                .set("fill", "white"),
        )
        .add(grid(&frame))
        .add(axes(&frame));

    for (from, to) in shaded_intervals(&spec.critical_region, spec.x_min, spec.x_max) {
        document = document.add(shaded_area(&frame, from, to, spec.samples));
    }

    document = document.add(
        Path::new()
            .set("class", "density")
            .set("d", polyline(&frame, &curve))
            .set("fill", "none")
            .set("stroke", CURVE_COLOR)
            .set("stroke-width", "2.5"),
    );

    for boundary in spec.critical_region.boundaries() {
        if (spec.x_min..=spec.x_max).contains(&boundary) {
            document = document.add(
                vertical_line(&frame, boundary, REGION_COLOR, "2")
                    .set("class", "critical-value")
                    .set("stroke-dasharray", "8 5"),
            );
        }
    }

    // An observed z beyond the visible range is pinned to the nearest edge; its label
    // still shows the true value.
    let shown_z = spec.z_value.clamp(spec.x_min, spec.x_max);
    document = document
        .add(vertical_line(&frame, shown_z, OBSERVED_COLOR, "3").set("class", "observed-z"))
        .add(titles(spec, &frame))
        .add(legend(spec, &frame));

    tracing::debug!(
        z_value = spec.z_value,
        critical_value = spec.critical_region.critical_value(),
        width = spec.width,
        height = spec.height,
        "Rendered Z-test chart."
    );

    Ok(document.to_string())
}

fn sample_density(x_min: f64, x_max: f64, samples: usize) -> Vec<(f64, f64)> {
    let step = (x_max - x_min) / (samples - 1) as f64;
    (0..samples)
        .map(|i| {
            let x = if i == samples - 1 {
                x_max
            } else {
                x_min + step * i as f64
            };
            (x, distribution::pdf(x))
        })
        .collect()
}

fn density_peak(curve: &[(f64, f64)]) -> f64 {
    curve.iter().map(|&(_, y)| y).fold(0.0, f64::max)
}

/// The parts of `[x_min, x_max]` that fall inside the rejection region.
fn shaded_intervals(region: &CriticalRegion, x_min: f64, x_max: f64) -> Vec<(f64, f64)> {
    let intervals = match *region {
        CriticalRegion::TwoSided { lower, upper } => vec![(x_min, lower), (upper, x_max)],
        CriticalRegion::Upper { boundary } => vec![(boundary, x_max)],
        CriticalRegion::Lower { boundary } => vec![(x_min, boundary)],
    };
    intervals
        .into_iter()
        .map(|(from, to)| (from.max(x_min), to.min(x_max)))
        .filter(|(from, to)| from < to)
        .collect()
}

fn shaded_area(frame: &Frame, from: f64, to: f64, samples: usize) -> Path {
    let share = (to - from) / (frame.x_max - frame.x_min);
    let points = ((samples as f64 * share).ceil() as usize).max(2);
    let curve = sample_density(from, to, points);

    let mut d = format!("M{} {}", num(frame.px(from)), num(frame.py(0.0)));
    for &(x, y) in &curve {
        d.push_str(&format!(" L{} {}", num(frame.px(x)), num(frame.py(y))));
    }
    d.push_str(&format!(" L{} {} Z", num(frame.px(to)), num(frame.py(0.0))));

    Path::new()
        .set("class", "critical-region")
        .set("d", d)
        .set("fill", REGION_COLOR)
        .set("fill-opacity", "0.4")
        .set("stroke", "none")
}

fn polyline(frame: &Frame, points: &[(f64, f64)]) -> String {
    points
        .iter()
        .enumerate()
        .map(|(i, &(x, y))| {
            let command = if i == 0 { 'M' } else { 'L' };
            format!("{command}{} {}", num(frame.px(x)), num(frame.py(y)))
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn vertical_line(frame: &Frame, x: f64, color: &str, width: &str) -> Line {
    Line::new()
        .set("x1", num(frame.px(x)))
        .set("x2", num(frame.px(x)))
        .set("y1", num(frame.top))
        .set("y2", num(frame.bottom))
        .set("stroke", color)
        .set("stroke-width", width)
}

fn grid(frame: &Frame) -> Group {
    let mut group = Group::new()
        .set("class", "grid")
        .set("stroke", GRID_COLOR)
        .set("stroke-opacity", "0.3")
        .set("stroke-dasharray", "4 4");

    for tick in x_ticks(frame) {
        group = group.add(
            Line::new()
                .set("x1", num(frame.px(tick)))
                .set("x2", num(frame.px(tick)))
                .set("y1", num(frame.top))
                .set("y2", num(frame.bottom)),
        );
    }
    for tick in y_ticks(frame) {
        group = group.add(
            Line::new()
                .set("x1", num(frame.left))
                .set("x2", num(frame.right))
                .set("y1", num(frame.py(tick)))
                .set("y2", num(frame.py(tick))),
        );
    }
    group
}

fn axes(frame: &Frame) -> Group {
    let mut group = Group::new()
        .set("class", "axes")
        .set("font-family", FONT)
        .set("font-size", "12")
        .add(
            Rectangle::new()
                .set("x", num(frame.left))
                .set("y", num(frame.top))
                .set("width", num(frame.right - frame.left))
                .set("height", num(frame.bottom - frame.top))
                .set("fill", "none")
                .set("stroke", "black"),
        )
        // Zero baseline of the density.
        .add(
            Line::new()
                .set("x1", num(frame.left))
                .set("x2", num(frame.right))
                .set("y1", num(frame.py(0.0)))
                .set("y2", num(frame.py(0.0)))
                .set("stroke", "black")
                .set("stroke-width", "0.5"),
        );

    if (frame.x_min..=frame.x_max).contains(&0.0) {
        group = group.add(
            Line::new()
                .set("x1", num(frame.px(0.0)))
                .set("x2", num(frame.px(0.0)))
                .set("y1", num(frame.top))
                .set("y2", num(frame.bottom))
                .set("stroke", "black")
                .set("stroke-width", "0.5")
                .set("stroke-opacity", "0.3"),
        );
    }

    for tick in x_ticks(frame) {
        group = group.add(
            Text::new(format!("{tick}"))
                .set("x", num(frame.px(tick)))
                .set("y", num(frame.bottom + 18.0))
                .set("text-anchor", "middle"),
        );
    }
    for tick in y_ticks(frame) {
        group = group.add(
            Text::new(format!("{tick:.1}"))
                .set("x", num(frame.left - 8.0))
                .set("y", num(frame.py(tick) + 4.0))
                .set("text-anchor", "end"),
        );
    }
    group
}

fn titles(spec: &ChartSpec, frame: &Frame) -> Group {
    let center_x = (frame.left + frame.right) / 2.0;
    let center_y = (frame.top + frame.bottom) / 2.0;
    Group::new()
        .set("font-family", FONT)
        .set("font-weight", "bold")
        .add(
            Text::new("Standard normal distribution with critical region")
                .set("x", num(f64::from(spec.width) / 2.0))
                .set("y", num(frame.top / 2.0 + 6.0))
                .set("text-anchor", "middle")
                .set("font-size", "16"),
        )
        .add(
            Text::new("z value")
                .set("x", num(center_x))
                .set("y", num(f64::from(spec.height) - 15.0))
                .set("text-anchor", "middle")
                .set("font-size", "13"),
        )
        .add(
            Text::new("Probability density")
                .set("x", "20")
                .set("y", num(center_y))
                .set("text-anchor", "middle")
                .set("font-size", "13")
                .set("transform", format!("rotate(-90 20 {})", num(center_y))),
        )
}

fn legend(spec: &ChartSpec, frame: &Frame) -> Group {
    let entries = [
        (CURVE_COLOR, "Standard normal distribution".to_string(), None),
        (REGION_COLOR, "Critical region".to_string(), Some("area")),
        (
            REGION_COLOR,
            format!("z critical = {}", spec.critical_region.label()),
            Some("8 5"),
        ),
        (
            OBSERVED_COLOR,
            format!("observed z = {:.2}", spec.z_value),
            None,
        ),
    ];

    let width = 230.0;
    let x = frame.right - width - 10.0;
    let y = frame.top + 10.0;
    let mut group = Group::new()
        .set("class", "legend")
        .set("font-family", FONT)
        .set("font-size", "12")
        .add(
            Rectangle::new()
                .set("x", num(x))
                .set("y", num(y))
                .set("width", num(width))
                .set("height", num(entries.len() as f64 * 20.0 + 10.0))
                .set("fill", "white")
                .set("fill-opacity", "0.85")
                .set("stroke", GRID_COLOR),
        );

    for (i, (color, label, style)) in entries.into_iter().enumerate() {
        let row_y = y + 18.0 + i as f64 * 20.0;
        let swatch = match style {
            Some("area") => Group::new().add(
                Rectangle::new()
                    .set("x", num(x + 10.0))
                    .set("y", num(row_y - 8.0))
                    .set("width", "24")
                    .set("height", "10")
                    .set("fill", color)
                    .set("fill-opacity", "0.4"),
            ),
            dash => {
                let mut line = Line::new()
                    .set("x1", num(x + 10.0))
                    .set("x2", num(x + 34.0))
                    .set("y1", num(row_y - 4.0))
                    .set("y2", num(row_y - 4.0))
                    .set("stroke", color)
                    .set("stroke-width", "2.5");
                if let Some(dash) = dash {
                    line = line.set("stroke-dasharray", dash);
                }
                Group::new().add(line)
            }
        };
        group = group.add(swatch).add(
            Text::new(label)
                .set("x", num(x + 42.0))
                .set("y", num(row_y)),
        );
    }
    group
}

fn x_ticks(frame: &Frame) -> Vec<f64> {
    let first = frame.x_min.ceil() as i64;
    let last = frame.x_max.floor() as i64;
    (first..=last).map(|t| t as f64).collect()
}

fn y_ticks(frame: &Frame) -> Vec<f64> {
    (1..)
        .map(|i| f64::from(i) * 0.1)
        .take_while(|y| *y <= frame.y_max)
        .collect()
}

fn num(value: f64) -> String {
    format!("{value:.2}")
}
