//! Wire curves between port anchors.
//!
//! A wire leaves its output port heading right and enters its input port
//! from the left; both control points sit `tangent` units out along those
//! directions.

use kurbo::{CubicBez, ParamCurve, Point};
use ng_core::Bounds;

/// Wire shape settings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WireStyle {
    /// Horizontal distance from an endpoint to its control point.
    pub tangent: f64,
    /// Side length of the square removal handle at the wire midpoint.
    pub handle_size: f32,
}

impl Default for WireStyle {
    fn default() -> Self {
        Self {
            tangent: 50.0,
            handle_size: 10.0,
        }
    }
}

/// Curve from an output anchor to an input anchor.
pub fn wire_curve(output: Point, input: Point, style: &WireStyle) -> CubicBez {
    CubicBez::new(
        output,
        Point::new(output.x + style.tangent, output.y),
        Point::new(input.x - style.tangent, input.y),
        input,
    )
}

/// Preview curve from a pending port to the pointer.
///
/// `from_input` flips the tangents so the curve leaves an input port to the left.
pub fn preview_curve(anchor: Point, cursor: Point, from_input: bool, style: &WireStyle) -> CubicBez {
    let t = if from_input { -style.tangent } else { style.tangent };
    CubicBez::new(
        anchor,
        Point::new(anchor.x + t, anchor.y),
        Point::new(cursor.x - t, cursor.y),
        cursor,
    )
}

/// Point at t = 0.5.
pub fn midpoint(curve: &CubicBez) -> Point {
    curve.eval(0.5)
}

/// Square removal handle centred on the curve midpoint.
pub fn handle_bounds(curve: &CubicBez, style: &WireStyle) -> Bounds {
    let mid = midpoint(curve);
    Bounds::centered(
        mid.x as f32,
        mid.y as f32,
        style.handle_size,
        style.handle_size,
    )
}
