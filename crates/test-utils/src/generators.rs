//! Generators for synthetic detection polygons.
//!
//! Rings are returned as `Vec<[f64; 2]>` in pixel coordinates, the same
//! shape detectors emit for mask traces.

/// Axis-aligned rectangle ring, clockwise in image coordinates.
///
/// # Example
///
/// ```
/// use test_utils::rect_ring;
///
/// let ring = rect_ring(0.0, 0.0, 4.0, 2.0);
/// assert_eq!(ring.len(), 4);
/// assert_eq!(ring[2], [4.0, 2.0]);
/// ```
pub fn rect_ring(x1: f64, y1: f64, x2: f64, y2: f64) -> Vec<[f64; 2]> {
    vec![[x1, y1], [x2, y1], [x2, y2], [x1, y2]]
}

/// Square ring of side `size` centred on `(cx, cy)`.
pub fn centered_square(cx: f64, cy: f64, size: f64) -> Vec<[f64; 2]> {
    let h = size / 2.0;
    rect_ring(cx - h, cy - h, cx + h, cy + h)
}

/// Regular polygon with `sides` vertices on a circle.
///
/// Useful as a stand-in for round mask traces.
pub fn regular_polygon(cx: f64, cy: f64, radius: f64, sides: usize) -> Vec<[f64; 2]> {
    (0..sides)
        .map(|i| {
            let angle = 2.0 * std::f64::consts::PI * i as f64 / sides as f64;
            [cx + radius * angle.cos(), cy + radius * angle.sin()]
        })
        .collect()
}

/// Square of side `size` whose nearest edge sits `distance` pixels to the
/// right of `(cx, cy)`, vertically centred on it.
///
/// The nearest point of the square to the centre is exactly `distance` away.
pub fn square_at_distance(cx: f64, cy: f64, distance: f64, size: f64) -> Vec<[f64; 2]> {
    let h = size / 2.0;
    rect_ring(cx + distance, cy - h, cx + distance + size, cy + h)
}

/// Shoelace area of a ring, for checking expected values.
pub fn ring_area(ring: &[[f64; 2]]) -> f64 {
    let n = ring.len();
    if n < 3 {
        return 0.0;
    }
    let twice: f64 = (0..n)
        .map(|i| {
            let [x1, y1] = ring[i];
            let [x2, y2] = ring[(i + 1) % n];
            x1 * y2 - x2 * y1
        })
        .sum();
    twice.abs() / 2.0
}
