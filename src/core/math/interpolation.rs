use nalgebra::{Point2, Vector2, Vector3};

const EPSILON: f32 = 1e-5;

/// Tolerance of the "weights sum to one" consistency check.
pub const WEIGHT_SUM_TOLERANCE: f32 = 1e-2;

/// z-component of the 2D cross product `edge x to_point`.
///
/// Non-negative when `to_point` lies on the inner side of `edge` for
/// triangles with positive signed area in screen space (y pointing down).
#[inline(always)]
pub fn edge_function(edge: Vector2<f32>, to_point: Vector2<f32>) -> f32 {
    edge.x * to_point.y - edge.y * to_point.x
}

/// Twice the signed screen-space area of triangle (v0, v1, v2).
#[inline(always)]
pub fn signed_area_x2(v0: Point2<f32>, v1: Point2<f32>, v2: Point2<f32>) -> f32 {
    edge_function(v1 - v0, v2 - v0)
}

/// `1 / signed_area_x2`, or `None` for degenerate and back-facing triangles
/// (doubled area below a small epsilon).
#[inline]
pub fn inverse_area_x2(v0: Point2<f32>, v1: Point2<f32>, v2: Point2<f32>) -> Option<f32> {
    let area_x2 = signed_area_x2(v0, v1, v2);
    (area_x2 >= EPSILON).then(|| 1.0 / area_x2)
}

/// Computes the barycentric weights of `p` with respect to (v0, v1, v2) from
/// the three edge functions.
///
/// Each weight belongs to the vertex opposite the edge it is measured on:
/// - x: weight of v0 (edge v1 -> v2)
/// - y: weight of v1 (edge v2 -> v0)
/// - z: weight of v2 (edge v0 -> v1)
///
/// `inv_area_x2` comes from [`inverse_area_x2`] on the same triangle.
/// Returns `None` if the point is outside (any edge value negative).
pub fn barycentric_weights(
    p: Point2<f32>,
    [v0, v1, v2]: &[Point2<f32>; 3],
    inv_area_x2: f32,
) -> Option<Vector3<f32>> {
    let e0 = edge_function(v2 - v1, p - v1);
    if e0 < 0.0 {
        return None;
    }
    let e1 = edge_function(v0 - v2, p - v2);
    if e1 < 0.0 {
        return None;
    }
    let e2 = edge_function(v1 - v0, p - v0);
    if e2 < 0.0 {
        return None;
    }

    Some(Vector3::new(e0, e1, e2) * inv_area_x2)
}

/// Perspective-correct depth: `1 / (w0/z0 + w1/z1 + w2/z2)`, where `z_i` is
/// each vertex's view-space depth (clip-space w).
///
/// Returns `None` when the result would not be finite.
#[inline]
pub fn perspective_correct_depth(bary: Vector3<f32>, view_depths: [f32; 3]) -> Option<f32> {
    let sum = bary.x / view_depths[0] + bary.y / view_depths[1] + bary.z / view_depths[2];
    if !sum.is_finite() || sum.abs() < EPSILON {
        return None;
    }
    let depth = 1.0 / sum;
    depth.is_finite().then_some(depth)
}

/// Weights that turn `depth * sum(attr_i * w_i / z_i)` into a plain weighted
/// sum `sum(attr_i * c_i)`, with `c_i = depth * w_i / z_i`.
#[inline]
pub fn perspective_correct_weights(
    bary: Vector3<f32>,
    view_depths: [f32; 3],
    depth: f32,
) -> Vector3<f32> {
    Vector3::new(
        depth * bary.x / view_depths[0],
        depth * bary.y / view_depths[1],
        depth * bary.z / view_depths[2],
    )
}

/// Whether the weights satisfy the partition-of-unity invariant.
#[inline(always)]
pub fn weights_sum_to_one(bary: Vector3<f32>) -> bool {
    (bary.x + bary.y + bary.z - 1.0).abs() <= WEIGHT_SUM_TOLERANCE
}

#[cfg(test)]
mod tests {
    use super::*;

    // Positive area in a y-down screen: top, bottom-right, bottom-left.
    fn triangle() -> [Point2<f32>; 3] {
        [
            Point2::new(50.0, 10.0),
            Point2::new(90.0, 90.0),
            Point2::new(10.0, 90.0),
        ]
    }

    fn weights(p: Point2<f32>, tri: &[Point2<f32>; 3]) -> Option<Vector3<f32>> {
        let inv = inverse_area_x2(tri[0], tri[1], tri[2])?;
        barycentric_weights(p, tri, inv)
    }

    #[test]
    fn weights_at_vertices_select_that_vertex() {
        let t = triangle();
        let w = weights(t[0], &t).unwrap();
        assert!((w.x - 1.0).abs() < 1e-5 && w.y.abs() < 1e-5 && w.z.abs() < 1e-5);
        let w = weights(t[2], &t).unwrap();
        assert!((w.z - 1.0).abs() < 1e-5);
    }

    #[test]
    fn interior_weights_sum_to_one() {
        let t = triangle();
        for y in 10..90 {
            for x in 10..90 {
                let p = Point2::new(x as f32 + 0.5, y as f32 + 0.5);
                if let Some(w) = weights(p, &t) {
                    assert!(weights_sum_to_one(w), "weights {:?} at {:?}", w, p);
                    assert!(w.min() >= 0.0);
                }
            }
        }
    }

    #[test]
    fn outside_points_are_rejected() {
        let t = triangle();
        assert!(weights(Point2::new(5.0, 5.0), &t).is_none());
        assert!(weights(Point2::new(50.0, 95.0), &t).is_none());
    }

    #[test]
    fn reversed_winding_has_no_inverse_area() {
        let [v0, v1, v2] = triangle();
        let centroid = Point2::new(50.0, 63.0);
        assert!(weights(centroid, &[v0, v1, v2]).is_some());
        assert!(inverse_area_x2(v0, v2, v1).is_none());
    }

    #[test]
    fn zero_area_triangle_is_skipped() {
        let a = Point2::new(0.0, 0.0);
        let b = Point2::new(10.0, 10.0);
        let c = Point2::new(20.0, 20.0);
        assert!(inverse_area_x2(a, b, c).is_none());
    }

    #[test]
    fn inverse_area_matches_doubled_area() {
        let [v0, v1, v2] = triangle();
        // Base 80, height 80: doubled area 6400.
        let inv = inverse_area_x2(v0, v1, v2).unwrap();
        assert!((inv * 6400.0 - 1.0).abs() < 1e-5);
    }

    #[test]
    fn equal_depths_interpolate_to_that_depth() {
        let bary = Vector3::new(0.2, 0.3, 0.5);
        let depth = perspective_correct_depth(bary, [4.0, 4.0, 4.0]).unwrap();
        assert!((depth - 4.0).abs() < 1e-5);

        let c = perspective_correct_weights(bary, [4.0, 4.0, 4.0], depth);
        assert!((c - bary).norm() < 1e-5);
    }

    #[test]
    fn nearer_vertices_dominate_corrected_weights() {
        let bary = Vector3::new(0.5, 0.5, 0.0);
        let depth = perspective_correct_depth(bary, [1.0, 3.0, 2.0]).unwrap();
        // Harmonic mean of 1 and 3.
        assert!((depth - 1.5).abs() < 1e-5);

        let c = perspective_correct_weights(bary, [1.0, 3.0, 2.0], depth);
        assert!(c.x > c.y);
        assert!((c.x + c.y + c.z - 1.0).abs() < 1e-5);
    }
}
