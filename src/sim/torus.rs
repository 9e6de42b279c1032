//! Geometry on the wrapped canvas
//!
//! The playfield is a torus: leaving one edge re-enters from the opposite one.
//! Chasers reason about the shortest way around by looking at the four
//! reflections of a target shifted by one canvas width or height.

use glam::Vec2;

use super::state::Arena;

/// Euclidean distance (not wrap-aware)
#[inline]
pub fn distance(a: Vec2, b: Vec2) -> f32 {
    (a - b).length()
}

/// Angle of the vector from `from` to `to`
#[inline]
pub fn angle_to(from: Vec2, to: Vec2) -> f32 {
    let d = to - from;
    d.y.atan2(d.x)
}

/// Unit vector for an angle.
///
/// Components within float noise of zero are snapped so cardinal headings
/// move exactly along one axis (cos(-π/2) is not 0.0 in f32).
#[inline]
pub fn heading(angle: f32) -> Vec2 {
    let snap = |v: f32| if v.abs() < 1e-6 { 0.0 } else { v };
    Vec2::new(snap(angle.cos()), snap(angle.sin()))
}

/// Wrap a point that left the canvas onto the opposite edge.
///
/// Matches the arcade behaviour: the point jumps exactly to the far edge
/// rather than keeping the overshoot.
pub fn wrap_point(p: Vec2, arena: &Arena) -> Vec2 {
    let mut out = p;
    if out.x < 0.0 {
        out.x = arena.width;
    } else if out.x > arena.width {
        out.x = 0.0;
    }
    if out.y < 0.0 {
        out.y = arena.height;
    } else if out.y > arena.height {
        out.y = 0.0;
    }
    out
}

/// The point itself plus its four reflections across the canvas.
pub fn reflections(p: Vec2, arena: &Arena) -> [Vec2; 5] {
    [
        p,
        p + Vec2::new(arena.width, 0.0),
        p - Vec2::new(arena.width, 0.0),
        p + Vec2::new(0.0, arena.height),
        p - Vec2::new(0.0, arena.height),
    ]
}

/// Nearest of the five reflections of `target` as seen from `from`.
pub fn nearest_reflection(from: Vec2, target: Vec2, arena: &Arena) -> (Vec2, f32) {
    reflections(target, arena)
        .into_iter()
        .map(|p| (p, distance(from, p)))
        .fold((target, f32::INFINITY), |best, cand| {
            if cand.1 < best.1 { cand } else { best }
        })
}

/// Shortest distance between two points on the torus
pub fn wrapped_distance(a: Vec2, b: Vec2, arena: &Arena) -> f32 {
    let mut d = (a - b).abs();
    if d.x > arena.width / 2.0 {
        d.x = arena.width - d.x;
    }
    if d.y > arena.height / 2.0 {
        d.y = arena.height - d.y;
    }
    d.length()
}

/// Strict overlap of two axis-aligned squares given centers and side lengths
pub fn aabb_overlap(a: Vec2, a_size: f32, b: Vec2, b_size: f32) -> bool {
    let ha = a_size / 2.0;
    let hb = b_size / 2.0;
    a.x + ha > b.x - hb && a.x - ha < b.x + hb && a.y + ha > b.y - hb && a.y - ha < b.y + hb
}

/// Two circles (given by diameters) are closer than their summed radii
#[inline]
pub fn circles_touch(a: Vec2, a_size: f32, b: Vec2, b_size: f32) -> bool {
    distance(a, b) < a_size / 2.0 + b_size / 2.0
}
