/// 2D collision geometry: oriented boxes and axis-aligned boxes.
///
/// `OrientedBox` is the transform of every simulated entity and the shape
/// used for narrow-phase tests. `AABB` is the broad-phase volume and the
/// region type of spatial partitioner nodes.
///
/// The two types use different tie-breaking rules: AABB
/// overlap is inclusive (touching intersects), oriented-box SAT overlap is
/// strict (touching does not).

use glam::Vec2;

/// Unit square corners in local space, counter-clockwise from bottom-left.
const UNIT_CORNERS: [Vec2; 4] = [
    Vec2::new(-0.5, -0.5),
    Vec2::new(0.5, -0.5),
    Vec2::new(0.5, 0.5),
    Vec2::new(-0.5, 0.5),
];

// ===== AABB =====

/// Axis-Aligned Bounding Box stored as centre + size.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct AABB {
    /// Centre point
    pub position: Vec2,
    /// Full extent along each axis
    pub size: Vec2,
}

impl AABB {
    pub fn new(position: Vec2, size: Vec2) -> Self {
        Self { position, size }
    }

    /// Build from explicit corners.
    pub fn from_min_max(min: Vec2, max: Vec2) -> Self {
        Self {
            position: (min + max) * 0.5,
            size: max - min,
        }
    }

    /// Square region enclosing a circle.
    pub fn from_circle(position: Vec2, radius: f32) -> Self {
        Self {
            position,
            size: Vec2::splat(radius * 2.0),
        }
    }

    pub fn min(&self) -> Vec2 {
        self.position - self.size * 0.5
    }

    pub fn max(&self) -> Vec2 {
        self.position + self.size * 0.5
    }

    pub fn center(&self) -> Vec2 {
        self.position
    }

    /// True when every component is finite (NaN/inf boxes are un-queryable).
    pub fn is_finite(&self) -> bool {
        self.position.is_finite() && self.size.is_finite()
    }

    /// Inclusive overlap test: boxes sharing an edge intersect.
    ///
    /// Any NaN component makes the result `false`.
    pub fn intersects_aabb(&self, other: &AABB) -> bool {
        let (a_min, a_max) = (self.min(), self.max());
        let (b_min, b_max) = (other.min(), other.max());
        a_min.x <= b_max.x && a_max.x >= b_min.x
            && a_min.y <= b_max.y && a_max.y >= b_min.y
    }

    /// Inclusive point containment.
    pub fn contains_point(&self, point: Vec2) -> bool {
        let (min, max) = (self.min(), self.max());
        point.x >= min.x && point.x <= max.x && point.y >= min.y && point.y <= max.y
    }

    /// One quarter of this region.
    ///
    /// Quadrant bit layout: bit0 = X, bit1 = Y (0 = low half, 1 = high half).
    pub fn quadrant(&self, quadrant: usize) -> AABB {
        let quarter = self.size * 0.25;
        let sign = Vec2::new(
            if quadrant & 1 == 0 { -1.0 } else { 1.0 },
            if quadrant & 2 == 0 { -1.0 } else { 1.0 },
        );
        AABB {
            position: self.position + quarter * sign,
            size: self.size * 0.5,
        }
    }
}

// ===== ORIENTED BOX =====

/// Oriented rectangle: pivot position, size, rotation and normalized origin.
///
/// `origin` is a fraction of `size` that moves the shape relative to its
/// pivot: `(0, 0)` centres the rectangle on `position`, `(-1, -1)` puts the
/// pivot on the bottom-left corner. Rotation is applied around the pivot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrientedBox {
    pub position: Vec2,
    pub size: Vec2,
    /// Radians, counter-clockwise
    pub rotation: f32,
    pub origin: Vec2,
}

impl Default for OrientedBox {
    fn default() -> Self {
        Self::new(Vec2::ZERO, Vec2::ONE)
    }
}

impl OrientedBox {
    /// Unrotated box centred on `position`.
    pub fn new(position: Vec2, size: Vec2) -> Self {
        Self {
            position,
            size,
            rotation: 0.0,
            origin: Vec2::ZERO,
        }
    }

    pub fn with_rotation(mut self, rotation: f32) -> Self {
        self.rotation = rotation;
        self
    }

    pub fn with_origin(mut self, origin: Vec2) -> Self {
        self.origin = origin;
        self
    }

    /// Offset from the pivot to the geometric centre, before rotation.
    fn local_center_offset(&self) -> Vec2 {
        -(self.size * self.origin) * 0.5
    }

    /// World-space geometric centre.
    pub fn center(&self) -> Vec2 {
        self.position + Vec2::from_angle(self.rotation).rotate(self.local_center_offset())
    }

    /// The four corners, counter-clockwise starting at the local bottom-left.
    pub fn vertices(&self) -> [Vec2; 4] {
        let rotation = Vec2::from_angle(self.rotation);
        UNIT_CORNERS.map(|corner| {
            self.position + rotation.rotate((corner - self.origin * 0.5) * self.size)
        })
    }

    /// Smallest AABB enclosing the rotated corners.
    pub fn bounding_aabb(&self) -> AABB {
        let vertices = self.vertices();
        let mut min = vertices[0];
        let mut max = vertices[0];
        for v in &vertices[1..] {
            min = min.min(*v);
            max = max.max(*v);
        }
        AABB::from_min_max(min, max)
    }

    /// Point in the unrotated frame of this box, relative to its centre.
    fn to_local(&self, point: Vec2) -> Vec2 {
        Vec2::from_angle(-self.rotation).rotate(point - self.center())
    }

    fn half_extents(&self) -> Vec2 {
        self.size.abs() * 0.5
    }

    /// Inclusive containment test in the box's local frame.
    pub fn intersects_point(&self, point: Vec2) -> bool {
        let local = self.to_local(point);
        let half = self.half_extents();
        local.x.abs() <= half.x && local.y.abs() <= half.y
    }

    /// Closest-point test: clamp the circle centre to the box, compare squared distances.
    pub fn intersects_circle(&self, position: Vec2, radius: f32) -> bool {
        let local = self.to_local(position);
        let half = self.half_extents();
        let closest = local.max(-half).min(half);
        (local - closest).length_squared() <= radius * radius
    }

    /// Separating-axis test against another oriented box.
    ///
    /// Every edge normal of both boxes is tried. Intervals must overlap
    /// strictly on every axis, so boxes that only touch do not intersect and
    /// zero-area boxes never intersect anything.
    pub fn intersects_box(&self, other: &OrientedBox) -> bool {
        let a = self.vertices();
        let b = other.vertices();

        for vertices in [&a, &b] {
            for i in 0..4 {
                let axis = (vertices[(i + 1) % 4] - vertices[i]).perp();
                let (a_min, a_max) = project(&a, axis);
                let (b_min, b_max) = project(&b, axis);
                if !(a_min < b_max && b_min < a_max) {
                    return false;
                }
            }
        }

        true
    }
}

/// Project a vertex set onto an (unnormalized) axis.
fn project(vertices: &[Vec2; 4], axis: Vec2) -> (f32, f32) {
    let mut min = f32::INFINITY;
    let mut max = f32::NEG_INFINITY;
    for v in vertices {
        let d = v.dot(axis);
        min = min.min(d);
        max = max.max(d);
    }
    (min, max)
}

#[cfg(test)]
#[path = "geometry_tests.rs"]
mod tests;
