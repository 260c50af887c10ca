use glam::{Vec2, Vec3};

/// Axis-Aligned Bounding Box in f32 world space (meters).
///
/// Invariant: min.x <= max.x, min.y <= max.y, min.z <= max.z.
/// The constructor enforces this by swapping components if needed.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    /// Create an AABB from two corners. Automatically sorts
    /// components so that min <= max on every axis.
    pub fn new(a: Vec3, b: Vec3) -> Self {
        Self {
            min: a.min(b),
            max: a.max(b),
        }
    }

    /// Create an AABB from a center point and half-extents.
    ///
    /// Negative half-extents are folded to their absolute value so the
    /// ordering invariant holds for any input.
    pub fn from_center_half_extents(center: Vec3, half: Vec3) -> Self {
        let half = half.abs();
        Self {
            min: center - half,
            max: center + half,
        }
    }

    /// Returns the center point of the AABB.
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    /// Returns the size along each axis.
    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    /// Returns a copy moved by `offset`.
    pub fn translated(&self, offset: Vec3) -> Aabb {
        Aabb {
            min: self.min + offset,
            max: self.max + offset,
        }
    }

    /// Returns true if the vertical span `[y_min, y_max]` overlaps this box
    /// (touching counts as overlap).
    pub fn overlaps_y(&self, y_min: f32, y_max: f32) -> bool {
        y_max >= self.min.y && y_min <= self.max.y
    }

    /// Returns true if `p` lies strictly inside the XZ footprint.
    /// Points on the footprint boundary are outside.
    pub fn contains_xz_strict(&self, p: Vec3) -> bool {
        p.x > self.min.x && p.x < self.max.x && p.z > self.min.z && p.z < self.max.z
    }

    /// Closest point of the XZ footprint to `p`, as `(x, z)`.
    pub fn closest_point_xz(&self, p: Vec3) -> Vec2 {
        Vec2::new(
            p.x.clamp(self.min.x, self.max.x),
            p.z.clamp(self.min.z, self.max.z),
        )
    }

    /// Distance from `p` to the XZ footprint. Zero when `p` is inside it.
    pub fn distance_xz(&self, p: Vec3) -> f32 {
        (Vec2::new(p.x, p.z) - self.closest_point_xz(p)).length()
    }

    /// Slab test against a ray.
    ///
    /// Returns the entry distance along `dir` and the outward normal of the
    /// face that was entered, or `None` if the ray misses, starts inside, or
    /// the entry lies beyond `max_distance`. `dir` need not be normalized;
    /// the returned distance is in units of `dir`.
    pub fn ray_intersect(&self, origin: Vec3, dir: Vec3, max_distance: f32) -> Option<(f32, Vec3)> {
        let mut t_enter = f32::NEG_INFINITY;
        let mut t_exit = f32::INFINITY;
        let mut normal = Vec3::ZERO;

        for axis in 0..3 {
            let o = origin[axis];
            let d = dir[axis];
            let (lo, hi) = (self.min[axis], self.max[axis]);

            if d.abs() < 1e-12 {
                if o < lo || o > hi {
                    return None;
                }
                continue;
            }

            let inv = 1.0 / d;
            let (mut t0, mut t1) = ((lo - o) * inv, (hi - o) * inv);
            let face = -d.signum();
            if t0 > t1 {
                std::mem::swap(&mut t0, &mut t1);
            }

            if t0 > t_enter {
                t_enter = t0;
                normal = Vec3::ZERO;
                normal[axis] = face;
            }
            t_exit = t_exit.min(t1);
            if t_enter > t_exit {
                return None;
            }
        }

        if t_enter < 0.0 || t_enter > max_distance {
            return None;
        }
        Some((t_enter, normal))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_box() -> Aabb {
        Aabb::new(Vec3::ZERO, Vec3::splat(10.0))
    }

    #[test]
    fn test_constructor_auto_sorts() {
        let aabb = Aabb::new(Vec3::splat(10.0), Vec3::ZERO);
        assert_eq!(aabb.min, Vec3::ZERO);
        assert_eq!(aabb.max, Vec3::splat(10.0));
    }

    #[test]
    fn test_from_center_half_extents() {
        let aabb = Aabb::from_center_half_extents(Vec3::splat(10.0), Vec3::splat(5.0));
        assert_eq!(aabb.min, Vec3::splat(5.0));
        assert_eq!(aabb.max, Vec3::splat(15.0));
        assert_eq!(aabb.center(), Vec3::splat(10.0));
        assert_eq!(aabb.size(), Vec3::splat(10.0));
    }

    #[test]
    fn test_negative_half_extents_are_folded() {
        let aabb = Aabb::from_center_half_extents(Vec3::ZERO, Vec3::new(-1.0, 2.0, -3.0));
        assert_eq!(aabb.min, Vec3::new(-1.0, -2.0, -3.0));
        assert_eq!(aabb.max, Vec3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn test_overlaps_y_touching() {
        let aabb = unit_box();
        assert!(aabb.overlaps_y(10.0, 12.0));
        assert!(aabb.overlaps_y(-2.0, 0.0));
        assert!(!aabb.overlaps_y(10.1, 12.0));
        assert!(!aabb.overlaps_y(-2.0, -0.1));
    }

    #[test]
    fn test_contains_xz_strict_excludes_boundary() {
        let aabb = unit_box();
        assert!(aabb.contains_xz_strict(Vec3::new(5.0, 100.0, 5.0)));
        assert!(!aabb.contains_xz_strict(Vec3::new(0.0, 5.0, 5.0)));
        assert!(!aabb.contains_xz_strict(Vec3::new(5.0, 5.0, 10.0)));
    }

    #[test]
    fn test_closest_point_xz_clamps() {
        let aabb = unit_box();
        let p = aabb.closest_point_xz(Vec3::new(-3.0, 0.0, 4.0));
        assert_eq!(p, Vec2::new(0.0, 4.0));
        assert!((aabb.distance_xz(Vec3::new(-3.0, 0.0, 4.0)) - 3.0).abs() < 1e-6);
        assert_eq!(aabb.distance_xz(Vec3::new(5.0, 0.0, 5.0)), 0.0);
    }

    #[test]
    fn test_ray_hits_near_face() {
        let aabb = unit_box();
        let hit = aabb.ray_intersect(Vec3::new(-5.0, 5.0, 5.0), Vec3::X, 100.0);
        let (t, n) = hit.expect("ray along +X should hit the -X face");
        assert!((t - 5.0).abs() < 1e-5);
        assert_eq!(n, Vec3::NEG_X);
    }

    #[test]
    fn test_ray_from_positive_side() {
        let aabb = unit_box();
        let (t, n) = aabb
            .ray_intersect(Vec3::new(5.0, 20.0, 5.0), Vec3::NEG_Y, 100.0)
            .unwrap();
        assert!((t - 10.0).abs() < 1e-5);
        assert_eq!(n, Vec3::Y);
    }

    #[test]
    fn test_ray_misses_and_range() {
        let aabb = unit_box();
        assert!(aabb.ray_intersect(Vec3::new(-5.0, 20.0, 5.0), Vec3::X, 100.0).is_none());
        assert!(aabb.ray_intersect(Vec3::new(-5.0, 5.0, 5.0), Vec3::NEG_X, 100.0).is_none());
        assert!(aabb.ray_intersect(Vec3::new(-5.0, 5.0, 5.0), Vec3::X, 4.0).is_none());
    }

    #[test]
    fn test_translated() {
        let aabb = unit_box().translated(Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(aabb.min, Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(aabb.max, Vec3::new(11.0, 12.0, 13.0));
    }
}
