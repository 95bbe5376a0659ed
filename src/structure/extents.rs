use glam::Vec3;

use super::StructureRegistry;

/// Scene-wide bounding box, center, and length scale.
///
/// Derived from the registry after every membership change; never mutated
/// independently.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GlobalExtents {
    length_scale: f32,
    bbox_min: Vec3,
    bbox_max: Vec3,
    center: Vec3,
}

impl Default for GlobalExtents {
    fn default() -> Self {
        Self::fold(std::iter::empty())
    }
}

impl GlobalExtents {
    /// Fold per-structure `(length_scale, (min, max))` pairs.
    ///
    /// Length scales fold by max, boxes component-wise. A non-finite folded
    /// box becomes the unit box `[-1, 1]^3`, and a folded length scale of
    /// exactly zero becomes that box's diagonal.
    #[must_use]
    pub fn fold(items: impl IntoIterator<Item = (f32, (Vec3, Vec3))>) -> Self {
        let mut length_scale = 0.0_f32;
        let mut bbox_min = Vec3::splat(f32::INFINITY);
        let mut bbox_max = Vec3::splat(f32::NEG_INFINITY);

        for (scale, (lo, hi)) in items {
            length_scale = length_scale.max(scale);
            bbox_min = bbox_min.min(lo);
            bbox_max = bbox_max.max(hi);
        }

        if !bbox_min.is_finite() || !bbox_max.is_finite() {
            bbox_min = Vec3::NEG_ONE;
            bbox_max = Vec3::ONE;
        }

        if length_scale == 0.0 {
            length_scale = (bbox_max - bbox_min).length();
        }

        Self {
            length_scale,
            bbox_min,
            bbox_max,
            center: (bbox_min + bbox_max) * 0.5,
        }
    }

    /// Extents of everything currently in `registry`.
    #[must_use]
    pub fn from_registry(registry: &StructureRegistry) -> Self {
        Self::fold(
            registry
                .iter()
                .map(|s| (s.length_scale(), s.bounding_box())),
        )
    }

    /// Characteristic scene size.
    #[must_use]
    pub fn length_scale(&self) -> f32 {
        self.length_scale
    }

    /// Scene bounds as `(min, max)`.
    #[must_use]
    pub fn bounding_box(&self) -> (Vec3, Vec3) {
        (self.bbox_min, self.bbox_max)
    }

    /// Midpoint of the bounding box.
    #[must_use]
    pub fn center(&self) -> Vec3 {
        self.center
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::structure::test_structure::Dummy;

    #[test]
    fn empty_scene_uses_unit_box_diagonal() {
        let ext = GlobalExtents::default();
        assert_eq!(ext.bounding_box(), (Vec3::NEG_ONE, Vec3::ONE));
        assert!((ext.length_scale() - 2.0 * 3.0_f32.sqrt()).abs() < 1e-6);
        assert_eq!(ext.center(), Vec3::ZERO);
    }

    #[test]
    fn folds_max_scale_and_componentwise_box() {
        let ext = GlobalExtents::fold([
            (2.0, (Vec3::new(0.0, -1.0, 0.0), Vec3::new(1.0, 1.0, 1.0))),
            (5.0, (Vec3::new(-3.0, 0.0, 0.5), Vec3::new(0.0, 4.0, 2.0))),
        ]);
        assert_eq!(ext.length_scale(), 5.0);
        assert_eq!(
            ext.bounding_box(),
            (Vec3::new(-3.0, -1.0, 0.0), Vec3::new(1.0, 4.0, 2.0))
        );
        assert_eq!(ext.center(), Vec3::new(-1.0, 1.5, 1.0));
    }

    #[test]
    fn zero_scale_falls_back_to_box_diagonal() {
        let ext = GlobalExtents::fold([(
            0.0,
            (Vec3::ZERO, Vec3::new(3.0, 4.0, 0.0)),
        )]);
        assert_eq!(ext.length_scale(), 5.0);
    }

    #[test]
    fn non_finite_box_becomes_unit_box() {
        let ext = GlobalExtents::fold([(
            1.0,
            (Vec3::splat(f32::NEG_INFINITY), Vec3::ONE),
        )]);
        assert_eq!(ext.bounding_box(), (Vec3::NEG_ONE, Vec3::ONE));
        assert_eq!(ext.length_scale(), 1.0);
    }

    #[test]
    fn structures_without_bounds_do_not_disturb_finite_ones() {
        let mut registry = StructureRegistry::new();
        let _ = registry
            .insert(Dummy::new("Points", "empty").boxed())
            .unwrap();
        let _ = registry
            .insert(
                Dummy::new("Points", "full")
                    .with_bounds(Vec3::ZERO, Vec3::splat(2.0))
                    .with_scale(0.5)
                    .boxed(),
            )
            .unwrap();
        let ext = GlobalExtents::from_registry(&registry);
        assert_eq!(ext.bounding_box(), (Vec3::ZERO, Vec3::splat(2.0)));
        assert_eq!(ext.center(), Vec3::ONE);
        assert_eq!(ext.length_scale(), 0.5);
    }
}
