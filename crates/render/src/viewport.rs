use glam::DVec2;
use relay_common::GridPoint;

/// Margin kept free around the fitted points, in screen units.
pub const DEFAULT_PADDING: f64 = 50.0;

/// Scale used when the fitted one is not finite and positive.
pub const FALLBACK_SCALE: f64 = 0.0001;

/// Extent assumed along an axis where every point shares one coordinate.
const DEGENERATE_EXTENT: f64 = 1000.0;

/// Maps grid coordinates onto a screen with `+y` pointing down.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub scale: f64,
    pub offset: DVec2,
    pub size: DVec2,
}

impl Viewport {
    /// Fit the bounding box of `positions` into a `size` screen, centered,
    /// leaving `padding` on every side.
    ///
    /// A zero extent on an axis (one point, or all points in a line) is
    /// treated as 1000 units wide. If the resulting scale is still unusable,
    /// for instance because the padding eats the whole screen, it falls back
    /// to [`FALLBACK_SCALE`].
    pub fn fit<I>(positions: I, size: DVec2, padding: f64) -> Self
    where
        I: IntoIterator<Item = GridPoint>,
    {
        let mut bounds: Option<(DVec2, DVec2)> = None;
        for p in positions {
            let p = p.as_dvec2();
            bounds = Some(match bounds {
                Some((min, max)) => (min.min(p), max.max(p)),
                None => (p, p),
            });
        }
        let (min, max) = bounds.unwrap_or((DVec2::ZERO, DVec2::ZERO));

        let extent = max - min;
        let world = DVec2::new(
            if extent.x == 0.0 { DEGENERATE_EXTENT } else { extent.x },
            if extent.y == 0.0 { DEGENERATE_EXTENT } else { extent.y },
        );
        let usable = size - DVec2::splat(padding * 2.0);
        let mut scale = (usable.x / world.x).min(usable.y / world.y);
        if !scale.is_finite() || scale <= 0.0 {
            tracing::debug!(scale, "degenerate viewport scale, using fallback");
            scale = FALLBACK_SCALE;
        }

        let center = (min + max) / 2.0;
        Self {
            scale,
            offset: size / 2.0 - center * scale,
            size,
        }
    }

    /// Screen position of a grid point. Screen `y` grows downward.
    pub fn to_screen(&self, point: GridPoint) -> DVec2 {
        let p = self.offset + point.as_dvec2() * self.scale;
        DVec2::new(p.x, self.size.y - p.y)
    }
}
