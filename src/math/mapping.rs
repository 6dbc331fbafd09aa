use super::Real;

/// Squared escape radius shared by every engine
pub const ESCAPE_RADIUS_SQ: f64 = 100.0;

/// Linear screen → complex plane mapping, square pixels (`dy == dx`)
///
/// The origin and step are narrowed to `S` once; every pixel coordinate is
/// then `origin + index * step` evaluated in `S`, never accumulated, so any
/// engine or row band computes identical coordinates for the same pixel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlaneMapping<S> {
    pub left_x: S,
    pub bottom_y: S,
    pub step: S,
    pub width: usize,
    pub height: usize,
}

impl<S: Real> PlaneMapping<S> {
    pub fn new(width: u32, height: u32, center_x: f64, center_y: f64, scale: f64) -> Self {
        let left_x = center_x - f64::from(width) * scale / 2.0;
        let bottom_y = center_y - f64::from(height) * scale / 2.0;

        Self {
            left_x: S::from_f64(left_x),
            bottom_y: S::from_f64(bottom_y),
            step: S::from_f64(scale),
            width: width as usize,
            height: height as usize,
        }
    }

    #[inline(always)]
    pub fn x0(&self, ix: usize) -> S {
        self.left_x + S::from_index(ix) * self.step
    }

    #[inline(always)]
    pub fn y0(&self, iy: usize) -> S {
        self.bottom_y + S::from_index(iy) * self.step
    }

    pub fn point(&self, ix: usize, iy: usize) -> (S, S) {
        (self.x0(ix), self.y0(iy))
    }

    pub fn pixel_count(&self) -> usize {
        self.width * self.height
    }

    /// Right edge, `x0(width)`
    pub fn right_x(&self) -> S {
        self.x0(self.width)
    }

    /// Top edge, `y0(height)`
    pub fn top_y(&self) -> S {
        self.y0(self.height)
    }

    /// `step`, `width * step` and `height * step` are finite in `S`
    pub fn extent_is_finite(&self) -> bool {
        self.step.is_finite()
            && (S::from_index(self.width) * self.step).is_finite()
            && (S::from_index(self.height) * self.step).is_finite()
    }

    /// All four plane edges are finite in `S`
    ///
    /// With a finite extent every pixel coordinate lies between two finite
    /// edges, so no `x0`/`y0` can be infinite or NaN.
    pub fn edges_are_finite(&self) -> bool {
        [self.left_x, self.bottom_y, self.right_x(), self.top_y()]
            .into_iter()
            .all(Real::is_finite)
    }
}
