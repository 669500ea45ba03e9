/// A closed range of ray parameters or coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Interval {
    pub min: f32,
    pub max: f32,
}

impl Interval {
    pub const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    pub fn size(&self) -> f32 {
        self.max - self.min
    }

    pub fn clamp(&self, x: f32) -> f32 {
        x.clamp(self.min, self.max)
    }

    /// Grow by `delta` in total, half on each side.
    pub fn expand(&self, delta: f32) -> Interval {
        let padding = delta / 2.0;
        Interval::new(self.min - padding, self.max + padding)
    }

    /// Shift both ends by `displacement`.
    pub fn add_scalar(&self, displacement: f32) -> Interval {
        Interval::new(self.min + displacement, self.max + displacement)
    }

    /// Smallest interval covering both `a` and `b`.
    pub fn surrounding(a: &Interval, b: &Interval) -> Interval {
        Interval::new(a.min.min(b.min), a.max.max(b.max))
    }

    /// Neutral element of [`Interval::surrounding`].
    pub const EMPTY: Interval = Interval {
        min: f32::INFINITY,
        max: f32::NEG_INFINITY,
    };

    /// Displayable range of a color channel.
    pub const UNIT: Interval = Interval { min: 0.0, max: 1.0 };
}
