//! Planar geometry shared by both engines.

/// Anything with a 2-D coordinate.
pub trait Position {
    /// Horizontal coordinate.
    fn x(&self) -> f64;
    /// Vertical coordinate.
    fn y(&self) -> f64;
}

impl Position for (f64, f64) {
    fn x(&self) -> f64 {
        self.0
    }

    fn y(&self) -> f64 {
        self.1
    }
}

/// Euclidean distance between two positions.
#[inline]
pub fn distance<A: Position + ?Sized, B: Position + ?Sized>(a: &A, b: &B) -> f64 {
    let dx = a.x() - b.x();
    let dy = a.y() - b.y();
    (dx * dx + dy * dy).sqrt()
}
