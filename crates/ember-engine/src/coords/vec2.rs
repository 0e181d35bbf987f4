use core::ops::{Add, AddAssign, Div, Mul, MulAssign, Neg, Sub, SubAssign};

/// 2D vector used for simulation state and normalized device coordinates.
#[repr(C)]
#[derive(Debug, Copy, Clone, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    #[inline]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Vector with both components set to `v`.
    #[inline]
    pub const fn splat(v: f32) -> Self {
        Self { x: v, y: v }
    }

    #[inline]
    pub const fn zero() -> Self {
        Self { x: 0.0, y: 0.0 }
    }

    #[inline]
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    #[inline]
    pub fn dot(self, rhs: Vec2) -> f32 {
        self.x * rhs.x + self.y * rhs.y
    }

    #[inline]
    pub fn length(self) -> f32 {
        self.dot(self).sqrt()
    }

    /// Returns the unit vector in the same direction.
    ///
    /// Vectors shorter than `f32::EPSILON` normalize to zero instead of NaN.
    pub fn normalize(self) -> Vec2 {
        let len = self.length();
        if len < f32::EPSILON {
            return Vec2::zero();
        }
        self * (1.0 / len)
    }
}

impl Add for Vec2 {
    type Output = Vec2;
    #[inline]
    fn add(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl AddAssign for Vec2 {
    #[inline]
    fn add_assign(&mut self, rhs: Vec2) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl Sub for Vec2 {
    type Output = Vec2;
    #[inline]
    fn sub(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl SubAssign for Vec2 {
    #[inline]
    fn sub_assign(&mut self, rhs: Vec2) {
        self.x -= rhs.x;
        self.y -= rhs.y;
    }
}

/// Component-wise product.
impl Mul for Vec2 {
    type Output = Vec2;
    #[inline]
    fn mul(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x * rhs.x, self.y * rhs.y)
    }
}

impl MulAssign for Vec2 {
    #[inline]
    fn mul_assign(&mut self, rhs: Vec2) {
        self.x *= rhs.x;
        self.y *= rhs.y;
    }
}

impl Mul<f32> for Vec2 {
    type Output = Vec2;
    #[inline]
    fn mul(self, rhs: f32) -> Vec2 {
        Vec2::new(self.x * rhs, self.y * rhs)
    }
}

impl Mul<Vec2> for f32 {
    type Output = Vec2;
    #[inline]
    fn mul(self, rhs: Vec2) -> Vec2 {
        rhs * self
    }
}

impl MulAssign<f32> for Vec2 {
    #[inline]
    fn mul_assign(&mut self, rhs: f32) {
        self.x *= rhs;
        self.y *= rhs;
    }
}

impl Div<f32> for Vec2 {
    type Output = Vec2;
    #[inline]
    fn div(self, rhs: f32) -> Vec2 {
        Vec2::new(self.x / rhs, self.y / rhs)
    }
}

impl Neg for Vec2 {
    type Output = Vec2;
    #[inline]
    fn neg(self) -> Vec2 {
        Vec2::new(-self.x, -self.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(x: f32, y: f32) -> Vec2 { Vec2::new(x, y) }

    // ── arithmetic ────────────────────────────────────────────────────────

    #[test]
    fn add_and_add_assign_agree() {
        let mut a = v(1.0, 2.0);
        let b = v(0.5, -4.0);
        let sum = a + b;
        a += b;
        assert_eq!(a, sum);
        assert_eq!(sum, v(1.5, -2.0));
    }

    #[test]
    fn mul_is_component_wise() {
        assert_eq!(v(2.0, 3.0) * v(4.0, -1.0), v(8.0, -3.0));
    }

    #[test]
    fn scalar_mul_commutes() {
        assert_eq!(v(1.0, -2.0) * 3.0, 3.0 * v(1.0, -2.0));
    }

    #[test]
    fn neg_flips_both_components() {
        assert_eq!(-v(1.0, -2.0), v(-1.0, 2.0));
    }

    #[test]
    fn splat_fills_both_components() {
        assert_eq!(Vec2::splat(0.25), v(0.25, 0.25));
    }

    // ── dot / normalize ───────────────────────────────────────────────────

    #[test]
    fn dot_of_orthogonal_is_zero() {
        assert_eq!(v(1.0, 0.0).dot(v(0.0, 5.0)), 0.0);
    }

    #[test]
    fn normalize_produces_unit_length() {
        let n = v(3.0, 4.0).normalize();
        assert!((n.length() - 1.0).abs() < 1e-6);
        assert!((n.x - 0.6).abs() < 1e-6);
        assert!((n.y - 0.8).abs() < 1e-6);
    }

    #[test]
    fn normalize_zero_is_zero() {
        assert_eq!(Vec2::zero().normalize(), Vec2::zero());
    }

    #[test]
    fn normalize_below_epsilon_is_zero() {
        let tiny = v(f32::EPSILON * 0.25, 0.0);
        assert_eq!(tiny.normalize(), Vec2::zero());
    }
}
