use std::{f64::consts::PI, ops};

pub trait Point: Copy + Sized + IntoIterator<Item = f64> {
    /// Calculate the magnitude of the vector.
    fn mag(self) -> f64 {
        self.into_iter()
            .zip(self)
            .map(|(a, b)| a * b)
            .sum::<f64>()
            .sqrt()
    }

    /// Subtract each dimension of `rhs`.
    fn sub(self, rhs: Self) -> Self {
        self.xfm(rhs, ops::Sub::sub)
    }

    /// Perform a transformation on each pair of dimensions.
    fn xfm<F: Fn(f64, f64) -> f64>(self, b: Self, f: F) -> Self;
}

/// 3D Point (X,Y,Z).
pub type Point3 = [f64; 3];

impl Point for Point3 {
    fn xfm<F: Fn(f64, f64) -> f64>(self, b: Self, f: F) -> Self {
        let [ax, ay, az] = self;
        let [bx, by, bz] = b;
        [f(ax, bx), f(ay, by), f(az, bz)]
    }
}

pub fn dot_prod(a: Point3, b: Point3) -> f64 {
    a.into_iter().zip(b).map(|(a, b)| a * b).sum()
}

#[allow(clippy::many_single_char_names)]
pub fn xprod(a: Point3, b: Point3) -> Point3 {
    let [ax, ay, az] = a;
    let [bx, by, bz] = b;
    let x = ay * bz - az * by;
    let y = az * bx - ax * bz;
    let z = ax * by - ay * bx;
    [x, y, z]
}

/// The vector travelling from `from` to `to`.
pub fn vector_to(from: Point3, to: Point3) -> Point3 {
    to.sub(from)
}

/// The unsigned angle between two vectors, in `[0, π]`.
///
/// Returns `None` if either vector has zero length since the angle is undefined.
/// Uses `atan2(|a × b|, a · b)` which stays accurate for near-parallel vectors where an
/// `acos` formulation loses precision.
pub fn angle_between(a: Point3, b: Point3) -> Option<f64> {
    if a.mag() == 0.0 || b.mag() == 0.0 {
        return None;
    }

    Some(xprod(a, b).mag().atan2(dot_prod(a, b)))
}

/// Fold an angle above π back by a single turn.
///
/// Only the upper side is wrapped, angles below -π are returned unchanged.
pub fn wrap_angle(angle: f64) -> f64 {
    if angle > PI {
        angle - PI * 2.0
    } else {
        angle
    }
}

/// Test if two points are coincident.
///
/// A `tolerance` of zero (or less) is _exact_ value equality, otherwise each dimension must be
/// within `tolerance` of the other.
#[allow(clippy::float_cmp)]
pub fn coincident(a: Point3, b: Point3, tolerance: f64) -> bool {
    if tolerance > 0.0 {
        a.xfm(b, |a, b| (a - b).abs())
            .into_iter()
            .all(|f| f <= tolerance)
    } else {
        a == b
    }
}
