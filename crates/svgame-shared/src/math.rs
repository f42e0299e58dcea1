// math.rs — vector types and the coordinate/angle codecs used on the wire
//
// Vector3 and Vector4 are laid out exactly like the host's vec3_t / vec4_t so
// they can be embedded in the mirrored records and passed by pointer.

use std::f32::consts::PI;
use std::fmt;
use std::ops::{Add, AddAssign, Div, Index, IndexMut, Mul, Neg, Sub, SubAssign};

use bytemuck::{Pod, Zeroable};

// Angle indexes
pub const PITCH: usize = 0;
pub const YAW: usize = 1;
pub const ROLL: usize = 2;

// ============================================================
// Coordinate / angle codecs
// ============================================================

/// Quantize a world coordinate to 1/8 unit, the way the host's
/// `COORD2SHORT` does it: scale, truncate toward zero, then narrow.
#[inline]
pub fn coord_to_short(f: f32) -> i16 {
    ((f * 8.0) as i32) as i16
}

/// Inverse of [`coord_to_short`].
#[inline]
pub fn short_to_coord(s: i16) -> f32 {
    s as f32 * (1.0 / 8.0)
}

/// `ANGLE2SHORT`: map degrees onto the full 16-bit circle.
#[inline]
pub fn angle_to_short(a: f32) -> i32 {
    ((a * 65536.0 / 360.0) as i32) & 65535
}

/// `SHORT2ANGLE`
#[inline]
pub fn short_to_angle(s: i32) -> f32 {
    s as f32 * (360.0 / 65536.0)
}

// ============================================================
// Vector3
// ============================================================

/// Three component float vector, binary compatible with `vec3_t`.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct Vector3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vector3 {
    pub const ZERO: Vector3 = Vector3::new(0.0, 0.0, 0.0);

    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    pub const fn from_array(v: [f32; 3]) -> Self {
        Self { x: v[0], y: v[1], z: v[2] }
    }

    pub const fn to_array(self) -> [f32; 3] {
        [self.x, self.y, self.z]
    }

    // Angle views. x is pitch, y is yaw, z is roll.
    pub fn pitch(&self) -> f32 { self.x }
    pub fn yaw(&self) -> f32 { self.y }
    pub fn roll(&self) -> f32 { self.z }
    pub fn set_pitch(&mut self, v: f32) { self.x = v; }
    pub fn set_yaw(&mut self, v: f32) { self.y = v; }
    pub fn set_roll(&mut self, v: f32) { self.z = v; }

    pub fn dot(self, other: Vector3) -> f32 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    pub fn cross(self, other: Vector3) -> Vector3 {
        Vector3::new(
            self.y * other.z - self.z * other.y,
            self.z * other.x - self.x * other.z,
            self.x * other.y - self.y * other.x,
        )
    }

    pub fn length(self) -> f32 {
        self.dot(self).sqrt()
    }

    /// Normalize in place, returning the original length. A zero vector is left alone.
    pub fn normalize(&mut self) -> f32 {
        let len = self.length();
        if len != 0.0 {
            let ilen = 1.0 / len;
            self.x *= ilen;
            self.y *= ilen;
            self.z *= ilen;
        }
        len
    }

    /// `self + scale * dir`
    pub fn mul_add(self, scale: f32, dir: Vector3) -> Vector3 {
        self + dir * scale
    }

    /// Encode each component with [`coord_to_short`].
    pub fn to_short_coordinates(self) -> [i16; 3] {
        [coord_to_short(self.x), coord_to_short(self.y), coord_to_short(self.z)]
    }

    pub fn from_short_coordinates(s: [i16; 3]) -> Vector3 {
        Vector3::new(short_to_coord(s[0]), short_to_coord(s[1]), short_to_coord(s[2]))
    }

    /// Forward, right and up unit vectors for a set of euler angles in degrees.
    pub fn angle_vectors(self) -> (Vector3, Vector3, Vector3) {
        let (sy, cy) = (self.yaw() * (PI * 2.0 / 360.0)).sin_cos();
        let (sp, cp) = (self.pitch() * (PI * 2.0 / 360.0)).sin_cos();
        let (sr, cr) = (self.roll() * (PI * 2.0 / 360.0)).sin_cos();

        let forward = Vector3::new(cp * cy, cp * sy, -sp);
        let right = Vector3::new(
            -sr * sp * cy + cr * sy,
            -sr * sp * sy - cr * cy,
            -sr * cp,
        );
        let up = Vector3::new(
            cr * sp * cy + sr * sy,
            cr * sp * sy - sr * cy,
            cr * cp,
        );
        (forward, right, up)
    }
}

impl fmt::Display for Vector3 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(.x:{}, .y:{}, .z:{})", self.x, self.y, self.z)
    }
}

impl From<[f32; 3]> for Vector3 {
    fn from(v: [f32; 3]) -> Self {
        Vector3::from_array(v)
    }
}

impl From<Vector3> for [f32; 3] {
    fn from(v: Vector3) -> Self {
        v.to_array()
    }
}

impl Index<usize> for Vector3 {
    type Output = f32;

    fn index(&self, i: usize) -> &f32 {
        match i {
            0 => &self.x,
            1 => &self.y,
            2 => &self.z,
            _ => panic!("Vector3 index out of range: {}", i),
        }
    }
}

impl IndexMut<usize> for Vector3 {
    fn index_mut(&mut self, i: usize) -> &mut f32 {
        match i {
            0 => &mut self.x,
            1 => &mut self.y,
            2 => &mut self.z,
            _ => panic!("Vector3 index out of range: {}", i),
        }
    }
}

impl Add for Vector3 {
    type Output = Vector3;
    fn add(self, o: Vector3) -> Vector3 {
        Vector3::new(self.x + o.x, self.y + o.y, self.z + o.z)
    }
}

impl Sub for Vector3 {
    type Output = Vector3;
    fn sub(self, o: Vector3) -> Vector3 {
        Vector3::new(self.x - o.x, self.y - o.y, self.z - o.z)
    }
}

impl Mul for Vector3 {
    type Output = Vector3;
    fn mul(self, o: Vector3) -> Vector3 {
        Vector3::new(self.x * o.x, self.y * o.y, self.z * o.z)
    }
}

impl Mul<f32> for Vector3 {
    type Output = Vector3;
    fn mul(self, s: f32) -> Vector3 {
        Vector3::new(self.x * s, self.y * s, self.z * s)
    }
}

impl Div for Vector3 {
    type Output = Vector3;
    fn div(self, o: Vector3) -> Vector3 {
        Vector3::new(self.x / o.x, self.y / o.y, self.z / o.z)
    }
}

impl Div<f32> for Vector3 {
    type Output = Vector3;
    fn div(self, s: f32) -> Vector3 {
        Vector3::new(self.x / s, self.y / s, self.z / s)
    }
}

impl Neg for Vector3 {
    type Output = Vector3;
    fn neg(self) -> Vector3 {
        Vector3::new(-self.x, -self.y, -self.z)
    }
}

impl AddAssign for Vector3 {
    fn add_assign(&mut self, o: Vector3) {
        *self = *self + o;
    }
}

impl SubAssign for Vector3 {
    fn sub_assign(&mut self, o: Vector3) {
        *self = *self - o;
    }
}

// ============================================================
// Vector4
// ============================================================

/// Four component float vector, used for the player screen blend.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct Vector4 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub w: f32,
}

impl Vector4 {
    pub const fn new(x: f32, y: f32, z: f32, w: f32) -> Self {
        Self { x, y, z, w }
    }

    pub fn xyz(self) -> Vector3 {
        Vector3::new(self.x, self.y, self.z)
    }
}

impl fmt::Display for Vector4 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(.x:{}, .y:{}, .z:{}, .w:{})", self.x, self.y, self.z, self.w)
    }
}

impl Add for Vector4 {
    type Output = Vector4;
    fn add(self, o: Vector4) -> Vector4 {
        Vector4::new(self.x + o.x, self.y + o.y, self.z + o.z, self.w + o.w)
    }
}

impl Sub for Vector4 {
    type Output = Vector4;
    fn sub(self, o: Vector4) -> Vector4 {
        Vector4::new(self.x - o.x, self.y - o.y, self.z - o.z, self.w - o.w)
    }
}

impl Mul for Vector4 {
    type Output = Vector4;
    fn mul(self, o: Vector4) -> Vector4 {
        Vector4::new(self.x * o.x, self.y * o.y, self.z * o.z, self.w * o.w)
    }
}

impl Div for Vector4 {
    type Output = Vector4;
    fn div(self, o: Vector4) -> Vector4 {
        Vector4::new(self.x / o.x, self.y / o.y, self.z / o.z, self.w / o.w)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coord_boundary_values() {
        assert_eq!(coord_to_short(511.9375), 4095);
        assert_eq!(coord_to_short(512.0), 4096);
        assert_eq!(coord_to_short(-512.0625), -4096);
        assert_eq!(short_to_coord(4095), 511.875);
        assert_eq!(short_to_coord(-4096), -512.0);
    }

    #[test]
    fn test_coord_truncates_toward_zero() {
        // 0.124 * 8 = 0.992, must not round up to 1
        assert_eq!(coord_to_short(0.124), 0);
        assert_eq!(coord_to_short(-0.124), 0);
        assert_eq!(coord_to_short(1.9), 15);
        assert_eq!(coord_to_short(-1.9), -15);
    }

    #[test]
    fn test_coord_exact_eighths_survive() {
        for i in -32000i32..32000 {
            let f = i as f32 / 8.0;
            assert_eq!(short_to_coord(coord_to_short(f)), f, "value {}", f);
        }
    }

    #[test]
    fn test_coord_narrows_like_c_cast() {
        // 4096 * 8 = 32768 does not fit an i16 and wraps.
        assert_eq!(coord_to_short(4096.0), i16::MIN);
    }

    #[test]
    fn test_angle_codec() {
        assert_eq!(angle_to_short(90.0), 16384);
        assert_eq!(angle_to_short(360.0), 0);
        assert_eq!(angle_to_short(-90.0), 49152);
        assert!((short_to_angle(16384) - 90.0).abs() < 1e-4);
    }

    #[test]
    fn test_vector3_display() {
        let v = Vector3::new(30.0, 60.0, 20.0);
        assert_eq!(v.to_string(), "(.x:30, .y:60, .z:20)");
    }

    #[test]
    fn test_vector3_arithmetic() {
        let a = Vector3::new(1.0, 2.0, 3.0);
        let b = Vector3::new(4.0, 5.0, 6.0);
        assert_eq!(a + b, Vector3::new(5.0, 7.0, 9.0));
        assert_eq!(b - a, Vector3::new(3.0, 3.0, 3.0));
        assert_eq!(a * b, Vector3::new(4.0, 10.0, 18.0));
        assert_eq!(b / a, Vector3::new(4.0, 2.5, 2.0));
        assert_eq!(a * 2.0, Vector3::new(2.0, 4.0, 6.0));
        assert_eq!(a.dot(b), 32.0);
        assert_eq!(
            Vector3::new(1.0, 0.0, 0.0).cross(Vector3::new(0.0, 1.0, 0.0)),
            Vector3::new(0.0, 0.0, 1.0)
        );
    }

    #[test]
    fn test_vector3_normalize() {
        let mut v = Vector3::new(3.0, 0.0, 4.0);
        let len = v.normalize();
        assert!((len - 5.0).abs() < 1e-6);
        assert!((v.x - 0.6).abs() < 1e-6);
        assert!((v.z - 0.8).abs() < 1e-6);

        let mut zero = Vector3::ZERO;
        assert_eq!(zero.normalize(), 0.0);
        assert_eq!(zero, Vector3::ZERO);
    }

    #[test]
    fn test_short_coordinates_roundtrip() {
        let v = Vector3::new(100.5, -20.125, 3.0);
        let s = v.to_short_coordinates();
        assert_eq!(s, [804, -161, 24]);
        assert_eq!(Vector3::from_short_coordinates(s), v);
    }

    #[test]
    fn test_angle_vectors_yaw() {
        let (forward, right, up) = Vector3::new(0.0, 90.0, 0.0).angle_vectors();
        assert!((forward.y - 1.0).abs() < 1e-6);
        assert!(forward.x.abs() < 1e-6);
        assert!((right.x - 1.0).abs() < 1e-6);
        assert!((up.z - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_angle_accessors() {
        let mut v = Vector3::ZERO;
        v.set_pitch(10.0);
        v.set_yaw(20.0);
        v.set_roll(30.0);
        assert_eq!((v.pitch(), v.yaw(), v.roll()), (10.0, 20.0, 30.0));
        assert_eq!(v[PITCH], 10.0);
        assert_eq!(v[YAW], 20.0);
        assert_eq!(v[ROLL], 30.0);
    }
}
