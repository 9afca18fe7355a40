//! Quaternion transform utilities.
//!
//! The environment layer works in the robot's base frame: velocities and the
//! gravity vector are rotated by the inverse base orientation, and tilt is
//! measured as intrinsic x-y-z Euler angles. Angles are expressed in degrees
//! to match the configured termination thresholds.

use crate::types::{Quat, Vec3};

/// Inverse of a unit quaternion (its conjugate).
#[must_use]
pub fn inv_quat(q: Quat) -> Quat {
    Quat::new(q.w, -q.x, -q.y, -q.z)
}

/// Hamilton product `a * b` (apply `b` first, then `a`).
#[must_use]
pub fn quat_mul(a: Quat, b: Quat) -> Quat {
    Quat::new(
        a.w * b.w - a.x * b.x - a.y * b.y - a.z * b.z,
        a.w * b.x + a.x * b.w + a.y * b.z - a.z * b.y,
        a.w * b.y - a.x * b.z + a.y * b.w + a.z * b.x,
        a.w * b.z + a.x * b.y - a.y * b.x + a.z * b.w,
    )
}

/// Rotate a vector by a unit quaternion.
#[must_use]
pub fn transform_by_quat(v: Vec3, q: Quat) -> Vec3 {
    // v' = v + 2w(u x v) + 2(u x (u x v)) with u the vector part
    let u = Vec3::new(q.x, q.y, q.z);
    let cross = |a: Vec3, b: Vec3| {
        Vec3::new(
            a.y * b.z - a.z * b.y,
            a.z * b.x - a.x * b.z,
            a.x * b.y - a.y * b.x,
        )
    };
    let uv = cross(u, v);
    let uuv = cross(u, uv);
    v + uv * (2.0 * q.w) + uuv * 2.0
}

/// Intrinsic x-y-z Euler angles (roll, pitch, yaw) of a unit quaternion,
/// in degrees.
#[must_use]
pub fn quat_to_euler_deg(q: Quat) -> Vec3 {
    let roll = (2.0 * (q.w * q.x + q.y * q.z)).atan2(1.0 - 2.0 * (q.x * q.x + q.y * q.y));
    let sin_pitch = (2.0 * (q.w * q.y - q.z * q.x)).clamp(-1.0, 1.0);
    let pitch = sin_pitch.asin();
    let yaw = (2.0 * (q.w * q.z + q.x * q.y)).atan2(1.0 - 2.0 * (q.y * q.y + q.z * q.z));
    Vec3::new(roll.to_degrees(), pitch.to_degrees(), yaw.to_degrees())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-4
    }

    #[test]
    fn identity_has_zero_euler() {
        let e = quat_to_euler_deg(Quat::IDENTITY);
        assert!(approx(e.x, 0.0) && approx(e.y, 0.0) && approx(e.z, 0.0));
    }

    #[test]
    fn rotation_about_x_reads_as_roll() {
        let half = 30.0_f32.to_radians() / 2.0;
        let q = Quat::new(half.cos(), half.sin(), 0.0, 0.0);
        let e = quat_to_euler_deg(q);
        assert!(approx(e.x, 30.0), "roll was {}", e.x);
        assert!(approx(e.y, 0.0) && approx(e.z, 0.0));
    }

    #[test]
    fn rotate_vector_about_z() {
        // 90 degrees about z maps +x to +y
        let half = std::f32::consts::FRAC_PI_2 / 2.0;
        let q = Quat::new(half.cos(), 0.0, 0.0, half.sin());
        let v = transform_by_quat(Vec3::new(1.0, 0.0, 0.0), q);
        assert!(approx(v.x, 0.0) && approx(v.y, 1.0) && approx(v.z, 0.0));
    }

    #[test]
    fn inverse_rotation_round_trips() {
        let half = 0.4_f32;
        let q = Quat::new(half.cos(), 0.0, half.sin(), 0.0);
        let v = Vec3::new(0.3, -1.2, 2.0);
        let back = transform_by_quat(transform_by_quat(v, q), inv_quat(q));
        assert!(approx(back.x, v.x) && approx(back.y, v.y) && approx(back.z, v.z));
    }

    #[test]
    fn product_composes_rotations() {
        let half = std::f32::consts::FRAC_PI_4 / 2.0;
        let q = Quat::new(half.cos(), 0.0, 0.0, half.sin());
        let twice = quat_mul(q, q);
        let v = transform_by_quat(Vec3::new(1.0, 0.0, 0.0), twice);
        // two 45-degree turns about z map +x to +y
        assert!(approx(v.x, 0.0) && approx(v.y, 1.0));
    }
}
