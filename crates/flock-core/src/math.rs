//! Vector helpers on top of `glam`.
//!
//! Everything here is total: degenerate input maps to a defined value
//! instead of NaN.

use glam::{Mat3, Quat, Vec3};
use rand::Rng;
use std::f32::consts::TAU;

/// Squared length below which `forward` is treated as parallel to world up.
const PARALLEL_EPSILON: f32 = 1e-12;

/// Local forward axis of every agent.
pub const LOCAL_FORWARD: Vec3 = Vec3::Z;

/// Preferred world up used when building look rotations.
pub const WORLD_UP: Vec3 = Vec3::Y;

/// Mean of `vectors` normalized to unit length.
///
/// Returns zero for an empty input or when the mean itself is zero.
pub fn mean_direction(vectors: impl IntoIterator<Item = Vec3>) -> Vec3 {
    let (sum, count) = vectors
        .into_iter()
        .fold((Vec3::ZERO, 0usize), |(sum, count), v| (sum + v, count + 1));
    if count == 0 {
        return Vec3::ZERO;
    }
    (sum / count as f32).normalize_or_zero()
}

/// Rescales `v` to exactly `max` when it is longer, preserving direction.
pub fn clamp_magnitude(v: Vec3, max: f32) -> Vec3 {
    if v.length_squared() > max * max {
        v.normalize_or_zero() * max
    } else {
        v
    }
}

/// Rotation whose local +Z faces `forward` with +Y kept as close to world up
/// as possible.
///
/// Returns `None` for a zero or non-finite `forward`.
pub fn look_rotation(forward: Vec3) -> Option<Quat> {
    let forward = forward.try_normalize()?;
    let right = WORLD_UP.cross(forward);
    if right.length_squared() <= PARALLEL_EPSILON {
        return Some(Quat::from_rotation_arc(LOCAL_FORWARD, forward));
    }
    let right = right.normalize();
    let up = forward.cross(right);
    Some(Quat::from_mat3(&Mat3::from_cols(right, up, forward)).normalize())
}

/// Unit heading of an orientation.
pub fn forward(orientation: Quat) -> Vec3 {
    orientation * LOCAL_FORWARD
}

/// Uniform sample inside the unit ball.
pub fn random_in_unit_sphere<R: Rng + ?Sized>(rng: &mut R) -> Vec3 {
    loop {
        let candidate = Vec3::new(
            rng.gen_range(-1.0..=1.0),
            rng.gen_range(-1.0..=1.0),
            rng.gen_range(-1.0..=1.0),
        );
        if candidate.length_squared() <= 1.0 {
            return candidate;
        }
    }
}

/// Uniformly distributed rotation (Shoemake's method).
pub fn random_rotation<R: Rng + ?Sized>(rng: &mut R) -> Quat {
    let u1: f32 = rng.gen();
    let u2: f32 = rng.gen();
    let u3: f32 = rng.gen();
    let a = (1.0 - u1).sqrt();
    let b = u1.sqrt();
    Quat::from_xyzw(
        a * (TAU * u2).sin(),
        a * (TAU * u2).cos(),
        b * (TAU * u3).sin(),
        b * (TAU * u3).cos(),
    )
    .normalize()
}
