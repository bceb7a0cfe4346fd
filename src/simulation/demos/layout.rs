//! Particle arrangements shared by several demos

use cgmath::Vector3;
use std::f32::consts::PI;

/// `columns * rows` points on the XY plane, centered on the origin.
pub fn grid(columns: usize, rows: usize, spacing: f32) -> Vec<Vector3<f32>> {
    let half_w = (columns.saturating_sub(1)) as f32 * spacing * 0.5;
    let half_h = (rows.saturating_sub(1)) as f32 * spacing * 0.5;
    let mut points = Vec::with_capacity(columns * rows);
    for row in 0..rows {
        for col in 0..columns {
            points.push(Vector3::new(
                col as f32 * spacing - half_w,
                row as f32 * spacing - half_h,
                0.0,
            ));
        }
    }
    points
}

/// `count` points spread over a sphere (golden-angle spiral).
pub fn sphere(count: usize, radius: f32) -> Vec<Vector3<f32>> {
    let golden_angle = PI * (3.0 - 5.0_f32.sqrt());
    (0..count)
        .map(|i| {
            let y = if count > 1 {
                1.0 - 2.0 * i as f32 / (count - 1) as f32
            } else {
                0.0
            };
            let ring = (1.0 - y * y).max(0.0).sqrt();
            let theta = golden_angle * i as f32;
            Vector3::new(theta.cos() * ring, y, theta.sin() * ring) * radius
        })
        .collect()
}

/// `count` points on a circle in the XY plane.
pub fn circle(count: usize, radius: f32) -> Vec<Vector3<f32>> {
    (0..count)
        .map(|i| {
            let angle = 2.0 * PI * i as f32 / count.max(1) as f32;
            Vector3::new(angle.cos() * radius, angle.sin() * radius, 0.0)
        })
        .collect()
}

/// `count` points along a horizontal line of the given length.
pub fn line(count: usize, length: f32) -> Vec<Vector3<f32>> {
    (0..count)
        .map(|i| {
            let t = if count > 1 {
                i as f32 / (count - 1) as f32
            } else {
                0.5
            };
            Vector3::new((t - 0.5) * length, 0.0, 0.0)
        })
        .collect()
}

/// Hermite smoothstep on `[0, 1]`.
pub fn smoothstep(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}
