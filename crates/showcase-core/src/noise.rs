use crate::constants::NOISE_LATTICE_PERIOD;
use glam::Vec2;

// 2D gradient noise matching the WGSL in shaders/surface.wgsl. Lattice
// coordinates wrap, so the field tiles every NOISE_LATTICE_PERIOD cells.

#[inline]
fn fract(x: f32) -> f32 {
    x - x.floor()
}

#[inline]
fn hash2(cell: Vec2) -> Vec2 {
    let p = Vec2::new(
        cell.x.rem_euclid(NOISE_LATTICE_PERIOD),
        cell.y.rem_euclid(NOISE_LATTICE_PERIOD),
    );
    let q = Vec2::new(
        p.dot(Vec2::new(127.1, 311.7)),
        p.dot(Vec2::new(269.5, 183.3)),
    );
    Vec2::new(
        -1.0 + 2.0 * fract(q.x.sin() * 43_758.547),
        -1.0 + 2.0 * fract(q.y.sin() * 43_758.547),
    )
}

/// Gradient noise in roughly \[-1, 1\], zero at lattice points.
pub fn gradient_noise(p: Vec2) -> f32 {
    let i = p.floor();
    let f = p - i;
    let u = f * f * (Vec2::splat(3.0) - 2.0 * f);

    let g00 = hash2(i).dot(f);
    let g10 = hash2(i + Vec2::X).dot(f - Vec2::X);
    let g01 = hash2(i + Vec2::Y).dot(f - Vec2::Y);
    let g11 = hash2(i + Vec2::ONE).dot(f - Vec2::ONE);

    let x0 = g00 + (g10 - g00) * u.x;
    let x1 = g01 + (g11 - g01) * u.x;
    x0 + (x1 - x0) * u.y
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_on_lattice() {
        for (x, y) in [(0.0, 0.0), (3.0, -2.0), (10.0, 7.0)] {
            assert!(gradient_noise(Vec2::new(x, y)).abs() < 1e-6);
        }
    }

    #[test]
    fn tiles_every_lattice_period() {
        let shift = Vec2::new(NOISE_LATTICE_PERIOD, -2.0 * NOISE_LATTICE_PERIOD);
        for i in 0..50 {
            let p = Vec2::new(i as f32 * 0.37 + 0.11, i as f32 * 0.23 - 1.9);
            assert!((gradient_noise(p) - gradient_noise(p + shift)).abs() < 1e-4);
        }
    }

    #[test]
    fn bounded_over_samples() {
        for i in 0..400 {
            let p = Vec2::new(i as f32 * 0.173, i as f32 * 0.291 - 20.0);
            assert!(gradient_noise(p).abs() <= 1.5);
        }
    }
}
