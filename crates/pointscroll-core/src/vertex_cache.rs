//! Flat binary vertex cache: tightly packed little-endian `f32` xyz triples,
//! no header, no padding. A file of `n` bytes holds exactly `n / 12` points.

use crate::error::ShapeError;
use crate::points::PointCloud;
use crate::sampler::stride_sample;

/// Bytes per cached point (three `f32`).
pub const POINT_STRIDE_BYTES: usize = 12;

pub fn decode(bytes: &[u8]) -> Result<Vec<f32>, ShapeError> {
    if bytes.len() % POINT_STRIDE_BYTES != 0 {
        return Err(ShapeError::CorruptCache { len: bytes.len() });
    }
    Ok(bytes
        .chunks_exact(4)
        .map(|b| f32::from_le_bytes([b[0], b[1], b[2], b[3]]))
        .collect())
}

pub fn encode(points: &[f32]) -> Vec<u8> {
    let mut out = Vec::with_capacity(points.len() * 4);
    for v in points {
        out.extend_from_slice(&v.to_le_bytes());
    }
    out
}

/// Cap `source` at `max_vertices` by uniform stride and centre its bounding
/// box on the origin. No scaling is applied; the runtime sampler does that.
pub fn bake(source: &[f32], max_vertices: usize) -> Vec<f32> {
    let total = source.len() / 3;
    if total == 0 {
        return Vec::new();
    }
    let target = max_vertices.min(total).max(1);
    let step = total.div_ceil(target).max(1);
    let mut cloud = PointCloud::from_flat(stride_sample(source, step));
    if let Some(bounds) = cloud.bounds() {
        let c = bounds.center();
        cloud.write_with(|buf| {
            for p in buf.chunks_exact_mut(3) {
                p[0] -= c.x;
                p[1] -= c.y;
                p[2] -= c.z;
            }
        });
    }
    log::debug!("baked {total} vertices to {} (step {step})", cloud.len());
    cloud.into_vec()
}
