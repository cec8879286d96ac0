//! Reduce a large vertex set to a bounded, centred and normalised cloud.
//!
//! Sampling is a uniform stride over the source in source order, so the
//! same input always yields the same output.

use crate::constants::MODEL_TARGET_SIZE;
use crate::device::ParticleBudget;
use crate::error::SampleError;
use crate::points::PointCloud;

/// Result of sampling a model's vertices.
#[derive(Clone, Debug)]
pub struct SampledModel {
    pub points: PointCloud,
    pub source_count: usize,
    pub step: usize,
}

/// Stride length used to bring `source_count` vertices down to roughly
/// `floor(min(target_count, source_count) * multiplier)`.
pub fn stride_for(source_count: usize, target_count: usize, multiplier: f32) -> usize {
    let final_count = ((target_count.min(source_count) as f32) * multiplier).floor() as usize;
    let final_count = final_count.max(1);
    source_count.div_ceil(final_count).max(1)
}

/// Take every `step`-th xyz triple of `source` in order.
pub fn stride_sample(source: &[f32], step: usize) -> Vec<f32> {
    source
        .chunks_exact(3)
        .step_by(step.max(1))
        .flatten()
        .copied()
        .collect()
}

pub fn sample_vertices(
    source: &[f32],
    target_count: usize,
    multiplier: f32,
) -> Result<PointCloud, SampleError> {
    let source_count = source.len() / 3;
    if source_count == 0 {
        return Err(SampleError::NoVertices);
    }
    let step = stride_for(source_count, target_count, multiplier);
    Ok(PointCloud::from_flat(stride_sample(source, step)))
}

/// Centre the cloud's bounding box on the origin, scale its largest dimension
/// to `target_size`, then apply `fine_scale`.
pub fn normalize(cloud: &mut PointCloud, target_size: f32, fine_scale: f32) {
    let Some(bounds) = cloud.bounds() else {
        return;
    };
    let center = bounds.center();
    let max_dim = bounds.max_dimension();
    let scale = if max_dim > f32::EPSILON {
        target_size / max_dim
    } else {
        1.0
    } * fine_scale;
    cloud.write_with(|buf| {
        for p in buf.chunks_exact_mut(3) {
            p[0] = (p[0] - center.x) * scale;
            p[1] = (p[1] - center.y) * scale;
            p[2] = (p[2] - center.z) * scale;
        }
    });
}

/// Sample and normalise a model's vertices to [`MODEL_TARGET_SIZE`].
pub fn sample_model(
    source: &[f32],
    target_count: usize,
    budget: ParticleBudget,
    fine_scale: f32,
) -> Result<SampledModel, SampleError> {
    let source_count = source.len() / 3;
    let mut points = sample_vertices(source, target_count, budget.multiplier())?;
    normalize(&mut points, MODEL_TARGET_SIZE, fine_scale);
    Ok(SampledModel {
        points,
        source_count,
        step: stride_for(source_count, target_count, budget.multiplier()),
    })
}
