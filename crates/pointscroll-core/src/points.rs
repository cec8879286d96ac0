//! Flat xyz point buffers.
//!
//! A [`PointCloud`] never changes length after construction. Mutation goes
//! through [`PointCloud::write_with`], which bumps a version counter so a
//! renderer can tell when the buffer needs re-uploading.

use crate::error::ShapeError;
use glam::Vec3;

#[derive(Clone, Debug, Default, PartialEq)]
pub struct PointCloud {
    data: Vec<f32>,
    version: u64,
}

impl PointCloud {
    pub fn from_vec(data: Vec<f32>) -> Result<Self, ShapeError> {
        if data.len() % 3 != 0 {
            return Err(ShapeError::RaggedBuffer { len: data.len() });
        }
        Ok(Self { data, version: 0 })
    }

    pub fn zeroed(points: usize) -> Self {
        Self {
            data: vec![0.0; points * 3],
            version: 0,
        }
    }

    /// Caller guarantees `data.len()` is a multiple of 3.
    pub(crate) fn from_flat(data: Vec<f32>) -> Self {
        debug_assert_eq!(data.len() % 3, 0);
        Self { data, version: 0 }
    }

    pub(crate) fn from_points(points: impl IntoIterator<Item = Vec3>) -> Self {
        let data = points
            .into_iter()
            .flat_map(|p| [p.x, p.y, p.z])
            .collect::<Vec<_>>();
        Self { data, version: 0 }
    }

    /// Number of points (not floats).
    #[inline]
    pub fn len(&self) -> usize {
        self.data.len() / 3
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    #[inline]
    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    /// Host-endian bytes of the xyz floats, as uploaded to a vertex buffer.
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.data)
    }

    #[inline]
    pub fn point(&self, index: usize) -> Vec3 {
        let i3 = index * 3;
        Vec3::new(self.data[i3], self.data[i3 + 1], self.data[i3 + 2])
    }

    pub fn iter(&self) -> impl Iterator<Item = Vec3> + '_ {
        self.data
            .chunks_exact(3)
            .map(|c| Vec3::new(c[0], c[1], c[2]))
    }

    /// Monotonic counter bumped on every in-place write.
    #[inline]
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Rewrite the buffer in place. The slice length is fixed.
    pub fn write_with(&mut self, f: impl FnOnce(&mut [f32])) {
        f(&mut self.data);
        self.version = self.version.wrapping_add(1);
    }

    pub fn bounds(&self) -> Option<Bounds> {
        let mut it = self.iter();
        let first = it.next()?;
        let mut b = Bounds::at(first);
        for p in it {
            b.include(p);
        }
        Some(b)
    }

    pub fn into_vec(self) -> Vec<f32> {
        self.data
    }
}

/// Axis-aligned bounding box.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bounds {
    pub min: Vec3,
    pub max: Vec3,
}

impl Bounds {
    pub fn at(p: Vec3) -> Self {
        Self { min: p, max: p }
    }

    pub fn include(&mut self, p: Vec3) {
        self.min = self.min.min(p);
        self.max = self.max.max(p);
    }

    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    pub fn max_dimension(&self) -> f32 {
        self.size().max_element()
    }
}

/// Positions plus one RGB triple per point (globe layers).
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ColoredPoints {
    pub positions: PointCloud,
    pub colors: Vec<f32>,
}

impl ColoredPoints {
    pub(crate) fn from_parts(positions: Vec<Vec3>, colors: Vec<f32>) -> Self {
        Self {
            positions: PointCloud::from_points(positions),
            colors,
        }
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}
