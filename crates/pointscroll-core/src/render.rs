//! What the scene hands to a rendering backend once per frame.

use crate::animator::{Layer, Transform};
use crate::points::PointCloud;
use crate::resources::Sprite;
use crate::shape::ShapeId;
use fnv::FnvHashMap;
use std::borrow::Cow;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CloudRole {
    Background,
    Hint,
    Intro,
    Shape(ShapeId),
}

/// A borrowed, fully updated point set with its placement.
#[derive(Clone, Copy, Debug)]
pub struct CloudView<'a> {
    pub role: CloudRole,
    pub layer: usize,
    pub positions: &'a PointCloud,
    pub colors: Option<&'a [f32]>,
    /// Buffer version; changes whenever positions were rewritten.
    pub version: u64,
    pub transform: Transform,
    pub opacity: f32,
    pub point_size: f32,
    pub tint: [f32; 3],
}

impl<'a> CloudView<'a> {
    pub fn plain(
        role: CloudRole,
        index: usize,
        layer: &'a Layer,
        transform: Transform,
        opacity: f32,
    ) -> Self {
        Self {
            role,
            layer: index,
            positions: &layer.points,
            colors: layer.colors.as_deref(),
            version: layer.points.version(),
            transform,
            opacity: opacity * layer.weight,
            point_size: layer.point_size,
            tint: [1.0; 3],
        }
    }

    pub fn with_tint(mut self, tint: [f32; 3]) -> Self {
        self.tint = tint;
        self
    }

    /// White, uncoloured clouds can be drawn with the shared sprite as-is.
    pub fn is_plain_white(&self) -> bool {
        self.colors.is_none() && self.tint == [1.0; 3]
    }

    /// Identity of the GPU buffers backing this cloud across frames.
    pub fn key(&self) -> CloudKey {
        (self.role, self.layer)
    }

    /// One RGB triple per point, before the tint. Uncoloured clouds are white.
    /// Missing trailing colours are padded with white.
    pub fn point_colors(&self) -> Cow<'a, [f32]> {
        let n = self.positions.len() * 3;
        match self.colors {
            Some(colors) if colors.len() >= n => Cow::Borrowed(&colors[..n]),
            Some(colors) => {
                let mut padded = colors.to_vec();
                padded.resize(n, 1.0);
                Cow::Owned(padded)
            }
            None => Cow::Owned(vec![1.0; n]),
        }
    }
}

pub type CloudKey = (CloudRole, usize);

/// What [`UploadCache::sync`] did for a cloud.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Upload {
    /// First sighting, or the point count changed: buffers were built.
    Created,
    /// Positions were rewritten since the last upload.
    Updated,
    Unchanged,
}

struct Uploaded<B> {
    buffers: B,
    version: u64,
    points: usize,
}

/// Backend buffers per cloud, re-uploaded only when a cloud's version moves.
pub struct UploadCache<B> {
    entries: FnvHashMap<CloudKey, Uploaded<B>>,
}

impl<B> Default for UploadCache<B> {
    fn default() -> Self {
        Self {
            entries: FnvHashMap::default(),
        }
    }
}

impl<B> UploadCache<B> {
    pub fn sync(
        &mut self,
        cloud: &CloudView<'_>,
        create: impl FnOnce(&CloudView<'_>) -> B,
        update: impl FnOnce(&mut B, &CloudView<'_>),
    ) -> Upload {
        let points = cloud.positions.len();
        match self.entries.get_mut(&cloud.key()) {
            Some(entry) if entry.points == points => {
                if entry.version == cloud.version {
                    return Upload::Unchanged;
                }
                update(&mut entry.buffers, cloud);
                entry.version = cloud.version;
                Upload::Updated
            }
            _ => {
                self.entries.insert(
                    cloud.key(),
                    Uploaded {
                        buffers: create(cloud),
                        version: cloud.version,
                        points,
                    },
                );
                Upload::Created
            }
        }
    }

    pub fn get(&self, key: &CloudKey) -> Option<&B> {
        self.entries.get(key).map(|e| &e.buffers)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drop every cached buffer.
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

pub struct FrameView<'a> {
    pub clouds: &'a [CloudView<'a>],
    pub sprite: Option<&'a Sprite>,
    pub progress: f32,
}

impl<'a> FrameView<'a> {
    pub fn shape_clouds(&self) -> impl Iterator<Item = &CloudView<'a>> + '_ {
        self.clouds
            .iter()
            .filter(|c| matches!(c.role, CloudRole::Shape(_)))
    }

    pub fn point_count(&self) -> usize {
        self.clouds.iter().map(|c| c.positions.len()).sum()
    }
}

/// Backend that draws a frame. Called exactly once per scene frame, after
/// every buffer write for that frame is complete.
pub trait RenderSurface {
    fn render(&mut self, frame: &FrameView<'_>);
}
