use crate::constants::MAX_VERTICES_PER_MODEL;
use crate::error::ShapeError;
use crate::generators::Geometry;
use crate::motion::AnimationKind;
use std::fmt;

/// Slot of a shape in its scene; also its update order. The scroll section
/// it occupies is [`ShapeSpec::section`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ShapeId(pub usize);

impl fmt::Display for ShapeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Where a shape's points come from.
#[derive(Clone, Debug, PartialEq)]
pub enum ShapeSource {
    Primitive {
        geometry: Geometry,
        count: usize,
    },
    Globe {
        continent_count: usize,
        glow_count: usize,
    },
    /// Vertex cache fetched at runtime. `fine_scale` is applied after
    /// normalisation.
    Model {
        url: String,
        fine_scale: f32,
        max_vertices: usize,
    },
}

impl ShapeSource {
    pub fn is_model(&self) -> bool {
        matches!(self, ShapeSource::Model { .. })
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ShapeSpec {
    pub name: String,
    /// Position on the scroll timeline; selects the animation window.
    pub section: usize,
    pub kind: AnimationKind,
    pub source: ShapeSource,
    /// RGB multiplier for clouds without per-point colours.
    pub tint: [f32; 3],
}

impl ShapeSpec {
    pub fn primitive(
        section: usize,
        name: &str,
        geometry: Geometry,
        kind: AnimationKind,
        count: usize,
    ) -> Self {
        Self {
            name: name.to_string(),
            section,
            kind,
            source: ShapeSource::Primitive { geometry, count },
            tint: [1.0; 3],
        }
    }

    /// Section backed by a vertex cache at `url`.
    pub fn model(section: usize, name: &str, url: &str, kind: AnimationKind, fine_scale: f32) -> Self {
        Self {
            name: name.to_string(),
            section,
            kind,
            source: ShapeSource::Model {
                url: url.to_string(),
                fine_scale,
                max_vertices: MAX_VERTICES_PER_MODEL,
            },
            tint: [1.0; 3],
        }
    }
}

/// Availability of a shape's point data.
#[derive(Clone, Debug, PartialEq)]
pub enum LoadState {
    Pending,
    Loaded,
    Failed(ShapeError),
}

impl LoadState {
    pub fn is_loaded(&self) -> bool {
        matches!(self, LoadState::Loaded)
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, LoadState::Failed(_))
    }
}
