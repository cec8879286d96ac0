//! Render resources shared by every cloud in a scene.

use crate::constants::SPRITE_SIZE;

/// Soft round particle sprite, RGBA8, row-major.
#[derive(Clone, Debug, PartialEq)]
pub struct Sprite {
    pub size: usize,
    pub rgba: Vec<u8>,
}

impl Sprite {
    /// White disc with a radial alpha falloff: 1.0 at the centre, 0.8 at half
    /// the radius, 0 at the radius (2 px inside the edge).
    pub fn circle(size: usize) -> Self {
        let center = size as f32 / 2.0;
        let radius = (center - 2.0).max(1.0);
        let mut rgba = Vec::with_capacity(size * size * 4);
        for y in 0..size {
            for x in 0..size {
                let dx = x as f32 + 0.5 - center;
                let dy = y as f32 + 0.5 - center;
                let alpha = circle_alpha((dx * dx + dy * dy).sqrt() / radius);
                rgba.extend_from_slice(&[255, 255, 255, (alpha * 255.0).round() as u8]);
            }
        }
        Self { size, rgba }
    }

    pub fn alpha_at(&self, x: usize, y: usize) -> u8 {
        self.rgba
            .get((y * self.size + x) * 4 + 3)
            .copied()
            .unwrap_or(0)
    }
}

/// Gradient stops at 0, 0.5 and 1 of the normalised radius.
fn circle_alpha(r: f32) -> f32 {
    if r <= 0.5 {
        1.0 - 0.2 * (r / 0.5)
    } else if r <= 1.0 {
        0.8 * (1.0 - (r - 0.5) / 0.5)
    } else {
        0.0
    }
}

/// Built once when the scene is assembled and disposed at teardown.
#[derive(Debug)]
pub struct RenderResources {
    sprite: Option<Sprite>,
}

impl RenderResources {
    pub fn build() -> Self {
        log::debug!("building {SPRITE_SIZE}x{SPRITE_SIZE} particle sprite");
        Self {
            sprite: Some(Sprite::circle(SPRITE_SIZE)),
        }
    }

    pub fn sprite(&self) -> Option<&Sprite> {
        self.sprite.as_ref()
    }

    pub fn is_disposed(&self) -> bool {
        self.sprite.is_none()
    }

    pub fn dispose(&mut self) {
        self.sprite = None;
    }
}
