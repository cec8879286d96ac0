//! Mapping from global scroll progress to a section's local timeline.

use crate::constants::{
    ACTIVE_TAIL_EPSILON, INTRO_END, PREVIEW_OFFSET, SECTION_BASE_OFFSET, SECTION_DURATION,
    SECTION_STRIDE,
};

/// Where sections sit on the page's progress axis.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScrollLayout {
    pub base_offset: f32,
    pub stride: f32,
    pub duration: f32,
    pub preview_offset: f32,
    pub tail_epsilon: f32,
    pub intro_end: f32,
}

impl Default for ScrollLayout {
    fn default() -> Self {
        Self {
            base_offset: SECTION_BASE_OFFSET,
            stride: SECTION_STRIDE,
            duration: SECTION_DURATION,
            preview_offset: PREVIEW_OFFSET,
            tail_epsilon: ACTIVE_TAIL_EPSILON,
            intro_end: INTRO_END,
        }
    }
}

impl ScrollLayout {
    pub fn window(&self, index: usize) -> AnimationWindow {
        AnimationWindow::for_section(index, self)
    }

    /// Layout that fits `sections` sections into the page. Unchanged when
    /// the last section already ends by progress 1; otherwise stride,
    /// duration and preview lead shrink by one common factor so the last
    /// section ends exactly at 1. The base offset is kept.
    pub fn fitted(&self, sections: usize) -> Self {
        let Some(last) = sections.checked_sub(1) else {
            return *self;
        };
        let span = last as f32 * self.stride + self.duration;
        let room = 1.0 - self.base_offset;
        if self.base_offset + span <= 1.0 || span <= 0.0 || room <= 0.0 {
            return *self;
        }
        let k = room / span;
        Self {
            stride: self.stride * k,
            duration: self.duration * k,
            preview_offset: self.preview_offset * k,
            ..*self
        }
    }

    /// Index of the section whose `[start, end)` range contains `progress`.
    pub fn section_at(&self, progress: f32, sections: usize) -> Option<usize> {
        (0..sections).find(|&i| {
            let w = self.window(i);
            progress >= w.section_start && progress < w.section_end
        })
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AnimationWindow {
    pub section_start: f32,
    pub section_end: f32,
    pub preview_start: f32,
    pub active_end: f32,
}

/// Phase of a window at a given progress. Carried values are in `[0, 1]`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum WindowPhase {
    Inactive,
    Preview(f32),
    Active(f32),
}

impl WindowPhase {
    pub fn is_inactive(&self) -> bool {
        matches!(self, WindowPhase::Inactive)
    }
}

impl AnimationWindow {
    pub fn for_section(index: usize, layout: &ScrollLayout) -> Self {
        let section_start = layout.base_offset + index as f32 * layout.stride;
        Self::new(
            section_start,
            section_start + layout.duration,
            layout.preview_offset,
            layout.tail_epsilon,
        )
    }

    pub fn new(section_start: f32, section_end: f32, preview_offset: f32, tail: f32) -> Self {
        Self {
            section_start,
            section_end,
            preview_start: section_start - preview_offset,
            active_end: section_end + tail,
        }
    }

    pub fn contains(&self, progress: f32) -> bool {
        progress >= self.preview_start && progress <= self.active_end
    }

    pub fn local_progress(&self, progress: f32) -> f32 {
        let span = self.section_end - self.section_start;
        if span <= 0.0 {
            return 1.0;
        }
        ((progress - self.section_start) / span).clamp(0.0, 1.0)
    }

    pub fn phase(&self, progress: f32) -> WindowPhase {
        if !self.contains(progress) {
            return WindowPhase::Inactive;
        }
        if progress < self.section_start {
            let lead = self.section_start - self.preview_start;
            let t = if lead > 0.0 {
                (progress - self.preview_start) / lead
            } else {
                1.0
            };
            return WindowPhase::Preview(t.clamp(0.0, 1.0));
        }
        WindowPhase::Active(self.local_progress(progress))
    }
}
