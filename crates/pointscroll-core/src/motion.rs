//! Declarative per-kind motion policies.
//!
//! Every shape is driven by the same [`crate::animator::ShapeAnimator`]; what
//! differs between kinds is captured here as data: a route through space, an
//! opacity ramp and a handful of tuning constants.

use crate::constants::*;
use crate::easing::{ease_in_quad, ease_out_quad};
use crate::timeline::WindowPhase;
use fnv::{FnvHashMap, FnvHashSet};
use glam::{Vec2, Vec3};
use std::cell::RefCell;
use std::f32::consts::PI;
use std::fmt;
use std::str::FromStr;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AnimationKind {
    LeftToCenter,
    RightToCenter,
    ZoomThrough,
    CurveZoom,
    ScatterToForm,
    RotateInPlace,
}

impl AnimationKind {
    pub const ALL: [AnimationKind; 6] = [
        AnimationKind::LeftToCenter,
        AnimationKind::RightToCenter,
        AnimationKind::ZoomThrough,
        AnimationKind::CurveZoom,
        AnimationKind::ScatterToForm,
        AnimationKind::RotateInPlace,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AnimationKind::LeftToCenter => "left-to-center",
            AnimationKind::RightToCenter => "right-to-center",
            AnimationKind::ZoomThrough => "zoom-through",
            AnimationKind::CurveZoom => "curve-zoom",
            AnimationKind::ScatterToForm => "scatter-to-form",
            AnimationKind::RotateInPlace => "rotate-in-place",
        }
    }
}

impl fmt::Display for AnimationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AnimationKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AnimationKind::ALL
            .into_iter()
            .find(|k| k.as_str() == s)
            .ok_or_else(|| format!("unknown animation kind '{s}'"))
    }
}

/// How a section moves over its local timeline.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Choreography {
    /// Straight (or arced) path from one point to another.
    Sweep,
    /// Enter, hold at centre, exit. Used for model-derived shapes on a
    /// directional kind.
    Staged,
    /// Fixed placement; the points themselves morph.
    Morph,
    /// Drift in place while growing.
    Spin,
}

impl Choreography {
    pub fn for_shape(kind: AnimationKind, is_model: bool) -> Self {
        match (kind, is_model) {
            (AnimationKind::ScatterToForm, _) => Choreography::Morph,
            (AnimationKind::RotateInPlace, _) => Choreography::Spin,
            (_, true) => Choreography::Staged,
            (_, false) => Choreography::Sweep,
        }
    }
}

/// Tuning constants for one choreography.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct KindPolicy {
    pub preview_cap: f32,
    pub smoothing: f32,
    pub opacity_smoothing: f32,
    /// Idle rotation, radians per second about x and y.
    pub spin: Vec2,
    /// Extra rotation once a morph is more than half formed.
    pub morph_spin: Vec2,
    pub base_scale: f32,
}

impl KindPolicy {
    /// Policy for a choreography. Models spinning in place use their own
    /// scale and a slower tumble about x.
    pub fn for_shape(choreography: Choreography, is_model: bool) -> Self {
        let policy = Self::for_choreography(choreography);
        match choreography {
            Choreography::Spin if is_model => KindPolicy {
                spin: Vec2::from(MODEL_SPIN),
                base_scale: MODEL_SCALE,
                ..policy
            },
            _ => policy,
        }
    }

    pub fn for_choreography(choreography: Choreography) -> Self {
        let base = KindPolicy {
            preview_cap: PREVIEW_CAP,
            smoothing: SWEEP_SMOOTHING,
            opacity_smoothing: OPACITY_SMOOTHING,
            spin: Vec2::from(SWEEP_SPIN),
            morph_spin: Vec2::ZERO,
            base_scale: PRIMITIVE_SCALE,
        };
        match choreography {
            Choreography::Sweep => base,
            Choreography::Spin => KindPolicy {
                spin: Vec2::from(GLOBE_SPIN),
                ..base
            },
            Choreography::Morph => KindPolicy {
                preview_cap: MORPH_PREVIEW_CAP,
                spin: Vec2::ZERO,
                morph_spin: Vec2::from(MORPH_SPIN),
                base_scale: 1.0,
                ..base
            },
            Choreography::Staged => KindPolicy {
                smoothing: STAGED_SMOOTHING,
                spin: Vec2::from(STAGED_SPIN),
                base_scale: MODEL_SCALE,
                ..base
            },
        }
    }
}

/// Full opacity until `start`, then `1 - (t - start) * rate`, clamped.
/// Rates are tuned per kind and need not land exactly on 0 at t = 1.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TailFade {
    pub start: f32,
    pub rate: f32,
}

impl TailFade {
    pub const fn new(start: f32, rate: f32) -> Self {
        Self { start, rate }
    }

    pub fn opacity(&self, t: f32) -> f32 {
        if t <= self.start {
            1.0
        } else {
            (1.0 - (t - self.start) * self.rate).clamp(0.0, 1.0)
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SweepRoute {
    pub from: Vec3,
    pub to: Vec3,
    /// Peak of the `sin(pi * t)` swing added to y.
    pub arc_height: f32,
    /// Fraction of the base scale added by the end of the section.
    pub scale_growth: f32,
    pub fade: TailFade,
}

impl SweepRoute {
    pub fn line(from: Vec3, to: Vec3, fade: TailFade) -> Self {
        Self {
            from,
            to,
            arc_height: 0.0,
            scale_growth: 0.0,
            fade,
        }
    }

    pub fn position(&self, t: f32) -> Vec3 {
        let mut p = self.from.lerp(self.to, t);
        p.y += (PI * t).sin() * self.arc_height;
        p
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StagedRoute {
    pub wait: Vec3,
    pub center: Vec3,
    pub exit: Vec3,
}

impl Default for StagedRoute {
    fn default() -> Self {
        Self {
            wait: DEFAULT_WAIT_POSITION,
            center: DEFAULT_CENTER_POSITION,
            exit: DEFAULT_EXIT_POSITION,
        }
    }
}

/// Route tables keyed by animation kind.
#[derive(Debug)]
pub struct MotionTable {
    sweeps: FnvHashMap<AnimationKind, SweepRoute>,
    staged: FnvHashMap<AnimationKind, StagedRoute>,
    warned: RefCell<FnvHashSet<(AnimationKind, bool)>>,
}

impl Clone for MotionTable {
    fn clone(&self) -> Self {
        Self {
            sweeps: self.sweeps.clone(),
            staged: self.staged.clone(),
            warned: RefCell::default(),
        }
    }
}

impl Default for MotionTable {
    fn default() -> Self {
        use AnimationKind::*;
        let v = Vec3::new;
        let fade = TailFade::new;
        let mut table = Self::empty();
        table.insert_sweep(
            LeftToCenter,
            SweepRoute::line(v(-5.0, -2.0, 2.0), v(-3.0, -0.5, 2.0), fade(0.9, 10.0)),
        );
        table.insert_sweep(
            RightToCenter,
            SweepRoute::line(v(5.0, -2.0, 2.0), v(3.0, -0.5, 2.0), fade(0.9, 10.0)),
        );
        table.insert_sweep(
            ZoomThrough,
            SweepRoute::line(v(0.0, 0.0, 15.0), v(0.0, 0.0, -15.0), fade(0.7, 3.3)),
        );
        table.insert_sweep(
            CurveZoom,
            SweepRoute {
                arc_height: 4.0,
                ..SweepRoute::line(v(6.0, -3.0, 2.0), v(-2.0, -3.0, 7.0), fade(0.85, 6.7))
            },
        );
        table.insert_sweep(
            RotateInPlace,
            SweepRoute {
                scale_growth: SPIN_SCALE_GROWTH,
                ..SweepRoute::line(v(0.0, 0.0, 5.0), v(0.0, 0.0, 3.0), fade(0.9, 10.0))
            },
        );

        // scatter-to-form and rotate-in-place never take a staged route
        let center = DEFAULT_CENTER_POSITION;
        let staged = [
            (LeftToCenter, v(-5.0, -2.0, 2.0), v(5.0, 2.0, 2.0)),
            (RightToCenter, v(5.0, -2.0, 2.0), v(-5.0, 2.0, 2.0)),
            (ZoomThrough, v(0.0, 0.0, 15.0), v(0.0, 0.0, -10.0)),
            (CurveZoom, v(6.0, -3.0, 2.0), v(-6.0, 3.0, 7.0)),
        ];
        for (kind, wait, exit) in staged {
            table.insert_staged(kind, StagedRoute { wait, center, exit });
        }
        table
    }
}

impl MotionTable {
    pub fn empty() -> Self {
        Self {
            sweeps: FnvHashMap::default(),
            staged: FnvHashMap::default(),
            warned: RefCell::default(),
        }
    }

    pub fn insert_sweep(&mut self, kind: AnimationKind, route: SweepRoute) {
        self.sweeps.insert(kind, route);
    }

    pub fn insert_staged(&mut self, kind: AnimationKind, route: StagedRoute) {
        self.staged.insert(kind, route);
    }

    fn gap(&self, kind: AnimationKind, staged: bool) {
        if self.warned.borrow_mut().insert((kind, staged)) {
            let table = if staged { "staged" } else { "sweep" };
            log::warn!("no {table} route for '{kind}'; using the default offscreen route");
        }
    }

    pub fn sweep_route(&self, kind: AnimationKind) -> SweepRoute {
        match self.sweeps.get(&kind) {
            Some(route) => *route,
            None => {
                self.gap(kind, false);
                SweepRoute::line(
                    DEFAULT_WAIT_POSITION,
                    DEFAULT_CENTER_POSITION,
                    TailFade::new(0.9, 10.0),
                )
            }
        }
    }

    pub fn staged_route(&self, kind: AnimationKind) -> StagedRoute {
        match self.staged.get(&kind) {
            Some(route) => *route,
            None => {
                self.gap(kind, true);
                StagedRoute::default()
            }
        }
    }

    pub fn resolve(&self, kind: AnimationKind, is_model: bool) -> ResolvedMotion {
        let choreography = Choreography::for_shape(kind, is_model);
        let path = match choreography {
            Choreography::Sweep | Choreography::Spin => MotionPath::Sweep(self.sweep_route(kind)),
            Choreography::Staged => MotionPath::Staged(self.staged_route(kind)),
            Choreography::Morph => MotionPath::Morph,
        };
        ResolvedMotion {
            kind,
            choreography,
            policy: KindPolicy::for_shape(choreography, is_model),
            path,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum MotionPath {
    Sweep(SweepRoute),
    Staged(StagedRoute),
    /// Held at the origin; the point buffer carries the world placement.
    Morph,
}

/// Where a section wants to be this frame, before smoothing.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MotionTarget {
    pub position: Vec3,
    pub scale: f32,
    pub opacity: f32,
    pub morph: Option<f32>,
}

/// A kind bound to its route and policy.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ResolvedMotion {
    pub kind: AnimationKind,
    pub choreography: Choreography,
    pub policy: KindPolicy,
    pub path: MotionPath,
}

impl ResolvedMotion {
    /// Resting placement before the section starts.
    pub fn wait_position(&self) -> Vec3 {
        match self.path {
            MotionPath::Sweep(route) => route.position(0.0),
            MotionPath::Staged(route) => route.wait,
            MotionPath::Morph => Vec3::ZERO,
        }
    }

    /// Target for a window phase; `None` while inactive.
    pub fn evaluate(&self, phase: WindowPhase) -> Option<MotionTarget> {
        match phase {
            WindowPhase::Inactive => None,
            WindowPhase::Preview(p) => Some(MotionTarget {
                position: self.wait_position(),
                scale: self.policy.base_scale,
                opacity: p * self.policy.preview_cap,
                morph: self.is_morph().then_some(0.0),
            }),
            WindowPhase::Active(t) => Some(self.active(t)),
        }
    }

    pub fn is_morph(&self) -> bool {
        matches!(self.path, MotionPath::Morph)
    }

    fn active(&self, t: f32) -> MotionTarget {
        let scale = self.policy.base_scale;
        match self.path {
            MotionPath::Sweep(route) => MotionTarget {
                position: route.position(t),
                scale: scale * (1.0 + route.scale_growth * t),
                opacity: route.fade.opacity(t),
                morph: None,
            },
            MotionPath::Staged(route) => {
                let (position, opacity) = staged_at(&route, t);
                MotionTarget {
                    position,
                    scale,
                    opacity,
                    morph: None,
                }
            }
            MotionPath::Morph => MotionTarget {
                position: Vec3::ZERO,
                scale,
                opacity: morph_opacity(t),
                morph: Some(morph_progress(t)),
            },
        }
    }
}

fn staged_at(route: &StagedRoute, t: f32) -> (Vec3, f32) {
    let enter = STAGED_ENTER_RATIO;
    let hold_end = STAGED_ENTER_RATIO + STAGED_HOLD_RATIO;
    if t < enter {
        let e = ease_out_quad(t / enter);
        (route.wait.lerp(route.center, e), e)
    } else if t < hold_end {
        (route.center, 1.0)
    } else {
        let x = ((t - hold_end) / (1.0 - hold_end)).clamp(0.0, 1.0);
        let e = ease_in_quad(x);
        (route.center.lerp(route.exit, e), 1.0 - e)
    }
}

/// Fade in over the scatter phase, hold while forming, fade out at the end.
pub fn morph_opacity(t: f32) -> f32 {
    if t < MORPH_FADE_IN_END {
        t / MORPH_FADE_IN_END
    } else if t <= MORPH_FADE_OUT_START {
        1.0
    } else {
        TailFade::new(MORPH_FADE_OUT_START, MORPH_FADE_OUT_RATE).opacity(t)
    }
}

/// 0 while scattered, linear 0..1 across the hold, then held at 1.
pub fn morph_progress(t: f32) -> f32 {
    if t < MORPH_FADE_IN_END {
        0.0
    } else {
        ((t - MORPH_FADE_IN_END) / (MORPH_FADE_OUT_START - MORPH_FADE_IN_END)).min(1.0)
    }
}
