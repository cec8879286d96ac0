//! Procedural point sets for the primitive shapes.
//!
//! Every primitive lives in a shape-local frame centred on the origin with a
//! half-extent of roughly 0.5. The box, torus and cone distributions are not
//! area-uniform; visual tuning relies on that bias, so keep it.

use crate::constants::{GLOBE_RADIUS, TORUS_MAIN_RADIUS, TORUS_TUBE_RADIUS};
use crate::points::{ColoredPoints, PointCloud};
use glam::Vec3;
use rand::Rng;
use std::f32::consts::TAU;
use std::str::FromStr;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Geometry {
    Box,
    Sphere,
    Torus,
    Octahedron,
    Cone,
}

impl FromStr for Geometry {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "box" => Ok(Self::Box),
            "sphere" => Ok(Self::Sphere),
            "torus" => Ok(Self::Torus),
            "octahedron" => Ok(Self::Octahedron),
            "cone" => Ok(Self::Cone),
            other => Err(format!("unknown geometry '{other}'")),
        }
    }
}

pub const CONE_HEIGHT: f32 = 0.8;
pub const CONE_RADIUS: f32 = 0.4;
pub const CONE_BASE_SHARE: f32 = 0.3;
pub const OCTAHEDRON_EXTENT: f32 = 0.6;

const OCTAHEDRON_VERTICES: [Vec3; 6] = [
    Vec3::new(0.0, OCTAHEDRON_EXTENT, 0.0),
    Vec3::new(0.0, -OCTAHEDRON_EXTENT, 0.0),
    Vec3::new(OCTAHEDRON_EXTENT, 0.0, 0.0),
    Vec3::new(-OCTAHEDRON_EXTENT, 0.0, 0.0),
    Vec3::new(0.0, 0.0, OCTAHEDRON_EXTENT),
    Vec3::new(0.0, 0.0, -OCTAHEDRON_EXTENT),
];

const OCTAHEDRON_FACES: [[usize; 3]; 8] = [
    [0, 2, 4],
    [0, 4, 3],
    [0, 3, 5],
    [0, 5, 2],
    [1, 4, 2],
    [1, 3, 4],
    [1, 5, 3],
    [1, 2, 5],
];

/// Generate exactly `count` points on the surface of `geometry`.
pub fn generate<R: Rng + ?Sized>(geometry: Geometry, count: usize, rng: &mut R) -> PointCloud {
    match geometry {
        Geometry::Box => box_points(count, rng),
        Geometry::Sphere => sphere_points(count),
        Geometry::Torus => torus_points(count, TORUS_MAIN_RADIUS, TORUS_TUBE_RADIUS, rng),
        Geometry::Octahedron => octahedron_points(count, rng),
        Geometry::Cone => cone_points(count, rng),
    }
}

pub fn box_points<R: Rng + ?Sized>(count: usize, rng: &mut R) -> PointCloud {
    PointCloud::from_points((0..count).map(|_| {
        let face = rng.gen_range(0..6);
        let u = rng.gen::<f32>() - 0.5;
        let v = rng.gen::<f32>() - 0.5;
        match face {
            0 => Vec3::new(0.5, u, v),
            1 => Vec3::new(-0.5, u, v),
            2 => Vec3::new(u, 0.5, v),
            3 => Vec3::new(u, -0.5, v),
            4 => Vec3::new(u, v, 0.5),
            _ => Vec3::new(u, v, -0.5),
        }
    }))
}

/// Golden-angle spiral: deterministic for a given count.
pub fn sphere_points(count: usize) -> PointCloud {
    sphere_points_with_radius(count, 0.5)
}

/// Azimuth of the `i`-th spiral point before wrapping into [0, 2π).
#[inline]
pub fn golden_angle(i: usize) -> f64 {
    std::f64::consts::PI * (1.0 + 5.0_f64.sqrt()) * i as f64
}

fn sphere_points_with_radius(count: usize, r: f32) -> PointCloud {
    let n = count as f64;
    PointCloud::from_points((0..count).map(|i| {
        // f64 keeps the azimuth accurate once i grows large
        let phi = (1.0 - 2.0 * (i as f64 + 0.5) / n).acos();
        let theta = golden_angle(i) % std::f64::consts::TAU;
        let (sp, cp) = (phi.sin() as f32, phi.cos() as f32);
        let (st, ct) = (theta.sin() as f32, theta.cos() as f32);
        Vec3::new(r * sp * ct, r * sp * st, r * cp)
    }))
}

/// Two independent uniform angles. Points bunch on the inner and outer rims.
pub fn torus_points<R: Rng + ?Sized>(
    count: usize,
    main_radius: f32,
    tube_radius: f32,
    rng: &mut R,
) -> PointCloud {
    PointCloud::from_points((0..count).map(|_| {
        let u = rng.gen::<f32>() * TAU;
        let v = rng.gen::<f32>() * TAU;
        let ring = main_radius + tube_radius * v.cos();
        Vec3::new(ring * u.cos(), ring * u.sin(), tube_radius * v.sin())
    }))
}

pub fn octahedron_points<R: Rng + ?Sized>(count: usize, rng: &mut R) -> PointCloud {
    PointCloud::from_points((0..count).map(|_| {
        let [a, b, c] = OCTAHEDRON_FACES[rng.gen_range(0..8)];
        let u = rng.gen::<f32>();
        let v = rng.gen::<f32>() * (1.0 - u);
        let w = 1.0 - u - v;
        OCTAHEDRON_VERTICES[a] * u + OCTAHEDRON_VERTICES[b] * v + OCTAHEDRON_VERTICES[c] * w
    }))
}

/// 30% of points on the base disk, the rest on the lateral surface.
pub fn cone_points<R: Rng + ?Sized>(count: usize, rng: &mut R) -> PointCloud {
    let base_y = -CONE_HEIGHT / 2.0;
    PointCloud::from_points((0..count).map(|_| {
        if rng.gen::<f32>() < CONE_BASE_SHARE {
            let r = rng.gen::<f32>().sqrt() * CONE_RADIUS;
            let theta = rng.gen::<f32>() * TAU;
            Vec3::new(r * theta.cos(), base_y, r * theta.sin())
        } else {
            let h = rng.gen::<f32>();
            let r = CONE_RADIUS * (1.0 - h);
            let theta = rng.gen::<f32>() * TAU;
            Vec3::new(r * theta.cos(), base_y + h * CONE_HEIGHT, r * theta.sin())
        }
    }))
}

/// Uniform points in an axis-aligned box of size `range`, shifted along z.
pub fn scattered_points<R: Rng + ?Sized>(
    count: usize,
    range: Vec3,
    z_offset: f32,
    rng: &mut R,
) -> PointCloud {
    PointCloud::from_points((0..count).map(|_| {
        Vec3::new(
            (rng.gen::<f32>() - 0.5) * range.x,
            (rng.gen::<f32>() - 0.5) * range.y,
            (rng.gen::<f32>() - 0.5) * range.z + z_offset,
        )
    }))
}

// ---------------- Globe composite ----------------

pub struct Continent {
    pub name: &'static str,
    pub lon: (f32, f32),
    pub lat: (f32, f32),
    pub share: f32,
}

pub const CONTINENTS: [Continent; 6] = [
    Continent { name: "north-america", lon: (-130.0, -60.0), lat: (25.0, 70.0), share: 0.21 },
    Continent { name: "south-america", lon: (-80.0, -35.0), lat: (-55.0, 12.0), share: 0.13 },
    Continent { name: "europe", lon: (-10.0, 40.0), lat: (35.0, 70.0), share: 0.11 },
    Continent { name: "africa", lon: (-20.0, 50.0), lat: (-35.0, 35.0), share: 0.16 },
    Continent { name: "asia", lon: (40.0, 150.0), lat: (5.0, 75.0), share: 0.31 },
    Continent { name: "oceania", lon: (110.0, 155.0), lat: (-45.0, -10.0), share: 0.08 },
];

const GRID_COLOR: [f32; 3] = [0.2, 0.5, 0.3];

pub fn lat_lon_to_xyz(lat: f32, lon: f32, radius: f32) -> Vec3 {
    let phi = (90.0 - lat).to_radians();
    let theta = (lon + 180.0).to_radians();
    Vec3::new(
        -radius * phi.sin() * theta.cos(),
        radius * phi.cos(),
        radius * phi.sin() * theta.sin(),
    )
}

/// Per-continent point counts: `floor(count * share)`, with the rounding loss
/// handed to the largest continent so the total is exactly `count`.
pub fn continent_counts(count: usize) -> [usize; 6] {
    let mut counts = CONTINENTS.map(|c| (count as f32 * c.share).floor() as usize);
    let assigned: usize = counts.iter().sum();
    let largest = CONTINENTS
        .iter()
        .enumerate()
        .max_by(|a, b| a.1.share.total_cmp(&b.1.share))
        .map(|(i, _)| i)
        .unwrap_or(0);
    if assigned <= count {
        counts[largest] += count - assigned;
    } else {
        counts[largest] = counts[largest].saturating_sub(assigned - count);
    }
    counts
}

pub fn continent_points<R: Rng + ?Sized>(count: usize, rng: &mut R) -> ColoredPoints {
    let mut positions = Vec::with_capacity(count);
    let mut colors = Vec::with_capacity(count * 3);
    for (continent, n) in CONTINENTS.iter().zip(continent_counts(count)) {
        for _ in 0..n {
            let lon = continent.lon.0 + rng.gen::<f32>() * (continent.lon.1 - continent.lon.0);
            let lat = continent.lat.0 + rng.gen::<f32>() * (continent.lat.1 - continent.lat.0);
            let jitter = Vec3::new(
                (rng.gen::<f32>() - 0.5) * 0.01,
                (rng.gen::<f32>() - 0.5) * 0.01,
                (rng.gen::<f32>() - 0.5) * 0.01,
            );
            positions.push(lat_lon_to_xyz(lat, lon, GLOBE_RADIUS) + jitter);
            let brightness = 0.8 + rng.gen::<f32>() * 0.2;
            colors.extend_from_slice(&[brightness, brightness, brightness]);
        }
    }
    ColoredPoints::from_parts(positions, colors)
}

/// Latitude rings every 30° (±60°) and meridians every 30°, sampled every 3°.
pub fn grid_points(radius: f32) -> ColoredPoints {
    let r = radius * 1.01;
    let mut positions = Vec::new();
    for lat in (-60..=60).step_by(30) {
        for lon in (0..360).step_by(3) {
            positions.push(lat_lon_to_xyz(lat as f32, lon as f32, r));
        }
    }
    for lon in (0..360).step_by(30) {
        for lat in (-90..=90).step_by(3) {
            positions.push(lat_lon_to_xyz(lat as f32, lon as f32, r));
        }
    }
    let colors = GRID_COLOR.repeat(positions.len());
    ColoredPoints::from_parts(positions, colors)
}

/// Thin shell just outside the globe surface.
pub fn glow_points<R: Rng + ?Sized>(count: usize, radius: f32, rng: &mut R) -> ColoredPoints {
    let mut positions = Vec::with_capacity(count);
    let mut colors = Vec::with_capacity(count * 3);
    for _ in 0..count {
        let theta = rng.gen::<f32>() * TAU;
        let phi = (2.0 * rng.gen::<f32>() - 1.0).clamp(-1.0, 1.0).acos();
        let r = radius + 0.02 + rng.gen::<f32>() * 0.05;
        positions.push(Vec3::new(
            r * phi.sin() * theta.cos(),
            r * phi.sin() * theta.sin(),
            r * phi.cos(),
        ));
        colors.extend_from_slice(&[
            0.5 + rng.gen::<f32>() * 0.3,
            0.9,
            0.7 + rng.gen::<f32>() * 0.3,
        ]);
    }
    ColoredPoints::from_parts(positions, colors)
}

/// The three globe layers in draw order: continents, grid, glow.
pub fn globe_layers<R: Rng + ?Sized>(
    continent_count: usize,
    glow_count: usize,
    rng: &mut R,
) -> [ColoredPoints; 3] {
    [
        continent_points(continent_count, rng),
        grid_points(GLOBE_RADIUS),
        glow_points(glow_count, GLOBE_RADIUS, rng),
    ]
}
