// Host-side tests for the procedural point generators.

use pointscroll_core::generators::*;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::f32::consts::TAU;

fn rng() -> StdRng {
    StdRng::seed_from_u64(42)
}

#[test]
fn every_geometry_returns_exactly_count_points() {
    let mut rng = rng();
    for geometry in [
        Geometry::Box,
        Geometry::Sphere,
        Geometry::Torus,
        Geometry::Octahedron,
        Geometry::Cone,
    ] {
        for count in [0, 1, 1000] {
            let cloud = generate(geometry, count, &mut rng);
            assert_eq!(cloud.len(), count, "{geometry:?} with count {count}");
            assert_eq!(cloud.as_slice().len(), count * 3);
        }
    }
}

#[test]
fn geometry_parses_from_tags() {
    assert_eq!("torus".parse::<Geometry>(), Ok(Geometry::Torus));
    assert_eq!("cone".parse::<Geometry>(), Ok(Geometry::Cone));
    assert!("teapot".parse::<Geometry>().is_err());
}

#[test]
fn sphere_steps_by_the_golden_angle() {
    let n = 200;
    let cloud = sphere_points(n);
    let step = (golden_angle(1) % std::f64::consts::TAU) as f32;
    for i in 1..n - 1 {
        let a = cloud.point(i);
        let b = cloud.point(i + 1);
        let diff = (b.y.atan2(b.x) - a.y.atan2(a.x)).rem_euclid(TAU);
        let err = (diff - step).abs().min(TAU - (diff - step).abs());
        assert!(err < 1e-3, "step {i}: got {diff}, expected {step}");
    }
}

#[test]
fn sphere_is_deterministic_and_on_the_surface() {
    let a = sphere_points(500);
    let b = sphere_points(500);
    assert_eq!(a, b);
    for p in a.iter() {
        assert!((p.length() - 0.5).abs() < 1e-4, "radius {}", p.length());
    }
}

#[test]
fn box_faces_are_equally_likely() {
    let count = 60_000;
    let cloud = box_points(count, &mut rng());
    let mut faces = [0usize; 6];
    for p in cloud.iter() {
        let on_face: Vec<usize> = (0..3).filter(|&axis| (p[axis].abs() - 0.5).abs() < 1e-6).collect();
        assert!(!on_face.is_empty(), "point {p} is not on a face");
        let axis = on_face[0];
        faces[axis * 2 + usize::from(p[axis] < 0.0)] += 1;
    }
    let expected = count as f32 / 6.0;
    for (face, n) in faces.iter().enumerate() {
        let ratio = *n as f32 / expected;
        assert!((ratio - 1.0).abs() < 0.05, "face {face}: {n} points");
    }
}

#[test]
fn cone_puts_thirty_percent_on_the_base() {
    let count = 50_000;
    let cloud = cone_points(count, &mut rng());
    let base_y = -CONE_HEIGHT / 2.0;
    let on_base = cloud.iter().filter(|p| p.y == base_y).count();
    let share = on_base as f32 / count as f32;
    assert!((share - CONE_BASE_SHARE).abs() < 0.02, "base share {share}");
    for p in cloud.iter() {
        let radial = (p.x * p.x + p.z * p.z).sqrt();
        let max_r = CONE_RADIUS * (1.0 - (p.y - base_y) / CONE_HEIGHT);
        assert!(radial <= max_r + 1e-4, "point {p} outside the cone");
    }
}

#[test]
fn torus_points_satisfy_the_implicit_equation() {
    let (big, small) = (0.5, 0.2);
    let cloud = torus_points(2000, big, small, &mut rng());
    for p in cloud.iter() {
        let ring = (p.x * p.x + p.y * p.y).sqrt() - big;
        let lhs = ring * ring + p.z * p.z;
        assert!((lhs - small * small).abs() < 1e-4, "point {p}: {lhs}");
    }
}

#[test]
fn octahedron_points_lie_on_the_l1_sphere() {
    let cloud = octahedron_points(2000, &mut rng());
    for p in cloud.iter() {
        let l1 = p.x.abs() + p.y.abs() + p.z.abs();
        assert!((l1 - OCTAHEDRON_EXTENT).abs() < 1e-4, "point {p}: {l1}");
    }
}

#[test]
fn scattered_points_fill_the_requested_box() {
    let range = glam::Vec3::new(20.0, 15.0, 10.0);
    let cloud = scattered_points(3000, range, 5.0, &mut rng());
    let bounds = cloud.bounds().expect("non-empty");
    assert!(bounds.min.x >= -10.0 && bounds.max.x <= 10.0);
    assert!(bounds.min.y >= -7.5 && bounds.max.y <= 7.5);
    assert!(bounds.min.z >= 0.0 && bounds.max.z <= 10.0);
}

#[test]
fn continent_counts_sum_exactly() {
    for count in [0, 1, 7, 999, 3800, 3801] {
        let counts = continent_counts(count);
        assert_eq!(counts.iter().sum::<usize>(), count, "count {count}");
    }
    let shares: f32 = CONTINENTS.iter().map(|c| c.share).sum();
    assert!((shares - 1.0).abs() < 1e-5);
}

#[test]
fn globe_layers_have_matching_colors() {
    let [body, grid, glow] = globe_layers(3800, 500, &mut rng());
    assert_eq!(body.len(), 3800);
    assert_eq!(body.colors.len(), 3800 * 3);
    assert_eq!(grid.len(), 5 * 120 + 12 * 61);
    assert_eq!(grid.colors.len(), grid.len() * 3);
    assert_eq!(glow.len(), 500);
    for p in glow.positions.iter() {
        let r = p.length();
        assert!((0.52..=0.57 + 1e-5).contains(&r), "glow radius {r}");
    }
    for p in body.positions.iter() {
        assert!((p.length() - 0.5).abs() < 0.01, "continent radius {}", p.length());
    }
}

#[test]
fn lat_lon_maps_poles_and_equator() {
    let north = lat_lon_to_xyz(90.0, 0.0, 1.0);
    assert!((north.y - 1.0).abs() < 1e-6);
    let equator = lat_lon_to_xyz(0.0, -180.0, 1.0);
    assert!((equator.x + 1.0).abs() < 1e-6, "{equator}");
    assert!(equator.y.abs() < 1e-6);
}
