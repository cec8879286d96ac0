// Host-side tests for the background field, scroll hint and intro cluster.

use pointscroll_core::ambient::*;
use pointscroll_core::ParticleBudget;
use rand::rngs::StdRng;
use rand::SeedableRng;

const DT: f32 = 1.0 / 60.0;
const INTRO_END: f32 = 0.1;

fn rng() -> StdRng {
    StdRng::seed_from_u64(3)
}

#[test]
fn fade_progress_is_clamped() {
    assert_eq!(fade_progress(0.0, INTRO_END), 0.0);
    assert!((fade_progress(0.05, INTRO_END) - 0.5).abs() < 1e-6);
    assert_eq!(fade_progress(0.7, INTRO_END), 1.0);
    assert_eq!(fade_progress(0.0, 0.0), 1.0);
}

#[test]
fn background_turns_slowly_and_never_fades() {
    let mut field = BackgroundField::new(&BackgroundConfig::default(), ParticleBudget::FULL, &mut rng());
    assert_eq!(field.len(), 200);
    for _ in 0..60 {
        field.update(DT);
    }
    assert!((field.transform().rotation.y - 0.02).abs() < 1e-5);
    assert_eq!(field.view().opacity, 0.6);

    field.release();
    assert!(field.is_empty());
}

#[test]
fn hint_has_eighty_particles_and_holds_still_at_the_top() {
    let mut rng = rng();
    let mut hint = ScrollHint::new(HintConfig::default(), INTRO_END, &mut rng);
    assert_eq!(hint.len(), 80);
    assert_eq!(hint.points().len(), 80);
    for _ in 0..120 {
        hint.update(0.0, DT, &mut rng);
    }
    assert!((hint.opacity() - 0.8).abs() < 1e-5);

    // stem particles only bounce vertically
    let stem = hint.points().point(79);
    assert_eq!(stem.x, 0.0);
    assert_eq!(stem.z, 3.0);
}

#[test]
fn hint_drifts_away_once_scrolling_starts() {
    let mut rng = rng();
    let mut hint = ScrollHint::new(HintConfig::default(), INTRO_END, &mut rng);
    hint.update(0.0, DT, &mut rng);
    let before = hint.points().point(79);
    for _ in 0..60 {
        hint.update(0.2, DT, &mut rng);
    }
    let after = hint.points().point(79);
    // one second of full fade: -3 in y, -5 in z, plus the bounce
    assert!((after.z - (before.z - 5.0)).abs() < 1e-3, "z {}", after.z);
    assert!(after.y < before.y - 2.5);
    assert!(hint.opacity() < 0.01);
}

#[test]
fn intro_cluster_scatters_and_shrinks() {
    let specs = IntroSpec::stock();
    let mut intro = IntroCluster::new(&specs, ParticleBudget::FULL, INTRO_END, &mut rng());
    assert_eq!(intro.len(), 5);
    assert_eq!(intro.views().map(|v| v.positions.len()).sum::<usize>(), 9300);

    for _ in 0..400 {
        intro.update(1.0, DT);
    }
    for (i, spec) in specs.iter().enumerate() {
        let t = intro.transform(i).expect("member");
        let target = spec.initial + spec.direction;
        assert!(t.position.distance(target) < 1e-3, "member {i} at {}", t.position);
        assert!((t.scale - 0.6 * 0.2).abs() < 1e-4);
        assert!(intro.opacity(i).expect("member") < 1e-4);
    }

    intro.release();
    assert!(intro.is_empty());
    assert_eq!(intro.views().count(), 0);
}
