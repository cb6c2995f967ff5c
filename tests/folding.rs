use glam::Vec3;
use origami_engine::config::{FoldSpec, SceneConfig};
use origami_engine::sim::{Fold, FoldSequence};
use origami_engine::world::Region;
use origami_engine::{FoldEvent, FoldPhase, Simulation};
use pretty_assertions::assert_eq;
use proptest::prelude::*;

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn small_scene() -> SceneConfig {
    let mut config = SceneConfig::default();
    config.mesh.subdivisions = 10;
    config.particles.count = 4;
    config
}

fn run_until_complete(sim: &mut Simulation, dt: f64, max_steps: usize) -> Vec<(f64, FoldEvent)> {
    let mut events = Vec::new();
    for _ in 0..max_steps {
        if let Some(e) = sim.step(dt) {
            events.push((sim.clock().now(), e));
        }
        if sim.phase() == FoldPhase::Complete {
            break;
        }
    }
    events
}

#[test]
fn full_sequence_reaches_every_target() {
    init_logger();
    let mut sim = Simulation::new(SceneConfig::default()).unwrap();
    sim.start_folding();
    let events = run_until_complete(&mut sim, 1.0 / 64.0, 10_000);

    assert_eq!(sim.phase(), FoldPhase::Complete);
    assert_eq!(events.last().map(|(_, e)| *e), Some(FoldEvent::Completed));
    for fold in sim.folds().iter() {
        assert_eq!(fold.angle, fold.target);
        assert!(fold.active);
    }

    // Completed is terminal until the next start signal
    let mesh = sim.frame().mesh.to_vec();
    for _ in 0..32 {
        assert_eq!(sim.step(1.0 / 64.0), None);
    }
    assert_eq!(sim.frame().mesh, &mesh[..]);
}

#[test]
fn flaps_lift_off_the_table() {
    let mut sim = Simulation::new(SceneConfig::default()).unwrap();
    sim.start_folding();
    run_until_complete(&mut sim, 1.0 / 64.0, 10_000);

    let find = |target: Vec3| {
        sim.original_positions()
            .iter()
            .position(|p| (*p - target).length() < 1e-6)
            .unwrap()
    };

    // left petal tip swings up around its hinge at x = -0.12
    let tip = sim.frame().mesh[find(Vec3::new(-0.25, 0.0, 0.0))];
    assert!((tip - Vec3::new(-0.185, 0.1126, 0.0)).length() < 1e-3, "{tip:?}");

    // corner flap folds straight up over its diagonal hinge
    let corner = sim.frame().mesh[find(Vec3::new(-0.25, 0.0, 0.25))];
    assert!((corner - Vec3::new(-0.05, 0.2828, 0.05)).length() < 1e-3, "{corner:?}");

    // the centre never moves
    let centre = find(Vec3::ZERO);
    assert_eq!(sim.frame().mesh[centre], Vec3::ZERO);
}

#[test]
fn settled_steps_hold_exact_targets() {
    let mut sim = Simulation::new(small_scene()).unwrap();
    sim.start_folding();
    let mut settled = 0;
    for _ in 0..4000 {
        if let Some(FoldEvent::Settled(_)) = sim.step(1.0 / 60.0) {
            settled += 1;
            for fold in sim.folds().iter().filter(|f| f.active) {
                assert_eq!(fold.angle, fold.target);
            }
        }
        if sim.phase() == FoldPhase::Complete {
            break;
        }
    }
    assert_eq!(settled, 8);
}

#[test]
fn next_fold_waits_for_settle_delay() {
    let mut config = small_scene();
    // fold 0 settles on the first tick
    config.folds[0].speed = 1000.0;
    let mut sim = Simulation::new(config).unwrap();

    sim.start_folding();
    let started = sim.clock().now();
    let mut settled_at = None;
    let mut activated_at = None;

    for _ in 0..100 {
        match sim.step(0.125) {
            Some(FoldEvent::Settled(0)) => settled_at = Some(sim.clock().now()),
            Some(FoldEvent::Advanced(1)) => {
                activated_at = Some(sim.clock().now());
                break;
            }
            _ => assert!(!sim.folds().get(1).unwrap().active),
        }
    }

    assert_eq!(sim.clock().delta(), 0.125);
    let settled_at = settled_at.unwrap();
    let activated_at = activated_at.unwrap();
    assert_eq!(settled_at - started, 0.125);
    assert!(activated_at - started >= 1.0);
    assert!(activated_at - settled_at >= 1.0);
    assert!(activated_at - settled_at < 1.0 + 0.125 + 1e-9);
}

#[test]
fn restart_resets_every_fold() {
    let mut sim = Simulation::new(small_scene()).unwrap();
    sim.start_folding();
    for _ in 0..400 {
        sim.step(1.0 / 60.0);
    }
    assert!(matches!(sim.phase(), FoldPhase::Running(i) if i > 0));

    sim.start_folding();
    assert_eq!(sim.phase(), FoldPhase::Running(0));
    assert_eq!(sim.animator().settled_at(), None);
    for (i, fold) in sim.folds().iter().enumerate() {
        assert_eq!(fold.angle, 0.0);
        assert_eq!(fold.active, i == 0);
    }

    // restart after completion too
    run_until_complete(&mut sim, 1.0 / 32.0, 10_000);
    assert_eq!(sim.phase(), FoldPhase::Complete);
    sim.start_folding();
    assert_eq!(sim.phase(), FoldPhase::Running(0));
}

#[test]
fn deform_is_deterministic_and_membership_stable() {
    let mut sim = Simulation::new(small_scene()).unwrap();
    sim.start_folding();
    for _ in 0..300 {
        sim.step(1.0 / 60.0);
    }
    assert!(sim.folds().iter().any(|f| f.angle != 0.0));

    let a = sim.recompute_mesh();
    let b = sim.recompute_mesh();
    assert_eq!(a, b);
    assert_eq!(&a[..], sim.frame().mesh);

    // vertices no fold claims never move
    let claimed: Vec<bool> = (0..a.len())
        .map(|i| sim.groups().iter().any(|g| g.contains(&(i as u32))))
        .collect();
    for (i, p) in sim.original_positions().iter().enumerate() {
        if !claimed[i] {
            assert_eq!(a[i], *p);
        }
    }
}

#[test]
fn shadow_tracks_mesh() {
    let mut config = small_scene();
    config.light.position = Vec3::new(0.0, 2.0, 0.0);
    config.shadow.plane_y = -0.5;
    let mut sim = Simulation::new(config).unwrap();
    sim.step(0.5);

    let frame = sim.frame();
    assert_eq!(frame.shadow.len(), frame.mesh.len());
    assert!(frame.shadow.iter().all(|p| p.is_finite() && p.y == -0.5));

    // flat paper at y = 0 under a light at height 2 casts a 1.25x shadow
    let i = sim.original_positions().iter().position(|p| *p == Vec3::new(0.25, 0.0, 0.25)).unwrap();
    assert!((frame.shadow[i] - Vec3::new(0.3125, -0.5, 0.3125)).length() < 1e-6);
}

#[test]
fn malformed_folds_never_run() {
    let mut config = small_scene();
    config.folds[0].pivot = Vec3::new(f32::NAN, 0.0, 0.0);
    assert!(Simulation::new(config).is_err());

    let src = "[[fold]]\naxis = [0.0, 0.0, 0.0]\npivot = [0.0, 0.0, 0.0]\ntarget_angle = 1.0\nspeed = 1.0\n";
    let toml_err = SceneConfig::from_toml_str(src).and_then(Simulation::new);
    assert!(toml_err.is_err());
}

proptest! {
    #[test]
    fn angle_approaches_monotonically(
        target in prop_oneof![-3.0f32..-0.01, 0.01f32..3.0],
        speed in 0.1f32..5.0,
        dts in proptest::collection::vec(0.0001f32..0.5, 1..200),
    ) {
        let spec = FoldSpec { axis: Vec3::Y, pivot: Vec3::ZERO, target_angle: target, speed, region: Region::All };
        let mut fold = Fold::from_spec(0, &spec).unwrap();
        let mut prev = fold.angle;
        for dt in dts {
            fold.advance(dt);
            prop_assert!(fold.angle.abs() <= target.abs());
            prop_assert!((fold.angle - prev) * target.signum() >= 0.0);
            prop_assert!((fold.angle - prev).abs() <= speed * dt + 1e-5);
            prev = fold.angle;
        }
    }

    #[test]
    fn sequence_rejects_only_degenerate_axes(x in -1.0f32..1.0, y in -1.0f32..1.0, z in -1.0f32..1.0) {
        let axis = Vec3::new(x, y, z);
        let spec = FoldSpec { axis, pivot: Vec3::ZERO, target_angle: 1.0, speed: 1.0, region: Region::All };
        let result = FoldSequence::new(&[spec]);
        prop_assert_eq!(result.is_ok(), axis.length() >= 1e-6);
        if let Ok(seq) = result {
            prop_assert!((seq.get(0).unwrap().axis.length() - 1.0).abs() < 1e-4);
        }
    }
}
