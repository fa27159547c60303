//! End-to-end simulation scenarios, run without a GPU.

use gloop::camera::PerspectiveCamera;
use gloop::math::{Color, Vector3};
use gloop::sim::{shared, Params, Simulation, INTERACTION_DEPTH};

fn camera() -> PerspectiveCamera {
    let mut camera = PerspectiveCamera::new(60.0, 16.0 / 9.0, 0.1, 100.0);
    camera.set_position(Vector3::new(0.0, 0.0, 10.0));
    camera.set_target(Vector3::ZERO);
    camera
}

#[test]
fn two_blobs_stay_at_equilibrium() {
    let mut camera = camera();
    let mut sim = Simulation::new(shared(Params::default()));

    let left = sim.spawn_at(Vector3::new(-2.0, 0.0, 0.0));
    let right = sim.spawn_at(Vector3::new(2.0, 0.0, 0.0));

    // Park the pointer far outside every blob's reach.
    sim.pointer_moved(0.0, 0.0, 1280.0, 720.0);

    for _ in 0..10 {
        sim.step(0.016, &mut camera);
    }

    for id in [left, right] {
        let blob = sim.registry.get(id).unwrap();
        for (p, r) in blob.positions().iter().zip(blob.rest_positions()) {
            assert!(
                (p - r).abs() < 1e-4,
                "blob {id} drifted from rest: {p} vs {r}"
            );
        }
    }
}

#[test]
fn pointer_near_blob_deforms_it_without_diverging() {
    let mut camera = camera();
    let mut sim = Simulation::new(shared(Params {
        repulsion_force: 0.5,
        spring_stiffness: 0.4,
        mouse_radius: 3.0,
        ..Params::default()
    }));

    // The pointer target at the interaction depth is (0, 0, 2); put the blob
    // right under it.
    let id = sim.spawn_at(Vector3::new(0.0, 0.0, 2.0));
    sim.pointer_moved(640.0, 360.0, 1280.0, 720.0);
    let target = sim.tracker.project_to_depth(&mut camera, INTERACTION_DEPTH);
    assert!(target.approx_eq(&Vector3::new(0.0, 0.0, 2.0), 1e-3));

    for _ in 0..30 {
        sim.step(0.016, &mut camera);
    }

    let deformed: f32 = {
        let blob = sim.registry.get(id).unwrap();
        blob.positions()
            .iter()
            .zip(blob.rest_positions())
            .map(|(p, r)| (p - r).abs())
            .fold(0.0, f32::max)
    };
    assert!(deformed > 1e-4, "pointer proximity should deform the blob");

    // Move the pointer away and keep stepping: with no damping the springs
    // oscillate, but the motion must stay finite and bounded.
    sim.pointer_moved(0.0, 0.0, 1280.0, 720.0);
    for _ in 0..2000 {
        sim.step(0.016, &mut camera);
    }

    let blob = sim.registry.get(id).unwrap();
    let residual: f32 = blob
        .positions()
        .iter()
        .zip(blob.rest_positions())
        .map(|(p, r)| (p - r).abs())
        .fold(0.0, f32::max);
    assert!(residual.is_finite());
    assert!(residual < 10.0, "springs must not diverge: {residual}");
}

#[test]
fn color_edits_reach_existing_blobs_before_next_frame() {
    let mut sim = Simulation::new(shared(Params::default()));
    sim.spawn_at(Vector3::new(-2.0, 0.0, 0.0));
    sim.spawn_at(Vector3::new(2.0, 0.0, 0.0));

    let fresh = Color::from_hex(0x00ffaa);
    sim.params.borrow_mut().color1 = fresh;

    for blob in sim.registry.iter() {
        let (c1, _) = blob.colors();
        assert!(c1.approx_eq(&fresh, 1e-6));
    }
}

#[test]
fn drag_follows_pointer_and_release_lets_go() {
    let mut camera = camera();
    let mut sim = Simulation::new(shared(Params::default()));
    let id = sim.spawn_at(Vector3::ZERO);

    // Grab the blob through the screen center, then pull right.
    sim.pointer_pressed(640.0, 360.0, 1280.0, 720.0, &mut camera);
    sim.pointer_moved(1000.0, 360.0, 1280.0, 720.0);

    for _ in 0..60 {
        sim.step(0.016, &mut camera);
    }

    let dragged_to = sim.registry.get(id).unwrap().position();
    let target = sim.tracker.project_to_depth(&mut camera, INTERACTION_DEPTH);
    assert!(dragged_to.x > 0.1, "blob should chase the pointer");
    assert!(dragged_to.distance_to(&target) < 0.1);

    // After release the blob stops following.
    sim.pointer_released();
    sim.pointer_moved(100.0, 360.0, 1280.0, 720.0);
    for _ in 0..10 {
        sim.step(0.016, &mut camera);
    }
    let after_release = sim.registry.get(id).unwrap().position();
    assert!(after_release.approx_eq(&dragged_to, 1e-4));
}

#[test]
fn spawned_blob_size_tracks_parameter_at_creation_time() {
    let mut sim = Simulation::new(shared(Params {
        blob_size: 0.5,
        ..Params::default()
    }));

    let small = sim.spawn_at(Vector3::ZERO);
    sim.params.borrow_mut().blob_size = 2.0;
    let large = sim.spawn_at(Vector3::new(3.0, 0.0, 0.0));

    assert_eq!(sim.registry.get(small).unwrap().size(), 0.5);
    assert_eq!(sim.registry.get(large).unwrap().size(), 2.0);
}
