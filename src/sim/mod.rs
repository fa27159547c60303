//! # Simulation Module
//!
//! The GPU-free heart of the toy: parameters, blob physics, the blob
//! registry, pointer tracking and the drag state machine, tied together by
//! [`Simulation::step`].

mod blob;
mod interaction;
mod params;
mod pointer;
mod registry;

pub use blob::{Blob, BLOB_SEGMENTS};
pub use interaction::InteractionController;
pub use params::{
    shared, ConfigError, Params, SharedParams, BLOB_SIZE_RANGE, MOUSE_RADIUS_RANGE,
    REPULSION_FORCE_RANGE, SPRING_STIFFNESS_RANGE,
};
pub use pointer::{PointerTracker, INTERACTION_DEPTH};
pub use registry::BlobRegistry;

use crate::camera::PerspectiveCamera;
use crate::core::BlobId;
use crate::math::Vector3;

/// Per-frame interpolation factor pulling a dragged blob toward the pointer.
/// A damped approach rather than physics integration.
pub const DRAG_LERP: f32 = 0.1;

/// The whole simulation state: shared parameters, live blobs, pointer
/// tracking and drag selection. One `step` per displayed frame.
pub struct Simulation {
    /// Shared parameter store.
    pub params: SharedParams,
    /// Live blobs in insertion order.
    pub registry: BlobRegistry,
    /// Pointer NDC tracking and projection.
    pub tracker: PointerTracker,
    /// Press/drag state machine.
    pub controller: InteractionController,
}

impl Simulation {
    /// Create an empty simulation around a parameter store.
    pub fn new(params: SharedParams) -> Self {
        Self {
            params,
            registry: BlobRegistry::new(),
            tracker: PointerTracker::new(),
            controller: InteractionController::new(),
        }
    }

    /// Spawn a blob at a world position (panel "add" action and startup).
    pub fn spawn_at(&mut self, position: Vector3) -> BlobId {
        self.registry.append(position, self.params.clone())
    }

    /// Track a pointer move. Only the NDC coordinates change; no state
    /// transition happens until the next press.
    pub fn pointer_moved(&mut self, x: f32, y: f32, width: f32, height: f32) {
        self.tracker.set_from_screen(x, y, width, height);
    }

    /// Handle a pointer press at screen coordinates: grab the blob under the
    /// cursor or spawn a new one.
    pub fn pointer_pressed(
        &mut self,
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        camera: &mut PerspectiveCamera,
    ) {
        self.tracker.set_from_screen(x, y, width, height);
        self.controller.pointer_pressed(
            &self.tracker,
            camera,
            &mut self.registry,
            self.params.clone(),
        );
    }

    /// Handle a pointer release: end any drag.
    pub fn pointer_released(&mut self) {
        self.controller.pointer_released();
    }

    /// Advance every blob by one frame.
    ///
    /// All physics completes before the caller submits the render pass. The
    /// pointer target at the fixed interaction depth is handed to every blob
    /// except the dragged one, which instead gets no external force and is
    /// interpolated toward the target directly.
    pub fn step(&mut self, dt: f32, camera: &mut PerspectiveCamera) {
        let target = self.tracker.project_to_depth(camera, INTERACTION_DEPTH);
        let dragged = self.controller.resolve(&self.registry);

        for blob in self.registry.iter_mut() {
            let external = if Some(blob.id()) == dragged {
                None
            } else {
                Some(target)
            };
            blob.update(dt, external);
        }

        if let Some(id) = dragged {
            if let Some(blob) = self.registry.get_mut(id) {
                if target.is_finite() {
                    let next = blob.position().lerp(&target, DRAG_LERP);
                    blob.set_position(next);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::Vector3;

    fn camera() -> PerspectiveCamera {
        let mut camera = PerspectiveCamera::new(60.0, 16.0 / 9.0, 0.1, 100.0);
        camera.set_position(Vector3::new(0.0, 0.0, 10.0));
        camera.set_target(Vector3::ZERO);
        camera
    }

    #[test]
    fn test_dragged_blob_gets_no_external_force() {
        let mut camera = camera();
        let mut sim = Simulation::new(shared(Params {
            // A strong pull well inside range, stiffness off so any velocity
            // must come from the pointer force.
            repulsion_force: 2.0,
            mouse_radius: 3.0,
            spring_stiffness: 0.0,
            ..Params::default()
        }));

        let dragged = sim.spawn_at(Vector3::ZERO);
        let bystander = sim.spawn_at(Vector3::new(1.5, 0.0, 0.0));

        // Press at screen center: the ray hits the blob at the origin.
        sim.pointer_pressed(640.0, 360.0, 1280.0, 720.0, &mut camera);
        assert_eq!(sim.controller.resolve(&sim.registry), Some(dragged));

        sim.step(0.016, &mut camera);

        let dragged_vel: f32 = sim
            .registry
            .get(dragged)
            .unwrap()
            .velocities()
            .iter()
            .map(|v| v.abs())
            .sum();
        let bystander_vel: f32 = sim
            .registry
            .get(bystander)
            .unwrap()
            .velocities()
            .iter()
            .map(|v| v.abs())
            .sum();

        assert_eq!(dragged_vel, 0.0);
        assert!(bystander_vel > 0.0);
    }

    #[test]
    fn test_drag_lerps_toward_pointer() {
        let mut camera = camera();
        let mut sim = Simulation::new(shared(Params::default()));
        let id = sim.spawn_at(Vector3::ZERO);

        sim.pointer_pressed(640.0, 360.0, 1280.0, 720.0, &mut camera);
        // Move the pointer off-center and step: the blob chases it.
        sim.pointer_moved(960.0, 360.0, 1280.0, 720.0);
        let target = sim.tracker.project_to_depth(&mut camera, INTERACTION_DEPTH);
        sim.step(0.016, &mut camera);

        let position = sim.registry.get(id).unwrap().position();
        let expected = Vector3::ZERO.lerp(&target, DRAG_LERP);
        assert!(position.approx_eq(&expected, 1e-5));
    }

    #[test]
    fn test_drag_of_removed_blob_is_ignored() {
        let mut camera = camera();
        let mut sim = Simulation::new(shared(Params::default()));
        sim.spawn_at(Vector3::ZERO);

        sim.pointer_pressed(640.0, 360.0, 1280.0, 720.0, &mut camera);
        assert!(sim.controller.is_dragging());

        sim.registry.clear_all();
        // Stepping with a dangling selection must not panic or resurrect it.
        sim.step(0.016, &mut camera);
        assert!(!sim.controller.is_dragging());
    }

    #[test]
    fn test_press_on_empty_space_spawns() {
        let mut camera = camera();
        let mut sim = Simulation::new(shared(Params::default()));

        sim.pointer_pressed(100.0, 100.0, 1280.0, 720.0, &mut camera);
        assert_eq!(sim.registry.len(), 1);
        assert!(!sim.controller.is_dragging());

        // The new blob sits on the placement plane through the origin.
        let blob = sim.registry.iter().next().unwrap();
        assert!(blob.position().z.abs() < 1e-3);
    }
}
