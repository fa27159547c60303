//! Pointer press/drag state machine.

use super::params::SharedParams;
use super::pointer::PointerTracker;
use super::registry::BlobRegistry;
use crate::camera::PerspectiveCamera;
use crate::core::BlobId;

/// Drag state: either nothing is held, or one blob follows the pointer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DragState {
    Idle,
    Dragging(BlobId),
}

/// Decides what a pointer press means: grab the blob under the cursor, or
/// spawn a new one at the clicked point.
///
/// The drag selection is a weak id handle, not an owning reference. If the
/// dragged blob is removed out from under it, `resolve` collapses the state
/// back to idle instead of updating a dead blob.
pub struct InteractionController {
    state: DragState,
}

impl Default for InteractionController {
    fn default() -> Self {
        Self::new()
    }
}

impl InteractionController {
    /// Create an idle controller.
    pub fn new() -> Self {
        Self { state: DragState::Idle }
    }

    /// Handle a pointer press. A hit on an existing blob starts a drag; a
    /// miss spawns a new blob at the placement point.
    pub fn pointer_pressed(
        &mut self,
        tracker: &PointerTracker,
        camera: &mut PerspectiveCamera,
        registry: &mut BlobRegistry,
        params: SharedParams,
    ) {
        match tracker.hit_test(camera, registry) {
            Some(id) => {
                log::debug!("drag start on blob {id}");
                self.state = DragState::Dragging(id);
            }
            None => {
                let point = tracker.placement_point(camera);
                registry.append(point, params);
                self.state = DragState::Idle;
            }
        }
    }

    /// Handle a pointer release: any active drag ends.
    pub fn pointer_released(&mut self) {
        if let DragState::Dragging(id) = self.state {
            log::debug!("drag end on blob {id}");
        }
        self.state = DragState::Idle;
    }

    /// The blob currently being dragged, if it is still alive. A selection
    /// pointing at a removed blob is cleared here.
    pub fn resolve(&mut self, registry: &BlobRegistry) -> Option<BlobId> {
        if let DragState::Dragging(id) = self.state {
            if registry.contains(id) {
                return Some(id);
            }
            self.state = DragState::Idle;
        }
        None
    }

    /// True if a drag is active (without checking liveness).
    pub fn is_dragging(&self) -> bool {
        matches!(self.state, DragState::Dragging(_))
    }
}
