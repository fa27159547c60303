//! Ordered collection of live blobs.

use super::blob::Blob;
use super::params::SharedParams;
use crate::core::BlobId;
use crate::math::Vector3;

/// The set of live blobs, in insertion order. Insertion order is render and
/// update order; it only matters for "remove the most recent".
///
/// GPU resources for a blob are owned by the renderer and keyed by id, so
/// dropping a blob here detaches it from the scene on the next frame.
#[derive(Default)]
pub struct BlobRegistry {
    blobs: Vec<Blob>,
}

impl BlobRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self { blobs: Vec::new() }
    }

    /// Create a blob at a world position and add it to the registry.
    /// Returns the new blob's id.
    pub fn append(&mut self, position: Vector3, params: SharedParams) -> BlobId {
        let blob = Blob::new(position, params);
        let id = blob.id();
        log::debug!("blob {id} spawned at ({:.2}, {:.2}, {:.2})", position.x, position.y, position.z);
        self.blobs.push(blob);
        id
    }

    /// Remove the most recently added blob. No-op on an empty registry.
    pub fn remove_last(&mut self) -> Option<BlobId> {
        let id = self.blobs.pop().map(|b| b.id());
        if let Some(id) = id {
            log::debug!("blob {id} removed");
        }
        id
    }

    /// Remove every blob.
    pub fn clear_all(&mut self) {
        if !self.blobs.is_empty() {
            log::debug!("clearing {} blobs", self.blobs.len());
        }
        self.blobs.clear();
    }

    /// Number of live blobs.
    #[inline]
    pub fn len(&self) -> usize {
        self.blobs.len()
    }

    /// True if there are no blobs.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.blobs.is_empty()
    }

    /// Look up a blob by id.
    pub fn get(&self, id: BlobId) -> Option<&Blob> {
        self.blobs.iter().find(|b| b.id() == id)
    }

    /// Look up a blob by id, mutably.
    pub fn get_mut(&mut self, id: BlobId) -> Option<&mut Blob> {
        self.blobs.iter_mut().find(|b| b.id() == id)
    }

    /// True if a blob with this id is live.
    pub fn contains(&self, id: BlobId) -> bool {
        self.blobs.iter().any(|b| b.id() == id)
    }

    /// Iterate the blobs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Blob> {
        self.blobs.iter()
    }

    /// Iterate the blobs mutably, in insertion order.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Blob> {
        self.blobs.iter_mut()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::params::{shared, Params};

    #[test]
    fn test_append_then_remove_restores_length() {
        let params = shared(Params::default());
        let mut registry = BlobRegistry::new();
        registry.append(Vector3::ZERO, params.clone());
        let before = registry.len();

        let id = registry.append(Vector3::new(1.0, 0.0, 0.0), params);
        assert_eq!(registry.len(), before + 1);
        assert!(registry.contains(id));

        let removed = registry.remove_last();
        assert_eq!(removed, Some(id));
        assert_eq!(registry.len(), before);
        assert!(!registry.contains(id));
    }

    #[test]
    fn test_remove_last_on_empty_is_noop() {
        let mut registry = BlobRegistry::new();
        assert!(registry.remove_last().is_none());
        assert!(registry.is_empty());
    }

    #[test]
    fn test_clear_all() {
        let params = shared(Params::default());
        let mut registry = BlobRegistry::new();
        for i in 0..3 {
            registry.append(Vector3::new(i as f32, 0.0, 0.0), params.clone());
        }
        registry.clear_all();
        assert!(registry.is_empty());
        // Clearing an empty registry is a no-op, not an error.
        registry.clear_all();
    }

    #[test]
    fn test_insertion_order_preserved() {
        let params = shared(Params::default());
        let mut registry = BlobRegistry::new();
        let a = registry.append(Vector3::ZERO, params.clone());
        let b = registry.append(Vector3::ZERO, params.clone());
        let c = registry.append(Vector3::ZERO, params);

        let order: Vec<_> = registry.iter().map(|blob| blob.id()).collect();
        assert_eq!(order, vec![a, b, c]);
        assert_eq!(registry.remove_last(), Some(c));
        assert_eq!(registry.remove_last(), Some(b));
        assert_eq!(registry.remove_last(), Some(a));
    }
}
