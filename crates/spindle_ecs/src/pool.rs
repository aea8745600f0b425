// pool.rs - Type-erased pool interface

use std::any::Any;

use crate::component::Component;
use crate::entity::EntityId;
use crate::sparse_set::SparseSet;

/// The capability surface the registry needs from a pool when the component
/// type is not statically known, i.e. during the entity-destruction sweep.
pub trait ErasedPool {
    /// Membership test, forwarded to the pool's typed [`SparseSet::has`].
    fn has_entity(&self, entity: EntityId) -> bool;

    /// Removal, forwarded to the pool's typed [`SparseSet::remove`].
    fn remove_entity(&mut self, entity: EntityId) -> bool;

    /// Typed access for the registry, which knows the concrete component
    /// type behind each type key.
    fn as_any(&self) -> &dyn Any;

    /// Mutable variant of [`as_any`](Self::as_any).
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T> ErasedPool for SparseSet<T>
where
    T: Component,
{
    fn has_entity(&self, entity: EntityId) -> bool {
        self.has(entity)
    }

    fn remove_entity(&mut self, entity: EntityId) -> bool {
        self.remove(entity)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
