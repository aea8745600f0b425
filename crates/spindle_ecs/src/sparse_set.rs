// sparse_set.rs - Generic sparse-set component pool
//
// One pool stores every instance of a single component type. A sparse index
// array maps entity ids to rows in parallel dense arrays; removal swaps the
// vacated row with the last one, so the dense arrays never hold gaps.

use crate::entity::EntityId;
use crate::error::contract;

/// Dense storage for all values of one component type.
///
/// Capacity is fixed at construction: ids in `[0, max_entities)` are
/// addressable, and every operation on an id outside that range is a
/// contract violation. The sparse slot value `max_entities - 1` doubles as
/// the "no component" sentinel, which makes that specific id ambiguous for a
/// pool used standalone; a [`Registry`](crate::Registry) never mints it.
///
/// Iteration walks the dense rows in storage order. Removal reorders rows
/// (swap-to-last-then-pop), so no ordering is guaranteed across mutations,
/// and a pool must not be mutated while an iteration over it is in progress.
pub struct SparseSet<T> {
    max_entities: usize,
    /// One slot per possible id: a dense row index, or the sentinel.
    sparse: Vec<EntityId>,
    /// Dense rows: `entities[i]` owns `values[i]`.
    entities: Vec<EntityId>,
    values: Vec<T>,
}

impl<T> SparseSet<T> {
    /// Creates a pool addressing ids in `[0, max_entities)`.
    pub fn new(max_entities: usize) -> Self {
        contract!(max_entities >= 1, "sparse set capacity must be at least 1");
        Self {
            max_entities,
            sparse: vec![(max_entities - 1) as EntityId; max_entities],
            entities: Vec::new(),
            values: Vec::new(),
        }
    }

    fn sentinel(&self) -> EntityId {
        (self.max_entities - 1) as EntityId
    }

    /// Returns `true` if `entity` owns a value in this pool.
    pub fn has(&self, entity: EntityId) -> bool {
        contract!(
            (entity as usize) < self.max_entities,
            "entity id {entity} out of range (capacity {})",
            self.max_entities
        );
        self.sparse[entity as usize] != self.sentinel()
    }

    /// Stores `value` for `entity` and returns a reference to the stored
    /// value.
    ///
    /// Idempotent: if the entity already owns a value, that value is
    /// returned untouched and the incoming `value` is dropped.
    pub fn add(&mut self, entity: EntityId, value: T) -> &mut T {
        if self.has(entity) {
            let index = self.sparse[entity as usize] as usize;
            return &mut self.values[index];
        }

        let index = self.values.len();
        self.entities.push(entity);
        self.values.push(value);
        self.sparse[entity as usize] = index as EntityId;
        &mut self.values[index]
    }

    /// Returns the value owned by `entity`.
    ///
    /// Fatal when the entity owns none; this path is expected to run after a
    /// membership check and stays branch-free on success.
    pub fn get(&self, entity: EntityId) -> &T {
        contract!(self.has(entity), "entity {entity} has no component in this pool");
        &self.values[self.sparse[entity as usize] as usize]
    }

    /// Mutable variant of [`get`](Self::get), under the same contract.
    pub fn get_mut(&mut self, entity: EntityId) -> &mut T {
        contract!(self.has(entity), "entity {entity} has no component in this pool");
        let index = self.sparse[entity as usize] as usize;
        &mut self.values[index]
    }

    /// Removes the value owned by `entity`.
    ///
    /// Returns `false` without effect when the entity owns none. Otherwise
    /// the last dense row is swapped into the vacated slot and the sparse
    /// slot of the moved row's owner is updated to its new index.
    pub fn remove(&mut self, entity: EntityId) -> bool {
        if !self.has(entity) {
            return false;
        }

        let index = self.sparse[entity as usize] as usize;
        self.entities.swap_remove(index);
        self.values.swap_remove(index);
        if index < self.entities.len() {
            // The previous last row now lives at `index`.
            self.sparse[self.entities[index] as usize] = index as EntityId;
        }
        self.sparse[entity as usize] = self.sentinel();
        true
    }

    /// Number of values currently stored.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns `true` if no entity owns a value in this pool.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Number of addressable ids, fixed at construction.
    pub fn capacity(&self) -> usize {
        self.max_entities
    }

    /// Iterates the dense rows as `(entity, value)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (EntityId, &T)> {
        self.entities.iter().copied().zip(self.values.iter())
    }

    /// Mutable variant of [`iter`](Self::iter).
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (EntityId, &mut T)> {
        self.entities.iter().copied().zip(self.values.iter_mut())
    }

    /// Dense ids, in storage order.
    pub fn entities(&self) -> &[EntityId] {
        &self.entities
    }

    /// Dense values, in storage order.
    pub fn values(&self) -> &[T] {
        &self.values
    }

    /// Mutable variant of [`values`](Self::values).
    pub fn values_mut(&mut self) -> &mut [T] {
        &mut self.values
    }
}

impl<'a, T> IntoIterator for &'a SparseSet<T> {
    type Item = (EntityId, &'a T);
    type IntoIter =
        std::iter::Zip<std::iter::Copied<std::slice::Iter<'a, EntityId>>, std::slice::Iter<'a, T>>;

    fn into_iter(self) -> Self::IntoIter {
        self.entities.iter().copied().zip(self.values.iter())
    }
}

impl<'a, T> IntoIterator for &'a mut SparseSet<T> {
    type Item = (EntityId, &'a mut T);
    type IntoIter = std::iter::Zip<
        std::iter::Copied<std::slice::Iter<'a, EntityId>>,
        std::slice::IterMut<'a, T>,
    >;

    fn into_iter(self) -> Self::IntoIter {
        self.entities.iter().copied().zip(self.values.iter_mut())
    }
}
