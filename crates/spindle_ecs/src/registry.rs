// registry.rs - Entity lifecycle and per-type pool routing

use std::any::{type_name, TypeId};
use std::collections::hash_map::Entry;
use std::collections::HashMap;

use tracing::{debug, trace};

use crate::component::Component;
use crate::entity::EntityId;
use crate::error::{contract, RegistryError};
use crate::fetch::ComponentSet;
use crate::pool::ErasedPool;
use crate::sparse_set::SparseSet;

/// Owner of entity lifecycle and of one [`SparseSet`] pool per component
/// type.
///
/// Pools are created lazily on the first operation naming their type and
/// live until the registry is dropped; the registry owns them exclusively.
/// Entity ids are recycled: destroying an entity queues its id for reuse,
/// and creation prefers the most recently queued id over minting a new
/// sequential one.
pub struct Registry {
    max_entities: usize,
    next_entity: EntityId,
    free_entities: Vec<EntityId>,
    pools: HashMap<TypeId, Box<dyn ErasedPool>>,
}

impl Registry {
    /// Creates a registry addressing ids in `[0, max_entities)`.
    ///
    /// The capacity is fixed for the registry's lifetime. Capacities below 2
    /// are rejected (the top slot is reserved as the pools' sentinel), as
    /// are capacities whose sentinel does not fit the configured
    /// [`EntityId`] width.
    pub fn new(max_entities: usize) -> Result<Self, RegistryError> {
        if max_entities < 2 {
            return Err(RegistryError::CapacityTooSmall {
                requested: max_entities,
            });
        }
        if EntityId::try_from(max_entities - 1).is_err() {
            return Err(RegistryError::CapacityOverflow {
                requested: max_entities,
            });
        }

        trace!(max_entities, "registry created");
        Ok(Self {
            max_entities,
            next_entity: 0,
            free_entities: Vec::new(),
            pools: HashMap::new(),
        })
    }

    /// Number of addressable ids, fixed at construction.
    pub fn capacity(&self) -> usize {
        self.max_entities
    }

    /// Creates an entity and returns its id.
    ///
    /// A recycled id is returned when one is available (most recently
    /// destroyed first); otherwise the next sequential id is minted. Fatal
    /// when the sequential counter would reach `max_entities - 1`, the id
    /// reserved as the pools' sentinel.
    pub fn create_entity(&mut self) -> EntityId {
        let id = match self.free_entities.pop() {
            Some(id) => id,
            None => {
                contract!(
                    (self.next_entity as usize) + 1 < self.max_entities,
                    "maximum entity count {} reached",
                    self.max_entities
                );
                let id = self.next_entity;
                self.next_entity += 1;
                id
            }
        };
        trace!(entity = id, "entity created");
        id
    }

    /// Destroys `entity`: queues its id for reuse, then removes its data
    /// from every pool through the type-erased sweep.
    ///
    /// Liveness is not validated. Destroying the same id twice queues it
    /// twice, after which two live entities can end up sharing one id;
    /// callers own that invariant.
    pub fn destroy_entity(&mut self, entity: EntityId) {
        contract!(
            (entity as usize) < self.max_entities,
            "entity id {entity} out of range (capacity {})",
            self.max_entities
        );

        self.free_entities.push(entity);
        for pool in self.pools.values_mut() {
            pool.remove_entity(entity);
        }
        trace!(entity, "entity destroyed");
    }

    /// Attaches `value` to `entity`, creating the pool for its type on
    /// first use.
    ///
    /// Idempotent like [`SparseSet::add`]: an already-attached value is
    /// returned untouched and the incoming `value` is dropped.
    pub fn add_component<T: Component>(&mut self, entity: EntityId, value: T) -> &mut T {
        contract!(
            (entity as usize) < self.max_entities,
            "entity id {entity} out of range (capacity {})",
            self.max_entities
        );
        self.pool::<T>().add(entity, value)
    }

    /// Returns the component of type `T` attached to `entity`.
    ///
    /// Fatal when no pool for `T` exists or the entity has no value in it.
    pub fn get_component<T: Component>(&self, entity: EntityId) -> &T {
        contract!(
            (entity as usize) < self.max_entities,
            "entity id {entity} out of range (capacity {})",
            self.max_entities
        );
        match self.try_pool::<T>() {
            Some(pool) => pool.get(entity),
            None => crate::error::fatal(&format!(
                "no pool for component type {}",
                type_name::<T>()
            )),
        }
    }

    /// Mutable variant of [`get_component`](Self::get_component), under the
    /// same contract.
    pub fn get_component_mut<T: Component>(&mut self, entity: EntityId) -> &mut T {
        contract!(
            (entity as usize) < self.max_entities,
            "entity id {entity} out of range (capacity {})",
            self.max_entities
        );
        match self.try_pool_mut::<T>() {
            Some(pool) => pool.get_mut(entity),
            None => crate::error::fatal(&format!(
                "no pool for component type {}",
                type_name::<T>()
            )),
        }
    }

    /// Fetches several component types at once, in the requested order.
    ///
    /// ```
    /// # use spindle_ecs::Registry;
    /// # struct Position(f32);
    /// # struct Velocity(f32);
    /// # let mut registry = Registry::new(16).unwrap();
    /// # let e = registry.create_entity();
    /// # registry.add_component(e, Position(0.0));
    /// # registry.add_component(e, Velocity(1.0));
    /// let (position, velocity) = registry.get_components::<(Position, Velocity)>(e);
    /// ```
    pub fn get_components<'a, S>(&'a self, entity: EntityId) -> S::Refs
    where
        S: ComponentSet<'a>,
    {
        S::fetch(self, entity)
    }

    /// Detaches the component of type `T` from `entity`.
    ///
    /// Returns `false` when no pool for `T` exists yet or the entity had no
    /// value in it.
    pub fn remove_component<T: Component>(&mut self, entity: EntityId) -> bool {
        contract!(
            (entity as usize) < self.max_entities,
            "entity id {entity} out of range (capacity {})",
            self.max_entities
        );
        match self.try_pool_mut::<T>() {
            Some(pool) => pool.remove(entity),
            None => false,
        }
    }

    /// Returns `true` if `entity` has a component of type `T`.
    ///
    /// `false` for types no operation has named yet.
    pub fn has_component<T: Component>(&self, entity: EntityId) -> bool {
        contract!(
            (entity as usize) < self.max_entities,
            "entity id {entity} out of range (capacity {})",
            self.max_entities
        );
        self.try_pool::<T>()
            .map(|pool| pool.has(entity))
            .unwrap_or(false)
    }

    /// Returns `true` if `entity` has every component type in `S`,
    /// short-circuiting on the first absence.
    pub fn has_components<'a, S>(&'a self, entity: EntityId) -> bool
    where
        S: ComponentSet<'a>,
    {
        S::all_present(self, entity)
    }

    /// The iteration hook: exposes the dense pool for `T`, creating it on
    /// first use.
    ///
    /// Per-frame update logic iterates the returned pool directly; when and
    /// in what order that happens is the caller's concern. Do not add or
    /// remove values of `T` while iterating the returned pool.
    pub fn pool<T: Component>(&mut self) -> &mut SparseSet<T> {
        let max_entities = self.max_entities;
        let pool = match self.pools.entry(TypeId::of::<T>()) {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => {
                debug!(component = type_name::<T>(), "component pool created");
                entry.insert(Box::new(SparseSet::<T>::new(max_entities)))
            }
        };
        pool.as_any_mut().downcast_mut().expect("downcast error")
    }

    /// Read-only companion to [`pool`](Self::pool): `None` until the pool
    /// for `T` exists.
    pub fn try_pool<T: Component>(&self) -> Option<&SparseSet<T>> {
        let pool = self.pools.get(&TypeId::of::<T>())?;
        Some(pool.as_any().downcast_ref().expect("downcast error"))
    }

    fn try_pool_mut<T: Component>(&mut self) -> Option<&mut SparseSet<T>> {
        let pool = self.pools.get_mut(&TypeId::of::<T>())?;
        Some(pool.as_any_mut().downcast_mut().expect("downcast error"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, Copy, Debug, PartialEq)]
    struct Position {
        x: i32,
        y: i32,
    }

    #[derive(Clone, Copy, Debug, PartialEq)]
    struct Velocity {
        x: i32,
        y: i32,
    }

    #[derive(Clone, Copy, Debug, PartialEq)]
    struct Health {
        value: i32,
    }

    #[test]
    fn rejects_degenerate_capacities() {
        assert!(matches!(
            Registry::new(0),
            Err(RegistryError::CapacityTooSmall { requested: 0 })
        ));
        assert!(matches!(
            Registry::new(1),
            Err(RegistryError::CapacityTooSmall { requested: 1 })
        ));
        assert_eq!(Registry::new(2).unwrap().capacity(), 2);
    }

    #[test]
    fn sequential_ids_then_lifo_recycling() {
        let mut registry = Registry::new(16).unwrap();
        let e0 = registry.create_entity();
        let e1 = registry.create_entity();
        let e2 = registry.create_entity();
        assert_eq!((e0, e1, e2), (0, 1, 2));

        registry.destroy_entity(e0);
        registry.destroy_entity(e2);

        // Most recently destroyed comes back first.
        assert_eq!(registry.create_entity(), e2);
        assert_eq!(registry.create_entity(), e0);
        assert_eq!(registry.create_entity(), 3);
    }

    #[test]
    #[should_panic]
    fn sequential_counter_exhaustion_is_fatal() {
        let mut registry = Registry::new(2).unwrap();
        registry.create_entity();
        registry.create_entity();
    }

    #[test]
    fn attach_query_detach_scenario() {
        let mut registry = Registry::new(4).unwrap();
        let e0 = registry.create_entity();
        let e1 = registry.create_entity();
        let e2 = registry.create_entity();

        registry.add_component(e0, Position { x: 1, y: 2 });
        registry.add_component(e1, Position { x: 3, y: 4 });

        assert!(!registry.has_component::<Position>(e2));
        assert!(registry.remove_component::<Position>(e0));
        assert!(!registry.has_component::<Position>(e0));
        assert_eq!(*registry.get_component::<Position>(e1), Position { x: 3, y: 4 });
    }

    #[test]
    fn destroy_purges_every_pool_and_recycles_the_id() {
        let mut registry = Registry::new(8).unwrap();
        let e0 = registry.create_entity();
        let e1 = registry.create_entity();

        registry.add_component(e0, Position { x: 0, y: 0 });
        registry.add_component(e1, Position { x: 1, y: 1 });
        registry.add_component(e1, Velocity { x: 5, y: 5 });

        registry.destroy_entity(e1);

        assert!(!registry.has_component::<Position>(e1));
        assert!(!registry.has_component::<Velocity>(e1));
        // Pools that never held e1's neighbors are untouched.
        assert_eq!(*registry.get_component::<Position>(e0), Position { x: 0, y: 0 });

        // The freed id comes back before any new sequential one, clean.
        let reborn = registry.create_entity();
        assert_eq!(reborn, e1);
        assert!(!registry.has_component::<Position>(reborn));
    }

    #[test]
    fn destroy_sweeps_pools_that_never_held_the_entity() {
        let mut registry = Registry::new(8).unwrap();
        let e0 = registry.create_entity();
        let e1 = registry.create_entity();

        registry.add_component(e0, Health { value: 10 });
        registry.add_component(e1, Position { x: 1, y: 1 });

        registry.destroy_entity(e1);

        assert_eq!(*registry.get_component::<Health>(e0), Health { value: 10 });
        assert!(registry.has_component::<Health>(e0));
    }

    #[test]
    fn double_destroy_hands_out_duplicate_ids() {
        // Unguarded hazard: liveness is not validated, so a double destroy
        // queues the id twice and two later creations observe the same id.
        let mut registry = Registry::new(8).unwrap();
        let e0 = registry.create_entity();

        registry.destroy_entity(e0);
        registry.destroy_entity(e0);

        assert_eq!(registry.create_entity(), e0);
        assert_eq!(registry.create_entity(), e0);
    }

    #[test]
    fn add_component_is_idempotent() {
        let mut registry = Registry::new(8).unwrap();
        let e0 = registry.create_entity();

        registry.add_component(e0, Health { value: 100 });
        let kept = registry.add_component(e0, Health { value: 1 });

        assert_eq!(*kept, Health { value: 100 });
    }

    #[test]
    fn tuple_fetch_matches_single_type_fetches() {
        let mut registry = Registry::new(8).unwrap();
        let e0 = registry.create_entity();

        registry.add_component(e0, Position { x: 1, y: 2 });
        registry.add_component(e0, Velocity { x: 3, y: 4 });
        registry.add_component(e0, Health { value: 9 });

        let (position, velocity, health) =
            registry.get_components::<(Position, Velocity, Health)>(e0);
        assert_eq!(*position, *registry.get_component::<Position>(e0));
        assert_eq!(*velocity, *registry.get_component::<Velocity>(e0));
        assert_eq!(*health, *registry.get_component::<Health>(e0));
    }

    #[test]
    fn has_components_requires_every_type() {
        let mut registry = Registry::new(8).unwrap();
        let e0 = registry.create_entity();

        registry.add_component(e0, Position { x: 0, y: 0 });
        registry.add_component(e0, Velocity { x: 0, y: 0 });

        assert!(registry.has_components::<(Position, Velocity)>(e0));
        // Health has no pool yet; the unknown type answers false.
        assert!(!registry.has_components::<(Position, Velocity, Health)>(e0));
    }

    #[test]
    fn remove_component_of_unknown_type_is_false() {
        let mut registry = Registry::new(8).unwrap();
        let e0 = registry.create_entity();
        assert!(!registry.remove_component::<Velocity>(e0));
    }

    #[test]
    fn pools_are_created_lazily() {
        let mut registry = Registry::new(8).unwrap();
        assert!(registry.try_pool::<Position>().is_none());

        let pool = registry.pool::<Position>();
        assert!(pool.is_empty());
        assert_eq!(pool.capacity(), 8);
        assert!(registry.try_pool::<Position>().is_some());
    }

    #[test]
    fn pool_iteration_drives_caller_side_updates() {
        let mut registry = Registry::new(8).unwrap();
        for i in 0..3 {
            let e = registry.create_entity();
            registry.add_component(e, Position { x: i, y: 0 });
            registry.add_component(e, Velocity { x: 1, y: 0 });
        }

        // A caller-scheduled "system": integrate velocity into position.
        let entities: Vec<EntityId> = registry.pool::<Velocity>().entities().to_vec();
        for entity in entities {
            let velocity = *registry.get_component::<Velocity>(entity);
            let position = registry.get_component_mut::<Position>(entity);
            position.x += velocity.x;
        }

        let xs: Vec<i32> = registry.pool::<Position>().values().iter().map(|p| p.x).collect();
        assert_eq!(xs, vec![1, 2, 3]);
    }

    #[test]
    #[should_panic]
    fn get_component_without_pool_is_fatal() {
        let mut registry = Registry::new(8).unwrap();
        let e0 = registry.create_entity();
        registry.get_component::<Position>(e0);
    }

    #[test]
    #[should_panic]
    fn destroy_out_of_range_is_fatal() {
        let mut registry = Registry::new(4).unwrap();
        registry.destroy_entity(4);
    }
}
