//! Entity identifier representation
//!
//! Entities carry no data of their own: an id is only an index into the
//! registry's pools, densely packed in `[0, max_entities)`. Destroyed ids
//! are recycled by the registry before new sequential ids are minted.

/// Identifier of an entity, fixed to 32 bits by the `entity-id-u32` feature.
#[cfg(feature = "entity-id-u32")]
pub type EntityId = u32;

/// Identifier of an entity, fixed to 64 bits by the `entity-id-u64` feature.
#[cfg(all(feature = "entity-id-u64", not(feature = "entity-id-u32")))]
pub type EntityId = u64;

/// Identifier of an entity.
///
/// Pointer-width by default; enable the `entity-id-u32` or `entity-id-u64`
/// feature to fix the width when id layout must match across platforms.
#[cfg(not(any(feature = "entity-id-u32", feature = "entity-id-u64")))]
pub type EntityId = usize;
