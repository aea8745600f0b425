//! Spindle ECS - sparse-set entity-component storage core
//!
//! Separates identity from behavior data: entities are plain recycled ids,
//! components are typed values held in one dense pool per type, and the
//! [`Registry`] owns both and routes typed operations to the right pool.
//! Scheduling of per-frame logic over that data is left to calling code;
//! [`Registry::pool`] is the hook it iterates through.
//!
//! # Usage
//!
//! ```
//! use spindle_ecs::Registry;
//!
//! struct Position { x: f32, y: f32 }
//!
//! let mut registry = Registry::new(1024).unwrap();
//! let player = registry.create_entity();
//! registry.add_component(player, Position { x: 0.0, y: 0.0 });
//!
//! for (entity, position) in registry.pool::<Position>().iter() {
//!     println!("{entity}: ({}, {})", position.x, position.y);
//! }
//! ```
//!
//! # Usage rules
//!
//! All storage is single-threaded and non-reentrant: there is no internal
//! locking, and a pool must not be mutated (add/remove) while its dense rows
//! are being iterated elsewhere. Removal reorders dense rows by swapping the
//! last row into the vacated slot, so iteration order is unspecified.
//!
//! Expected negative outcomes (absent components, no-op removals) are plain
//! `bool` returns. Contract violations - out-of-range ids, fetching a
//! component that does not exist, exhausting the id space - are caller bugs
//! and fatal by design; see [`set_fatal_handler`].

mod component;
mod entity;
mod error;
mod fetch;
mod pool;
mod registry;
mod sparse_set;

pub use component::Component;
pub use entity::EntityId;
pub use error::{set_fatal_handler, FatalHandler, RegistryError};
pub use fetch::ComponentSet;
pub use pool::ErasedPool;
pub use registry::Registry;
pub use sparse_set::SparseSet;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
