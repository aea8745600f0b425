// fetch.rs - Multi-component fetch over type tuples

use crate::component::Component;
use crate::entity::EntityId;
use crate::registry::Registry;

/// A tuple of component types fetched together from a registry.
///
/// Backs [`Registry::get_components`] and [`Registry::has_components`];
/// implemented for tuples up to arity 8. Each element of a fetch obeys the
/// same contract as the single-type [`Registry::get_component`].
pub trait ComponentSet<'a> {
    /// The tuple of references produced by a fetch, in the requested order.
    type Refs;

    fn fetch(registry: &'a Registry, entity: EntityId) -> Self::Refs;

    fn all_present(registry: &Registry, entity: EntityId) -> bool;
}

macro_rules! impl_component_set {
    ($($name:ident),+) => {
        impl<'a, $($name),+> ComponentSet<'a> for ($($name,)+)
        where
            $($name: Component,)+
        {
            type Refs = ($(&'a $name,)+);

            fn fetch(registry: &'a Registry, entity: EntityId) -> Self::Refs {
                ($(registry.get_component::<$name>(entity),)+)
            }

            fn all_present(registry: &Registry, entity: EntityId) -> bool {
                true $(&& registry.has_component::<$name>(entity))+
            }
        }
    };
}

impl_component_set!(A);
impl_component_set!(A, B);
impl_component_set!(A, B, C);
impl_component_set!(A, B, C, D);
impl_component_set!(A, B, C, D, E);
impl_component_set!(A, B, C, D, E, F);
impl_component_set!(A, B, C, D, E, F, G);
impl_component_set!(A, B, C, D, E, F, G, H);
