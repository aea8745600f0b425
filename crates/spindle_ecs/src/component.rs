// component.rs - Component marker trait

/// Marker for types storable in a component pool.
///
/// Any `'static` type qualifies; there is no registration step beyond the
/// first use of the type with a registry.
pub trait Component: 'static {}

impl<T> Component for T where T: 'static {}
