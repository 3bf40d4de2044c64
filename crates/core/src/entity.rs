//! Entity trait: identity + continuity across state changes.

/// Entity marker + minimal interface.
///
/// Clients, schedule entries and invoices are entities: two records with identical
/// attributes are still distinct if their identifiers differ.
pub trait Entity {
    /// Strongly-typed entity identifier.
    type Id: Clone + Eq + core::hash::Hash + core::fmt::Debug;

    /// Returns the entity identifier.
    fn id(&self) -> &Self::Id;
}
