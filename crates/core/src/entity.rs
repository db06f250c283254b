//! Entity trait: identity + continuity across state changes.

/// Entity marker + minimal interface.
///
/// Every record held in an entity store is an entity: two records with the same
/// identifier are the same record, whatever their other fields say.
pub trait Entity {
    /// Strongly-typed entity identifier.
    type Id: Copy + Eq + core::hash::Hash + core::fmt::Debug;

    /// Returns the entity identifier.
    fn id(&self) -> &Self::Id;
}
