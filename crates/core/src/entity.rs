//! Entity trait: identity + continuity across state changes.

use crate::id::SequentialId;

/// Entity marker + minimal interface.
///
/// Repositories are generic over this trait instead of over a base type: they
/// only need to read an entity's id and stamp a fresh one on insert.
pub trait Entity: Clone {
    /// Strongly-typed entity identifier.
    type Id: SequentialId;

    /// Returns the entity identifier.
    fn id(&self) -> Self::Id;

    /// Stamps the identifier chosen by the owning repository.
    fn assign_id(&mut self, id: Self::Id);
}
