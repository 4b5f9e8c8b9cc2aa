//! Family records.
//!
//! A family is a weakly connected component of the member-only subgraph.
//! Members refer to their family by [`FamilyId`]; the color lives once in
//! the arena so every member of a family sees the same assignment.

/// Index of a family in its [`Families`] arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FamilyId(usize);

#[derive(Debug, Default)]
pub(crate) struct Families {
    colors: Vec<Option<String>>,
}

impl Families {
    /// Creates a new colorless family.
    pub(crate) fn create(&mut self) -> FamilyId {
        self.colors.push(None);
        FamilyId(self.colors.len() - 1)
    }

    pub(crate) fn color(&self, id: FamilyId) -> Option<&str> {
        self.colors.get(id.0).and_then(|color| color.as_deref())
    }

    pub(crate) fn set_color(&mut self, id: FamilyId, color: impl Into<String>) {
        if let Some(slot) = self.colors.get_mut(id.0) {
            *slot = Some(color.into());
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.colors.len()
    }

    pub(crate) fn clear(&mut self) {
        self.colors.clear();
    }
}
