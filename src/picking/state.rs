use crate::structure::{StructureId, StructureKey};

/// The element the user last clicked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    /// Registry id of the owning structure. A weak reference: the pick
    /// state is reset when this structure is removed.
    pub structure: StructureId,
    /// `(type, name)` of the owning structure, for display.
    pub key: StructureKey,
    /// Element index within the structure.
    pub local_index: u64,
    /// Whether the click that produced this selection was a double-click.
    pub double_click: bool,
}

/// Current pick selection.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum PickState {
    /// Nothing is selected.
    #[default]
    NoSelection,
    /// One element of one structure is selected.
    Selected(Selection),
}

impl PickState {
    /// The current selection, if any.
    #[must_use]
    pub fn selection(&self) -> Option<&Selection> {
        match self {
            Self::NoSelection => None,
            Self::Selected(selection) => Some(selection),
        }
    }

    /// Whether anything is selected.
    #[must_use]
    pub fn is_selected(&self) -> bool {
        matches!(self, Self::Selected(_))
    }

    /// Clear the selection.
    pub fn reset(&mut self) {
        *self = Self::NoSelection;
    }

    /// Clear the selection if it refers to `id`. Returns whether it did.
    pub fn clear_if_selected(&mut self, id: StructureId) -> bool {
        let hit = self.selection().is_some_and(|s| s.structure == id);
        if hit {
            self.reset();
        }
        hit
    }
}
