//! Sticky notes pinned to the map in percentage coordinates.
//!
//! Notes live independently of camp selection and survive a selection reset.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NoteId(Uuid);

impl NoteId {
    fn generate() -> Self {
        NoteId(Uuid::new_v4())
    }
}

impl fmt::Display for NoteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StickyNote {
    pub id: NoteId,
    /// Percent of container width, 0-100.
    pub x: f64,
    /// Percent of container height, 0-100.
    pub y: f64,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NoteError {
    #[error("note placement mode is not active")]
    PlacementInactive,
    #[error("no note with id {0}")]
    NotFound(NoteId),
}

/// Bounding box of the surface notes are pinned to, in pointer units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContainerRect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

/// Converts a pointer position to percentages of the container.
pub fn pointer_to_percent(pointer_x: f64, pointer_y: f64, container: &ContainerRect) -> (f64, f64) {
    (
        (pointer_x - container.left) / container.width * 100.0,
        (pointer_y - container.top) / container.height * 100.0,
    )
}

#[derive(Debug, Default)]
pub struct NotesStore {
    notes: Vec<StickyNote>,
    placement_mode: bool,
}

impl NotesStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn placement_mode(&self) -> bool {
        self.placement_mode
    }

    pub fn set_placement_mode(&mut self, active: bool) {
        self.placement_mode = active;
    }

    /// Pins an empty note at `(x, y)` percent. Only allowed in placement mode.
    pub fn add(&mut self, x: f64, y: f64) -> Result<NoteId, NoteError> {
        if !self.placement_mode {
            return Err(NoteError::PlacementInactive);
        }
        let id = NoteId::generate();
        self.notes.push(StickyNote {
            id,
            x,
            y,
            text: String::new(),
        });
        Ok(id)
    }

    /// Pins a note under a pointer event on `container`.
    pub fn add_at_pointer(
        &mut self,
        pointer_x: f64,
        pointer_y: f64,
        container: &ContainerRect,
    ) -> Result<NoteId, NoteError> {
        let (x, y) = pointer_to_percent(pointer_x, pointer_y, container);
        self.add(x, y)
    }

    pub fn update_text(&mut self, id: NoteId, text: impl Into<String>) -> Result<(), NoteError> {
        self.get_mut(id)?.text = text.into();
        Ok(())
    }

    /// Moves a note, keeping it inside the container.
    pub fn move_note(&mut self, id: NoteId, x: f64, y: f64) -> Result<(), NoteError> {
        let note = self.get_mut(id)?;
        note.x = x.clamp(0.0, 100.0);
        note.y = y.clamp(0.0, 100.0);
        Ok(())
    }

    pub fn delete(&mut self, id: NoteId) -> Result<StickyNote, NoteError> {
        let index = self
            .notes
            .iter()
            .position(|n| n.id == id)
            .ok_or(NoteError::NotFound(id))?;
        Ok(self.notes.remove(index))
    }

    pub fn get(&self, id: NoteId) -> Option<&StickyNote> {
        self.notes.iter().find(|n| n.id == id)
    }

    fn get_mut(&mut self, id: NoteId) -> Result<&mut StickyNote, NoteError> {
        self.notes
            .iter_mut()
            .find(|n| n.id == id)
            .ok_or(NoteError::NotFound(id))
    }

    /// Notes in creation order.
    pub fn iter(&self) -> impl Iterator<Item = &StickyNote> {
        self.notes.iter()
    }

    pub fn len(&self) -> usize {
        self.notes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }
}
