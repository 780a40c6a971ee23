//! Keyboard and mouse dispatch for the planner screen.
//!
//! Priority chain: militia prompt, note editing, then the normal key map.

use crate::map::BuildingType;
use crate::notes::{ContainerRect, NoteId};
use crate::planner::RoutePlanner;
use crossterm::event::{KeyCode, KeyEvent, MouseButton, MouseEvent, MouseEventKind};
use ratatui::layout::Rect;
use std::fmt;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Camps,
    Units,
}

/// Cursor and editing state that belongs to the front-end only.
pub struct UiState {
    pub focus: Focus,
    pub camp_cursor: usize,
    pub unit_cursor: usize,
    pub note_cursor: usize,
    pub editing_note: Option<NoteId>,
    pub note_draft: String,
    pub maps: Vec<String>,
    /// Inner area of the map canvas from the last draw, for mouse hits.
    pub map_area: Option<Rect>,
}

impl UiState {
    pub fn new(maps: Vec<String>) -> Self {
        Self {
            focus: Focus::Camps,
            camp_cursor: 0,
            unit_cursor: 0,
            note_cursor: 0,
            editing_note: None,
            note_draft: String::new(),
            maps,
            map_area: None,
        }
    }

    /// Cursor positions are only valid for one map.
    pub fn reset_cursors(&mut self) {
        self.focus = Focus::Camps;
        self.camp_cursor = 0;
        self.unit_cursor = 0;
    }

    fn begin_edit(&mut self, id: NoteId, text: &str) {
        self.editing_note = Some(id);
        self.note_draft = text.to_string();
    }
}

pub enum InputResult {
    Continue,
    Quit,
    /// The user asked for another map; the caller starts the load.
    SwitchMap(String),
}

/// Rejected actions leave state unchanged; they are only worth a debug line.
fn log_rejection<E: fmt::Display>(result: Result<(), E>) {
    if let Err(e) = result {
        debug!(error = %e, "ignored");
    }
}

fn cursor_camp_id(planner: &RoutePlanner, ui: &UiState) -> Option<String> {
    planner
        .map()?
        .camps
        .get(ui.camp_cursor)
        .map(|c| c.id.clone())
}

fn cursor_unit_id(planner: &RoutePlanner, ui: &UiState) -> Option<String> {
    let camp = planner.map()?.camps.get(ui.camp_cursor)?;
    camp.unit_instances()
        .nth(ui.unit_cursor)
        .map(|u| u.unique_id)
}

fn cycle_map(planner: &RoutePlanner, ui: &UiState, step: isize) -> Option<String> {
    if ui.maps.is_empty() {
        return None;
    }
    let len = ui.maps.len() as isize;
    let current = planner
        .active_map()
        .and_then(|active| ui.maps.iter().position(|m| m == active))
        .unwrap_or(0) as isize;
    let next = (current + step).rem_euclid(len) as usize;
    Some(ui.maps[next].clone())
}

pub fn handle_key(key: KeyEvent, planner: &mut RoutePlanner, ui: &mut UiState) -> InputResult {
    // 1. Militia count prompt
    if let Some(camp_id) = planner.selection().pending_militia().map(str::to_string) {
        match key.code {
            KeyCode::Char(c) if c.is_ascii_digit() => {
                let count = c.to_digit(10).unwrap_or(0) as u8;
                log_rejection(planner.select_militia_count(&camp_id, count));
            }
            KeyCode::Esc => planner.cancel_militia_prompt(),
            KeyCode::Char('q') => return InputResult::Quit,
            _ => {}
        }
        return InputResult::Continue;
    }

    // 2. Note text editing
    if let Some(id) = ui.editing_note {
        match key.code {
            KeyCode::Enter => {
                if let Err(e) = planner.notes_mut().update_text(id, ui.note_draft.clone()) {
                    debug!(error = %e, "note edit dropped");
                }
                ui.editing_note = None;
            }
            KeyCode::Esc => ui.editing_note = None,
            KeyCode::Backspace => {
                ui.note_draft.pop();
            }
            KeyCode::Char(c) => ui.note_draft.push(c),
            _ => {}
        }
        return InputResult::Continue;
    }

    // 3. Normal key map
    let camp_count = planner.map().map_or(0, |m| m.camps.len());
    match key.code {
        KeyCode::Char('q') => return InputResult::Quit,
        KeyCode::Up => match ui.focus {
            Focus::Camps => {
                ui.camp_cursor = ui.camp_cursor.saturating_sub(1);
                ui.unit_cursor = 0;
            }
            Focus::Units => ui.unit_cursor = ui.unit_cursor.saturating_sub(1),
        },
        KeyCode::Down => match ui.focus {
            Focus::Camps => {
                if ui.camp_cursor + 1 < camp_count {
                    ui.camp_cursor += 1;
                    ui.unit_cursor = 0;
                }
            }
            Focus::Units => {
                let unit_count = planner
                    .map()
                    .and_then(|m| m.camps.get(ui.camp_cursor))
                    .map_or(0, |c| c.unit_count());
                if ui.unit_cursor + 1 < unit_count {
                    ui.unit_cursor += 1;
                }
            }
        },
        KeyCode::Tab => {
            ui.focus = match ui.focus {
                Focus::Camps => Focus::Units,
                Focus::Units => Focus::Camps,
            };
        }
        KeyCode::Enter => {
            if let Some(camp_id) = cursor_camp_id(planner, ui) {
                log_rejection(planner.toggle_camp_all(&camp_id));
            }
        }
        KeyCode::Char(' ') => {
            if let (Some(camp_id), Some(unit_id)) =
                (cursor_camp_id(planner, ui), cursor_unit_id(planner, ui))
            {
                log_rejection(planner.toggle_unit(&camp_id, &unit_id));
            }
        }
        KeyCode::Char(c @ ('a' | 'm' | 'g')) => {
            let building = match c {
                'a' => BuildingType::AncientOfWar,
                'm' => BuildingType::Militia,
                _ => BuildingType::Ghoul,
            };
            if let Some(camp_id) = cursor_camp_id(planner, ui) {
                log_rejection(planner.toggle_building(&camp_id, building));
            }
        }
        KeyCode::Char('r') => planner.reset(),
        KeyCode::Char('[') => {
            if let Some(name) = cycle_map(planner, ui, -1) {
                return InputResult::SwitchMap(name);
            }
        }
        KeyCode::Char(']') => {
            if let Some(name) = cycle_map(planner, ui, 1) {
                return InputResult::SwitchMap(name);
            }
        }
        KeyCode::Char('n') => {
            let active = planner.notes().placement_mode();
            planner.notes_mut().set_placement_mode(!active);
        }
        KeyCode::Char(',') => ui.note_cursor = ui.note_cursor.saturating_sub(1),
        KeyCode::Char('.') => {
            if ui.note_cursor + 1 < planner.notes().len() {
                ui.note_cursor += 1;
            }
        }
        KeyCode::Char('e') => {
            if let Some(note) = planner.notes().iter().nth(ui.note_cursor) {
                let (id, text) = (note.id, note.text.clone());
                ui.begin_edit(id, &text);
            }
        }
        KeyCode::Delete => {
            let selected = planner.notes().iter().nth(ui.note_cursor).map(|n| n.id);
            if let Some(id) = selected {
                log_rejection(planner.notes_mut().delete(id).map(|_| ()));
                ui.note_cursor = ui.note_cursor.min(planner.notes().len().saturating_sub(1));
            }
        }
        _ => {}
    }

    InputResult::Continue
}

/// A left click on the map pins a note while placement mode is on.
pub fn handle_mouse(mouse: MouseEvent, planner: &mut RoutePlanner, ui: &mut UiState) {
    if !matches!(mouse.kind, MouseEventKind::Down(MouseButton::Left)) {
        return;
    }
    let Some(area) = ui.map_area else {
        return;
    };
    let inside = mouse.column >= area.x
        && mouse.column < area.x + area.width
        && mouse.row >= area.y
        && mouse.row < area.y + area.height;
    if !inside || !planner.notes().placement_mode() {
        return;
    }

    let container = ContainerRect {
        left: area.x as f64,
        top: area.y as f64,
        width: area.width as f64,
        height: area.height as f64,
    };
    match planner
        .notes_mut()
        .add_at_pointer(mouse.column as f64, mouse.row as f64, &container)
    {
        Ok(id) => {
            planner.notes_mut().set_placement_mode(false);
            ui.note_cursor = planner.notes().len().saturating_sub(1);
            ui.begin_edit(id, "");
        }
        Err(e) => debug!(error = %e, "note not placed"),
    }
}
