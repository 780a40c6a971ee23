mod camp_panel;
mod map_panel;
pub mod militia_prompt;
mod route_panel;

use crate::input::UiState;
use crate::logging::LogBuffer;
use crate::map::Difficulty;
use crate::planner::{MapStatus, RoutePlanner};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

/// Marker and label colour for a camp tier.
pub fn difficulty_color(difficulty: Difficulty) -> Color {
    match difficulty {
        Difficulty::Green => Color::Green,
        Difficulty::Orange => Color::Rgb(255, 165, 0),
        Difficulty::Red => Color::Red,
        Difficulty::Unknown => Color::Gray,
    }
}

/// Main drawing function for the planner screen.
pub fn draw_ui(frame: &mut Frame, planner: &RoutePlanner, ui: &mut UiState, logs: &LogBuffer) {
    let size = frame.size();

    let v_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Status banner
            Constraint::Min(0),    // Main content
            Constraint::Length(6), // Log pane
            Constraint::Length(1), // Key help
        ])
        .split(size);

    draw_status_banner(frame, v_chunks[0], planner);

    let h_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(45), // Map canvas
            Constraint::Percentage(30), // Camps and units
            Constraint::Percentage(25), // Experience and items
        ])
        .split(v_chunks[1]);

    map_panel::draw_map_panel(frame, h_chunks[0], planner, ui);
    camp_panel::draw_camp_panel(frame, h_chunks[1], planner, ui);
    route_panel::draw_route_panel(frame, h_chunks[2], planner);

    draw_log_pane(frame, v_chunks[2], logs);
    draw_key_help(frame, v_chunks[3], ui);

    if let Some(camp_id) = planner.selection().pending_militia() {
        militia_prompt::draw_militia_prompt(frame, camp_id);
    }
}

fn status_line(planner: &RoutePlanner) -> (String, Color) {
    let name = planner.active_map().unwrap_or("-");
    match planner.status() {
        MapStatus::Idle => ("No map selected".to_string(), Color::DarkGray),
        MapStatus::Loading => (format!("Loading {}...", name), Color::Yellow),
        MapStatus::Ready => {
            let order = planner.selection().camp_order().len();
            (format!("{} | {} camps on route", name, order), Color::Green)
        }
        MapStatus::Failed(reason) => (format!("No data for {}: {}", name, reason), Color::Red),
    }
}

fn draw_status_banner(frame: &mut Frame, area: Rect, planner: &RoutePlanner) {
    let (text, color) = status_line(planner);
    let banner = Paragraph::new(Line::from(Span::styled(
        format!(" W3Atlas | {} ", text),
        Style::default().fg(color).add_modifier(Modifier::BOLD),
    )))
    .alignment(Alignment::Center)
    .style(Style::default().bg(Color::Rgb(20, 20, 40)));
    frame.render_widget(banner, area);
}

fn draw_log_pane(frame: &mut Frame, area: Rect, logs: &LogBuffer) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(" Log ");
    let height = block.inner(area).height as usize;
    let lines: Vec<Line> = logs
        .tail(height)
        .map(|l| Line::from(Span::styled(l.to_string(), Style::default().fg(Color::Gray))))
        .collect();
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn draw_key_help(frame: &mut Frame, area: Rect, ui: &UiState) {
    let text = if ui.editing_note.is_some() {
        format!(" Note: {}_  [Enter] save  [Esc] cancel", ui.note_draft)
    } else {
        " [Up/Down] move  [Tab] camps/units  [Enter] camp  [Space] unit  [a/m/g] buildings  \
         [n] note  [,/.] pick note  [e] edit  [Del] delete  [r] reset  [[/]] map  [q] quit"
            .to_string()
    };
    frame.render_widget(
        Paragraph::new(text).style(Style::default().fg(Color::DarkGray)),
        area,
    );
}
