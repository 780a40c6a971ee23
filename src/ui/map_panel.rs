use super::difficulty_color;
use crate::input::UiState;
use crate::map::marker_size_percent;
use crate::planner::RoutePlanner;
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{
        canvas::{Canvas, Circle},
        Block, Borders,
    },
    Frame,
};

/// Draws camp markers and sticky notes at their percentage positions.
///
/// Canvas y grows upwards, so map percentages are flipped on the way in.
pub fn draw_map_panel(frame: &mut Frame, area: Rect, planner: &RoutePlanner, ui: &mut UiState) {
    let title = match planner.map() {
        Some(map) if planner.notes().placement_mode() => {
            format!(" {} (click to place note) ", map.map_name)
        }
        Some(map) => format!(" {} ", map.map_name),
        None => " Map ".to_string(),
    };
    let border = if planner.notes().placement_mode() {
        Color::Yellow
    } else {
        Color::Cyan
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border))
        .title(title);
    ui.map_area = Some(block.inner(area));

    let Some(map) = planner.map() else {
        frame.render_widget(block, area);
        return;
    };

    let selection = planner.selection();
    let radius = marker_size_percent(&map.dimensions) / 2.0;
    let cursor_camp = map.camps.get(ui.camp_cursor).map(|c| c.id.as_str());

    let canvas = Canvas::default()
        .block(block)
        .x_bounds([0.0, 100.0])
        .y_bounds([0.0, 100.0])
        .paint(|ctx| {
            for camp in &map.camps {
                let (x, y) = camp.marker_percent(&map.dimensions);
                let color = difficulty_color(camp.difficulty());
                ctx.draw(&Circle {
                    x,
                    y: 100.0 - y,
                    radius,
                    color,
                });

                let label = match selection.order_index(&camp.id) {
                    Some(step) => step.to_string(),
                    None => "o".to_string(),
                };
                let mut style = Style::default().fg(color);
                if Some(camp.id.as_str()) == cursor_camp {
                    style = style.add_modifier(Modifier::REVERSED);
                }
                if selection.is_camp_active(&camp.id) {
                    style = style.add_modifier(Modifier::BOLD);
                }
                ctx.print(x, 100.0 - y, Line::from(Span::styled(label, style)));
            }

            for (index, note) in planner.notes().iter().enumerate() {
                let mut style = Style::default().fg(Color::Black).bg(Color::LightYellow);
                if index == ui.note_cursor {
                    style = style.add_modifier(Modifier::BOLD);
                }
                let text = if note.text.is_empty() {
                    "note".to_string()
                } else {
                    note.text.clone()
                };
                ctx.print(note.x, 100.0 - note.y, Line::from(Span::styled(text, style)));
            }
        });

    frame.render_widget(canvas, area);
}
