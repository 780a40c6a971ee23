use crate::items::ItemCategory;
use crate::planner::RoutePlanner;
use crate::progression::ProgressionState;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, Paragraph, Wrap},
    Frame,
};

/// Hero experience gauge above the ordered item list.
pub fn draw_route_panel(frame: &mut Frame, area: Rect, planner: &RoutePlanner) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(0)])
        .split(area);

    draw_experience(frame, chunks[0], &planner.snapshot().progression);
    draw_items(frame, chunks[1], planner);
}

fn experience_label(progress: &ProgressionState) -> String {
    if progress.is_capped() {
        format!("Level {} | MAX", progress.level)
    } else {
        format!(
            "Level {} | {:.2} / {:.2}",
            progress.level,
            progress.display_current_xp(),
            progress.display_xp_for_next_level()
        )
    }
}

fn draw_experience(frame: &mut Frame, area: Rect, progress: &ProgressionState) {
    let gauge = Gauge::default()
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!(" Hero Experience ({:.0} raw) ", progress.total_raw_xp)),
        )
        .gauge_style(Style::default().fg(Color::Cyan).bg(Color::Black))
        .ratio(progress.progress_percent() / 100.0)
        .label(experience_label(progress));
    frame.render_widget(gauge, area);
}

fn category_color(category: ItemCategory) -> Color {
    match category {
        ItemCategory::Permanent => Color::Blue,
        ItemCategory::PowerUp => Color::Green,
        ItemCategory::Custom => Color::Yellow,
        ItemCategory::Other => Color::Gray,
    }
}

fn draw_items(frame: &mut Frame, area: Rect, planner: &RoutePlanner) {
    let camp_items = &planner.snapshot().camp_items;
    let mut lines: Vec<Line> = Vec::new();

    if camp_items.is_empty() {
        lines.push(Line::from(Span::styled(
            "No camps selected",
            Style::default().fg(Color::DarkGray),
        )));
    }

    for camp in camp_items {
        let name = planner
            .map()
            .and_then(|m| m.camp(&camp.camp_id))
            .map_or_else(|| camp.camp_id.clone(), |c| c.display_name());
        lines.push(Line::from(vec![
            Span::styled(
                format!("{}. ", camp.camp_order),
                Style::default().fg(Color::DarkGray),
            ),
            Span::styled(name, Style::default().add_modifier(Modifier::BOLD)),
        ]));

        if camp.items.is_empty() {
            lines.push(Line::from(Span::styled(
                "   No items",
                Style::default().fg(Color::DarkGray),
            )));
            continue;
        }
        for (kind, items) in camp.grouped_by_type() {
            let color = category_color(ItemCategory::from_loot_type(kind));
            let mut spans = vec![Span::raw("   ")];
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    spans.push(Span::raw(", "));
                }
                spans.push(Span::styled(
                    format!("{} (L{})", item.display_name(), item.level),
                    Style::default().fg(color),
                ));
            }
            lines.push(Line::from(spans));
        }
    }

    let paragraph = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title(" Items "))
        .wrap(Wrap { trim: false });
    frame.render_widget(paragraph, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progression::calculate_progression;

    #[test]
    fn test_label_rounds_for_display() {
        assert_eq!(
            experience_label(&calculate_progression(100.0 / 3.0)),
            "Level 1 | 26.67 / 200.00"
        );
        assert_eq!(experience_label(&calculate_progression(1e6)), "Level 5 | MAX");
    }
}
