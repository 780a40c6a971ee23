use super::difficulty_color;
use crate::input::{Focus, UiState};
use crate::map::{BuildingType, Camp};
use crate::planner::RoutePlanner;
use crate::selection::Selection;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

/// Camp list on top, units of the camp under the cursor below.
pub fn draw_camp_panel(frame: &mut Frame, area: Rect, planner: &RoutePlanner, ui: &UiState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(area);

    let Some(map) = planner.map() else {
        frame.render_widget(
            Paragraph::new("No camps").block(Block::default().borders(Borders::ALL).title(" Camps ")),
            area,
        );
        return;
    };
    let selection = planner.selection();

    let camp_lines: Vec<Line> = map
        .camps
        .iter()
        .enumerate()
        .map(|(index, camp)| camp_line(camp, selection, index == ui.camp_cursor))
        .collect();
    frame.render_widget(
        Paragraph::new(camp_lines).block(focus_block(" Camps ", ui.focus == Focus::Camps)),
        chunks[0],
    );

    let unit_lines: Vec<Line> = match map.camps.get(ui.camp_cursor) {
        Some(camp) => camp
            .unit_instances()
            .enumerate()
            .map(|(index, unit)| {
                let selected = selection.is_unit_selected(&camp.id, &unit.unique_id);
                let mark = if selected { "[x]" } else { "[ ]" };
                let mut style = if selected {
                    Style::default().fg(Color::Green)
                } else {
                    Style::default()
                };
                if ui.focus == Focus::Units && index == ui.unit_cursor {
                    style = style.add_modifier(Modifier::REVERSED);
                }
                Line::from(Span::styled(
                    format!("{} {} L{}", mark, unit.group.name, unit.group.level),
                    style,
                ))
            })
            .collect(),
        None => Vec::new(),
    };
    frame.render_widget(
        Paragraph::new(unit_lines).block(focus_block(" Units ", ui.focus == Focus::Units)),
        chunks[1],
    );
}

fn focus_block(title: &str, focused: bool) -> Block<'_> {
    let color = if focused { Color::Yellow } else { Color::DarkGray };
    Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(color))
        .title(title)
}

fn camp_line<'a>(camp: &Camp, selection: &Selection, under_cursor: bool) -> Line<'a> {
    let step = selection
        .order_index(&camp.id)
        .map_or_else(|| "  ".to_string(), |s| format!("{:>2}", s));
    let selected = selection.selected_units(&camp.id).map_or(0, |s| s.len());

    let mut name_style = Style::default().fg(difficulty_color(camp.difficulty()));
    if under_cursor {
        name_style = name_style.add_modifier(Modifier::REVERSED);
    }

    let mut spans = vec![
        Span::styled(step, Style::default().add_modifier(Modifier::BOLD)),
        Span::raw(" "),
        Span::styled(camp.display_name(), name_style),
        Span::styled(
            format!(" ({}) {}/{}", camp.difficulty().label(), selected, camp.unit_count()),
            Style::default().fg(Color::DarkGray),
        ),
    ];

    for building in BuildingType::ALL {
        if !selection.is_building_selected(&camp.id, building) {
            continue;
        }
        let label = match (building, selection.militia_count(&camp.id)) {
            (BuildingType::Militia, Some(count)) => format!(" [{} x{}]", building.name(), count),
            _ => format!(" [{}]", building.name()),
        };
        spans.push(Span::styled(label, Style::default().fg(Color::Magenta)));
    }
    if selection.pending_militia() == Some(camp.id.as_str()) {
        spans.push(Span::styled(" [Militia ?]", Style::default().fg(Color::Yellow)));
    }

    Line::from(spans)
}
