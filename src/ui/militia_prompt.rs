use crate::constants::{MAX_MILITIA_COUNT, MIN_MILITIA_COUNT};
use crate::map::title_case;
use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

/// Draws the militia count dialog as an overlay
pub fn draw_militia_prompt(frame: &mut Frame, camp_id: &str) {
    let size = frame.size();

    let dialog_width = 40.min(size.width.saturating_sub(4));
    let dialog_height = 7.min(size.height.saturating_sub(4));
    let x = (size.width.saturating_sub(dialog_width)) / 2;
    let y = (size.height.saturating_sub(dialog_height)) / 2;
    let dialog_area = Rect::new(x, y, dialog_width, dialog_height);

    frame.render_widget(Clear, dialog_area);

    let title = Line::from(Span::styled(
        " Militia ",
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD),
    ));
    let lines = vec![
        Line::from(""),
        Line::from(format!("How many militia at {}?", title_case(&camp_id.replace('-', " ")))),
        Line::from(""),
        Line::from(Span::styled(
            format!("[{}-{}] choose   [Esc] cancel   [q] quit", MIN_MILITIA_COUNT, MAX_MILITIA_COUNT),
            Style::default().fg(Color::DarkGray),
        )),
    ];

    let dialog = Paragraph::new(lines).alignment(Alignment::Center).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Yellow))
            .title(title),
    );
    frame.render_widget(dialog, dialog_area);
}
