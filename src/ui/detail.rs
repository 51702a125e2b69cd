use crate::app::{App, DetailState};
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

/// Render the detail view body.
///
/// Shows the entry header, its types, and the level-up learnset grouped by
/// version group in alphabetical order.
pub fn render(f: &mut Frame, app: &App, area: Rect) {
    let (title, lines) = match &app.detail {
        DetailState::Idle => ("Detail".to_string(), vec![Line::from("")]),
        DetailState::Loading { name } => (
            name.clone(),
            vec![Line::from(Span::styled(
                "Loading...",
                Style::default().fg(Color::DarkGray),
            ))],
        ),
        DetailState::Failed { name, error } => (
            name.clone(),
            vec![Line::from(Span::styled(
                format!("Failed to load: {error}"),
                Style::default().fg(Color::Red),
            ))],
        ),
        DetailState::Loaded { detail } => {
            let mut lines = vec![
                Line::from(vec![
                    Span::styled(
                        format!("#{:04} ", detail.id),
                        Style::default().fg(Color::DarkGray),
                    ),
                    Span::styled(
                        detail.name.clone(),
                        Style::default().add_modifier(Modifier::BOLD),
                    ),
                ]),
                Line::from(Span::styled(
                    format!("Types: {}", detail.types.join(", ")),
                    Style::default().fg(Color::Cyan),
                )),
                Line::from(""),
            ];

            if detail.moves_by_version.is_empty() {
                lines.push(Line::from("No level-up moves"));
            }
            for (version_group, moves) in &detail.moves_by_version {
                lines.push(Line::from(Span::styled(
                    version_group.clone(),
                    Style::default()
                        .fg(Color::Yellow)
                        .add_modifier(Modifier::BOLD),
                )));
                for m in moves {
                    lines.push(Line::from(format!("  Lv {:>3}  {}", m.level, m.name)));
                }
                lines.push(Line::from(""));
            }
            (detail.name.clone(), lines)
        }
    };

    let paragraph = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .block(Block::default().borders(Borders::ALL).title(title));

    f.render_widget(paragraph, area);
}
