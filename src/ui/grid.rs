use crate::app::{App, Focus, InputMode};
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem},
    Frame,
};
use unicode_width::UnicodeWidthChar;

/// Truncate a string to a maximum display-cell width, appending "..." when cut.
///
/// Width-aware so wide glyphs in localized names never overflow the row.
fn truncate_to_width(s: &str, max_width: usize) -> String {
    let mut width = 0;
    for (i, c) in s.char_indices() {
        width += c.width().unwrap_or(0);
        if width > max_width.saturating_sub(3) {
            return format!("{}...", &s[..i]);
        }
    }
    s.to_string()
}

/// Render the feed grid panel.
///
/// One row per visible entry: padded dex number, name, then the type tags.
pub fn render(f: &mut Frame, app: &App, area: Rect) {
    let is_focused = app.focus == Focus::Feed;
    let visible = app.feed.visible();

    let items: Vec<ListItem> = if visible.is_empty() {
        let placeholder = if app.feed.loading() {
            "Loading..."
        } else if !app.feed.search_term().is_empty() {
            "No matches"
        } else {
            "No entries"
        };
        vec![ListItem::new(placeholder)]
    } else {
        visible
            .iter()
            .enumerate()
            .map(|(i, mon)| {
                let name_style = if i == app.selected_row {
                    Style::default().bg(Color::DarkGray).fg(Color::White)
                } else {
                    Style::default().add_modifier(Modifier::BOLD)
                };

                // Leave room for the number column and type tags
                let max_name = area.width.saturating_sub(24) as usize;
                let name = truncate_to_width(&mon.name, max_name.max(8));

                let mut spans = vec![
                    Span::styled(
                        format!("#{:04} ", mon.id),
                        Style::default().fg(Color::DarkGray),
                    ),
                    Span::styled(name, name_style),
                ];
                if !mon.types.is_empty() {
                    spans.push(Span::styled(
                        format!("  [{}]", mon.types.join("/")),
                        Style::default().fg(Color::Cyan),
                    ));
                }

                ListItem::new(Line::from(spans))
            })
            .collect()
    };

    let border_style = if is_focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default()
    };

    let title = if app.input_mode == InputMode::Search {
        format!("Filter: {}_", app.feed.search_term())
    } else if app.feed.search_term().is_empty() {
        format!("Pokedex - {}", app.feed.selected_type())
    } else {
        format!(
            "Pokedex - {} (filter: {})",
            app.feed.selected_type(),
            app.feed.search_term()
        )
    };

    let list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(border_style)
            .title(title),
    );

    f.render_widget(list, area);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_short_string_unchanged() {
        assert_eq!(truncate_to_width("pikachu", 20), "pikachu");
    }

    #[test]
    fn test_truncate_long_string_ellipsized() {
        let cut = truncate_to_width("crabominable-totem-form", 12);
        assert!(cut.ends_with("..."));
        assert!(cut.len() < "crabominable-totem-form".len());
    }

    #[test]
    fn test_truncate_respects_char_boundaries() {
        // Wide glyphs count two cells each
        let cut = truncate_to_width("ピカチュウ", 6);
        assert!(cut.ends_with("..."));
    }
}
