use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};

use crate::session::ChatExchange;

/// Bulleted ingredient lines, or a placeholder when there are none.
pub(crate) fn ingredient_lines(ingredients: &[String]) -> Vec<Line<'static>> {
    if ingredients.is_empty() {
        return vec![placeholder("No ingredients stored for this recipe.")];
    }
    ingredients
        .iter()
        .map(|item| Line::from(format!("- {item}")))
        .collect()
}

/// Numbered instruction lines, or a placeholder when there are none.
pub(crate) fn instruction_lines(instructions: &[String]) -> Vec<Line<'static>> {
    if instructions.is_empty() {
        return vec![placeholder("No instructions stored for this recipe.")];
    }
    instructions
        .iter()
        .enumerate()
        .map(|(idx, step)| {
            Line::from(vec![
                Span::styled(
                    format!("Step {}. ", idx + 1),
                    Style::default().add_modifier(Modifier::BOLD),
                ),
                Span::raw(step.clone()),
            ])
        })
        .collect()
}

/// Conversation lines, newest exchange first.
pub(crate) fn chat_lines(log: &[ChatExchange]) -> Vec<Line<'static>> {
    if log.is_empty() {
        return vec![placeholder("No questions yet. Press ? to ask the assistant.")];
    }

    let label = Style::default().add_modifier(Modifier::BOLD);
    let mut lines = Vec::new();
    for exchange in log.iter().rev() {
        lines.push(Line::from(vec![
            Span::styled("You: ", label.fg(Color::Cyan)),
            Span::raw(exchange.prompt.clone()),
        ]));
        lines.push(Line::from(Span::styled("Assistant:", label.fg(Color::Green))));
        lines.extend(
            exchange
                .reply
                .lines()
                .map(|line| Line::from(line.to_string())),
        );
        lines.push(Line::from(Span::styled(
            "─".repeat(40),
            Style::default().fg(Color::DarkGray),
        )));
    }
    lines
}

/// Footer hint built from `(key, action)` pairs.
pub(crate) fn hint_line(hints: &[(&str, &str)]) -> Line<'static> {
    let key_style = Style::default()
        .fg(Color::Cyan)
        .add_modifier(Modifier::BOLD);
    let mut spans = Vec::with_capacity(hints.len() * 2);
    for (key, action) in hints {
        spans.push(Span::styled(format!("[{key}]"), key_style));
        spans.push(Span::raw(format!(" {action}   ")));
    }
    Line::from(spans)
}

fn placeholder(text: &str) -> Line<'static> {
    Line::from(Span::styled(
        text.to_string(),
        Style::default().fg(Color::DarkGray),
    ))
}

/// Produce a rectangle centered within `area` that spans the requested percent
/// of the width and height. Used for modal dialogs.
pub(crate) fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(area);

    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(horizontal[1]);

    vertical[1]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(line: &Line) -> String {
        line.spans.iter().map(|span| span.content.as_ref()).collect()
    }

    #[test]
    fn test_instructions_are_numbered_from_one() {
        let lines = instruction_lines(&["Chop onions".to_string(), "Heat oil".to_string()]);
        assert_eq!(text(&lines[0]), "Step 1. Chop onions");
        assert_eq!(text(&lines[1]), "Step 2. Heat oil");
    }

    #[test]
    fn test_empty_lists_show_placeholders() {
        assert_eq!(
            text(&ingredient_lines(&[])[0]),
            "No ingredients stored for this recipe."
        );
        assert_eq!(
            text(&instruction_lines(&[])[0]),
            "No instructions stored for this recipe."
        );
    }

    #[test]
    fn test_chat_lines_show_newest_first() {
        let log = vec![
            ChatExchange {
                prompt: "first".into(),
                reply: "one".into(),
            },
            ChatExchange {
                prompt: "second".into(),
                reply: "two\nlines".into(),
            },
        ];
        let lines = chat_lines(&log);

        assert_eq!(text(&lines[0]), "You: second");
        assert_eq!(text(&lines[2]), "two");
        assert_eq!(text(&lines[3]), "lines");
        assert_eq!(text(&lines[5]), "You: first");
    }

    #[test]
    fn test_centered_rect_stays_inside_area() {
        let area = Rect::new(0, 0, 100, 50);
        let popup = centered_rect(60, 40, area);
        assert_eq!(popup.width, 60);
        assert_eq!(popup.height, 20);
        assert!(popup.x >= area.x && popup.right() <= area.right());
    }
}
