//! Toast: the current notification, drawn in the top-right corner.

use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Clear, Paragraph},
    Frame,
};

use crate::notify::{Notification, Severity};
use crate::theme::{C_TOAST_ERROR, C_TOAST_INFO, C_TOAST_SUCCESS};

fn severity_color(severity: Severity) -> ratatui::style::Color {
    match severity {
        Severity::Info => C_TOAST_INFO,
        Severity::Success => C_TOAST_SUCCESS,
        Severity::Error => C_TOAST_ERROR,
    }
}

fn severity_icon(severity: Severity) -> &'static str {
    match severity {
        Severity::Info => "·",
        Severity::Success => "✓",
        Severity::Error => "✗",
    }
}

/// Render `notification` (if any) one row below the top edge of `area`,
/// right-aligned.
pub fn draw_toast(frame: &mut Frame, area: Rect, notification: Option<&Notification>) {
    let Some(n) = notification else {
        return;
    };
    if area.width < 8 || area.height < 2 {
        return;
    }
    let max_width = (area.width / 2).clamp(30, 70).min(area.width);
    let msg_len = u16::try_from(n.text.chars().count()).unwrap_or(u16::MAX);
    let w = msg_len.saturating_add(5).min(max_width);
    let x = area.x + area.width.saturating_sub(w + 1);
    let toast_area = Rect {
        x,
        y: area.y + 1,
        width: w,
        height: 1,
    };

    frame.render_widget(Clear, toast_area);
    let paragraph = Paragraph::new(Line::from(vec![Span::styled(
        format!(" {} {} ", severity_icon(n.severity), n.text),
        Style::default()
            .fg(severity_color(n.severity))
            .add_modifier(Modifier::BOLD),
    )]));
    frame.render_widget(paragraph, toast_area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::{backend::TestBackend, Terminal};

    use crate::notify::NotificationCenter;

    fn row(terminal: &Terminal<TestBackend>, y: u16) -> String {
        let buffer = terminal.backend().buffer();
        (0..buffer.area.width)
            .map(|x| buffer[(x, y)].symbol())
            .collect()
    }

    #[test]
    fn test_long_server_message_is_clipped() {
        let mut center = NotificationCenter::new();
        center.error("x".repeat(70_000));
        let mut terminal = Terminal::new(TestBackend::new(80, 4)).unwrap();
        terminal
            .draw(|f| draw_toast(f, f.area(), center.current()))
            .unwrap();

        let line = row(&terminal, 1);
        assert!(line.contains("✗"));
        assert!(line.ends_with(' '));
        assert!(row(&terminal, 0).trim().is_empty());
    }

    #[test]
    fn test_short_message_right_aligned() {
        let mut center = NotificationCenter::new();
        center.success("Saved");
        let mut terminal = Terminal::new(TestBackend::new(60, 3)).unwrap();
        terminal
            .draw(|f| draw_toast(f, f.area(), center.current()))
            .unwrap();

        let line = row(&terminal, 1);
        assert!(line.trim_end().ends_with("✓ Saved"));
        assert!(line.starts_with("     "));
    }
}
