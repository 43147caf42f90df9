//! Smooth Unicode progress bar widget.

use std::time::Duration;

use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::theme::{C_MUTED, C_PROGRESS, C_SECONDARY};

const BLOCKS: [char; 9] = [' ', '▏', '▎', '▍', '▌', '▋', '▊', '▉', '█'];

/// Build a bar `width` cells wide filled to `percent` (0..=100), using
/// eighth-blocks for the partial cell.
pub fn bar_string(percent: u8, width: usize) -> String {
    let eighths = (percent.min(100) as usize * width * 8) / 100;
    let full_blocks = eighths / 8;
    let partial = eighths % 8;

    let mut bar = String::with_capacity(width + 4);
    for _ in 0..full_blocks {
        bar.push('█');
    }
    if full_blocks < width {
        bar.push(BLOCKS[partial]);
        for _ in (full_blocks + 1)..width {
            bar.push(' ');
        }
    }
    bar
}

/// Render `42% ████▍      Separating stems... 0:08` into one row.
pub fn draw_progress(
    frame: &mut Frame,
    area: Rect,
    percent: u8,
    phase: &str,
    elapsed: Option<Duration>,
) {
    if area.width < 8 || area.height == 0 {
        return;
    }

    let left_label = format!("{:>3}% ", percent.min(100));
    let mut right_label = format!(" {}", phase);
    if let Some(e) = elapsed {
        right_label.push_str(&format!(" {}", fmt_elapsed(e)));
    }
    let label_w = (left_label.chars().count() + right_label.chars().count()) as u16;
    let bar_w = area.width.saturating_sub(label_w).max(4) as usize;

    let spans = vec![
        Span::styled(left_label, Style::default().fg(C_SECONDARY)),
        Span::styled(bar_string(percent, bar_w), Style::default().fg(C_PROGRESS)),
        Span::styled(right_label, Style::default().fg(C_MUTED)),
    ];
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn fmt_elapsed(elapsed: Duration) -> String {
    let s = elapsed.as_secs();
    format!("{}:{:02}", s / 60, s % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bar_extremes() {
        assert_eq!(bar_string(0, 4), "    ");
        assert_eq!(bar_string(100, 4), "████");
        assert_eq!(bar_string(250, 4), "████");
    }

    #[test]
    fn test_bar_partial_cell() {
        // 50% of 3 cells = 12 eighths = 1 full + half block.
        assert_eq!(bar_string(50, 3), "█▌ ");
        assert_eq!(bar_string(50, 3).chars().count(), 3);
    }

    #[test]
    fn test_fmt_elapsed() {
        assert_eq!(fmt_elapsed(Duration::from_secs(8)), "0:08");
        assert_eq!(fmt_elapsed(Duration::from_secs(125)), "2:05");
    }
}
