use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};
use unicode_width::UnicodeWidthStr;

use marquee_core::Phase;

use crate::app::App;

pub struct StatusBarWidget;

impl StatusBarWidget {
    pub fn render(frame: &mut Frame, area: Rect, app: &App) {
        let theme = &app.theme;

        let phase_str = match app.typewriter_phase() {
            Phase::Idle => "IDLE",
            Phase::Running => "TYPING",
            Phase::Complete => "DONE",
        };

        let status_text = if let Some(msg) = &app.status_message {
            format!(" {}", msg)
        } else {
            let max = app.max_scroll();
            let percent = if max == 0 {
                100
            } else {
                app.current_scroll() as u32 * 100 / max as u32
            };
            let mut text = format!(" {} | {}%", phase_str, percent);
            if app.mobile {
                text.push_str(" | compact");
            }
            if app.config.ui.reduced_motion {
                text.push_str(" | reduced motion");
            }
            text
        };

        let help_hint = " q:quit j/k:scroll 1-4:sections tab:focus enter:copy/open r:retype ";
        let padding_len = (area.width as usize)
            .saturating_sub(status_text.width() + help_hint.width());

        let line = Line::from(vec![
            Span::styled(
                status_text,
                Style::default().fg(theme.heading).bg(theme.surface),
            ),
            Span::styled(
                " ".repeat(padding_len),
                Style::default().bg(theme.surface),
            ),
            Span::styled(
                help_hint,
                Style::default().fg(theme.muted).bg(theme.surface),
            ),
        ]);

        let paragraph = Paragraph::new(line);
        frame.render_widget(paragraph, area);
    }
}
