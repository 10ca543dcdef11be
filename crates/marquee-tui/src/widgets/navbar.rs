use std::time::Instant;

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget},
    Frame,
};
use unicode_width::UnicodeWidthStr;

use marquee_core::page::{FocusTarget, NavbarStyle};

use crate::app::App;

/// Fixed navbar: brand on the left, section links on the right
///
/// At the top of the page the bar blends into the page background; once
/// scrolled it turns solid and grows a shadow row.
pub struct NavbarWidget;

impl NavbarWidget {
    pub fn render(frame: &mut Frame, area: Rect, app: &App, at: Instant) {
        Self::draw(frame.buffer_mut(), area, app, at);
    }

    pub fn draw(buf: &mut Buffer, area: Rect, app: &App, at: Instant) {
        if area.height == 0 {
            return;
        }
        let theme = &app.theme;
        let style = app.navbar_style();
        let bar_bg = match style {
            NavbarStyle::Top => theme.bg,
            NavbarStyle::Scrolled => theme.surface,
        };

        let brand = format!(" 🛡  {} ", app.page.brand);
        let mut links: Vec<Span> = Vec::new();
        for (i, link) in app.page.nav.iter().enumerate() {
            let focused = app.focused_target() == Some(FocusTarget::Nav(i));
            let scale = app.hover_scale(FocusTarget::Nav(i), at);
            let pad = if scale > 1.025 { "  " } else { " " };
            let mut link_style = Style::default().fg(theme.fg).bg(bar_bg);
            if focused {
                link_style = link_style
                    .fg(theme.accent)
                    .add_modifier(Modifier::BOLD | Modifier::UNDERLINED);
            }
            links.push(Span::styled(
                format!("{}", i + 1),
                Style::default().fg(theme.muted).bg(bar_bg),
            ));
            links.push(Span::styled(
                format!("{}{}{}", pad, link.label, pad),
                link_style,
            ));
        }

        let links_width: usize = links.iter().map(|s| s.content.width()).sum();
        let padding = (area.width as usize).saturating_sub(brand.width() + links_width + 1);

        let mut spans = vec![
            Span::styled(
                brand,
                Style::default()
                    .fg(theme.heading)
                    .bg(bar_bg)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(" ".repeat(padding), Style::default().bg(bar_bg)),
        ];
        spans.extend(links);
        spans.push(Span::styled(" ", Style::default().bg(bar_bg)));

        let bar = Rect { height: 1, ..area };
        Paragraph::new(Line::from(spans))
            .style(Style::default().bg(bar_bg))
            .render(bar, buf);

        if area.height > 1 {
            let edge = Rect {
                y: area.y + 1,
                height: 1,
                ..area
            };
            let line = match style {
                NavbarStyle::Top => Line::styled(
                    " ".repeat(area.width as usize),
                    Style::default().bg(theme.bg),
                ),
                NavbarStyle::Scrolled => Line::styled(
                    "▀".repeat(area.width as usize),
                    Style::default().fg(theme.surface).bg(theme.bg),
                ),
            };
            buf.set_line(edge.x, edge.y, &line, edge.width);
        }
    }
}
