use std::collections::HashMap;
use std::time::Instant;

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    Frame,
};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use marquee_core::clipboard::CopyStyle;
use marquee_core::motion::landing::{targets, HOVER_SCALE};
use marquee_core::motion::Props;
use marquee_core::page::{wrap_text, Block, BlockKind, FocusTarget};

use crate::app::{App, PAGE_MARGIN};
use crate::theme::Theme;

/// Pixels of animation offset per terminal row
const PX_PER_ROW: f64 = 16.0;
/// Pixels of animation offset per terminal column
const PX_PER_COL: f64 = 8.0;

/// Scrollable landing page
pub struct PageWidget;

impl PageWidget {
    pub fn render(frame: &mut Frame, area: Rect, app: &App, at: Instant) {
        Self::draw(frame.buffer_mut(), area, app, at);
    }

    pub fn draw(buf: &mut Buffer, area: Rect, app: &App, at: Instant) {
        let theme = &app.theme;
        buf.set_style(area, Style::default().bg(theme.bg).fg(theme.fg));
        if area.width == 0 || area.height == 0 {
            return;
        }

        let mut painter = Painter {
            canvas: Canvas {
                buf,
                area,
                scroll: app.current_scroll() as i32,
            },
            app,
            at,
            left: PAGE_MARGIN as i32,
            width: app.page.width(),
        };

        painter.parallax();

        // running element index per class, in document order
        let mut seen: HashMap<&'static str, usize> = HashMap::new();
        for (s, section) in app.page.sections.iter().enumerate() {
            let Some(top) = app.page.section_top(s) else {
                continue;
            };
            if let Some(title) = &section.title {
                let style = Style::default()
                    .fg(theme.heading)
                    .add_modifier(Modifier::BOLD);
                painter.centered(top as i32 + 1, painter.left, painter.width, title, style);
            }

            for (b, block) in section.blocks.iter().enumerate() {
                let count = seen.entry(block.class).or_insert(0);
                let first = *count;
                *count += block.element_count();

                let Some(row) = app.page.block_top(s, b) else {
                    continue;
                };
                let height = block.height(painter.width) as i32;
                if !painter.canvas.rows_visible(row as i32 - 4, height + 8) {
                    continue;
                }
                painter.block(
                    block,
                    BlockAt {
                        section: s,
                        block: b,
                        row: row as i32,
                        first,
                    },
                );
            }
        }
    }
}

/// Where a block sits on the page
#[derive(Debug, Clone, Copy)]
struct BlockAt {
    section: usize,
    block: usize,
    row: i32,
    /// Index of the block's first element among its class
    first: usize,
}

/// Animation props mapped onto the cell grid
#[derive(Debug, Clone, Copy)]
struct Placement {
    dx: i32,
    dy: i32,
    opacity: f64,
    scale: f64,
}

impl Placement {
    fn from_props(props: Props) -> Self {
        Self {
            dx: (props.x / PX_PER_COL).round() as i32,
            dy: (props.y / PX_PER_ROW).round() as i32,
            opacity: props.opacity.clamp(0.0, 1.0),
            scale: props.scale.max(0.0),
        }
    }

    fn visible(&self) -> bool {
        self.opacity > 0.02
    }

    /// Scaled `width` and the inset that keeps it centered
    fn scaled(&self, width: u16) -> (i32, u16) {
        let scaled = (width as f64 * self.scale).round().clamp(0.0, width as f64) as u16;
        ((width as i32 - scaled as i32) / 2, scaled)
    }
}

/// Buffer view in page coordinates: rows count from the top of the page
struct Canvas<'b> {
    buf: &'b mut Buffer,
    area: Rect,
    scroll: i32,
}

impl Canvas<'_> {
    fn rows_visible(&self, row: i32, height: i32) -> bool {
        row + height > self.scroll && row < self.scroll + self.area.height as i32
    }

    /// Write `text` at page `row`, `col` columns from the left edge; clipped
    fn put(&mut self, col: i32, row: i32, text: &str, style: Style) {
        let y = row - self.scroll;
        if y < 0 || y >= self.area.height as i32 {
            return;
        }
        let right = self.area.width as i32;
        if col >= right {
            return;
        }

        let mut col = col;
        let mut visible = String::new();
        for ch in text.chars() {
            let w = ch.width().unwrap_or(0) as i32;
            if col < 0 {
                col += w;
                if col > 0 {
                    // wide char cut by the left edge
                    visible.push_str(&" ".repeat(col as usize));
                }
                continue;
            }
            visible.push(ch);
        }
        let col = col.max(0);
        if col >= right || visible.is_empty() {
            return;
        }
        self.buf.set_stringn(
            self.area.x + col as u16,
            self.area.y + y as u16,
            &visible,
            (right - col) as usize,
            style,
        );
    }

    fn fill(&mut self, col: i32, row: i32, width: u16, style: Style) {
        self.put(col, row, &" ".repeat(width as usize), style);
    }
}

struct Painter<'a, 'b> {
    canvas: Canvas<'b>,
    app: &'a App,
    at: Instant,
    left: i32,
    width: u16,
}

impl<'a> Painter<'a, '_> {
    fn theme(&self) -> &'a Theme {
        &self.app.theme
    }

    fn fade(&self, color: Color, opacity: f64) -> Color {
        self.app.theme.fade(color, opacity)
    }

    fn fg(&self, color: Color, opacity: f64) -> Style {
        Style::default().fg(self.fade(color, opacity))
    }

    fn centered(&mut self, row: i32, left: i32, width: u16, text: &str, style: Style) {
        let pad = (width as i32 - text.width() as i32).max(0) / 2;
        self.canvas.put(left + pad, row, text, style);
    }

    fn placement(&self, class: &str, index: usize) -> Placement {
        Placement::from_props(self.app.props(class, index, self.at))
    }

    fn is_focused(&self, target: FocusTarget) -> bool {
        self.app.focused_target() == Some(target)
    }

    /// Extra padding columns while a button is scaled up
    fn hover_pad(&self, target: FocusTarget) -> usize {
        let scale = self.app.hover_scale(target, self.at);
        ((scale - 1.0) / (HOVER_SCALE - 1.0)).round().clamp(0.0, 1.0) as usize
    }

    /// Dot pattern behind the hero, shifted by the parallax scrub
    fn parallax(&mut self) {
        let app = self.app;
        let page = &app.page;
        let Some(hero) = page.sections.iter().position(|s| s.class == targets::HERO) else {
            return;
        };
        let Some(top) = page.section_top(hero) else {
            return;
        };
        let bottom = page
            .section_top(hero + 1)
            .unwrap_or_else(|| page.total_height());
        let height = bottom.saturating_sub(top) as i32;
        let shift = (app.motion.hero_parallax() / 100.0 * height as f64).round() as i32;
        let style = self.fg(app.theme.border, 0.6);
        let width = self.canvas.area.width as i32;

        for row in top as i32..top as i32 + height {
            let phase = (row - top as i32 - shift).rem_euclid(4);
            if phase != 0 {
                continue;
            }
            let offset = (row - shift).rem_euclid(8) / 4 * 3;
            let mut col = offset;
            while col < width {
                self.canvas.put(col, row, "·", style);
                col += 6;
            }
        }
    }

    fn block(&mut self, block: &Block, at: BlockAt) {
        match &block.kind {
            BlockKind::Badge(text) => self.badge(block, at, text),
            BlockKind::Heading(text) => self.heading(block, at, text),
            BlockKind::Text(text) => self.text(block, at, text),
            BlockKind::Typewriter { .. } => self.typewriter(block, at),
            BlockKind::Buttons(buttons) => {
                let labels: Vec<(&str, bool)> =
                    buttons.iter().map(|b| (b.label.as_str(), b.primary)).collect();
                self.buttons(block, at, &labels);
            }
            BlockKind::CodeWindow { title, lines } => self.code_window(block, at, title, lines),
            BlockKind::Card { icon, title, body } => self.card(block, at, icon, title, body),
            BlockKind::Step {
                number,
                title,
                command,
            } => self.command_box(block, at, &format!("{}  {}", circled(*number), title), command),
            BlockKind::Command { title, command } => self.command_box(block, at, title, command),
            BlockKind::Stats(stats) => self.stats(block, at, stats),
        }
    }

    fn badge(&mut self, block: &Block, at: BlockAt, text: &str) {
        let p = self.placement(block.class, at.first);
        if !p.visible() {
            return;
        }
        let theme = self.theme();
        let style = Style::default()
            .fg(self.fade(theme.accent, p.opacity))
            .bg(self.fade(theme.surface, p.opacity));
        let label = format!(" ● {} ", text);
        self.centered(at.row + p.dy, self.left + p.dx, self.width, &label, style);
    }

    fn heading(&mut self, block: &Block, at: BlockAt, text: &str) {
        let p = self.placement(block.class, at.first);
        if !p.visible() {
            return;
        }
        let style = self
            .fg(self.app.theme.heading, p.opacity)
            .add_modifier(Modifier::BOLD);
        self.centered(at.row + p.dy, self.left + p.dx, self.width, text, style);
    }

    fn text(&mut self, block: &Block, at: BlockAt, text: &str) {
        let p = self.placement(block.class, at.first);
        if !p.visible() {
            return;
        }
        let style = self.fg(self.app.theme.fg, p.opacity);
        for (i, line) in wrap_text(text, self.width).iter().enumerate() {
            self.centered(at.row + p.dy + i as i32, self.left + p.dx, self.width, line, style);
        }
    }

    fn typewriter(&mut self, block: &Block, at: BlockAt) {
        let p = self.placement(block.class, at.first);
        if !p.visible() {
            return;
        }
        let target = FocusTarget::Copy {
            section: at.section,
            block: at.block,
        };
        let full = self.app.page.typewriter_text().width() as u16;
        let box_width = (full + 16).max(40).min(self.width);
        let left = self.left + p.dx + (self.width - box_width) as i32 / 2;
        let row = at.row + p.dy;
        let focused = self.is_focused(target);
        self.frame(left, row, box_width, 3, p.opacity, focused, None);

        let theme = self.theme();
        let prompt = self.fg(theme.success, p.opacity).add_modifier(Modifier::BOLD);
        let code = self.fg(theme.code, p.opacity);
        self.canvas.put(left + 2, row + 1, "$ ", prompt);
        let typed = self.app.typewriter_line.text();
        self.canvas.put(left + 4, row + 1, &typed, code);
        if self.app.cursor_visible(self.at) {
            let cursor = self.fg(theme.accent, p.opacity);
            self.canvas
                .put(left + 4 + typed.width() as i32, row + 1, "▋", cursor);
        }
        self.copy_label(target, left + box_width as i32 - 1, row + 1, p.opacity);
    }

    fn buttons(&mut self, block: &Block, at: BlockAt, buttons: &[(&str, bool)]) {
        let labels: Vec<(FocusTarget, String, bool)> = buttons
            .iter()
            .enumerate()
            .map(|(index, (label, primary))| {
                let target = FocusTarget::Button {
                    section: at.section,
                    block: at.block,
                    index,
                };
                let pad = " ".repeat(2 + self.hover_pad(target));
                (target, format!("{}{}{}", pad, label, pad), *primary)
            })
            .collect();

        let total: i32 = labels.iter().map(|(_, l, _)| l.width() as i32 + 2).sum::<i32>() - 2;
        let mut col = self.left + (self.width as i32 - total).max(0) / 2;

        for (i, (target, label, primary)) in labels.iter().enumerate() {
            let p = self.placement(block.class, at.first + i);
            let width = label.width() as i32;
            if p.visible() {
                let theme = self.theme();
                let mut style = if *primary {
                    Style::default()
                        .fg(self.fade(theme.accent_fg, p.opacity))
                        .bg(self.fade(theme.accent, p.opacity))
                } else {
                    Style::default()
                        .fg(self.fade(theme.heading, p.opacity))
                        .bg(self.fade(theme.surface, p.opacity))
                };
                if self.is_focused(*target) {
                    style = style.add_modifier(Modifier::BOLD | Modifier::UNDERLINED);
                }
                self.canvas.put(col + p.dx, at.row + p.dy, label, style);
            }
            col += width + 2;
        }
    }

    fn code_window(&mut self, block: &Block, at: BlockAt, title: &str, lines: &[String]) {
        let p = self.placement(block.class, at.first);
        if !p.visible() {
            return;
        }
        let props = self.app.props(block.class, at.first, self.at);
        let natural = lines
            .iter()
            .map(|l| l.width() as u16 + 6)
            .max()
            .unwrap_or(0)
            .max(title.width() as u16 + 14)
            .min(self.width);
        let (inset, width) = p.scaled(natural);
        let left = self.left + p.dx + (self.width - natural) as i32 / 2 + inset;
        let row = at.row + p.dy;
        let height = lines.len() as u16 + 3;

        self.frame(left, row, width, height, p.opacity, false, Some(title));

        // rows lean with the tilt
        let mid = (height as f64 - 1.0) / 2.0;
        let lean = props.rotation_y / 5.0;
        let theme = self.theme();
        let code = self.fg(theme.code, p.opacity);
        for (i, line) in lines.iter().enumerate() {
            let line_row = row + 2 + i as i32;
            let skew = ((line_row - row) as f64 - mid) / mid.max(1.0) * lean;
            let skew = skew.round() as i32;
            let max = width.saturating_sub(4) as usize;
            let text: String = line.chars().take(max).collect();
            self.canvas.put(left + 2 + skew, line_row, &text, code);
        }
    }

    fn card(&mut self, block: &Block, at: BlockAt, icon: &str, title: &str, body: &str) {
        let p = self.placement(block.class, at.first);
        if !p.visible() {
            return;
        }
        let height = block.height(self.width);
        let left = self.left + p.dx;
        let row = at.row + p.dy;
        self.frame(left, row, self.width, height, p.opacity, false, None);

        let theme = self.theme();
        let float = self.placement(targets::FEATURE_ICON, at.first);
        let icon_row = row + 1 + float.dy.clamp(-1, 0);
        self.canvas.put(left + 2, icon_row, icon, self.fg(theme.heading, p.opacity));
        let title_style = self
            .fg(theme.heading, p.opacity)
            .add_modifier(Modifier::BOLD);
        self.canvas.put(left + 5, row + 1, title, title_style);

        let body_style = self.fg(theme.fg, p.opacity);
        for (i, line) in wrap_text(body, self.width.saturating_sub(4)).iter().enumerate() {
            self.canvas.put(left + 2, row + 2 + i as i32, line, body_style);
        }
    }

    fn command_box(&mut self, block: &Block, at: BlockAt, title: &str, command: &str) {
        let p = self.placement(block.class, at.first);
        if !p.visible() {
            return;
        }
        let target = FocusTarget::Copy {
            section: at.section,
            block: at.block,
        };
        let left = self.left + p.dx;
        let row = at.row + p.dy;
        let focused = self.is_focused(target);
        self.frame(left, row, self.width, 4, p.opacity, focused, None);

        let theme = self.theme();
        let title_style = self
            .fg(theme.heading, p.opacity)
            .add_modifier(Modifier::BOLD);
        self.canvas.put(left + 2, row + 1, title, title_style);
        self.canvas.put(
            left + 2,
            row + 2,
            "$ ",
            self.fg(theme.success, p.opacity),
        );
        self.canvas
            .put(left + 4, row + 2, command, self.fg(theme.code, p.opacity));
        self.copy_label(target, left + self.width as i32 - 1, row + 2, p.opacity);
    }

    fn stats(&mut self, block: &Block, at: BlockAt, stats: &[marquee_core::page::Stat]) {
        if stats.is_empty() {
            return;
        }
        let slot = self.width / stats.len() as u16;
        for (i, stat) in stats.iter().enumerate() {
            let p = self.placement(block.class, at.first + i);
            if !p.visible() {
                continue;
            }
            let theme = self.theme();
            let left = self.left + p.dx + (slot * i as u16) as i32;
            let value = self.fg(theme.accent, p.opacity).add_modifier(Modifier::BOLD);
            let label = self.fg(theme.muted, p.opacity);
            self.centered(at.row + p.dy, left, slot, &stat.value, value);
            self.centered(at.row + p.dy + 1, left, slot, &stat.label, label);
        }
    }

    /// `[ Copy ]` ending just left of column `right`
    fn copy_label(&mut self, target: FocusTarget, right: i32, row: i32, opacity: f64) {
        let Some(button) = self.app.copy_button(target) else {
            return;
        };
        let pad = " ".repeat(1 + self.hover_pad(target));
        let label = format!("[{}{}{}]", pad, button.label(), pad);
        let theme = self.theme();
        let color = match button.style() {
            CopyStyle::Normal => theme.muted,
            CopyStyle::Success => theme.success,
            CopyStyle::Error => theme.error,
        };
        let mut style = self.fg(color, opacity);
        if self.is_focused(target) {
            style = style
                .fg(self.fade(theme.accent_fg, opacity))
                .bg(self.fade(color, opacity))
                .add_modifier(Modifier::BOLD);
        }
        let col = right - 1 - label.width() as i32;
        self.canvas.put(col, row, &label, style);
    }

    /// Rounded box on a surface background, with an optional window title bar
    #[allow(clippy::too_many_arguments)]
    fn frame(
        &mut self,
        left: i32,
        row: i32,
        width: u16,
        height: u16,
        opacity: f64,
        focused: bool,
        title: Option<&str>,
    ) {
        if width < 2 || height < 2 {
            return;
        }
        let theme = self.theme();
        let surface = self.fade(theme.surface, opacity);
        let border_color = if focused { theme.accent } else { theme.border };
        let border = Style::default()
            .fg(self.fade(border_color, opacity))
            .bg(surface);
        let inner = width as usize - 2;

        self.canvas
            .put(left, row, &format!("╭{}╮", "─".repeat(inner)), border);
        for r in 1..height as i32 - 1 {
            self.canvas.put(left, row + r, "│", border);
            self.canvas
                .fill(left + 1, row + r, width - 2, Style::default().bg(surface));
            self.canvas.put(left + width as i32 - 1, row + r, "│", border);
        }
        self.canvas.put(
            left,
            row + height as i32 - 1,
            &format!("╰{}╯", "─".repeat(inner)),
            border,
        );

        if let Some(title) = title {
            let dots = [theme.error, Color::Rgb(0xf5, 0x9e, 0x0b), theme.success];
            for (i, color) in dots.into_iter().enumerate() {
                let style = Style::default().fg(self.fade(color, opacity)).bg(surface);
                self.canvas.put(left + 2 + 2 * i as i32, row + 1, "●", style);
            }
            let style = Style::default().fg(self.fade(theme.muted, opacity)).bg(surface);
            self.canvas.put(left + 9, row + 1, title, style);
        }
    }
}

fn circled(number: u8) -> String {
    match number {
        1..=9 => char::from_u32(0x2460 + number as u32 - 1)
            .map(String::from)
            .unwrap_or_else(|| number.to_string()),
        _ => number.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use marquee_core::clipboard::MemoryClipboard;
    use marquee_core::AppConfig;
    use std::sync::Arc;
    use std::time::Duration;

    fn app(t0: Instant) -> App {
        let mut config = AppConfig::default();
        config.ui.scroll.smooth_enabled = false;
        let mut app = App::with_clipboard(Arc::new(config), Box::new(MemoryClipboard::new()), t0);
        app.resize(100, 40);
        app
    }

    fn row_text(buf: &Buffer, y: u16) -> String {
        (0..buf.area.width)
            .map(|x| buf[(x, y)].symbol().to_string())
            .collect()
    }

    fn screen(buf: &Buffer) -> String {
        (0..buf.area.height)
            .map(|y| row_text(buf, y))
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn test_hero_settles_with_title_and_copy() {
        let t0 = Instant::now();
        let mut app = app(t0);
        let later = t0 + Duration::from_secs(5);
        app.tick(later);

        let area = Rect::new(0, 0, 100, app.viewport_height);
        let mut buf = Buffer::empty(area);
        PageWidget::draw(&mut buf, area, &app, later);

        let text = screen(&buf);
        assert!(text.contains("$ "));
        assert!(text.contains("[ Copy ]"));
        assert!(text.contains("Get Started"));
    }

    #[test]
    fn test_hero_hidden_before_entrance() {
        let t0 = Instant::now();
        let app = app(t0);
        let area = Rect::new(0, 0, 100, app.viewport_height);
        let mut buf = Buffer::empty(area);
        PageWidget::draw(&mut buf, area, &app, t0);

        assert!(!screen(&buf).contains("Get Started"));
    }

    #[test]
    fn test_canvas_clips_left_and_scroll() {
        let area = Rect::new(0, 0, 10, 2);
        let mut buf = Buffer::empty(area);
        let mut canvas = Canvas {
            buf: &mut buf,
            area,
            scroll: 5,
        };
        canvas.put(-2, 5, "abcdef", Style::default());
        canvas.put(0, 4, "hidden", Style::default());
        canvas.put(8, 6, "xyz", Style::default());

        assert_eq!(row_text(&buf, 0), "cdef      ");
        assert_eq!(row_text(&buf, 1), "        xy");
    }

    #[test]
    fn test_placement_maps_pixels_to_cells() {
        let p = Placement::from_props(Props {
            y: 30.0,
            x: -50.0,
            ..Props::REST
        });
        assert_eq!(p.dy, 2);
        assert_eq!(p.dx, -6);
        let (inset, width) = Placement::from_props(Props {
            scale: 0.9,
            ..Props::REST
        })
        .scaled(40);
        assert_eq!((inset, width), (2, 36));
    }
}
