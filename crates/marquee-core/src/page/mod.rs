//! Landing page content and its row layout
//!
//! A page is a column of sections, each a column of blocks. Layout assigns
//! every block a top row for a given terminal width; those rows drive anchor
//! navigation and scroll triggers.

mod landing;

use crate::motion::Bounds;

pub use landing::FALLBACK_TYPEWRITER_TEXT;

/// A link in the fixed navbar
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavLink {
    pub label: String,
    pub href: String,
}

impl NavLink {
    pub fn new(label: &str, href: &str) -> Self {
        Self {
            label: label.to_string(),
            href: href.to_string(),
        }
    }
}

/// A clickable button; in-page links start with `#`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Button {
    pub label: String,
    pub href: String,
    pub primary: bool,
}

impl Button {
    pub fn new(label: &str, href: &str, primary: bool) -> Self {
        Self {
            label: label.to_string(),
            href: href.to_string(),
            primary,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stat {
    pub value: String,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlockKind {
    Badge(String),
    Heading(String),
    Text(String),
    /// The typewriter line; `text` is its `data-text`
    Typewriter { text: String },
    Buttons(Vec<Button>),
    CodeWindow { title: String, lines: Vec<String> },
    Card { icon: String, title: String, body: String },
    Step { number: u8, title: String, command: String },
    /// A command with a copy button
    Command { title: String, command: String },
    Stats(Vec<Stat>),
}

/// One element of a section, tagged with the class animations target
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    pub class: &'static str,
    pub kind: BlockKind,
}

impl Block {
    pub fn new(class: &'static str, kind: BlockKind) -> Self {
        Self { class, kind }
    }

    /// Rows taken at `width` columns
    pub fn height(&self, width: u16) -> u16 {
        match &self.kind {
            BlockKind::Badge(_) | BlockKind::Heading(_) | BlockKind::Buttons(_) => 1,
            BlockKind::Text(text) => wrapped_rows(text, width),
            // boxed command line
            BlockKind::Typewriter { .. } => 3,
            // border and title bar
            BlockKind::CodeWindow { lines, .. } => lines.len() as u16 + 3,
            // border, title and body
            BlockKind::Card { body, .. } => wrapped_rows(body, width.saturating_sub(4)) + 3,
            BlockKind::Step { .. } | BlockKind::Command { .. } => 4,
            BlockKind::Stats(_) => 2,
        }
    }

    /// How many animated elements the block holds
    pub fn element_count(&self) -> usize {
        match &self.kind {
            BlockKind::Buttons(buttons) => buttons.len(),
            BlockKind::Stats(stats) => stats.len(),
            _ => 1,
        }
    }

    /// Text a copy button on this block puts on the clipboard
    pub fn copy_payload(&self) -> Option<&str> {
        match &self.kind {
            BlockKind::Typewriter { text } => Some(text),
            BlockKind::Step { command, .. } | BlockKind::Command { command, .. } => Some(command),
            _ => None,
        }
    }
}

/// Greedy word wrap at `width` columns; always at least one line
///
/// Words longer than a line are split across lines.
pub fn wrap_text(text: &str, width: u16) -> Vec<String> {
    let width = width.max(1) as usize;
    let mut lines = Vec::new();
    let mut line = String::new();
    let mut len = 0;

    for word in text.split_whitespace() {
        let mut chars: Vec<char> = word.chars().collect();
        while chars.len() > width {
            if len > 0 {
                lines.push(std::mem::take(&mut line));
                len = 0;
            }
            lines.push(chars.drain(..width).collect());
        }
        if chars.is_empty() {
            continue;
        }

        if len == 0 {
            line.extend(chars.iter());
            len = chars.len();
        } else if len + 1 + chars.len() <= width {
            line.push(' ');
            line.extend(chars.iter());
            len += 1 + chars.len();
        } else {
            lines.push(std::mem::take(&mut line));
            line.extend(chars.iter());
            len = chars.len();
        }
    }

    if len > 0 || lines.is_empty() {
        lines.push(line);
    }
    lines
}

fn wrapped_rows(text: &str, width: u16) -> u16 {
    wrap_text(text, width).len() as u16
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    /// Anchor id without the leading `#`
    pub anchor: String,
    pub class: &'static str,
    pub title: Option<String>,
    pub blocks: Vec<Block>,
}

impl Section {
    pub fn new(anchor: &str, class: &'static str, title: Option<&str>, blocks: Vec<Block>) -> Self {
        Self {
            anchor: anchor.to_string(),
            class,
            title: title.map(str::to_string),
            blocks,
        }
    }
}

/// Something keyboard focus can land on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FocusTarget {
    Nav(usize),
    /// A button inside a `Buttons` block
    Button { section: usize, block: usize, index: usize },
    /// The copy button of a block
    Copy { section: usize, block: usize },
}

/// Navbar appearance for a scroll position
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavbarStyle {
    /// Translucent, no shadow
    Top,
    /// Opaque, with a shadow
    Scrolled,
}

impl NavbarStyle {
    pub fn for_scroll(scroll: u16, threshold: u16) -> Self {
        if scroll > threshold {
            NavbarStyle::Scrolled
        } else {
            NavbarStyle::Top
        }
    }
}

/// Rows between sections
const SECTION_GAP: u16 = 2;

#[derive(Debug, Clone, Default)]
struct Layout {
    width: u16,
    section_tops: Vec<u16>,
    section_heights: Vec<u16>,
    block_tops: Vec<Vec<u16>>,
    total_height: u16,
}

#[derive(Debug, Clone)]
pub struct Page {
    pub brand: String,
    pub nav: Vec<NavLink>,
    pub sections: Vec<Section>,
    layout: Layout,
}

impl Page {
    pub fn new(brand: &str, nav: Vec<NavLink>, sections: Vec<Section>) -> Self {
        let mut page = Self {
            brand: brand.to_string(),
            nav,
            sections,
            layout: Layout::default(),
        };
        page.layout(80);
        page
    }

    /// The PyWard landing page
    pub fn landing() -> Self {
        landing::build()
    }

    /// Recompute row positions for content `width` columns wide
    ///
    /// Returns `true` if any position changed.
    pub fn layout(&mut self, width: u16) -> bool {
        let mut layout = Layout {
            width,
            ..Layout::default()
        };

        let mut row = 0u16;
        for section in &self.sections {
            let top = row;
            row += 1; // padding
            if section.title.is_some() {
                row += 2;
            }
            let mut tops = Vec::with_capacity(section.blocks.len());
            for block in &section.blocks {
                tops.push(row);
                row += block.height(width) + 1;
            }
            layout.section_tops.push(top);
            layout.section_heights.push(row - top);
            layout.block_tops.push(tops);
            row += SECTION_GAP;
        }
        layout.total_height = row;

        let changed = layout.section_tops != self.layout.section_tops
            || layout.block_tops != self.layout.block_tops;
        self.layout = layout;
        changed
    }

    pub fn width(&self) -> u16 {
        self.layout.width
    }

    pub fn total_height(&self) -> u16 {
        self.layout.total_height
    }

    pub fn section_top(&self, section: usize) -> Option<u16> {
        self.layout.section_tops.get(section).copied()
    }

    pub fn block_top(&self, section: usize, block: usize) -> Option<u16> {
        self.layout.block_tops.get(section)?.get(block).copied()
    }

    /// Furthest scroll offset for a viewport `viewport_height` rows tall
    pub fn max_scroll(&self, viewport_height: u16) -> u16 {
        self.layout.total_height.saturating_sub(viewport_height)
    }

    /// Bounds of every element carrying `class`, in document order
    ///
    /// Section classes yield the whole section; block classes yield one
    /// bounds per element in the block.
    pub fn bounds_of(&self, class: &str) -> Vec<Bounds> {
        let mut bounds = Vec::new();
        for (s, section) in self.sections.iter().enumerate() {
            if section.class == class {
                bounds.push(Bounds::new(
                    self.layout.section_tops[s] as f64,
                    self.layout.section_heights[s] as f64,
                ));
                continue;
            }
            for (b, block) in section.blocks.iter().enumerate() {
                if block.class != class {
                    continue;
                }
                let top = self.layout.block_tops[s][b] as f64;
                let height = block.height(self.layout.width) as f64;
                bounds.extend((0..block.element_count()).map(|_| Bounds::new(top, height)));
            }
        }
        bounds
    }

    /// Text for the typewriter line, falling back when the page has none
    pub fn typewriter_text(&self) -> &str {
        self.blocks()
            .find_map(|(_, _, block)| match &block.kind {
                BlockKind::Typewriter { text } if !text.is_empty() => Some(text.as_str()),
                _ => None,
            })
            .unwrap_or(FALLBACK_TYPEWRITER_TEXT)
    }

    /// Replace the `data-text` of the typewriter line
    pub fn set_typewriter_text(&mut self, text: &str) {
        for section in &mut self.sections {
            for block in &mut section.blocks {
                if let BlockKind::Typewriter { text: current } = &mut block.kind {
                    *current = text.to_string();
                }
            }
        }
    }

    /// Scroll offset that brings `anchor` just below the navbar
    ///
    /// Accepts `#install` or `install`. Unknown anchors yield `None`.
    pub fn anchor_target(&self, anchor: &str, navbar_offset: u16, max_scroll: u16) -> Option<u16> {
        let id = anchor.strip_prefix('#').unwrap_or(anchor);
        if id.is_empty() {
            return None;
        }
        let index = self.sections.iter().position(|s| s.anchor == id)?;
        let top = self.layout.section_tops[index];
        Some(top.saturating_sub(navbar_offset).min(max_scroll))
    }

    /// Every focusable element: navbar links first, then the page in order
    pub fn focus_targets(&self) -> Vec<FocusTarget> {
        let mut targets: Vec<_> = (0..self.nav.len()).map(FocusTarget::Nav).collect();
        for (section, block, b) in self.blocks() {
            if let BlockKind::Buttons(buttons) = &b.kind {
                targets.extend((0..buttons.len()).map(|index| FocusTarget::Button {
                    section,
                    block,
                    index,
                }));
            } else if b.copy_payload().is_some() {
                targets.push(FocusTarget::Copy { section, block });
            }
        }
        targets
    }

    pub fn block(&self, section: usize, block: usize) -> Option<&Block> {
        self.sections.get(section)?.blocks.get(block)
    }

    /// Row a focus target sits on, `None` for the fixed navbar
    pub fn focus_row(&self, target: FocusTarget) -> Option<u16> {
        match target {
            FocusTarget::Nav(_) => None,
            FocusTarget::Button { section, block, .. } | FocusTarget::Copy { section, block } => {
                self.block_top(section, block)
            }
        }
    }

    /// Every block with its section and block index
    pub fn blocks(&self) -> impl Iterator<Item = (usize, usize, &Block)> {
        self.sections.iter().enumerate().flat_map(|(s, section)| {
            section
                .blocks
                .iter()
                .enumerate()
                .map(move |(b, block)| (s, b, block))
        })
    }
}
