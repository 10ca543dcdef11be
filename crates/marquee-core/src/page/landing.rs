use super::{Block, BlockKind, Button, NavLink, Page, Section, Stat};
use crate::motion::landing::targets::*;

/// Typed when the page does not set its own command
pub const FALLBACK_TYPEWRITER_TEXT: &str = "pip install pyward-cli";

const REPO_URL: &str = "https://github.com/karanlvm/pyward-cli";
const ISSUES_URL: &str = "https://github.com/karanlvm/pyward-cli/issues";

fn text(class: &'static str, kind: fn(String) -> BlockKind, value: &str) -> Block {
    Block::new(class, kind(value.to_string()))
}

fn card(icon: &str, title: &str, body: &str) -> Block {
    Block::new(
        FEATURE_CARD,
        BlockKind::Card {
            icon: icon.to_string(),
            title: title.to_string(),
            body: body.to_string(),
        },
    )
}

fn step(number: u8, title: &str, command: &str) -> Block {
    Block::new(
        STEP,
        BlockKind::Step {
            number,
            title: title.to_string(),
            command: command.to_string(),
        },
    )
}

fn usage(title: &str, command: &str) -> Block {
    Block::new(
        USAGE_CARD,
        BlockKind::Command {
            title: title.to_string(),
            command: command.to_string(),
        },
    )
}

fn stat(value: &str, label: &str) -> Stat {
    Stat {
        value: value.to_string(),
        label: label.to_string(),
    }
}

pub(super) fn build() -> Page {
    let nav = vec![
        NavLink::new("Features", "#features"),
        NavLink::new("Install", "#install"),
        NavLink::new("Usage", "#usage"),
        NavLink::new("Contribute", "#contribute"),
    ];

    let hero = Section::new(
        "home",
        HERO,
        None,
        vec![
            text(HERO_BADGE, BlockKind::Badge, "Python linter for speed and safety"),
            text(
                HERO_TITLE,
                BlockKind::Heading,
                "Catch slow and unsafe Python before it ships",
            ),
            text(
                HERO_SUBTITLE,
                BlockKind::Text,
                "PyWard is a command-line linter that flags optimization \
                 opportunities and security risks in your Python code, \
                 and fixes what it can.",
            ),
            Block::new(
                TYPEWRITER,
                BlockKind::Typewriter {
                    text: FALLBACK_TYPEWRITER_TEXT.to_string(),
                },
            ),
            Block::new(
                HERO_BUTTONS,
                BlockKind::Buttons(vec![
                    Button::new("Get Started", "#install", true),
                    Button::new("View on GitHub", REPO_URL, false),
                ]),
            ),
            Block::new(
                CODE_WINDOW,
                BlockKind::CodeWindow {
                    title: "demo.py".to_string(),
                    lines: vec![
                        "$ pyward demo.py".to_string(),
                        "[Optimization] Line 1: 'os' is imported but never used.".to_string(),
                        "[Optimization] Line 7: Loop-invariant len(items) in loop.".to_string(),
                        "[Security] Line 12: exec() call may run arbitrary code.".to_string(),
                        "[Security] Line 20: SSL verification disabled (verify=False).".to_string(),
                    ],
                },
            ),
        ],
    );

    let features = Section::new(
        "features",
        "section",
        Some("Features"),
        vec![
            card(
                "⚡",
                "Optimization checks",
                "Unused imports and variables, unreachable code, \
                 string concatenation in loops and other slow patterns.",
            ),
            card(
                "🔒",
                "Security checks",
                "Flags exec and eval, unsafe deserialization, hardcoded secrets \
                 and disabled SSL verification.",
            ),
            card(
                "🔧",
                "Auto-fix",
                "Run with --fix to rewrite the issues PyWard knows how to fix, \
                 starting with unused imports.",
            ),
            card(
                "🔕",
                "Inline suppression",
                "Silence a single warning with a '# pyward: suppress' comment \
                 on the line or the one above it.",
            ),
        ],
    );

    let install = Section::new(
        "install",
        "section",
        Some("Get Started"),
        vec![
            step(1, "Install from PyPI", "pip install pyward-cli"),
            step(2, "Lint a file", "pyward your_script.py"),
            step(3, "Apply fixes", "pyward --fix your_script.py"),
        ],
    );

    let usage = Section::new(
        "usage",
        "section",
        Some("Usage"),
        vec![
            usage("Full scan", "pyward demo.py"),
            usage("Optimization checks only", "pyward -o demo.py"),
            usage("Security checks only", "pyward -s demo.py"),
            usage("Verbose output", "pyward -v demo.py"),
        ],
    );

    let contribute = Section::new(
        "contribute",
        CONTRIBUTE_SECTION,
        None,
        vec![
            text(CONTRIBUTE_TITLE, BlockKind::Heading, "Contribute to PyWard"),
            text(
                CONTRIBUTE_TEXT,
                BlockKind::Text,
                "PyWard is open source and MIT licensed. New rules, bug reports \
                 and fixes are all welcome.",
            ),
            Block::new(
                CONTRIBUTE_STAT,
                BlockKind::Stats(vec![
                    stat("MIT", "License"),
                    stat("3.7+", "Python"),
                    stat("2", "Check suites"),
                ]),
            ),
            Block::new(
                CONTRIBUTE_BUTTON,
                BlockKind::Buttons(vec![
                    Button::new("Star on GitHub", REPO_URL, true),
                    Button::new("Open an Issue", ISSUES_URL, false),
                ]),
            ),
        ],
    );

    Page::new("PyWard", nav, vec![hero, features, install, usage, contribute])
}
