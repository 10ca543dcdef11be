use std::io;
use std::sync::Arc;
use std::time::Instant;

use anyhow::Result;
use crossterm::{
    execute,
    terminal::{
        self, disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
        SetTitle,
    },
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout},
    Terminal,
};
use tracing::{info, warn};

use marquee_core::AppConfig;
use marquee_tui::{
    app::{App, NAVBAR_HEIGHT, STATUS_HEIGHT},
    event::{AppEvent, EventHandler},
    input::{handle_key_event, Action},
    scroll::ScrollConfigExt,
    widgets::{NavbarWidget, PageWidget, StatusBarWidget},
};

pub async fn run(config: Arc<AppConfig>) -> Result<()> {
    let mut app = App::new(config.clone());
    let (width, height) = terminal::size()?;
    app.resize(width, height);

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, SetTitle(app.page.brand.as_str()))?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = event_loop(&mut terminal, &mut app, &config).await;

    app.shutdown();

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

async fn event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    config: &AppConfig,
) -> Result<()> {
    let event_handler = EventHandler::with_animation_tick(
        config.ui.tick_rate_ms,
        config.ui.scroll.animation_tick_duration(),
    );

    // Page is on screen: the hero typewriter starts after its delay
    app.activate()?;
    info!("Landing page shown");

    // Checked at the end of each iteration to pick the next poll interval
    let mut needs_fast_update = true;

    loop {
        let now = Instant::now();
        app.tick(now);

        terminal.draw(|frame| {
            let size = frame.area();
            let rows = Layout::default()
                .direction(Direction::Vertical)
                .constraints([
                    Constraint::Length(NAVBAR_HEIGHT),
                    Constraint::Min(1),
                    Constraint::Length(STATUS_HEIGHT),
                ])
                .split(size);

            PageWidget::render(frame, rows[1], app, now);
            NavbarWidget::render(frame, rows[0], app, now);
            StatusBarWidget::render(frame, rows[2], app);
        })?;

        // Block in the poll without stalling the typewriter tasks
        let event = tokio::task::block_in_place(|| {
            if needs_fast_update {
                event_handler.next_animation()
            } else {
                event_handler.next()
            }
        })?;

        if let Some(event) = event {
            match event {
                AppEvent::Key(key) => {
                    let action = handle_key_event(key, app);
                    handle_action(app, action, Instant::now());
                }
                AppEvent::Resize(width, height) => {
                    app.resize(width, height);
                }
                AppEvent::Tick => {}
            }
        }

        needs_fast_update = app.needs_fast_update(Instant::now());

        if app.should_quit {
            break;
        }
    }

    Ok(())
}

fn handle_action(app: &mut App, action: Action, at: Instant) {
    // Clear pending key on any action except PendingG
    if action != Action::PendingG && action != Action::JumpToTop {
        app.clear_pending_key();
    }
    if action != Action::None {
        app.clear_status();
    }

    match action {
        Action::Quit => {
            app.should_quit = true;
        }
        Action::ScrollDown => app.scroll_down(),
        Action::ScrollUp => app.scroll_up(),
        Action::ScrollHalfPageDown => app.scroll_half_page_down(),
        Action::ScrollHalfPageUp => app.scroll_half_page_up(),
        Action::PendingG => {
            app.pending_key = Some('g');
        }
        Action::JumpToTop => {
            app.clear_pending_key();
            app.jump_to_top(at);
        }
        Action::JumpToBottom => app.jump_to_bottom(at),
        Action::FocusNext => app.focus_next(at),
        Action::FocusPrev => app.focus_prev(at),
        Action::ClearFocus => app.clear_focus(at),
        Action::Activate => app.activate_focused(at),
        Action::NavLink(index) => {
            if !app.jump_to_nav_link(index, at) {
                app.set_status(format!("No section {}", index + 1));
            }
        }
        Action::RestartTypewriter => {
            if let Err(e) = app.restart_typewriter() {
                warn!("Failed to restart typewriter: {}", e);
                app.set_status(format!("Typewriter error: {}", e));
            }
        }
        Action::None => {}
    }
}
