pub mod render;

use std::io;

use crossterm::{
    event::{Event, EventStream, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use futures_util::StreamExt;
use ratatui::{backend::CrosstermBackend, Terminal};
use tokio::sync::mpsc;
use tracing::info;

use crate::config::Config;
use crate::error::{AppError, Result};
use crate::probe::{ProbeRunner, Prober};
use crate::state::LatencyState;
use crate::types::Sample;

/// Probe results waiting for the UI loop.
const SAMPLE_CHANNEL_CAPACITY: usize = 64;

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

/// Start probing and run the UI until the user quits or a probe fails.
pub async fn run<P: Prober>(cfg: &Config, prober: P) -> Result<()> {
    let (sample_tx, sample_rx) = mpsc::channel(SAMPLE_CHANNEL_CAPACITY);
    let probe_task = tokio::spawn(ProbeRunner::new(prober, cfg.interval, sample_tx).run());

    // Terminal setup
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_loop(&mut terminal, cfg, sample_rx).await;

    // Restore terminal regardless of result
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    probe_task.abort();
    result
}

// ---------------------------------------------------------------------------
// Main event loop
// ---------------------------------------------------------------------------

/// Single consumer of both probe results and terminal events; every state
/// mutation happens here, one event at a time.
async fn run_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    cfg: &Config,
    mut sample_rx: mpsc::Receiver<Result<Sample>>,
) -> Result<()> {
    let mut state = LatencyState::from_config(cfg);
    state.set_view_width(terminal.size()?.width as usize);
    let mut events = EventStream::new();

    loop {
        terminal.draw(|f| render::render(f, cfg, &mut state))?;

        tokio::select! {
            received = sample_rx.recv() => match received {
                Some(Ok(sample)) => state.ingest(sample),
                Some(Err(e)) => return Err(e),
                None => return Err(AppError::ProbeClosed),
            },
            event = events.next() => match event {
                Some(Ok(Event::Key(key))) if key.kind == KeyEventKind::Press => {
                    if is_quit_key(&key) {
                        info!("quit requested after {} samples", state.counter());
                        return Ok(());
                    }
                }
                Some(Ok(Event::Resize(width, _))) => state.set_view_width(width as usize),
                Some(Ok(_)) => {}
                Some(Err(e)) => return Err(e.into()),
                None => return Ok(()),
            },
        }
    }
}

fn is_quit_key(key: &KeyEvent) -> bool {
    match key.code {
        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => true,
        KeyCode::Char('c') => key.modifiers.contains(KeyModifiers::CONTROL),
        _ => false,
    }
}
