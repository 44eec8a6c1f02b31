use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::color::{ColorMapper, DROP_COLOR};
use crate::config::Config;
use crate::legend::LegendGrid;
use crate::series::{tail_view, AggregationLevel};
use crate::state::{LatencyState, SessionStats};
use crate::types::Sample;

const BLOCK_GLYPH: &str = "█";
const DROP_GLYPH: &str = "X";

// ---------------------------------------------------------------------------
// Frame
// ---------------------------------------------------------------------------

pub fn render(f: &mut Frame, cfg: &Config, state: &mut LatencyState) {
    let area = f.area();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),    // body
            Constraint::Length(1), // footer
        ])
        .split(area);

    render_body(f, cfg, state, chunks[0]);
    render_footer(f, chunks[1]);
}

fn render_body(f: &mut Frame, cfg: &Config, state: &mut LatencyState, area: Rect) {
    if !state.is_initialized() {
        let waiting = Paragraph::new(Line::from(Span::styled(
            "Waiting for first reply",
            Style::default().fg(Color::DarkGray),
        )));
        f.render_widget(waiting, area);
        return;
    }

    let lines = body_lines(cfg, state);
    f.render_widget(Paragraph::new(lines), area);
}

fn render_footer(f: &mut Frame, area: Rect) {
    let line = Line::from(vec![
        Span::styled(" [q] ", Style::default().fg(Color::Yellow)),
        Span::raw("quit  "),
        Span::styled(
            "latest samples on the right",
            Style::default().fg(Color::DarkGray),
        ),
    ]);
    f.render_widget(Paragraph::new(line), area);
}

/// Header, raw stream, one group per aggregation level, then the legend.
pub fn body_lines(cfg: &Config, state: &mut LatencyState) -> Vec<Line<'static>> {
    let width = state.view_width();
    let mapper = state.mapper();
    let mut lines = vec![
        header_line(cfg),
        session_line(state.session()),
        Line::raw(""),
        Line::raw("Raw Data:"),
        stream_line(&mapper, &state.window().tail_vec(width)),
    ];

    for level in state.pipeline().levels() {
        lines.extend(level_lines(&mapper, level, width));
    }

    lines.push(Line::raw("Latency Legend (ms):"));
    lines.extend(legend_lines(state.legend_grid()));
    lines
}

// ---------------------------------------------------------------------------
// Lines
// ---------------------------------------------------------------------------

pub fn header_line(cfg: &Config) -> Line<'static> {
    Line::from(Span::styled(
        format!(
            "Pinging {} every {} ms",
            cfg.address,
            cfg.interval.as_millis()
        ),
        Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
    ))
}

pub fn session_line(session: &SessionStats) -> Line<'static> {
    let percentiles = session.percentiles().map_or("n/a".to_string(), |(p50, p95, p99)| {
        format!("p50 {p50:.1}  p95 {p95:.1}  p99 {p99:.1} ms")
    });
    let loss_color = if session.lost() == 0 {
        Color::DarkGray
    } else {
        Color::Magenta
    };
    Line::from(vec![
        Span::styled(
            format!("sent {}", session.sent()),
            Style::default().fg(Color::White),
        ),
        Span::raw("  │  "),
        Span::styled(
            format!(
                "lost {} ({:.1}%)",
                session.lost(),
                session.loss_percent()
            ),
            Style::default().fg(loss_color),
        ),
        Span::raw("  │  "),
        Span::styled(percentiles, Style::default().fg(Color::White)),
    ])
}

pub fn sample_span(mapper: &ColorMapper, sample: Sample) -> Span<'static> {
    match sample {
        Sample::Valid(_) => Span::styled(
            BLOCK_GLYPH,
            Style::default().fg(mapper.color_for(sample).into()),
        ),
        Sample::Drop => Span::styled(DROP_GLYPH, Style::default().bg(DROP_COLOR.into())),
    }
}

pub fn stream_line(mapper: &ColorMapper, samples: &[Sample]) -> Line<'static> {
    Line::from(
        samples
            .iter()
            .map(|s| sample_span(mapper, *s))
            .collect::<Vec<_>>(),
    )
}

/// Title, one line per order-statistic row (lowest first) and, when the
/// visible window lost anything, a loss line.
pub fn level_lines(
    mapper: &ColorMapper,
    level: &AggregationLevel,
    width: usize,
) -> Vec<Line<'static>> {
    let mut lines = vec![Line::raw(format!("Aggregated {}:", level.chunk_size))];
    for row in level.quantile_rows() {
        lines.push(stream_line(mapper, tail_view(row, width)));
    }
    if let Some(loss) = loss_line(tail_view(level.loss_row(), width), level.chunk_size) {
        lines.push(loss);
    }
    lines
}

/// Glyph for a chunk's drop count: blank for none, the digit below ten, then
/// `a..z` scaled over the remaining range up to `chunk_size`.
pub fn loss_glyph(lost: usize, chunk_size: usize) -> char {
    match lost {
        0 => ' ',
        1..=9 => char::from(b'0' + lost as u8),
        _ => {
            let span = chunk_size.saturating_sub(10).max(1) as f64;
            let value = ((lost - 10) as f64 / span).clamp(0.0, 1.0);
            char::from(b'a' + (value * 25.0) as u8)
        }
    }
}

pub fn loss_line(losses: &[usize], chunk_size: usize) -> Option<Line<'static>> {
    if losses.iter().all(|&l| l == 0) {
        return None;
    }
    let spans: Vec<Span> = losses
        .iter()
        .map(|&lost| {
            let glyph = loss_glyph(lost, chunk_size).to_string();
            if lost == 0 {
                Span::raw(glyph)
            } else {
                Span::styled(glyph, Style::default().bg(DROP_COLOR.into()))
            }
        })
        .collect();
    Some(Line::from(spans))
}

pub fn legend_lines(grid: &LegendGrid) -> Vec<Line<'static>> {
    (0..grid.rows)
        .map(|row| {
            let mut spans = Vec::new();
            for entry in grid.row(row) {
                spans.push(Span::styled(
                    BLOCK_GLYPH,
                    Style::default().fg(entry.color.into()),
                ));
                let pad = grid.cell_width.saturating_sub(entry.width);
                spans.push(Span::raw(format!(" {} {}", entry.label, " ".repeat(pad))));
            }
            Line::from(spans)
        })
        .collect()
}
