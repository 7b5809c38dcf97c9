//! Terminal rendering backend built on ratatui + crossterm.
//!
//! Uses the alternate screen so the shell scrollback survives a monitoring
//! session, and restores the terminal both on explicit clear and on drop.

use crate::display::{DisplayRow, Severity, StatusTag, TableModel};
use crate::render::RenderSink;
use anyhow::Result;
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::Constraint,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Cell, Row, Table},
    Terminal,
};
use std::io::{self, Stdout};

// GitHub-dark palette
const RED: Color = Color::Rgb(0xf8, 0x51, 0x49);
const ORANGE: Color = Color::Rgb(0xff, 0xa6, 0x57);
const GREEN: Color = Color::Rgb(0x3f, 0xb9, 0x50);
const BLUE: Color = Color::Rgb(0x79, 0xc0, 0xff);
const GRAY: Color = Color::Rgb(0x8b, 0x94, 0x9e);
const HEADER_BLUE: Color = Color::Rgb(0x58, 0xa6, 0xff);
const WHITE: Color = Color::Rgb(0xf0, 0xf6, 0xfc);
const LIGHT_BLUE: Color = Color::Rgb(0xa5, 0xd6, 0xff);
const TEXT: Color = Color::Rgb(0xc9, 0xd1, 0xd9);

fn cpu_style(severity: Severity) -> Style {
    match severity {
        Severity::Critical => Style::default().fg(RED).add_modifier(Modifier::BOLD),
        Severity::Warning => Style::default().fg(ORANGE),
        Severity::Nominal => Style::default().fg(GREEN),
    }
}

fn mem_style(severity: Severity) -> Style {
    match severity {
        Severity::Critical => Style::default().fg(RED).add_modifier(Modifier::BOLD),
        Severity::Warning => Style::default().fg(ORANGE),
        Severity::Nominal => Style::default().fg(BLUE),
    }
}

fn status_style(status: StatusTag) -> Style {
    match status {
        StatusTag::New => Style::default().fg(GREEN).add_modifier(Modifier::BOLD),
        StatusTag::High => Style::default().fg(RED).add_modifier(Modifier::BOLD),
        StatusTag::Warn => Style::default().fg(ORANGE),
        StatusTag::Ok => Style::default().fg(GRAY),
    }
}

fn header_line(model: &TableModel) -> Line<'_> {
    let mut spans = vec![
        Span::styled(format!("[{}] ", model.timestamp), Style::default().fg(GRAY)),
        Span::styled(
            format!("Processes: {}", model.process_count),
            Style::default().fg(WHITE),
        ),
    ];
    if model.arrival_count > 0 {
        spans.push(Span::styled(
            format!(" [+{}]", model.arrival_count),
            Style::default().fg(GREEN),
        ));
    }
    if model.departure_count > 0 {
        spans.push(Span::styled(
            format!(" [-{}]", model.departure_count),
            Style::default().fg(RED),
        ));
    }
    Line::from(spans)
}

fn table_row(row: &DisplayRow) -> Row<'_> {
    Row::new(vec![
        Cell::from(row.pid.to_string()).style(Style::default().fg(BLUE)),
        Cell::from(row.user.as_str()).style(Style::default().fg(WHITE)),
        Cell::from(row.cpu_text.as_str()).style(cpu_style(row.cpu_severity)),
        Cell::from(row.mem_text.as_str()).style(mem_style(row.mem_severity)),
        Cell::from(row.runtime.as_str()).style(Style::default().fg(GRAY)),
        Cell::from(row.status.label()).style(status_style(row.status)),
        Cell::from(row.command.as_str()).style(Style::default().fg(TEXT)),
    ])
}

/// Live terminal sink. Construction takes over the terminal; `clear` (or
/// drop) gives it back.
pub struct TerminalSink {
    terminal: Terminal<CrosstermBackend<Stdout>>,
    restored: bool,
}

impl TerminalSink {
    pub fn new() -> Result<Self> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let terminal = Terminal::new(CrosstermBackend::new(stdout))?;
        Ok(Self {
            terminal,
            restored: false,
        })
    }

    fn restore(&mut self) -> Result<()> {
        if self.restored {
            return Ok(());
        }
        self.restored = true;
        disable_raw_mode()?;
        execute!(self.terminal.backend_mut(), LeaveAlternateScreen)?;
        self.terminal.show_cursor()?;
        Ok(())
    }
}

impl RenderSink for TerminalSink {
    fn draw(&mut self, model: &TableModel) -> Result<()> {
        self.terminal.draw(|frame| {
            let widths = [
                Constraint::Length(7),  // PID
                Constraint::Length(9),  // USER
                Constraint::Length(6),  // CPU
                Constraint::Length(7),  // MEM
                Constraint::Length(9),  // TIME
                Constraint::Length(6),  // STATUS
                Constraint::Min(20),    // COMMAND
            ];

            let header = Row::new(["PID", "USER", "CPU", "MEM", "TIME", "STATUS", "COMMAND"])
                .style(Style::default().fg(HEADER_BLUE).add_modifier(Modifier::BOLD));

            let table = Table::new(model.rows.iter().map(table_row), widths)
                .header(header)
                .column_spacing(1);

            let area = frame.area();
            let mut table_area = area;
            if area.height > 1 {
                // First line is the cycle summary, the table gets the rest
                frame.render_widget(
                    ratatui::widgets::Paragraph::new(header_line(model)),
                    ratatui::layout::Rect { height: 1, ..area },
                );
                table_area = ratatui::layout::Rect {
                    y: area.y + 1,
                    height: area.height - 1,
                    ..area
                };
            }
            frame.render_widget(table, table_area);
        })?;
        Ok(())
    }

    fn clear(&mut self) -> Result<()> {
        self.terminal.clear()?;
        self.restore()
    }
}

impl Drop for TerminalSink {
    fn drop(&mut self) {
        // Last-resort restore; errors here have nowhere useful to go
        let _ = self.restore();
    }
}
