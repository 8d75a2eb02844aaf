//! Chart presenters: blocking full-screen terminal view and text snapshots.

use crate::panels::{DistributionChart, HistogramChart};
use crate::theme::Theme;
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use pricevar_core::Ticker;
use pricevar_runner::charts::{ChartPresenter, DistributionPlot, HistogramPlot};
use pricevar_runner::config::{ChartConfig, DisplayMode};
use pricevar_runner::export::{write_snapshot, OutputPaths};
use ratatui::backend::CrosstermBackend;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::widgets::Widget;
use ratatui::Terminal;
use std::io::{self, Stdout};
use std::path::{Path, PathBuf};

/// Buffer contents as text, one line per row, trailing blanks trimmed.
pub fn buffer_text(buf: &Buffer) -> String {
    let area = buf.area;
    let mut out = String::new();
    for y in area.top()..area.bottom() {
        let mut line = String::new();
        for x in area.left()..area.right() {
            line.push_str(buf.cell((x, y)).map_or(" ", |c| c.symbol()));
        }
        out.push_str(line.trim_end());
        out.push('\n');
    }
    out
}

/// Render `widget` off-screen at `width` x `height` and return the text.
pub fn render_to_text<W: Widget>(widget: W, width: u16, height: u16) -> String {
    let area = Rect::new(0, 0, width, height);
    let mut buf = Buffer::empty(area);
    widget.render(area, &mut buf);
    buffer_text(&buf)
}

/// Raw mode plus alternate screen, undone on drop.
struct TerminalSession {
    terminal: Terminal<CrosstermBackend<Stdout>>,
}

impl TerminalSession {
    fn enter() -> io::Result<Self> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        undo_on_error(execute!(stdout, EnterAlternateScreen), || {
            let _ = disable_raw_mode();
        })?;
        let terminal = undo_on_error(Terminal::new(CrosstermBackend::new(stdout)), || {
            let _ = disable_raw_mode();
            let _ = execute!(io::stdout(), LeaveAlternateScreen);
        })?;
        Ok(Self { terminal })
    }
}

/// Run `undo` before passing an error through.
fn undo_on_error<T>(result: io::Result<T>, undo: impl FnOnce()) -> io::Result<T> {
    if result.is_err() {
        undo();
    }
    result
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(self.terminal.backend_mut(), LeaveAlternateScreen);
        let _ = self.terminal.show_cursor();
    }
}

fn is_dismiss(code: KeyCode) -> bool {
    matches!(
        code,
        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc | KeyCode::Enter
    )
}

/// Full-screen chart that blocks until `q`, `Esc`, or `Enter` is pressed.
#[derive(Debug, Default)]
pub struct TerminalPresenter {
    theme: Theme,
}

impl TerminalPresenter {
    pub fn new(theme: Theme) -> Self {
        Self { theme }
    }

    fn show<F>(&self, mut draw: F) -> io::Result<()>
    where
        F: FnMut(&mut ratatui::Frame<'_>),
    {
        let mut session = TerminalSession::enter()?;
        session.terminal.clear()?;
        loop {
            session.terminal.draw(&mut draw)?;
            // Any other event, resize included, just redraws
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press && is_dismiss(key.code) {
                    break;
                }
            }
        }
        Ok(())
    }
}

impl ChartPresenter for TerminalPresenter {
    fn show_histogram(&mut self, plot: &HistogramPlot) -> io::Result<()> {
        let theme = self.theme;
        self.show(|frame| {
            let area = frame.area();
            frame.render_widget(HistogramChart::new(plot, &theme), area);
        })
    }

    fn show_distribution(&mut self, plot: &DistributionPlot) -> io::Result<()> {
        let theme = self.theme;
        self.show(|frame| {
            let area = frame.area();
            frame.render_widget(DistributionChart::new(plot, &theme), area);
        })
    }
}

/// Writes each chart as a text snapshot next to the data files.
#[derive(Debug)]
pub struct SnapshotPresenter {
    paths: OutputPaths,
    size: ChartConfig,
    theme: Theme,
    written: Vec<PathBuf>,
}

impl SnapshotPresenter {
    pub fn new(paths: OutputPaths, size: ChartConfig) -> Self {
        Self {
            paths,
            size,
            theme: Theme::default(),
            written: Vec::new(),
        }
    }

    /// Snapshot files written so far, in order.
    pub fn written(&self) -> &[PathBuf] {
        &self.written
    }

    fn save(&mut self, text: &str, path: PathBuf) -> io::Result<()> {
        write_snapshot(text, &path).map_err(|e| io::Error::other(e.to_string()))?;
        tracing::info!(path = %path.display(), "wrote chart snapshot");
        self.written.push(path);
        Ok(())
    }
}

impl ChartPresenter for SnapshotPresenter {
    fn show_histogram(&mut self, plot: &HistogramPlot) -> io::Result<()> {
        let text = render_to_text(
            HistogramChart::new(plot, &self.theme),
            self.size.width,
            self.size.height,
        );
        let path = self.paths.histogram_snapshot();
        self.save(&text, path)
    }

    fn show_distribution(&mut self, plot: &DistributionPlot) -> io::Result<()> {
        let text = render_to_text(
            DistributionChart::new(plot, &self.theme),
            self.size.width,
            self.size.height,
        );
        let path = self.paths.fit_snapshot();
        self.save(&text, path)
    }
}

/// Pick a presenter for the configured display mode.
///
/// `Auto` uses the terminal only when `interactive` is true.
pub fn presenter_for(
    mode: DisplayMode,
    interactive: bool,
    output_dir: &Path,
    ticker: &Ticker,
    size: ChartConfig,
) -> Box<dyn ChartPresenter> {
    let use_terminal = match mode {
        DisplayMode::Terminal => true,
        DisplayMode::File => false,
        DisplayMode::Auto => interactive,
    };
    tracing::debug!(?mode, interactive, use_terminal, "selected chart presenter");
    if use_terminal {
        Box::new(TerminalPresenter::default())
    } else {
        Box::new(SnapshotPresenter::new(OutputPaths::new(output_dir, ticker), size))
    }
}
