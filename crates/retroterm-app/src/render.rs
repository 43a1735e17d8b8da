//! Truecolor terminal renderer.
//!
//! Appends to a scrolling terminal instead of redrawing a frame: boot lines
//! as they appear, then each new history record, download progress in place
//! on one line, and the prompt once the typing indicator has cleared.

use std::io::{self, Write};

use crossterm::cursor::MoveTo;
use crossterm::queue;
use crossterm::style::{Color as TermColor, Print, ResetColor, SetForegroundColor};
use crossterm::terminal::{Clear, ClearType};

use retroterm_core::color::{Color, darken, lighten};
use retroterm_core::skin::Palette;
use retroterm_core::terminal::download::{progress_bar, progress_label};
use retroterm_core::terminal::{CommandRecord, DownloadUpdate, RecordKind, Submission};
use retroterm_core::{Session, Tick};

const ERROR: Color = Color::rgb(0xF8, 0x71, 0x71);

/// How typed input reaches the screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Echo {
    /// Raw keyboard: the prompt line is redrawn in place as it is edited.
    Live,
    /// Piped lines: input shows up once a line changes it or runs.
    Submitted,
}

impl Echo {
    fn line_end(self) -> &'static str {
        match self {
            // Raw mode does not translate "\n".
            Self::Live => "\r\n",
            Self::Submitted => "\n",
        }
    }
}

/// Terminal color for `c`. Translucent colors are flattened onto black.
fn term_color(c: Color) -> TermColor {
    let c = if c.a < 255 {
        darken(c, 1.0 - f32::from(c.a) / 255.0)
    } else {
        c
    };
    TermColor::Rgb {
        r: c.r,
        g: c.g,
        b: c.b,
    }
}

/// Draws a [`Session`] onto a scrolling terminal.
pub struct Renderer<W: Write> {
    out: W,
    echo: Echo,
    boot_lines: usize,
    revealed: bool,
    records: usize,
    pending_clear: bool,
    prompt_pending: bool,
    /// A prompt is on the current line, followed by `shown_input`.
    prompt_open: bool,
    shown_input: String,
}

impl<W: Write> Renderer<W> {
    /// Renderer writing to `out`.
    pub fn new(out: W, echo: Echo) -> Self {
        Self {
            out,
            echo,
            boot_lines: 0,
            revealed: false,
            records: 0,
            pending_clear: false,
            prompt_pending: false,
            prompt_open: false,
            shown_input: String::new(),
        }
    }

    /// Note a submission before the next draw. A submission that recorded
    /// nothing cleared the history.
    pub fn on_submission(&mut self, submission: &Submission) {
        if !submission.recorded {
            self.records = 0;
            self.pending_clear = true;
        }
    }

    /// Write everything that changed since the last draw.
    pub fn draw(&mut self, session: &Session, tick: &Tick) -> io::Result<()> {
        let palette = session.palette();
        if !self.revealed {
            self.draw_boot(session, &palette)?;
            if !session.is_interactive() {
                return self.out.flush();
            }
            self.revealed = true;
            self.records = 0;
            self.pending_clear = true;
        }
        if self.pending_clear {
            queue!(self.out, Clear(ClearType::All), MoveTo(0, 0))?;
            self.pending_clear = false;
            self.prompt_pending = true;
            self.prompt_open = false;
            self.shown_input.clear();
        }

        let records = session.interpreter().history().records();
        for record in records.iter().skip(self.records) {
            self.draw_record(record, session, &palette)?;
            self.prompt_pending = true;
        }
        self.records = records.len();

        for update in &tick.downloads {
            self.draw_download(update, &palette)?;
        }

        let busy = session.interpreter().download().is_busy();
        if self.prompt_pending && !session.is_typing() && !busy {
            self.draw_prompt(session, &palette)?;
        }
        let input = session.interpreter().input();
        if !self.prompt_pending && input != self.shown_input {
            self.sync_input(session, &palette, input)?;
        }
        self.out.flush()
    }

    /// Bring the prompt line up to date with an edited input line.
    fn sync_input(
        &mut self,
        session: &Session,
        palette: &Palette,
        input: &str,
    ) -> io::Result<()> {
        match self.echo {
            Echo::Live => {
                queue!(self.out, Print('\r'), Clear(ClearType::CurrentLine))?;
                self.write_prompt(session, palette)?;
            },
            // Recall or completion; show what Enter will submit.
            Echo::Submitted if self.prompt_open && self.shown_input.is_empty() => {},
            Echo::Submitted => {
                self.close_prompt()?;
                self.write_prompt(session, palette)?;
            },
        }
        queue!(self.out, Print(input))?;
        self.prompt_open = true;
        self.shown_input = input.to_string();
        Ok(())
    }

    fn newline(&mut self) -> io::Result<()> {
        let end = self.echo.line_end();
        queue!(self.out, Print(end))
    }

    fn paint_line(&mut self, color: Color, text: &str) -> io::Result<()> {
        queue!(
            self.out,
            SetForegroundColor(term_color(color)),
            Print(text),
            ResetColor
        )?;
        self.newline()
    }

    fn close_prompt(&mut self) -> io::Result<()> {
        if self.prompt_open {
            self.newline()?;
            self.prompt_open = false;
        }
        Ok(())
    }

    fn draw_boot(&mut self, session: &Session, palette: &Palette) -> io::Result<()> {
        let lines = session.boot().displayed_lines();
        for line in lines.iter().skip(self.boot_lines) {
            self.paint_line(palette.primary, &line.text)?;
        }
        self.boot_lines = lines.len();
        Ok(())
    }

    /// Finish the prompt line that produced a command record.
    fn echo_command(
        &mut self,
        record: &CommandRecord,
        session: &Session,
        palette: &Palette,
    ) -> io::Result<()> {
        if self.prompt_open && self.shown_input == record.input {
            return self.close_prompt();
        }
        if !(self.prompt_open && self.shown_input.is_empty()) {
            self.close_prompt()?;
            self.write_prompt(session, palette)?;
        }
        queue!(self.out, Print(&record.input))?;
        self.prompt_open = false;
        self.newline()
    }

    fn draw_record(
        &mut self,
        record: &CommandRecord,
        session: &Session,
        palette: &Palette,
    ) -> io::Result<()> {
        match record.kind {
            RecordKind::Command => self.echo_command(record, session, palette)?,
            RecordKind::Banner => self.close_prompt()?,
        }
        self.shown_input.clear();

        let glitch = session.glitch_state();
        let color = match (record.kind, record.is_error) {
            (_, true) => ERROR,
            (RecordKind::Banner, false) => palette.primary,
            (RecordKind::Command, false) if glitch.text_glitch || glitch.glitching => {
                palette.accent
            },
            (RecordKind::Command, false) => palette.text,
        };
        let color = if glitch.flickering {
            lighten(color, 0.5)
        } else {
            color
        };
        let text = record.output.as_text();
        for line in text.lines() {
            self.paint_line(color, line)?;
        }
        self.newline()
    }

    fn draw_download(&mut self, update: &DownloadUpdate, palette: &Palette) -> io::Result<()> {
        match update {
            DownloadUpdate::Started => self.draw_progress(0.0, palette),
            DownloadUpdate::Progress(p) => self.draw_progress(*p, palette),
            DownloadUpdate::Completed(file_name) => {
                self.draw_progress(100.0, palette)?;
                self.newline()?;
                self.paint_line(palette.secondary, &format!("Saved {file_name}"))?;
                self.prompt_pending = true;
                Ok(())
            },
        }
    }

    fn draw_progress(&mut self, progress: f32, palette: &Palette) -> io::Result<()> {
        queue!(
            self.out,
            Print('\r'),
            SetForegroundColor(term_color(palette.text)),
            Print(progress_label(progress)),
            Print(' '),
            SetForegroundColor(term_color(palette.primary)),
            Print(format!("[{}]", progress_bar(progress))),
            ResetColor
        )
    }

    /// Hints, then a fresh prompt with nothing typed after it.
    fn draw_prompt(&mut self, session: &Session, palette: &Palette) -> io::Result<()> {
        for hint in session.hints() {
            self.paint_line(palette.text_secondary, hint)?;
        }
        self.write_prompt(session, palette)?;
        self.prompt_pending = false;
        self.prompt_open = true;
        self.shown_input.clear();
        Ok(())
    }

    fn write_prompt(&mut self, session: &Session, palette: &Palette) -> io::Result<()> {
        queue!(
            self.out,
            SetForegroundColor(term_color(palette.secondary)),
            Print(session.prompt()),
            ResetColor,
            Print(' ')
        )
    }

    /// Leave the terminal with default colors on a fresh line.
    pub fn finish(&mut self) -> io::Result<()> {
        queue!(self.out, ResetColor)?;
        self.newline()?;
        self.out.flush()
    }
}
