use std::io::Write;

use unicode_width::UnicodeWidthChar;

use crate::error::Result;
use crate::geometry::Rect;
use crate::registry::{ZoneId, ZoneState};
use crate::width::display_width;

const RESET: &str = "\x1b[0m";

/// Renderer runtime parameters.
#[derive(Debug, Clone, Default)]
pub struct RendererSettings {
    pub restore_cursor: Option<(u16, u16)>,
    /// Strip styling escapes, e.g. when writing to a log or a dumb terminal.
    pub plain: bool,
}

/// Writes zone content with absolute cursor positioning.
pub struct AnsiRenderer {
    settings: RendererSettings,
}

impl AnsiRenderer {
    pub fn new(settings: RendererSettings) -> Self {
        Self { settings }
    }

    pub fn with_default() -> Self {
        Self::new(RendererSettings::default())
    }

    pub fn settings_mut(&mut self) -> &mut RendererSettings {
        &mut self.settings
    }

    pub fn clear(&mut self, writer: &mut impl Write) -> Result<()> {
        write!(writer, "{RESET}\x1b[2J")?;
        writer.flush()?;
        Ok(())
    }

    pub fn render(&mut self, writer: &mut impl Write, dirty: &[(ZoneId, ZoneState)]) -> Result<()> {
        for (_id, state) in dirty {
            self.render_zone(writer, state)?;
        }

        if let Some((row, col)) = self.settings.restore_cursor {
            write!(writer, "\x1b[{};{}H", row + 1, col + 1)?;
        }

        writer.flush()?;
        Ok(())
    }

    fn render_zone(&self, writer: &mut impl Write, state: &ZoneState) -> Result<()> {
        let Rect {
            x,
            y,
            width,
            height,
        } = state.rect;

        if state.rect.is_empty() {
            return Ok(());
        }

        let mut lines: Vec<String> = state
            .content
            .lines()
            .take(height as usize)
            .map(|line| {
                if self.settings.plain {
                    strip_styles(line)
                } else {
                    line.to_string()
                }
            })
            .collect();
        lines.resize(height as usize, String::new());

        for (offset, line) in lines.iter_mut().enumerate() {
            fit_line(line, width);
            write!(writer, "\x1b[{};{}H", y + offset as u16 + 1, x + 1)?;
            write!(writer, "{line}{RESET}")?;
        }

        Ok(())
    }
}

fn strip_styles(line: &str) -> String {
    String::from_utf8_lossy(&strip_ansi_escapes::strip(line)).into_owned()
}

/// Pad with spaces to exactly `width` cells, dropping visible characters
/// that would overflow.
fn fit_line(line: &mut String, width: u16) {
    let width = width as usize;
    if display_width(line) > width {
        *line = cut_to_width(line, width);
    }
    let used = display_width(line);
    if used < width {
        line.push_str(&" ".repeat(width - used));
    }
}

/// Keep the first `width` cells of visible text. Escape sequences are copied
/// whole wherever they appear so trailing resets survive the cut.
fn cut_to_width(line: &str, width: usize) -> String {
    let mut cut = String::with_capacity(line.len());
    let mut used = 0usize;
    let mut full = false;
    let mut chars = line.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch == '\x1b' {
            cut.push(ch);
            if chars.peek() == Some(&'[') {
                chars.next();
                cut.push('[');
                for param in chars.by_ref() {
                    cut.push(param);
                    if ('@'..='~').contains(&param) {
                        break;
                    }
                }
            }
            continue;
        }
        if full {
            continue;
        }
        let cells = UnicodeWidthChar::width(ch).unwrap_or(0);
        if used + cells > width {
            full = true;
            continue;
        }
        used += cells;
        cut.push(ch);
    }
    cut
}
