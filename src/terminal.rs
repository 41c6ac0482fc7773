// SPDX-License-Identifier: GPL-3.0-only

//! Terminal kiosk screen
//!
//! Renders the live preview, the snapshot history and the countdown with
//! Unicode half-block characters, so each terminal cell carries two
//! vertical pixels.
//!
//! ```text
//! ┌──────────────────────────────┐
//! │        live preview          │
//! │            [3]               │
//! ├───────────────┬──────────────┤
//! │ [Print] slot0 │ slot 1       │
//! ├───────────────┼──────────────┤
//! │ slot 2        │ slot 3       │
//! ├───────────────┴──────────────┤
//! │ status                       │
//! └──────────────────────────────┘
//! ```

use crate::backends::camera::CameraFrame;
use crate::backends::camera::convert::sample_pixel_rgb;
use crate::backends::hardware::ButtonEvent;
use crate::sequencer::{DisplayDirective, FlashSurface, PrintBadge, Slot};

use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use image::RgbaImage;
use ratatui::{
    Terminal,
    backend::CrosstermBackend,
    buffer::Buffer,
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    widgets::Widget,
};
use std::io::{self, stdout};
use std::time::Duration;
use tracing::{debug, warn};

/// Key presses the kiosk loop acts on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KioskInput {
    Quit,
    /// Bench stand-in for a hardware button
    Press(ButtonEvent),
}

/// Owns the terminal for the lifetime of the kiosk
pub struct TerminalRenderer {
    terminal: Terminal<CrosstermBackend<io::Stdout>>,
    preview: FrameWidget,
    status: String,
    active: bool,
}

impl TerminalRenderer {
    /// Switch to raw mode and the alternate screen
    pub fn enter(mirror_preview: bool) -> io::Result<Self> {
        enable_raw_mode()?;
        let mut stdout = stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let terminal = Terminal::new(backend)?;

        Ok(Self {
            terminal,
            preview: FrameWidget::new(mirror_preview),
            status: build_status_message(),
            active: true,
        })
    }

    /// Show `frame` in the preview from the next draw on
    pub fn update_preview(&mut self, frame: &CameraFrame) {
        self.preview.update_frame(frame.clone());
    }

    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status = message.into();
    }

    pub fn draw(&mut self, directive: &DisplayDirective<'_>) -> io::Result<()> {
        let preview = &self.preview;
        let status = self.status.as_str();

        self.terminal.draw(|f| {
            let [preview_area, history_area, status_area] = Layout::vertical([
                Constraint::Percentage(60),
                Constraint::Min(0),
                Constraint::Length(1),
            ])
            .areas(f.area());

            f.render_widget(preview, preview_area);
            if let Some(digit) = directive.countdown {
                f.render_widget(CountdownWidget { digit }, preview_area);
            }

            f.render_widget(
                HistoryGrid {
                    slots: directive.snapshots,
                    badge: directive.print_badge,
                },
                history_area,
            );

            f.render_widget(StatusBar { message: status }, status_area);
        })?;
        Ok(())
    }

    /// Wait up to `timeout` for a key and translate it
    pub fn poll_input(&mut self, timeout: Duration) -> io::Result<Option<KioskInput>> {
        if event::poll(timeout)?
            && let Event::Key(key) = event::read()?
        {
            return Ok(map_key(key));
        }
        Ok(None)
    }

    /// Leave the alternate screen and raw mode. Safe to call twice.
    pub fn restore(&mut self) -> io::Result<()> {
        if !self.active {
            return Ok(());
        }
        self.active = false;
        disable_raw_mode()?;
        execute!(self.terminal.backend_mut(), LeaveAlternateScreen)?;
        self.terminal.show_cursor()?;
        Ok(())
    }
}

impl FlashSurface for TerminalRenderer {
    fn present_flash(&mut self) -> io::Result<()> {
        // draw() flushes before returning
        self.terminal.draw(|f| f.render_widget(FlashWidget, f.area()))?;
        debug!("Flash frame presented");
        Ok(())
    }
}

impl Drop for TerminalRenderer {
    fn drop(&mut self) {
        if let Err(e) = self.restore() {
            warn!(error = %e, "Failed to restore terminal");
        }
    }
}

/// Translate a key press into a kiosk action
pub fn map_key(key: KeyEvent) -> Option<KioskInput> {
    if key.kind != KeyEventKind::Press {
        return None;
    }
    match key.code {
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            Some(KioskInput::Quit)
        }
        KeyCode::Char('q') | KeyCode::Esc => Some(KioskInput::Quit),
        KeyCode::Char(' ') => Some(KioskInput::Press(ButtonEvent::Shutter)),
        KeyCode::Char('p') => Some(KioskInput::Press(ButtonEvent::PrintRequest)),
        _ => None,
    }
}

fn build_status_message() -> String {
    "space: shutter | p: print | q: quit".to_string()
}

/// Draw a `src_width`x`src_height` picture into `area` with half-blocks,
/// letterboxed to keep its aspect ratio. `sample` returns `None` for
/// transparent pixels, which leave the terminal background showing.
fn render_half_blocks(
    area: Rect,
    buf: &mut Buffer,
    src_width: u32,
    src_height: u32,
    sample: impl Fn(u32, u32) -> Option<Color>,
) {
    if src_width == 0 || src_height == 0 || area.width == 0 || area.height == 0 {
        return;
    }

    let src_aspect = src_width as f64 / src_height as f64;
    let term_width = area.width as f64;
    let term_height = (area.height * 2) as f64;

    let (display_width, display_height) = if term_width / term_height > src_aspect {
        // Area is wider: fit to height
        let h = term_height;
        let w = h * src_aspect;
        (w as u16, (h / 2.0) as u16)
    } else {
        let w = term_width;
        let h = w / src_aspect;
        (w as u16, (h / 2.0) as u16)
    };
    if display_width == 0 || display_height == 0 {
        return;
    }

    let x_offset = area.x + (area.width.saturating_sub(display_width)) / 2;
    let y_offset = area.y + (area.height.saturating_sub(display_height)) / 2;

    let x_scale = src_width as f64 / display_width as f64;
    let y_scale = src_height as f64 / (display_height * 2) as f64;

    // Upper half (▀) takes the fg colour, lower half the bg
    for ty in 0..display_height {
        for tx in 0..display_width {
            let src_x = ((tx as f64 * x_scale) as u32).min(src_width - 1);
            let src_y_top = ((ty as f64 * 2.0 * y_scale) as u32).min(src_height - 1);
            let src_y_bottom = (((ty as f64 * 2.0 + 1.0) * y_scale) as u32).min(src_height - 1);

            let top = sample(src_x, src_y_top);
            let bottom = sample(src_x, src_y_bottom);
            if top.is_none() && bottom.is_none() {
                continue;
            }

            if let Some(cell) = buf.cell_mut((x_offset + tx, y_offset + ty)) {
                cell.set_char('▀');
                cell.set_fg(top.unwrap_or(Color::Reset));
                cell.set_bg(bottom.unwrap_or(Color::Reset));
            }
        }
    }
}

/// Live camera preview
struct FrameWidget {
    frame: Option<CameraFrame>,
    mirror: bool,
}

impl FrameWidget {
    fn new(mirror: bool) -> Self {
        Self {
            frame: None,
            mirror,
        }
    }

    fn update_frame(&mut self, frame: CameraFrame) {
        if !frame.is_empty() {
            self.frame = Some(frame);
        }
    }
}

impl Widget for &FrameWidget {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let Some(frame) = &self.frame else {
            let msg = "Waiting for camera...";
            let x = area.x + (area.width.saturating_sub(msg.len() as u16)) / 2;
            let y = area.y + area.height / 2;
            if y < area.y + area.height && x < area.x + area.width {
                buf.set_string(x, y, msg, Style::default());
            }
            return;
        };

        let last_x = frame.width.saturating_sub(1);
        render_half_blocks(area, buf, frame.width, frame.height, |x, y| {
            let x = if self.mirror { last_x - x } else { x };
            let (r, g, b) = sample_pixel_rgb(frame, x, y);
            Some(Color::Rgb(r, g, b))
        });
    }
}

/// One history thumbnail
struct ThumbnailWidget<'a> {
    image: &'a RgbaImage,
}

impl Widget for ThumbnailWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let (width, height) = self.image.dimensions();
        render_half_blocks(area, buf, width, height, |x, y| {
            let [r, g, b, a] = self.image.get_pixel(x, y).0;
            (a > 0).then_some(Color::Rgb(r, g, b))
        });
    }
}

/// The four history slots, most recent top-left, with the print badge
struct HistoryGrid<'a> {
    slots: &'a [Slot],
    badge: Option<PrintBadge>,
}

impl Widget for HistoryGrid<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let [top, bottom] =
            Layout::vertical([Constraint::Ratio(1, 2), Constraint::Ratio(1, 2)]).areas(area);
        let columns = Layout::horizontal([Constraint::Ratio(1, 2), Constraint::Ratio(1, 2)]);
        let [a, b] = columns.areas(top);
        let [c, d] = columns.areas(bottom);

        for (slot, cell_area) in self.slots.iter().zip([a, b, c, d]) {
            ThumbnailWidget {
                image: &slot.thumbnail,
            }
            .render(cell_area, buf);
        }

        if let Some(badge) = self.badge {
            BadgeWidget { badge }.render(a, buf);
        }
    }
}

/// "Print"/"Printing" label on the first row of slot 0
struct BadgeWidget {
    badge: PrintBadge,
}

impl Widget for BadgeWidget {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width == 0 || area.height == 0 {
            return;
        }
        let [r, g, b] = self.badge.fill();
        let label = format!(" {} ", self.badge.label());
        let width = (label.len() as u16).min(area.width);
        let x = area.x + (area.width - width) / 2;

        buf.set_stringn(
            x,
            area.y,
            &label,
            width as usize,
            Style::default()
                .fg(Color::Black)
                .bg(Color::Rgb(r, g, b))
                .add_modifier(Modifier::BOLD),
        );
    }
}

/// 5x5 block glyphs for the countdown digits
const DIGIT_GLYPHS: [[&str; 5]; 3] = [
    ["  #  ", " ##  ", "  #  ", "  #  ", " ### "],
    [" ### ", "#   #", "  ## ", " #   ", "#####"],
    ["#### ", "    #", " ### ", "    #", "#### "],
];

/// Big countdown digit centered over the preview
struct CountdownWidget {
    digit: u8,
}

impl Widget for CountdownWidget {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let Some(glyph) = (self.digit as usize)
            .checked_sub(1)
            .and_then(|i| DIGIT_GLYPHS.get(i))
        else {
            return;
        };

        // Two cells per glyph pixel keeps the digit roughly square
        let width = 10;
        let height = glyph.len() as u16;
        let x0 = area.x + area.width.saturating_sub(width) / 2;
        let y0 = area.y + area.height.saturating_sub(height) / 2;

        for (row, line) in glyph.iter().enumerate() {
            for (col, ch) in line.chars().enumerate() {
                if ch != '#' {
                    continue;
                }
                for dx in 0..2 {
                    let pos = (x0 + col as u16 * 2 + dx, y0 + row as u16);
                    if pos.0 >= area.right() || pos.1 >= area.bottom() {
                        continue;
                    }
                    if let Some(cell) = buf.cell_mut(pos) {
                        cell.set_char('█');
                        cell.set_fg(Color::Yellow);
                    }
                }
            }
        }
    }
}

/// Solid white frame shown while the shutter fires
struct FlashWidget;

impl Widget for FlashWidget {
    fn render(self, area: Rect, buf: &mut Buffer) {
        for y in area.top()..area.bottom() {
            for x in area.left()..area.right() {
                if let Some(cell) = buf.cell_mut((x, y)) {
                    cell.set_char(' ');
                    cell.set_bg(Color::White);
                }
            }
        }
    }
}

/// Status bar widget
struct StatusBar<'a> {
    message: &'a str,
}

impl Widget for StatusBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        for x in area.x..area.x + area.width {
            if let Some(cell) = buf.cell_mut((x, area.y)) {
                cell.set_char(' ');
                cell.set_bg(Color::DarkGray);
            }
        }

        buf.set_stringn(
            area.x,
            area.y,
            self.message,
            area.width as usize,
            Style::default().fg(Color::White).bg(Color::DarkGray),
        );
    }
}
