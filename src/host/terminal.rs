//! Terminal bridge - drive a host from terminal mouse and wheel input
//!
//! Converts crossterm events into [`TerminalInput`] values and applies them
//! to a [`SimulatedHost`], mapping character cells to CSS pixels with
//! [`CellMetrics`].
//!
//! # Example
//!
//! ```ignore
//! use spark_folio::host::terminal::{poll_input, CellMetrics, TerminalSession};
//! use std::time::Duration;
//!
//! let _session = TerminalSession::start()?;
//! let metrics = CellMetrics::default();
//! loop {
//!     if let Some(input) = poll_input(Duration::from_millis(16))? {
//!         if !host.apply_terminal_input(input, &metrics) {
//!             break;
//!         }
//!     }
//!     host.run_frame();
//! }
//! ```

use std::io::stdout;
use std::time::Duration;

use crossterm::event::{
    DisableMouseCapture, EnableMouseCapture, Event as CrosstermEvent, KeyCode, KeyEvent,
    KeyEventKind, KeyModifiers, MouseEvent as CrosstermMouseEvent, MouseEventKind, poll, read,
};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use tracing::debug;

use super::sim::SimulatedHost;
use crate::types::Vec2;

// =============================================================================
// INPUT
// =============================================================================

/// Terminal input relevant to the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TerminalInput {
    /// Pointer at a cell (0-indexed).
    PointerMove { column: u16, row: u16 },
    /// Wheel notches; positive scrolls down.
    Scroll { notches: i32 },
    /// Terminal focus lost, treated as the pointer leaving the window.
    PointerExit,
    Resize { columns: u16, rows: u16 },
    Quit,
    None,
}

/// Cell-to-pixel mapping.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellMetrics {
    pub cell_width_px: f64,
    pub cell_height_px: f64,
    /// Pixels scrolled per wheel notch.
    pub wheel_step_px: f64,
}

impl Default for CellMetrics {
    fn default() -> Self {
        Self {
            cell_width_px: 8.0,
            cell_height_px: 16.0,
            wheel_step_px: 48.0,
        }
    }
}

impl CellMetrics {
    /// Pixel position of a cell's center.
    pub fn cell_center(&self, column: u16, row: u16) -> Vec2 {
        Vec2::new(
            (column as f64 + 0.5) * self.cell_width_px,
            (row as f64 + 0.5) * self.cell_height_px,
        )
    }
}

// =============================================================================
// CONVERSION
// =============================================================================

/// Convert a crossterm event.
pub fn convert_event(event: CrosstermEvent) -> TerminalInput {
    match event {
        CrosstermEvent::Mouse(mouse) => convert_mouse_event(mouse),
        CrosstermEvent::Key(key) => convert_key_event(key),
        CrosstermEvent::Resize(columns, rows) => TerminalInput::Resize { columns, rows },
        CrosstermEvent::FocusLost => TerminalInput::PointerExit,
        _ => TerminalInput::None,
    }
}

/// Convert a crossterm mouse event.
pub fn convert_mouse_event(event: CrosstermMouseEvent) -> TerminalInput {
    match event.kind {
        MouseEventKind::Moved | MouseEventKind::Drag(_) => TerminalInput::PointerMove {
            column: event.column,
            row: event.row,
        },
        MouseEventKind::ScrollDown => TerminalInput::Scroll { notches: 1 },
        MouseEventKind::ScrollUp => TerminalInput::Scroll { notches: -1 },
        _ => TerminalInput::None,
    }
}

fn convert_key_event(key: KeyEvent) -> TerminalInput {
    if key.kind == KeyEventKind::Release {
        return TerminalInput::None;
    }
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => TerminalInput::Quit,
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => TerminalInput::Quit,
        KeyCode::Down | KeyCode::Char('j') => TerminalInput::Scroll { notches: 1 },
        KeyCode::Up | KeyCode::Char('k') => TerminalInput::Scroll { notches: -1 },
        KeyCode::PageDown => TerminalInput::Scroll { notches: 10 },
        KeyCode::PageUp => TerminalInput::Scroll { notches: -10 },
        _ => TerminalInput::None,
    }
}

// =============================================================================
// POLLING
// =============================================================================

/// Poll for input with timeout. Returns None if nothing arrived.
pub fn poll_input(timeout: Duration) -> std::io::Result<Option<TerminalInput>> {
    if poll(timeout)? {
        Ok(Some(convert_event(read()?)))
    } else {
        Ok(None)
    }
}

// =============================================================================
// APPLY TO HOST
// =============================================================================

impl SimulatedHost {
    /// Apply one terminal input. Returns `false` when the user asked to quit.
    pub fn apply_terminal_input(&self, input: TerminalInput, metrics: &CellMetrics) -> bool {
        match input {
            TerminalInput::PointerMove { column, row } => {
                self.pointer_move(metrics.cell_center(column, row));
            }
            TerminalInput::Scroll { notches } => {
                self.scroll_by(notches as f64 * metrics.wheel_step_px);
            }
            TerminalInput::PointerExit => self.pointer_exit(),
            TerminalInput::Resize { columns, rows } => {
                self.resize_viewport(
                    columns as f64 * metrics.cell_width_px,
                    rows as f64 * metrics.cell_height_px,
                );
            }
            TerminalInput::Quit => return false,
            TerminalInput::None => {}
        }
        true
    }
}

// =============================================================================
// SESSION
// =============================================================================

/// Raw mode, alternate screen and mouse capture for the lifetime of the value.
pub struct TerminalSession {
    active: bool,
}

impl TerminalSession {
    pub fn start() -> std::io::Result<Self> {
        enable_raw_mode()?;
        execute!(stdout(), EnterAlternateScreen, EnableMouseCapture)?;
        debug!("terminal session started");
        Ok(Self { active: true })
    }

    /// Restore the terminal. Safe to call more than once.
    pub fn end(&mut self) -> std::io::Result<()> {
        if !self.active {
            return Ok(());
        }
        self.active = false;
        execute!(stdout(), DisableMouseCapture, LeaveAlternateScreen)?;
        disable_raw_mode()?;
        debug!("terminal session ended");
        Ok(())
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        // Best effort
        let _ = self.end();
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::MouseButton as CrosstermMouseButton;

    use std::cell::Cell;
    use std::rc::Rc;

    use crate::host::{ElementHost, EventHost, EventKind, EventTarget, HostEvent};
    use crate::types::{ListenerFlags, Rect};

    fn mouse(kind: MouseEventKind, column: u16, row: u16) -> CrosstermMouseEvent {
        CrosstermMouseEvent {
            kind,
            column,
            row,
            modifiers: KeyModifiers::empty(),
        }
    }

    #[test]
    fn test_convert_mouse_move_and_drag() {
        assert_eq!(
            convert_mouse_event(mouse(MouseEventKind::Moved, 10, 5)),
            TerminalInput::PointerMove { column: 10, row: 5 }
        );
        assert_eq!(
            convert_mouse_event(mouse(MouseEventKind::Drag(CrosstermMouseButton::Left), 3, 4)),
            TerminalInput::PointerMove { column: 3, row: 4 }
        );
    }

    #[test]
    fn test_convert_wheel() {
        assert_eq!(
            convert_mouse_event(mouse(MouseEventKind::ScrollDown, 0, 0)),
            TerminalInput::Scroll { notches: 1 }
        );
        assert_eq!(
            convert_mouse_event(mouse(MouseEventKind::ScrollUp, 0, 0)),
            TerminalInput::Scroll { notches: -1 }
        );
        assert_eq!(
            convert_mouse_event(mouse(MouseEventKind::Down(CrosstermMouseButton::Left), 0, 0)),
            TerminalInput::None
        );
    }

    #[test]
    fn test_convert_quit_keys() {
        let q = KeyEvent::new(KeyCode::Char('q'), KeyModifiers::empty());
        assert_eq!(convert_event(CrosstermEvent::Key(q)), TerminalInput::Quit);

        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(convert_event(CrosstermEvent::Key(ctrl_c)), TerminalInput::Quit);

        let c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::empty());
        assert_eq!(convert_event(CrosstermEvent::Key(c)), TerminalInput::None);
    }

    #[test]
    fn test_apply_scroll_and_resize() {
        let host = SimulatedHost::new(640.0, 384.0);
        let metrics = CellMetrics::default();

        assert!(host.apply_terminal_input(TerminalInput::Scroll { notches: 2 }, &metrics));
        assert_eq!(host.scroll_y(), 96.0);

        // Cannot scroll above the top.
        host.apply_terminal_input(TerminalInput::Scroll { notches: -10 }, &metrics);
        assert_eq!(host.scroll_y(), 0.0);

        host.apply_terminal_input(TerminalInput::Resize { columns: 100, rows: 30 }, &metrics);
        assert_eq!(host.viewport_size(), (800.0, 480.0));

        assert!(!host.apply_terminal_input(TerminalInput::Quit, &metrics));
    }

    #[test]
    fn test_apply_pointer_uses_cell_centers() {
        let host = SimulatedHost::new(640.0, 384.0);
        let el = host.create_element(None, Rect::new(0.0, 0.0, 16.0, 16.0));
        let metrics = CellMetrics::default();

        let seen = Rc::new(Cell::new(None));
        let seen_clone = seen.clone();
        host.add_listener(
            EventTarget::Element(el),
            EventKind::PointerMove,
            ListenerFlags::PASSIVE,
            Rc::new(move |e: &HostEvent| seen_clone.set(e.client())),
        );

        host.apply_terminal_input(TerminalInput::PointerMove { column: 1, row: 0 }, &metrics);
        assert_eq!(seen.get(), Some(Vec2::new(12.0, 8.0)));
        assert!(host.element_exists(el));
    }
}
