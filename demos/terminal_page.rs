//! Terminal Page - drive the mounted page from a terminal
//!
//! Mounts the placeholder portfolio on a simulated host sized to the
//! terminal, then feeds it mouse movement and wheel scrolling. Each frame a
//! status panel shows the scroll offset, the active nav section, which
//! sections have revealed, and the transform on the send button.
//!
//! Logs go to `terminal_page.log`; set `RUST_LOG=spark_folio=trace` for
//! controller detail.
//!
//! Run with: cargo run --example terminal_page
//! Quit with q, Esc or Ctrl+C.

use std::fs::File;
use std::io::{stdout, Write};
use std::rc::Rc;
use std::sync::Mutex;
use std::time::Duration;

use crossterm::cursor::MoveTo;
use crossterm::style::Print;
use crossterm::terminal::{size, Clear, ClearType};
use crossterm::queue;
use tracing_subscriber::EnvFilter;

use spark_folio::host::terminal::{poll_input, CellMetrics, TerminalSession};
use spark_folio::host::ElementHost;
use spark_folio::state::SECTION_REVEAL_CLASS;
use spark_folio::{mount_page, BlockRole, MotionConfig, PageHandle, PortfolioContent, SimulatedHost};

fn draw(host: &SimulatedHost, page: &PageHandle) -> std::io::Result<()> {
    let mut out = stdout();
    queue!(out, MoveTo(0, 0), Clear(ClearType::All))?;

    let state = page.navbar().state();
    let lines = [
        format!("spark-folio  (page height {:.0}px)", page.height()),
        format!(
            "scroll {:.0}px  navbar {}",
            host.scroll_y(),
            if state.scrolled_past_threshold { "scrolled" } else { "top" }
        ),
        format!("active section: {}", state.active_section_id.as_deref().unwrap_or("-")),
    ];
    for (row, line) in lines.iter().enumerate() {
        queue!(out, MoveTo(0, row as u16), Print(line))?;
    }

    let mut row = lines.len() as u16 + 1;
    for (role, element) in page.elements() {
        let Some(anchor) = role.anchor() else {
            continue;
        };
        let mark = if host.has_class(*element, SECTION_REVEAL_CLASS) { "revealed" } else { "hidden" };
        queue!(out, MoveTo(2, row), Print(format!("{anchor:<12} {mark}")))?;
        row += 1;
    }

    if let Some(button) = page.element_for(&BlockRole::SendButton) {
        let transform = host.transform(button).map(|t| t.to_css()).unwrap_or_default();
        queue!(out, MoveTo(0, row + 1), Print(format!("send button: {transform}")))?;
    }
    queue!(out, MoveTo(0, row + 3), Print("wheel to scroll, move the mouse, q to quit"))?;
    out.flush()
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let log = File::create("terminal_page.log")?;
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("spark_folio=debug")))
        .with_writer(Mutex::new(log))
        .with_ansi(false)
        .init();

    let metrics = CellMetrics::default();
    let (columns, rows) = size()?;
    let host = Rc::new(SimulatedHost::new(
        columns as f64 * metrics.cell_width_px,
        rows as f64 * metrics.cell_height_px,
    ));
    let page = mount_page(host.clone(), &PortfolioContent::placeholder(), &MotionConfig::default())?;

    let mut session = TerminalSession::start()?;
    loop {
        if let Some(input) = poll_input(Duration::from_millis(16))? {
            if !host.apply_terminal_input(input, &metrics) {
                break;
            }
        }
        host.run_frame();
        draw(&host, &page)?;
    }

    page.teardown();
    session.end()?;
    Ok(())
}
