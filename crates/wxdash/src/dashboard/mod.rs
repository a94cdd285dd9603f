//! Terminal dashboard.
//!
//! The event loop runs on the calling thread. It redraws, polls the keyboard
//! and drains updates from the [`Poller`](crate::poller::Poller) task; city
//! changes and manual refreshes go back to the poller over a watch channel.

mod app;
mod ui;

use std::time::Duration;

use ratatui::backend::Backend;
use ratatui::crossterm::event::{self, Event, KeyEventKind};
use ratatui::Terminal;
use tokio::sync::{mpsc, watch};
use tokio::sync::mpsc::error::TryRecvError;
use tracing::{debug, info};

pub use app::{Action, App, View};
pub use ui::render;

use crate::error::Result;
use crate::poller::DashboardUpdate;

/// How long to wait for a key before redrawing.
const TICK: Duration = Duration::from_millis(250);

/// Run the dashboard until the user quits.
///
/// # Errors
///
/// Returns an error if drawing or reading terminal events fails.
pub fn run<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    updates: &mut mpsc::Receiver<DashboardUpdate>,
    city_tx: &watch::Sender<String>,
) -> Result<()> {
    let mut connected = true;

    loop {
        if connected {
            connected = drain_updates(app, updates);
        }

        terminal.draw(|frame| render(frame, app))?;

        if !event::poll(TICK)? {
            continue;
        }
        let Event::Key(key) = event::read()? else {
            continue;
        };
        if key.kind != KeyEventKind::Press {
            continue;
        }

        match app.handle_key(key) {
            Some(Action::Quit) => {
                info!("dashboard closed");
                return Ok(());
            }
            Some(Action::SetCity(city)) => {
                info!(city, "city changed");
                city_tx.send_replace(city);
            }
            Some(Action::Refresh) => {
                debug!("manual refresh requested");
                city_tx.send_modify(|_| {});
            }
            None => {}
        }
    }
}

/// Apply every pending update; returns `false` once the poller is gone.
fn drain_updates(app: &mut App, updates: &mut mpsc::Receiver<DashboardUpdate>) -> bool {
    loop {
        match updates.try_recv() {
            Ok(update) => app.apply(update),
            Err(TryRecvError::Empty) => return true,
            Err(TryRecvError::Disconnected) => {
                app.disconnect();
                return false;
            }
        }
    }
}
