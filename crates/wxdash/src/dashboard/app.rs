//! Dashboard state and key handling.

use chrono::{DateTime, Local};
use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::config::Units;
use crate::history::History;
use crate::poller::DashboardUpdate;
use crate::reading::WeatherReading;

/// What the main pane shows.
#[derive(Debug, Clone, PartialEq)]
pub enum View {
    /// Waiting for the first refresh of the current city.
    Loading,
    /// Conditions and trends are available.
    Ready {
        /// Latest reading.
        reading: WeatherReading,
        /// Recent readings, oldest first.
        history: History,
    },
    /// The last refresh failed.
    Failed(String),
}

/// Something the event loop must do in response to a key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Leave the dashboard.
    Quit,
    /// Switch to another city.
    SetCity(String),
    /// Refresh the current city now.
    Refresh,
}

/// Everything the renderer needs.
#[derive(Debug, Clone)]
pub struct App {
    city: String,
    units: Units,
    input: Option<String>,
    view: View,
    last_update: Option<DateTime<Local>>,
}

impl App {
    /// Start showing `city`.
    #[must_use]
    pub fn new(city: impl Into<String>, units: Units) -> Self {
        Self {
            city: city.into(),
            units,
            input: None,
            view: View::Loading,
            last_update: None,
        }
    }

    /// The city being displayed.
    #[must_use]
    pub fn city(&self) -> &str {
        &self.city
    }

    /// Unit system for labels.
    #[must_use]
    pub fn units(&self) -> Units {
        self.units
    }

    /// The city being typed, if the input box is open.
    #[must_use]
    pub fn input(&self) -> Option<&str> {
        self.input.as_deref()
    }

    /// Current view.
    #[must_use]
    pub fn view(&self) -> &View {
        &self.view
    }

    /// Local time of the last applied update.
    #[must_use]
    pub fn last_update(&self) -> Option<DateTime<Local>> {
        self.last_update
    }

    /// Apply a poller result; results for another city are dropped.
    pub fn apply(&mut self, update: DashboardUpdate) {
        if update.city() != self.city {
            return;
        }
        match update {
            DashboardUpdate::Ready { reading, history } => {
                self.last_update = Some(reading.timestamp.with_timezone(&Local));
                self.view = View::Ready { reading, history };
            }
            DashboardUpdate::Failed { message, at, .. } => {
                self.last_update = Some(at.with_timezone(&Local));
                self.view = View::Failed(message);
            }
        }
    }

    /// Report that the refresh task has stopped.
    pub fn disconnect(&mut self) {
        self.view = View::Failed("Weather updates stopped; see the log file.".to_string());
    }

    /// Handle a key press.
    pub fn handle_key(&mut self, key: KeyEvent) -> Option<Action> {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return Some(Action::Quit);
        }

        if let Some(buffer) = self.input.as_mut() {
            return match key.code {
                KeyCode::Enter => {
                    let city = buffer.trim().to_string();
                    self.input = None;
                    if city.is_empty() {
                        None
                    } else if city == self.city {
                        Some(Action::Refresh)
                    } else {
                        self.city.clone_from(&city);
                        self.view = View::Loading;
                        Some(Action::SetCity(city))
                    }
                }
                KeyCode::Esc => {
                    self.input = None;
                    None
                }
                KeyCode::Backspace => {
                    buffer.pop();
                    None
                }
                KeyCode::Char(c) => {
                    buffer.push(c);
                    None
                }
                _ => None,
            };
        }

        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => Some(Action::Quit),
            KeyCode::Char('c' | '/') => {
                self.input = Some(String::new());
                None
            }
            KeyCode::Char('r') => Some(Action::Refresh),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::reading::testing::sample_reading;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            assert_eq!(app.handle_key(press(KeyCode::Char(c))), None);
        }
    }

    fn ready(city: &str) -> DashboardUpdate {
        let reading = sample_reading(city, 0, 24.0);
        DashboardUpdate::Ready {
            history: History::from_recent(vec![reading.clone()]),
            reading,
        }
    }

    #[test]
    fn test_new_app_is_loading() {
        let app = App::new("Bangalore", Units::Metric);
        assert_eq!(app.city(), "Bangalore");
        assert_eq!(app.view(), &View::Loading);
        assert!(app.input().is_none());
        assert!(app.last_update().is_none());
    }

    #[test]
    fn test_quit_keys() {
        let mut app = App::new("Bangalore", Units::Metric);
        assert_eq!(app.handle_key(press(KeyCode::Char('q'))), Some(Action::Quit));
        assert_eq!(app.handle_key(press(KeyCode::Esc)), Some(Action::Quit));
        assert_eq!(
            app.handle_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)),
            Some(Action::Quit)
        );
    }

    #[test]
    fn test_refresh_key() {
        let mut app = App::new("Bangalore", Units::Metric);
        assert_eq!(app.handle_key(press(KeyCode::Char('r'))), Some(Action::Refresh));
    }

    #[test]
    fn test_enter_new_city() {
        let mut app = App::new("Bangalore", Units::Metric);
        app.apply(ready("Bangalore"));

        assert_eq!(app.handle_key(press(KeyCode::Char('c'))), None);
        assert_eq!(app.input(), Some(""));

        type_text(&mut app, "  Pariz");
        app.handle_key(press(KeyCode::Backspace));
        type_text(&mut app, "s ");
        assert_eq!(app.input(), Some("  Paris "));

        let action = app.handle_key(press(KeyCode::Enter));
        assert_eq!(action, Some(Action::SetCity("Paris".to_string())));
        assert_eq!(app.city(), "Paris");
        assert_eq!(app.view(), &View::Loading);
        assert!(app.input().is_none());
    }

    #[test]
    fn test_q_is_text_while_editing() {
        let mut app = App::new("Bangalore", Units::Metric);
        app.handle_key(press(KeyCode::Char('/')));
        type_text(&mut app, "Quebec");
        assert_eq!(app.input(), Some("Quebec"));
    }

    #[test]
    fn test_blank_input_is_ignored() {
        let mut app = App::new("Bangalore", Units::Metric);
        app.handle_key(press(KeyCode::Char('c')));
        type_text(&mut app, "   ");

        assert_eq!(app.handle_key(press(KeyCode::Enter)), None);
        assert_eq!(app.city(), "Bangalore");
        assert!(app.input().is_none());
    }

    #[test]
    fn test_same_city_refreshes() {
        let mut app = App::new("Bangalore", Units::Metric);
        app.apply(ready("Bangalore"));
        app.handle_key(press(KeyCode::Char('c')));
        type_text(&mut app, " Bangalore");

        assert_eq!(app.handle_key(press(KeyCode::Enter)), Some(Action::Refresh));
        assert_eq!(app.city(), "Bangalore");
        assert!(matches!(app.view(), View::Ready { .. }));
        assert!(app.input().is_none());
    }

    #[test]
    fn test_escape_cancels_input() {
        let mut app = App::new("Bangalore", Units::Metric);
        app.handle_key(press(KeyCode::Char('c')));
        type_text(&mut app, "Oslo");

        assert_eq!(app.handle_key(press(KeyCode::Esc)), None);
        assert!(app.input().is_none());
        assert_eq!(app.city(), "Bangalore");
    }

    #[test]
    fn test_apply_ready() {
        let mut app = App::new("Bangalore", Units::Metric);
        app.apply(ready("Bangalore"));

        assert!(matches!(app.view(), View::Ready { .. }));
        assert!(app.last_update().is_some());
    }

    #[test]
    fn test_apply_failed() {
        let mut app = App::new("Atlantis", Units::Metric);
        app.apply(DashboardUpdate::Failed {
            city: "Atlantis".to_string(),
            message: "City not found or API error.".to_string(),
            at: Utc::now(),
        });

        assert_eq!(
            app.view(),
            &View::Failed("City not found or API error.".to_string())
        );
    }

    #[test]
    fn test_stale_update_is_ignored() {
        let mut app = App::new("Paris", Units::Metric);
        app.apply(ready("Bangalore"));
        assert_eq!(app.view(), &View::Loading);
    }

    #[test]
    fn test_disconnect() {
        let mut app = App::new("Paris", Units::Metric);
        app.disconnect();
        assert!(matches!(app.view(), View::Failed(_)));
    }
}
