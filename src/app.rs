use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, MouseButton, MouseEvent, MouseEventKind};
use ratatui::layout::Position;
use std::time::{Duration, Instant};
use tokio::sync::mpsc::{self, UnboundedReceiver};

use crate::ui::components;
use crate::ui::view::{Callback, Node};
use crate::ui::ButtonHit;

/// How long a status message stays on the info line
const STATUS_TIMEOUT: Duration = Duration::from_secs(3);

/// Requests sent up the tree by descendants
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Message {
    Increment,
}

/// Root ancestor: the only owner of the count
pub struct App {
    pub count: i64,

    // Buttons from the last draw, in document order
    pub buttons: Vec<ButtonHit>,
    pub focused_button: usize,

    // Status message (shown in info line, auto-clears after timeout)
    pub status_message: Option<String>,
    pub status_message_time: Option<Instant>,

    add_to_count: Callback,
    messages: UnboundedReceiver<Message>,
}

impl App {
    pub fn new(initial_count: i64) -> Self {
        let (tx, messages) = mpsc::unbounded_channel();

        // Descendants only ever see this closure, never the count itself
        let add_to_count = Callback::new(move || {
            if tx.send(Message::Increment).is_err() {
                tracing::warn!("Increment dropped: app is gone");
            }
        });

        Self {
            count: initial_count,
            buttons: Vec::new(),
            focused_button: 0,
            status_message: None,
            status_message_time: None,
            add_to_count,
            messages,
        }
    }

    /// The drilled tree for the current count
    pub fn view(&self) -> Node {
        components::parent(self.count, &self.add_to_count)
    }

    pub fn set_buttons(&mut self, buttons: Vec<ButtonHit>) {
        if self.focused_button >= buttons.len() {
            self.focused_button = 0;
        }
        self.buttons = buttons;
    }

    pub fn set_status(&mut self, msg: impl Into<String>) {
        self.status_message = Some(msg.into());
        self.status_message_time = Some(Instant::now());
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> Result<()> {
        match key.code {
            KeyCode::Tab => self.focus_next(),
            KeyCode::BackTab => self.focus_prev(),
            KeyCode::Enter | KeyCode::Char(' ') | KeyCode::Char('+') => {
                self.activate_focused()?;
            }
            _ => {}
        }
        Ok(())
    }

    pub fn handle_mouse(&mut self, mouse: MouseEvent) {
        if mouse.kind != MouseEventKind::Down(MouseButton::Left) {
            return;
        }

        let position = Position::new(mouse.column, mouse.row);
        if let Some(index) = self.buttons.iter().position(|b| b.area.contains(position)) {
            self.focused_button = index;
            self.buttons[index].on_activate.invoke();
        }
    }

    fn focus_next(&mut self) {
        if !self.buttons.is_empty() {
            self.focused_button = (self.focused_button + 1) % self.buttons.len();
        }
    }

    fn focus_prev(&mut self) {
        if !self.buttons.is_empty() {
            self.focused_button = if self.focused_button == 0 {
                self.buttons.len() - 1
            } else {
                self.focused_button - 1
            };
        }
    }

    fn activate_focused(&mut self) -> Result<()> {
        let button = self
            .buttons
            .get(self.focused_button)
            .ok_or_else(|| anyhow::anyhow!("No button on screen (terminal too small?)"))?;
        button.on_activate.invoke();
        Ok(())
    }

    /// Apply dispatched messages and expire old status messages
    pub fn tick(&mut self) {
        while let Ok(message) = self.messages.try_recv() {
            self.apply(message);
        }

        if let Some(time) = self.status_message_time {
            if time.elapsed() >= STATUS_TIMEOUT {
                self.status_message = None;
                self.status_message_time = None;
            }
        }
    }

    fn apply(&mut self, message: Message) {
        match message {
            Message::Increment => match self.count.checked_add(1) {
                Some(next) => {
                    tracing::debug!("Count {} -> {}", self.count, next);
                    self.count = next;
                }
                None => {
                    tracing::warn!("Refusing to increment past {}", self.count);
                    self.set_status("Count is already at its maximum");
                }
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;
    use ratatui::layout::Rect;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn click(column: u16, row: u16) -> MouseEvent {
        MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column,
            row,
            modifiers: KeyModifiers::NONE,
        }
    }

    /// Lay the app's own buttons out on a single row, like a draw would
    fn place_buttons(app: &mut App) {
        let hits = app
            .view()
            .buttons()
            .into_iter()
            .map(|(_, cb)| ButtonHit {
                area: Rect::new(10, 5, 17, 1),
                on_activate: cb.clone(),
            })
            .collect();
        app.set_buttons(hits);
    }

    #[tokio::test]
    async fn test_enter_increments_after_tick() {
        let mut app = App::new(5);
        place_buttons(&mut app);

        app.handle_key(key(KeyCode::Enter)).unwrap();
        assert_eq!(app.count, 5, "owner only updates on its next tick");

        app.tick();
        assert_eq!(app.count, 6);
        assert!(app.view().text_lines().contains(&"Count is: 6".to_string()));
    }

    #[tokio::test]
    async fn test_each_activation_increments_once() {
        let mut app = App::new(0);
        place_buttons(&mut app);

        app.handle_key(key(KeyCode::Char(' '))).unwrap();
        app.handle_key(key(KeyCode::Char('+'))).unwrap();
        app.handle_key(key(KeyCode::Char('x'))).unwrap();
        app.tick();

        assert_eq!(app.count, 2);
    }

    #[tokio::test]
    async fn test_mouse_click_on_button() {
        let mut app = App::new(-3);
        place_buttons(&mut app);

        app.handle_mouse(click(0, 0));
        app.tick();
        assert_eq!(app.count, -3, "click outside the button does nothing");

        app.handle_mouse(click(12, 5));
        app.tick();
        assert_eq!(app.count, -2);
    }

    #[tokio::test]
    async fn test_activation_without_buttons_is_an_error() {
        let mut app = App::new(0);
        assert!(app.handle_key(key(KeyCode::Enter)).is_err());
        app.tick();
        assert_eq!(app.count, 0);
    }

    #[tokio::test]
    async fn test_overflow_is_refused() {
        let mut app = App::new(i64::MAX);
        place_buttons(&mut app);

        app.handle_key(key(KeyCode::Enter)).unwrap();
        app.tick();

        assert_eq!(app.count, i64::MAX);
        assert_eq!(
            app.status_message.as_deref(),
            Some("Count is already at its maximum")
        );
    }

    #[test]
    fn test_focus_wraps_with_single_button() {
        let mut app = App::new(0);
        place_buttons(&mut app);

        app.handle_key(key(KeyCode::Tab)).unwrap();
        assert_eq!(app.focused_button, 0);
        app.handle_key(key(KeyCode::BackTab)).unwrap();
        assert_eq!(app.focused_button, 0);
    }
}
