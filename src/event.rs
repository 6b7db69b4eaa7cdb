use std::time::Duration;

use crossterm::event::{Event, EventStream, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use futures::StreamExt;
use tokio::sync::mpsc;

use crate::action::Action;
use crate::app::{InputMode, Overlay};
use crate::kinds::{operation_for_key, KindId};

/// Terminal key events interleaved with a fixed tick.
pub struct RawEventHandler {
    rx: mpsc::UnboundedReceiver<AppEvent>,
}

pub enum AppEvent {
    Key(KeyEvent),
    Tick,
}

impl RawEventHandler {
    pub fn new(tick_rate: Duration) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();

        tokio::spawn(async move {
            let mut reader = EventStream::new();
            let mut tick = tokio::time::interval(tick_rate);

            loop {
                tokio::select! {
                    _ = tick.tick() => {
                        if tx.send(AppEvent::Tick).is_err() {
                            break;
                        }
                    }
                    event = reader.next() => {
                        match event {
                            Some(Ok(Event::Key(key))) if key.kind != KeyEventKind::Release => {
                                if tx.send(AppEvent::Key(key)).is_err() {
                                    break;
                                }
                            }
                            Some(Ok(_)) => {}
                            Some(Err(err)) => {
                                tracing::error!(error = %err, "terminal event stream failed");
                                break;
                            }
                            None => break,
                        }
                    }
                }
            }
        });

        Self { rx }
    }

    pub async fn next(&mut self) -> Option<AppEvent> {
        self.rx.recv().await
    }
}

/// Map a key event to an action based on current app state
pub fn key_to_action(
    key: KeyEvent,
    active: KindId,
    input_mode: &InputMode,
    overlay: &Overlay,
    input_buffer: &str,
) -> Option<Action> {
    // Overlays take every key
    match overlay {
        Overlay::Help => {
            return match key.code {
                KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q') => {
                    Some(Action::ToggleHelp)
                }
                _ => None,
            };
        }
        Overlay::Confirm(_) => {
            return match key.code {
                KeyCode::Char('y') | KeyCode::Enter => Some(Action::ConfirmOperation),
                KeyCode::Char('n') | KeyCode::Esc => Some(Action::CloseOverlay),
                _ => None,
            };
        }
        Overlay::WorkgroupPicker => {
            return match key.code {
                KeyCode::Char('j') | KeyCode::Down => Some(Action::NavigateDown),
                KeyCode::Char('k') | KeyCode::Up => Some(Action::NavigateUp),
                KeyCode::Enter => Some(Action::Select),
                KeyCode::Esc | KeyCode::Char('q') => Some(Action::CloseOverlay),
                _ => None,
            };
        }
        Overlay::None => {}
    }

    match input_mode {
        InputMode::Command => {
            return match key.code {
                KeyCode::Esc => Some(Action::CloseOverlay),
                KeyCode::Enter => Some(Action::SubmitCommandInput(input_buffer.to_string())),
                KeyCode::Tab => {
                    let defs = crate::kinds::kind_spec(active).filters;
                    crate::input::commands::completion(defs, input_buffer)
                        .map(|rest| Action::UpdateInputBuffer(format!("{}{} ", input_buffer, rest)))
                }
                KeyCode::Backspace => {
                    let mut buf = input_buffer.to_string();
                    buf.pop();
                    Some(Action::UpdateInputBuffer(buf))
                }
                KeyCode::Char(c) => {
                    let mut buf = input_buffer.to_string();
                    buf.push(c);
                    Some(Action::UpdateInputBuffer(buf))
                }
                _ => None,
            };
        }
        InputMode::Search => {
            return match key.code {
                KeyCode::Esc => Some(Action::CloseOverlay),
                KeyCode::Enter => Some(Action::SubmitSearch(input_buffer.to_string())),
                KeyCode::Backspace => {
                    let mut buf = input_buffer.to_string();
                    buf.pop();
                    Some(Action::UpdateInputBuffer(buf))
                }
                KeyCode::Char(c) => {
                    let mut buf = input_buffer.to_string();
                    buf.push(c);
                    Some(Action::UpdateInputBuffer(buf))
                }
                _ => None,
            };
        }
        InputMode::PendingG => {
            return match key.code {
                KeyCode::Char('g') => Some(Action::NavigateTop),
                _ => Some(Action::Back), // Cancel the pending chord
            };
        }
        InputMode::Normal => {}
    }

    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return match key.code {
            KeyCode::Char('c') => Some(Action::Quit),
            KeyCode::Char('r') => Some(Action::Refresh),
            _ => None,
        };
    }

    match key.code {
        KeyCode::Char('q') => Some(Action::Quit),
        KeyCode::Char(':') => Some(Action::OpenCommandInput),
        KeyCode::Char('/') => Some(Action::OpenSearch),
        KeyCode::Char('?') => Some(Action::ToggleHelp),
        KeyCode::Char('j') | KeyCode::Down => Some(Action::NavigateDown),
        KeyCode::Char('k') | KeyCode::Up => Some(Action::NavigateUp),
        KeyCode::Char('g') => Some(Action::EnterPendingG),
        KeyCode::Char('G') => Some(Action::NavigateBottom),
        KeyCode::Esc => Some(Action::Back),
        KeyCode::Tab => Some(Action::NextView),

        KeyCode::Char(']') | KeyCode::Right | KeyCode::PageDown => Some(Action::NextPage),
        KeyCode::Char('[') | KeyCode::Left | KeyCode::PageUp => Some(Action::PrevPage),
        KeyCode::Char('{') => Some(Action::FirstPage),
        KeyCode::Char('}') => Some(Action::LastPage),
        KeyCode::Char('+') => Some(Action::CyclePageSize { forward: true }),
        KeyCode::Char('-') => Some(Action::CyclePageSize { forward: false }),

        KeyCode::Char('w') => Some(Action::OpenWorkgroupPicker),
        KeyCode::Char('x') => Some(Action::ResetFilters),

        KeyCode::Char(c @ '1'..='4') => {
            let idx = c.to_digit(10).unwrap_or(1) as usize - 1;
            KindId::ALL.get(idx).copied().map(Action::SwitchView)
        }
        KeyCode::Char(c) => operation_for_key(active, c).map(Action::RunOperation),

        _ => None,
    }
}
