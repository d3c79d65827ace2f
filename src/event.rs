use crossterm::event::{
    Event as CrosstermEvent, EventStream, KeyCode, KeyEvent, KeyEventKind, KeyModifiers,
    MouseEvent,
};
use futures::StreamExt;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::{interval_at, Instant, MissedTickBehavior};

use crate::action::Action;
use crate::fetch::{DiffResult, ListResult};
use crate::state::FocusPanel;

#[derive(Debug)]
pub enum Event {
    Key(KeyEvent),
    Mouse(MouseEvent),
    Resize,
    Tick,
    FilesFetched(ListResult),
    DiffFetched(DiffResult),
}

/// One queue for everything the UI loop reacts to: terminal input, the
/// refresh timer and fetch completions.
pub struct EventReader {
    tx: mpsc::UnboundedSender<Event>,
    rx: mpsc::UnboundedReceiver<Event>,
}

impl EventReader {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self { tx, rx }
    }

    /// Handle for producers outside the reader, such as the fetch worker.
    pub fn sender(&self) -> mpsc::UnboundedSender<Event> {
        self.tx.clone()
    }

    /// Start forwarding terminal input and the refresh timer. The first tick
    /// fires one full `refresh` after this call.
    pub fn start(&self, refresh: Duration) {
        let event_tx = self.tx.clone();
        tokio::spawn(async move {
            let mut reader = EventStream::new();
            loop {
                let event = match reader.next().await {
                    Some(Ok(CrosstermEvent::Key(key))) if key.kind != KeyEventKind::Release => {
                        Event::Key(key)
                    }
                    Some(Ok(CrosstermEvent::Mouse(mouse))) => Event::Mouse(mouse),
                    Some(Ok(CrosstermEvent::Resize(_, _))) => Event::Resize,
                    Some(Err(e)) => {
                        tracing::error!("terminal input failed: {e}");
                        break;
                    }
                    None => break,
                    _ => continue,
                };
                if event_tx.send(event).is_err() {
                    break;
                }
            }
        });

        let tick_tx = self.tx.clone();
        tokio::spawn(async move {
            let mut interval = interval_at(Instant::now() + refresh, refresh);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                interval.tick().await;
                if tick_tx.send(Event::Tick).is_err() {
                    break;
                }
            }
        });
    }

    pub async fn next(&mut self) -> Option<Event> {
        self.rx.recv().await
    }

    /// Non-blocking: returns a pending event if one is available, or None.
    pub fn try_next(&mut self) -> Option<Event> {
        self.rx.try_recv().ok()
    }
}

impl Default for EventReader {
    fn default() -> Self {
        Self::new()
    }
}

/// All context needed to map a key event to an action.
pub struct KeyContext {
    pub focus: FocusPanel,
    pub help_open: bool,
    pub failed: bool,
}

/// Map a key event to an action based on current app context.
pub fn map_key_to_action(key: KeyEvent, ctx: &KeyContext) -> Option<Action> {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

    // Quit always wins, even on the error screen.
    match key.code {
        KeyCode::Char('c') if ctrl => return Some(Action::Quit),
        KeyCode::Char('q') if !ctrl => return Some(Action::Quit),
        _ => {}
    }
    if ctx.failed {
        return None;
    }

    match key.code {
        KeyCode::Char('?') => return Some(Action::ToggleHelp),
        KeyCode::Tab | KeyCode::BackTab => return Some(Action::SwitchPane),
        KeyCode::Char('r') if !ctrl => return Some(Action::Refresh),
        _ => {}
    }

    if ctx.help_open {
        return match key.code {
            KeyCode::Esc => Some(Action::ToggleHelp),
            _ => None,
        };
    }

    match ctx.focus {
        FocusPanel::FileList => match key.code {
            KeyCode::Char('j') | KeyCode::Down => Some(Action::SelectNext),
            KeyCode::Char('k') | KeyCode::Up => Some(Action::SelectPrevious),
            KeyCode::Char('g') | KeyCode::Home => Some(Action::SelectFirst),
            KeyCode::Char('G') | KeyCode::End => Some(Action::SelectLast),
            KeyCode::Enter | KeyCode::Char('l') | KeyCode::Right => Some(Action::FocusDiff),
            _ => None,
        },
        FocusPanel::Diff => match key.code {
            KeyCode::Char('d') if ctrl => Some(Action::HalfPageDown),
            KeyCode::Char('u') if ctrl => Some(Action::HalfPageUp),
            KeyCode::PageDown => Some(Action::HalfPageDown),
            KeyCode::PageUp => Some(Action::HalfPageUp),
            KeyCode::Char('j') | KeyCode::Down => Some(Action::ScrollDown),
            KeyCode::Char('k') | KeyCode::Up => Some(Action::ScrollUp),
            KeyCode::Char('g') | KeyCode::Home => Some(Action::ScrollTop),
            KeyCode::Char('G') | KeyCode::End => Some(Action::ScrollBottom),
            KeyCode::Char('h') | KeyCode::Left | KeyCode::Esc => Some(Action::FocusFileList),
            _ => None,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn ctrl(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL)
    }

    fn ctx(focus: FocusPanel) -> KeyContext {
        KeyContext {
            focus,
            help_open: false,
            failed: false,
        }
    }

    #[test]
    fn test_global_keys_in_both_panes() {
        for focus in [FocusPanel::FileList, FocusPanel::Diff] {
            let c = ctx(focus);
            assert_eq!(map_key_to_action(key(KeyCode::Char('q')), &c), Some(Action::Quit));
            assert_eq!(map_key_to_action(ctrl('c'), &c), Some(Action::Quit));
            assert_eq!(map_key_to_action(key(KeyCode::Char('?')), &c), Some(Action::ToggleHelp));
            assert_eq!(map_key_to_action(key(KeyCode::Tab), &c), Some(Action::SwitchPane));
            assert_eq!(map_key_to_action(key(KeyCode::Char('r')), &c), Some(Action::Refresh));
        }
    }

    #[test]
    fn test_same_key_depends_on_focus() {
        let list = ctx(FocusPanel::FileList);
        let diff = ctx(FocusPanel::Diff);
        assert_eq!(map_key_to_action(key(KeyCode::Char('j')), &list), Some(Action::SelectNext));
        assert_eq!(map_key_to_action(key(KeyCode::Char('j')), &diff), Some(Action::ScrollDown));
        assert_eq!(map_key_to_action(key(KeyCode::End), &list), Some(Action::SelectLast));
        assert_eq!(map_key_to_action(key(KeyCode::End), &diff), Some(Action::ScrollBottom));
        assert_eq!(map_key_to_action(key(KeyCode::Enter), &list), Some(Action::FocusDiff));
        assert_eq!(map_key_to_action(key(KeyCode::Char('h')), &diff), Some(Action::FocusFileList));
        assert_eq!(map_key_to_action(key(KeyCode::Char('h')), &list), None);
    }

    #[test]
    fn test_half_page_keys() {
        let diff = ctx(FocusPanel::Diff);
        assert_eq!(map_key_to_action(ctrl('d'), &diff), Some(Action::HalfPageDown));
        assert_eq!(map_key_to_action(ctrl('u'), &diff), Some(Action::HalfPageUp));
        assert_eq!(map_key_to_action(key(KeyCode::PageDown), &diff), Some(Action::HalfPageDown));
        assert_eq!(map_key_to_action(key(KeyCode::Char('d')), &diff), None);
    }

    #[test]
    fn test_shifted_g_jumps_to_end() {
        let list = ctx(FocusPanel::FileList);
        let shifted = KeyEvent::new(KeyCode::Char('G'), KeyModifiers::SHIFT);
        assert_eq!(map_key_to_action(shifted, &list), Some(Action::SelectLast));
    }

    #[test]
    fn test_help_swallows_pane_keys() {
        let c = KeyContext {
            help_open: true,
            ..ctx(FocusPanel::FileList)
        };
        assert_eq!(map_key_to_action(key(KeyCode::Char('j')), &c), None);
        assert_eq!(map_key_to_action(key(KeyCode::Esc), &c), Some(Action::ToggleHelp));
        assert_eq!(map_key_to_action(key(KeyCode::Char('q')), &c), Some(Action::Quit));
    }

    #[test]
    fn test_error_screen_only_quits() {
        let c = KeyContext {
            failed: true,
            ..ctx(FocusPanel::Diff)
        };
        assert_eq!(map_key_to_action(key(KeyCode::Char('r')), &c), None);
        assert_eq!(map_key_to_action(key(KeyCode::Tab), &c), None);
        assert_eq!(map_key_to_action(key(KeyCode::Char('q')), &c), Some(Action::Quit));
    }
}
