use crossterm::event::{
    self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent,
    MouseEventKind,
};
use std::time::Duration;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum InputEvent {
    Click { col: u16, row: u16 },
    Resize { cols: u16, rows: u16 },
    Quit,
}

/// Drain whatever the terminal has queued without blocking the frame.
pub(crate) fn collect_input_nonblocking() -> anyhow::Result<Vec<InputEvent>> {
    let mut out = Vec::new();
    while event::poll(Duration::ZERO)? {
        if let Some(ev) = map_event(event::read()?) {
            out.push(ev);
            if out.len() >= 64 {
                break;
            }
        }
    }
    Ok(out)
}

pub(crate) fn map_event(ev: Event) -> Option<InputEvent> {
    match ev {
        Event::Mouse(MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column,
            row,
            ..
        }) => Some(InputEvent::Click { col: column, row }),
        Event::Resize(cols, rows) => Some(InputEvent::Resize { cols, rows }),
        Event::Key(k) => map_key(k),
        _ => None,
    }
}

fn map_key(k: KeyEvent) -> Option<InputEvent> {
    if k.kind != KeyEventKind::Press {
        return None;
    }
    match k.code {
        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => Some(InputEvent::Quit),
        KeyCode::Char('c') if k.modifiers.contains(KeyModifiers::CONTROL) => Some(InputEvent::Quit),
        _ => None,
    }
}
