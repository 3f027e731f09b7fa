//! UI events - messages from UI layer to App layer

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Events generated from user input in the UI layer
#[derive(Debug, Clone, PartialEq)]
pub enum UiEvent {
    // Panel navigation
    SelectPanel(Panel),
    NextPanel,
    PrevPanel,
    NextField,
    PrevField,

    // Input editing
    StartEditing,
    StopEditing,
    CharInput(char),
    Paste(String),
    Backspace,
    CursorLeft,
    CursorRight,

    // Wallet actions
    Submit,
    CheckOpen,
    CopyInvoice,

    // Popups
    ToggleHelp,
    CloseHelp,

    // System
    Quit,
}

/// The seven panels of the demo, in display order
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Panel {
    Status,
    Join,
    Invoice,
    Redeem,
    Pay,
    InviteCode,
    Bolt11,
}

impl Panel {
    pub const ALL: [Panel; 7] = [
        Panel::Status,
        Panel::Join,
        Panel::Invoice,
        Panel::Redeem,
        Panel::Pay,
        Panel::InviteCode,
        Panel::Bolt11,
    ];

    pub fn title(&self) -> &'static str {
        match self {
            Panel::Status => "Wallet Status",
            Panel::Join => "Join Federation",
            Panel::Invoice => "Generate Lightning Invoice",
            Panel::Redeem => "Redeem Ecash",
            Panel::Pay => "Pay Lightning",
            Panel::InviteCode => "Parse Invite Code",
            Panel::Bolt11 => "Parse Lightning Invoice",
        }
    }

    pub fn index(&self) -> usize {
        Panel::ALL.iter().position(|p| p == self).unwrap_or(0)
    }

    /// Panel bound to a number key, `1` being the first
    pub fn from_digit(c: char) -> Option<Panel> {
        let n = c.to_digit(10)? as usize;
        n.checked_sub(1).and_then(|i| Panel::ALL.get(i).copied())
    }

    pub fn next(&self) -> Panel {
        Panel::ALL[(self.index() + 1) % Panel::ALL.len()]
    }

    pub fn prev(&self) -> Panel {
        Panel::ALL[(self.index() + Panel::ALL.len() - 1) % Panel::ALL.len()]
    }

    /// Whether the panel has editable fields
    pub fn has_fields(&self) -> bool {
        !matches!(self, Panel::Status)
    }
}

/// Input mode
#[derive(Clone, Copy, PartialEq, Debug)]
pub enum InputMode {
    Normal,
    Editing,
}

/// Convert a key event to a UiEvent based on current UI context
pub fn key_to_ui_event(
    key: KeyEvent,
    active_panel: Panel,
    input_mode: InputMode,
    show_help: bool,
) -> Option<UiEvent> {
    use crossterm::event::KeyEventKind;

    if key.kind != KeyEventKind::Press {
        return None;
    }

    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return Some(UiEvent::Quit);
    }

    if show_help {
        return Some(UiEvent::CloseHelp);
    }

    match input_mode {
        InputMode::Normal => match key.code {
            KeyCode::Char('q') => Some(UiEvent::Quit),
            KeyCode::Char('?') => Some(UiEvent::ToggleHelp),
            KeyCode::Tab => Some(UiEvent::NextPanel),
            KeyCode::BackTab => Some(UiEvent::PrevPanel),
            KeyCode::Char(c) if c.is_ascii_digit() => Panel::from_digit(c).map(UiEvent::SelectPanel),
            KeyCode::Up => Some(UiEvent::PrevField),
            KeyCode::Down => Some(UiEvent::NextField),
            KeyCode::Char('e') | KeyCode::Enter => {
                if active_panel.has_fields() {
                    Some(UiEvent::StartEditing)
                } else {
                    Some(UiEvent::CheckOpen)
                }
            }
            KeyCode::Char('s') => Some(UiEvent::Submit),
            KeyCode::Char('c') => Some(UiEvent::CheckOpen),
            KeyCode::Char('y') if active_panel == Panel::Invoice => Some(UiEvent::CopyInvoice),
            _ => None,
        },
        InputMode::Editing => match key.code {
            KeyCode::Esc => Some(UiEvent::StopEditing),
            KeyCode::Left => Some(UiEvent::CursorLeft),
            KeyCode::Right => Some(UiEvent::CursorRight),
            KeyCode::Backspace => Some(UiEvent::Backspace),
            KeyCode::Tab => Some(UiEvent::NextField),
            KeyCode::BackTab => Some(UiEvent::PrevField),
            KeyCode::Enter => Some(UiEvent::Submit),
            KeyCode::Char(c) => Some(UiEvent::CharInput(c)),
            _ => None,
        },
    }
}
