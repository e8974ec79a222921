use crate::dom::ids;

/// Interaction reported by a host surface, already resolved to the widget control
/// it targeted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiEvent {
    ToggleClicked,
    MinimizeClicked,
    BackdropClicked,
    SendClicked,
    InputKeyPressed { key: String, shift: bool },
}

impl UiEvent {
    /// Maps a click on the element with `id` to its event.
    pub fn from_click(id: &str) -> Option<Self> {
        match id {
            ids::TOGGLE => Some(Self::ToggleClicked),
            ids::MINIMIZE => Some(Self::MinimizeClicked),
            ids::MODAL_BACKDROP => Some(Self::BackdropClicked),
            ids::SEND => Some(Self::SendClicked),
            _ => None,
        }
    }

    /// Enter submits; Shift+Enter is left to the input.
    pub fn submits(&self) -> bool {
        match self {
            Self::SendClicked => true,
            Self::InputKeyPressed { key, shift } => key == "Enter" && !shift,
            Self::ToggleClicked | Self::MinimizeClicked | Self::BackdropClicked => false,
        }
    }
}
