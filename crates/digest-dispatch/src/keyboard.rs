//! Channel-agnostic inline keyboard model.

use serde::{Deserialize, Serialize};

use crate::action::MenuAction;

/// One tappable button: a label and the callback payload it sends back.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct Button {
    pub label: String,
    pub data: String,
}

impl Button {
    pub fn new(label: impl Into<String>, action: &MenuAction) -> Self {
        Self {
            label: label.into(),
            data: action.to_callback_data(),
        }
    }
}

/// Rows of buttons, rendered under a message.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct Keyboard {
    pub rows: Vec<Vec<Button>>,
}

impl Keyboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn row(mut self, buttons: Vec<Button>) -> Self {
        self.rows.push(buttons);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_preserves_row_order() {
        let keyboard = Keyboard::new()
            .row(vec![Button::new("A", &MenuAction::OpenMain)])
            .row(vec![Button::new("B", &MenuAction::Close)]);

        assert_eq!(keyboard.rows.len(), 2);
        assert_eq!(keyboard.rows[0][0].label, "A");
        assert_eq!(keyboard.rows[1][0].data, "menu:close");
    }
}
