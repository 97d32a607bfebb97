//! Menu actions carried in callback payloads.
//!
//! Every interactive button encodes exactly one [`MenuAction`]. The
//! payload format is a small colon-separated scheme; parsing returns
//! `None` for anything malformed, which callers treat as a stale
//! button press to be ignored.

use digest_core::{ModelKind, SettingField};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MenuAction {
    /// Show the main settings dashboard.
    OpenMain,
    /// Show the option list for one enumerated field.
    OpenSubmenu(SettingField),
    /// Show one page of the model picker.
    OpenModelPicker { kind: ModelKind, page: usize },
    /// Persist an enumerated option and re-render its submenu.
    SetOption { field: SettingField, value: String },
    /// Persist a model choice and return to the picker's first page.
    SetModel { kind: ModelKind, model_id: String },
    /// Restore every field to its default.
    ResetDefaults,
    /// Dismiss the menu.
    Close,
    /// Regenerate the last summary with current settings.
    Redo,
}

impl MenuAction {
    pub fn to_callback_data(&self) -> String {
        match self {
            MenuAction::OpenMain => "menu:main".to_string(),
            MenuAction::OpenSubmenu(field) => format!("menu:sub:{}", field.column()),
            MenuAction::OpenModelPicker { kind, page } => {
                format!("menu:models:{}:{page}", kind.as_str())
            }
            MenuAction::SetOption { field, value } => {
                format!("set:{}:{value}", field.column())
            }
            MenuAction::SetModel { kind, model_id } => {
                format!("set_model:{}:{model_id}", kind.as_str())
            }
            MenuAction::ResetDefaults => "menu:reset".to_string(),
            MenuAction::Close => "menu:close".to_string(),
            MenuAction::Redo => "redo".to_string(),
        }
    }

    pub fn parse(data: &str) -> Option<Self> {
        match data {
            "menu:main" => return Some(MenuAction::OpenMain),
            "menu:reset" => return Some(MenuAction::ResetDefaults),
            "menu:close" => return Some(MenuAction::Close),
            "redo" => return Some(MenuAction::Redo),
            _ => {}
        }

        if let Some(column) = data.strip_prefix("menu:sub:") {
            return SettingField::from_column(column).map(MenuAction::OpenSubmenu);
        }
        if let Some(rest) = data.strip_prefix("menu:models:") {
            let (kind, page) = rest.split_once(':')?;
            return Some(MenuAction::OpenModelPicker {
                kind: ModelKind::from_str(kind)?,
                page: page.parse().ok()?,
            });
        }
        if let Some(rest) = data.strip_prefix("set_model:") {
            let (kind, model_id) = rest.split_once(':')?;
            if model_id.is_empty() {
                return None;
            }
            return Some(MenuAction::SetModel {
                kind: ModelKind::from_str(kind)?,
                model_id: model_id.to_string(),
            });
        }
        if let Some(rest) = data.strip_prefix("set:") {
            let (column, value) = rest.split_once(':')?;
            if value.is_empty() {
                return None;
            }
            return Some(MenuAction::SetOption {
                field: SettingField::from_column(column)?,
                value: value.to_string(),
            });
        }

        None
    }
}
