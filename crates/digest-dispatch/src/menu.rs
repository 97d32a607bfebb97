//! Settings-menu state machine and renderers.
//!
//! Transitions are pure: [`transition`] maps a state and a tapped
//! action to the next state plus an effect for the caller to apply to
//! the settings store. Renderers turn a state and the current settings
//! into text plus a keyboard, so the whole menu is testable without a
//! live channel.

use digest_core::{
    tr, Creativity, ModelInfo, ModelKind, MsgKey, SettingField, Settings, SummaryLanguage,
    SummaryLength, Tone, UiLanguage,
};

use crate::action::MenuAction;
use crate::keyboard::{Button, Keyboard};

pub const MODELS_PER_PAGE: usize = 6;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MenuState {
    MainMenu,
    Submenu(SettingField),
    ModelPicker { kind: ModelKind, page: usize },
    Closed,
}

/// Store side-effect requested by a transition.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MenuEffect {
    None,
    Write { field: SettingField, value: String },
    Reset,
}

/// Rendered menu: message text plus its keyboard.
#[derive(Clone, Debug, PartialEq)]
pub struct MenuView {
    pub text: String,
    pub keyboard: Keyboard,
}

/// Apply one action to the menu.
///
/// A closed menu ignores every stale button except an explicit reopen.
/// Model fields never get a plain submenu; they route to the picker.
pub fn transition(state: &MenuState, action: &MenuAction) -> (MenuState, MenuEffect) {
    if *state == MenuState::Closed && *action != MenuAction::OpenMain {
        return (MenuState::Closed, MenuEffect::None);
    }

    match action {
        MenuAction::OpenMain => (MenuState::MainMenu, MenuEffect::None),
        MenuAction::OpenSubmenu(SettingField::Model) => (
            MenuState::ModelPicker {
                kind: ModelKind::Text,
                page: 0,
            },
            MenuEffect::None,
        ),
        MenuAction::OpenSubmenu(SettingField::AudioModel) => (
            MenuState::ModelPicker {
                kind: ModelKind::Audio,
                page: 0,
            },
            MenuEffect::None,
        ),
        MenuAction::OpenSubmenu(field) => (MenuState::Submenu(*field), MenuEffect::None),
        MenuAction::OpenModelPicker { kind, page } => (
            MenuState::ModelPicker {
                kind: *kind,
                page: *page,
            },
            MenuEffect::None,
        ),
        MenuAction::SetOption { field, value } => (
            MenuState::Submenu(*field),
            MenuEffect::Write {
                field: *field,
                value: value.clone(),
            },
        ),
        MenuAction::SetModel { kind, model_id } => (
            MenuState::ModelPicker {
                kind: *kind,
                page: 0,
            },
            MenuEffect::Write {
                field: kind.field(),
                value: model_id.clone(),
            },
        ),
        MenuAction::ResetDefaults => (MenuState::MainMenu, MenuEffect::Reset),
        MenuAction::Close => (MenuState::Closed, MenuEffect::None),
        MenuAction::Redo => (state.clone(), MenuEffect::None),
    }
}

/// Main dashboard: current value of every setting plus entry buttons.
pub fn render_dashboard(
    settings: &Settings,
    text_models: &[ModelInfo],
    audio_models: &[ModelInfo],
) -> MenuView {
    let lang = settings.ui_language;

    let text = format!(
        "⚙️ <b>{title}</b>\n\n\
         {model}: <b>{model_value}</b>\n\
         {audio}: <b>{audio_value}</b>\n\
         {language}: <b>{language_value}</b>\n\
         {length}: <b>{length_value}</b>\n\
         {tone}: <b>{tone_value}</b>\n\
         {creativity}: <b>{creativity_value}</b>\n\
         {interface}: <b>{interface_value}</b>",
        title = tr(lang, MsgKey::SettingsTitle),
        model = tr(lang, MsgKey::SelectModel),
        model_value = label_for(text_models, &settings.model),
        audio = tr(lang, MsgKey::SelectAudioModel),
        audio_value = label_for(audio_models, &settings.audio_model),
        language = tr(lang, MsgKey::SelectLanguage),
        language_value = settings.summary_language.label(),
        length = tr(lang, MsgKey::SelectLength),
        length_value = settings.length.label(),
        tone = tr(lang, MsgKey::SelectTone),
        tone_value = settings.tone.label(),
        creativity = tr(lang, MsgKey::SelectCreativity),
        creativity_value = settings.creativity.label(),
        interface = tr(lang, MsgKey::SelectInterface),
        interface_value = settings.ui_language.label(),
    );

    let keyboard = Keyboard::new()
        .row(vec![
            Button::new(
                tr(lang, MsgKey::SelectModel),
                &MenuAction::OpenModelPicker {
                    kind: ModelKind::Text,
                    page: 0,
                },
            ),
            Button::new(
                tr(lang, MsgKey::SelectAudioModel),
                &MenuAction::OpenModelPicker {
                    kind: ModelKind::Audio,
                    page: 0,
                },
            ),
        ])
        .row(vec![
            Button::new(
                tr(lang, MsgKey::SelectLanguage),
                &MenuAction::OpenSubmenu(SettingField::SummaryLanguage),
            ),
            Button::new(
                tr(lang, MsgKey::SelectLength),
                &MenuAction::OpenSubmenu(SettingField::Length),
            ),
        ])
        .row(vec![
            Button::new(
                tr(lang, MsgKey::SelectTone),
                &MenuAction::OpenSubmenu(SettingField::Tone),
            ),
            Button::new(
                tr(lang, MsgKey::SelectCreativity),
                &MenuAction::OpenSubmenu(SettingField::Creativity),
            ),
        ])
        .row(vec![Button::new(
            tr(lang, MsgKey::SelectInterface),
            &MenuAction::OpenSubmenu(SettingField::UiLanguage),
        )])
        .row(vec![
            Button::new(tr(lang, MsgKey::ResetDefaults), &MenuAction::ResetDefaults),
            Button::new(tr(lang, MsgKey::Close), &MenuAction::Close),
        ]);

    MenuView { text, keyboard }
}

/// Option list for one enumerated field, current choice checkmarked.
pub fn render_submenu(field: SettingField, settings: &Settings) -> MenuView {
    let lang = settings.ui_language;
    let current = settings.value(field);

    let title_key = match field {
        SettingField::SummaryLanguage => MsgKey::SelectLanguage,
        SettingField::Length => MsgKey::SelectLength,
        SettingField::Tone => MsgKey::SelectTone,
        SettingField::Creativity => MsgKey::SelectCreativity,
        SettingField::UiLanguage => MsgKey::SelectInterface,
        // Model fields are browsed through the picker.
        SettingField::Model => MsgKey::SelectModel,
        SettingField::AudioModel => MsgKey::SelectAudioModel,
    };
    let text = format!(
        "{}\n\n<i>{}</i>",
        tr(lang, title_key),
        tr(lang, MsgKey::ChooseValue)
    );

    let mut keyboard = Keyboard::new();
    for pair in options_for(field).chunks(2) {
        let row = pair
            .iter()
            .map(|(label, value)| {
                let marked = if *value == current {
                    format!("✅ {label}")
                } else {
                    (*label).to_string()
                };
                Button::new(
                    marked,
                    &MenuAction::SetOption {
                        field,
                        value: (*value).to_string(),
                    },
                )
            })
            .collect();
        keyboard = keyboard.row(row);
    }
    keyboard = keyboard.row(vec![Button::new(tr(lang, MsgKey::Back), &MenuAction::OpenMain)]);

    MenuView { text, keyboard }
}

/// One page of the model picker. The currently selected model is
/// pinned to the front of the list; `page` is clamped to the real
/// page count so stale navigation buttons cannot run off the end.
pub fn render_picker(
    kind: ModelKind,
    page: usize,
    models: &[ModelInfo],
    settings: &Settings,
) -> MenuView {
    let lang = settings.ui_language;
    let current = settings.value(kind.field());

    let mut ordered: Vec<&ModelInfo> = Vec::with_capacity(models.len());
    ordered.extend(models.iter().filter(|model| model.id == current));
    ordered.extend(models.iter().filter(|model| model.id != current));

    let page_count = ordered.len().div_ceil(MODELS_PER_PAGE).max(1);
    let page = page.min(page_count - 1);

    let title_key = match kind {
        ModelKind::Text => MsgKey::SelectModel,
        ModelKind::Audio => MsgKey::SelectAudioModel,
    };
    let text = format!(
        "{}\n\n<i>{}</i> ({}/{})",
        tr(lang, title_key),
        tr(lang, MsgKey::ChooseValue),
        page + 1,
        page_count
    );

    let mut keyboard = Keyboard::new();
    let start = page * MODELS_PER_PAGE;
    for model in ordered.iter().skip(start).take(MODELS_PER_PAGE) {
        let label = if model.id == current {
            format!("✅ {}", model.label)
        } else {
            model.label.clone()
        };
        keyboard = keyboard.row(vec![Button::new(
            label,
            &MenuAction::SetModel {
                kind,
                model_id: model.id.clone(),
            },
        )]);
    }

    let mut nav = Vec::new();
    if page > 0 {
        nav.push(Button::new(
            tr(lang, MsgKey::PrevPage),
            &MenuAction::OpenModelPicker {
                kind,
                page: page - 1,
            },
        ));
    }
    if page + 1 < page_count {
        nav.push(Button::new(
            tr(lang, MsgKey::NextPage),
            &MenuAction::OpenModelPicker {
                kind,
                page: page + 1,
            },
        ));
    }
    if !nav.is_empty() {
        keyboard = keyboard.row(nav);
    }
    keyboard = keyboard.row(vec![Button::new(tr(lang, MsgKey::Back), &MenuAction::OpenMain)]);

    MenuView { text, keyboard }
}

fn label_for(models: &[ModelInfo], id: &str) -> String {
    models
        .iter()
        .find(|model| model.id == id)
        .map(|model| model.label.clone())
        .unwrap_or_else(|| id.to_string())
}

fn options_for(field: SettingField) -> Vec<(&'static str, &'static str)> {
    match field {
        SettingField::SummaryLanguage => SummaryLanguage::ALL
            .iter()
            .map(|option| (option.label(), option.as_str()))
            .collect(),
        SettingField::Length => SummaryLength::ALL
            .iter()
            .map(|option| (option.label(), option.as_str()))
            .collect(),
        SettingField::Tone => Tone::ALL
            .iter()
            .map(|option| (option.label(), option.as_str()))
            .collect(),
        SettingField::Creativity => Creativity::ALL
            .iter()
            .map(|option| (option.label(), option.as_str()))
            .collect(),
        SettingField::UiLanguage => UiLanguage::ALL
            .iter()
            .map(|option| (option.label(), option.as_str()))
            .collect(),
        SettingField::Model | SettingField::AudioModel => Vec::new(),
    }
}
