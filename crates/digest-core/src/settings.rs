//! Per-user settings record and its enumerated option sets.
//!
//! Every enumerated field parses with a documented fallback default so a
//! stale or unknown stored value can never error the interactive flow.

use serde::{Deserialize, Serialize};

use crate::i18n::UiLanguage;

pub const DEFAULT_TEXT_MODEL: &str = "llama-3.3-70b-versatile";
pub const DEFAULT_AUDIO_MODEL: &str = "whisper-large-v3";

/// Summary tone. Short keys are what gets stored and what callback
/// payloads carry; `instruction` is the long form fed to the prompt.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Tone {
    Professional,
    Academic,
    Eli5,
    Friendly,
    Journalistic,
    Witty,
}

impl Tone {
    pub const ALL: [Tone; 6] = [
        Tone::Professional,
        Tone::Academic,
        Tone::Eli5,
        Tone::Friendly,
        Tone::Journalistic,
        Tone::Witty,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Tone::Professional => "Professional",
            Tone::Academic => "Academic",
            Tone::Eli5 => "ELI5",
            Tone::Friendly => "Friendly",
            Tone::Journalistic => "Journalistic",
            Tone::Witty => "Witty",
        }
    }

    /// Unknown values fall back to the default rather than erroring.
    pub fn parse(value: &str) -> Self {
        match value {
            "Academic" => Tone::Academic,
            "ELI5" => Tone::Eli5,
            "Friendly" => Tone::Friendly,
            "Journalistic" => Tone::Journalistic,
            "Witty" => Tone::Witty,
            _ => Tone::Professional,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Tone::Professional => "👔 Professional",
            Tone::Academic => "🎓 Academic",
            Tone::Eli5 => "🧸 ELI5 (Simple)",
            Tone::Friendly => "👋 Friendly",
            Tone::Journalistic => "📰 Journalistic",
            Tone::Witty => "😜 Witty",
        }
    }

    /// System-prompt instruction text for this tone.
    pub fn instruction(&self) -> &'static str {
        match self {
            Tone::Professional => "Professional, objective, and executive-style",
            Tone::Academic => "Academic, analytical, and formal",
            Tone::Eli5 => "Simple, easy-to-understand (Explain Like I'm 5)",
            Tone::Friendly => "Friendly, conversational, and warm",
            Tone::Journalistic => "Journalistic, factual, and headline-focused",
            Tone::Witty => "Witty, humorous, and engaging",
        }
    }
}

impl Default for Tone {
    fn default() -> Self {
        Tone::Professional
    }
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum SummaryLength {
    Short,
    Medium,
    Long,
}

impl SummaryLength {
    pub const ALL: [SummaryLength; 3] = [
        SummaryLength::Short,
        SummaryLength::Medium,
        SummaryLength::Long,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SummaryLength::Short => "Short",
            SummaryLength::Medium => "Medium",
            SummaryLength::Long => "Long",
        }
    }

    pub fn parse(value: &str) -> Self {
        match value {
            "Short" => SummaryLength::Short,
            "Long" => SummaryLength::Long,
            _ => SummaryLength::Medium,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SummaryLength::Short => "⚡ Short (Bullets)",
            SummaryLength::Medium => "📝 Medium (Balanced)",
            SummaryLength::Long => "📜 Long (Detailed)",
        }
    }
}

impl Default for SummaryLength {
    fn default() -> Self {
        SummaryLength::Medium
    }
}

/// Target language for the summary output. `Auto` keeps the input
/// language.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum SummaryLanguage {
    Auto,
    English,
    Persian,
    Spanish,
    French,
    German,
    Russian,
    Arabic,
    Turkish,
    Chinese,
}

impl SummaryLanguage {
    pub const ALL: [SummaryLanguage; 10] = [
        SummaryLanguage::Auto,
        SummaryLanguage::English,
        SummaryLanguage::Persian,
        SummaryLanguage::Spanish,
        SummaryLanguage::French,
        SummaryLanguage::German,
        SummaryLanguage::Russian,
        SummaryLanguage::Arabic,
        SummaryLanguage::Turkish,
        SummaryLanguage::Chinese,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SummaryLanguage::Auto => "Auto",
            SummaryLanguage::English => "English",
            SummaryLanguage::Persian => "Persian",
            SummaryLanguage::Spanish => "Spanish",
            SummaryLanguage::French => "French",
            SummaryLanguage::German => "German",
            SummaryLanguage::Russian => "Russian",
            SummaryLanguage::Arabic => "Arabic",
            SummaryLanguage::Turkish => "Turkish",
            SummaryLanguage::Chinese => "Chinese",
        }
    }

    pub fn parse(value: &str) -> Self {
        match value {
            "English" => SummaryLanguage::English,
            "Persian" => SummaryLanguage::Persian,
            "Spanish" => SummaryLanguage::Spanish,
            "French" => SummaryLanguage::French,
            "German" => SummaryLanguage::German,
            "Russian" => SummaryLanguage::Russian,
            "Arabic" => SummaryLanguage::Arabic,
            "Turkish" => SummaryLanguage::Turkish,
            "Chinese" => SummaryLanguage::Chinese,
            _ => SummaryLanguage::Auto,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SummaryLanguage::Auto => "🤖 Auto Detection",
            SummaryLanguage::English => "🇺🇸 English",
            SummaryLanguage::Persian => "🇮🇷 Persian (Farsi)",
            SummaryLanguage::Spanish => "🇪🇸 Spanish",
            SummaryLanguage::French => "🇫🇷 French",
            SummaryLanguage::German => "🇩🇪 German",
            SummaryLanguage::Russian => "🇷🇺 Russian",
            SummaryLanguage::Arabic => "🇸🇦 Arabic",
            SummaryLanguage::Turkish => "🇹🇷 Turkish",
            SummaryLanguage::Chinese => "🇨🇳 Chinese",
        }
    }
}

impl Default for SummaryLanguage {
    fn default() -> Self {
        SummaryLanguage::Auto
    }
}

/// Sampling temperature preset.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Creativity {
    Precise,
    Balanced,
    Creative,
}

impl Creativity {
    pub const ALL: [Creativity; 3] = [
        Creativity::Precise,
        Creativity::Balanced,
        Creativity::Creative,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Creativity::Precise => "Precise",
            Creativity::Balanced => "Balanced",
            Creativity::Creative => "Creative",
        }
    }

    pub fn parse(value: &str) -> Self {
        match value {
            "Precise" => Creativity::Precise,
            "Creative" => Creativity::Creative,
            _ => Creativity::Balanced,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Creativity::Precise => "🎯 Precise",
            Creativity::Balanced => "⚖️ Balanced",
            Creativity::Creative => "🎨 Creative",
        }
    }

    pub fn temperature(&self) -> f32 {
        match self {
            Creativity::Precise => 0.1,
            Creativity::Balanced => 0.5,
            Creativity::Creative => 0.8,
        }
    }
}

impl Default for Creativity {
    fn default() -> Self {
        Creativity::Balanced
    }
}

/// One row per user. Absent rows read as `Settings::default()`.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Settings {
    pub model: String,
    pub audio_model: String,
    pub summary_language: SummaryLanguage,
    pub length: SummaryLength,
    pub tone: Tone,
    pub creativity: Creativity,
    pub ui_language: UiLanguage,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            model: DEFAULT_TEXT_MODEL.to_string(),
            audio_model: DEFAULT_AUDIO_MODEL.to_string(),
            summary_language: SummaryLanguage::default(),
            length: SummaryLength::default(),
            tone: Tone::default(),
            creativity: Creativity::default(),
            ui_language: UiLanguage::default(),
        }
    }
}

impl Settings {
    /// Stored string for one field, used by the menu renderer and the
    /// settings store.
    pub fn value(&self, field: SettingField) -> String {
        match field {
            SettingField::Model => self.model.clone(),
            SettingField::AudioModel => self.audio_model.clone(),
            SettingField::SummaryLanguage => self.summary_language.as_str().to_string(),
            SettingField::Length => self.length.as_str().to_string(),
            SettingField::Tone => self.tone.as_str().to_string(),
            SettingField::Creativity => self.creativity.as_str().to_string(),
            SettingField::UiLanguage => self.ui_language.as_str().to_string(),
        }
    }

    pub fn set_value(&mut self, field: SettingField, value: &str) {
        match field {
            SettingField::Model => self.model = value.to_string(),
            SettingField::AudioModel => self.audio_model = value.to_string(),
            SettingField::SummaryLanguage => {
                self.summary_language = SummaryLanguage::parse(value)
            }
            SettingField::Length => self.length = SummaryLength::parse(value),
            SettingField::Tone => self.tone = Tone::parse(value),
            SettingField::Creativity => self.creativity = Creativity::parse(value),
            SettingField::UiLanguage => self.ui_language = UiLanguage::parse(value),
        }
    }
}

/// Identifies one column of the settings row.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SettingField {
    Model,
    AudioModel,
    SummaryLanguage,
    Length,
    Tone,
    Creativity,
    UiLanguage,
}

impl SettingField {
    pub fn column(&self) -> &'static str {
        match self {
            SettingField::Model => "model",
            SettingField::AudioModel => "audio_model",
            SettingField::SummaryLanguage => "summary_language",
            SettingField::Length => "length",
            SettingField::Tone => "tone",
            SettingField::Creativity => "creativity",
            SettingField::UiLanguage => "ui_language",
        }
    }

    pub fn from_column(column: &str) -> Option<Self> {
        match column {
            "model" => Some(SettingField::Model),
            "audio_model" => Some(SettingField::AudioModel),
            "summary_language" => Some(SettingField::SummaryLanguage),
            "length" => Some(SettingField::Length),
            "tone" => Some(SettingField::Tone),
            "creativity" => Some(SettingField::Creativity),
            "ui_language" => Some(SettingField::UiLanguage),
            _ => None,
        }
    }
}

/// Which model catalog a picker browses.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum ModelKind {
    Text,
    Audio,
}

impl ModelKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ModelKind::Text => "text",
            ModelKind::Audio => "audio",
        }
    }

    pub fn from_str(value: &str) -> Option<Self> {
        match value {
            "text" => Some(ModelKind::Text),
            "audio" => Some(ModelKind::Audio),
            _ => None,
        }
    }

    pub fn field(&self) -> SettingField {
        match self {
            ModelKind::Text => SettingField::Model,
            ModelKind::Audio => SettingField::AudioModel,
        }
    }
}

/// A selectable model: display label plus provider id.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct ModelInfo {
    pub label: String,
    pub id: String,
}

impl ModelInfo {
    pub fn new(label: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            id: id.into(),
        }
    }
}

/// Static text-model catalog used when the live list cannot be fetched.
pub fn fallback_text_models() -> Vec<ModelInfo> {
    vec![
        ModelInfo::new("Llama 3.3 70B", "llama-3.3-70b-versatile"),
        ModelInfo::new("Llama 3.1 8B", "llama-3.1-8b-instant"),
        ModelInfo::new("Llama 3 70B", "llama3-70b-8192"),
        ModelInfo::new("Llama 3 8B", "llama3-8b-8192"),
        ModelInfo::new("Mixtral 8x7B", "mixtral-8x7b-32768"),
        ModelInfo::new("Gemma 2 9B", "gemma2-9b-it"),
        ModelInfo::new("DeepSeek R1 Distill 70B", "deepseek-r1-distill-llama-70b"),
        ModelInfo::new("Qwen 2.5 32B", "qwen-2.5-32b"),
        ModelInfo::new("Llama 3.2 90B Vision", "llama-3.2-90b-vision-preview"),
    ]
}

/// Static audio-model catalog used when the live list cannot be fetched.
pub fn fallback_audio_models() -> Vec<ModelInfo> {
    vec![
        ModelInfo::new("Whisper Large V3", "whisper-large-v3"),
        ModelInfo::new("Whisper Large V3 Turbo", "whisper-large-v3-turbo"),
        ModelInfo::new("Distil-Whisper English", "distil-whisper-large-v3-en"),
    ]
}
