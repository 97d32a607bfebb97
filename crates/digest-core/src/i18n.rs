//! UI string catalog.
//!
//! Every user-visible message goes through [`tr`] so the interface can
//! run in English or Farsi. Keys are a closed enum, not free-form
//! strings, so a missing translation is a compile error rather than a
//! silent fallback.

use serde::{Deserialize, Serialize};

/// Interface language of the bot itself (not the summary output).
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum UiLanguage {
    En,
    Fa,
}

impl UiLanguage {
    pub const ALL: [UiLanguage; 2] = [UiLanguage::En, UiLanguage::Fa];

    pub fn as_str(&self) -> &'static str {
        match self {
            UiLanguage::En => "en",
            UiLanguage::Fa => "fa",
        }
    }

    pub fn parse(value: &str) -> Self {
        match value {
            "fa" => UiLanguage::Fa,
            _ => UiLanguage::En,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            UiLanguage::En => "🇺🇸 English",
            UiLanguage::Fa => "🇮🇷 فارسی",
        }
    }
}

impl Default for UiLanguage {
    fn default() -> Self {
        UiLanguage::En
    }
}

/// Keys for every translated UI string.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MsgKey {
    WelcomeFirstRun,
    MainMenu,
    Processing,
    Downloading,
    Extracting,
    Transcribing,
    SummaryHeader,
    ErrorGeneric,
    ErrorFile,
    ErrorFormat,
    ErrorApi,
    SettingsTitle,
    BtnSettings,
    BtnHelp,
    BtnAbout,
    HelpText,
    AboutText,
    SelectModel,
    SelectAudioModel,
    SelectLanguage,
    SelectLength,
    SelectTone,
    SelectCreativity,
    SelectInterface,
    ChooseValue,
    Back,
    Close,
    Redo,
    ResetDefaults,
    ToastReset,
    ToastCleared,
    NextPage,
    PrevPage,
}

/// Look up a translated string. Farsi falls back to English only where
/// a string is intentionally shared (none currently).
pub fn tr(lang: UiLanguage, key: MsgKey) -> &'static str {
    match lang {
        UiLanguage::En => english(key),
        UiLanguage::Fa => farsi(key),
    }
}

fn english(key: MsgKey) -> &'static str {
    match key {
        MsgKey::WelcomeFirstRun => {
            "👋 <b>Welcome to AI Summarizer!</b>\n\nI can summarize text and documents for you.\n<i>To get started, please select your language:</i>"
        }
        MsgKey::MainMenu => {
            "🤖 <b>AI Summarizer Assistant</b>\n\nI am ready to turn your content into clear, concise insights.\n\n<b>👇 Send me any of the following:</b>\n📝 <b>Text:</b> Paste articles or long messages.\n📄 <b>Files:</b> Upload text or PDF documents.\n🎙 <b>Audio:</b> Send a voice note or audio file.\n🖼 <b>Photos:</b> Send an image to analyze.\n\n<i>Select an option below to configure the bot:</i>"
        }
        MsgKey::Processing => {
            "⏳ <b>Processing...</b>\n<i>The AI is analyzing your content...</i>"
        }
        MsgKey::Downloading => "📥 <b>Downloading file...</b>",
        MsgKey::Extracting => {
            "📄 <b>Reading Document...</b>\n<i>Extracting text from the file.</i>"
        }
        MsgKey::Transcribing => {
            "🎙 <b>Transcribing Audio...</b>\n<i>Converting speech to text.</i>"
        }
        MsgKey::SummaryHeader => "📝 <b>Summary Result:</b>",
        MsgKey::ErrorGeneric => {
            "❌ <b>An error occurred.</b>\nPlease try again later or contact support."
        }
        MsgKey::ErrorFile => {
            "❌ <b>File Error.</b>\nThe file is empty or could not be read."
        }
        MsgKey::ErrorFormat => {
            "❌ <b>Unsupported Format.</b>\nI can read plain-text and PDF documents, voice notes and common audio files."
        }
        MsgKey::ErrorApi => {
            "❌ <b>API Error.</b>\nCould not reach the AI service. Please try again later."
        }
        MsgKey::SettingsTitle => "Configuration Dashboard",
        MsgKey::BtnSettings => "⚙️ Settings",
        MsgKey::BtnHelp => "❓ User Guide",
        MsgKey::BtnAbout => "ℹ️ About",
        MsgKey::HelpText => {
            "❓ <b>User Guide</b>\n\nSend me text, a document (txt or PDF), a voice note or a photo and I will summarize or describe it.\nUse /settings to pick the model, tone, length and output language.\nUse /clear to forget the conversation so far.\nUse the 🔄 button under a summary to regenerate it."
        }
        MsgKey::AboutText => {
            "ℹ️ <b>About</b>\n\nA summarization assistant built on hosted language models.\nYour settings are stored per user; conversations can be cleared at any time."
        }
        MsgKey::SelectModel => "🧠 Text Model",
        MsgKey::SelectAudioModel => "🎙 Audio Model",
        MsgKey::SelectLanguage => "🗣 Summary Language",
        MsgKey::SelectLength => "📏 Length",
        MsgKey::SelectTone => "🎭 Tone",
        MsgKey::SelectCreativity => "🎨 Creativity",
        MsgKey::SelectInterface => "🌐 Bot Language",
        MsgKey::ChooseValue => "Choose a value",
        MsgKey::Back => "🔙 Back",
        MsgKey::Close => "🔙 Back to Main Menu",
        MsgKey::Redo => "🔄 Regenerate",
        MsgKey::ResetDefaults => "🔄 Reset Defaults",
        MsgKey::ToastReset => "✅ Settings have been reset to default.",
        MsgKey::ToastCleared => "🗑 Conversation history cleared.",
        MsgKey::NextPage => "Next ➡️",
        MsgKey::PrevPage => "⬅️ Prev",
    }
}

fn farsi(key: MsgKey) -> &'static str {
    match key {
        MsgKey::WelcomeFirstRun => {
            "👋 <b>به خلاصه‌ساز هوشمند خوش آمدید!</b>\n\nمن می‌توانم متن و اسناد شما را خلاصه کنم.\n<i>برای شروع، لطفاً زبان خود را انتخاب کنید:</i>"
        }
        MsgKey::MainMenu => {
            "🤖 <b>دستیار خلاصه‌ساز</b>\n\nآماده‌ام محتوای شما را به نکات روشن و کوتاه تبدیل کنم.\n\n<b>👇 یکی از موارد زیر را بفرستید:</b>\n📝 <b>متن:</b> مقاله یا پیام طولانی.\n📄 <b>فایل:</b> سند متنی یا PDF.\n🎙 <b>صوت:</b> پیام صوتی یا فایل صوتی.\n🖼 <b>عکس:</b> تصویر برای تحلیل.\n\n<i>برای تنظیمات یکی از گزینه‌های زیر را انتخاب کنید:</i>"
        }
        MsgKey::Processing => {
            "⏳ <b>در حال پردازش...</b>\n<i>هوش مصنوعی در حال تحلیل محتوای شماست...</i>"
        }
        MsgKey::Downloading => "📥 <b>در حال دریافت فایل...</b>",
        MsgKey::Extracting => {
            "📄 <b>در حال خواندن سند...</b>\n<i>استخراج متن از فایل.</i>"
        }
        MsgKey::Transcribing => {
            "🎙 <b>در حال تبدیل صوت...</b>\n<i>تبدیل گفتار به متن.</i>"
        }
        MsgKey::SummaryHeader => "📝 <b>نتیجه خلاصه:</b>",
        MsgKey::ErrorGeneric => {
            "❌ <b>خطایی رخ داد.</b>\nلطفاً بعداً دوباره تلاش کنید."
        }
        MsgKey::ErrorFile => {
            "❌ <b>خطای فایل.</b>\nفایل خالی است یا قابل خواندن نیست."
        }
        MsgKey::ErrorFormat => {
            "❌ <b>قالب پشتیبانی نمی‌شود.</b>\nاسناد متنی و PDF، پیام صوتی و فایل‌های صوتی رایج قابل خواندن هستند."
        }
        MsgKey::ErrorApi => {
            "❌ <b>خطای سرویس.</b>\nدسترسی به سرویس هوش مصنوعی ممکن نشد. بعداً تلاش کنید."
        }
        MsgKey::SettingsTitle => "داشبورد تنظیمات",
        MsgKey::BtnSettings => "⚙️ تنظیمات",
        MsgKey::BtnHelp => "❓ راهنما",
        MsgKey::BtnAbout => "ℹ️ درباره",
        MsgKey::HelpText => {
            "❓ <b>راهنما</b>\n\nمتن، سند (متنی یا PDF)، پیام صوتی یا عکس بفرستید تا خلاصه یا توصیف کنم.\nبا /settings مدل، لحن، طول و زبان خروجی را انتخاب کنید.\nبا /clear گفتگوی تاکنون فراموش می‌شود.\nبا دکمه 🔄 زیر هر خلاصه می‌توانید دوباره تولید کنید."
        }
        MsgKey::AboutText => {
            "ℹ️ <b>درباره</b>\n\nدستیار خلاصه‌سازی بر پایه مدل‌های زبانی میزبانی‌شده.\nتنظیمات برای هر کاربر ذخیره می‌شود و گفتگوها هر زمان قابل پاک‌کردن هستند."
        }
        MsgKey::SelectModel => "🧠 مدل متنی",
        MsgKey::SelectAudioModel => "🎙 مدل صوتی",
        MsgKey::SelectLanguage => "🗣 زبان خلاصه",
        MsgKey::SelectLength => "📏 طول",
        MsgKey::SelectTone => "🎭 لحن",
        MsgKey::SelectCreativity => "🎨 خلاقیت",
        MsgKey::SelectInterface => "🌐 زبان ربات",
        MsgKey::ChooseValue => "یک گزینه انتخاب کنید",
        MsgKey::Back => "🔙 بازگشت",
        MsgKey::Close => "🔙 بازگشت به منوی اصلی",
        MsgKey::Redo => "🔄 تولید دوباره",
        MsgKey::ResetDefaults => "🔄 بازنشانی پیش‌فرض",
        MsgKey::ToastReset => "✅ تنظیمات به حالت پیش‌فرض بازگشت.",
        MsgKey::ToastCleared => "🗑 تاریخچه گفتگو پاک شد.",
        MsgKey::NextPage => "بعدی ➡️",
        MsgKey::PrevPage => "⬅️ قبلی",
    }
}
