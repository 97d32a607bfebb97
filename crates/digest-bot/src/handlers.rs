//! Update routing and conversation flows.

use std::path::PathBuf;
use std::sync::Arc;

use base64::Engine as _;
use dashmap::DashMap;

use digest_core::{
    build_prompt, tr, ContentPart, MsgKey, SettingField, Settings, Turn, TurnContent, UiLanguage,
};
use digest_dispatch::{
    deliver, render_dashboard, render_picker, render_submenu, transition, Button, Keyboard,
    MenuAction, MenuEffect, MenuState, MenuView, MessageRef,
};
use digest_llm::{
    Completer, CompletionRequest, ContentCache, ModelCatalog, OpenAiCompatProvider,
    TranscriptionProvider, TranscriptionRequest,
};
use digest_store::{SessionStore, SqliteStore};

use crate::telegram::{
    Audio, CallbackQuery, Document, Message, PhotoSize, TelegramApi, Update, Voice,
};

// Callback payloads outside the settings menu.
const CB_START: &str = "start";
const CB_HELP: &str = "help";
const CB_ABOUT: &str = "about";

/// Instruction sent with a photo that has no caption.
const IMAGE_INSTRUCTION: &str = "Describe the key content of this image in detail.";

const AUDIO_EXTENSIONS: [&str; 8] = ["mp3", "m4a", "wav", "ogg", "oga", "opus", "flac", "webm"];

pub struct App {
    pub api: TelegramApi,
    store: SessionStore<SqliteStore>,
    completer: Completer<OpenAiCompatProvider>,
    catalog: ModelCatalog<OpenAiCompatProvider>,
    provider: Arc<OpenAiCompatProvider>,
    analysis_cache: Arc<ContentCache>,
    upload_dir: PathBuf,
    menu_states: DashMap<i64, MenuState>,
    last_inputs: DashMap<i64, String>,
}

impl App {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        api: TelegramApi,
        store: SessionStore<SqliteStore>,
        completer: Completer<OpenAiCompatProvider>,
        catalog: ModelCatalog<OpenAiCompatProvider>,
        provider: Arc<OpenAiCompatProvider>,
        analysis_cache: Arc<ContentCache>,
        upload_dir: PathBuf,
    ) -> Self {
        Self {
            api,
            store,
            completer,
            catalog,
            provider,
            analysis_cache,
            upload_dir,
            menu_states: DashMap::new(),
            last_inputs: DashMap::new(),
        }
    }

    pub async fn handle_update(&self, update: Update) {
        if let Some(message) = update.message {
            self.handle_message(message).await;
        } else if let Some(query) = update.callback_query {
            self.handle_callback(query).await;
        }
    }

    async fn handle_message(&self, message: Message) {
        let chat_id = message.chat.id;
        let user_id = message.from.as_ref().map(|user| user.id).unwrap_or(chat_id);

        if let Some(document) = message.document {
            self.handle_document(chat_id, user_id, document).await;
            return;
        }
        if let Some(voice) = message.voice {
            self.handle_voice(chat_id, user_id, voice).await;
            return;
        }
        if let Some(audio) = message.audio {
            self.handle_audio(chat_id, user_id, audio).await;
            return;
        }
        if let Some(photos) = message.photo {
            self.handle_photo(chat_id, user_id, photos, message.caption).await;
            return;
        }

        let Some(text) = message.text else { return };
        let text = text.trim();
        if text.is_empty() {
            return;
        }

        let settings = self.store.settings(user_id).await;
        let lang = settings.ui_language;

        match command_for(text) {
            Some(Command::Start) => self.show_start(chat_id, user_id, lang).await,
            Some(Command::Settings) => {
                self.menu_states.insert(chat_id, MenuState::MainMenu);
                let view = self.render_state(&MenuState::MainMenu, &settings).await;
                if let Some(view) = view {
                    self.send_logged(chat_id, &view.text, Some(&view.keyboard)).await;
                }
            }
            Some(Command::Help) => {
                self.send_logged(chat_id, tr(lang, MsgKey::HelpText), None).await;
            }
            Some(Command::About) => {
                self.send_logged(chat_id, tr(lang, MsgKey::AboutText), None).await;
            }
            Some(Command::Clear) => {
                self.store.clear_conversation(&chat_id.to_string()).await;
                self.last_inputs.remove(&chat_id);
                self.send_logged(chat_id, tr(lang, MsgKey::ToastCleared), None).await;
            }
            None => self.summarize(chat_id, user_id, text, None).await,
        }
    }

    /// First contact shows a language picker; returning users get the
    /// main menu in their stored language.
    async fn show_start(&self, chat_id: i64, user_id: i64, lang: UiLanguage) {
        if !self.store.user_exists(user_id).await {
            let buttons = UiLanguage::ALL
                .iter()
                .map(|option| {
                    Button::new(
                        option.label(),
                        &MenuAction::SetOption {
                            field: SettingField::UiLanguage,
                            value: option.as_str().to_string(),
                        },
                    )
                })
                .collect();
            let keyboard = Keyboard::new().row(buttons);
            self.send_logged(
                chat_id,
                tr(UiLanguage::En, MsgKey::WelcomeFirstRun),
                Some(&keyboard),
            )
            .await;
            return;
        }

        self.send_logged(chat_id, tr(lang, MsgKey::MainMenu), Some(&main_keyboard(lang)))
            .await;
    }

    async fn handle_callback(&self, query: CallbackQuery) {
        let user_id = query.from.id;
        let chat_id = query
            .message
            .as_ref()
            .map(|message| message.chat.id)
            .unwrap_or(user_id);
        let message_id = query.message.as_ref().map(|message| message.message_id);

        let Some(data) = query.data.clone() else {
            self.answer_logged(&query.id, None).await;
            return;
        };

        let settings = self.store.settings(user_id).await;
        let lang = settings.ui_language;

        match data.as_str() {
            CB_START => {
                self.menu_states.insert(chat_id, MenuState::Closed);
                self.show(chat_id, message_id, tr(lang, MsgKey::MainMenu), &main_keyboard(lang))
                    .await;
                self.answer_logged(&query.id, None).await;
                return;
            }
            CB_HELP | CB_ABOUT => {
                let key = if data == CB_HELP {
                    MsgKey::HelpText
                } else {
                    MsgKey::AboutText
                };
                let keyboard =
                    Keyboard::new().row(vec![Button { label: tr(lang, MsgKey::Back).to_string(), data: CB_START.to_string() }]);
                self.show(chat_id, message_id, tr(lang, key), &keyboard).await;
                self.answer_logged(&query.id, None).await;
                return;
            }
            _ => {}
        }

        let Some(action) = MenuAction::parse(&data) else {
            // Stale or foreign payload; just stop the spinner.
            log::debug!("ignoring unparseable callback payload: {data}");
            self.answer_logged(&query.id, None).await;
            return;
        };

        if action == MenuAction::Redo {
            let last = self.last_inputs.get(&chat_id).map(|entry| entry.value().clone());
            match last {
                Some(input) => {
                    self.answer_logged(&query.id, None).await;
                    self.summarize(chat_id, user_id, &input, None).await;
                }
                None => {
                    self.answer_logged(&query.id, Some(tr(lang, MsgKey::ErrorGeneric)))
                        .await;
                }
            }
            return;
        }

        let first_menu_touch = !self.menu_states.contains_key(&chat_id);
        let state = self
            .menu_states
            .get(&chat_id)
            .map(|entry| entry.value().clone())
            .unwrap_or(MenuState::MainMenu);
        let (next, effect) = transition(&state, &action);

        let mut toast = None;
        match &effect {
            MenuEffect::Write { field, value } => {
                self.store.update_setting(user_id, *field, value).await;
            }
            MenuEffect::Reset => {
                self.store.reset_settings(user_id).await;
            }
            MenuEffect::None => {}
        }

        // Re-read after writes so the re-render reflects what was stored.
        let settings = self.store.settings(user_id).await;
        let lang = settings.ui_language;
        if effect == MenuEffect::Reset {
            toast = Some(tr(lang, MsgKey::ToastReset));
        }

        // A first-run language pick jumps straight to the main menu
        // instead of the language submenu.
        let first_run_pick = first_menu_touch
            && matches!(
                action,
                MenuAction::SetOption {
                    field: SettingField::UiLanguage,
                    ..
                }
            );

        if first_run_pick || next == MenuState::Closed {
            self.menu_states.insert(chat_id, MenuState::Closed);
            self.show(chat_id, message_id, tr(lang, MsgKey::MainMenu), &main_keyboard(lang))
                .await;
            self.answer_logged(&query.id, toast).await;
            return;
        }

        self.menu_states.insert(chat_id, next.clone());
        if let Some(view) = self.render_state(&next, &settings).await {
            self.show(chat_id, message_id, &view.text, &view.keyboard).await;
        }
        self.answer_logged(&query.id, toast).await;
    }

    async fn render_state(&self, state: &MenuState, settings: &Settings) -> Option<MenuView> {
        match state {
            MenuState::MainMenu => {
                let catalog = self.catalog.catalog().await;
                Some(render_dashboard(settings, &catalog.text, &catalog.audio))
            }
            MenuState::Submenu(field) => Some(render_submenu(*field, settings)),
            MenuState::ModelPicker { kind, page } => {
                let catalog = self.catalog.catalog().await;
                Some(render_picker(*kind, *page, catalog.models(*kind), settings))
            }
            MenuState::Closed => None,
        }
    }

    /// Run one summarization round: placeholder, prompt from stored
    /// history plus the new input, completion, persistence, delivery.
    async fn summarize(
        &self,
        chat_id: i64,
        user_id: i64,
        input: &str,
        placeholder: Option<MessageRef>,
    ) {
        let settings = self.store.settings(user_id).await;
        let lang = settings.ui_language;

        let placeholder = match placeholder {
            Some(message) => Some(message),
            None => self
                .api
                .send_message(chat_id, tr(lang, MsgKey::Processing), None)
                .await
                .map_err(|error| log::warn!("placeholder send failed for chat {chat_id}: {error}"))
                .ok()
                .map(MessageRef),
        };

        let conversation_id = chat_id.to_string();
        let history = self.store.conversation(&conversation_id).await;
        let content = TurnContent::text(format!("Text to summarize:\n{input}"));
        let prompt = build_prompt(&settings, &history, content.clone());
        let request = CompletionRequest::from_prompt(
            prompt,
            settings.model.clone(),
            settings.creativity.temperature(),
        );

        let summary = self.completer.complete_or_fallback(&request, lang).await;

        // Failed rounds are not part of the replayable history.
        if summary != tr(lang, MsgKey::ErrorApi) {
            self.store.append_turn(&conversation_id, Turn::user(content)).await;
            self.store
                .append_turn(&conversation_id, Turn::assistant(summary.clone()))
                .await;
        }
        self.last_inputs.insert(chat_id, input.to_string());

        let text = format!("{}\n\n{}", tr(lang, MsgKey::SummaryHeader), summary);
        let controls =
            Keyboard::new().row(vec![Button::new(tr(lang, MsgKey::Redo), &MenuAction::Redo)]);
        if let Err(error) = deliver(&self.api, chat_id, placeholder, &text, Some(&controls)).await {
            log::error!("delivery failed for chat {chat_id}: {error}");
        }
    }

    async fn handle_document(&self, chat_id: i64, user_id: i64, document: Document) {
        let settings = self.store.settings(user_id).await;
        let lang = settings.ui_language;

        let placeholder = self.placeholder(chat_id, tr(lang, MsgKey::Downloading)).await;

        let Some(kind) = document_kind(&document) else {
            self.show_or_send(chat_id, placeholder, tr(lang, MsgKey::ErrorFormat)).await;
            return;
        };

        let bytes = match self.api.download_file(&document.file_id).await {
            Ok(bytes) => bytes,
            Err(error) => {
                log::error!("file download failed for chat {chat_id}: {error}");
                self.show_or_send(chat_id, placeholder, tr(lang, MsgKey::ErrorFile)).await;
                return;
            }
        };
        if bytes.is_empty() {
            self.show_or_send(chat_id, placeholder, tr(lang, MsgKey::ErrorFile)).await;
            return;
        }

        self.archive_upload(document.file_name.as_deref().unwrap_or("upload.txt"), &bytes)
            .await;
        self.progress(chat_id, placeholder, tr(lang, MsgKey::Extracting)).await;

        let text = match kind {
            DocumentKind::PlainText => match String::from_utf8(bytes) {
                Ok(text) => text,
                Err(_) => {
                    self.show_or_send(chat_id, placeholder, tr(lang, MsgKey::ErrorFile)).await;
                    return;
                }
            },
            DocumentKind::Pdf => match extract_pdf_text(bytes).await {
                Ok(text) => text,
                Err(error) => {
                    log::error!("pdf extraction failed for chat {chat_id}: {error}");
                    self.show_or_send(chat_id, placeholder, tr(lang, MsgKey::ErrorFile)).await;
                    return;
                }
            },
        };

        if text.trim().is_empty() {
            self.show_or_send(chat_id, placeholder, tr(lang, MsgKey::ErrorFile)).await;
            return;
        }
        self.summarize(chat_id, user_id, text.trim(), placeholder).await;
    }

    async fn handle_voice(&self, chat_id: i64, user_id: i64, voice: Voice) {
        // Telegram voice notes are always opus-in-ogg.
        let file_name = match voice.mime_type.as_deref() {
            Some("audio/mpeg") => "voice.mp3",
            _ => "voice.ogg",
        };
        self.transcribe_and_summarize(chat_id, user_id, &voice.file_id, file_name.to_string())
            .await;
    }

    async fn handle_audio(&self, chat_id: i64, user_id: i64, audio: Audio) {
        if !is_supported_audio(audio.file_name.as_deref(), audio.mime_type.as_deref()) {
            let settings = self.store.settings(user_id).await;
            self.send_logged(chat_id, tr(settings.ui_language, MsgKey::ErrorFormat), None)
                .await;
            return;
        }
        let file_name = audio.file_name.unwrap_or_else(|| "audio.mp3".to_string());
        self.transcribe_and_summarize(chat_id, user_id, &audio.file_id, file_name).await;
    }

    /// Shared tail of the voice/audio flows: download, transcribe with
    /// the user's audio model, then feed the transcript into the
    /// ordinary summarize round.
    async fn transcribe_and_summarize(
        &self,
        chat_id: i64,
        user_id: i64,
        file_id: &str,
        file_name: String,
    ) {
        let settings = self.store.settings(user_id).await;
        let lang = settings.ui_language;

        let placeholder = self.placeholder(chat_id, tr(lang, MsgKey::Downloading)).await;

        let bytes = match self.api.download_file(file_id).await {
            Ok(bytes) if !bytes.is_empty() => bytes,
            Ok(_) => {
                self.show_or_send(chat_id, placeholder, tr(lang, MsgKey::ErrorFile)).await;
                return;
            }
            Err(error) => {
                log::error!("audio download failed for chat {chat_id}: {error}");
                self.show_or_send(chat_id, placeholder, tr(lang, MsgKey::ErrorFile)).await;
                return;
            }
        };

        self.archive_upload(&file_name, &bytes).await;
        self.progress(chat_id, placeholder, tr(lang, MsgKey::Transcribing)).await;

        let request = TranscriptionRequest {
            model: settings.audio_model.clone(),
            file_name,
            bytes,
        };
        match self.provider.transcribe(&request).await {
            Ok(transcript) => {
                self.summarize(chat_id, user_id, transcript.trim(), placeholder).await;
            }
            Err(error) => {
                log::error!("transcription failed for chat {chat_id}: {error}");
                self.show_or_send(chat_id, placeholder, tr(lang, MsgKey::ErrorApi)).await;
            }
        }
    }

    /// Photo flow: describe the image once, remember the analysis on
    /// the stored turn so replays never re-send raw bytes, and reuse a
    /// cached analysis when the same image comes back.
    async fn handle_photo(
        &self,
        chat_id: i64,
        user_id: i64,
        photos: Vec<PhotoSize>,
        caption: Option<String>,
    ) {
        let settings = self.store.settings(user_id).await;
        let lang = settings.ui_language;

        // Largest rendition is listed last.
        let Some(photo) = photos.last() else { return };

        let placeholder = self.placeholder(chat_id, tr(lang, MsgKey::Processing)).await;

        let bytes = match self.api.download_file(&photo.file_id).await {
            Ok(bytes) if !bytes.is_empty() => bytes,
            Ok(_) => {
                self.show_or_send(chat_id, placeholder, tr(lang, MsgKey::ErrorFile)).await;
                return;
            }
            Err(error) => {
                log::error!("photo download failed for chat {chat_id}: {error}");
                self.show_or_send(chat_id, placeholder, tr(lang, MsgKey::ErrorFile)).await;
                return;
            }
        };

        let key = ContentCache::key_for(&bytes);
        let instruction = caption
            .filter(|caption| !caption.trim().is_empty())
            .unwrap_or_else(|| IMAGE_INSTRUCTION.to_string());
        let content = TurnContent {
            parts: vec![
                ContentPart::text(instruction),
                ContentPart::image_base64(
                    base64::engine::general_purpose::STANDARD.encode(&bytes),
                    "image/jpeg",
                ),
            ],
        };

        let conversation_id = chat_id.to_string();
        let analysis = match self.analysis_cache.get(&key) {
            Some(hit) => {
                log::debug!("analysis cache hit for chat {chat_id}");
                hit
            }
            None => {
                let history = self.store.conversation(&conversation_id).await;
                let prompt = build_prompt(&settings, &history, content.clone());
                let request = CompletionRequest::from_prompt(
                    prompt,
                    settings.model.clone(),
                    settings.creativity.temperature(),
                );
                self.completer.complete_or_fallback(&request, lang).await
            }
        };

        if analysis != tr(lang, MsgKey::ErrorApi) {
            self.analysis_cache.insert(key, analysis.clone());
            self.store.append_turn(&conversation_id, Turn::user(content)).await;
            self.store
                .append_turn(&conversation_id, Turn::assistant(analysis.clone()))
                .await;
            self.store.set_last_analysis(&conversation_id, &analysis).await;
        }

        if let Err(error) = deliver(&self.api, chat_id, placeholder, &analysis, None).await {
            log::error!("delivery failed for chat {chat_id}: {error}");
        }
    }

    /// Keep a copy of every received file under a collision-free name.
    /// Failures are logged, not surfaced.
    async fn archive_upload(&self, original: &str, bytes: &[u8]) {
        let path = self
            .upload_dir
            .join(format!("{}-{original}", uuid::Uuid::new_v4()));
        if let Err(error) = tokio::fs::write(&path, bytes).await {
            log::warn!("upload archive failed for {}: {error}", path.display());
        }
    }

    async fn placeholder(&self, chat_id: i64, text: &str) -> Option<MessageRef> {
        self.api
            .send_message(chat_id, text, None)
            .await
            .map_err(|error| log::warn!("placeholder send failed for chat {chat_id}: {error}"))
            .ok()
            .map(MessageRef)
    }

    async fn progress(&self, chat_id: i64, placeholder: Option<MessageRef>, text: &str) {
        if let Some(message) = placeholder {
            if let Err(error) = self.api.edit_message_text(chat_id, message.0, text, None).await {
                log::warn!("progress edit failed for chat {chat_id}: {error}");
            }
        }
    }

    async fn show(&self, chat_id: i64, message_id: Option<i64>, text: &str, keyboard: &Keyboard) {
        if let Some(message_id) = message_id {
            match self
                .api
                .edit_message_text(chat_id, message_id, text, Some(keyboard))
                .await
            {
                Ok(()) => return,
                Err(error) => {
                    log::warn!("menu edit failed for chat {chat_id}, sending fresh: {error}")
                }
            }
        }
        self.send_logged(chat_id, text, Some(keyboard)).await;
    }

    async fn show_or_send(&self, chat_id: i64, placeholder: Option<MessageRef>, text: &str) {
        if let Some(message) = placeholder {
            if self
                .api
                .edit_message_text(chat_id, message.0, text, None)
                .await
                .is_ok()
            {
                return;
            }
        }
        self.send_logged(chat_id, text, None).await;
    }

    async fn send_logged(&self, chat_id: i64, text: &str, keyboard: Option<&Keyboard>) {
        if let Err(error) = self.api.send_message(chat_id, text, keyboard).await {
            log::error!("send failed for chat {chat_id}: {error}");
        }
    }

    async fn answer_logged(&self, query_id: &str, text: Option<&str>) {
        if let Err(error) = self.api.answer_callback(query_id, text).await {
            log::warn!("callback answer failed: {error}");
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Command {
    Start,
    Settings,
    Help,
    About,
    Clear,
}

/// Slash commands plus the menu-button labels in every interface
/// language, so tapping a labeled button works like its command.
fn command_for(text: &str) -> Option<Command> {
    match text {
        "/start" => return Some(Command::Start),
        "/settings" => return Some(Command::Settings),
        "/help" => return Some(Command::Help),
        "/about" => return Some(Command::About),
        "/clear" => return Some(Command::Clear),
        _ => {}
    }

    for lang in UiLanguage::ALL {
        if text == tr(lang, MsgKey::BtnSettings) {
            return Some(Command::Settings);
        }
        if text == tr(lang, MsgKey::BtnHelp) {
            return Some(Command::Help);
        }
        if text == tr(lang, MsgKey::BtnAbout) {
            return Some(Command::About);
        }
    }
    None
}

fn main_keyboard(lang: UiLanguage) -> Keyboard {
    Keyboard::new()
        .row(vec![Button::new(
            tr(lang, MsgKey::BtnSettings),
            &MenuAction::OpenMain,
        )])
        .row(vec![
            Button {
                label: tr(lang, MsgKey::BtnHelp).to_string(),
                data: CB_HELP.to_string(),
            },
            Button {
                label: tr(lang, MsgKey::BtnAbout).to_string(),
                data: CB_ABOUT.to_string(),
            },
        ])
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum DocumentKind {
    PlainText,
    Pdf,
}

fn document_kind(document: &Document) -> Option<DocumentKind> {
    match document.mime_type.as_deref() {
        Some("text/plain") => return Some(DocumentKind::PlainText),
        Some("application/pdf") => return Some(DocumentKind::Pdf),
        _ => {}
    }

    let name = document.file_name.as_deref()?.to_lowercase();
    if name.ends_with(".txt") {
        Some(DocumentKind::PlainText)
    } else if name.ends_with(".pdf") {
        Some(DocumentKind::Pdf)
    } else {
        None
    }
}

fn is_supported_audio(file_name: Option<&str>, mime_type: Option<&str>) -> bool {
    if let Some(mime) = mime_type {
        if mime.starts_with("audio/") {
            return true;
        }
    }
    file_name
        .and_then(|name| name.rsplit_once('.').map(|(_, ext)| ext.to_lowercase()))
        .map(|ext| AUDIO_EXTENSIONS.contains(&ext.as_str()))
        .unwrap_or(false)
}

/// PDF text extraction is CPU-bound, so it runs off the async runtime.
async fn extract_pdf_text(bytes: Vec<u8>) -> anyhow::Result<String> {
    tokio::task::spawn_blocking(move || {
        pdf_extract::extract_text_from_mem(&bytes)
            .map_err(|error| anyhow::anyhow!("pdf parse error: {error}"))
    })
    .await?
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use serde_json::json;
    use tempfile::tempdir;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use digest_store::{ConversationStore, SqliteStore};

    use crate::telegram::{Chat, User};

    use super::*;

    fn document(name: Option<&str>, mime: Option<&str>) -> Document {
        Document {
            file_id: "f1".to_string(),
            file_name: name.map(str::to_string),
            mime_type: mime.map(str::to_string),
        }
    }

    #[test]
    fn commands_and_button_labels_resolve_alike() {
        assert_eq!(command_for("/settings"), Some(Command::Settings));
        assert_eq!(command_for("/clear"), Some(Command::Clear));
        assert_eq!(
            command_for(tr(UiLanguage::En, MsgKey::BtnSettings)),
            Some(Command::Settings)
        );
        assert_eq!(
            command_for(tr(UiLanguage::Fa, MsgKey::BtnHelp)),
            Some(Command::Help)
        );
        assert_eq!(command_for("summarize this please"), None);
    }

    #[test]
    fn documents_classify_as_text_pdf_or_unsupported() {
        assert_eq!(
            document_kind(&document(Some("notes.txt"), None)),
            Some(DocumentKind::PlainText)
        );
        assert_eq!(
            document_kind(&document(Some("notes.TXT"), None)),
            Some(DocumentKind::PlainText)
        );
        assert_eq!(
            document_kind(&document(None, Some("text/plain"))),
            Some(DocumentKind::PlainText)
        );
        assert_eq!(
            document_kind(&document(Some("paper.pdf"), Some("application/pdf"))),
            Some(DocumentKind::Pdf)
        );
        assert_eq!(
            document_kind(&document(Some("paper.PDF"), None)),
            Some(DocumentKind::Pdf)
        );
        assert_eq!(document_kind(&document(Some("book.epub"), None)), None);
        assert_eq!(
            document_kind(&document(Some("deck.docx"), Some("application/vnd.openxmlformats-officedocument.wordprocessingml.document"))),
            None
        );
        assert_eq!(document_kind(&document(None, None)), None);
    }

    #[test]
    fn audio_support_covers_common_extensions_and_mimes() {
        assert!(is_supported_audio(Some("memo.mp3"), None));
        assert!(is_supported_audio(Some("memo.OGG"), None));
        assert!(is_supported_audio(None, Some("audio/mpeg")));
        assert!(is_supported_audio(Some("weird.bin"), Some("audio/flac")));
        assert!(!is_supported_audio(Some("clip.mp4"), Some("video/mp4")));
        assert!(!is_supported_audio(None, None));
    }

    #[test]
    fn main_keyboard_routes_settings_into_the_menu() {
        let keyboard = main_keyboard(UiLanguage::En);
        assert_eq!(keyboard.rows[0][0].data, "menu:main");
        assert_eq!(keyboard.rows[1][0].data, CB_HELP);
        assert_eq!(keyboard.rows[1][1].data, CB_ABOUT);
    }

    // End-to-end flows against mocked Telegram and inference servers.

    async fn app_against(
        telegram: &MockServer,
        llm: &MockServer,
    ) -> (tempfile::TempDir, SqliteStore, App) {
        let dir = tempdir().expect("temp dir");
        let store = SqliteStore::new(dir.path().join("bot.db"));
        store.init().await.expect("init store");
        let uploads = dir.path().join("uploads");
        std::fs::create_dir_all(&uploads).expect("uploads dir");

        let provider = Arc::new(OpenAiCompatProvider::new("test-key", llm.uri()));
        let app = App::new(
            TelegramApi::with_base(telegram.uri(), telegram.uri()),
            SessionStore::new(store.clone()),
            Completer::new(
                provider.clone(),
                Arc::new(ContentCache::new(Duration::from_secs(3600), 16)),
            ),
            ModelCatalog::new(provider.clone()),
            provider,
            Arc::new(ContentCache::new(Duration::from_secs(3600), 16)),
            uploads,
        );
        (dir, store, app)
    }

    async fn mount_telegram(server: &MockServer, file_path: &str, file_bytes: &[u8]) {
        Mock::given(method("POST"))
            .and(path("/sendMessage"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "ok": true,
                "result": { "message_id": 50, "chat": { "id": 7 } }
            })))
            .mount(server)
            .await;
        Mock::given(method("POST"))
            .and(path("/editMessageText"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({ "ok": true, "result": true })),
            )
            .mount(server)
            .await;
        Mock::given(method("POST"))
            .and(path("/getFile"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "ok": true,
                "result": { "file_path": file_path }
            })))
            .mount(server)
            .await;
        Mock::given(method("GET"))
            .and(path(format!("/{file_path}")))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(file_bytes.to_vec()))
            .mount(server)
            .await;
    }

    fn incoming(message: Message) -> Update {
        Update {
            update_id: 1,
            message: Some(message),
            callback_query: None,
        }
    }

    fn bare_message() -> Message {
        Message {
            message_id: 10,
            chat: Chat { id: 7 },
            from: Some(User { id: 7 }),
            text: None,
            caption: None,
            document: None,
            voice: None,
            audio: None,
            photo: None,
        }
    }

    #[tokio::test]
    async fn voice_note_is_transcribed_then_summarized_into_history() {
        let telegram = MockServer::start().await;
        let llm = MockServer::start().await;
        mount_telegram(&telegram, "voice/file_1.oga", b"not really ogg").await;

        Mock::given(method("POST"))
            .and(path("/audio/transcriptions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "text": "remember to buy milk"
            })))
            .expect(1)
            .mount(&llm)
            .await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "choices": [ { "message": { "content": "• buy milk" } } ]
            })))
            .expect(1)
            .mount(&llm)
            .await;

        let (_dir, store, app) = app_against(&telegram, &llm).await;

        let mut message = bare_message();
        message.voice = Some(Voice {
            file_id: "v1".to_string(),
            mime_type: Some("audio/ogg".to_string()),
        });
        app.handle_update(incoming(message)).await;

        let turns = store.conversation("7").await.expect("history");
        assert_eq!(turns.len(), 2);
        assert!(turns[0].content.as_text().contains("remember to buy milk"));
        assert_eq!(turns[1].content.as_text(), "• buy milk");
    }

    #[tokio::test]
    async fn photo_is_analyzed_and_the_analysis_lands_on_the_stored_turn() {
        let telegram = MockServer::start().await;
        let llm = MockServer::start().await;
        mount_telegram(&telegram, "photos/file_2.jpg", b"\xff\xd8 not a real jpeg").await;

        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "choices": [ { "message": { "content": "a whiteboard with notes" } } ]
            })))
            .expect(1)
            .mount(&llm)
            .await;

        let (_dir, store, app) = app_against(&telegram, &llm).await;

        let mut message = bare_message();
        message.photo = Some(vec![PhotoSize {
            file_id: "p1".to_string(),
        }]);
        message.caption = Some("what is this?".to_string());
        app.handle_update(incoming(message)).await;

        let turns = store.conversation("7").await.expect("history");
        assert_eq!(turns.len(), 2);
        assert!(turns[0].content.has_image());
        assert_eq!(turns[0].analysis.as_deref(), Some("a whiteboard with notes"));
        assert_eq!(turns[1].content.as_text(), "a whiteboard with notes");
    }

    #[tokio::test]
    async fn repeated_photo_reuses_the_cached_analysis() {
        let telegram = MockServer::start().await;
        let llm = MockServer::start().await;
        mount_telegram(&telegram, "photos/file_2.jpg", b"same image bytes").await;

        // A second vision call would trip this expectation.
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "choices": [ { "message": { "content": "a sleeping cat" } } ]
            })))
            .expect(1)
            .mount(&llm)
            .await;

        let (_dir, store, app) = app_against(&telegram, &llm).await;

        for _ in 0..2 {
            let mut message = bare_message();
            message.photo = Some(vec![PhotoSize {
                file_id: "p1".to_string(),
            }]);
            app.handle_update(incoming(message)).await;
        }

        let turns = store.conversation("7").await.expect("history");
        assert_eq!(turns.len(), 4);
        assert_eq!(turns[3].content.as_text(), "a sleeping cat");
    }

    #[tokio::test]
    async fn unsupported_audio_file_gets_the_format_error() {
        let telegram = MockServer::start().await;
        let llm = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/sendMessage"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "ok": true,
                "result": { "message_id": 51, "chat": { "id": 7 } }
            })))
            .expect(1)
            .mount(&telegram)
            .await;

        let (_dir, store, app) = app_against(&telegram, &llm).await;

        let mut message = bare_message();
        message.audio = Some(Audio {
            file_id: "a1".to_string(),
            file_name: Some("clip.mp4".to_string()),
            mime_type: Some("video/mp4".to_string()),
        });
        app.handle_update(incoming(message)).await;

        // Rejected before any download or model call; nothing stored.
        let turns = store.conversation("7").await.expect("history");
        assert!(turns.is_empty());
    }
}
