//! Deterministic prompt construction.
//!
//! Pure function of (settings, history, new input): no clock, no I/O,
//! no randomness, so identical inputs always produce the identical
//! request payload.

use crate::settings::Settings;
use crate::turn::{ContentPart, Role, Turn, TurnContent};

/// Upper bound for completion output, matching the channel's appetite
/// for chunked replies.
pub const MAX_COMPLETION_TOKENS: u32 = 2048;

/// Placeholder replayed for an image turn that has no cached analysis.
const IMAGE_OMITTED: &str = "[image omitted from replay]";

/// A built request: system instruction plus ordered message turns.
#[derive(Clone, Debug, PartialEq)]
pub struct Prompt {
    pub system: String,
    pub messages: Vec<Turn>,
}

/// Render the fixed system template with the user's configuration.
///
/// The template forbids markup the delivery channel cannot parse, so
/// the sanitizer downstream mostly has nothing to do.
pub fn render_system(settings: &Settings) -> String {
    let language_instruction = match settings.summary_language {
        crate::settings::SummaryLanguage::Auto => "Keep the original language.".to_string(),
        other => format!("Output language: {}", other.as_str()),
    };

    format!(
        "You are an elite AI summarization assistant.\n\
         Your goal is to synthesize the input text into a clear, high-quality summary strictly adhering to the user's configuration.\n\
         \n\
         --- CONFIGURATION ---\n\
         1. **Tone**: Adopt a {tone} tone.\n\
         2. **Length**: The summary must be {length}.\n\
         3. **Language**: {language}\n\
         \n\
         --- OUTPUT REQUIREMENTS ---\n\
         - **Format**: HTML compatible with the chat channel.\n\
         - **Allowed Tags**: ONLY use <b>, <i>, <u>, <s>, <code>, <pre>.\n\
         - **Forbidden Tags**: Do NOT use <p>, <br>, <h1>, <ul>, <li>, or <div>.\n\
         - **Structure**:\n\
           - Use double newlines for paragraph breaks.\n\
           - Use \"• \" (bullet character) for lists, NOT HTML list tags.\n\
         - **Constraints**:\n\
           - Do NOT use Markdown (like ** or ##).\n\
           - Do NOT include conversational filler (e.g., \"Here is the summary\").\n\
           - Output ONLY the summary content.\n\
         \n\
         Analyze the text deeply and provide the best possible summary now.",
        tone = settings.tone.instruction(),
        length = settings.length.as_str(),
        language = language_instruction,
    )
}

/// Build the full request from stored history plus the newest input.
///
/// History is replayed verbatim and in order; only the new input may
/// carry raw image parts. Older image turns are replaced by their
/// cached analysis text (or a placeholder) to bound payload size.
pub fn build_prompt(settings: &Settings, history: &[Turn], new_input: TurnContent) -> Prompt {
    let mut messages: Vec<Turn> = Vec::with_capacity(history.len() + 1);

    for turn in history {
        messages.push(replay_turn(turn));
    }
    messages.push(Turn::new(Role::User, new_input));

    Prompt {
        system: render_system(settings),
        messages,
    }
}

fn replay_turn(turn: &Turn) -> Turn {
    if !turn.content.has_image() {
        return turn.clone();
    }

    let mut parts: Vec<ContentPart> = Vec::with_capacity(turn.content.parts.len());
    for part in &turn.content.parts {
        match part {
            ContentPart::Image { .. } => {
                let replacement = match &turn.analysis {
                    Some(analysis) => format!("Previous image analysis:\n{analysis}"),
                    None => IMAGE_OMITTED.to_string(),
                };
                parts.push(ContentPart::text(replacement));
            }
            other => parts.push(other.clone()),
        }
    }

    Turn {
        role: turn.role,
        content: TurnContent { parts },
        analysis: turn.analysis.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::{SummaryLanguage, SummaryLength, Tone};

    fn history() -> Vec<Turn> {
        vec![
            Turn::user("summarize my day"),
            Turn::assistant("• you worked\n• you slept"),
        ]
    }

    #[test]
    fn build_prompt_is_deterministic() {
        let settings = Settings::default();
        let a = build_prompt(&settings, &history(), TurnContent::text("again"));
        let b = build_prompt(&settings, &history(), TurnContent::text("again"));
        assert_eq!(a, b);
    }

    #[test]
    fn history_order_is_preserved() {
        let settings = Settings::default();
        let prompt = build_prompt(&settings, &history(), TurnContent::text("next"));
        assert_eq!(prompt.messages.len(), 3);
        assert_eq!(prompt.messages[0].role, Role::User);
        assert_eq!(prompt.messages[1].role, Role::Assistant);
        assert_eq!(prompt.messages[2].content.as_text(), "next");
    }

    #[test]
    fn system_template_reflects_settings() {
        let mut settings = Settings::default();
        settings.tone = Tone::Witty;
        settings.length = SummaryLength::Short;
        settings.summary_language = SummaryLanguage::German;

        let system = render_system(&settings);
        assert!(system.contains("Witty, humorous, and engaging"));
        assert!(system.contains("must be Short"));
        assert!(system.contains("Output language: German"));
    }

    #[test]
    fn auto_language_keeps_original() {
        let system = render_system(&Settings::default());
        assert!(system.contains("Keep the original language."));
    }

    #[test]
    fn old_image_turns_replay_as_analysis_text() {
        let settings = Settings::default();
        let mut image_turn = Turn::user(TurnContent {
            parts: vec![
                ContentPart::text("what is this?"),
                ContentPart::image_base64("aWJt", "image/jpeg"),
            ],
        });
        image_turn.analysis = Some("a cat on a sofa".to_string());

        let prompt = build_prompt(&settings, &[image_turn], TurnContent::text("more detail"));

        let replayed = &prompt.messages[0];
        assert!(!replayed.content.has_image());
        assert!(replayed
            .content
            .as_text()
            .contains("Previous image analysis:\na cat on a sofa"));
    }

    #[test]
    fn unanalyzed_image_turns_replay_as_placeholder() {
        let settings = Settings::default();
        let image_turn = Turn::user(TurnContent {
            parts: vec![ContentPart::image_base64("aWJt", "image/jpeg")],
        });

        let prompt = build_prompt(&settings, &[image_turn], TurnContent::text("hi"));
        assert_eq!(prompt.messages[0].content.as_text(), IMAGE_OMITTED);
    }

    #[test]
    fn newest_input_keeps_raw_image_parts() {
        let settings = Settings::default();
        let input = TurnContent {
            parts: vec![
                ContentPart::text("analyze"),
                ContentPart::image_base64("aWJt", "image/png"),
            ],
        };

        let prompt = build_prompt(&settings, &[], input);
        assert!(prompt.messages[0].content.has_image());
    }
}
