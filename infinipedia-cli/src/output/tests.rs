//! CLI output formatting tests.
//!
//! These tests verify that CLI output is correctly formatted for both
//! text and JSON output modes.

#[cfg(test)]
mod text_formatter_tests {
    use super::super::text::{TextFormatter, format_bytes};
    use infinipedia_core::{ArtResult, ImageData, Theme, Topic};
    use std::time::Duration;

    fn plain() -> TextFormatter {
        TextFormatter::new(false, Theme::Dark)
    }

    fn topics(words: &[&str]) -> Vec<Topic> {
        words.iter().map(|w| Topic::new(w).unwrap()).collect()
    }

    #[test]
    fn test_heading_without_colors() {
        let heading = plain().format_heading(&Topic::new("Gravity").unwrap());
        assert_eq!(heading, "── Gravity ──");
    }

    #[test]
    fn test_colors_follow_theme() {
        let topic = Topic::new("Gravity").unwrap();
        let dark = TextFormatter::new(true, Theme::Dark).format_heading(&topic);
        let light = TextFormatter::new(true, Theme::Light).format_heading(&topic);
        assert!(dark.contains("\x1b[96m"));
        assert!(light.contains("\x1b[34m"));
        assert_ne!(dark, light);
    }

    #[test]
    fn test_words_are_numbered_and_wrapped() {
        let words = topics(&["Gravity", "is", "a", "force"]);
        assert_eq!(plain().format_words(&words, 80), "1:Gravity 2:is 3:a 4:force");

        let wrapped = plain().format_words(&words, 12);
        assert_eq!(wrapped, "1:Gravity\n2:is 3:a\n4:force");
    }

    #[test]
    fn test_history_listing() {
        assert_eq!(plain().format_history(&[]), "No history yet");
        assert_eq!(
            plain().format_history(&topics(&["Cat", "Dog"])),
            "h1 Cat\nh2 Dog"
        );
    }

    #[test]
    fn test_fallback_art_is_marked() {
        let art = ArtResult::new("+--+\n|  |\n+--+");
        assert_eq!(plain().format_art(&art, false), "+--+\n|  |\n+--+");
        assert!(plain().format_art(&art, true).ends_with("showing placeholder)"));
    }

    #[test]
    fn test_image_summary() {
        let image = ImageData::new("A".repeat(4000), Some("image/jpeg".into()));
        assert_eq!(plain().format_image(Some(&image)), "Image: image/jpeg (2.9 KB)");
        assert_eq!(plain().format_image(None), "Image: none");
    }

    #[test]
    fn test_elapsed_and_bytes() {
        assert_eq!(
            plain().format_elapsed(Duration::from_millis(1300)),
            "Generated in 1.3s"
        );
        assert_eq!(format_bytes(512), "512 B");
        assert_eq!(format_bytes(1536), "1.5 KB");
        assert_eq!(format_bytes(3 * 1_048_576), "3.0 MB");
    }
}

#[cfg(test)]
mod renderer_tests {
    use super::super::render::Renderer;
    use super::super::text::TextFormatter;
    use infinipedia_core::{ArtResult, ProviderErrorKind, Theme, Topic};
    use infinipedia_session::{Epoch, ExploreState};
    use std::time::Duration;

    fn renderer() -> Renderer {
        Renderer::new(TextFormatter::new(false, Theme::Dark))
    }

    fn loading(epoch: Epoch, topic: &str) -> ExploreState {
        ExploreState {
            epoch,
            topic: Some(Topic::new(topic).unwrap()),
            definition_loading: true,
            art_loading: true,
            image_loading: true,
            ..ExploreState::default()
        }
    }

    #[test]
    fn test_idle_renders_nothing() {
        assert_eq!(renderer().render(&ExploreState::default()), "");
    }

    #[test]
    fn test_streams_deltas_then_extras() {
        let epoch = Epoch::default().next();
        let mut renderer = renderer();
        let mut state = loading(epoch, "Gravity");

        assert_eq!(renderer.render(&state), "\n── Gravity ──\n");

        state.content.push_str("Gravity ");
        assert_eq!(renderer.render(&state), "Gravity ");

        state.content.push_str("pulls.");
        state.art = Some(ArtResult::new("(o)"));
        state.art_loading = false;
        assert_eq!(renderer.render(&state), "pulls.");

        state.definition_loading = false;
        state.elapsed = Some(Duration::from_millis(1500));
        assert_eq!(renderer.render(&state), "\n\n1:Gravity 2:pulls\n");
        assert!(!renderer.is_finished());

        state.image_loading = false;
        assert_eq!(
            renderer.render(&state),
            "\n(o)\n\nImage: none\nGenerated in 1.5s\n"
        );
        assert!(renderer.is_finished());
        assert_eq!(renderer.render(&state), "");
    }

    #[test]
    fn test_new_epoch_starts_over() {
        let first = Epoch::default().next();
        let mut renderer = renderer();
        let mut state = loading(first, "Alpha");
        state.content.push_str("alpha text");
        renderer.render(&state);

        let state = loading(first.next(), "Beta");
        assert_eq!(renderer.render(&state), "\n── Beta ──\n");
    }

    #[test]
    fn test_failure_shows_message() {
        let mut renderer = renderer();
        let mut state = loading(Epoch::default(), "Forbidden");
        renderer.render(&state);

        state.definition_loading = false;
        state.error = Some("Content about \"Forbidden\" is restricted.".into());
        state.error_kind = Some(ProviderErrorKind::SafetyBlocked);
        assert_eq!(
            renderer.render(&state),
            "Content about \"Forbidden\" is restricted.\n"
        );
    }

    #[test]
    fn test_empty_definition_notice() {
        let mut renderer = renderer();
        let mut state = loading(Epoch::default(), "Void");
        renderer.render(&state);

        state.definition_loading = false;
        assert!(renderer.render(&state).starts_with("Nothing was written about \"Void\""));
    }
}

#[cfg(test)]
mod json_formatter_tests {
    use super::super::json::{ExploreOutput, JsonFormatter};
    use infinipedia_core::{ArtResult, ImageData, ProviderErrorKind, Topic};
    use infinipedia_session::{Epoch, ExploreState};
    use serde_json::Value;
    use std::time::Duration;

    fn settled(content: &str) -> ExploreState {
        ExploreState {
            epoch: Epoch::default().next(),
            topic: Some(Topic::new("Gravity").unwrap()),
            content: content.to_string(),
            art: Some(ArtResult::new("(o)")),
            image: Some(ImageData::new("aW1n", None)),
            elapsed: Some(Duration::from_millis(420)),
            ..ExploreState::default()
        }
    }

    fn to_value(output: &ExploreOutput) -> Value {
        let json = JsonFormatter::new(false).format(output).unwrap();
        serde_json::from_str(&json).unwrap()
    }

    #[test]
    fn test_complete_state() {
        let json = to_value(&ExploreOutput::from_state(&settled("Gravity pulls."), false));

        assert_eq!(json["topic"], "Gravity");
        assert_eq!(json["phase"], "complete");
        assert_eq!(json["epoch"], 1);
        assert_eq!(json["words"], serde_json::json!(["Gravity", "pulls"]));
        assert_eq!(json["art"]["art"], "(o)");
        assert_eq!(json["art"]["fallback"], false);
        assert_eq!(json["image"]["mimeType"], "image/png");
        assert!(json["image"].get("dataUrl").is_none());
        assert_eq!(json["elapsedMs"], 420);
        assert!(json.get("error").is_none());
    }

    #[test]
    fn test_image_data_on_request() {
        let json = to_value(&ExploreOutput::from_state(&settled("x"), true));
        assert_eq!(json["image"]["dataUrl"], "data:image/png;base64,aW1n");
    }

    #[test]
    fn test_failed_state() {
        let mut state = settled("");
        state.error = Some("The service is busy right now.".into());
        state.error_kind = Some(ProviderErrorKind::Overloaded);

        let json = to_value(&ExploreOutput::from_state(&state, false));
        assert_eq!(json["phase"], "failed");
        assert_eq!(json["error"]["kind"], "overloaded");
        assert!(json.get("words").is_none());
    }

    #[test]
    fn test_pretty_output() {
        let formatter = JsonFormatter::new(true);
        let json = formatter.format(&serde_json::json!({"a": 1})).unwrap();
        assert!(json.contains('\n'));
    }
}
