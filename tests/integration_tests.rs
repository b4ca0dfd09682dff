//! Integration tests for Readable

use proptest::prelude::*;
use readable::render_engines::bionic::{apply_bionic_markup, bionic_segments, split_word};
use readable::render_engines::markup::{parse_against_source, segments_or_plain};
use readable::render_engines::{render, StyleEngine};
use readable::style::{StyleConfig, FONT_SIZE_RANGE, LETTER_SPACING_RANGE, LINE_SPACING_RANGE};
use readable::unicode_handler::grapheme_count;

fn bionic() -> StyleConfig {
    StyleConfig::default().with_bionic(true)
}

mod bionic_tests {
    use super::*;

    #[test]
    fn test_multi_word_example() {
        assert_eq!(apply_bionic_markup("hello world"), "**he**llo **wo**rld");
    }

    #[test]
    fn test_single_char_word() {
        assert_eq!(apply_bionic_markup("a"), "**a**");
        assert_eq!(split_word("a"), ("a", ""));
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(apply_bionic_markup(""), "");
    }

    #[test]
    fn test_sentence_snapshot() {
        insta::assert_snapshot!(
            apply_bionic_markup("The quick brown fox jumps"),
            @"**T**he **qu**ick **br**own **f**ox **ju**mps"
        );
    }

    #[test]
    fn test_spaces_are_the_only_separator() {
        // newlines and tabs stay inside the word they touch
        assert_eq!(apply_bionic_markup("ab\ncd"), "**ab**\ncd");
        assert_eq!(apply_bionic_markup("a  b"), "**a**  **b**");
    }

    proptest! {
        #[test]
        fn prop_split_invariant(word in "[a-zA-Zà-ÿ一-龥0-9.,'\t\n]{1,24}") {
            let (head, tail) = split_word(&word);
            let n = grapheme_count(&word);
            prop_assert_eq!(format!("{}{}", head, tail), word.clone());
            prop_assert_eq!(grapheme_count(head), std::cmp::max(1, n / 2));
            prop_assert_eq!(grapheme_count(head) + grapheme_count(tail), n);
        }

        #[test]
        fn prop_segments_rebuild_source(text in any::<String>()) {
            let rebuilt: String = bionic_segments(&text).iter().map(|s| s.text.as_str()).collect();
            prop_assert_eq!(rebuilt, text);
        }

        #[test]
        fn prop_markup_agrees_with_segments(text in "[a-zA-Zé \n\t.,]{0,80}") {
            let markup = apply_bionic_markup(&text);
            let parsed = parse_against_source(&markup, &text).unwrap();
            prop_assert_eq!(parsed, bionic_segments(&text));
        }
    }
}

mod render_tests {
    use super::*;
    use readable::color_space::Rgb;

    #[test]
    fn test_empty_render() {
        assert!(render("", &bionic()).is_empty());
        assert!(render("", &StyleConfig::default()).is_empty());
    }

    #[test]
    fn test_disabled_bionic_passthrough() {
        let text = "Plain  text\nwith lines";
        let doc = render(text, &StyleConfig::default());
        assert_eq!(doc.plain_text(), text);
        assert!(!doc.has_bold());
    }

    #[test]
    fn test_bold_only_changes_weight() {
        let config = bionic().with_letter_spacing(4.0).with_line_spacing(12.0);
        let doc = render("hello world", &config);
        assert!(doc.has_bold());
        assert_eq!(doc.letter_spacing, 4.0);
        assert_eq!(doc.line_spacing, 12.0);
        assert_eq!(doc.font, config.font());
    }

    #[test]
    fn test_malformed_markup_falls_back() {
        let original = "hello world";
        for markup in ["**he**llo **wo", "****", "**x**", "he**llo"] {
            let segments = segments_or_plain(markup, original);
            assert_eq!(segments.len(), 1);
            assert_eq!(segments[0].text, original);
            assert!(!segments[0].bold);
        }
    }

    #[test]
    fn test_malformed_markup_through_engine() {
        let engine = StyleEngine::default();
        let doc = engine.render_markup("**broken", "broken", &bionic());
        assert_eq!(doc.plain_text(), "broken");
        assert!(!doc.has_bold());
    }

    #[test]
    fn test_palette_default_on_bad_index() {
        let config = StyleConfig::default()
            .with_background_color_index(9999)
            .with_text_color_index(9999);
        let doc = render("text", &config);
        assert_eq!(doc.background_color, Rgb::WHITE);
        assert_eq!(doc.text_color, Rgb::BLACK);
    }

    #[test]
    fn test_inputs_untouched() {
        let text = String::from("keep me");
        let config = bionic();
        let before = config.clone();
        let _ = render(&text, &config);
        assert_eq!(text, "keep me");
        assert_eq!(config, before);
    }
}

mod clamping_tests {
    use super::*;

    fn clamp(value: f32, range: &std::ops::RangeInclusive<f32>) -> f32 {
        value.clamp(*range.start(), *range.end())
    }

    proptest! {
        #[test]
        fn prop_font_size_clamped(value in -500.0f32..500.0) {
            let mut config = StyleConfig::default();
            config.set_font_size(value);
            prop_assert_eq!(config.font_size(), clamp(value, &FONT_SIZE_RANGE));
        }

        #[test]
        fn prop_letter_spacing_clamped(value in -50.0f32..50.0) {
            let mut config = StyleConfig::default();
            config.set_letter_spacing(value);
            prop_assert_eq!(config.letter_spacing(), clamp(value, &LETTER_SPACING_RANGE));
        }

        #[test]
        fn prop_line_spacing_clamped(value in -50.0f32..80.0) {
            let mut config = StyleConfig::default();
            config.set_line_spacing(value);
            prop_assert_eq!(config.line_spacing(), clamp(value, &LINE_SPACING_RANGE));
        }

        #[test]
        fn prop_steps_stay_in_range(steps in proptest::collection::vec(any::<bool>(), 0..120)) {
            let mut config = StyleConfig::default();
            for up in steps {
                if up {
                    config.increase_font_size();
                    config.increase_line_spacing();
                } else {
                    config.decrease_font_size();
                    config.decrease_letter_spacing();
                }
            }
            prop_assert!(FONT_SIZE_RANGE.contains(&config.font_size()));
            prop_assert!(LETTER_SPACING_RANGE.contains(&config.letter_spacing()));
            prop_assert!(LINE_SPACING_RANGE.contains(&config.line_spacing()));
        }
    }
}

mod store_tests {
    use readable::capture::{CaptureSession, RecognizedItem};
    use readable::documents::{DocumentStore, FileLibrary};
    use readable::notes::NoteBook;
    use readable::preferences::{load_style, save_style, FilePreferenceStore};
    use readable::render_engines::render;
    use readable::style::StyleConfig;

    #[test]
    fn test_scan_to_library_to_render() {
        let dir = tempfile::tempdir().unwrap();
        let mut library = FileLibrary::new(dir.path().join("documents"));

        let mut session = CaptureSession::default();
        session.push(RecognizedItem::Text("hello".into()));
        session.push(RecognizedItem::Text("world".into()));
        let id = session.save_to(&mut library, Some("Page")).unwrap();

        let entries = library.list().unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].id, id);

        let text = library.read_text(&id).unwrap();
        let doc = render(&text, &StyleConfig::default().with_bionic(true));
        assert_eq!(doc.to_markup(), "**he**llo\n**wo**rld");
    }

    #[test]
    fn test_notes_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.json");

        let (kept, copy) = {
            let mut book = NoteBook::open(&path).unwrap();
            let kept = book.create("Reading list").unwrap();
            let gone = book.create("Scratch").unwrap();
            book.update_content(kept, "Dune\nEmma").unwrap();
            let copy = book.duplicate(kept).unwrap();
            book.delete(gone).unwrap();
            (kept, copy)
        };

        let book = NoteBook::open(&path).unwrap();
        assert_eq!(book.len(), 2);
        assert_eq!(book.read_text(&kept).unwrap(), "Dune\nEmma");
        assert_eq!(book.read_text(&copy).unwrap(), "Dune\nEmma");
        assert_eq!(book.filtered("reading").len(), 2);
    }

    #[test]
    fn test_preferences_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("preferences.toml");
        let style = StyleConfig::default()
            .with_font_size(40.0)
            .with_line_spacing(20.0)
            .with_bionic(true);

        let mut store = FilePreferenceStore::open(&path).unwrap();
        save_style(&mut store, &style).unwrap();

        let reopened = FilePreferenceStore::open(&path).unwrap();
        assert_eq!(load_style(&reopened), style);
    }
}

mod worker_tests {
    use readable::render_engines::StyleEngine;
    use readable::style::StyleConfig;
    use readable::worker::{LatestRender, RenderWorker};
    use std::time::Duration;

    #[test]
    fn test_last_submission_wins() {
        let mut worker = RenderWorker::spawn(StyleEngine::default()).unwrap();
        let config = StyleConfig::default().with_bionic(true);
        let texts = ["h", "he", "hel", "hell", "hello"];
        for text in texts {
            worker.submit(text, &config);
        }

        let mut responses = Vec::new();
        for _ in texts {
            responses.push(worker.recv_timeout(Duration::from_secs(5)).unwrap());
        }
        // deliver out of order
        responses.reverse();

        let mut latest = LatestRender::new();
        let accepted = responses.into_iter().filter(|r| latest.accept(r.clone())).count();
        assert_eq!(accepted, 1);
        assert_eq!(latest.document().unwrap().to_markup(), "**he**llo");
        worker.shutdown();
    }
}
