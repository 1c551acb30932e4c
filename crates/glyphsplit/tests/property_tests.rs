//! Property tests: round trip, reading order, dash continuation and kerning gaps.

mod common;

use common::{elements_with_class, lefts, paragraph, tops, words_per_line};
use glyphsplit::measure::measure_words;
use glyphsplit::segment::{collapse_whitespace, segment_words};
use glyphsplit::{DEFAULT_KERNING_THRESHOLD, SplitOptions, inner_markup, split};
use proptest::prelude::*;

/// Words over a small alphabet that includes kerning pairs, dashes and a
/// non-breaking space, separated by arbitrary whitespace runs.
fn text_strategy() -> impl Strategy<Value = String> {
    let word = "[AVToWaf\u{00A0}\u{2014}\u{2013}xyz]{1,8}";
    let gap = "[ \t\n]{1,3}";
    (
        "[ \n]{0,2}",
        proptest::collection::vec((word, gap), 1..8),
        "[ \n]{0,2}",
    )
        .prop_map(|(lead, parts, trail)| {
            let mut text = lead;
            for (word, gap) in parts {
                text.push_str(&word);
                text.push_str(&gap);
            }
            text.push_str(&trail);
            text
        })
}

/// Gaps between neighbouring characters inside each word wrapper.
fn in_word_gaps(lefts: &[f32], word_lengths: &[usize]) -> Vec<f32> {
    let mut gaps = Vec::new();
    let mut offset = 0;
    for &len in word_lengths {
        let word = &lefts[offset..offset + len];
        gaps.extend(word.windows(2).map(|w| w[1] - w[0]));
        offset += len;
    }
    gaps
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn round_trip_reproduces_collapsed_text(text in text_strategy(), width in 30.0f32..400.0) {
        let (mut doc, p, mut host) = paragraph(&text, width);
        let original = inner_markup(&doc, p).unwrap();
        let mut split_text = split(&mut doc, &mut host, p, SplitOptions::new()).unwrap();
        let result = split_text.result().clone();

        prop_assert_eq!(result.text(&doc), collapse_whitespace(&text));
        let chars: String = result.chars.iter().map(|&c| doc.text_content(c)).collect();
        prop_assert_eq!(chars, collapse_whitespace(&text).replace(' ', ""));

        split_text.revert(&mut doc).unwrap();
        prop_assert_eq!(inner_markup(&doc, p).unwrap(), original);
    }

    #[test]
    fn results_are_in_reading_order(text in text_strategy(), width in 30.0f32..400.0) {
        let (mut doc, p, mut host) = paragraph(&text, width);
        let split_text = split(&mut doc, &mut host, p, SplitOptions::new()).unwrap();
        let result = split_text.result();

        prop_assert_eq!(&elements_with_class(&doc, p, "split-char"), &result.chars);
        prop_assert_eq!(&elements_with_class(&doc, p, "split-word"), &result.words);
        prop_assert_eq!(&elements_with_class(&doc, p, "split-line"), &result.lines);

        let line_tops = tops(&doc, &mut host, &result.lines);
        prop_assert!(line_tops.windows(2).all(|w| w[0] < w[1]));

        for words in words_per_line(&doc, result) {
            let word_lefts = lefts(&doc, &mut host, &words);
            prop_assert!(word_lefts.windows(2).all(|w| w[0] < w[1]), "{:?}", word_lefts);
        }
    }

    #[test]
    fn dash_continuation_never_gets_a_space(width in 10.0f32..200.0) {
        let (mut doc, p, mut host) = paragraph("a\u{2014}b", width);
        let split_text = split(&mut doc, &mut host, p, SplitOptions::new()).unwrap();
        let result = split_text.result();

        prop_assert_eq!(result.words.len(), 2);
        prop_assert!(result.is_continuation(1));
        prop_assert_eq!(doc.text_content(p), "a\u{2014}b");
    }

    #[test]
    fn corrected_gaps_match_measured_originals(text in text_strategy(), width in 30.0f32..400.0) {
        let (mut doc, p, mut host) = paragraph(&text, width);
        let measured = measure_words(&doc, &mut host, &segment_words(&doc, p));
        let original: Vec<f32> = measured
            .iter()
            .flat_map(|w| w.graphemes.iter().map(|g| g.original_left))
            .collect();

        let split_text = split(&mut doc, &mut host, p, SplitOptions::new()).unwrap();
        let result = split_text.result();
        let lengths: Vec<usize> = result
            .words
            .iter()
            .map(|&w| elements_with_class(&doc, w, "split-char").len())
            .collect();
        prop_assert_eq!(lengths.iter().sum::<usize>(), original.len());
        let corrected = in_word_gaps(&lefts(&doc, &mut host, &result.chars), &lengths);

        // A zero threshold leaves every gap as the wrappers first laid it out.
        let (mut raw_doc, raw_p, mut raw_host) = paragraph(&text, width);
        let raw_text =
            split(&mut raw_doc, &mut raw_host, raw_p, SplitOptions::new().kerning_threshold(0.0))
                .unwrap();
        let raw = in_word_gaps(&lefts(&raw_doc, &mut raw_host, &raw_text.result().chars), &lengths);

        let expected = in_word_gaps(&original, &lengths);
        for ((e, c), r) in expected.iter().zip(&corrected).zip(&raw) {
            prop_assert!(
                (e - c).abs() <= 0.006 || (e - r).abs() >= DEFAULT_KERNING_THRESHOLD,
                "expected gap {}, corrected {}, raw {}",
                e,
                c,
                r
            );
        }
    }
}
