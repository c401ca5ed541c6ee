//! Static stroke-order reference data for the kana scripts.
//!
//! Each entry maps one character to the ordered sequence of coarse shapes a
//! learner is expected to draw. The shapes are authored against the endpoint
//! classifier in [`crate::strokes`]: a correctly drawn stroke lands in the
//! listed bucket, so sweeps that finish down-left (の, ル tails) are `Curve`
//! even where calligraphy would call them diagonal. A character with no
//! entry gets no stroke validation; the session falls back to whole-answer
//! comparison.

use crate::prompt::{PracticePrompt, Script};
use crate::strokes::StrokeShape::{self, Curve, Diagonal, Horizontal, Vertical};

pub const HIRAGANA_STROKES: &[(char, &[StrokeShape])] = &[
    ('あ', &[Horizontal, Vertical, Curve]),
    ('い', &[Vertical, Vertical]),
    ('う', &[Horizontal, Curve]),
    ('え', &[Horizontal, Curve]),
    ('お', &[Horizontal, Curve, Diagonal]),
    ('か', &[Horizontal, Diagonal, Diagonal]),
    ('き', &[Horizontal, Horizontal, Diagonal, Curve]),
    ('く', &[Vertical]),
    ('け', &[Vertical, Horizontal, Curve]),
    ('こ', &[Horizontal, Horizontal]),
    ('さ', &[Horizontal, Diagonal, Curve]),
    ('し', &[Curve]),
    ('す', &[Horizontal, Curve]),
    ('せ', &[Horizontal, Vertical, Curve]),
    ('そ', &[Curve]),
    ('た', &[Horizontal, Diagonal, Horizontal, Curve]),
    ('ち', &[Horizontal, Curve]),
    ('つ', &[Curve]),
    ('て', &[Curve]),
    ('と', &[Diagonal, Curve]),
    ('な', &[Horizontal, Diagonal, Vertical, Curve]),
    ('に', &[Vertical, Horizontal, Horizontal]),
    ('ぬ', &[Diagonal, Curve]),
    ('ね', &[Vertical, Curve]),
    ('の', &[Curve]),
    ('は', &[Vertical, Horizontal, Curve]),
    ('ひ', &[Curve]),
    ('ふ', &[Diagonal, Curve, Diagonal, Diagonal]),
    ('へ', &[Horizontal]),
    ('ほ', &[Vertical, Horizontal, Horizontal, Curve]),
    ('ま', &[Horizontal, Horizontal, Curve]),
    ('み', &[Curve, Diagonal]),
    ('む', &[Horizontal, Curve, Diagonal]),
    ('め', &[Diagonal, Curve]),
    ('も', &[Curve, Horizontal, Horizontal]),
    ('や', &[Curve, Diagonal, Vertical]),
    ('ゆ', &[Curve, Vertical]),
    ('よ', &[Horizontal, Curve]),
    ('ら', &[Diagonal, Curve]),
    ('り', &[Vertical, Curve]),
    ('る', &[Curve]),
    ('れ', &[Vertical, Curve]),
    ('ろ', &[Curve]),
    ('わ', &[Vertical, Curve]),
    ('を', &[Horizontal, Diagonal, Curve]),
    ('ん', &[Curve]),
];

pub const KATAKANA_STROKES: &[(char, &[StrokeShape])] = &[
    ('ア', &[Horizontal, Diagonal]),
    ('イ', &[Curve, Vertical]),
    ('ウ', &[Vertical, Horizontal, Curve]),
    ('エ', &[Horizontal, Vertical, Horizontal]),
    ('オ', &[Horizontal, Vertical, Diagonal]),
    ('カ', &[Horizontal, Diagonal]),
    ('キ', &[Horizontal, Horizontal, Diagonal]),
    ('ク', &[Curve, Diagonal]),
    ('ケ', &[Curve, Horizontal, Diagonal]),
    ('コ', &[Diagonal, Horizontal]),
    ('サ', &[Horizontal, Vertical, Diagonal]),
    ('シ', &[Diagonal, Diagonal, Curve]),
    ('ス', &[Diagonal, Diagonal]),
    ('セ', &[Horizontal, Curve]),
    ('ソ', &[Vertical, Curve]),
    ('タ', &[Curve, Diagonal, Diagonal]),
    ('チ', &[Diagonal, Horizontal, Vertical]),
    ('ツ', &[Diagonal, Diagonal, Curve]),
    ('テ', &[Horizontal, Horizontal, Vertical]),
    ('ト', &[Vertical, Diagonal]),
    ('ナ', &[Horizontal, Diagonal]),
    ('ニ', &[Horizontal, Horizontal]),
    ('ヌ', &[Diagonal, Diagonal]),
    ('ネ', &[Vertical, Diagonal, Vertical, Diagonal]),
    ('ノ', &[Curve]),
    ('ハ', &[Curve, Diagonal]),
    ('ヒ', &[Vertical, Horizontal]),
    ('フ', &[Curve]),
    ('ヘ', &[Horizontal]),
    ('ホ', &[Horizontal, Vertical, Curve, Diagonal]),
    ('マ', &[Diagonal, Curve]),
    ('ミ', &[Diagonal, Diagonal, Diagonal]),
    ('ム', &[Curve, Horizontal]),
    ('メ', &[Curve, Diagonal]),
    ('モ', &[Horizontal, Horizontal, Vertical]),
    ('ヤ', &[Diagonal, Vertical]),
    ('ユ', &[Diagonal, Horizontal]),
    ('ヨ', &[Diagonal, Horizontal, Horizontal]),
    ('ラ', &[Horizontal, Curve]),
    ('リ', &[Vertical, Curve]),
    ('ル', &[Vertical, Curve]),
    ('レ', &[Diagonal]),
    ('ロ', &[Vertical, Diagonal, Horizontal]),
    ('ワ', &[Vertical, Curve]),
    ('ヲ', &[Horizontal, Horizontal, Curve]),
    ('ン', &[Diagonal, Curve]),
];

/// Expected stroke shapes for one character, or `None` when the character
/// has no authored entry.
pub fn stroke_order(c: char, script: Script) -> Option<&'static [StrokeShape]> {
    let table = match script {
        Script::Hiragana => HIRAGANA_STROKES,
        Script::Katakana => KATAKANA_STROKES,
    };

    table.iter().find(|(k, _)| *k == c).map(|(_, shapes)| *shapes)
}

/// Stroke order for a whole prompt. Only single-character prompts are
/// drawable; words and phrases fall back to typed answers.
pub fn stroke_order_for(prompt: &PracticePrompt) -> Option<&'static [StrokeShape]> {
    let mut chars = prompt.native.chars();
    let first = chars.next()?;
    if chars.next().is_some() {
        return None;
    }
    stroke_order(first, prompt.script)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prompt::Tier;

    #[test]
    fn test_hiragana_lookup() {
        let shapes = stroke_order('あ', Script::Hiragana).unwrap();
        assert_eq!(shapes, &[Horizontal, Vertical, Curve]);
    }

    #[test]
    fn test_katakana_lookup() {
        let shapes = stroke_order('ニ', Script::Katakana).unwrap();
        assert_eq!(shapes, &[Horizontal, Horizontal]);
    }

    #[test]
    fn test_unknown_character_has_no_entry() {
        // kanji are not authored
        assert_eq!(stroke_order('日', Script::Hiragana), None);
        assert_eq!(stroke_order('日', Script::Katakana), None);
    }

    #[test]
    fn test_script_tables_are_disjoint() {
        assert_eq!(stroke_order('あ', Script::Katakana), None);
        assert_eq!(stroke_order('ア', Script::Hiragana), None);
    }

    #[test]
    fn test_full_gojuon_coverage() {
        assert_eq!(HIRAGANA_STROKES.len(), 46);
        assert_eq!(KATAKANA_STROKES.len(), 46);
    }

    #[test]
    fn test_every_entry_has_at_least_one_stroke() {
        for (c, shapes) in HIRAGANA_STROKES.iter().chain(KATAKANA_STROKES) {
            assert!(!shapes.is_empty(), "empty stroke list for {c}");
            assert!(shapes.len() <= 4, "implausible stroke count for {c}");
        }
    }

    fn prompt(native: &str, script: Script) -> PracticePrompt {
        PracticePrompt {
            native: native.to_string(),
            romaji: Some("x".to_string()),
            meaning: "x".to_string(),
            script,
            tier: Tier::Tier1,
        }
    }

    #[test]
    fn test_single_character_prompt_is_drawable() {
        let p = prompt("あ", Script::Hiragana);
        assert!(stroke_order_for(&p).is_some());
    }

    #[test]
    fn test_multi_character_prompt_is_not_drawable() {
        let p = prompt("ねこ", Script::Hiragana);
        assert_eq!(stroke_order_for(&p), None);
    }

    #[test]
    fn test_empty_native_text_is_not_drawable() {
        let p = prompt("", Script::Hiragana);
        assert_eq!(stroke_order_for(&p), None);
    }
}
