use include_dir::{include_dir, Dir};
use serde::Deserialize;
use serde_json::from_str;
use std::error::Error;

static DECK_DIR: Dir = include_dir!("src/decks");

/// Which native sub-script a prompt's text belongs to; picks the
/// stroke-order table used for drawing validation.
#[derive(Deserialize, Clone, Copy, Debug, PartialEq, Eq, strum_macros::Display)]
#[serde(rename_all = "lowercase")]
pub enum Script {
    Hiragana,
    Katakana,
}

/// Difficulty tier, fixed at authoring time. Controls which projection is
/// shown as the question and which is accepted as the answer.
#[derive(Deserialize, Clone, Copy, Debug, PartialEq, Eq, strum_macros::Display)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    Tier1,
    Tier2,
    Tier3,
}

/// One of the three textual renderings of a prompt.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Projection {
    Native,
    Transliteration,
    Translation,
}

/// An immutable unit to be practiced: a kana, word, or short phrase.
#[derive(Deserialize, Clone, Debug, PartialEq)]
pub struct PracticePrompt {
    pub native: String,
    pub romaji: Option<String>,
    pub meaning: String,
    pub script: Script,
    pub tier: Tier,
}

impl PracticePrompt {
    /// Render the given projection, if the prompt carries it.
    pub fn projection(&self, which: Projection) -> Option<&str> {
        match which {
            Projection::Native => Some(&self.native),
            Projection::Transliteration => self.romaji.as_deref(),
            Projection::Translation => Some(&self.meaning),
        }
    }
}

/// A named, already-loaded collection of prompts.
#[allow(dead_code)]
#[derive(Deserialize, Clone, Debug)]
pub struct Deck {
    pub name: String,
    pub size: u32,
    pub prompts: Vec<PracticePrompt>,
}

impl Deck {
    pub fn new(file_name: String) -> Self {
        read_deck_from_file(format!("{file_name}.json")).unwrap()
    }

    /// Pool-filtering helper for the embedding UI; `None` means "any".
    pub fn filtered(&self, script: Option<Script>, tier: Option<Tier>) -> Vec<PracticePrompt> {
        self.prompts
            .iter()
            .filter(|p| script.map_or(true, |s| p.script == s))
            .filter(|p| tier.map_or(true, |t| p.tier == t))
            .cloned()
            .collect()
    }
}

fn read_deck_from_file(file_name: String) -> Result<Deck, Box<dyn Error>> {
    let file = DECK_DIR.get_file(file_name).expect("Deck file not found");

    let file_as_str = file
        .contents_utf8()
        .expect("Unable to interpret file as a string");

    let deck = from_str(file_as_str).expect("Unable to deserialize deck json");

    Ok(deck)
}
