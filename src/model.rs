//! Corpus data model: verse matches, the tafsir index, book metadata and structure

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One Quranic verse segment found quoted inside a book.
///
/// `word_start`/`word_end` are inclusive 0-based indices into the
/// whitespace tokenization of the originating book's raw text. The
/// alignment with that tokenization is fixed by the preprocessing step
/// that produced the record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Verse {
    #[serde(default)]
    pub vol: u32,
    pub word_start: usize,
    pub word_end: usize,
    /// The Arabic fragment as it appears in the book.
    #[serde(default)]
    pub text_matched: String,
    #[serde(default)]
    pub translation: String,
    /// Composite "surah:ayah" key.
    #[serde(default)]
    pub key: String,
    #[serde(default)]
    pub surah_idx: Option<u32>,
    #[serde(default)]
    pub ayah_start: Option<u32>,
}

/// A match record embedded in the global tafsir index, pointing back into
/// the book it was found in.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TafsirMatch {
    pub book_id: String,
    #[serde(default)]
    pub vol: u32,
    pub word_start: usize,
    pub word_end: usize,
    #[serde(default)]
    pub verse_in_text: String,
    #[serde(default)]
    pub translation: String,
}

/// A verse of the Quran with the commentary matches that cite it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ayah {
    pub text: String,
    #[serde(default)]
    pub matches: Vec<TafsirMatch>,
}

/// A chapter of the Quran, keyed in the index by its id as a string.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Surah {
    pub name: String,
    pub tname: String,
    pub ename: String,
    pub ayahs: u32,
    #[serde(default)]
    pub verses: HashMap<String, Ayah>,
}

/// The whole `quran_tafsir_index.json` file: surah-id -> Surah.
pub type TafsirIndex = HashMap<String, Surah>;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookMeta {
    #[serde(default)]
    pub english_title: String,
    #[serde(default)]
    pub arabic_title: String,
    #[serde(default)]
    pub vol: u32,
    /// Position 1..=40 in the traditional ordering of the Ihya.
    #[serde(default)]
    pub global_id: Option<u32>,
}

/// A table-of-contents entry. `word_start` is in the same token coordinate
/// space as [`Verse`] ranges.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChapterMark {
    pub title: String,
    pub word_start: usize,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BookStructure {
    #[serde(default)]
    pub chapters: Vec<ChapterMark>,
}

/// Raw book text paired with its precomputed verse matches.
#[derive(Debug, Clone)]
pub struct ProcessedBook {
    pub id: String,
    pub raw_text: String,
    pub verses: Vec<Verse>,
}

/// The four traditional quarters of the Ihya, ten books each.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Quarter {
    Worship,
    Customs,
    Perils,
    Deliverance,
}

impl Quarter {
    /// Classify a book by its global ordering id. Fixed division, not
    /// derived from any corpus file.
    pub fn from_global_id(global_id: u32) -> Option<Self> {
        match global_id {
            1..=10 => Some(Quarter::Worship),
            11..=20 => Some(Quarter::Customs),
            21..=30 => Some(Quarter::Perils),
            31..=40 => Some(Quarter::Deliverance),
            _ => None,
        }
    }

    pub fn english(&self) -> &'static str {
        match self {
            Quarter::Worship => "Acts of Worship",
            Quarter::Customs => "Norms of Daily Life",
            Quarter::Perils => "The Ways to Perdition",
            Quarter::Deliverance => "The Ways to Salvation",
        }
    }

    pub fn arabic(&self) -> &'static str {
        match self {
            Quarter::Worship => "ربع العبادات",
            Quarter::Customs => "ربع العادات",
            Quarter::Perils => "ربع المهلكات",
            Quarter::Deliverance => "ربع المنجيات",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quarter_boundaries() {
        assert_eq!(Quarter::from_global_id(1), Some(Quarter::Worship));
        assert_eq!(Quarter::from_global_id(10), Some(Quarter::Worship));
        assert_eq!(Quarter::from_global_id(11), Some(Quarter::Customs));
        assert_eq!(Quarter::from_global_id(20), Some(Quarter::Customs));
        assert_eq!(Quarter::from_global_id(21), Some(Quarter::Perils));
        assert_eq!(Quarter::from_global_id(30), Some(Quarter::Perils));
        assert_eq!(Quarter::from_global_id(31), Some(Quarter::Deliverance));
        assert_eq!(Quarter::from_global_id(40), Some(Quarter::Deliverance));
        assert_eq!(Quarter::from_global_id(0), None);
        assert_eq!(Quarter::from_global_id(41), None);
    }

    #[test]
    fn quarter_display_names() {
        assert_eq!(Quarter::Worship.english(), "Acts of Worship");
        assert_eq!(Quarter::Worship.arabic(), "ربع العبادات");
        assert_eq!(Quarter::Deliverance.arabic(), "ربع المنجيات");
    }

    #[test]
    fn verse_deserializes_from_corpus_record() {
        let raw = r#"{
            "original_file": "Vol1-book-1.doc.txt",
            "vol": 1,
            "surah": "البقرة",
            "surah_idx": 2,
            "ayah_start": 255,
            "ayah_end": 255,
            "text_matched": "الله لا إله إلا هو الحي القيوم",
            "translation": "God: there is no god but Him, the Ever Living.",
            "key": "2:255",
            "word_start": 120,
            "word_end": 127
        }"#;
        let verse: Verse = serde_json::from_str(raw).unwrap();
        assert_eq!(verse.key, "2:255");
        assert_eq!(verse.word_start, 120);
        assert_eq!(verse.word_end, 127);
        assert_eq!(verse.surah_idx, Some(2));
    }

    #[test]
    fn tafsir_match_defaults_optional_fields() {
        let raw = r#"{"book_id": "vol1_Vol1-book-1.doc", "word_start": 5, "word_end": 9}"#;
        let m: TafsirMatch = serde_json::from_str(raw).unwrap();
        assert_eq!(m.vol, 0);
        assert!(m.verse_in_text.is_empty());
        assert!(m.translation.is_empty());
    }
}
