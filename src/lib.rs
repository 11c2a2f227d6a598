//! Ihya Tafsir - Quran index cross-referenced with commentary from the
//! Ihya Ulum al-Din
//!
//! Backend library providing corpus lookups and reader shaping over the
//! precomputed data directory.

// Model types come first as every other module builds on them
pub mod model;
pub mod error;
pub mod reader;
pub mod store;
pub mod tafsir;
pub mod library;

pub use error::TafsirError;
pub use model::{
    Ayah, BookMeta, BookStructure, ChapterMark, ProcessedBook, Quarter, Surah, TafsirIndex,
    TafsirMatch, Verse,
};
pub use reader::{
    chapter_jump, overlay, snippet, tokenize, verse_start_map, word_coverage_map, ReaderOverlay,
    DEFAULT_CONTEXT_WORDS,
};
pub use store::CorpusStore;
pub use tafsir::{
    ayah, ayah_view, surah, surah_view, surahs, tafsir_plus, AyahSummary, AyahView,
    CommentaryExcerpt, PlusEntry, SurahSummary, SurahView,
};
pub use library::{book_tokens, book_view, books, BookSummary, BookView};
