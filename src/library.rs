//! The book library: listing, quarters, and the reader payload

use crate::error::TafsirError;
use crate::model::{ChapterMark, Quarter, Verse};
use crate::reader::{self, ReaderOverlay};
use crate::store::CorpusStore;
use serde::Serialize;
use std::cmp::Ordering;

#[derive(Debug, Clone, Serialize)]
pub struct BookSummary {
    pub id: String,
    pub english_title: String,
    pub arabic_title: String,
    pub vol: u32,
    pub global_id: Option<u32>,
    pub quarter: Option<Quarter>,
}

/// All books from metadata, ascending by global ordering id. Books without
/// a global id go last, ties break on the id string.
pub fn books(store: &CorpusStore) -> Result<Vec<BookSummary>, TafsirError> {
    let metadata = store.metadata()?;
    let mut out: Vec<BookSummary> = metadata
        .iter()
        .map(|(id, meta)| BookSummary {
            id: id.clone(),
            english_title: meta.english_title.clone(),
            arabic_title: meta.arabic_title.clone(),
            vol: meta.vol,
            global_id: meta.global_id,
            quarter: meta.global_id.and_then(Quarter::from_global_id),
        })
        .collect();
    out.sort_by(|a, b| match (a.global_id, b.global_id) {
        (Some(x), Some(y)) => x.cmp(&y).then_with(|| a.id.cmp(&b.id)),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => a.id.cmp(&b.id),
    });
    Ok(out)
}

/// One book shaped for the paginated reader: its token stream, the verse
/// overlay maps, and the table-of-contents chapters.
#[derive(Debug, Clone, Serialize)]
pub struct BookView {
    pub id: String,
    pub english_title: String,
    pub arabic_title: String,
    pub vol: u32,
    pub global_id: Option<u32>,
    pub quarter: Option<Quarter>,
    pub tokens: Vec<String>,
    pub verses: Vec<Verse>,
    pub overlay: ReaderOverlay,
    pub chapters: Vec<ChapterMark>,
}

pub fn book_view(store: &CorpusStore, book_id: &str) -> Result<Option<BookView>, TafsirError> {
    let Some(book) = store.book(book_id)? else {
        return Ok(None);
    };

    let metadata = store.metadata()?;
    let meta = metadata.get(book_id);
    let global_id = meta.and_then(|m| m.global_id);
    let chapters = store
        .book_structure(book_id)?
        .map(|s| s.chapters)
        .unwrap_or_default();

    Ok(Some(BookView {
        id: book.id.clone(),
        english_title: meta.map(|m| m.english_title.clone()).unwrap_or_default(),
        arabic_title: meta.map(|m| m.arabic_title.clone()).unwrap_or_default(),
        vol: meta.map(|m| m.vol).unwrap_or_default(),
        global_id,
        quarter: global_id.and_then(Quarter::from_global_id),
        tokens: reader::tokenize(&book.raw_text)
            .into_iter()
            .map(str::to_string)
            .collect(),
        overlay: reader::overlay(&book.verses),
        verses: book.verses.clone(),
        chapters,
    }))
}

/// The token stream alone, for clients that already hold the overlay.
pub fn book_tokens(store: &CorpusStore, book_id: &str) -> Result<Option<Vec<String>>, TafsirError> {
    Ok(store.book(book_id)?.map(|book| {
        reader::tokenize(&book.raw_text)
            .into_iter()
            .map(str::to_string)
            .collect()
    }))
}
