//! Read-through caches over the corpus data directory
//!
//! Each resource file is loaded and parsed at most once per process
//! lifetime. A missing file degrades to an empty value at the lookup site;
//! a file that fails to parse is an error for the request that needed it,
//! never cached, and never fatal to the process.

use crate::error::TafsirError;
use crate::model::{BookMeta, BookStructure, ProcessedBook, TafsirIndex, Verse};
use crate::reader;
use anyhow::Context;
use lru::LruCache;
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

/// Far above the corpus size (40 books), so entries are never evicted in
/// practice and live for the process lifetime.
const BOOK_CACHE_CAPACITY: usize = 256;

/// Process-lifetime caches over the five corpus resources. Constructed once
/// at startup and shared by reference; nothing is mutated after a slot is
/// first populated.
pub struct CorpusStore {
    data_dir: PathBuf,
    index: Mutex<Option<Arc<TafsirIndex>>>,
    metadata: Mutex<Option<Arc<HashMap<String, BookMeta>>>>,
    structure: Mutex<Option<Arc<HashMap<String, BookStructure>>>>,
    translations: Mutex<Option<Arc<HashMap<String, String>>>>,
    books: Mutex<LruCache<String, Arc<ProcessedBook>>>,
}

impl CorpusStore {
    pub fn new(data_dir: PathBuf) -> Self {
        let capacity =
            NonZeroUsize::new(BOOK_CACHE_CAPACITY).unwrap_or(NonZeroUsize::new(1).unwrap());
        Self {
            data_dir,
            index: Mutex::new(None),
            metadata: Mutex::new(None),
            structure: Mutex::new(None),
            translations: Mutex::new(None),
            books: Mutex::new(LruCache::new(capacity)),
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// The global index: surah-id -> surah with per-ayah match lists.
    pub fn tafsir_index(&self) -> Result<Arc<TafsirIndex>, TafsirError> {
        let path = self.data_dir.join("quran_tafsir_index.json");
        cached(&self.index, || read_json_map(&path))
    }

    /// Book metadata: book-id -> titles, volume, global ordering id.
    pub fn metadata(&self) -> Result<Arc<HashMap<String, BookMeta>>, TafsirError> {
        let path = self.data_dir.join("book_metadata.json");
        cached(&self.metadata, || read_json_map(&path))
    }

    /// Table-of-contents chapters for one book; `None` when the structure
    /// file has no entry for it.
    pub fn book_structure(&self, book_id: &str) -> Result<Option<BookStructure>, TafsirError> {
        let path = self.data_dir.join("book_structure.json");
        let table = cached(&self.structure, || read_json_map(&path))?;
        Ok(table.get(book_id).cloned())
    }

    /// Translation text for one ayah; `""` when the key is absent. Distinct
    /// keys never affect each other: the whole table is parsed once and
    /// lookups are plain map reads.
    pub fn translation(&self, surah_id: &str, ayah_id: &str) -> Result<String, TafsirError> {
        let table = cached(&self.translations, || {
            let path = self.data_dir.join("translations").join("abdel_haleem.txt");
            Ok(match read_text(&path) {
                Some(raw) => parse_translation_table(&raw),
                None => HashMap::new(),
            })
        })?;
        Ok(table
            .get(&format!("{surah_id}:{ayah_id}"))
            .cloned()
            .unwrap_or_default())
    }

    /// Raw text plus verse-match list for one book; `None` when the text
    /// file is unavailable. Loaded books are kept behind an LRU so repeat
    /// reads are memory lookups.
    pub fn book(&self, book_id: &str) -> Result<Option<Arc<ProcessedBook>>, TafsirError> {
        {
            let mut cache = self.books.lock().unwrap();
            if let Some(book) = cache.get(book_id) {
                return Ok(Some(Arc::clone(book)));
            }
        }

        let Some(book) = self.load_book(book_id)? else {
            return Ok(None);
        };
        let book = Arc::new(book);
        {
            let mut cache = self.books.lock().unwrap();
            cache.put(book_id.to_string(), Arc::clone(&book));
        }
        Ok(Some(book))
    }

    /// Context excerpt around a word range; `""` when the book is
    /// unavailable.
    pub fn snippet(
        &self,
        book_id: &str,
        word_start: usize,
        word_end: usize,
        context_words: usize,
    ) -> Result<String, TafsirError> {
        Ok(match self.book(book_id)? {
            Some(book) => reader::snippet(&book.raw_text, word_start, word_end, context_words),
            None => String::new(),
        })
    }

    fn load_book(&self, book_id: &str) -> Result<Option<ProcessedBook>, TafsirError> {
        let processed = self.data_dir.join("processed");

        let Some(raw_text) = read_text(&processed.join(format!("{book_id}.txt"))) else {
            return Ok(None);
        };

        let verses_path = processed.join(format!("{book_id}_verses.json"));
        let verses: Vec<Verse> = match read_text(&verses_path) {
            Some(raw) => serde_json::from_str(&raw)
                .with_context(|| format!("failed to parse {}", verses_path.display()))
                .map_err(|e: anyhow::Error| TafsirError::Malformed(format!("{e:#}")))?,
            None => Vec::new(),
        };

        Ok(Some(ProcessedBook {
            id: book_id.to_string(),
            raw_text,
            verses,
        }))
    }
}

fn cached<T, F>(slot: &Mutex<Option<Arc<T>>>, load: F) -> Result<Arc<T>, TafsirError>
where
    F: FnOnce() -> Result<T, TafsirError>,
{
    {
        let guard = slot.lock().unwrap();
        if let Some(value) = guard.as_ref() {
            return Ok(Arc::clone(value));
        }
    }

    let value = Arc::new(load()?);
    {
        let mut guard = slot.lock().unwrap();
        *guard = Some(Arc::clone(&value));
    }
    Ok(value)
}

/// Parse a JSON map resource; a missing file is an empty map.
fn read_json_map<T>(path: &Path) -> Result<T, TafsirError>
where
    T: DeserializeOwned + Default,
{
    let Some(raw) = read_text(path) else {
        return Ok(T::default());
    };
    serde_json::from_str(&raw)
        .with_context(|| format!("failed to parse {}", path.display()))
        .map_err(|e: anyhow::Error| TafsirError::Malformed(format!("{e:#}")))
}

/// Read a file, treating anything unreadable as absent.
fn read_text(path: &Path) -> Option<String> {
    match std::fs::read_to_string(path) {
        Ok(raw) => Some(raw),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "corpus file unavailable, serving empty");
            None
        }
    }
}

/// Pipe-delimited lines `surah|ayah|text`; the text may itself contain
/// pipes, so only the first two are delimiters.
fn parse_translation_table(raw: &str) -> HashMap<String, String> {
    let mut table = HashMap::new();
    for line in raw.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let mut parts = line.splitn(3, '|');
        let (Some(surah), Some(ayah), Some(text)) = (parts.next(), parts.next(), parts.next())
        else {
            continue;
        };
        table.insert(format!("{surah}:{ayah}"), text.trim().to_string());
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    /// Fresh data directory under the system temp dir, unique per test.
    fn temp_data_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir()
            .join(format!("ihya-tafsir-store-{}-{}", name, std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(dir.join("processed")).unwrap();
        fs::create_dir_all(dir.join("translations")).unwrap();
        dir
    }

    #[test]
    fn missing_index_is_empty_map() {
        let store = CorpusStore::new(temp_data_dir("missing-index"));
        let index = store.tafsir_index().unwrap();
        assert!(index.is_empty());
        // Second call serves the cached empty map.
        assert!(store.tafsir_index().unwrap().is_empty());
    }

    #[test]
    fn malformed_index_is_an_error() {
        let dir = temp_data_dir("malformed-index");
        fs::write(dir.join("quran_tafsir_index.json"), "{ not json").unwrap();
        let store = CorpusStore::new(dir);
        match store.tafsir_index() {
            Err(TafsirError::Malformed(msg)) => {
                assert!(msg.contains("quran_tafsir_index.json"))
            }
            other => panic!("expected Malformed, got {other:?}"),
        }
    }

    #[test]
    fn translation_lookup_and_missing_keys() {
        let dir = temp_data_dir("translations");
        fs::write(
            dir.join("translations").join("abdel_haleem.txt"),
            "1|1|In the name of God.\n2|255|God: there is no god but Him | the Ever Living.\n",
        )
        .unwrap();
        let store = CorpusStore::new(dir);

        assert_eq!(store.translation("1", "1").unwrap(), "In the name of God.");
        // A pipe inside the text is part of the translation, not a delimiter.
        assert_eq!(
            store.translation("2", "255").unwrap(),
            "God: there is no god but Him | the Ever Living."
        );
        // A missing key is empty on every call; the miss does not poison
        // later lookups of present keys.
        assert_eq!(store.translation("9", "99").unwrap(), "");
        assert_eq!(store.translation("9", "99").unwrap(), "");
        assert_eq!(store.translation("1", "1").unwrap(), "In the name of God.");
    }

    #[test]
    fn book_loads_text_and_verses() {
        let dir = temp_data_dir("book-load");
        fs::write(dir.join("processed").join("vol1_book-1.txt"), "alpha beta gamma delta").unwrap();
        fs::write(
            dir.join("processed").join("vol1_book-1_verses.json"),
            r#"[{"word_start": 1, "word_end": 2, "key": "2:255"}]"#,
        )
        .unwrap();
        let store = CorpusStore::new(dir);

        let book = store.book("vol1_book-1").unwrap().expect("book present");
        assert_eq!(book.raw_text, "alpha beta gamma delta");
        assert_eq!(book.verses.len(), 1);
        assert_eq!(book.verses[0].key, "2:255");

        // Repeat read is a cache hit returning the same allocation.
        let again = store.book("vol1_book-1").unwrap().unwrap();
        assert!(Arc::ptr_eq(&book, &again));
    }

    #[test]
    fn book_without_verses_file_has_empty_match_list() {
        let dir = temp_data_dir("book-no-verses");
        fs::write(dir.join("processed").join("vol2_book-3.txt"), "just text").unwrap();
        let store = CorpusStore::new(dir);
        let book = store.book("vol2_book-3").unwrap().expect("book present");
        assert!(book.verses.is_empty());
    }

    #[test]
    fn missing_book_is_none_and_snippet_is_empty() {
        let store = CorpusStore::new(temp_data_dir("missing-book"));
        assert!(store.book("no-such-book").unwrap().is_none());
        assert_eq!(store.snippet("no-such-book", 100, 105, 10).unwrap(), "");
    }

    #[test]
    fn snippet_through_the_store() {
        let dir = temp_data_dir("snippet");
        let text = (0..120).map(|i| format!("w{i}")).collect::<Vec<_>>().join("\n");
        fs::write(dir.join("processed").join("b.txt"), text).unwrap();
        let store = CorpusStore::new(dir);

        let got = store.snippet("b", 100, 105, 10).unwrap();
        let want = (90..115).map(|i| format!("w{i}")).collect::<Vec<_>>().join(" ");
        assert_eq!(got, want);
    }

    #[test]
    fn book_structure_lookup() {
        let dir = temp_data_dir("structure");
        fs::write(
            dir.join("book_structure.json"),
            r#"{"vol1_book-1": {"chapters": [{"title": "فصل", "word_start": 40}]}}"#,
        )
        .unwrap();
        let store = CorpusStore::new(dir);

        let structure = store.book_structure("vol1_book-1").unwrap().expect("entry present");
        assert_eq!(structure.chapters.len(), 1);
        assert_eq!(structure.chapters[0].word_start, 40);
        assert!(store.book_structure("unknown").unwrap().is_none());
    }
}
