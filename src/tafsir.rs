//! Surah and ayah lookups over the cached tafsir index

use crate::error::TafsirError;
use crate::model::{Ayah, Surah};
use crate::reader;
use crate::store::CorpusStore;
use serde::Serialize;

/// Ids are small positive integers stored as strings; comparisons must be
/// numeric, not lexicographic ("2" sorts before "10"). Unparseable ids go
/// last.
fn numeric_id(id: &str) -> u64 {
    id.parse().unwrap_or(u64::MAX)
}

#[derive(Debug, Clone, Serialize)]
pub struct SurahSummary {
    pub id: String,
    pub name: String,
    pub tname: String,
    pub ename: String,
    pub ayahs: u32,
    pub matches_count: usize,
}

/// All surahs in ascending numeric order, each annotated with the total
/// number of commentary matches across its ayahs.
pub fn surahs(store: &CorpusStore) -> Result<Vec<SurahSummary>, TafsirError> {
    let index = store.tafsir_index()?;
    let mut out: Vec<SurahSummary> = index
        .iter()
        .map(|(id, surah)| SurahSummary {
            id: id.clone(),
            name: surah.name.clone(),
            tname: surah.tname.clone(),
            ename: surah.ename.clone(),
            ayahs: surah.ayahs,
            matches_count: surah.verses.values().map(|a| a.matches.len()).sum(),
        })
        .collect();
    out.sort_by_key(|s| numeric_id(&s.id));
    Ok(out)
}

pub fn surah(store: &CorpusStore, id: &str) -> Result<Option<Surah>, TafsirError> {
    Ok(store.tafsir_index()?.get(id).cloned())
}

pub fn ayah(
    store: &CorpusStore,
    surah_id: &str,
    ayah_id: &str,
) -> Result<Option<Ayah>, TafsirError> {
    Ok(store
        .tafsir_index()?
        .get(surah_id)
        .and_then(|s| s.verses.get(ayah_id))
        .cloned())
}

#[derive(Debug, Clone, Serialize)]
pub struct AyahSummary {
    pub id: String,
    pub text: String,
    pub matches_count: usize,
}

/// One surah shaped for the verse listing: ayahs in ascending numeric
/// order with their match counts.
#[derive(Debug, Clone, Serialize)]
pub struct SurahView {
    pub id: String,
    pub name: String,
    pub tname: String,
    pub ename: String,
    pub ayahs: u32,
    pub verses: Vec<AyahSummary>,
}

pub fn surah_view(store: &CorpusStore, id: &str) -> Result<Option<SurahView>, TafsirError> {
    let index = store.tafsir_index()?;
    let Some(surah) = index.get(id) else {
        return Ok(None);
    };
    let mut verses: Vec<AyahSummary> = surah
        .verses
        .iter()
        .map(|(ayah_id, ayah)| AyahSummary {
            id: ayah_id.clone(),
            text: ayah.text.clone(),
            matches_count: ayah.matches.len(),
        })
        .collect();
    verses.sort_by_key(|a| numeric_id(&a.id));
    Ok(Some(SurahView {
        id: id.to_string(),
        name: surah.name.clone(),
        tname: surah.tname.clone(),
        ename: surah.ename.clone(),
        ayahs: surah.ayahs,
        verses,
    }))
}

/// One ayah with at least one commentary match, for the flattened index.
#[derive(Debug, Clone, Serialize)]
pub struct PlusEntry {
    pub surah_id: String,
    pub ayah_id: String,
    pub surah_name: String,
    pub surah_ename: String,
    pub text: String,
    pub translation: String,
    pub matches_count: usize,
}

/// Every `(surah, ayah)` pair with at least one match, annotated with its
/// translation, ascending by `(numeric surah id, numeric ayah id)`.
pub fn tafsir_plus(store: &CorpusStore) -> Result<Vec<PlusEntry>, TafsirError> {
    let index = store.tafsir_index()?;
    let mut entries = Vec::new();
    for (surah_id, surah) in index.iter() {
        for (ayah_id, ayah) in surah.verses.iter() {
            if ayah.matches.is_empty() {
                continue;
            }
            entries.push(PlusEntry {
                surah_id: surah_id.clone(),
                ayah_id: ayah_id.clone(),
                surah_name: surah.name.clone(),
                surah_ename: surah.ename.clone(),
                text: ayah.text.clone(),
                translation: store.translation(surah_id, ayah_id)?,
                matches_count: ayah.matches.len(),
            });
        }
    }
    entries.sort_by_key(|e| (numeric_id(&e.surah_id), numeric_id(&e.ayah_id)));
    Ok(entries)
}

/// A commentary match enriched for display: book titles joined from
/// metadata plus a context snippet from the book text.
#[derive(Debug, Clone, Serialize)]
pub struct CommentaryExcerpt {
    pub book_id: String,
    pub vol: u32,
    pub english_title: String,
    pub arabic_title: String,
    pub word_start: usize,
    pub word_end: usize,
    pub verse_in_text: String,
    pub translation: String,
    pub snippet: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct AyahView {
    pub surah_id: String,
    pub ayah_id: String,
    pub surah_name: String,
    pub surah_ename: String,
    pub text: String,
    pub translation: String,
    pub matches: Vec<CommentaryExcerpt>,
}

/// The full commentary page for one ayah.
pub fn ayah_view(
    store: &CorpusStore,
    surah_id: &str,
    ayah_id: &str,
) -> Result<Option<AyahView>, TafsirError> {
    let index = store.tafsir_index()?;
    let Some(surah) = index.get(surah_id) else {
        return Ok(None);
    };
    let Some(ayah) = surah.verses.get(ayah_id) else {
        return Ok(None);
    };

    let metadata = store.metadata()?;
    let mut matches = Vec::with_capacity(ayah.matches.len());
    for m in &ayah.matches {
        let meta = metadata.get(&m.book_id);
        matches.push(CommentaryExcerpt {
            book_id: m.book_id.clone(),
            vol: m.vol,
            english_title: meta
                .map(|b| b.english_title.clone())
                .filter(|t| !t.is_empty())
                .unwrap_or_else(|| fallback_title(&m.book_id)),
            arabic_title: meta.map(|b| b.arabic_title.clone()).unwrap_or_default(),
            word_start: m.word_start,
            word_end: m.word_end,
            verse_in_text: m.verse_in_text.clone(),
            translation: m.translation.clone(),
            snippet: store.snippet(
                &m.book_id,
                m.word_start,
                m.word_end,
                reader::DEFAULT_CONTEXT_WORDS,
            )?,
        });
    }

    Ok(Some(AyahView {
        surah_id: surah_id.to_string(),
        ayah_id: ayah_id.to_string(),
        surah_name: surah.name.clone(),
        surah_ename: surah.ename.clone(),
        text: ayah.text.clone(),
        translation: store.translation(surah_id, ayah_id)?,
        matches,
    }))
}

/// Display title derived from a book id like "vol1_Vol1-book-1.doc" when
/// metadata has no entry for it.
fn fallback_title(book_id: &str) -> String {
    book_id
        .split('_')
        .skip(1)
        .collect::<Vec<_>>()
        .join(" ")
        .replace(".doc", "")
}
