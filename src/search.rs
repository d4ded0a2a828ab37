use tracing::{debug, info};

use crate::CatalogStore;
use crate::error::{CatalogError, Result};
use crate::models::{AudioId, ListItem, WebpageId};
use crate::normalizer::contains_text;
use crate::query::extract_search_token;

/// Answers text lookups from the search fields of the UI.
///
/// Raw input is reduced to its search token (the label of a `label | id`
/// selection, or the whole trimmed text) and rejected if it holds no
/// English or Hebrew text, before any query runs.
///
/// # Examples
///
/// ```
/// use yesod::{CatalogStore, Database, NewAudioEntry, SearchOrchestrator};
///
/// # fn main() -> yesod::Result<()> {
/// let store = CatalogStore::new(Database::in_memory()?);
/// let id = store.create_audio_entry(&NewAudioEntry::new("book", "סֵפֶר"))?;
///
/// let search = SearchOrchestrator::new(&store);
/// let results = search.search_audio("ספר")?;
/// assert_eq!(results[0].id, id);
/// # Ok(())
/// # }
/// ```
pub struct SearchOrchestrator<'a> {
    store: &'a CatalogStore,
}

impl<'a> SearchOrchestrator<'a> {
    pub fn new(store: &'a CatalogStore) -> Self {
        Self { store }
    }

    /// Finds audio entries whose English, Hebrew or unvocalized Hebrew
    /// contains the token. An empty result is a normal outcome.
    pub fn search_audio(&self, raw_input: &str) -> Result<Vec<ListItem<AudioId>>> {
        let token = search_token(raw_input)?;
        let results = self.store.find_audio_by_text(&token)?;
        info!(token = %token, matches = results.len(), "searched audio entries");
        Ok(results)
    }

    /// Finds webpages whose topic contains the token.
    pub fn search_webpages(&self, raw_input: &str) -> Result<Vec<ListItem<WebpageId>>> {
        let token = search_token(raw_input)?;
        let results = self.store.find_webpages_by_topic(&token)?;
        info!(token = %token, matches = results.len(), "searched webpages");
        Ok(results)
    }

    /// Returns the webpages linked to an audio entry.
    pub fn webpages_for_audio(&self, audio_id: AudioId) -> Result<Vec<ListItem<WebpageId>>> {
        self.store.get_audio_detail(audio_id)?;
        self.store.webpages_for_audio(audio_id)
    }

    /// Returns the audio entries linked to a webpage.
    pub fn audio_for_webpage(&self, url_id: WebpageId) -> Result<Vec<ListItem<AudioId>>> {
        self.store.get_webpage(url_id)?;
        self.store.audio_for_webpage(url_id)
    }
}

fn search_token(raw_input: &str) -> Result<String> {
    let token = extract_search_token(raw_input);
    debug!(raw = raw_input, token = %token, "extracted search token");
    if contains_text(&token) {
        Ok(token)
    } else {
        Err(CatalogError::validation("search text"))
    }
}
