use std::fs;
use std::path::{Path, PathBuf};

use reqwest::Client;
use serde::Deserialize;
use url::Url;

use anyhow::{Context, Result};

use crate::error::CorpusError;

/// Path of the article listing endpoint, relative to the base url.
pub const LIST_ENDPOINT: &str = "api/v1/Articles/List/";

/// Category holding non-character articles of the continuity.
pub const GENERAL_CATEGORY: &str = "Earth-616";

/// Category holding the character articles.
pub const CHARACTER_CATEGORY: &str = "Earth-616_Characters";

/// One catalog entry identifying an article to scrape.
#[derive(Debug, Clone, Deserialize)]
pub struct Reference {
    /// The article id.
    pub id: u64,
    /// The article title, usually carrying a parenthetical disambiguator.
    pub title: String,
    /// Path of the article page, relative to the base url.
    pub url: String,
}

/// The `items` envelope the listing endpoint and the cached files share.
#[derive(Debug, Deserialize)]
struct Listing {
    items: Vec<Reference>,
}

/// Where the reference list comes from.
#[derive(Debug, Clone)]
pub enum CatalogSource {
    /// Query the wiki's listing endpoint, general category first, then
    /// characters.
    Remote,
    /// Load previously stored listings from disk, in argument order.
    CachedFiles(Vec<PathBuf>),
}

impl Default for CatalogSource {
    fn default() -> Self {
        CatalogSource::Remote
    }
}

impl CatalogSource {
    /// Resolve the full, ordered reference list.
    pub async fn references(
        &self,
        client: &Client,
        base_url: &Url,
        general_limit: usize,
        character_limit: usize,
    ) -> Result<Vec<Reference>> {
        match self {
            CatalogSource::Remote => {
                let mut references =
                    list_category(client, base_url, GENERAL_CATEGORY, general_limit).await?;
                references
                    .extend(list_category(client, base_url, CHARACTER_CATEGORY, character_limit).await?);
                Ok(references)
            }
            CatalogSource::CachedFiles(paths) => {
                let mut references = Vec::new();
                for path in paths {
                    references.extend(load_cached(path)?);
                }
                Ok(references)
            }
        }
    }
}

/// Query the listing endpoint for one category.
pub async fn list_category(
    client: &Client,
    base_url: &Url,
    category: &str,
    limit: usize,
) -> Result<Vec<Reference>> {
    let url = base_url
        .join(LIST_ENDPOINT)
        .with_context(|| format!("Invalid listing endpoint on {}", base_url))?;

    let resp = client
        .get(url.clone())
        .query(&[("limit", limit.to_string())])
        .query(&[("category", category)])
        .send()
        .await
        .map_err(|error| CorpusError::RequestFailure {
            url: url.clone(),
            error,
        })
        .with_context(|| format!("Failed to list category {:?}", category))?;

    if !resp.status().is_success() {
        return Err(CorpusError::NoHttpSuccess {
            status: resp.status(),
            url: url.clone(),
        })
        .with_context(|| format!("Unsuccessful listing request for category {:?}", category));
    }

    let listing: Listing = resp
        .json()
        .await
        .map_err(|error| CorpusError::MalformedCatalog {
            url: url.clone(),
            error,
        })
        .with_context(|| format!("Failed to decode listing for category {:?}", category))?;

    Ok(listing.items)
}

/// Load a stored listing, the same `items` schema the endpoint returns.
pub fn load_cached<T: AsRef<Path>>(path: T) -> Result<Vec<Reference>> {
    let path = path.as_ref();
    let raw = fs::read_to_string(path)
        .with_context(|| format!("Failed to read cached listing {}", path.display()))?;
    let listing: Listing = serde_json::from_str(&raw)
        .with_context(|| format!("Cached listing {} is malformed", path.display()))?;
    Ok(listing.items)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn listing_schema() {
        let raw = r#"{
            "items": [
                {"id": 1, "title": "Anthony Stark (Earth-616)", "url": "/wiki/Anthony_Stark_(Earth-616)"},
                {"id": 2, "title": "Avengers (Earth-616)", "url": "/wiki/Avengers_(Earth-616)"}
            ],
            "basepath": "http://marvel.wikia.com"
        }"#;

        let listing: Listing = serde_json::from_str(raw).unwrap();
        assert_eq!(listing.items.len(), 2);
        assert_eq!(listing.items[0].id, 1);
        assert_eq!(listing.items[0].title, "Anthony Stark (Earth-616)");
        assert_eq!(listing.items[1].url, "/wiki/Avengers_(Earth-616)");
    }

    #[test]
    fn cached_listing_roundtrip() {
        let path = std::env::temp_dir().join("wikicorpus-cached-listing-test.json");
        fs::write(
            &path,
            r#"{"items": [{"id": 9, "title": "Hulk (Earth-616)", "url": "/wiki/Hulk"}]}"#,
        )
        .unwrap();

        let references = load_cached(&path).unwrap();
        assert_eq!(references.len(), 1);
        assert_eq!(references[0].id, 9);

        fs::remove_file(&path).ok();
    }
}
