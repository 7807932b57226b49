use std::collections::VecDeque;
use std::time::Duration;

use futures::stream::Stream;
use log::{debug, warn};
use reqwest::header::{HeaderMap, USER_AGENT};
use reqwest::{Client, IntoUrl, Url};
use select::document::Document;

use anyhow::{anyhow, Context, Result};

use crate::article::ArticleDetails;
use crate::catalog::{CatalogSource, Reference};
use crate::clean;
use crate::corpus::{CorpusRecord, CorpusSink};
use crate::error::CorpusError;
use crate::extract::{DefaultExtractor, Extractor};
use crate::text;
use crate::vocab::MweVocabulary;

/// Base url of the wiki the defaults are tuned for.
pub const DEFAULT_BASE_URL: &str = "http://marvel.wikia.com/";

#[derive(Debug)]
pub struct Crawler<TExtractor: Extractor = DefaultExtractor> {
    /// The [`reqwest::Client`] that drives requests.
    client: Client,
    /// Url the reference paths resolve against.
    pub base_url: Url,
    /// The [`crate::Extractor`] used for content retrieval.
    ///
    /// Default is [`crate::DefaultExtractor`].
    pub extractor: TExtractor,
    /// Multi word expressions shared by every article of this run.
    ///
    /// Seeded from the reference titles, grown from anchor phrases while
    /// articles are processed, in reference list order.
    vocabulary: MweVocabulary,
    /// References not yet processed, in catalog order.
    pending: VecDeque<Reference>,
    /// Number of references taken off the list so far.
    processed: usize,
    /// Total number of references of this run.
    total: usize,
    /// Configuration for the crawl.
    config: Config,
}

impl<TExtractor: Extractor> Crawler<TExtractor> {
    /// Convenience method for creating a new [`CrawlerBuilder`]
    ///
    /// Same as calling [`CrawlerBuilder::new`]
    #[inline]
    pub fn builder<T: IntoUrl>(url: T) -> Result<CrawlerBuilder> {
        CrawlerBuilder::new(url)
    }

    /// Total number of references of this run.
    #[inline]
    pub fn total(&self) -> usize {
        self.total
    }

    /// Number of references taken off the list so far, including skipped and
    /// failed ones.
    #[inline]
    pub fn processed(&self) -> usize {
        self.processed
    }

    /// The vocabulary in its current growth state.
    #[inline]
    pub fn vocabulary(&self) -> &MweVocabulary {
        &self.vocabulary
    }

    /// Process references in catalog order until one yields a corpus record
    /// or the list is exhausted.
    ///
    /// Articles without usable content are skipped silently. A fetch or
    /// parse failure is returned to the caller, the reference is consumed
    /// and the crawl can continue with the next call.
    pub async fn next_record(&mut self) -> Option<Result<CorpusRecord, CorpusError>> {
        while let Some(reference) = self.pending.pop_front() {
            self.processed += 1;
            debug!(
                "processing {}/{}: {:?}",
                self.processed, self.total, reference.title
            );
            match self.process_reference(&reference).await {
                Ok(Some(record)) => return Some(Ok(record)),
                Ok(None) => debug!("no usable content for {:?}, skipped", reference.title),
                Err(error) => return Some(Err(error)),
            }
        }
        None
    }

    /// Drive the whole crawl into the sink.
    ///
    /// Per-reference failures are logged and skipped so a single bad page
    /// does not abort a long crawl. Sink failures are fatal.
    pub async fn run(&mut self, sink: &mut dyn CorpusSink) -> Result<CrawlSummary> {
        let mut written = 0usize;
        let mut failed = 0usize;

        while let Some(record) = self.next_record().await {
            match record {
                Ok(record) => {
                    sink.append(&record)
                        .context("Failed to append to the corpus")?;
                    written += 1;
                }
                Err(error) => {
                    failed += 1;
                    warn!("skipping article: {}", error);
                }
            }
        }

        Ok(CrawlSummary {
            processed: self.processed,
            written,
            failed,
        })
    }

    /// Turn the crawler into a lazy stream of corpus records.
    pub fn into_stream(self) -> impl Stream<Item = Result<CorpusRecord, CorpusError>> {
        futures::stream::unfold(self, |mut crawler| async move {
            crawler.next_record().await.map(|record| (record, crawler))
        })
    }

    async fn process_reference(
        &mut self,
        reference: &Reference,
    ) -> Result<Option<CorpusRecord>, CorpusError> {
        let url = self.base_url.join(&reference.url).map_err(|error| {
            CorpusError::InvalidArticlePath {
                path: reference.url.clone(),
                error,
            }
        })?;

        let doc = Crawler::get_document(&self.client, url, self.config.http_success_only).await?;

        let name = self
            .extractor
            .title(&doc)
            .unwrap_or_else(|| clean::strip_parenthetical(&reference.title));
        let paragraphs = self.extractor.paragraphs(&doc);
        let content = text::normalize(&paragraphs, &mut self.vocabulary);

        let details = ArticleDetails {
            id: reference.id,
            name,
            content,
        };
        Ok(details.into_record())
    }
}

impl Crawler {
    pub(crate) async fn get_document(
        client: &Client,
        url: Url,
        http_success_only: bool,
    ) -> Result<Document, CorpusError> {
        let resp = client
            .get(url.clone())
            .send()
            .await
            .map_err(|error| CorpusError::RequestFailure {
                url: url.clone(),
                error,
            })?;

        if http_success_only && !resp.status().is_success() {
            return Err(CorpusError::NoHttpSuccess {
                status: resp.status(),
                url,
            });
        }

        let body = resp
            .bytes()
            .await
            .map_err(|error| CorpusError::RequestFailure {
                url: url.clone(),
                error,
            })?;

        match Document::from_read(&*body) {
            Ok(doc) => Ok(doc),
            Err(_) => Err(CorpusError::ReadDocument { url, body }),
        }
    }
}

/// Counters of a finished crawl.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CrawlSummary {
    /// References taken off the list.
    pub processed: usize,
    /// Corpus records written to the sink.
    pub written: usize,
    /// References that failed with a fetch or parse error.
    pub failed: usize,
}

#[derive(Debug)]
pub struct CrawlerBuilder {
    base_url: Option<Url>,
    config: Option<Config>,
    catalog: Option<CatalogSource>,
}

impl CrawlerBuilder {
    pub fn new<T: IntoUrl>(base_url: T) -> Result<Self> {
        Ok(Self {
            base_url: Some(base_url.into_url()?),
            config: None,
            catalog: None,
        })
    }

    pub fn config(mut self, config: Config) -> Self {
        self.config = Some(config);
        self
    }

    pub fn catalog(mut self, catalog: CatalogSource) -> Self {
        self.catalog = Some(catalog);
        self
    }

    pub async fn build_with_extractor<TExtractor: Extractor>(
        self,
        extractor: TExtractor,
    ) -> Result<Crawler<TExtractor>> {
        let base_url = self
            .base_url
            .context("Base url of the wiki must be initialized.")?;

        if base_url.cannot_be_a_base() {
            return Err(anyhow!("url {:?} can not be a base url", base_url));
        }

        let config = self.config.unwrap_or_default();
        let catalog = self.catalog.unwrap_or_default();

        let mut headers = HeaderMap::with_capacity(1);
        headers.insert(
            USER_AGENT,
            config
                .browser_user_agent
                .parse()
                .context("Failed to parse user agent header.")?,
        );

        let client = Client::builder()
            .timeout(config.request_timeout)
            .default_headers(headers)
            .build()?;

        let references = catalog
            .references(
                &client,
                &base_url,
                config.general_limit,
                config.character_limit,
            )
            .await
            .context("Failed to resolve the reference list")?;

        let mut vocabulary = MweVocabulary::new();
        vocabulary.seed_from_titles(references.iter().map(|reference| reference.title.as_str()));

        let total = references.len();

        Ok(Crawler {
            client,
            base_url,
            extractor,
            vocabulary,
            pending: references.into(),
            processed: 0,
            total,
            config,
        })
    }

    pub async fn build(self) -> Result<Crawler> {
        self.build_with_extractor(Default::default()).await
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Max. number of references to list for the general category.
    general_limit: usize,
    /// Max. number of references to list for the character category.
    character_limit: usize,
    /// The user-agent used for requests.
    browser_user_agent: String,
    /// Timeout for requests.
    request_timeout: Duration,
    /// Whether to accept only 2XX responses.
    http_success_only: bool,
}

impl Config {
    /// Default timeout for requests made inside `wikicorpus`.
    pub const DEFAULT_REQUEST_TIMEOUT_SEC: u64 = 7;

    /// Default limit for the general category listing.
    pub const DEFAULT_GENERAL_LIMIT: usize = 10_000;

    /// Default limit for the character category listing.
    pub const DEFAULT_CHARACTER_LIMIT: usize = 25_000;

    /// Default user agent for `wikicorpus`.
    #[inline]
    pub(crate) fn user_agent() -> String {
        format!("wikicorpus/{}", env!("CARGO_PKG_VERSION"))
    }

    /// Convenience method to create a [`ConfigBuilder`]
    #[inline]
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }
}

impl Default for Config {
    fn default() -> Self {
        Config::builder().build()
    }
}

#[derive(Debug, Default)]
pub struct ConfigBuilder {
    /// Max. number of references to list for the general category.
    general_limit: Option<usize>,
    /// Max. number of references to list for the character category.
    character_limit: Option<usize>,
    /// The user-agent used for requests.
    browser_user_agent: Option<String>,
    /// Timeout for requests.
    request_timeout: Option<Duration>,
    /// Whether to accept only 2XX responses.
    http_success_only: Option<bool>,
}

impl ConfigBuilder {
    pub fn general_limit(mut self, general_limit: usize) -> Self {
        self.general_limit = Some(general_limit);
        self
    }

    pub fn character_limit(mut self, character_limit: usize) -> Self {
        self.character_limit = Some(character_limit);
        self
    }

    pub fn browser_user_agent<T: ToString>(mut self, browser_user_agent: T) -> Self {
        self.browser_user_agent = Some(browser_user_agent.to_string());
        self
    }

    pub fn request_timeout(mut self, request_timeout: Duration) -> Self {
        self.request_timeout = Some(request_timeout);
        self
    }

    pub fn http_success_only(mut self, http_success_only: bool) -> Self {
        self.http_success_only = Some(http_success_only);
        self
    }

    pub fn build(self) -> Config {
        Config {
            general_limit: self.general_limit.unwrap_or(Config::DEFAULT_GENERAL_LIMIT),
            character_limit: self
                .character_limit
                .unwrap_or(Config::DEFAULT_CHARACTER_LIMIT),
            browser_user_agent: self
                .browser_user_agent
                .unwrap_or_else(Config::user_agent),
            request_timeout: self
                .request_timeout
                .unwrap_or_else(|| Duration::from_secs(Config::DEFAULT_REQUEST_TIMEOUT_SEC)),
            http_success_only: self.http_success_only.unwrap_or(true),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_defaults() {
        let config = Config::default();
        assert_eq!(config.general_limit, Config::DEFAULT_GENERAL_LIMIT);
        assert_eq!(config.character_limit, Config::DEFAULT_CHARACTER_LIMIT);
        assert_eq!(
            config.request_timeout,
            Duration::from_secs(Config::DEFAULT_REQUEST_TIMEOUT_SEC)
        );
        assert!(config.http_success_only);
        assert!(config.browser_user_agent.starts_with("wikicorpus/"));
    }

    #[test]
    fn config_overrides() {
        let config = Config::builder()
            .general_limit(50)
            .character_limit(100)
            .browser_user_agent("corpusbot/1.0")
            .request_timeout(Duration::from_secs(30))
            .http_success_only(false)
            .build();
        assert_eq!(config.general_limit, 50);
        assert_eq!(config.character_limit, 100);
        assert_eq!(config.browser_user_agent, "corpusbot/1.0");
        assert!(!config.http_success_only);
    }

    #[tokio::test]
    async fn builder_seeds_vocabulary_from_cached_catalog() {
        let path = std::env::temp_dir().join("wikicorpus-builder-test.json");
        std::fs::write(
            &path,
            r#"{"items": [
                {"id": 1, "title": "Anthony Stark (Earth-616)", "url": "/wiki/Anthony_Stark_(Earth-616)"},
                {"id": 2, "title": "Hulk (Earth-616)", "url": "/wiki/Hulk_(Earth-616)"}
            ]}"#,
        )
        .unwrap();

        let crawler = Crawler::<DefaultExtractor>::builder(DEFAULT_BASE_URL)
            .unwrap()
            .catalog(CatalogSource::CachedFiles(vec![path.clone()]))
            .build()
            .await
            .unwrap();

        assert_eq!(crawler.total(), 2);
        assert_eq!(crawler.processed(), 0);
        // "Anthony Stark" seeds a two word expression, "Hulk" does not
        assert_eq!(crawler.vocabulary().len(), 1);

        std::fs::remove_file(&path).ok();
    }

    #[tokio::test]
    async fn run_over_exhausted_list_writes_nothing() {
        let path = std::env::temp_dir().join("wikicorpus-empty-listing-test.json");
        std::fs::write(&path, r#"{"items": []}"#).unwrap();

        let mut crawler = Crawler::<DefaultExtractor>::builder(DEFAULT_BASE_URL)
            .unwrap()
            .catalog(CatalogSource::CachedFiles(vec![path.clone()]))
            .build()
            .await
            .unwrap();

        let mut sink: Vec<CorpusRecord> = Vec::new();
        let summary = crawler.run(&mut sink).await.unwrap();

        assert!(sink.is_empty());
        assert_eq!(
            summary,
            CrawlSummary {
                processed: 0,
                written: 0,
                failed: 0
            }
        );

        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn rejects_non_base_urls() {
        assert!(CrawlerBuilder::new("mailto:someone@example.com").is_err());
    }
}
