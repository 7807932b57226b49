pub use article::ArticleDetails;
pub use catalog::{CatalogSource, Reference};
pub use corpus::{CorpusRecord, CorpusSink, CorpusWriter};
pub use crawler::{Config, Crawler, CrawlerBuilder, CrawlSummary};
pub use error::CorpusError;
pub use extract::{DefaultExtractor, Extractor, Paragraph};
pub use vocab::MweVocabulary;

pub mod article;
pub mod catalog;
pub mod clean;
pub mod corpus;
pub mod crawler;
mod error;
pub mod extract;
pub mod text;
pub mod vocab;

/// Rexported to implement custom extractors.
pub use select;
