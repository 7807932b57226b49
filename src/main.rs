use std::path::PathBuf;
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use log::warn;
use structopt::StructOpt;
use url::Url;

use wikicorpus::{CatalogSource, Config, Crawler, CorpusSink, CorpusWriter, DefaultExtractor};

#[allow(missing_docs)]
#[derive(Debug, StructOpt)]
#[structopt(name = "wikicorpus", about = "Wiki article scraping and corpus building.")]
enum App {
    #[structopt(
        name = "crawl",
        about = "Crawl the articles listed by the remote catalog."
    )]
    Crawl {
        #[structopt(flatten)]
        opts: Opts,
    },
    #[structopt(name = "cached", about = "Crawl the articles of stored listing files.")]
    Cached {
        #[structopt(
            name = "lists",
            help = "The stored listing files, processed in order.",
            parse(from_os_str),
            required = true
        )]
        lists: Vec<PathBuf>,
        #[structopt(flatten)]
        opts: Opts,
    },
}

impl App {
    async fn run(self) -> anyhow::Result<()> {
        let (catalog, opts) = match self {
            App::Crawl { opts } => (CatalogSource::Remote, opts),
            App::Cached { lists, opts } => (CatalogSource::CachedFiles(lists), opts),
        };

        let mut crawler = Crawler::<DefaultExtractor>::builder(opts.base_url.clone())?
            .config(opts.as_config())
            .catalog(catalog)
            .build()
            .await?;

        let mut sink = CorpusWriter::create(&opts.output)?;

        let bar = ProgressBar::new(crawler.total() as u64);
        bar.set_style(ProgressStyle::default_bar().template("{bar:40} {pos}/{len} {msg}"));

        let mut written = 0usize;
        while let Some(record) = crawler.next_record().await {
            match record {
                Ok(record) => {
                    sink.append(&record)?;
                    written += 1;
                }
                Err(error) => warn!("skipping article: {}", error),
            }
            bar.set_position(crawler.processed() as u64);
        }
        bar.set_position(crawler.processed() as u64);
        bar.finish();

        println!(
            "{} articles written to {} ({} references processed)",
            written,
            opts.output.display(),
            crawler.processed()
        );
        Ok(())
    }
}

#[derive(Debug, Clone, StructOpt)]
pub struct Opts {
    #[structopt(
        long = "base-url",
        help = "The base url of the wiki.",
        default_value = "http://marvel.wikia.com/"
    )]
    base_url: Url,
    #[structopt(
        long = "output",
        short = "o",
        help = "The corpus file to write.",
        parse(from_os_str),
        default_value = "corpus.txt"
    )]
    output: PathBuf,
    #[structopt(
        long = "general-limit",
        help = "Max. number of references to list for the general category."
    )]
    general_limit: Option<usize>,
    #[structopt(
        long = "character-limit",
        help = "Max. number of references to list for the character category."
    )]
    character_limit: Option<usize>,
    #[structopt(long = "timeout", help = "Request timeout in seconds.")]
    timeout: Option<u64>,
    #[structopt(long = "user-agent", help = "The user-agent used for requests.")]
    user_agent: Option<String>,
    #[structopt(
        long = "success-only",
        help = "Whether to accept only 2XX responses."
    )]
    http_success_only: Option<bool>,
}

impl Opts {
    fn as_config(&self) -> Config {
        let mut config = Config::builder();
        if let Some(general_limit) = self.general_limit {
            config = config.general_limit(general_limit);
        }
        if let Some(character_limit) = self.character_limit {
            config = config.character_limit(character_limit);
        }
        if let Some(timeout) = self.timeout {
            config = config.request_timeout(Duration::from_secs(timeout));
        }
        if let Some(user_agent) = self.user_agent.clone() {
            config = config.browser_user_agent(user_agent);
        }
        if let Some(http_success_only) = self.http_success_only {
            config = config.http_success_only(http_success_only);
        }

        config.build()
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init();
    Ok(App::from_args().run().await?)
}
