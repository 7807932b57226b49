use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

/// One article's serialized block in the output file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CorpusRecord {
    /// The catalog id of the article.
    pub id: u64,
    /// The display name.
    pub name: String,
    /// Normalized content, newline separated sentences.
    pub content: String,
}

/// Where corpus records end up.
///
/// The crawl loop only talks to this trait, so tests can collect records in
/// memory instead of touching the filesystem.
pub trait CorpusSink {
    fn append(&mut self, record: &CorpusRecord) -> Result<()>;
}

/// In-memory sink, used as a test double.
impl CorpusSink for Vec<CorpusRecord> {
    fn append(&mut self, record: &CorpusRecord) -> Result<()> {
        self.push(record.clone());
        Ok(())
    }
}

/// Writes corpus records as sequential text blocks: id line, name line, the
/// content block, then a blank separator line.
#[derive(Debug)]
pub struct CorpusWriter<W: Write> {
    out: W,
}

impl CorpusWriter<BufWriter<File>> {
    /// Create the corpus file, truncating whatever a previous run left
    /// behind. All subsequent writes append.
    pub fn create<T: AsRef<Path>>(path: T) -> Result<Self> {
        let path: PathBuf = path.as_ref().to_path_buf();
        let file = File::create(&path)
            .with_context(|| format!("Failed to create corpus file {}", path.display()))?;
        Ok(Self::from_writer(BufWriter::new(file)))
    }
}

impl<W: Write> CorpusWriter<W> {
    pub fn from_writer(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> CorpusSink for CorpusWriter<W> {
    fn append(&mut self, record: &CorpusRecord) -> Result<()> {
        writeln!(self.out, "{}", record.id)?;
        writeln!(self.out, "{}", record.name)?;
        writeln!(self.out, "{}", record.content)?;
        writeln!(self.out)?;
        self.out.flush()?;
        Ok(())
    }
}
