//! `docsim` CLI: scan a text file against a directory of stored documents.

use clap::{Parser, Subcommand};
use docsim::prelude::*;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about = "TF-IDF document similarity", long_about = None)]
struct Args {
  #[command(subcommand)]
  command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
  /// Compare a text file against every `.txt` document of a corpus directory.
  Scan {
    /// Directory holding the stored `.txt` documents.
    #[arg(long)]
    corpus: PathBuf,
    /// The text file to scan.
    #[arg(long)]
    file: PathBuf,
    /// Maximum number of ranked matches.
    #[arg(long)]
    limit: Option<usize>,
    /// Report scores in percent instead of fractions.
    #[arg(long)]
    percent: bool,
    /// JSON file with scan options.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Leave the corpus document with the same file name out of the matches.
    #[arg(long)]
    exclude_self: bool,
  },
  /// Print the IDF table of a corpus directory.
  Idf {
    /// Directory holding the stored `.txt` documents.
    #[arg(long)]
    corpus: PathBuf,
  },
}

fn scan(
  corpus: PathBuf,
  file: PathBuf,
  limit: Option<usize>,
  percent: bool,
  config: Option<PathBuf>,
  exclude_self: bool,
) -> Result<String, DocsimError> {
  let mut options = match config {
    Some(path) => ScanOptions::from_json_file(path)?,
    None => ScanOptions::default(),
  };
  if let Some(limit) = limit {
    options = options.limit(limit);
  }
  if percent {
    options = options.scale(ScoreScale::Percent);
  }

  let name = file
    .file_name()
    .map(|name| name.to_string_lossy().into_owned())
    .unwrap_or_default();
  if DocumentKind::from_path(&file) != DocumentKind::Text {
    return Err(DocsimError::UnsupportedDocument { name });
  }
  let bytes = std::fs::read(&file).map_err(|err| DocsimError::storage(&file, err))?;

  let snapshot = DirectoryStore::new(corpus).snapshot().inspect_err(|err| {
    tracing::warn!(error = %err, "corpus unavailable");
  })?;
  let engine = SimilarityEngine::builder().options(options).build();
  let self_id = exclude_self.then_some(name.as_str());
  let mut report = engine.scan_bytes(&snapshot, self_id, bytes);
  report.filename = Some(name);

  serde_json::to_string_pretty(&report).map_err(|err| DocsimError::Serialization(err.to_string()))
}

fn idf(corpus: PathBuf) -> Result<String, DocsimError> {
  let snapshot = DirectoryStore::new(corpus).snapshot()?;
  let index = CorpusIndex::build(&snapshot);
  serde_json::to_string_pretty(index.idf()).map_err(|err| DocsimError::Serialization(err.to_string()))
}

fn main() -> ExitCode {
  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::from_default_env())
    .with_writer(std::io::stderr)
    .init();

  let args = Args::parse();
  let output = match args.command {
    Commands::Scan {
      corpus,
      file,
      limit,
      percent,
      config,
      exclude_self,
    } => scan(corpus, file, limit, percent, config, exclude_self),
    Commands::Idf { corpus } => idf(corpus),
  };

  match output {
    Ok(json) => {
      println!("{json}");
      ExitCode::SUCCESS
    }
    Err(err) => {
      eprintln!("error: {err}");
      ExitCode::FAILURE
    }
  }
}
