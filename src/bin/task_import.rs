//! Converts a foreign task export into a normalized task fixture.
//!
//! Usage:
//!
//! ```text
//! task_import <input-json> <output-json>
//! ```
//!
//! The input file must serialize an array of foreign task groups, e.g.:
//!
//! ```json
//! [
//!   {
//!     "date": "2026-03-02",
//!     "tasks": [
//!       {
//!         "taskInstanceId": "instance-1",
//!         "title": "Morning survey",
//!         "taskType": "scheduled",
//!         "expireTime": "2026-03-02T08:30:00Z",
//!         "actions": [{"entityRef": "q-7"}]
//!       }
//!     ]
//!   }
//! ]
//! ```
//!
//! The output file receives the normalized internal task records as
//! pretty-printed JSON. The conversion itself never fails on malformed
//! optional fields; only I/O and top-level parse problems abort the run.

use mockable::DefaultClock;
use std::env;
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::sync::Arc;
use taskstream::import::domain::ForeignTaskGroup;
use taskstream::import::services::TaskImporter;
use taskstream::task::domain::Task;
use thiserror::Error;

/// Boxed error type for the main result.
type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Errors that can occur while converting a foreign export.
#[derive(Debug, Error)]
enum ImportError {
    #[error("invalid arguments: {0}")]
    InvalidArgs(String),
    #[error("failed to read input '{path}': {source}")]
    InputRead {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse input '{path}': {source}")]
    InputParse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to write output '{path}': {source}")]
    OutputWrite {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to serialize output: {0}")]
    OutputSerialize(#[source] serde_json::Error),
}

fn main() -> Result<(), BoxError> {
    run(env::args().skip(1)).map_err(Into::into)
}

fn run(args: impl Iterator<Item = String>) -> Result<(), ImportError> {
    let (input_path, output_path) = parse_args(args)?;
    let groups = load_groups(&input_path)?;
    let importer = TaskImporter::new(Arc::new(DefaultClock));
    let tasks = importer.convert_groups(&groups);
    write_fixture(&output_path, &tasks)
}

fn parse_args(mut args: impl Iterator<Item = String>) -> Result<(String, String), ImportError> {
    let input_path = args
        .next()
        .ok_or_else(|| ImportError::InvalidArgs("missing input path argument".into()))?;
    let output_path = args
        .next()
        .ok_or_else(|| ImportError::InvalidArgs("missing output path argument".into()))?;
    if let Some(extra) = args.next() {
        return Err(ImportError::InvalidArgs(format!(
            "unexpected extra argument: {extra}"
        )));
    }
    Ok((input_path, output_path))
}

fn load_groups(path: &str) -> Result<Vec<ForeignTaskGroup>, ImportError> {
    let file = File::open(path).map_err(|source| ImportError::InputRead {
        path: path.to_owned(),
        source,
    })?;
    serde_json::from_reader(BufReader::new(file)).map_err(|source| ImportError::InputParse {
        path: path.to_owned(),
        source,
    })
}


fn write_fixture(path: &str, tasks: &[Task]) -> Result<(), ImportError> {
    let file = File::create(path).map_err(|source| ImportError::OutputWrite {
        path: path.to_owned(),
        source,
    })?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, tasks).map_err(ImportError::OutputSerialize)?;
    writeln!(writer).map_err(|source| ImportError::OutputWrite {
        path: path.to_owned(),
        source,
    })?;
    writer.flush().map_err(|source| ImportError::OutputWrite {
        path: path.to_owned(),
        source,
    })
}
