pub mod config;
pub mod error;
pub mod keys;
pub mod normalize;
pub mod pipeline;
pub mod record;
pub mod source;
pub mod writer;

use config::Config;
use error::{Result, Stage, XrefError};
use pipeline::{MatchFilterPipeline, RunSummary};
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;
use tracing::info;
use writer::{PendingOutput, ResultWriter};

/// Loads the product numbers in `keys_path`, scans the IMP export at
/// `imp_path` and writes the matching descriptions to `output_path`.
///
/// Both inputs are opened before the output is created, and the output only
/// appears once every row has been written.
pub fn cross_reference(
    keys_path: &Path,
    imp_path: &Path,
    output_path: &Path,
    config: &Config,
) -> Result<RunSummary> {
    let keys = keys::load_keys(keys_path, config.skip_key_header)?;
    info!(path = %keys_path.display(), count = keys.len(), "loaded product numbers");

    let imp = File::open(imp_path).map_err(|source| XrefError::SourceUnavailable {
        stage: Stage::DataProcessing,
        path: imp_path.to_path_buf(),
        source,
    })?;

    let output = PendingOutput::create(output_path)?;
    let sink = ResultWriter::new(BufWriter::new(output.file()), config.output_encoding).map_err(
        |source| XrefError::OutputWrite {
            path: output.path().to_path_buf(),
            source,
        },
    )?;

    let (summary, _) = MatchFilterPipeline::new(&keys, BufReader::new(imp), sink)
        .with_paths(imp_path, output_path)
        .run()?;
    output.commit()?;
    Ok(summary)
}
