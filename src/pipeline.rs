//! The two entry points of the tool: building a vocabulary (optionally
//! followed by translation) and translating with an existing vocabulary.
//!
//! Both stage the SMILES records of the input file into a temporary file that
//! is handed to a [TokenBackend] and removed once the run finishes, whether it
//! succeeded or not.

use std::path::Path;

use log::{debug, info};
use tempfile::{NamedTempFile, TempPath};

use crate::{
    assert_path_exists, build_data_tmp, check_output_path, smi_data_iter,
    tokenize::TokenizeFn, Config, Error, VocabMode,
};

/// The vocabulary and translation steps of the pipeline. Both operate on
/// files: the staged SMILES records, the vocabulary, and the id output.
pub trait TokenBackend {
    /// Produce a vocabulary for the records in `data_path` at `vocab_path`.
    fn get_vocabulary(
        &self,
        data_path: &Path,
        vocab_path: &Path,
        mode: VocabMode,
    ) -> Result<(), Error>;

    /// Write the token ids of every line in `data_path` to `out_path` using
    /// the vocabulary at `vocab_path`. Returns the number of lines written.
    fn data_to_token_ids(
        &self,
        data_path: &Path,
        out_path: &Path,
        vocab_path: &Path,
        tokenizer: TokenizeFn,
        normalize_digits: bool,
    ) -> Result<usize, Error>;
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Number of SMILES records staged from the input.
    pub records: usize,

    /// Number of lines written to the id file, if translation ran.
    pub translated: Option<usize>,
}

/// Acquire the staging path for this run. `tmp_path` is used as given when it
/// is set, but it is still deleted when the returned guard is dropped. For
/// that reason it must not name an existing file, which also keeps the input
/// file from being staged over.
fn staging_path(tmp_path: Option<&Path>) -> Result<TempPath, Error> {
    match tmp_path {
        Some(path) => {
            if path.exists() {
                return Err(Error::StagingExists(path.to_owned()));
            }
            check_output_path(path)?;
            Ok(TempPath::from_path(path))
        }
        None => NamedTempFile::new()
            .map(NamedTempFile::into_temp_path)
            .map_err(Error::Staging),
    }
}

/// Stage the records of `config.smi_path`. The staged file lives as long as
/// the returned guard.
fn stage(config: &Config) -> Result<(TempPath, usize), Error> {
    let tmp = staging_path(config.tmp_path.as_deref())?;
    info!("creating temp file {:?}", &*tmp);
    let records = build_data_tmp(smi_data_iter(&config.smi_path)?, &tmp)?;
    info!("staged {records} SMILES from {:?}", config.smi_path);
    Ok((tmp, records))
}

/// Build the vocabulary for `config.smi_path` at `config.vocab_path`,
/// replacing any existing one, then translate the input to token ids if
/// `config.out_path` is set.
///
/// # Panics
/// If `config.smi_path` does not exist.
pub fn build_vocab(
    config: Config,
    backend: &impl TokenBackend,
) -> Result<RunSummary, Error> {
    assert_path_exists(&config.smi_path);
    check_output_path(&config.vocab_path)?;
    if let Some(out) = &config.out_path {
        check_output_path(out)?;
    }

    let (tmp, records) = stage(&config)?;

    info!("building vocabulary {:?}", config.vocab_path);
    backend.get_vocabulary(&tmp, &config.vocab_path, VocabMode::Rebuild)?;

    let translated = match &config.out_path {
        Some(out) => {
            info!("translating vocabulary to tokens in {out:?}");
            let n = backend.data_to_token_ids(
                &tmp,
                out,
                &config.vocab_path,
                config.tokenizer.tokenizer(),
                false,
            )?;
            Some(n)
        }
        None => {
            debug!("no output path, skipping translation");
            None
        }
    };

    Ok(RunSummary {
        records,
        translated,
    })
}

/// Translate `config.smi_path` to token ids in `config.out_path` using the
/// vocabulary at `config.vocab_path`.
///
/// # Panics
/// If either `config.smi_path` or `config.vocab_path` does not exist.
pub fn translate_tokens(
    config: Config,
    backend: &impl TokenBackend,
) -> Result<RunSummary, Error> {
    let out = config.out_path.as_deref().ok_or(Error::MissingOutPath)?;
    assert_path_exists(&config.smi_path);
    assert_path_exists(&config.vocab_path);
    check_output_path(out)?;

    let (tmp, records) = stage(&config)?;

    info!("reading vocabulary {:?}", config.vocab_path);
    backend.get_vocabulary(&tmp, &config.vocab_path, VocabMode::Reuse)?;

    info!("translating vocabulary to tokens in {out:?}");
    let n = backend.data_to_token_ids(
        &tmp,
        out,
        &config.vocab_path,
        config.tokenizer.tokenizer(),
        false,
    )?;

    Ok(RunSummary {
        records,
        translated: Some(n),
    })
}
