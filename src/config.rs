use std::fs::read_to_string;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::{error::Error, tokenize::TokenizerKind};

/// The SMILES file read when neither the command line nor a config file name
/// one.
pub const DEFAULT_SMI_PATH: &str = "data/logp/logp.smi";

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// The file of SMILES strings to read as input, one molecule per line.
    /// Only the first whitespace-separated field of each line is used.
    pub smi_path: PathBuf,

    /// Where to stage the extracted SMILES strings. If unset, a system
    /// temporary file is used. Either way the file is removed at the end of
    /// the run, so an existing file at this path is refused.
    pub tmp_path: Option<PathBuf>,

    /// The vocabulary to build, or to read when only translating.
    pub vocab_path: PathBuf,

    /// Where to write the token ids. Optional when building the vocabulary,
    /// required otherwise.
    pub out_path: Option<PathBuf>,

    /// Build the vocabulary (and translate if `out_path` is set) instead of
    /// only translating.
    pub build_vocab: bool,

    /// Tokenizer used to count tokens for the vocabulary and to split records
    /// during translation.
    pub tokenizer: TokenizerKind,

    /// The maximum number of vocabulary entries, including the reserved
    /// tokens.
    pub max_vocab_size: Option<usize>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            smi_path: PathBuf::from(DEFAULT_SMI_PATH),
            tmp_path: None,
            vocab_path: PathBuf::new(),
            out_path: None,
            build_vocab: false,
            tokenizer: TokenizerKind::default(),
            max_vocab_size: None,
        }
    }
}

impl Config {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, Error> {
        let path = path.as_ref();
        let s = read_to_string(path).map_err(Error::read(path))?;
        toml::from_str(&s).map_err(|e| Error::Config {
            path: path.to_owned(),
            source: Box::new(e),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load() {
        let got = Config::load("testfiles/build.toml").unwrap();
        let want = Config {
            smi_path: "testfiles/logp.smi".into(),
            tmp_path: None,
            vocab_path: "output/vocab.txt".into(),
            out_path: Some("output/logp.tok".into()),
            build_vocab: true,
            tokenizer: TokenizerKind::Smiles,
            max_vocab_size: Some(128),
        };
        assert_eq!(got, want);
    }

    #[test]
    fn defaults() {
        let got: Config = toml::from_str("").unwrap();
        assert_eq!(got, Config::default());
        assert_eq!(got.smi_path, Path::new(DEFAULT_SMI_PATH));
    }

    #[test]
    fn unknown_field() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.toml");
        std::fs::write(&path, "smiles = \"x\"\n").unwrap();
        assert!(matches!(Config::load(&path), Err(Error::Config { .. })));
    }
}
