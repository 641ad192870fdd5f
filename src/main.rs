use std::path::PathBuf;

use clap::Parser;
use log::{info, trace};
use smitok::{
    build_vocab, norm_path, tokenize::TokenizerKind, translate_tokens,
    vocab::FileBackend, Config, Error,
};

/// Prepare SMILES data for sequence-to-sequence training: build a token
/// vocabulary and translate molecules into token ids.
#[derive(Parser)]
struct Cli {
    /// A TOML file providing defaults for any of the options below. Flags
    /// given on the command line take precedence.
    #[arg(short, long)]
    config: Option<String>,

    /// The SMILES file to read, one molecule per line. Anything after the
    /// first whitespace-separated field is ignored. Defaults to
    /// data/logp/logp.smi.
    #[arg(long = "smi_path", alias = "smi-path")]
    smi_path: Option<String>,

    /// Where to stage the extracted SMILES. If unset, a named temporary file
    /// will be used. The path must not exist yet, and it is removed when the
    /// run finishes.
    #[arg(long = "tmp_path", alias = "tmp-path")]
    tmp_path: Option<String>,

    /// The vocabulary to build, or to read when only translating.
    #[arg(long = "vocab_path", alias = "vocab-path")]
    vocab_path: Option<String>,

    /// Where to write the token ids, one line per molecule.
    #[arg(long = "out_path", alias = "out-path")]
    out_path: Option<String>,

    /// Build the vocabulary and then translate, instead of only translating
    /// with an existing vocabulary.
    #[arg(long = "build_vocab", alias = "build-vocab")]
    build_vocab: bool,

    /// How to split molecules into tokens.
    #[arg(long, value_enum)]
    tokenizer: Option<TokenizerKind>,

    /// The maximum number of vocabulary entries, including the four reserved
    /// tokens.
    #[arg(long = "max_vocab_size", alias = "max-vocab-size")]
    max_vocab_size: Option<usize>,
}

impl Cli {
    /// merge the command line over the config file, if any, and the defaults
    fn into_config(self) -> Result<Config, Error> {
        let mut config = match &self.config {
            Some(path) => {
                trace!("loading config from {path}");
                Config::load(norm_path(path))?
            }
            None => Config::default(),
        };
        let path = |s: String| -> PathBuf { norm_path(&s) };
        if let Some(p) = self.smi_path {
            config.smi_path = path(p);
        }
        if let Some(p) = self.tmp_path.filter(|p| !p.is_empty()) {
            config.tmp_path = Some(path(p));
        }
        if let Some(p) = self.vocab_path {
            config.vocab_path = path(p);
        }
        if let Some(p) = self.out_path.filter(|p| !p.is_empty()) {
            config.out_path = Some(path(p));
        }
        config.build_vocab |= self.build_vocab;
        if let Some(t) = self.tokenizer {
            config.tokenizer = t;
        }
        if self.max_vocab_size.is_some() {
            config.max_vocab_size = self.max_vocab_size;
        }
        Ok(config)
    }
}

fn main() -> Result<(), Error> {
    env_logger::init();

    let config = Cli::parse().into_config()?;
    trace!("running with {config:?}");

    let backend = FileBackend {
        tokenizer: config.tokenizer,
        max_vocab_size: config.max_vocab_size,
    };

    let summary = if config.build_vocab {
        build_vocab(config, &backend)?
    } else {
        translate_tokens(config, &backend)?
    };

    match summary.translated {
        Some(n) => info!("staged {} molecules, wrote {n} lines", summary.records),
        None => info!("staged {} molecules", summary.records),
    }

    Ok(())
}
