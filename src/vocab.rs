//! Building, persisting, and applying token vocabularies.
//!
//! A vocabulary file holds one token per line and the line number is the token
//! id. The first four lines are always the reserved tokens in
//! [START_VOCAB].

use std::{
    borrow::Cow,
    collections::HashMap,
    fs::File,
    io::{BufRead, BufReader, BufWriter, Write},
    path::Path,
};

use log::{debug, info, warn};

use crate::{
    error::Error,
    tokenize::{normalize_digits, TokenizeFn},
};

pub const PAD: &str = "_PAD";
pub const GO: &str = "_GO";
pub const EOS: &str = "_EOS";
pub const UNK: &str = "_UNK";

pub const START_VOCAB: [&str; 4] = [PAD, GO, EOS, UNK];

pub const PAD_ID: u32 = 0;
pub const GO_ID: u32 = 1;
pub const EOS_ID: u32 = 2;
pub const UNK_ID: u32 = 3;

/// Report progress every this many lines while counting or translating.
const PROGRESS_EVERY: usize = 100_000;

#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub enum VocabMode {
    /// Build a fresh vocabulary and overwrite whatever is at the vocabulary
    /// path.
    #[default]
    Rebuild,
    /// Load the vocabulary at the path if there is one, building it only when
    /// it is missing.
    Reuse,
}

#[derive(Debug, PartialEq)]
pub struct Vocabulary {
    tokens: Vec<String>,
    index: HashMap<String, u32>,
}

impl Vocabulary {
    /// Assign every token its position as id. A repeated token keeps the id
    /// of its first occurrence, but later tokens still get their own position.
    fn from_tokens(tokens: Vec<String>) -> Self {
        let mut index = HashMap::new();
        for (id, tok) in tokens.iter().enumerate() {
            index.entry(tok.clone()).or_insert(id as u32);
        }
        Self { tokens, index }
    }

    /// Count the tokens of every line in `lines` and rank them by descending
    /// frequency after the reserved tokens. Ties keep the order in which the
    /// tokens were first seen. If `max_size` is given, the vocabulary
    /// (reserved tokens included) is truncated to that many entries, but never
    /// below the reserved tokens themselves.
    pub fn build<I, S>(
        lines: I,
        tokenizer: TokenizeFn,
        normalize: bool,
        max_size: Option<usize>,
    ) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        // (token, count) in first-seen order, with a lookup into it
        let mut counts: Vec<(String, usize)> = Vec::new();
        let mut seen: HashMap<String, usize> = HashMap::new();
        for (i, line) in lines.into_iter().enumerate() {
            if i > 0 && i % PROGRESS_EVERY == 0 {
                info!("processing line {i}");
            }
            for tok in tokenizer(line.as_ref()) {
                let tok = if normalize {
                    normalize_digits(tok)
                } else {
                    tok.to_owned()
                };
                match seen.get(&tok) {
                    Some(&idx) => counts[idx].1 += 1,
                    None => {
                        seen.insert(tok.clone(), counts.len());
                        counts.push((tok, 1));
                    }
                }
            }
        }

        // sort_by is stable, so equal counts stay in first-seen order
        counts.sort_by(|a, b| b.1.cmp(&a.1));
        debug!("counted {} distinct tokens", counts.len());

        let mut tokens: Vec<String> =
            START_VOCAB.iter().map(|s| s.to_string()).collect();
        tokens.extend(
            counts
                .into_iter()
                .map(|(tok, _)| tok)
                .filter(|tok| !START_VOCAB.contains(&tok.as_str())),
        );
        if let Some(max) = max_size {
            if max < START_VOCAB.len() {
                warn!(
                    "max vocabulary size {max} is smaller than the {} reserved \
                     tokens, keeping only those",
                    START_VOCAB.len()
                );
            }
            tokens.truncate(max.max(START_VOCAB.len()));
        }
        Self::from_tokens(tokens)
    }

    /// Read a vocabulary file written by [Vocabulary::save]. Each line is
    /// trimmed and its line number is the token's id. A repeated token keeps
    /// the id of its first line.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, Error> {
        let path = path.as_ref();
        let f = File::open(path).map_err(Error::read(path))?;
        let mut tokens = Vec::new();
        for line in BufReader::new(f).lines() {
            let line = line.map_err(Error::read(path))?;
            tokens.push(line.trim().to_owned());
        }
        if tokens.iter().all(|t| t.is_empty()) {
            return Err(Error::InvalidVocabulary(path.to_owned()));
        }
        Ok(Self::from_tokens(tokens))
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), Error> {
        let path = path.as_ref();
        let f = File::create(path).map_err(Error::write(path))?;
        let mut out = BufWriter::new(f);
        for tok in &self.tokens {
            writeln!(out, "{tok}").map_err(Error::write(path))?;
        }
        out.flush().map_err(Error::write(path))
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn id(&self, token: &str) -> Option<u32> {
        self.index.get(token).copied()
    }

    pub fn token(&self, id: u32) -> Option<&str> {
        self.tokens.get(id as usize).map(String::as_str)
    }

    /// Translate `line` into token ids, mapping anything outside of the
    /// vocabulary to [UNK_ID].
    pub fn encode(
        &self,
        line: &str,
        tokenizer: TokenizeFn,
        normalize: bool,
    ) -> Vec<u32> {
        tokenizer(line)
            .into_iter()
            .map(|tok| {
                let tok = if normalize {
                    Cow::Owned(normalize_digits(tok))
                } else {
                    Cow::Borrowed(tok)
                };
                self.id(&tok).unwrap_or(UNK_ID)
            })
            .collect()
    }

    /// The inverse of [Vocabulary::encode], up to unknown tokens. Ids past the
    /// end of the vocabulary decode to [UNK].
    pub fn decode(&self, ids: &[u32]) -> Vec<&str> {
        ids.iter().map(|&id| self.token(id).unwrap_or(UNK)).collect()
    }
}

fn read_lines(path: &Path) -> Result<Vec<String>, Error> {
    let f = File::open(path).map_err(Error::read(path))?;
    BufReader::new(f)
        .lines()
        .collect::<Result<_, _>>()
        .map_err(Error::read(path))
}

/// Build a vocabulary from the lines of `data_path` and write it to
/// `vocab_path`, replacing any existing file.
pub fn create_vocabulary(
    data_path: impl AsRef<Path>,
    vocab_path: impl AsRef<Path>,
    tokenizer: TokenizeFn,
    normalize: bool,
    max_size: Option<usize>,
) -> Result<Vocabulary, Error> {
    let data_path = data_path.as_ref();
    let vocab_path = vocab_path.as_ref();
    info!("creating vocabulary {vocab_path:?} from data {data_path:?}");
    let lines = read_lines(data_path)?;
    let vocab = Vocabulary::build(&lines, tokenizer, normalize, max_size);
    vocab.save(vocab_path)?;
    info!("wrote {} tokens to {vocab_path:?}", vocab.len());
    Ok(vocab)
}

/// Produce the vocabulary for `data_path` at `vocab_path` according to `mode`.
pub fn get_vocabulary(
    data_path: impl AsRef<Path>,
    vocab_path: impl AsRef<Path>,
    mode: VocabMode,
    tokenizer: TokenizeFn,
    max_size: Option<usize>,
) -> Result<Vocabulary, Error> {
    let vocab_path = vocab_path.as_ref();
    if mode == VocabMode::Reuse && vocab_path.exists() {
        debug!("reusing vocabulary at {vocab_path:?}");
        return Vocabulary::load(vocab_path);
    }
    create_vocabulary(data_path, vocab_path, tokenizer, false, max_size)
}

/// Write the token ids for each line of `data_path` to `target_path`, one
/// space-separated line per input line. Returns the number of lines written.
pub fn data_to_token_ids(
    data_path: impl AsRef<Path>,
    target_path: impl AsRef<Path>,
    vocab: &Vocabulary,
    tokenizer: TokenizeFn,
    normalize: bool,
) -> Result<usize, Error> {
    let data_path = data_path.as_ref();
    let target_path = target_path.as_ref();
    info!("tokenizing data in {data_path:?}");

    let f = File::open(data_path).map_err(Error::read(data_path))?;
    let out = File::create(target_path).map_err(Error::write(target_path))?;
    let mut out = BufWriter::new(out);

    let mut count = 0;
    for line in BufReader::new(f).lines() {
        let line = line.map_err(Error::read(data_path))?;
        count += 1;
        if count % PROGRESS_EVERY == 0 {
            info!("tokenizing line {count}");
        }
        let ids: Vec<String> = vocab
            .encode(&line, tokenizer, normalize)
            .iter()
            .map(u32::to_string)
            .collect();
        writeln!(out, "{}", ids.join(" ")).map_err(Error::write(target_path))?;
    }
    out.flush().map_err(Error::write(target_path))?;

    Ok(count)
}

/// The [TokenBackend](crate::TokenBackend) used by the binaries: vocabularies
/// and id files live on disk and are produced by the functions in this module.
#[derive(Clone, Debug, Default)]
pub struct FileBackend {
    /// Tokenizer used to count tokens when building a vocabulary.
    pub tokenizer: crate::tokenize::TokenizerKind,
    pub max_vocab_size: Option<usize>,
}

impl crate::TokenBackend for FileBackend {
    fn get_vocabulary(
        &self,
        data_path: &Path,
        vocab_path: &Path,
        mode: VocabMode,
    ) -> Result<(), Error> {
        get_vocabulary(
            data_path,
            vocab_path,
            mode,
            self.tokenizer.tokenizer(),
            self.max_vocab_size,
        )
        .map(|_| ())
    }

    fn data_to_token_ids(
        &self,
        data_path: &Path,
        out_path: &Path,
        vocab_path: &Path,
        tokenizer: TokenizeFn,
        normalize_digits: bool,
    ) -> Result<usize, Error> {
        let vocab = Vocabulary::load(vocab_path)?;
        data_to_token_ids(data_path, out_path, &vocab, tokenizer, normalize_digits)
    }
}
