//! Tokenizers for splitting staged SMILES records into vocabulary tokens.

use std::sync::LazyLock;

use regex::Regex;
use serde::Deserialize;

/// Atom-level SMILES pattern. Bracket atoms come first so their contents are
/// never split, and the two-letter halogens have to precede the bare `B` and
/// `C`. The trailing `\S` keeps any character outside the organic subset as a
/// token of its own so it can be mapped to the unknown id later instead of
/// silently vanishing.
const SMILES_PATTERN: &str = r"(\[[^\]]+\]|Br?|Cl?|N|O|S|P|F|I|b|c|n|o|s|p|\(|\)|\.|=|#|-|\+|\\|/|:|~|@|\?|>|\*|\$|%[0-9]{2}|[0-9]|\S)";

static SMILES_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(SMILES_PATTERN).unwrap());

/// The signature shared by every tokenizer handed to the translation step.
pub type TokenizeFn = fn(&str) -> Vec<&str>;

/// Split a SMILES string into atoms, bonds, branches, and ring labels.
/// Whitespace is dropped.
pub fn smile_tokenizer(smiles: &str) -> Vec<&str> {
    SMILES_RE.find_iter(smiles).map(|m| m.as_str()).collect()
}

/// One token per non-whitespace character
pub fn char_tokenizer(line: &str) -> Vec<&str> {
    line.char_indices()
        .filter(|(_, c)| !c.is_whitespace())
        .map(|(i, c)| &line[i..i + c.len_utf8()])
        .collect()
}

pub fn whitespace_tokenizer(line: &str) -> Vec<&str> {
    line.split_whitespace().collect()
}

/// Replace every ASCII digit in `token` with `0`. Ring-closure labels are
/// chemically meaningful, so the SMILES pipeline never turns this on.
pub fn normalize_digits(token: &str) -> String {
    token
        .chars()
        .map(|c| if c.is_ascii_digit() { '0' } else { c })
        .collect()
}

#[derive(
    Clone, Copy, Debug, Default, Deserialize, PartialEq, Eq, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum TokenizerKind {
    #[default]
    Smiles,
    Char,
    Whitespace,
}

impl TokenizerKind {
    pub fn tokenizer(self) -> TokenizeFn {
        match self {
            TokenizerKind::Smiles => smile_tokenizer,
            TokenizerKind::Char => char_tokenizer,
            TokenizerKind::Whitespace => whitespace_tokenizer,
        }
    }
}
