//! Print the tokens of the SMILES strings given on the command line, and their
//! ids if a vocabulary is provided. Handy for checking the tokenizer rules
//! against a vocabulary before translating a whole data set.

use clap::Parser;
use smitok::{norm_path, tokenize::TokenizerKind, vocab::Vocabulary, Error};

#[derive(Parser)]
struct Cli {
    /// The SMILES strings to tokenize.
    #[arg(required = true)]
    smiles: Vec<String>,

    /// How to split the input into tokens.
    #[arg(short, long, value_enum, default_value = "smiles")]
    tokenizer: TokenizerKind,

    /// A vocabulary file for looking up token ids.
    #[arg(short, long = "vocab_path", alias = "vocab-path")]
    vocab_path: Option<String>,
}

fn main() -> Result<(), Error> {
    env_logger::init();

    let cli = Cli::parse();
    let vocab = cli
        .vocab_path
        .map(|p| Vocabulary::load(norm_path(&p)))
        .transpose()?;
    let tokenizer = cli.tokenizer.tokenizer();

    for smiles in &cli.smiles {
        let tokens = tokenizer(smiles);
        println!("{smiles}\t{}", tokens.join(" "));
        if let Some(vocab) = &vocab {
            let ids: Vec<_> = vocab
                .encode(smiles, tokenizer, false)
                .iter()
                .map(u32::to_string)
                .collect();
            println!("{smiles}\t{}", ids.join(" "));
        }
    }

    Ok(())
}
