use std::{
    env,
    fs::File,
    io::{BufRead, BufReader, BufWriter, Lines, Write},
    path::{Path, PathBuf},
    sync::LazyLock,
};

use log::debug;
use regex::{Captures, Regex};

pub mod config;
pub mod error;
pub mod pipeline;
pub mod tokenize;
pub mod vocab;

pub use config::Config;
pub use error::Error;
pub use pipeline::{build_vocab, translate_tokens, RunSummary, TokenBackend};
pub use vocab::VocabMode;

/// create `dir` and any missing parents. an existing directory is not an
/// error, and neither is the empty path of a bare file name
pub fn mkdirp(dir: impl AsRef<Path>) -> Result<(), Error> {
    let dir = dir.as_ref();
    std::fs::create_dir_all(dir).map_err(|source| Error::CreateDir {
        path: dir.to_owned(),
        source,
    })
}

/// make sure the directory containing the file at `path` exists and return it
pub fn check_output_path(path: impl AsRef<Path>) -> Result<PathBuf, Error> {
    let dir = path.as_ref().parent().unwrap_or(Path::new("")).to_owned();
    mkdirp(&dir)?;
    Ok(dir)
}

/// panics if nothing exists at `path`
pub fn assert_path_exists(path: impl AsRef<Path>) {
    let path = path.as_ref();
    assert!(path.exists(), "Path does not exist: {}", path.display());
}

static VAR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$(?:\{(\w+)\}|(\w+))").unwrap());

/// expand `$VAR` and `${VAR}` references and then a leading `~` in `path`.
/// unset variables are left as written
pub fn norm_path(path: &str) -> PathBuf {
    let expanded = VAR_RE.replace_all(path, |caps: &Captures<'_>| {
        let name = caps.get(1).or_else(|| caps.get(2)).map_or("", |m| m.as_str());
        env::var(name).unwrap_or_else(|_| caps[0].to_owned())
    });
    if let Some(rest) = expanded.strip_prefix('~') {
        if rest.is_empty() || rest.starts_with('/') {
            if let Ok(home) = env::var("HOME") {
                return PathBuf::from(format!("{home}{rest}"));
            }
        }
    }
    PathBuf::from(&*expanded)
}

/// iterator over the SMILES records of a file, see [smi_data_iter]
pub struct SmiLines {
    path: PathBuf,
    lines: Lines<BufReader<File>>,
}

impl Iterator for SmiLines {
    type Item = Result<String, Error>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let line = match self.lines.next()? {
                Ok(line) => line,
                Err(e) => return Some(Err(Error::read(&self.path)(e))),
            };
            // blank lines have no first field
            if let Some(smiles) = line.split_whitespace().next() {
                return Some(Ok(smiles.to_owned()));
            }
        }
    }
}

/// lazily read the SMILES records from `path`: the first whitespace-separated
/// field of every non-blank line, in file order
pub fn smi_data_iter(path: impl AsRef<Path>) -> Result<SmiLines, Error> {
    let path = path.as_ref();
    let f = File::open(path).map_err(Error::read(path))?;
    Ok(SmiLines {
        path: path.to_owned(),
        lines: BufReader::new(f).lines(),
    })
}

/// write each record in `data` to `path` on its own line, truncating any
/// existing file, and return the number of records written
pub fn build_data_tmp<I>(data: I, path: impl AsRef<Path>) -> Result<usize, Error>
where
    I: IntoIterator<Item = Result<String, Error>>,
{
    let path = path.as_ref();
    let f = File::create(path).map_err(Error::write(path))?;
    let mut out = BufWriter::new(f);
    let mut count = 0;
    for smiles in data {
        writeln!(out, "{}", smiles?).map_err(Error::write(path))?;
        count += 1;
    }
    out.flush().map_err(Error::write(path))?;
    debug!("staged {count} records in {path:?}");
    Ok(count)
}

#[cfg(test)]
mod tests {
    use std::fs::{read_to_string, write};

    use super::*;

    #[test]
    fn read_smiles() {
        let got: Vec<_> = smi_data_iter("testfiles/logp.smi")
            .unwrap()
            .collect::<Result<_, _>>()
            .unwrap();
        assert_eq!(got, vec!["CCO", "CCN", "c1ccccc1Cl", "CC(=O)O"]);
    }

    #[test]
    fn read_missing() {
        assert!(matches!(
            smi_data_iter("testfiles/missing.smi"),
            Err(Error::Read { .. })
        ));
    }

    #[test]
    fn stage_skips_blank_lines() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("in.smi");
        let staged = dir.path().join("staged");
        write(&input, "CCO 0.5\n\nCCN 1.2\n").unwrap();
        write(&staged, "left over from a previous run\n").unwrap();

        let n = build_data_tmp(smi_data_iter(&input).unwrap(), &staged).unwrap();
        assert_eq!(n, 2);
        assert_eq!(read_to_string(&staged).unwrap(), "CCO\nCCN\n");
    }

    #[test]
    fn stage_records_match_lines() {
        let dir = tempfile::tempdir().unwrap();
        let staged = dir.path().join("staged");
        let input = read_to_string("testfiles/logp.smi").unwrap();
        let want: Vec<_> = input
            .lines()
            .filter(|l| !l.trim().is_empty())
            .map(|l| l.split_whitespace().next().unwrap())
            .collect();

        let n =
            build_data_tmp(smi_data_iter("testfiles/logp.smi").unwrap(), &staged)
                .unwrap();
        assert_eq!(n, want.len());
        let got = read_to_string(&staged).unwrap();
        assert_eq!(got.lines().collect::<Vec<_>>(), want);
    }

    #[test]
    fn stage_propagates_errors() {
        let dir = tempfile::tempdir().unwrap();
        let data = vec![
            Ok("CCO".to_owned()),
            Err(Error::MissingOutPath),
            Ok("CCN".to_owned()),
        ];
        assert!(build_data_tmp(data, dir.path().join("staged")).is_err());
    }

    #[test]
    fn mkdirp_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a/b/c");
        mkdirp(&path).unwrap();
        mkdirp(&path).unwrap();
        assert!(path.is_dir());
        mkdirp("").unwrap();
    }

    #[test]
    fn output_parent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out/vocab.txt");
        let got = check_output_path(&path).unwrap();
        assert_eq!(got, dir.path().join("out"));
        assert!(got.is_dir());
        assert!(!path.exists());

        assert_eq!(check_output_path("vocab.txt").unwrap(), Path::new(""));
    }

    #[test]
    #[should_panic(expected = "Path does not exist: testfiles/missing.smi")]
    fn assert_missing() {
        assert_path_exists("testfiles/missing.smi");
    }

    #[test]
    fn assert_present() {
        assert_path_exists("testfiles/logp.smi");
    }

    #[test]
    fn expand_paths() {
        env::set_var("SMITOK_TEST_DATA", "/data/smiles");
        assert_eq!(
            norm_path("$SMITOK_TEST_DATA/logp.smi"),
            Path::new("/data/smiles/logp.smi")
        );
        assert_eq!(
            norm_path("${SMITOK_TEST_DATA}/x"),
            Path::new("/data/smiles/x")
        );
        assert_eq!(
            norm_path("$SMITOK_TEST_UNSET/x"),
            Path::new("$SMITOK_TEST_UNSET/x")
        );
        assert_eq!(norm_path("a~b"), Path::new("a~b"));
        if let Ok(home) = env::var("HOME") {
            assert_eq!(norm_path("~/vocab"), Path::new(&home).join("vocab"));
        }
    }
}
