use smitok::{
    tokenize::{char_tokenizer, smile_tokenizer},
    vocab::Vocabulary,
};

fn main() {
    divan::main();
}

const PEPTIDE: &str = "[H]C1=C(C([H])([H])[C@@]([H])(C(=O)N([H])[C@@]2([H])C(=O)\
N([H])[C@@]([H])(C([H])([H])c3c([H])nc([H])c([H])c3[H])C(=O)N([H])[C@]([H])\
(C([H])([H])C3=C([H])N([H])c4c([H])c([H])c([H])c([H])c43)C(=O)N([H])[C@@]([H])\
(C([H])([H])C([H])([H])C([H])([H])C([H])([H])N([H])[H])C(=O)N([H])[C@@]([H])\
(C([H])([H])[C@]([H])(C([H])([H])[H])C([H])([H])S3=C([H])C([H])([H])C([H])([H])\
C3([H])[H])C(=O)N([H])[C@]([H])(C(=O)N([H])[C@]([H])(C(=O)N([H])[H])C([H])([H])\
c3c([H])c([H])c4c([H])c([H])c([H])c([H])c4c3[H])C([H])([H])SSC2([H])[H])N([H])\
[H])c2c([H])c([H])c([H])c([H])c2N1[H]";

#[divan::bench(args = ["CCO", "c1ccccc1Cl", PEPTIDE])]
fn smiles(s: &str) -> usize {
    smile_tokenizer(divan::black_box(s)).len()
}

#[divan::bench(args = ["CCO", "c1ccccc1Cl", PEPTIDE])]
fn chars(s: &str) -> usize {
    char_tokenizer(divan::black_box(s)).len()
}

#[divan::bench]
fn encode(bencher: divan::Bencher) {
    let vocab = Vocabulary::build([PEPTIDE], smile_tokenizer, false, None);
    bencher.bench(|| vocab.encode(divan::black_box(PEPTIDE), smile_tokenizer, false));
}
