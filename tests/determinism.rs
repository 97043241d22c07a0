#[path = "common/mod.rs"]
mod common;

use std::collections::HashSet;

use blake3::hash;
use common::{data_path, read_data, run_pipeline};
use vcfalign::{FastaScanner, PipelineConfig, ReferenceStore};

#[test]
fn standardize_output_is_deterministic() {
    let input = read_data("mixed.vcf");

    let mut fingerprints = HashSet::new();
    for _ in 0..5 {
        let reference = ReferenceStore::from_path(data_path("reference.fa")).expect("load reference");
        let (vcf, _) = run_pipeline(reference, PipelineConfig::standardize(), &input);
        fingerprints.insert(hash(vcf.as_bytes()));
    }

    assert_eq!(fingerprints.len(), 1, "outputs diverged across runs");
}

#[test]
fn shuffled_chromosome_order_gives_the_same_records() {
    let input = read_data("mixed.vcf");
    let (header, records): (Vec<&str>, Vec<&str>) =
        input.lines().partition(|line| line.starts_with('#'));
    let (chr1, rest): (Vec<&str>, Vec<&str>) =
        records.into_iter().partition(|line| line.starts_with("chr1\t"));
    let reordered: String = header
        .iter()
        .chain(&rest)
        .chain(&chr1)
        .map(|line| format!("{line}\n"))
        .collect();

    let scanner = FastaScanner::from_path(data_path("reference.fa")).expect("open reference");
    let (sorted, _) = run_pipeline(scanner, PipelineConfig::standardize(), &input);
    let scanner = FastaScanner::from_path(data_path("reference.fa")).expect("open reference");
    let (shuffled, summary) = run_pipeline(scanner, PipelineConfig::standardize(), &reordered);

    let fingerprint = |vcf: &str| {
        let mut lines: Vec<&str> = vcf.lines().collect();
        lines.sort_unstable();
        hash(lines.join("\n").as_bytes())
    };
    assert_eq!(fingerprint(&sorted), fingerprint(&shuffled));
    assert_eq!(summary.out_of_order, 1);
}
