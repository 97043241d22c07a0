#[path = "common/mod.rs"]
mod common;
use common::{assert_pipeline_snapshot, data_path, read_data, run_pipeline};
use vcfalign::{FastaScanner, PipelineConfig, ReferenceStore};

#[test]
fn standardize_matches_golden() {
    let reference = FastaScanner::from_path(data_path("reference.fa")).expect("open reference");
    let summary = assert_pipeline_snapshot(
        reference,
        PipelineConfig::standardize(),
        &read_data("mixed.vcf"),
        "standardize/mixed.vcf",
    );
    assert_eq!(summary.headers, 3);
    assert_eq!(summary.written, 7);
    assert_eq!(summary.expanded, 2);
    assert_eq!(summary.unsupported, 1);
    assert_eq!(summary.skipped_missing, 1);
}

#[test]
fn align_matches_golden() {
    let reference = ReferenceStore::from_path(data_path("reference.fa")).expect("load reference");
    let summary = assert_pipeline_snapshot(
        reference,
        PipelineConfig::align(),
        &read_data("mixed.vcf"),
        "align/mixed.vcf",
    );
    assert_eq!(summary.shifted, 6);
    assert_eq!(summary.unchanged, 0);
}

#[test]
fn scanner_and_store_agree() {
    let input = read_data("mixed.vcf");
    let scanner = FastaScanner::from_path(data_path("reference.fa")).expect("open reference");
    let store = ReferenceStore::from_path(data_path("reference.fa")).expect("load reference");

    let (scanned, _) = run_pipeline(scanner, PipelineConfig::standardize(), &input);
    let (preloaded, _) = run_pipeline(store, PipelineConfig::standardize(), &input);
    assert_eq!(scanned, preloaded);
}
