#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use vcfalign::{PipelineConfig, ReferenceSource, RunSummary, VcfPipeline};

/// Set to rewrite expected outputs under `tests/snapshots/` from the current run.
const UPDATE_VAR: &str = "VCFALIGN_UPDATE_SNAPSHOTS";

fn tests_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests")
}

pub fn data_path(name: &str) -> PathBuf {
    tests_dir().join("data").join(name)
}

pub fn read_data(name: &str) -> String {
    let path = data_path(name);
    fs::read_to_string(&path).unwrap_or_else(|_| panic!("fixture {:?} not found", path))
}

/// Run the pipeline over an in-memory VCF and return the text it wrote.
pub fn run_pipeline<S: ReferenceSource>(
    source: S,
    config: PipelineConfig,
    input: &str,
) -> (String, RunSummary) {
    let mut pipeline = VcfPipeline::new(source, config);
    let mut output = Vec::new();
    let summary = pipeline
        .run(input.as_bytes(), &mut output)
        .expect("pipeline run succeeds");
    (
        String::from_utf8(output).expect("output is UTF-8"),
        summary,
    )
}

/// Run the pipeline and compare its output with `tests/snapshots/<name>`.
pub fn assert_pipeline_snapshot<S: ReferenceSource>(
    source: S,
    config: PipelineConfig,
    input: &str,
    name: &str,
) -> RunSummary {
    let (output, summary) = run_pipeline(source, config, input);
    assert_snapshot(name, &output);
    summary
}

/// Compare VCF text with a stored snapshot record by record, ignoring CRLF.
pub fn assert_snapshot(name: &str, actual: &str) {
    let path = tests_dir().join("snapshots").join(name);
    if std::env::var_os(UPDATE_VAR).is_some() {
        fs::create_dir_all(path.parent().expect("snapshot has a parent")).unwrap();
        fs::write(&path, actual).unwrap();
        return;
    }

    let expected = fs::read_to_string(&path)
        .unwrap_or_else(|_| panic!("snapshot {:?} missing; run with {UPDATE_VAR}=1", path));
    let expected: Vec<&str> = expected.lines().collect();
    let actual: Vec<&str> = actual.lines().collect();
    for (index, (want, got)) in expected.iter().zip(&actual).enumerate() {
        assert_eq!(got, want, "{name}: line {} differs", index + 1);
    }
    assert_eq!(
        actual.len(),
        expected.len(),
        "{name}: expected {} lines, got {}",
        expected.len(),
        actual.len()
    );
}
