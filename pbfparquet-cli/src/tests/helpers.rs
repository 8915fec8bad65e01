//! Test helpers that lay out a PBF fixture inside a temporary workspace.

use super::*;
use base64::{Engine as _, engine::general_purpose};
use camino::{Utf8Path, Utf8PathBuf};
use std::fs;
use tempfile::TempDir;

/// Temporary directory holding `monaco.osm.pbf` and room for results.
#[derive(Debug)]
pub(super) struct Workspace {
    _dir: TempDir,
    root: Utf8PathBuf,
}

impl Workspace {
    pub(super) fn new() -> Self {
        let dir = TempDir::new().expect("tempdir");
        let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).expect("utf-8 workspace");
        fs::write(root.join("monaco.osm.pbf"), decode_fixture("relations"))
            .expect("write PBF fixture");
        Self { _dir: dir, root }
    }

    pub(super) fn root(&self) -> &Utf8Path {
        &self.root
    }

    pub(super) fn pbf(&self) -> Utf8PathBuf {
        self.root.join("monaco.osm.pbf")
    }

    pub(super) fn output_dir(&self) -> Utf8PathBuf {
        self.root.join("out")
    }
}

/// Decode one of the data crate's base64 PBF fixtures.
pub(super) fn decode_fixture(stem: &str) -> Vec<u8> {
    let path = Utf8PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("../pbfparquet-data/tests/fixtures")
        .join(format!("{stem}.osm.pbf.b64"));
    let encoded = fs::read_to_string(&path).unwrap_or_else(|err| {
        panic!("failed to read base64 fixture {path}: {err}");
    });
    let cleaned: String = encoded
        .chars()
        .filter(|ch| !ch.is_ascii_whitespace())
        .collect();
    general_purpose::STANDARD
        .decode(cleaned.as_bytes())
        .unwrap_or_else(|err| panic!("failed to decode base64 fixture {path}: {err}"))
}

/// Run the CLI with `args` and capture standard output.
pub(super) fn run_captured(args: &[&str]) -> (Result<(), CliError>, String) {
    let mut invocation = vec!["pbfparquet"];
    invocation.extend_from_slice(args);
    let mut output = Vec::new();
    let outcome = run_with(invocation, &mut output);
    let text = String::from_utf8(output).expect("utf-8 output");
    (outcome, text)
}
