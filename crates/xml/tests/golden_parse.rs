use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use xml::tree_snapshot::{TreeSnapshot, TreeSnapshotOptions};
use xml::{XmlError, parse_reader, parse_str};

const PARSE_FORMAT_V1: &str = "xml-golden-v1";
const ERRORS_FORMAT_V1: &str = "xml-golden-errors-v1";

#[derive(Debug, Deserialize)]
struct ParseManifest {
    format: String,
    cases: Vec<ParseCase>,
}

#[derive(Debug, Deserialize)]
struct ParseCase {
    name: String,
    input: String,
    expected: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorManifest {
    format: String,
    cases: Vec<ErrorCase>,
}

#[derive(Debug, Deserialize)]
struct ErrorCase {
    name: String,
    input: String,
    kind: ErrorKind,
    line: usize,
}

#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
enum ErrorKind {
    UnterminatedString,
    UnterminatedComment,
    UnexpectedEof,
    MismatchedClosingTag,
    MalformedAttribute,
    UnexpectedClosingTag,
}

fn classify(err: &XmlError) -> Option<ErrorKind> {
    Some(match err {
        XmlError::UnterminatedString { .. } => ErrorKind::UnterminatedString,
        XmlError::UnterminatedComment { .. } => ErrorKind::UnterminatedComment,
        XmlError::UnexpectedEof { .. } => ErrorKind::UnexpectedEof,
        XmlError::MismatchedClosingTag { .. } => ErrorKind::MismatchedClosingTag,
        XmlError::MalformedAttribute { .. } => ErrorKind::MalformedAttribute,
        XmlError::UnexpectedClosingTag { .. } => ErrorKind::UnexpectedClosingTag,
        _ => return None,
    })
}

fn fixtures_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
}

fn load_parse_cases() -> Vec<ParseCase> {
    let path = fixtures_dir().join("parse.toml");
    let content = fs::read_to_string(&path)
        .unwrap_or_else(|err| panic!("failed to read golden TOML {path:?}: {err}"));
    let manifest: ParseManifest = toml::from_str(&content)
        .unwrap_or_else(|err| panic!("failed to parse golden TOML {path:?}: {err}"));
    assert_eq!(
        manifest.format, PARSE_FORMAT_V1,
        "unsupported golden format in {path:?}"
    );
    assert!(!manifest.cases.is_empty(), "no cases in {path:?}");
    manifest.cases
}

fn load_error_cases() -> Vec<ErrorCase> {
    let path = fixtures_dir().join("errors.json");
    let content = fs::read_to_string(&path)
        .unwrap_or_else(|err| panic!("failed to read golden JSON {path:?}: {err}"));
    let manifest: ErrorManifest = serde_json::from_str(&content)
        .unwrap_or_else(|err| panic!("failed to parse golden JSON {path:?}: {err}"));
    assert_eq!(
        manifest.format, ERRORS_FORMAT_V1,
        "unsupported golden format in {path:?}"
    );
    manifest.cases
}

#[test]
fn golden_parse_snapshots() {
    for case in load_parse_cases() {
        let tree = parse_str(&case.input)
            .unwrap_or_else(|err| panic!("case '{}' failed to parse: {err}", case.name));
        let snapshot = TreeSnapshot::new(tree.root_tag(), TreeSnapshotOptions::default());
        assert_eq!(
            snapshot.as_lines(),
            case.expected.as_slice(),
            "case '{}' snapshot:\n{snapshot}",
            case.name
        );
    }
}

#[test]
fn golden_parse_snapshots_via_reader() {
    for case in load_parse_cases() {
        let from_str = parse_str(&case.input).unwrap();
        let from_reader = parse_reader(case.input.as_bytes())
            .unwrap_or_else(|err| panic!("case '{}' failed via reader: {err}", case.name));
        assert_eq!(
            TreeSnapshot::of_tree(&from_str).render(),
            TreeSnapshot::of_tree(&from_reader).render(),
            "case '{}'",
            case.name
        );
    }
}

#[test]
fn golden_error_cases() {
    for case in load_error_cases() {
        let err = match parse_str(&case.input) {
            Ok(tree) => panic!(
                "case '{}' parsed but should fail:\n{}",
                case.name,
                TreeSnapshot::of_tree(&tree)
            ),
            Err(err) => err,
        };
        assert_eq!(classify(&err), Some(case.kind), "case '{}': {err}", case.name);
        assert_eq!(err.line(), Some(case.line), "case '{}': {err}", case.name);
    }
}
