//! Suppression and file-skipping tests
//!
//! Covers the nolint directive forms (targeted, all-tools, bare), their
//! placement rules, and the generated-file heuristics, all through the
//! public analyzer API.

use spannercheck::ir::{
    Block, Comment, FileComments, Function, Instruction, OpKind, Span, TypeKind, TypeRef, Unit,
};
use spannercheck::LeakAnalyzer;
use std::path::PathBuf;

fn fixtures_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

const TXN: u32 = 1;
const TXN_PTR: u32 = 2;
const CLIENT: u32 = 7;
const CLIENT_PTR: u32 = 8;

fn spanner_types() -> Vec<TypeRef> {
    vec![
        TypeRef {
            id: TXN,
            name: "ReadOnlyTransaction".to_string(),
            package: Some("cloud.google.com/go/spanner".to_string()),
            kind: TypeKind::Named,
            elem: None,
        },
        TypeRef {
            id: TXN_PTR,
            name: "*ReadOnlyTransaction".to_string(),
            package: None,
            kind: TypeKind::Pointer,
            elem: Some(TXN),
        },
        TypeRef {
            id: CLIENT,
            name: "Client".to_string(),
            package: Some("cloud.google.com/go/spanner".to_string()),
            kind: TypeKind::Named,
            elem: None,
        },
        TypeRef {
            id: CLIENT_PTR,
            name: "*Client".to_string(),
            package: None,
            kind: TypeKind::Pointer,
            elem: Some(CLIENT),
        },
    ]
}

/// A function holding exactly one undeferred transaction at `line`.
fn leak_at(name: &str, file: &str, line: usize) -> Function {
    let client = Instruction {
        id: 1,
        kind: OpKind::Parameter,
        operands: vec![],
        type_id: Some(CLIENT_PTR),
        callee: None,
        is_method_call: false,
        index: None,
        span: None,
    };
    let txn = Instruction {
        id: 2,
        kind: OpKind::Call,
        operands: vec![1],
        type_id: Some(TXN_PTR),
        callee: Some("ReadOnly".to_string()),
        is_method_call: true,
        index: None,
        span: Some(Span {
            file: file.to_string(),
            line,
            column: 9,
        }),
    };
    Function {
        name: name.to_string(),
        short_name: name.to_string(),
        file: file.to_string(),
        is_method: false,
        blocks: vec![Block {
            id: 0,
            instructions: vec![client, txn],
        }],
    }
}

fn commented(path: &str, comments: Vec<(usize, &str)>) -> FileComments {
    FileComments {
        path: path.to_string(),
        comments: comments
            .into_iter()
            .map(|(line, text)| Comment {
                line,
                text: text.to_string(),
            })
            .collect(),
    }
}

fn unit_of(functions: Vec<Function>, files: Vec<FileComments>) -> Unit {
    Unit {
        name: "github.com/acme/reports".to_string(),
        types: spanner_types(),
        functions,
        files,
    }
}

fn leak_count(unit: &Unit) -> usize {
    LeakAnalyzer::new().analyze_unit(unit).len()
}

// ============================================================================
// LINE-LEVEL DIRECTIVES
// ============================================================================

mod line_directives {
    use super::*;

    #[test]
    fn test_directive_on_same_line_suppresses() {
        let unit = unit_of(
            vec![leak_at("WriteDaily", "reports.go", 14)],
            vec![commented("reports.go", vec![(14, "// nolint:spannercheck")])],
        );
        assert_eq!(leak_count(&unit), 0);
    }

    #[test]
    fn test_directive_on_line_above_suppresses() {
        let unit = unit_of(
            vec![leak_at("WriteDaily", "reports.go", 14)],
            vec![commented(
                "reports.go",
                vec![(13, "// nolint:spannercheck -- held open until the worker drains")],
            )],
        );
        assert_eq!(leak_count(&unit), 0);
    }

    #[test]
    fn test_directive_two_lines_above_does_not_suppress() {
        let unit = unit_of(
            vec![leak_at("WriteDaily", "reports.go", 14)],
            vec![commented("reports.go", vec![(12, "// nolint:spannercheck")])],
        );
        assert_eq!(leak_count(&unit), 1);
    }

    #[test]
    fn test_all_tools_directive_suppresses() {
        let unit = unit_of(
            vec![leak_at("WriteDaily", "reports.go", 14)],
            vec![commented("reports.go", vec![(14, "// nolint:all")])],
        );
        assert_eq!(leak_count(&unit), 0);
    }

    #[test]
    fn test_bare_nolint_suppresses() {
        let unit = unit_of(
            vec![leak_at("WriteDaily", "reports.go", 14)],
            vec![commented("reports.go", vec![(14, "// nolint")])],
        );
        assert_eq!(leak_count(&unit), 0);
    }

    #[test]
    fn test_other_tool_directive_does_not_suppress() {
        // A colon means the author picked tools, and this one is not in
        // the list.
        let unit = unit_of(
            vec![leak_at("WriteDaily", "reports.go", 14)],
            vec![commented("reports.go", vec![(14, "// nolint:sqlclosecheck")])],
        );
        assert_eq!(leak_count(&unit), 1);
    }

    #[test]
    fn test_bare_token_with_colon_does_not_suppress() {
        let unit = unit_of(
            vec![leak_at("WriteDaily", "reports.go", 14)],
            vec![commented("reports.go", vec![(14, "// nolint: see CLEANUP-412")])],
        );
        assert_eq!(leak_count(&unit), 1);
    }

    #[test]
    fn test_unrelated_comment_does_not_suppress() {
        let unit = unit_of(
            vec![leak_at("WriteDaily", "reports.go", 14)],
            vec![commented("reports.go", vec![(13, "// closed by the session pool")])],
        );
        assert_eq!(leak_count(&unit), 1);
    }

    #[test]
    fn test_directive_in_other_file_does_not_suppress() {
        let unit = unit_of(
            vec![leak_at("WriteDaily", "reports.go", 14)],
            vec![commented("other.go", vec![(14, "// nolint:spannercheck")])],
        );
        assert_eq!(leak_count(&unit), 1);
    }
}

// ============================================================================
// FILE-LEVEL DIRECTIVES
// ============================================================================

mod file_directives {
    use super::*;

    #[test]
    fn test_header_directive_silences_whole_file() {
        let unit = unit_of(
            vec![
                leak_at("WriteDaily", "reports.go", 40),
                leak_at("WriteWeekly", "reports.go", 80),
            ],
            vec![commented("reports.go", vec![(3, "// nolint:spannercheck")])],
        );
        assert_eq!(leak_count(&unit), 0);
    }

    #[test]
    fn test_directive_on_line_ten_counts() {
        let unit = unit_of(
            vec![leak_at("WriteDaily", "reports.go", 40)],
            vec![commented("reports.go", vec![(10, "// nolint:all")])],
        );
        assert_eq!(leak_count(&unit), 0);
    }

    #[test]
    fn test_directive_on_line_eleven_does_not_count() {
        let unit = unit_of(
            vec![leak_at("WriteDaily", "reports.go", 40)],
            vec![commented("reports.go", vec![(11, "// nolint:spannercheck")])],
        );
        assert_eq!(leak_count(&unit), 1);
    }

    #[test]
    fn test_bare_token_is_never_file_level() {
        // A lone "nolint" near the top is too ambiguous to wipe out
        // every finding in the file.
        let unit = unit_of(
            vec![leak_at("WriteDaily", "reports.go", 40)],
            vec![commented("reports.go", vec![(3, "// nolint")])],
        );
        assert_eq!(leak_count(&unit), 1);
    }
}

// ============================================================================
// GENERATED FILES
// ============================================================================

mod generated_files {
    use super::*;

    #[test]
    fn test_pb_suffix_skipped() {
        let unit = unit_of(vec![leak_at("Marshal", "api.pb.go", 120)], vec![]);
        assert_eq!(leak_count(&unit), 0);
    }

    #[test]
    fn test_gen_suffix_skipped() {
        let unit = unit_of(vec![leak_at("ScanRow", "models_gen.go", 55)], vec![]);
        assert_eq!(leak_count(&unit), 0);
    }

    #[test]
    fn test_yo_suffix_skipped() {
        let unit = unit_of(vec![leak_at("Insert", "orders.yo.go", 31)], vec![]);
        assert_eq!(leak_count(&unit), 0);
    }

    #[test]
    fn test_generated_path_marker_skipped() {
        let unit = unit_of(
            vec![leak_at("Load", "internal/generated/store.go", 12)],
            vec![],
        );
        assert_eq!(leak_count(&unit), 0);
    }

    #[test]
    fn test_config_marker_skipped() {
        let unit = unit_of(vec![leak_at("Fetch", "client.mock.go", 12)], vec![]);
        let leaks = LeakAnalyzer::new()
            .with_generated_markers(vec![".mock.go".to_string()])
            .analyze_unit(&unit);
        assert!(leaks.is_empty());
    }

    #[test]
    fn test_regular_file_is_scanned() {
        let unit = unit_of(vec![leak_at("Fetch", "store.go", 12)], vec![]);
        assert_eq!(leak_count(&unit), 1);
    }
}

// ============================================================================
// FIXTURE-BACKED TESTS
// ============================================================================

#[test]
fn test_suppressed_fixture_reports_nothing() {
    let fixture = fixtures_path().join("ir/suppressed/reports.ssa.json");
    if !fixture.exists() {
        eprintln!("Fixture not found: {:?}", fixture);
        return;
    }

    let unit = spannercheck::Unit::from_json_file(&fixture).expect("fixture should parse");
    let leaks = LeakAnalyzer::new().analyze_units(&[unit]);

    for leak in &leaks {
        println!("unexpected: {} {}", leak.location, leak.message);
    }
    assert!(leaks.is_empty(), "every finding in the fixture carries a directive");
}
