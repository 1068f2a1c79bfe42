use std::io::Cursor;

use super::*;

fn single(name: &str) -> DependencyTerm {
    DependencyTerm::Single(name.to_string())
}

fn group(names: &[&str]) -> DependencyTerm {
    DependencyTerm::AlternativeGroup(names.iter().map(|name| name.to_string()).collect())
}

#[test]
fn parse_depends_grouped_keeps_alternatives_in_place() {
    let terms = parse_dependency_list("a, b | c, d", AlternativeMode::Grouped);
    assert_eq!(terms, vec![single("a"), group(&["b", "c"]), single("d")]);
}

#[test]
fn parse_depends_expand_splices_alternatives() {
    let terms = parse_dependency_list("a, b | c, d", AlternativeMode::Expand);
    assert_eq!(
        terms,
        vec![single("a"), single("b"), single("c"), single("d")]
    );
}

#[test]
fn parse_depends_expand_keeps_first_occurrence_of_duplicates() {
    let terms = parse_dependency_list("c, a | c | b, a, d | b", AlternativeMode::Expand);
    assert_eq!(
        terms,
        vec![single("c"), single("a"), single("b"), single("d")]
    );
}

#[test]
fn parse_depends_grouped_does_not_deduplicate() {
    let terms = parse_dependency_list("a, a", AlternativeMode::Grouped);
    assert_eq!(terms, vec![single("a"), single("a")]);
}

#[test]
fn version_constraints_do_not_change_terms() {
    assert_eq!(
        parse_dependency_list("foo (>= 1.0)", AlternativeMode::Grouped),
        parse_dependency_list("foo", AlternativeMode::Grouped)
    );
    assert_eq!(
        parse_dependency_list(
            "libc6 (>= 2.34), libx11-6 (>> 2:1.6) | libx11-dev",
            AlternativeMode::Grouped
        ),
        vec![single("libc6"), group(&["libx11-6", "libx11-dev"])]
    );
}

#[test]
fn strip_version_constraints_is_non_greedy() {
    assert_eq!(strip_version_constraints("a (>= 1) b (<< 2)"), "a  b");
    assert_eq!(strip_version_constraints("dpkg (>= 1.15"), "dpkg (>= 1.15");
    assert_eq!(strip_version_constraints("  plain  "), "plain");
}

#[test]
fn empty_field_yields_no_terms() {
    assert!(parse_dependency_list("", AlternativeMode::Grouped).is_empty());
    assert!(parse_dependency_list("   ", AlternativeMode::Expand).is_empty());
    assert_eq!(
        parse_dependency_list("a, , b,", AlternativeMode::Grouped),
        vec![single("a"), single("b")]
    );
}

#[test]
fn constraint_only_piece_passes_through_as_empty_name() {
    let terms = parse_dependency_list("a, (>= 1.0)", AlternativeMode::Grouped);
    assert_eq!(terms, vec![single("a"), single("")]);
}

#[test]
fn qualified_names_are_kept_by_the_parser() {
    let terms = parse_dependency_list(
        "libc:arm64, python3:any (>= 3.11)",
        AlternativeMode::Grouped,
    );
    assert_eq!(terms, vec![single("libc:arm64"), single("python3:any")]);
    assert!(is_qualified_name("libc:arm64"));
    assert!(!is_qualified_name("libc6"));
}

#[test]
fn parse_provides_strips_versions_and_flattens() {
    let provides = parse_provides_list("mail-transport-agent, libfoo-abi-2 (= 2.1), x | y");
    assert_eq!(provides, vec!["mail-transport-agent", "libfoo-abi-2", "x", "y"]);
}

#[test]
fn parse_control_block_joins_continuation_lines() {
    let content = "Package: hello\nArchitecture: amd64\nDepends: libc6 (>= 2.34),\n libgcc-s1\nDescription: greeter\n friendly\n\tprogram\n";
    let fields = parse_control_block(content).expect("block should parse");
    assert_eq!(fields.get("Package"), Some("hello"));
    assert_eq!(fields.get("Depends"), Some("libc6 (>= 2.34), libgcc-s1"));
    assert_eq!(fields.get("Description"), Some("greeter friendly program"));
    assert_eq!(fields.get("Architecture"), Some("amd64"));
}

#[test]
fn parse_control_block_continuation_of_empty_value_replaces_it() {
    let fields =
        parse_control_block("Conffiles:\n /etc/hello.conf abc\n").expect("block should parse");
    assert_eq!(fields.get("Conffiles"), Some("/etc/hello.conf abc"));
}

#[test]
fn parse_control_block_keeps_colons_in_values() {
    let fields = parse_control_block("Depends: libc6:amd64\nHomepage: https://example.test\n")
        .expect("block should parse");
    assert_eq!(fields.get("Depends"), Some("libc6:amd64"));
    assert_eq!(fields.get("Homepage"), Some("https://example.test"));
}

#[test]
fn parse_control_block_rejects_malformed_line() {
    let err = parse_control_block("Package: hello\nnot a field\n").expect_err("line must fail");
    assert!(
        err.to_string().contains("malformed field line 2"),
        "unexpected error: {err}"
    );
}

#[test]
fn parse_control_block_rejects_leading_continuation() {
    let err = parse_control_block(" orphan\nPackage: hello\n").expect_err("orphan must fail");
    assert!(err.to_string().contains("no preceding field"));
}

#[test]
fn package_record_from_control_str() {
    let content = "Package: mutt\nArchitecture: amd64\nDepends: libc6 (>= 2.34), default-mta | mail-transport-agent\nProvides: mail-reader\nSection: mail\n";
    let record = PackageRecord::from_control_str(content, AlternativeMode::Grouped)
        .expect("record should parse");
    assert_eq!(record.name, "mutt");
    assert_eq!(record.architecture, "amd64");
    assert!(!record.is_stub);
    assert_eq!(record.provides, vec!["mail-reader"]);
    assert_eq!(
        record.dependencies.terms(),
        Some(&[single("libc6"), group(&["default-mta", "mail-transport-agent"])][..])
    );
}

#[test]
fn package_record_defaults_missing_optional_fields() {
    let record = PackageRecord::from_control_str(
        "Package: base-files\nArchitecture: all\n",
        AlternativeMode::Grouped,
    )
    .expect("record should parse");
    assert_eq!(record.dependencies, Dependencies::Unresolved(Vec::new()));
    assert!(record.provides.is_empty());
}

#[test]
fn package_record_requires_package_field() {
    let err = PackageRecord::from_control_str("Architecture: amd64\n", AlternativeMode::Grouped)
        .expect_err("missing Package must fail");
    assert!(format!("{err:#}").contains("missing required field 'Package'"));
}

#[test]
fn package_record_requires_architecture_field() {
    let err = PackageRecord::from_control_str("Package: hello\n", AlternativeMode::Grouped)
        .expect_err("missing Architecture must fail");
    let message = format!("{err:#}");
    assert!(
        message.contains("package 'hello' is incomplete"),
        "unexpected error: {message}"
    );
    assert!(message.contains("missing required field 'Architecture'"));
}

#[test]
fn take_unresolved_only_yields_once_resolved_state_is_set() {
    let mut record = PackageRecord::new("a", "amd64", vec![single("b")], Vec::new());
    assert_eq!(record.take_unresolved(), Some(vec![single("b")]));
    record.dependencies = Dependencies::Resolved(Vec::new());
    assert_eq!(record.take_unresolved(), None);

    let mut stub = PackageRecord::stub("missing");
    assert!(stub.is_stub);
    assert_eq!(stub.architecture, STUB_ARCHITECTURE);
    assert_eq!(stub.take_unresolved(), None);
}

#[test]
fn record_blocks_split_on_blank_lines() {
    let input = "Package: a\nArchitecture: all\n\n\n  \nPackage: b\r\nArchitecture: all\r\n\r\nPackage: c\nArchitecture: all";
    let blocks = RecordBlocks::new(Cursor::new(input))
        .collect::<anyhow::Result<Vec<_>>>()
        .expect("blocks should read");

    assert_eq!(blocks.len(), 3);
    assert_eq!(blocks[0].first_line, 1);
    assert_eq!(blocks[0].content, "Package: a\nArchitecture: all\n");
    assert_eq!(blocks[1].first_line, 6);
    assert_eq!(blocks[1].content, "Package: b\nArchitecture: all\n");
    assert_eq!(blocks[2].first_line, 9);
    assert_eq!(blocks[2].content, "Package: c\nArchitecture: all\n");
}

#[test]
fn record_blocks_of_empty_input_is_empty() {
    assert_eq!(RecordBlocks::new(Cursor::new("\n\n")).count(), 0);
    assert_eq!(RecordBlocks::new(Cursor::new("")).count(), 0);
}
