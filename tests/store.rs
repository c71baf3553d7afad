mod common;

use common::TestWorkspace;
use gdp_atlas::{
    error::AtlasError,
    store::{Table, TableFormat},
};

#[test]
fn lookup_by_key_returns_original_fields() {
    let workspace = TestWorkspace::new();
    let path = workspace.write(
        "countries.csv",
        "code,name,capital\nCAN,Canada,Ottawa\nFRA,France,Paris\n",
    );

    let table = Table::load(&path, "code", b',', b'"').expect("load table");

    assert_eq!(table.len(), 2);
    assert_eq!(table.key_column(), "code");
    assert_eq!(table.headers(), ["code", "name", "capital"]);
    let row = table.get("FRA").expect("row for FRA");
    let fields: Vec<_> = row.iter().collect();
    assert_eq!(
        fields,
        vec![("code", "FRA"), ("name", "France"), ("capital", "Paris")]
    );
    assert!(table.get("fra").is_none());
    assert!(table.contains_key("CAN"));
    assert!(!table.contains_key("can"));
    assert_eq!(row.values(), ["FRA", "France", "Paris"]);
    assert!(!row.is_empty());
}

#[test]
fn repeated_key_keeps_the_later_row() {
    let workspace = TestWorkspace::new();
    let path = workspace.write("dupes.csv", "code,value\nA,first\nB,only\nA,second\n");

    let table = Table::load(&path, "code", b',', b'"').expect("load table");

    assert_eq!(table.len(), 2);
    assert_eq!(table.get("A").and_then(|row| row.get("value")), Some("second"));
    assert_eq!(table.keys().collect::<Vec<_>>(), vec!["A", "B"]);
}

#[test]
fn custom_delimiter_and_quote_are_honoured() {
    let workspace = TestWorkspace::new();
    let path = workspace.write(
        "semi.csv",
        "code;name\n'KOR';'Korea; Republic of'\nPRK;'Korea, Dem. People''s Rep.'\n",
    );

    let table = Table::load(&path, "code", b';', b'\'').expect("load table");

    assert_eq!(
        table.get("KOR").and_then(|row| row.get("name")),
        Some("Korea; Republic of")
    );
    assert_eq!(
        table.get("PRK").and_then(|row| row.get("name")),
        Some("Korea, Dem. People's Rep.")
    );
}

#[test]
fn empty_fields_are_kept_as_empty_strings() {
    let workspace = TestWorkspace::new();
    let path = workspace.write("gdp.csv", "code,1990,1991\nCAN,1000,\n");

    let table = Table::load(&path, "code", b',', b'"').expect("load table");

    let row = table.get("CAN").expect("row");
    assert_eq!(row.get("1991"), Some(""));
    assert_eq!(row.len(), 3);
}

#[test]
fn row_with_wrong_field_count_is_malformed() {
    let workspace = TestWorkspace::new();
    let path = workspace.write("bad.csv", "code,name\nCAN,Canada\nFRA,France,extra\n");

    let err = Table::load(&path, "code", b',', b'"').expect_err("malformed row");

    match err {
        AtlasError::MalformedRecord {
            line,
            expected,
            found,
            ..
        } => {
            assert_eq!(line, 3);
            assert_eq!(expected, 2);
            assert_eq!(found, 3);
        }
        other => panic!("expected MalformedRecord, got {other:?}"),
    }
}

#[test]
fn missing_file_is_resource_not_found() {
    let workspace = TestWorkspace::new();
    let path = workspace.path().join("absent.csv");

    let err = Table::load(&path, "code", b',', b'"').expect_err("missing file");

    assert!(matches!(err, AtlasError::ResourceNotFound { .. }));
}

#[test]
fn unreadable_source_is_resource_not_found() {
    let workspace = TestWorkspace::new();

    let err = Table::load(workspace.path(), "code", b',', b'"').expect_err("directory source");

    assert!(
        matches!(err, AtlasError::ResourceNotFound { .. }),
        "expected ResourceNotFound, got {err:?}"
    );
}

#[test]
fn unknown_key_column_is_reported() {
    let workspace = TestWorkspace::new();
    let path = workspace.write("codes.csv", "code,name\nCAN,Canada\n");

    let err = Table::load(&path, "iso", b',', b'"').expect_err("missing key column");

    match err {
        AtlasError::MissingColumn { column, .. } => assert_eq!(column, "iso"),
        other => panic!("expected MissingColumn, got {other:?}"),
    }
}

#[test]
fn latin1_input_decodes_with_configured_encoding() {
    let workspace = TestWorkspace::new();
    let path = workspace.path().join("latin1.csv");
    let mut bytes = b"code,name\nCIV,C".to_vec();
    bytes.push(0xF4);
    bytes.extend_from_slice(b"te d'Ivoire\n");
    std::fs::write(&path, bytes).expect("write latin1 file");

    let format = TableFormat {
        encoding: Some("latin1".to_string()),
        ..TableFormat::default()
    };
    let table = Table::load_with(&path, "code", &format).expect("load latin1 table");
    assert_eq!(
        table.get("CIV").and_then(|row| row.get("name")),
        Some("Côte d'Ivoire")
    );

    let err = Table::load(&path, "code", b',', b'"').expect_err("not utf-8");
    assert!(matches!(err, AtlasError::Decode { .. }));
}
