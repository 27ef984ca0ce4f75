use impxref::config::Config;
use impxref::error::Stage;
use impxref::writer::OutputEncoding;
use std::fs;
use std::path::Path;

/// One fixed-width IMP line: language in [1,4), key in [5,22), description from 22.
fn imp_line(language: &str, key: &str, description: &[u8]) -> Vec<u8> {
    let mut line = format!(" {:<3} {:<17}", language, key).into_bytes();
    line.extend_from_slice(description);
    line.extend_from_slice(b"\r\n");
    line
}

fn utf8_config() -> Config {
    Config {
        output_encoding: OutputEncoding::Utf8,
        ..Config::default()
    }
}

fn read_utf16(path: &Path) -> String {
    let bytes = fs::read(path).unwrap();
    assert!(bytes.starts_with(&[0xFF, 0xFE]));
    let units: Vec<u16> = bytes[2..]
        .chunks_exact(2)
        .map(|pair| u16::from_le_bytes([pair[0], pair[1]]))
        .collect();
    String::from_utf16(&units).unwrap()
}

#[test]
fn test_end_to_end_single_match() {
    let dir = tempfile::tempdir().unwrap();
    let keys = dir.path().join("keys.csv");
    let imp = dir.path().join("data.imp");
    let out = dir.path().join("Product_Descriptions.csv");
    fs::write(&keys, "00123,ignored\n").unwrap();
    fs::write(&imp, imp_line("1", "00123", b"Caf\x94   test")).unwrap();

    let summary = impxref::cross_reference(&keys, &imp, &out, &Config::default()).unwrap();
    assert_eq!(summary.matched, 1);
    assert_eq!(summary.lines_read, 1);
    assert_eq!(
        read_utf16(&out),
        "Product Number,Description\r\n123,Caf\u{F6}<br>test\r\n"
    );
}

#[test]
fn test_filters_language_and_keys() {
    let dir = tempfile::tempdir().unwrap();
    let keys = dir.path().join("keys.csv");
    let imp = dir.path().join("data.imp");
    let out = dir.path().join("out.csv");
    fs::write(&keys, "123,a\n456,b\n").unwrap();

    let mut data = Vec::new();
    data.extend(imp_line("1", "00123", b"K\x84se"));
    data.extend(imp_line("2", "00123", b"cheese"));
    data.extend(imp_line("1", "999", b"other"));
    data.extend(b" 1        \r\n");
    data.extend(imp_line("001", "456", b"Stra\xE1e  mit   Gr\x81n"));
    data.extend(imp_line("1", "123", b"again"));
    fs::write(&imp, data).unwrap();

    let summary = impxref::cross_reference(&keys, &imp, &out, &utf8_config()).unwrap();
    assert_eq!(summary.lines_read, 6);
    assert_eq!(summary.matched, 3);
    assert_eq!(summary.short_lines, 1);
    assert_eq!(
        fs::read_to_string(&out).unwrap(),
        "Product Number,Description\r\n\
         123,K\u{E4}se\r\n\
         456,Stra\u{DF}e  mit<br>Gr\u{FC}n\r\n\
         123,again\r\n"
    );
}

#[test]
fn test_no_matches_writes_header() {
    let dir = tempfile::tempdir().unwrap();
    let keys = dir.path().join("keys.csv");
    let imp = dir.path().join("data.imp");
    let out = dir.path().join("out.csv");
    fs::write(&keys, "1\n").unwrap();
    fs::write(&imp, "").unwrap();

    let summary = impxref::cross_reference(&keys, &imp, &out, &utf8_config()).unwrap();
    assert_eq!(summary.matched, 0);
    assert_eq!(fs::read_to_string(&out).unwrap(), "Product Number,Description\r\n");
}

#[test]
fn test_unwritable_output_reports_writing_stage() {
    let dir = tempfile::tempdir().unwrap();
    let keys = dir.path().join("keys.csv");
    let imp = dir.path().join("data.imp");
    fs::write(&keys, "1\n").unwrap();
    fs::write(&imp, "").unwrap();

    let out = dir.path().join("missing").join("out.csv");
    let err = impxref::cross_reference(&keys, &imp, &out, &utf8_config()).unwrap_err();
    assert_eq!(err.stage(), Some(Stage::Writing));
}

#[test]
fn test_existing_output_replaced() {
    let dir = tempfile::tempdir().unwrap();
    let keys = dir.path().join("keys.csv");
    let imp = dir.path().join("data.imp");
    let out = dir.path().join("out.csv");
    fs::write(&keys, "7\n").unwrap();
    fs::write(&imp, imp_line("1", "7", b"seven")).unwrap();
    fs::write(&out, "stale").unwrap();

    impxref::cross_reference(&keys, &imp, &out, &utf8_config()).unwrap();
    assert_eq!(
        fs::read_to_string(&out).unwrap(),
        "Product Number,Description\r\n7,seven\r\n"
    );
}
