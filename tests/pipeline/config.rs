//! Loading `tessera.toml`

use crate::common::*;
use tempfile::TempDir;
use tessera::CONFIG_FILE_NAME;

#[test]
fn test_open_creates_default_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join(CONFIG_FILE_NAME);
    let tessera = Tessera::open(&path).unwrap();
    assert!(path.exists());
    assert_eq!(tessera.config(), &TesseraConfig::default());
}

#[test]
fn test_open_honours_edited_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join(CONFIG_FILE_NAME);
    std::fs::write(
        &path,
        "[pipeline]\ntop_type = \"list\"\n\n[codec]\nmax_string_bytes = 4\n",
    )
    .unwrap();
    let tessera = Tessera::open(&path).unwrap();

    assert!(tessera.validate(&Value::Int32(1), &Heap::new()).is_err());

    let bytes = tessera.encode(&Value::from("too long")).unwrap();
    assert!(tessera.decode(&bytes).is_err());
    assert!(tessera.decode(&tessera.encode(&Value::from("ok")).unwrap()).is_ok());
}

#[test]
fn test_malformed_file_reports_path() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join(CONFIG_FILE_NAME);
    std::fs::write(&path, "[pipeline\n").unwrap();
    let err = Tessera::open(&path).unwrap_err();
    assert!(matches!(err, TesseraError::Config(_)));
    assert!(err.to_string().contains("Failed to parse config file"));
}
