#![cfg(feature = "storage-rocksdb")]

use assert_cmd::cargo_bin;
use std::io::Write;
use std::process::Command;
use tempfile::tempdir;

const HEADER: &str = "op, patron, book, title, author, isbn, copies, term, field, tx, amount";

#[test]
fn test_rocksdb_persistence_recovery() {
    let dir = tempdir().unwrap();
    let db_path = dir.path().join("library_db");

    // 1. First run: build the catalog and lend one copy.
    let mut csv1 = tempfile::NamedTempFile::new().unwrap();
    writeln!(csv1, "{HEADER}").unwrap();
    writeln!(csv1, "add, , , Dune, Frank Herbert, 9780441172719, 2, , , ,").unwrap();
    writeln!(csv1, "borrow, 100001, 1, , , , , , , ,").unwrap();

    let mut cmd1 = Command::new(cargo_bin!("circulation"));
    cmd1.arg(csv1.path()).arg("--db-path").arg(&db_path);

    let output1 = cmd1.output().expect("failed to execute command");
    assert!(output1.status.success());
    let stdout1 = String::from_utf8_lossy(&output1.stdout);
    assert!(stdout1.contains("1,Dune,Frank Herbert,9780441172719,2,1"));

    // 2. Second run over the same DB: the loan and catalog survive, so the
    // same patron returning the book restores availability to 2.
    let mut csv2 = tempfile::NamedTempFile::new().unwrap();
    writeln!(csv2, "{HEADER}").unwrap();
    writeln!(csv2, "return, 100001, 1, , , , , , , ,").unwrap();

    let mut cmd2 = Command::new(cargo_bin!("circulation"));
    cmd2.arg(csv2.path()).arg("--db-path").arg(&db_path);

    let output2 = cmd2.output().expect("failed to execute command");
    assert!(output2.status.success());
    let stdout2 = String::from_utf8_lossy(&output2.stdout);
    assert!(stdout2.contains("1,Dune,Frank Herbert,9780441172719,2,2"));

    let stderr2 = String::from_utf8_lossy(&output2.stderr);
    assert!(stderr2.contains("ok: Book returned successfully."));
}
