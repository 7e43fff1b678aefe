use pathkv::error::Error;
use pathkv::store::{Store, StoreOptions};

fn main() {
    println!("Hello, pathkv!");

    run().unwrap();

    println!("Bye~");
}

fn run() -> Result<(), Error> {
    let storage_path = tempdir::TempDir::new("pathkv-demo")?.into_path();

    let mut db = Store::connect(&storage_path, StoreOptions::default())?;

    db.transaction("seed", |s| {
        s.put("b", "1")?;
        s.put("b", "2")?;

        s.put("e", "5")?;
        s.discard("e")?;

        s.put("c", "0")?;
        s.discard("c")?;
        s.put("c", "3")?;

        s.put("a", "1")?;

        s.discard("f")?;

        s.discard("d")?;
        s.put("d", "4")?;

        Ok(())
    })?;

    // Make sure prefix scans yield the expected results.
    assert_eq!(
        vec![
            ("a".to_string(), "1".to_string()),
            ("b".to_string(), "2".to_string()),
            ("c".to_string(), "3".to_string()),
            ("d".to_string(), "4".to_string()),
        ],
        db.match_items(""),
    );

    db.undo()?;
    assert!(!db.has("d"));

    db.redo()?;
    assert_eq!(db.get("d")?, "4");

    Ok(())
}
