use std::fs::File;
use std::io::{Error, Write};
use std::path::Path;

pub fn write_fixture(path: &Path, fixture: &serde_json::Value) -> Result<(), Error> {
    let mut file = File::create(path)?;
    file.write_all(serde_json::to_string_pretty(fixture)?.as_bytes())?;
    Ok(())
}

/// One user holding the given categories, the shape most tests need.
pub fn single_user_fixture(categories: serde_json::Value) -> serde_json::Value {
    serde_json::json!({
        "users": [
            {
                "id": "u1",
                "name": "Alice",
                "categories": categories
            }
        ]
    })
}
