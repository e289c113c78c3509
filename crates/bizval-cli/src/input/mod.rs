pub mod file;
pub mod stdin;

use serde::de::DeserializeOwned;

/// Load a document from `--input`, falling back to JSON or YAML piped on stdin.
pub fn read_document<T: DeserializeOwned>(
    path: Option<&str>,
) -> Result<T, Box<dyn std::error::Error>> {
    if let Some(path) = path {
        return file::read_document(path);
    }
    stdin::read_stdin()?
        .ok_or_else(|| "--input is required (or pipe a document on stdin)".into())
}
