//! services/api/src/bin/openapi.rs
//!
//! Dumps the blog API document served under `/api-docs/openapi.json`.
//!
//! Usage: `openapi [OUTPUT]`, where OUTPUT defaults to `openapi.json`.

use std::path::PathBuf;

use api_lib::web::rest::api_doc;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let output = std::env::args_os()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("openapi.json"));

    if let Some(dir) = output.parent().filter(|d| !d.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir)?;
    }

    let doc = api_doc();
    std::fs::write(&output, doc.to_pretty_json()?)?;
    println!(
        "Wrote {} v{} ({} paths) to {}",
        doc.info.title,
        doc.info.version,
        doc.paths.paths.len(),
        output.display()
    );
    Ok(())
}
