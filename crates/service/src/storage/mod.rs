//! Storage abstractions for service layer
//!
//! `blob` defines the capability the product service uses to keep uploaded
//! images; `local_fs` is the disk-backed implementation served as static files.

pub mod blob;
pub mod local_fs;

use std::path::Path;

use rand::Rng;

/// Generate `product-<unix_millis>-<random><ext>` for an upload, keeping the
/// lowercased extension of the client-supplied name.
pub fn generate_file_name(suggested_name: &str) -> String {
    let millis = chrono::Utc::now().timestamp_millis();
    let suffix: u32 = rand::thread_rng().gen_range(0..1_000_000_000);
    format!("product-{millis}-{suffix}{}", extension_of(suggested_name))
}

/// `.png` style extension, or empty when missing or not plain alphanumeric.
fn extension_of(name: &str) -> String {
    Path::new(name)
        .extension()
        .and_then(|e| e.to_str())
        .filter(|e| !e.is_empty() && e.chars().all(|c| c.is_ascii_alphanumeric()))
        .map(|e| format!(".{}", e.to_ascii_lowercase()))
        .unwrap_or_default()
}
