#![allow(dead_code)]

pub mod site_server;

use std::io::{Cursor, Write};
use std::path::Path;

pub fn zip_bytes(entries: &[(&str, &[u8])]) -> Vec<u8> {
    let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
    for (name, data) in entries {
        writer
            .start_file(*name, zip::write::FileOptions::default())
            .unwrap();
        writer.write_all(data).unwrap();
    }
    writer.finish().unwrap().into_inner()
}

/// Sorted `/`-separated relative paths of everything under `root`.
pub fn list_tree(root: &Path) -> Vec<String> {
    let mut out: Vec<String> = walkdir::WalkDir::new(root)
        .min_depth(1)
        .into_iter()
        .map(|e| {
            e.unwrap()
                .path()
                .strip_prefix(root)
                .unwrap()
                .to_string_lossy()
                .replace('\\', "/")
        })
        .collect();
    out.sort();
    out
}

pub fn anchor_page(href: &str) -> String {
    format!(
        r#"<!doctype html><html><head><title>results</title></head>
<body><div class="r"><a href="{href}">Geometry Dash download</a></div></body></html>"#
    )
}
