//! Tabular export of a finished run.
//!
//! One row per record with a fixed column order: sequence number,
//! identifier, brand, name, model, price, link.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::app::{Result, ShelfscanError};
use crate::domain::ProductRecord;

pub const HEADERS: [&str; 7] = ["序號", "品號", "品牌", "商品名稱", "型號", "價格", "連結"];

pub fn write_csv<W: Write>(writer: W, records: &[ProductRecord]) -> Result<()> {
    let mut writer = csv::Writer::from_writer(writer);
    writer.write_record(HEADERS)?;

    for (index, record) in records.iter().enumerate() {
        writer.write_record([
            (index + 1).to_string().as_str(),
            record.product_id.as_str(),
            record.brand_name.as_str(),
            record.product_name.as_str(),
            record.product_model.as_str(),
            record.price.to_string().as_str(),
            record.link.as_str(),
        ])?;
    }

    writer.flush()?;
    Ok(())
}

pub fn to_csv_string(records: &[ProductRecord]) -> Result<String> {
    let mut buffer = Vec::new();
    write_csv(&mut buffer, records)?;
    String::from_utf8(buffer).map_err(|e| ShelfscanError::Other(e.to_string()))
}

pub fn export_to_file(path: &Path, records: &[ProductRecord]) -> Result<()> {
    let file = File::create(path)?;
    write_csv(file, records)
}

/// File name for a search, with path separators removed from the term.
pub fn default_file_name(search_term: &str) -> String {
    let term: String = search_term
        .trim()
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' => '_',
            c if c.is_whitespace() => '_',
            c => c,
        })
        .collect();
    format!("search_results_{}.csv", term)
}
