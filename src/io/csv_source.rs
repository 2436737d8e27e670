//! Pre-authored attribute rows for catalogs with `trait_algorithm = "csv"`

use crate::algorithm::sampler::AttributeSet;
use crate::io::error::{Result, WithPath, invalid_parameter};
use std::path::{Path, PathBuf};

/// File name of the attribute table inside a project's `csv/` folder
pub const ATTRIBUTE_TABLE: &str = "metadata.csv";

/// Location of the attribute table in `csv_dir`
pub fn attribute_table_path(csv_dir: &Path) -> PathBuf {
    csv_dir.join(ATTRIBUTE_TABLE)
}

/// Reader for CSV tables with a header row and trimmed cells
///
/// Records may differ in length from the header so callers can report the
/// offending row themselves. Quoted cells may contain commas.
pub fn table_reader(text: &str) -> csv::Reader<&[u8]> {
    csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(text.as_bytes())
}

/// Parse an attribute table
///
/// The header row names the trait types; data row `i` (counting from zero
/// after the header) holds the attributes of token `i`. Cells are trimmed,
/// quoted cells follow RFC 4180 and blank lines are ignored.
///
/// # Errors
///
/// Returns [`crate::ForgeError::InvalidParameter`] when the header is missing,
/// a row is malformed or a row's cell count differs from the header's.
pub fn parse_attribute_rows(text: &str) -> Result<Vec<AttributeSet>> {
    let mut reader = table_reader(text);
    let header: Vec<String> = reader
        .headers()
        .map_err(|err| invalid_parameter("csv", &ATTRIBUTE_TABLE, &err))?
        .iter()
        .map(str::to_string)
        .collect();
    if header.iter().all(String::is_empty) {
        return Err(invalid_parameter("csv", &ATTRIBUTE_TABLE, &"missing header row"));
    }

    reader
        .records()
        .enumerate()
        .map(|(token, record)| {
            let record = record.map_err(|err| invalid_parameter("csv", &ATTRIBUTE_TABLE, &err))?;
            if record.len() != header.len() {
                return Err(invalid_parameter(
                    "csv",
                    &record.iter().collect::<Vec<_>>().join(","),
                    &format!(
                        "token {token} has {} cells, header has {}",
                        record.len(),
                        header.len()
                    ),
                ));
            }
            let pairs = header
                .iter()
                .zip(record.iter())
                .map(|(trait_type, value)| (trait_type.clone(), value.to_string()))
                .collect();
            Ok(AttributeSet::from_pairs(pairs))
        })
        .collect()
}

/// Read `{csv_dir}/metadata.csv`
///
/// # Errors
///
/// Returns [`crate::ForgeError::FileSystem`] if the table cannot be read and
/// the errors of [`parse_attribute_rows`].
pub fn load_attribute_rows(csv_dir: &Path) -> Result<Vec<AttributeSet>> {
    let path = attribute_table_path(csv_dir);
    let text = std::fs::read_to_string(&path).with_path(&path, "read attribute table")?;
    parse_attribute_rows(&text)
}
