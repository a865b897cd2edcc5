use crate::error::Result;
use polars::prelude::{
    CsvReadOptions, CsvWriter, DataFrame, JsonFormat, JsonWriter, SerReader, SerWriter,
};
use std::fs::File;
use std::path::Path;

/// Read a table from CSV with header.
pub fn load_csv<P: AsRef<Path>>(path: P) -> Result<DataFrame> {
    let df = CsvReadOptions::default()
        .with_has_header(true)
        .try_into_reader_with_file_path(Some(path.as_ref().to_path_buf()))?
        .finish()?;
    Ok(df)
}

/// Save a table as CSV with header.
pub fn save_csv<P: AsRef<Path>>(df: &DataFrame, path: P) -> Result<()> {
    let mut f = File::create(path)?;
    let mut df = df.clone();
    CsvWriter::new(&mut f).include_header(true).finish(&mut df)?;
    Ok(())
}

/// Save a table as a JSON array of records.
pub fn save_json<P: AsRef<Path>>(df: &DataFrame, path: P) -> Result<()> {
    let mut f = File::create(path)?;
    let mut df = df.clone();
    JsonWriter::new(&mut f)
        .with_json_format(JsonFormat::Json)
        .finish(&mut df)?;
    Ok(())
}
