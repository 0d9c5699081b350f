//! CSV ingestion of school records.
//!
//! Input files are Latin-1; each byte is decoded to the code point of the same
//! value, so no input is rejected for its encoding.

use crate::error::LoadError;
use crate::index::{SchoolRecord, CITY_FIELD, NAME_FIELD, STATE_FIELD};
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

pub fn load_schools<P: AsRef<Path>>(path: P) -> Result<Vec<SchoolRecord>, LoadError> {
    let path = path.as_ref();
    let f = File::open(path).map_err(|source| LoadError::Open { path: path.to_path_buf(), source })?;
    let records = read_schools(BufReader::new(f))?;
    tracing::info!(path = %path.display(), num_records = records.len(), "loaded schools");
    Ok(records)
}

/// Read records from any CSV source with a header row.
///
/// Rows whose state occurs only once in the whole input are treated as bad
/// data and dropped.
pub fn read_schools<R: Read>(reader: R) -> Result<Vec<SchoolRecord>, LoadError> {
    let mut rdr = csv::ReaderBuilder::new().flexible(true).from_reader(reader);
    let headers: Vec<String> = rdr.byte_headers()?.iter().map(decode_latin1).collect();
    for required in [NAME_FIELD, CITY_FIELD, STATE_FIELD] {
        if !headers.iter().any(|h| h == required) {
            return Err(LoadError::MissingColumn(required));
        }
    }

    let mut records = Vec::new();
    for row in rdr.byte_records() {
        let row = row?;
        let record: SchoolRecord = headers.iter().cloned().zip(row.iter().map(decode_latin1)).collect();
        records.push(record);
    }
    Ok(drop_singleton_states(records))
}

fn decode_latin1(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| char::from(b)).collect()
}

fn drop_singleton_states(mut records: Vec<SchoolRecord>) -> Vec<SchoolRecord> {
    let mut counts: HashMap<String, usize> = HashMap::new();
    for record in &records {
        if let Some(state) = record.get(STATE_FIELD) {
            *counts.entry(state.clone()).or_insert(0) += 1;
        }
    }
    let before = records.len();
    records.retain(|record| record.get(STATE_FIELD).map_or(true, |state| counts[state] != 1));
    if records.len() < before {
        tracing::debug!(dropped = before - records.len(), "dropped rows with singleton states");
    }
    records
}
