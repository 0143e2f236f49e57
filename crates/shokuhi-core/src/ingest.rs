//! Upload ingest: encoding detection, decoding and CSV parsing.

use std::io::Read;

use chardetng::EncodingDetector;
use encoding_rs::Encoding;
use tracing::{debug, info};

use crate::dataset::Dataset;
use crate::error::AppError;

/// A successfully parsed upload.
#[derive(Debug, Clone)]
pub struct ParsedUpload {
    /// Name of the encoding the bytes were decoded with (e.g. `"Shift_JIS"`).
    pub encoding: &'static str,
    pub dataset: Dataset,
}

/// Guesses the encoding of raw bytes.
///
/// A byte-order mark wins; otherwise the content is sniffed statistically.
pub fn detect_encoding(bytes: &[u8]) -> &'static Encoding {
    if let Some((encoding, _)) = Encoding::for_bom(bytes) {
        return encoding;
    }

    let mut detector = EncodingDetector::new();
    detector.feed(bytes, true);
    detector.guess(None, true)
}

/// Decodes bytes with the given encoding, failing on malformed sequences.
pub fn decode(bytes: &[u8], encoding: &'static Encoding) -> Result<String, AppError> {
    let (text, actual, had_errors) = encoding.decode(bytes);
    if had_errors {
        return Err(AppError::Encoding(actual.name().to_string()));
    }
    Ok(text.into_owned())
}

/// Parses comma-delimited text with a header row into a [`Dataset`].
///
/// Headers and cells are trimmed of surrounding whitespace.
pub fn parse_csv(text: &str) -> Result<Dataset, AppError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(text.as_bytes());

    let headers: Vec<String> = reader
        .headers()?
        .iter()
        .map(|h| h.trim_start_matches('\u{feff}').trim().to_string())
        .collect();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        if record.iter().all(|c| c.is_empty()) {
            continue;
        }
        rows.push(record.iter().map(String::from).collect());
    }

    Dataset::from_rows(headers, rows)
}

/// Ingests an upload from raw bytes: detect, decode, parse.
pub fn ingest_bytes(bytes: &[u8]) -> Result<ParsedUpload, AppError> {
    if bytes.is_empty() {
        return Err(AppError::EmptyDataset);
    }

    let encoding = detect_encoding(bytes);
    debug!(encoding = encoding.name(), "Detected upload encoding");

    let text = decode(bytes, encoding)?;
    let dataset = parse_csv(&text)?;

    info!(
        encoding = encoding.name(),
        rows = dataset.row_count(),
        columns = dataset.headers().len(),
        region_column = dataset.region_header(),
        "Parsed upload"
    );

    Ok(ParsedUpload {
        encoding: encoding.name(),
        dataset,
    })
}

/// Ingests an upload from a reader.
///
/// The reader is drained into one buffer; sniffing and parsing both start from
/// the beginning of that buffer.
pub fn ingest_reader<R: Read>(mut reader: R) -> Result<ParsedUpload, AppError> {
    let mut bytes = Vec::new();
    reader
        .read_to_end(&mut bytes)
        .map_err(|e| AppError::CsvParse(format!("failed to read upload: {}", e)))?;
    ingest_bytes(&bytes)
}
