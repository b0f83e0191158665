//! Data Loading
//!
//! Reads a forced-degradation dataset into a Polars DataFrame with every
//! column kept as text. Typing happens later in `utils::numeric_coercion`, so
//! a stray "ND" in a measurement column never fails the load.
//!
//! Supported inputs:
//! - Delimited text (`.csv`, `.txt` comma; `.tsv`, `.tab` tab), UTF-8 with a
//!   Latin-1 fallback for legacy instrument exports
//! - Spreadsheets (`.xlsx`, `.xlsm`, `.xls`, `.ods`), first sheet only
//! - The embedded sample dataset

use calamine::{open_workbook_auto_from_rs, Data, Reader};
use polars::prelude::*;
use std::io::Cursor;
use std::path::Path;
use tracing::{debug, info};

use crate::error::{PipelineError, PipelineResult};

/// Bundled example dataset used by `--sample`
pub const SAMPLE_DATA: &[u8] = include_bytes!("../data/sample_data.csv");

pub const SAMPLE_SOURCE_NAME: &str = "sample dataset";

/// Input encoding, chosen from the file extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputFormat {
    Delimited { separator: u8 },
    Spreadsheet,
}

impl InputFormat {
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "csv" | "txt" => Some(InputFormat::Delimited { separator: b',' }),
            "tsv" | "tab" => Some(InputFormat::Delimited { separator: b'\t' }),
            "xlsx" | "xlsm" | "xls" | "xlsb" | "ods" => Some(InputFormat::Spreadsheet),
            _ => None,
        }
    }
}

/// A loaded, not yet normalized, dataset
#[derive(Debug, Clone)]
pub struct RawDataset {
    /// File name (or "sample dataset") used in error messages and reports
    pub source_name: String,
    pub frame: DataFrame,
}

impl RawDataset {
    /// Load a dataset from disk
    pub fn load(path: &Path) -> PipelineResult<Self> {
        let source_name = path.display().to_string();
        let format = InputFormat::from_path(path).ok_or_else(|| PipelineError::UnsupportedFormat {
            path: source_name.clone(),
        })?;

        info!("Loading dataset: {}", source_name);
        let bytes = std::fs::read(path).map_err(|e| PipelineError::InputRead {
            path: source_name.clone(),
            reason: e.to_string(),
        })?;

        Self::from_bytes(bytes, format, &source_name)
    }

    /// The bundled sample dataset
    pub fn sample() -> PipelineResult<Self> {
        info!("Loading {}", SAMPLE_SOURCE_NAME);
        Self::from_bytes(
            SAMPLE_DATA.to_vec(),
            InputFormat::Delimited { separator: b',' },
            SAMPLE_SOURCE_NAME,
        )
    }

    /// Parse in-memory file contents
    pub fn from_bytes(bytes: Vec<u8>, format: InputFormat, source_name: &str) -> PipelineResult<Self> {
        let frame = match format {
            InputFormat::Delimited { separator } => read_delimited(bytes, separator, source_name)?,
            InputFormat::Spreadsheet => read_spreadsheet(bytes, source_name)?,
        };

        if frame.height() == 0 || frame.width() == 0 {
            return Err(PipelineError::EmptyDataset {
                source_name: source_name.to_string(),
            });
        }

        info!("  Rows: {}, columns: {}", frame.height(), frame.width());

        Ok(Self {
            source_name: source_name.to_string(),
            frame,
        })
    }
}

/// UTF-8 if valid, otherwise Latin-1 (every byte maps to one char)
pub fn decode_text(bytes: Vec<u8>) -> String {
    let text = match String::from_utf8(bytes) {
        Ok(text) => text,
        Err(err) => {
            debug!("input is not valid UTF-8, decoding as Latin-1");
            err.into_bytes().iter().map(|&b| b as char).collect()
        }
    };

    match text.strip_prefix('\u{feff}') {
        Some(stripped) => stripped.to_string(),
        None => text,
    }
}

fn read_delimited(bytes: Vec<u8>, separator: u8, source_name: &str) -> PipelineResult<DataFrame> {
    let text = decode_text(bytes);
    if text.trim().is_empty() {
        return Err(PipelineError::EmptyDataset {
            source_name: source_name.to_string(),
        });
    }

    // Schema length 0 keeps every column as String
    CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(0))
        .map_parse_options(|opts| opts.with_separator(separator))
        .into_reader_with_file_handle(Cursor::new(text.into_bytes()))
        .finish()
        .map_err(|e| PipelineError::InputRead {
            path: source_name.to_string(),
            reason: e.to_string(),
        })
}

fn cell_text(cell: &Data) -> Option<String> {
    match cell {
        Data::Empty | Data::Error(_) => None,
        Data::String(s) if s.trim().is_empty() => None,
        Data::String(s) => Some(s.clone()),
        Data::Float(f) => Some(f.to_string()),
        Data::Int(i) => Some(i.to_string()),
        Data::Bool(b) => Some(b.to_string()),
        other => Some(other.to_string()),
    }
}

/// Header names with blanks filled and duplicates suffixed
fn unique_headers(raw: Vec<String>) -> Vec<String> {
    let mut seen = rustc_hash::FxHashMap::<String, usize>::default();
    raw.into_iter()
        .enumerate()
        .map(|(idx, name)| {
            let name = if name.trim().is_empty() {
                format!("column_{}", idx + 1)
            } else {
                name
            };
            let count = seen.entry(name.clone()).or_insert(0);
            *count += 1;
            if *count == 1 {
                name
            } else {
                format!("{}_duplicated_{}", name, *count - 2)
            }
        })
        .collect()
}

fn read_spreadsheet(bytes: Vec<u8>, source_name: &str) -> PipelineResult<DataFrame> {
    let read_err = |reason: String| PipelineError::InputRead {
        path: source_name.to_string(),
        reason,
    };

    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes)).map_err(|e| read_err(e.to_string()))?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| read_err("workbook has no sheets".to_string()))?
        .map_err(|e| read_err(e.to_string()))?;

    let mut rows = range.rows();
    let Some(header_row) = rows.next() else {
        return Err(PipelineError::EmptyDataset {
            source_name: source_name.to_string(),
        });
    };

    let headers = unique_headers(
        header_row
            .iter()
            .map(|cell| cell_text(cell).unwrap_or_default())
            .collect(),
    );

    let mut values: Vec<Vec<Option<String>>> = vec![Vec::new(); headers.len()];
    for row in rows {
        for (idx, cell) in row.iter().enumerate().take(headers.len()) {
            values[idx].push(cell_text(cell));
        }
    }

    let columns: Vec<Column> = headers
        .into_iter()
        .zip(values)
        .map(|(name, cells)| Column::from(Series::new(name.into(), cells)))
        .collect();

    Ok(DataFrame::new(columns)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_dataset_loads() {
        let data = RawDataset::sample().expect("sample data should parse");
        assert_eq!(data.source_name, SAMPLE_SOURCE_NAME);
        assert!(data.frame.height() > 0);
        // Everything stays text until coercion
        for column in data.frame.get_columns() {
            assert_eq!(column.dtype(), &DataType::String);
        }
    }

    #[test]
    fn test_format_from_extension() {
        assert_eq!(
            InputFormat::from_path(Path::new("run.CSV")),
            Some(InputFormat::Delimited { separator: b',' })
        );
        assert_eq!(
            InputFormat::from_path(Path::new("run.tsv")),
            Some(InputFormat::Delimited { separator: b'\t' })
        );
        assert_eq!(InputFormat::from_path(Path::new("run.xlsx")), Some(InputFormat::Spreadsheet));
        assert_eq!(InputFormat::from_path(Path::new("run.pdf")), None);
        assert_eq!(InputFormat::from_path(Path::new("run")), None);
    }

    #[test]
    fn test_unsupported_extension_is_input_error() {
        let err = RawDataset::load(Path::new("results.pdf")).unwrap_err();
        assert!(matches!(err, PipelineError::UnsupportedFormat { .. }));
    }

    #[test]
    fn test_missing_file_is_read_error() {
        let err = RawDataset::load(Path::new("/nonexistent/forced_deg.csv")).unwrap_err();
        assert!(matches!(err, PipelineError::InputRead { .. }));
        assert!(err.to_string().contains("forced_deg.csv"));
    }

    #[test]
    fn test_latin1_fallback() {
        // "Stress Type" value "Hydrolyse à 60°C" encoded as Latin-1
        let mut bytes = b"API Assay,Stress Type,Time,Degradant A\n98.0,Hydrolyse ".to_vec();
        bytes.extend_from_slice(&[0xE0, b' ', b'6', b'0', 0xB0, b'C']);
        bytes.extend_from_slice(b",1,0.5\n");

        let data = RawDataset::from_bytes(bytes, InputFormat::Delimited { separator: b',' }, "legacy.csv").unwrap();
        let stress = data.frame.column("Stress Type").unwrap().str().unwrap().get(0).unwrap().to_string();
        assert_eq!(stress, "Hydrolyse à 60°C");
    }

    #[test]
    fn test_tab_separated() {
        let bytes = b"api_assay\tstress\ttime\tdegradant_1\n99\tAcid\t0\t1\n".to_vec();
        let data = RawDataset::from_bytes(bytes, InputFormat::Delimited { separator: b'\t' }, "run.tsv").unwrap();
        assert_eq!(data.frame.width(), 4);
        assert_eq!(data.frame.height(), 1);
    }

    #[test]
    fn test_header_only_is_empty() {
        let bytes = b"api_assay,stress,time,degradant_1\n".to_vec();
        let err = RawDataset::from_bytes(bytes, InputFormat::Delimited { separator: b',' }, "blank.csv").unwrap_err();
        assert!(matches!(err, PipelineError::EmptyDataset { .. }));
    }

    #[test]
    fn test_blank_file_is_empty() {
        let err = RawDataset::from_bytes(Vec::new(), InputFormat::Delimited { separator: b',' }, "blank.csv").unwrap_err();
        assert!(matches!(err, PipelineError::EmptyDataset { .. }));
    }

    #[test]
    fn test_corrupt_spreadsheet_is_read_error() {
        let err = RawDataset::from_bytes(b"not a workbook".to_vec(), InputFormat::Spreadsheet, "broken.xlsx").unwrap_err();
        assert!(matches!(err, PipelineError::InputRead { .. }));
    }

    fn fixture(name: &str) -> std::path::PathBuf {
        Path::new(env!("CARGO_MANIFEST_DIR")).join("data").join(name)
    }

    #[test]
    fn test_xlsx_sample_loads_as_text() {
        let data = RawDataset::load(&fixture("sample_data.xlsx")).expect("workbook should parse");

        let names: Vec<String> = data.frame.get_column_names().into_iter().map(|s| s.to_string()).collect();
        assert_eq!(
            names,
            vec!["API Name", "API Code", "Stress Type", "Time", "API Assay", "Degradant A", "Degradant B", "Degradant C"]
        );
        // Ten data rows, one of them blank
        assert_eq!(data.frame.height(), 10);
        for column in data.frame.get_columns() {
            assert_eq!(column.dtype(), &DataType::String);
        }

        let text = |name: &str, row: usize| {
            data.frame.column(name).unwrap().str().unwrap().get(row).map(|s| s.to_string())
        };
        // Float and integer cells come through as text
        assert_eq!(text("API Assay", 0).as_deref(), Some("99.6"));
        assert_eq!(text("Time", 0).as_deref(), Some("0"));
        assert_eq!(text("Stress Type", 0).as_deref(), Some("Control"));
        // Blank row is all missing
        assert_eq!(text("API Name", 4), None);
        assert_eq!(text("API Assay", 4), None);
        // Text in a measurement column is kept verbatim for coercion
        assert_eq!(text("Degradant A", 7).as_deref(), Some("ND"));
    }

    #[test]
    fn test_unique_headers() {
        let headers = unique_headers(vec!["A".into(), "".into(), "A".into(), "A".into()]);
        assert_eq!(headers, vec!["A", "column_2", "A_duplicated_0", "A_duplicated_1"]);
    }

    #[test]
    fn test_decode_strips_bom() {
        let text = decode_text("\u{feff}api_assay".as_bytes().to_vec());
        assert_eq!(text, "api_assay");
    }
}
