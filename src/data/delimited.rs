use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use csv::ReaderBuilder;

use crate::data::dataset::Dataset;
use crate::error::{Error, Result};
use crate::math::Matrix;

/// Loads a headerless delimited file where column 0 is the label and every
/// other column is a numeric feature.
pub fn load_delimited<P: AsRef<Path>>(path: P, delimiter: u8) -> Result<Dataset> {
    let path = path.as_ref();
    let file = File::open(path)
        .map_err(|e| Error::InvalidData(format!("failed to open {}: {e}", path.display())))?;
    let dataset = read_delimited(BufReader::new(file), delimiter)?;
    log::info!(
        "loaded {} rows with {} features from {}",
        dataset.len(),
        dataset.feature_count(),
        path.display()
    );
    Ok(dataset)
}

/// Same as [`load_delimited`] for any reader.
pub fn read_delimited<R: Read>(reader: R, delimiter: u8) -> Result<Dataset> {
    let mut rdr = ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(false)
        .flexible(true)
        .from_reader(reader);

    let mut features: Vec<Vec<f64>> = Vec::new();
    let mut labels: Vec<Vec<f64>> = Vec::new();

    for (row_idx, record) in rdr.records().enumerate() {
        let record = record.map_err(|e| Error::InvalidData(format!("row {}: {e}", row_idx + 1)))?;
        if record.iter().all(|cell| cell.trim().is_empty()) {
            continue;
        }
        if record.len() < 2 {
            return Err(Error::InvalidData(format!(
                "row {}: expected a label and at least one feature, got {} columns",
                row_idx + 1,
                record.len()
            )));
        }

        let values = record
            .iter()
            .map(|cell| {
                cell.trim().parse::<f64>().map_err(|_| {
                    Error::InvalidData(format!("row {}: '{cell}' is not a number", row_idx + 1))
                })
            })
            .collect::<Result<Vec<f64>>>()?;

        if let Some(first) = features.first() {
            if first.len() != values.len() - 1 {
                return Err(Error::InvalidData(format!(
                    "row {}: expected {} features, got {}",
                    row_idx + 1,
                    first.len(),
                    values.len() - 1
                )));
            }
        }

        labels.push(vec![values[0]]);
        features.push(values[1..].to_vec());
    }

    if features.is_empty() {
        return Err(Error::InvalidData("file contains no rows".into()));
    }

    Dataset::new(Matrix::new(features)?, Matrix::new(labels)?)
}
