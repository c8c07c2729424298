// src/data_input/fit_params.rs

use csv::StringRecord;
use std::error::Error;
use std::path::Path;

use crate::data_input::file_naming::matches_file;
use crate::data_input::table::{parse_cell, Table};
use crate::error::RenderError;

/// Saved NMR fit: peak parameters plus the zero-fill count the fit was made with.
#[derive(Debug, Clone, PartialEq)]
pub struct NmrFitRecord {
    pub popt: Vec<f64>,
    pub zerofill_num: usize,
}

fn find_record<'a>(table: &'a Table, data_filename: &str) -> Result<&'a StringRecord, RenderError> {
    table
        .records
        .iter()
        .find(|r| r.get(0).is_some_and(|key| matches_file(key, data_filename)))
        .ok_or_else(|| RenderError::MissingEntry {
            key: data_filename.to_string(),
            filename: table.source.clone(),
        })
}

/// Parameters from column `skip` on. Trailing empty cells are allowed; any other
/// non-numeric cell would shift the parameters after it and is rejected.
fn numeric_tail(record: &StringRecord, skip: usize, source: &str) -> Result<Vec<f64>, RenderError> {
    let mut values = Vec::new();
    for (column, cell) in record.iter().enumerate().skip(skip) {
        if cell.trim().is_empty() {
            continue;
        }
        match parse_cell(Some(cell)) {
            Some(v) => values.push(v),
            None => {
                return Err(RenderError::InvalidNumber {
                    value: cell.to_string(),
                    column,
                    filename: source.to_string(),
                })
            }
        }
    }
    Ok(values)
}

/// Optimized parameters of a shared X/Y sweep fit for `data_filename`.
pub fn load_sweep_fit_params(
    popt_path: &Path,
    data_filename: &str,
) -> Result<Vec<f64>, Box<dyn Error>> {
    let table = Table::read(popt_path)?;
    let record = find_record(&table, data_filename)?;
    let popt = numeric_tail(record, 1, &table.source)?;
    if popt.is_empty() {
        return Err(RenderError::EmptyData {
            filename: table.source.clone(),
        }
        .into());
    }
    Ok(popt)
}

/// Optimized FID parameters and zero-fill count for `data_filename`.
pub fn load_nmr_fit_params(
    popt_path: &Path,
    data_filename: &str,
) -> Result<NmrFitRecord, Box<dyn Error>> {
    let table = Table::read(popt_path)?;
    let record = find_record(&table, data_filename)?;
    let zerofill = parse_cell(record.get(1)).ok_or_else(|| RenderError::MissingColumn {
        column: "zerofillnum".to_string(),
        filename: table.source.clone(),
    })?;
    if zerofill < 0.0 || zerofill.fract() != 0.0 {
        return Err(RenderError::InvalidZeroFill {
            value: zerofill,
            filename: table.source.clone(),
        }
        .into());
    }
    let popt = numeric_tail(record, 2, &table.source)?;
    if popt.is_empty() {
        return Err(RenderError::EmptyData {
            filename: table.source.clone(),
        }
        .into());
    }
    Ok(NmrFitRecord {
        popt,
        zerofill_num: zerofill as usize,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sweep_fit_params() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("popt.csv");
        std::fs::write(
            &path,
            "Filename,A,d,f0,c\nh1m_001.dat,1.0,0.1,500,0.02\nh1m_002.dat,2.0,0.2,510,\n",
        )
        .unwrap();
        assert_eq!(
            load_sweep_fit_params(&path, "h1m_001.dat").unwrap(),
            vec![1.0, 0.1, 500.0, 0.02]
        );
        assert_eq!(
            load_sweep_fit_params(&path, "data/h1m_002.dat").unwrap(),
            vec![2.0, 0.2, 510.0]
        );
        assert!(load_sweep_fit_params(&path, "h1m_003.dat").is_err());
    }

    #[test]
    fn test_nmr_fit_params() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nmr_popt.csv");
        std::fs::write(
            &path,
            "Filename,zerofillnum,A,f,T2,phase\nNMR_010,1024,1.0,3e4,1e-3,0.1\nNMR_011,1.5,1,1,1,1\n",
        )
        .unwrap();
        let record = load_nmr_fit_params(&path, "NMR_010.dat").unwrap();
        assert_eq!(record.zerofill_num, 1024);
        assert_eq!(record.popt, vec![1.0, 3e4, 1e-3, 0.1]);
        let err = load_nmr_fit_params(&path, "NMR_011.dat").unwrap_err();
        assert!(matches!(
            err.downcast_ref::<RenderError>(),
            Some(RenderError::InvalidZeroFill { value, .. }) if *value == 1.5
        ));
    }

    #[test]
    fn test_non_numeric_parameter_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("popt.csv");
        std::fs::write(&path, "Filename,A,d,f0
h1m_001.dat,1.0,n/a,500
").unwrap();
        let err = load_sweep_fit_params(&path, "h1m_001.dat").unwrap_err();
        match err.downcast_ref::<RenderError>() {
            Some(RenderError::InvalidNumber { value, column, .. }) => {
                assert_eq!(value, "n/a");
                assert_eq!(*column, 2);
            }
            other => panic!("unexpected error {other:?}"),
        }
    }
}
