//! Delimited record-set reader.
//!
//! Turns one balance export into a [`RawRecordSet`]. Metadata rows listed in
//! the ingestion config are dropped; the first remaining row names the
//! columns and every later non-blank row is one sample.

use std::collections::BTreeSet;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use csv::{ReaderBuilder, StringRecord, Trim};
use tracing::debug;
use tunnel_core::config::{ColumnNames, IngestionConfig};
use tunnel_core::{Error, RawRecordSet, Result};

/// Column positions resolved from the header row.
#[derive(Debug, Clone, Copy)]
struct ColumnIndex {
    dynamic_pressure: usize,
    normal_force: usize,
    axial_force: usize,
    pitching_moment: usize,
    angle_of_attack: Option<usize>,
}

/// Reader for balance export files.
#[derive(Debug, Clone)]
pub struct RecordSetReader {
    /// Rows dropped before the header is located.
    skip_rows: BTreeSet<usize>,
    /// Field delimiter.
    delimiter: u8,
    /// Expected column names.
    columns: ColumnNames,
}

impl RecordSetReader {
    /// Create a reader from the ingestion configuration.
    pub fn new(config: &IngestionConfig) -> Result<Self> {
        if !config.delimiter.is_ascii() {
            return Err(Error::config(format!(
                "ingestion.delimiter must be a single ASCII character, got {:?}",
                config.delimiter
            )));
        }

        Ok(Self {
            skip_rows: config.skip_rows.iter().copied().collect(),
            delimiter: config.delimiter as u8,
            columns: config.columns.clone(),
        })
    }

    /// Read a record set from a file.
    pub fn read_path<P: AsRef<Path>>(&self, path: P) -> Result<RawRecordSet> {
        let path = path.as_ref();
        let file = File::open(path)?;
        self.read_from(BufReader::new(file), &path.display().to_string())
    }

    /// Read a record set from any reader.
    ///
    /// `context` names the source in error messages.
    pub fn read_from<R: Read>(&self, reader: R, context: &str) -> Result<RawRecordSet> {
        let mut csv_reader = ReaderBuilder::new()
            .delimiter(self.delimiter)
            .has_headers(false)
            .flexible(true)
            .trim(Trim::All)
            .from_reader(reader);

        let mut index: Option<ColumnIndex> = None;
        let mut records = RawRecordSet::default();

        for (row, result) in csv_reader.records().enumerate() {
            if self.skip_rows.contains(&row) {
                continue;
            }
            let record =
                result.map_err(|e| Error::ingest(format!("{context}: row {row}: {e}")))?;

            let Some(cols) = index else {
                let cols = self.resolve_columns(&record, context)?;
                if cols.angle_of_attack.is_some() {
                    records.angle_of_attack = Some(Vec::new());
                }
                index = Some(cols);
                continue;
            };

            if record.iter().all(str::is_empty) {
                continue;
            }

            records
                .dynamic_pressure
                .push(self.cell(&record, cols.dynamic_pressure, row, context)?);
            records
                .normal_force
                .push(self.cell(&record, cols.normal_force, row, context)?);
            records
                .axial_force
                .push(self.cell(&record, cols.axial_force, row, context)?);
            records
                .pitching_moment
                .push(self.cell(&record, cols.pitching_moment, row, context)?);
            if let (Some(i), Some(alpha)) = (cols.angle_of_attack, records.angle_of_attack.as_mut()) {
                alpha.push(self.cell(&record, i, row, context)?);
            }
        }

        if index.is_none() {
            return Err(Error::ingest(format!("{context}: no header row")));
        }

        debug!(source = context, samples = records.len(), "Parsed record set");
        Ok(records)
    }

    fn resolve_columns(&self, header: &StringRecord, context: &str) -> Result<ColumnIndex> {
        let find = |name: &str| header.iter().position(|h| h == name);
        let require = |name: &str| find(name).ok_or_else(|| Error::missing_column(context, name));

        Ok(ColumnIndex {
            dynamic_pressure: require(&self.columns.dynamic_pressure)?,
            normal_force: require(&self.columns.normal_force)?,
            axial_force: require(&self.columns.axial_force)?,
            pitching_moment: require(&self.columns.pitching_moment)?,
            angle_of_attack: find(&self.columns.angle_of_attack),
        })
    }

    fn cell(&self, record: &StringRecord, col: usize, row: usize, context: &str) -> Result<f64> {
        let raw = record.get(col).ok_or_else(|| {
            Error::data(format!("{context}: row {row} is missing field {col}"))
        })?;
        raw.parse::<f64>().map_err(|_| {
            Error::data(format!(
                "{context}: row {row}, field {col}: invalid number {raw:?}"
            ))
        })
    }
}

impl Default for RecordSetReader {
    fn default() -> Self {
        let config = IngestionConfig::default();
        Self {
            skip_rows: config.skip_rows.into_iter().collect(),
            delimiter: b',',
            columns: config.columns,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const PREAMBLE: &str = "\
Balance export
Run,12
Date,2024-03-01
Operator,lab
Balance,six-component
Tare,applied
Notes,none
";

    fn export(body: &str) -> String {
        format!("{PREAMBLE}{body}")
    }

    #[test]
    fn test_reads_angle_export() {
        let text = export(
            "Alpha,q,NF/SF,AF/AF2,PM/YM\n\
             deg,psf,lbf,lbf,in-lbf\n\
             0.0,1.5,0.10,0.02,0.5\n\
             5.0,1.6,0.40,0.03,0.7\n",
        );
        let records = RecordSetReader::default()
            .read_from(text.as_bytes(), "angle")
            .unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records.angle_of_attack.as_deref(), Some(&[0.0, 5.0][..]));
        assert_relative_eq!(records.dynamic_pressure[1], 1.6);
        assert_relative_eq!(records.normal_force[1], 0.40);
        assert_relative_eq!(records.axial_force[0], 0.02);
        assert_relative_eq!(records.pitching_moment[1], 0.7);
        assert!(records.check_aligned("angle").is_ok());
    }

    #[test]
    fn test_angle_column_is_optional() {
        let text = export(
            "q,NF/SF,AF/AF2,PM/YM\n\
             units\n\
             0,0,0,0\n",
        );
        let records = RecordSetReader::default()
            .read_from(text.as_bytes(), "velocity")
            .unwrap();
        assert_eq!(records.len(), 1);
        assert!(records.angle_of_attack.is_none());
    }

    #[test]
    fn test_blank_rows_are_ignored() {
        let text = export(
            "q,NF/SF,AF/AF2,PM/YM\n\
             units\n\
             1,2,3,4\n\
             ,,,\n",
        );
        let records = RecordSetReader::default()
            .read_from(text.as_bytes(), "velocity")
            .unwrap();
        assert_eq!(records.len(), 1);
    }

    #[test]
    fn test_missing_column() {
        let text = export("q,NF/SF,PM/YM\nunits\n1,2,3\n");
        let err = RecordSetReader::default()
            .read_from(text.as_bytes(), "sphere")
            .unwrap_err();
        assert!(matches!(err, Error::MissingColumn { ref column, .. } if column == "AF/AF2"));
    }

    #[test]
    fn test_invalid_number() {
        let text = export("q,NF/SF,AF/AF2,PM/YM\nunits\n1,abc,3,4\n");
        let err = RecordSetReader::default()
            .read_from(text.as_bytes(), "sphere")
            .unwrap_err();
        assert!(matches!(err, Error::Data(_)));
        assert!(err.to_string().contains("abc"));
    }

    #[test]
    fn test_empty_file() {
        let err = RecordSetReader::default()
            .read_from("".as_bytes(), "empty")
            .unwrap_err();
        assert!(matches!(err, Error::Ingest(_)));
    }

    #[test]
    fn test_custom_layout() {
        let config = IngestionConfig {
            skip_rows: vec![],
            delimiter: ';',
            ..IngestionConfig::default()
        };
        let reader = RecordSetReader::new(&config).unwrap();
        let records = reader
            .read_from("q;NF/SF;AF/AF2;PM/YM\n2;1;0;0\n".as_bytes(), "custom")
            .unwrap();
        assert_eq!(records.dynamic_pressure, vec![2.0]);
    }

    #[test]
    fn test_rejects_non_ascii_delimiter() {
        let config = IngestionConfig {
            delimiter: '§',
            ..IngestionConfig::default()
        };
        assert!(RecordSetReader::new(&config).is_err());
    }

    #[test]
    fn test_read_path() {
        let mut temp = NamedTempFile::new().unwrap();
        temp.write_all(export("q,NF/SF,AF/AF2,PM/YM\nunits\n3,1,0,2\n").as_bytes())
            .unwrap();
        let records = RecordSetReader::default().read_path(temp.path()).unwrap();
        assert_eq!(records.pitching_moment, vec![2.0]);
    }
}
