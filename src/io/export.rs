//! Export the aligned training table to CSV.
//!
//! The export is meant to be easy to consume in spreadsheets or downstream scripts.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::domain::ObservationSet;
use crate::error::{BaselineError, Result};

/// Write `date,<feature...>` rows to a CSV file.
pub fn write_observations_csv(path: &Path, set: &ObservationSet) -> Result<()> {
    let file = File::create(path).map_err(|e| {
        BaselineError::Io(format!("failed to create export CSV '{}': {e}", path.display()))
    })?;
    let mut out = BufWriter::new(file);
    write_observations(&mut out, set)?;
    out.flush()
        .map_err(|e| BaselineError::Io(format!("failed to flush export CSV: {e}")))
}

/// Write the CSV body to any writer.
pub fn write_observations<W: Write>(out: &mut W, set: &ObservationSet) -> Result<()> {
    writeln!(out, "date,{}", set.features().join(","))
        .map_err(|e| BaselineError::Io(format!("failed to write export CSV header: {e}")))?;

    for record in set.records() {
        let values: Vec<String> = record.values.iter().map(|v| format!("{v:.4}")).collect();
        writeln!(out, "{},{}", record.date, values.join(","))
            .map_err(|e| BaselineError::Io(format!("failed to write export CSV row: {e}")))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    #[test]
    fn csv_has_header_and_one_line_per_record() {
        let mut set = ObservationSet::new(["temperature", "consumption"]).unwrap();
        set.push(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(), vec![1.5, 42.0]).unwrap();
        set.push(NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(), vec![-0.25, 40.125]).unwrap();

        let mut buf = Vec::new();
        write_observations(&mut buf, &set).unwrap();
        assert_eq!(
            String::from_utf8(buf).unwrap(),
            "date,temperature,consumption\n2024-01-01,1.5000,42.0000\n2024-01-02,-0.2500,40.1250\n"
        );
    }
}
