// Primitives for reading CSV files.

use std::fs::File;

use crate::flip::{
    io_common::{get_col_index, unit_from_cells},
    *,
};

pub fn read_csv_margins(path: &str) -> FlipResult<Vec<UnitResult>> {
    let mut rdr = get_reader(path)?;

    let header: Vec<Option<String>> = rdr
        .headers()
        .context(CsvLineParseSnafu { lineno: 1_usize })?
        .iter()
        .map(|s| Some(s.to_string()))
        .collect();
    debug!("read_csv_margins: header: {:?}", header);
    let col_index = get_col_index(&header, path)?;

    let mut res: Vec<UnitResult> = Vec::new();
    for (idx, line_r) in rdr.records().enumerate() {
        // The header is line 1.
        let lineno = idx + 2;
        let line = line_r.context(CsvLineParseSnafu { lineno })?;
        let cells: Vec<String> = line.iter().map(|s| s.to_string()).collect();
        if cells.iter().all(|s| s.trim().is_empty()) {
            debug!("read_csv_margins: skipping empty line {}", lineno);
            continue;
        }
        let unit = unit_from_cells(&cells, &col_index, lineno)?;
        debug!("read_csv_margins: lineno: {:?} unit: {:?}", lineno, unit);
        res.push(unit);
    }
    Ok(res)
}

fn get_reader(path: &str) -> FlipResult<csv::Reader<File>> {
    csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)
        .context(CsvOpenSnafu { path })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_small_margins() {
        let path = format!("{}/tests/data/margins_small.csv", env!("CARGO_MANIFEST_DIR"));
        let units = read_csv_margins(&path).unwrap();
        assert_eq!(units.len(), 9);
        let xx = units.iter().find(|u| u.abbr == "XX").unwrap();
        assert_eq!((xx.year, xx.d_votes, xx.r_votes, xx.electoral_votes), (2004, 0, 0, 0));
        let cc = units
            .iter()
            .find(|u| u.abbr == "CC" && u.year == 1912)
            .unwrap();
        assert_eq!((cc.d_votes, cc.electoral_votes), (100, 3));
    }

    #[test]
    fn missing_file() {
        let res = read_csv_margins("/nonexistent/margins.csv");
        assert!(matches!(res, Err(FlipError::CsvOpen { .. })));
    }
}
