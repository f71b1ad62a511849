// Column mapping and cell coercion shared by all the readers.

use std::collections::HashMap;

use crate::flip::*;

pub const YEAR: &str = "year";
pub const ABBR: &str = "abbr";
pub const D_VOTES: &str = "D_votes";
pub const R_VOTES: &str = "R_votes";
pub const T_VOTES: &str = "T_votes";
pub const TOTAL_VOTES: &str = "total_votes";
pub const ELECTORAL_VOTES: &str = "electoral_votes";

/// The position of each required column.
#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub struct ColumnIndex {
    pub year: usize,
    pub abbr: usize,
    pub d_votes: usize,
    pub r_votes: usize,
    pub t_votes: usize,
    pub total_votes: usize,
    pub electoral_votes: usize,
}

/// Given the header of a file (names of each of the columns), finds the position of
/// every required column. Extra columns are ignored.
pub fn get_col_index(header: &[Option<String>], path: &str) -> FlipResult<ColumnIndex> {
    let col_names: HashMap<String, usize> = header
        .iter()
        .enumerate()
        .rev()
        .filter_map(|(idx, x)| x.as_ref().map(|s| (s.trim().to_string(), idx)))
        .collect();
    debug!("get_col_index: col_names: {:?}", col_names);

    let find = |column: &str| -> FlipResult<usize> {
        col_names
            .get(column)
            .cloned()
            .context(MissingColumnSnafu { column, path })
    };
    Ok(ColumnIndex {
        year: find(YEAR)?,
        abbr: find(ABBR)?,
        d_votes: find(D_VOTES)?,
        r_votes: find(R_VOTES)?,
        t_votes: find(T_VOTES)?,
        total_votes: find(TOTAL_VOTES)?,
        electoral_votes: find(ELECTORAL_VOTES)?,
    })
}

/// Reads a count the way the upstream tables write them: possibly as a decimal,
/// truncated toward zero. Returns None for anything that is not a finite,
/// non-negative number.
pub fn parse_count(raw: &str) -> Option<u64> {
    let x: f64 = raw.trim().parse().ok()?;
    if x.is_finite() && x >= 0.0 && x < (u64::MAX as f64) {
        Some(x.trunc() as u64)
    } else {
        None
    }
}

/// Like `parse_count`, but a malformed value becomes 0. An empty cell is a silent 0.
pub fn coerce_count(raw: &str, lineno: usize, column: &str) -> u64 {
    if raw.trim().is_empty() {
        return 0;
    }
    match parse_count(raw) {
        Some(x) => x,
        None => {
            warn!(
                "line {}: cannot read {} {:?}, using 0 instead",
                lineno, column, raw
            );
            0
        }
    }
}

pub fn parse_year(raw: &str, lineno: usize) -> FlipResult<u32> {
    match parse_count(raw) {
        Some(x) if x <= u32::MAX as u64 => Ok(x as u32),
        _ => InvalidYearSnafu {
            lineno,
            content: raw,
        }
        .fail(),
    }
}

fn cell_at(cells: &[String], pos: usize) -> &str {
    cells.get(pos).map(|s| s.as_str()).unwrap_or("")
}

/// Builds a unit out of the cells of a row. Missing trailing cells count as empty.
pub fn unit_from_cells(
    cells: &[String],
    idx: &ColumnIndex,
    lineno: usize,
) -> FlipResult<UnitResult> {
    let cell = |pos: usize| cell_at(cells, pos);

    let year = parse_year(cell(idx.year), lineno)?;
    let ev_raw = coerce_count(cell(idx.electoral_votes), lineno, ELECTORAL_VOTES);
    let electoral_votes = match u32::try_from(ev_raw) {
        Ok(x) => x,
        Err(_) => {
            warn!(
                "line {}: {} {} out of range, using 0 instead",
                lineno, ELECTORAL_VOTES, ev_raw
            );
            0
        }
    };
    Ok(UnitResult {
        year,
        abbr: cell(idx.abbr).trim().to_string(),
        d_votes: coerce_count(cell(idx.d_votes), lineno, D_VOTES),
        r_votes: coerce_count(cell(idx.r_votes), lineno, R_VOTES),
        t_votes: coerce_count(cell(idx.t_votes), lineno, T_VOTES),
        total_votes: coerce_count(cell(idx.total_votes), lineno, TOTAL_VOTES),
        electoral_votes,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header(names: &[&str]) -> Vec<Option<String>> {
        names.iter().map(|s| Some(s.to_string())).collect()
    }

    fn cells(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn counts() {
        assert_eq!(parse_count("12"), Some(12));
        assert_eq!(parse_count(" 12.0 "), Some(12));
        assert_eq!(parse_count("12.9"), Some(12));
        assert_eq!(parse_count("-3"), None);
        assert_eq!(parse_count("NaN"), None);
        assert_eq!(parse_count("1,234"), None);
        assert_eq!(parse_count(""), None);
        assert_eq!(coerce_count("abc", 3, D_VOTES), 0);
        assert_eq!(coerce_count("", 3, D_VOTES), 0);
        assert_eq!(coerce_count("1e3", 3, D_VOTES), 1000);
    }

    #[test]
    fn years() {
        assert_eq!(parse_year("2020", 2).unwrap(), 2020);
        assert_eq!(parse_year("2020.0", 2).unwrap(), 2020);
        assert!(matches!(
            parse_year("twenty", 7),
            Err(FlipError::InvalidYear { lineno: 7, .. })
        ));
        assert!(parse_year("", 7).is_err());
    }

    #[test]
    fn columns_in_any_order() {
        let h = header(&[
            "electoral_votes",
            "state",
            "abbr",
            "year",
            "T_votes",
            "R_votes",
            "D_votes",
            "total_votes",
        ]);
        let idx = get_col_index(&h, "x.csv").unwrap();
        assert_eq!(idx.electoral_votes, 0);
        assert_eq!(idx.abbr, 2);
        assert_eq!(idx.total_votes, 7);

        let row = cells(&["3", "Maine", "ME-01", "2016", "", "100", "120.0", "230"]);
        let u = unit_from_cells(&row, &idx, 2).unwrap();
        assert_eq!(u.year, 2016);
        assert_eq!(u.abbr, "ME-01");
        assert_eq!((u.d_votes, u.r_votes, u.t_votes), (120, 100, 0));
        assert_eq!((u.total_votes, u.electoral_votes), (230, 3));

        // Short rows.
        let u = unit_from_cells(&cells(&["1", "", "NE-02", "2020"]), &idx, 3).unwrap();
        assert_eq!((u.d_votes, u.total_votes, u.electoral_votes), (0, 0, 1));
    }

    #[test]
    fn missing_column() {
        let h = header(&["year", "abbr", "D_votes", "R_votes", "total_votes", "electoral_votes"]);
        let res = get_col_index(&h, "x.csv");
        match res {
            Err(FlipError::MissingColumn { column, .. }) => assert_eq!(column, "T_votes"),
            x => panic!("unexpected {:?}", x),
        }
    }
}
