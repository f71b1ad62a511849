use calamine::{open_workbook, DataType, Reader, Xlsx};

use crate::flip::{
    io_common::{get_col_index, unit_from_cells},
    *,
};

pub fn read_excel_margins(path: &str, worksheet_name: Option<&str>) -> FlipResult<Vec<UnitResult>> {
    let wrange = get_range(path, worksheet_name)?;

    let mut iter = wrange.rows();
    let header_cells = iter.next().context(EmptyExcelSnafu { path })?;
    let header: Vec<Option<String>> = header_cells
        .iter()
        .map(|dt| match dt {
            DataType::String(s) => Some(s.clone()),
            _ => None,
        })
        .collect();
    debug!("read_excel_margins: header: {:?}", header);
    let col_index = get_col_index(&header, path)?;

    let mut res: Vec<UnitResult> = Vec::new();
    for (idx, row) in iter.enumerate() {
        // Same numbering as in the spreadsheet program, the header is row 1.
        let lineno = idx + 2;
        let cells: Vec<String> = row.iter().map(cell_text).collect();
        if cells.iter().all(|s| s.trim().is_empty()) {
            continue;
        }
        let unit = unit_from_cells(&cells, &col_index, lineno)?;
        debug!("read_excel_margins: lineno: {:?} unit: {:?}", lineno, unit);
        res.push(unit);
    }
    Ok(res)
}

// Numbers are rendered so that the common coercion rules apply. Other cell
// types do not parse as numbers.
fn cell_text(cell: &DataType) -> String {
    match cell {
        DataType::String(s) => s.clone(),
        DataType::Float(f) => f.to_string(),
        DataType::Int(i) => i.to_string(),
        DataType::Empty => "".to_string(),
        x => format!("{:?}", x),
    }
}

fn get_range(path: &str, worksheet_name: Option<&str>) -> FlipResult<calamine::Range<DataType>> {
    debug!(
        "read_excel_margins: path: {:?} worksheet: {:?}",
        path, worksheet_name
    );
    let mut workbook: Xlsx<_> = open_workbook(path).context(OpeningExcelSnafu { path })?;

    // A worksheet name was provided, use it.
    if let Some(name) = worksheet_name {
        let wrange = workbook
            .worksheet_range(name)
            .context(EmptyExcelSnafu { path })?
            .context(OpeningExcelSnafu { path })?;
        return Ok(wrange);
    }
    let all_worksheets = workbook.worksheets();
    match all_worksheets.as_slice() {
        [] => EmptyExcelSnafu { path }.fail(),
        [(worksheet_name, wrange)] => {
            debug!("read_excel_margins: using worksheet {:?}", worksheet_name);
            Ok(wrange.clone())
        }
        _ => AmbiguousWorksheetSnafu { path }.fail(),
    }
}
