// Reads the contest table from an Excel workbook. The worksheet is rendered
// back to the comma separated form the table parser reads.

use std::path::PathBuf;

use calamine::{open_workbook, DataType, Range, Reader, Xlsx};

use crate::judging::io_common::{render_row, transport_error};
use crate::judging::*;

pub struct XlsxFile {
    path: PathBuf,
    worksheet: Option<String>,
}

impl XlsxFile {
    pub fn new(path: PathBuf, worksheet: Option<String>) -> XlsxFile {
        XlsxFile { path, worksheet }
    }

    fn get_range(&self) -> JudgingResult<Range<DataType>> {
        let path = self.path.display().to_string();
        debug!("get_range: path: {:?} worksheet: {:?}", path, self.worksheet);
        let mut workbook: Xlsx<_> =
            open_workbook(&self.path).context(OpeningExcelSnafu { path: path.clone() })?;
        let wrange_o = match &self.worksheet {
            Some(name) => workbook.worksheet_range(name),
            // No name given: the first worksheet holds the table.
            None => workbook.worksheet_range_at(0),
        };
        let wrange = wrange_o
            .context(MissingWorksheetSnafu {
                path: path.clone(),
                worksheet: self.worksheet.clone().unwrap_or_else(|| "#0".to_string()),
            })?
            .context(OpeningExcelSnafu { path })?;
        Ok(wrange)
    }
}

fn render_cell(cell: &DataType) -> String {
    match cell {
        DataType::Empty => String::new(),
        DataType::String(s) => s.clone(),
        DataType::Int(i) => i.to_string(),
        // Entry numbers typed in a spreadsheet come back as floats.
        DataType::Float(f) if f.fract() == 0.0 && f.abs() < 1e15 => format!("{}", *f as i64),
        DataType::Float(f) => f.to_string(),
        DataType::Bool(b) => b.to_string(),
        other => other.to_string(),
    }
}

pub fn render_range(wrange: &Range<DataType>) -> String {
    wrange
        .rows()
        .map(|row| {
            let cells: Vec<String> = row.iter().map(render_cell).collect();
            render_row(&cells)
        })
        .collect::<Vec<String>>()
        .join("\n")
}

impl TableSource for XlsxFile {
    fn fetch_table(&self) -> Result<String, TransportError> {
        let wrange = self
            .get_range()
            .map_err(|e| transport_error(&format!("reading {}", self.path.display()), e))?;
        debug!("fetch_table: xlsx {:?} rows", wrange.height());
        Ok(render_range(&wrange))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ballot_engine::parse_table;

    #[test]
    fn cells_to_text() {
        assert_eq!(render_cell(&DataType::Empty), "");
        assert_eq!(render_cell(&DataType::Float(3.0)), "3");
        assert_eq!(render_cell(&DataType::Float(2.5)), "2.5");
        assert_eq!(render_cell(&DataType::Int(7)), "7");
        assert_eq!(render_cell(&DataType::String("a".to_string())), "a");
    }

    #[test]
    fn worksheet_to_table() {
        let mut wrange: Range<DataType> = Range::new((0, 0), (2, 2));
        wrange.set_value((0, 0), DataType::String("Category".to_string()));
        wrange.set_value((0, 1), DataType::String("EntryID".to_string()));
        wrange.set_value((0, 2), DataType::String("Title".to_string()));
        wrange.set_value((1, 0), DataType::String("Spot News".to_string()));
        wrange.set_value((1, 1), DataType::String("spot_news_01".to_string()));
        wrange.set_value((1, 2), DataType::String("Flood, then fire".to_string()));
        wrange.set_value((2, 0), DataType::String("Spot News".to_string()));
        wrange.set_value((2, 1), DataType::Float(2.0));
        let cats = parse_table(&render_range(&wrange));
        assert_eq!(cats.len(), 1);
        assert_eq!(cats[0].id, "spot_news");
        assert_eq!(cats[0].entries[0].title, "Flood, then fire");
        assert_eq!(cats[0].entries[1].id, "2");
        assert_eq!(cats[0].entries[1].title, "");
    }

    #[test]
    fn missing_workbook() {
        let src = XlsxFile::new(PathBuf::from("/nonexistent/judgebox/entries.xlsx"), None);
        assert!(src.fetch_table().is_err());
    }
}
