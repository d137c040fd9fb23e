// Reads the contest table from a CSV file on disk.

use std::fs;
use std::path::PathBuf;

use crate::judging::io_common::transport_error;
use crate::judging::*;

pub struct CsvFile {
    path: PathBuf,
}

impl CsvFile {
    pub fn new(path: PathBuf) -> CsvFile {
        CsvFile { path }
    }
}

impl TableSource for CsvFile {
    fn fetch_table(&self) -> Result<String, TransportError> {
        debug!("fetch_table: csv {:?}", self.path);
        fs::read_to_string(&self.path)
            .map_err(|e| transport_error(&format!("reading {}", self.path.display()), e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_is_a_transport_error() {
        let src = CsvFile::new(PathBuf::from("/nonexistent/judgebox/entries.csv"));
        let err = src.fetch_table().unwrap_err();
        assert!(err.message.contains("entries.csv"));
    }
}
