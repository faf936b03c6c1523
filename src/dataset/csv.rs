use crate::error::DatasetError;
use crate::image::{ImageF32, ImageView};
use csv::{ReaderBuilder, StringRecord, Trim, WriterBuilder};
use std::fs;
use std::io::Read;
use std::path::Path;

/// Read a comma-separated grid of floats, one image row per line.
///
/// Blank lines are ignored; every remaining row must have the same number of
/// columns.
pub fn read_csv_map(path: &Path) -> Result<ImageF32, DatasetError> {
    let file = fs::File::open(path).map_err(|e| DatasetError::io(path, e))?;
    parse_csv_map(file).map_err(|(line, message)| DatasetError::parse(path, line, message))
}

fn line_of(record: &StringRecord) -> usize {
    record.position().map_or(0, |p| p.line() as usize)
}

fn parse_csv_map<R: Read>(input: R) -> Result<ImageF32, (usize, String)> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(input);

    let mut data = Vec::new();
    let mut width = None;
    let mut height = 0usize;
    let mut record = StringRecord::new();
    loop {
        let more = reader.read_record(&mut record).map_err(|e| {
            let line = e.position().map_or(0, |p| p.line() as usize);
            (line, e.to_string())
        })?;
        if !more {
            break;
        }
        let line = line_of(&record);
        for field in record.iter() {
            let v: f32 = field
                .parse()
                .map_err(|_| (line, format!("invalid value {field:?}")))?;
            data.push(v);
        }
        let cols = record.len();
        match width {
            None => width = Some(cols),
            Some(w) if w != cols => {
                return Err((line, format!("expected {w} columns, found {cols}")));
            }
            Some(_) => {}
        }
        height += 1;
    }
    let width = width.ok_or((0, "no rows".to_string()))?;
    ImageF32::from_vec(width, height, data).ok_or((0, "inconsistent grid size".to_string()))
}

/// Write `map` as comma-separated rows. Values use the shortest
/// representation that reads back to the same `f32`.
pub fn write_csv_map(map: &ImageF32, path: &Path) -> Result<(), DatasetError> {
    crate::image::io::ensure_parent_dir(path)?;
    let csv_err = |source: csv::Error| DatasetError::Csv {
        path: path.to_path_buf(),
        source,
    };
    let mut writer = WriterBuilder::new()
        .has_headers(false)
        .from_path(path)
        .map_err(csv_err)?;
    for row in map.rows() {
        writer
            .write_record(row.iter().map(|v| v.to_string()))
            .map_err(csv_err)?;
    }
    writer.flush().map_err(|e| DatasetError::io(path, e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_rows_and_skips_blank_lines() {
        let map = parse_csv_map("1,2,3\n4, 5 ,-1\n\n".as_bytes()).unwrap();
        assert_eq!(map.dims(), (3, 2));
        assert_eq!(map.get(1, 1), 5.0);
        assert_eq!(map.get(2, 1), -1.0);
    }

    #[test]
    fn ragged_rows_report_the_line() {
        let err = parse_csv_map("1,2\n3\n".as_bytes()).unwrap_err();
        assert_eq!(err.0, 2);
        let err = parse_csv_map("1,x\n".as_bytes()).unwrap_err();
        assert_eq!(err.0, 1);
        assert!(parse_csv_map("\n\n".as_bytes()).is_err());
    }
}
