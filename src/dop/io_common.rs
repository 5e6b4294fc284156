// Primitives for reading the CSV files.

use std::io::Read;

use crate::dop::*;

/// Reads all the data rows of a CSV file, decoding each with `parse`.
///
/// The first line is the header and is skipped. The line numbers in the
/// errors count the header as line 1.
pub fn read_rows<R, T, F>(reader: R, path: &str, parse: F) -> ConvertResult<Vec<T>>
where
    R: Read,
    F: Fn(&[&str]) -> DopResult<T>,
{
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        // The field count is checked per schema by the parser.
        .flexible(true)
        .from_reader(reader);
    let header = rdr.headers().context(CsvLineParseSnafu { path })?;
    debug!("{}: header: {:?}", path, header);

    let mut res: Vec<T> = Vec::new();
    for (idx, line_r) in rdr.records().enumerate() {
        let lineno = (idx + 2) as u64;
        let line = line_r.context(CsvLineParseSnafu { path })?;
        let fields: Vec<&str> = line.iter().collect();
        let row = parse(fields.as_slice()).context(CsvRowSnafu { path, lineno })?;
        res.push(row);
    }
    info!("{}: read {} rows", simplify_file_name(path), res.len());
    Ok(res)
}

pub fn open_file(path: &str) -> ConvertResult<fs::File> {
    fs::File::open(path).context(OpeningFileSnafu { path })
}

pub fn simplify_file_name(path: &str) -> String {
    Path::new(path)
        .file_name()
        .and_then(|s| s.to_str())
        .unwrap_or(path)
        .to_string()
}
