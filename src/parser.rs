use csv::{ReaderBuilder, StringRecord, Trim};

/// The separator used by every dealership data file.
pub const DEFAULT_DELIMITER: u8 = b',';

/// Splits a single line of delimited text into its fields.
///
/// Every delimiter starts a new field: consecutive delimiters are never
/// merged, so `",a,b,,c,,"` produces `["", "a", "b", "", "c", "", ""]`. Quote
/// characters have no special meaning. When `trim` is set each field has its
/// surrounding whitespace removed.
///
/// A line that is empty or holds only whitespace yields no fields at all,
/// rather than a single empty one.
pub fn split_record(line: &str, delimiter: u8, trim: bool) -> csv::Result<Vec<String>> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(Vec::new());
    }

    let mut rdr = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .quoting(false)
        .delimiter(delimiter)
        .trim(if trim { Trim::All } else { Trim::None })
        .from_reader(line.as_bytes());

    let mut record = StringRecord::new();
    if !rdr.read_record(&mut record)? {
        return Ok(Vec::new());
    }

    Ok(record.iter().map(String::from).collect())
}
