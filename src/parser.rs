use serde_json::{Map, Value as JsonValue};
use std::fs::File;
use std::io::{BufRead, BufReader, Lines, Result as IoResult};
use std::path::Path;

pub type JsonRecord = Map<String, JsonValue>;

/// Read back a log file written with the JSON encoder, one record per line.
pub struct LogParser {
    reader: BufReader<File>,
}

impl LogParser {
    pub fn new<P: AsRef<Path>>(file_path: P, buf_size: usize) -> IoResult<Self> {
        let f = File::open(file_path)?;
        let reader = BufReader::with_capacity(buf_size, f);
        Ok(Self { reader })
    }

    pub fn lines(self) -> LogParserLineIter {
        LogParserLineIter { lines: self.reader.lines() }
    }
}

pub struct LogParserLineIter {
    lines: Lines<BufReader<File>>,
}

impl Iterator for LogParserLineIter {
    type Item = IoResult<JsonRecord>;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let line = match self.lines.next() {
                None => return None,
                Some(Err(e)) => return Some(Err(e)),
                Some(Ok(line)) => line,
            };
            if let Ok(JsonValue::Object(record)) = serde_json::from_str(&line) {
                return Some(Ok(record));
            }
            // Ignore unrecognized format
        }
    }
}
