use crate::*;
use parking_lot::Mutex;
use std::fs::remove_file;
use std::io;
use std::sync::Arc;

pub const TEST_LOCK_FILE: &str = "/tmp/levelog_test_lock";

macro_rules! lock_file {
    () => {
        // NOTE: use one {} to expose the guard into context
        let lock_fd = std::fs::OpenOptions::new()
            .create(true)
            .write(true)
            .open(&super::utils::TEST_LOCK_FILE)
            .unwrap();
        let _guard = fmutex::lock_exclusive(&lock_fd).unwrap();
    };
}
pub(super) use lock_file;

/// Keep the records in memory, shared by its clones.
#[derive(Clone, Default)]
pub struct MemWriter {
    records: Arc<Mutex<Vec<(Level, Vec<u8>)>>>,
}

impl MemWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> Vec<(Level, Vec<u8>)> {
        self.records.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.records.lock().len()
    }

    pub fn text(&self) -> String {
        let mut s = String::new();
        for (_, data) in self.records.lock().iter() {
            s.push_str(std::str::from_utf8(data).unwrap());
        }
        s
    }

    pub fn json_lines(&self) -> Vec<serde_json::Value> {
        self.text().lines().map(|line| serde_json::from_str(line).unwrap()).collect()
    }

    pub fn messages(&self) -> Vec<String> {
        self.json_lines().iter().map(|v| v["msg"].as_str().unwrap().to_string()).collect()
    }
}

impl LevelWriter for MemWriter {
    fn write_level(&mut self, level: Level, data: &[u8]) -> io::Result<usize> {
        self.records.lock().push((level, data.to_vec()));
        Ok(data.len())
    }
}

/// Fail every call.
pub struct BrokenWriter(pub &'static str);

impl LevelWriter for BrokenWriter {
    fn write_level(&mut self, _level: Level, _data: &[u8]) -> io::Result<usize> {
        Err(io::Error::other(self.0))
    }

    fn flush(&mut self) -> io::Result<()> {
        Err(io::Error::other(self.0))
    }

    fn close(&mut self) -> io::Result<()> {
        Err(io::Error::other(self.0))
    }
}

/// An encoder without the time field, so that the output is stable.
pub fn test_encoder() -> JsonEncoder {
    JsonEncoder::new().time_key("")
}

/// A logger writing into memory, with its own global state.
pub fn mem_logger(name: &str) -> (Logger, MemWriter) {
    let mem = MemWriter::new();
    let logger = Logger::new(name)
        .with_global_state(Arc::new(GlobalState::new()))
        .with_encoder(test_encoder())
        .with_writer(mem.clone());
    (logger, mem)
}

pub fn clear_test_files(builder: &Builder) {
    for file_path in builder.file_paths() {
        let _ = remove_file(file_path);
    }
}
