#![allow(dead_code)]

use levelog::*;
use parking_lot::Mutex;
use std::fs::remove_file;
use std::io;
use std::sync::Arc;

pub const TEST_LOCK_FILE: &str = "/tmp/levelog_test_lock";

#[macro_export]
macro_rules! lock_file {
    () => {
        // NOTE: use one {} to expose the guard into context
        let lock_fd = std::fs::OpenOptions::new()
            .create(true)
            .write(true)
            .open(&common::TEST_LOCK_FILE)
            .unwrap();
        let _guard = fmutex::lock_exclusive(&lock_fd).unwrap();
    };
}

/// Keep the records in memory, shared by its clones.
#[derive(Clone, Default)]
pub struct Capture {
    records: Arc<Mutex<Vec<u8>>>,
}

impl Capture {
    pub fn json_lines(&self) -> Vec<serde_json::Value> {
        let data = self.records.lock().clone();
        String::from_utf8(data)
            .unwrap()
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect()
    }
}

impl LevelWriter for Capture {
    fn write_level(&mut self, _level: Level, data: &[u8]) -> io::Result<usize> {
        self.records.lock().extend_from_slice(data);
        Ok(data.len())
    }
}

pub fn clear_test_files(builder: &Builder) {
    for file_path in builder.file_paths() {
        let _ = remove_file(file_path);
    }
}
