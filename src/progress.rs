// src/progress.rs
use std::path::Path;

/// Optional progress sink for the CLI (or any other frontend).
pub trait Progress {
    fn begin(&mut self, _total: usize) {}
    fn log(&mut self, _msg: &str) {}
    fn item_done(&mut self, _label: &str, _path: &Path) {}
    fn item_failed(&mut self, _label: &str, _msg: &str) {}
    fn finish(&mut self) {}
}

/// A no-op progress sink you can pass when you don't care.
pub struct NullProgress;
impl Progress for NullProgress {}

/// Line-per-item console reporting, "3/120: saved ..." style.
pub struct ConsoleProgress {
    total: usize,
    current: usize,
}

impl ConsoleProgress {
    pub fn new() -> Self {
        Self { total: 0, current: 0 }
    }
}

impl Default for ConsoleProgress {
    fn default() -> Self {
        Self::new()
    }
}

impl Progress for ConsoleProgress {
    fn begin(&mut self, total: usize) {
        self.total = total;
        self.current = 0;
    }

    fn log(&mut self, msg: &str) {
        println!("{msg}");
    }

    fn item_done(&mut self, label: &str, path: &Path) {
        self.current += 1;
        println!("{}/{}: {} -> {}", self.current, self.total, label, path.display());
    }

    fn item_failed(&mut self, label: &str, msg: &str) {
        self.current += 1;
        eprintln!("{}/{}: {} FAILED: {}", self.current, self.total, label, msg);
    }

    fn finish(&mut self) {}
}
