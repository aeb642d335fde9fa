use crate::emitter::Emitter;
use crate::level::Level;
use std::panic::Location;
use std::path::Path;

/// The source location of a log call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallSite {
    pub file: &'static str,
    pub line: u32,
    pub module: Option<&'static str>,
}

impl CallSite {
    /// The location of the caller, through `#[track_caller]`.
    #[track_caller]
    #[inline]
    pub fn caller() -> Self {
        let loc = Location::caller();
        Self { file: loc.file(), line: loc.line(), module: None }
    }

    #[inline]
    pub fn with_module(mut self, module: &'static str) -> Self {
        self.module = Some(module);
        self
    }

    /// The file name without its directory.
    pub fn file_name(&self) -> &'static str {
        Path::new(self.file).file_name().and_then(|s| s.to_str()).unwrap_or(self.file)
    }
}

/// Add dynamic fields to a record just before it is emitted.
///
/// Hooks only run for records passing the gate, after the per-call fields.
pub trait Hook: Send + Sync {
    fn run(&self, e: &mut Emitter<'_>, name: &str, level: Level, site: &CallSite);
}

impl<F> Hook for F
where
    F: Fn(&mut Emitter<'_>, &str, Level, &CallSite) + Send + Sync,
{
    #[inline]
    fn run(&self, e: &mut Emitter<'_>, name: &str, level: Level, site: &CallSite) {
        self(e, name, level, site)
    }
}

pub fn format_caller(site: &CallSite) -> String {
    format!("{}:{}", site.file_name(), site.line)
}

/// Add the location of the log call as `"file:line"`.
pub struct Caller {
    key: &'static str,
    format: fn(&CallSite) -> String,
}

impl Caller {
    pub fn new(key: &'static str) -> Self {
        Self { key, format: format_caller }
    }

    pub fn format(mut self, format: fn(&CallSite) -> String) -> Self {
        self.format = format;
        self
    }
}

impl Hook for Caller {
    fn run(&self, e: &mut Emitter<'_>, _name: &str, _level: Level, site: &CallSite) {
        e.add(self.key, (self.format)(site));
    }
}

const MAX_STACK: usize = 32;

/// Path fragments trimmed from the frames, keeping the crate-relative path.
const TRIM_MARKS: &[&str] = &["/src/", "/.cargo/registry/"];

/// Add the call stack as an array of `"file:function:line"`.
///
/// The backtrace is only captured for records which are really emitted. The frames inside
/// this crate are skipped, as well as the number of frames set with [Logger::with_depth].
///
/// [Logger::with_depth]: crate::Logger::with_depth
pub struct CallerStack {
    key: &'static str,
}

impl CallerStack {
    pub fn new(key: &'static str) -> Self {
        Self { key }
    }
}

impl Hook for CallerStack {
    fn run(&self, e: &mut Emitter<'_>, _name: &str, _level: Level, _site: &CallSite) {
        let stack = call_stack(e.depth());
        e.add(self.key, stack.as_slice());
    }
}

/// Collect the frames above the logger, skipping `depth` more of them.
pub fn call_stack(depth: usize) -> Vec<String> {
    let bt = backtrace::Backtrace::new();
    let mut in_logger = false;
    let mut skip = depth;
    let mut stack = Vec::new();
    for frame in bt.frames() {
        for sym in frame.symbols() {
            let name = match sym.name() {
                Some(name) => format!("{:#}", name),
                None => continue,
            };
            if name.starts_with("backtrace::") {
                continue;
            }
            if name.starts_with("levelog::") || name.starts_with("<levelog::") {
                in_logger = true;
                continue;
            }
            if !in_logger {
                continue;
            }
            if skip > 0 {
                skip -= 1;
                continue;
            }
            let file = sym.filename().and_then(|p| p.to_str()).unwrap_or("???");
            let file = TRIM_MARKS
                .iter()
                .find_map(|mark| file.find(mark).map(|i| &file[i + mark.len()..]))
                .unwrap_or(file);
            let func = name.rsplit("::").next().unwrap_or(&name);
            stack.push(format!("{}:{}:{}", file, func, sym.lineno().unwrap_or(0)));
            if stack.len() >= MAX_STACK {
                return stack;
            }
        }
    }
    stack
}
