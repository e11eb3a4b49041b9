//! Call-site capture
//!
//! Walks the stack with the `backtrace` crate and resolves exactly one frame
//! into a pooled [`Caller`] descriptor.

use super::error::{LoggerError, Result};
use super::pool::{Pool, Pooled};
use std::fmt;

/// Symbol of [`capture`] itself; frames are counted from just above it.
const ANCHOR: &str = concat!(module_path!(), "::capture");

/// A captured call-site location.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Caller {
    pub function: String,
    pub file: String,
    pub line: u32,
    /// Instruction pointer of the captured frame
    pub ip: usize,
}

impl Caller {
    pub(crate) fn clear(&mut self) {
        self.function.clear();
        self.file.clear();
        self.line = 0;
        self.ip = 0;
    }

    fn fill(&mut self, symbol: &backtrace::Symbol, ip: usize) {
        use std::fmt::Write as _;

        self.clear();
        if let Some(name) = symbol.name() {
            let _ = write!(self.function, "{:#}", name);
        }
        if let Some(path) = symbol.filename() {
            let _ = write!(self.file, "{}", path.display());
        }
        self.line = symbol.lineno().unwrap_or(0);
        self.ip = ip;
    }
}

/// Capture the call site `skip` frames above the caller of `capture`.
///
/// `skip == 0` describes the function that called `capture`. Inlined calls
/// count as frames of their own when debug information is available. The
/// descriptor goes back to `pool` when the returned guard is dropped or
/// disposed.
#[inline(never)]
pub fn capture(pool: &Pool<Caller>, skip: usize) -> Result<Pooled<'_, Caller>> {
    let mut caller = pool.acquire();
    let mut anchored = false;
    let mut remaining = skip;
    let mut found = false;

    backtrace::trace(|frame| {
        let ip = frame.ip() as usize;
        backtrace::resolve_frame(frame, |symbol| {
            if found {
                return;
            }
            if !anchored {
                anchored = symbol
                    .name()
                    .is_some_and(|name| format!("{:#}", name) == ANCHOR);
                return;
            }
            if remaining > 0 {
                remaining -= 1;
                return;
            }
            caller.fill(symbol, ip);
            found = true;
        });
        !found
    });

    if found {
        Ok(caller)
    } else {
        Err(LoggerError::NoFrames)
    }
}

/// Capture and format a call site as `<short-file>:<line> <function>`.
///
/// The file is shortened to its last two path segments. Frames without
/// debug information render as the function name alone.
#[inline(never)]
pub fn take(pool: &Pool<Caller>, skip: usize) -> Result<String> {
    let caller = capture(pool, skip.saturating_add(1))?;
    Ok(caller.to_string())
}

impl fmt::Display for Caller {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.file.is_empty(), self.function.is_empty()) {
            (false, _) => write!(f, "{}:{} {}", short_file(&self.file), self.line, self.function),
            (true, false) => f.write_str(&self.function),
            (true, true) => f.write_str("<unknown>"),
        }
    }
}

fn short_file(file: &str) -> &str {
    let mut separators = file.rmatch_indices(['/', '\\']);
    match (separators.next(), separators.next()) {
        (Some(_), Some((i, _))) => &file[i + 1..],
        _ => file,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pool() -> Pool<Caller> {
        Pool::new(Caller::default, Caller::clear)
    }

    #[inline(never)]
    fn inside(pool: &Pool<Caller>, skip: usize) -> Caller {
        let caller = capture(pool, skip).unwrap();
        (*caller).clone()
    }

    #[inline(never)]
    fn take_inside(pool: &Pool<Caller>) -> String {
        take(pool, 0).unwrap()
    }

    #[test]
    fn test_capture_reports_calling_function() {
        let pool = pool();
        let caller = inside(&pool, 0);

        assert!(caller.function.ends_with("tests::inside"), "{}", caller.function);
        assert!(caller.file.ends_with("caller.rs"), "{}", caller.file);
        assert!(caller.line > 0);
        assert_ne!(caller.ip, 0);
    }

    #[test]
    fn test_capture_skip_one() {
        let pool = pool();
        let caller = inside(&pool, 1);
        assert!(
            caller.function.ends_with("test_capture_skip_one"),
            "{}",
            caller.function
        );
    }

    #[test]
    fn test_descriptor_returns_to_pool() {
        let pool = pool();
        capture(&pool, 0).unwrap().dispose();
        assert_eq!(pool.idle(), 1);
        assert!(pool.get().function.is_empty());
    }

    #[test]
    fn test_no_frames() {
        let pool = pool();
        let err = capture(&pool, usize::MAX / 2).unwrap_err();
        assert!(matches!(err, LoggerError::NoFrames));
        assert_eq!(pool.idle(), 1);
    }

    #[test]
    fn test_take_format() {
        let pool = pool();
        let text = take_inside(&pool);

        assert!(text.starts_with("core/caller.rs:"), "{}", text);
        assert!(text.ends_with("tests::take_inside"), "{}", text);
    }

    #[test]
    fn test_display_without_debug_info() {
        let mut caller = Caller {
            function: "core::ops::function::FnOnce::call_once".to_string(),
            ..Caller::default()
        };
        assert_eq!(caller.to_string(), "core::ops::function::FnOnce::call_once");

        caller.function.clear();
        assert_eq!(caller.to_string(), "<unknown>");

        caller.file = "/srv/app/src/main.rs".to_string();
        caller.line = 7;
        caller.function = "app::main".to_string();
        assert_eq!(caller.to_string(), "src/main.rs:7 app::main");
    }

    #[test]
    fn test_short_file() {
        assert_eq!(short_file("/home/app/src/main.rs"), "src/main.rs");
        assert_eq!(short_file("src/main.rs"), "src/main.rs");
        assert_eq!(short_file("main.rs"), "main.rs");
        assert_eq!(short_file(r"C:\app\src\main.rs"), r"src\main.rs");
    }
}
