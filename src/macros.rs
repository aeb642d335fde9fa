//! Logging macros.
//!
//! Each level has a macro taking an optional logger, an optional block of inline fields, and
//! the message in the `format!` syntax. Without a logger, the [default
//! logger](crate::default_logger) is used. The fields and the message are only evaluated when
//! the record passes the gate.
//!
//! ``` rust
//! use levelog::*;
//! let logger = Logger::new("app").with_writer(DiscardWriter);
//! let peer = "10.0.0.1";
//! log_info!(logger, "listening on {}", 8080);
//! log_warn!(logger, { "peer" => peer, "retry" => 3 }, "connection reset");
//! log_debug!("no logger given, to the default one");
//! ```

#[doc(hidden)]
#[macro_export]
macro_rules! do_emit {
    ($logger:expr, $lvl:expr, { $($k:literal => $v:expr),* $(,)? }, $($arg:tt)+) => {
        match &$logger {
            logger => {
                let e = logger.emitter($lvl);
                if e.enabled() {
                    let _ = e
                        .module(std::module_path!())
                        $(.kv($k, $v))*
                        .printf(std::format_args!($($arg)+));
                }
            }
        }
    };
}
#[allow(unused_imports)]
pub(super) use do_emit;

/// Emit a record at [Level::TRACE](crate::Level::TRACE).
#[macro_export]
macro_rules! log_trace {
    ({ $($fields:tt)* }, $($arg:tt)+) => (
        $crate::do_emit!($crate::default_logger(), $crate::Level::TRACE, { $($fields)* }, $($arg)+)
    );
    ($fmt:literal $($arg:tt)*) => (
        $crate::do_emit!($crate::default_logger(), $crate::Level::TRACE, {}, $fmt $($arg)*)
    );
    ($logger:expr, { $($fields:tt)* }, $($arg:tt)+) => (
        $crate::do_emit!($logger, $crate::Level::TRACE, { $($fields)* }, $($arg)+)
    );
    ($logger:expr, $($arg:tt)+) => (
        $crate::do_emit!($logger, $crate::Level::TRACE, {}, $($arg)+)
    );
}
#[allow(unused_imports)]
pub(super) use log_trace;

/// Emit a record at [Level::DEBUG](crate::Level::DEBUG).
#[macro_export]
macro_rules! log_debug {
    ({ $($fields:tt)* }, $($arg:tt)+) => (
        $crate::do_emit!($crate::default_logger(), $crate::Level::DEBUG, { $($fields)* }, $($arg)+)
    );
    ($fmt:literal $($arg:tt)*) => (
        $crate::do_emit!($crate::default_logger(), $crate::Level::DEBUG, {}, $fmt $($arg)*)
    );
    ($logger:expr, { $($fields:tt)* }, $($arg:tt)+) => (
        $crate::do_emit!($logger, $crate::Level::DEBUG, { $($fields)* }, $($arg)+)
    );
    ($logger:expr, $($arg:tt)+) => (
        $crate::do_emit!($logger, $crate::Level::DEBUG, {}, $($arg)+)
    );
}
#[allow(unused_imports)]
pub(super) use log_debug;

/// Emit a record at [Level::INFO](crate::Level::INFO).
#[macro_export]
macro_rules! log_info {
    ({ $($fields:tt)* }, $($arg:tt)+) => (
        $crate::do_emit!($crate::default_logger(), $crate::Level::INFO, { $($fields)* }, $($arg)+)
    );
    ($fmt:literal $($arg:tt)*) => (
        $crate::do_emit!($crate::default_logger(), $crate::Level::INFO, {}, $fmt $($arg)*)
    );
    ($logger:expr, { $($fields:tt)* }, $($arg:tt)+) => (
        $crate::do_emit!($logger, $crate::Level::INFO, { $($fields)* }, $($arg)+)
    );
    ($logger:expr, $($arg:tt)+) => (
        $crate::do_emit!($logger, $crate::Level::INFO, {}, $($arg)+)
    );
}
#[allow(unused_imports)]
pub(super) use log_info;

/// Emit a record at [Level::WARN](crate::Level::WARN).
#[macro_export]
macro_rules! log_warn {
    ({ $($fields:tt)* }, $($arg:tt)+) => (
        $crate::do_emit!($crate::default_logger(), $crate::Level::WARN, { $($fields)* }, $($arg)+)
    );
    ($fmt:literal $($arg:tt)*) => (
        $crate::do_emit!($crate::default_logger(), $crate::Level::WARN, {}, $fmt $($arg)*)
    );
    ($logger:expr, { $($fields:tt)* }, $($arg:tt)+) => (
        $crate::do_emit!($logger, $crate::Level::WARN, { $($fields)* }, $($arg)+)
    );
    ($logger:expr, $($arg:tt)+) => (
        $crate::do_emit!($logger, $crate::Level::WARN, {}, $($arg)+)
    );
}
#[allow(unused_imports)]
pub(super) use log_warn;

/// Emit a record at [Level::ERROR](crate::Level::ERROR).
#[macro_export]
macro_rules! log_error {
    ({ $($fields:tt)* }, $($arg:tt)+) => (
        $crate::do_emit!($crate::default_logger(), $crate::Level::ERROR, { $($fields)* }, $($arg)+)
    );
    ($fmt:literal $($arg:tt)*) => (
        $crate::do_emit!($crate::default_logger(), $crate::Level::ERROR, {}, $fmt $($arg)*)
    );
    ($logger:expr, { $($fields:tt)* }, $($arg:tt)+) => (
        $crate::do_emit!($logger, $crate::Level::ERROR, { $($fields)* }, $($arg)+)
    );
    ($logger:expr, $($arg:tt)+) => (
        $crate::do_emit!($logger, $crate::Level::ERROR, {}, $($arg)+)
    );
}
#[allow(unused_imports)]
pub(super) use log_error;

/// Emit a record at [Level::ALERT](crate::Level::ALERT).
#[macro_export]
macro_rules! log_alert {
    ({ $($fields:tt)* }, $($arg:tt)+) => (
        $crate::do_emit!($crate::default_logger(), $crate::Level::ALERT, { $($fields)* }, $($arg)+)
    );
    ($fmt:literal $($arg:tt)*) => (
        $crate::do_emit!($crate::default_logger(), $crate::Level::ALERT, {}, $fmt $($arg)*)
    );
    ($logger:expr, { $($fields:tt)* }, $($arg:tt)+) => (
        $crate::do_emit!($logger, $crate::Level::ALERT, { $($fields)* }, $($arg)+)
    );
    ($logger:expr, $($arg:tt)+) => (
        $crate::do_emit!($logger, $crate::Level::ALERT, {}, $($arg)+)
    );
}
#[allow(unused_imports)]
pub(super) use log_alert;

/// Emit a record at [Level::PANIC](crate::Level::PANIC), then panic with the message.
#[macro_export]
macro_rules! log_panic {
    ({ $($fields:tt)* }, $($arg:tt)+) => (
        $crate::do_emit!($crate::default_logger(), $crate::Level::PANIC, { $($fields)* }, $($arg)+)
    );
    ($fmt:literal $($arg:tt)*) => (
        $crate::do_emit!($crate::default_logger(), $crate::Level::PANIC, {}, $fmt $($arg)*)
    );
    ($logger:expr, { $($fields:tt)* }, $($arg:tt)+) => (
        $crate::do_emit!($logger, $crate::Level::PANIC, { $($fields)* }, $($arg)+)
    );
    ($logger:expr, $($arg:tt)+) => (
        $crate::do_emit!($logger, $crate::Level::PANIC, {}, $($arg)+)
    );
}
#[allow(unused_imports)]
pub(super) use log_panic;

/// Emit a record at [Level::FATAL](crate::Level::FATAL), then exit the process.
#[macro_export]
macro_rules! log_fatal {
    ({ $($fields:tt)* }, $($arg:tt)+) => (
        $crate::do_emit!($crate::default_logger(), $crate::Level::FATAL, { $($fields)* }, $($arg)+)
    );
    ($fmt:literal $($arg:tt)*) => (
        $crate::do_emit!($crate::default_logger(), $crate::Level::FATAL, {}, $fmt $($arg)*)
    );
    ($logger:expr, { $($fields:tt)* }, $($arg:tt)+) => (
        $crate::do_emit!($logger, $crate::Level::FATAL, { $($fields)* }, $($arg)+)
    );
    ($logger:expr, $($arg:tt)+) => (
        $crate::do_emit!($logger, $crate::Level::FATAL, {}, $($arg)+)
    );
}
#[allow(unused_imports)]
pub(super) use log_fatal;

/// Will log an error record with the logger and panic when condition not met.
///
/// The first argument is a [Logger](crate::Logger), the rest arguments are like
/// [core::assert!()].
///
/// ``` rust
/// use levelog::*;
/// let logger = Logger::new("job").with_writer(DiscardWriter);
/// let user_id = Some(111);
/// log_assert!(logger, user_id.is_some());
/// log_assert!(logger, user_id.is_some(), "user must login");
/// ```
#[macro_export]
macro_rules! log_assert {
    ($logger:expr, $cond:expr $(,)?) => ({
        if !$cond {
            $crate::do_emit!($logger, $crate::Level::ERROR, {}, "assertion failed: {}", std::stringify!($cond));
            std::panic!("assertion failed: {}", std::stringify!($cond));
        }
    });
    ($logger:expr, $cond:expr, $($arg:tt)+) => ({
        if !$cond {
            $crate::do_emit!($logger, $crate::Level::ERROR, {}, "assertion failed: {}", std::format_args!($($arg)+));
            std::panic!("{}", std::format_args!($($arg)+));
        }
    });
}
#[allow(unused_imports)]
pub(super) use log_assert;

/// Will log an error record with the logger and panic when the two values differ.
///
/// ``` rust
/// use levelog::*;
/// let logger = Logger::new("job").with_writer(DiscardWriter);
/// log_assert_eq!(logger, 1, 1);
/// log_assert_eq!(logger, 1, 1, "impossible things happended");
/// ```
#[macro_export]
macro_rules! log_assert_eq {
    ($logger:expr, $left:expr, $right:expr $(,)?) => ({
        match (&$left, &$right) {
            (left_val, right_val) => {
                if !(*left_val == *right_val) {
                    $crate::do_emit!($logger, $crate::Level::ERROR, {}, "assertion failed! \
                    expected: (`left == right`) actual: (`{:?}` != `{:?}`)", &*left_val, &*right_val);
                    std::panic!(r#"assertion failed: `(left == right)`
  left: `{:?}`,
 right: `{:?}`"#, &*left_val, &*right_val);
                }
            }
        }
    });
    ($logger:expr, $left:expr, $right:expr, $($arg:tt)+) => ({
        match (&($left), &($right)) {
            (left_val, right_val) => {
                if !(*left_val == *right_val) {
                    $crate::do_emit!($logger, $crate::Level::ERROR, {}, "assertion failed! \
                    expected: `(left == right)` actual: (`{:?}` != `{:?}`)", &*left_val, &*right_val);
                    std::panic!(r#"assertion failed: `(left == right)`
  left: `{:?}`,
 right: `{:?}`: {}"#, &*left_val, &*right_val,
                           std::format_args!($($arg)+));
                }
            }
        }
    });
}
#[allow(unused_imports)]
pub(super) use log_assert_eq;

/// On debug build, same as [log_assert!]. Skip the check on release build.
#[macro_export]
macro_rules! log_debug_assert {
    ($($arg:tt)*) => (if std::cfg!(debug_assertions) { $crate::log_assert!($($arg)*); });
}
#[allow(unused_imports)]
pub(super) use log_debug_assert;
