use crate::level::Level;
use crate::writer::ConsoleTarget;
use std::path::{Path, PathBuf};
use std::str::FromStr;

#[doc(hidden)]
#[macro_export(local_inner_macros)]
macro_rules! impl_from_env {
    ($type: tt) => {
        impl<'a> From<EnvVarDefault<'a, $type>> for $type {
            #[inline]
            fn from(env: EnvVarDefault<'a, $type>) -> $type {
                if let Ok(v) = std::env::var(env.name) {
                    match $type::from_str(&v) {
                        Ok(r) => return r,
                        Err(_) => {
                            std::eprintln!(
                                "env {}={} is not valid, set to {:?}",
                                env.name,
                                v,
                                env.default
                            );
                        }
                    }
                }
                env.default
            }
        }
    };
}

pub struct EnvVarDefault<'a, T> {
    pub(crate) name: &'a str,
    pub(crate) default: T,
}

/// To config some logger setting with env.
///
/// Read value from environment, and set with default if not exists.
///
/// NOTE: the arguments to load from env_or() must support owned values.
///
/// Example:
///
/// ```rust
/// use levelog::*;
/// use std::path::PathBuf;
/// let _level: Level = env_or("LOG_LEVEL", Level::INFO).into();
/// let _file_path: PathBuf = env_or("LOG_FILE", "/tmp/test.log").into();
/// let _console: ConsoleTarget = env_or("LOG_CONSOLE", ConsoleTarget::Stdout).into();
/// let _backups: usize = env_or("LOG_BACKUPS", 10usize).into();
/// ```
pub fn env_or<T>(name: &str, default: T) -> EnvVarDefault<'_, T> {
    EnvVarDefault { name, default }
}

impl<'a> From<EnvVarDefault<'a, &'a str>> for String {
    fn from(env: EnvVarDefault<'a, &'a str>) -> String {
        if let Ok(v) = std::env::var(env.name) {
            return v;
        }
        env.default.to_string()
    }
}

impl<'a, P: AsRef<Path>> From<EnvVarDefault<'a, P>> for PathBuf {
    fn from(env: EnvVarDefault<'a, P>) -> PathBuf {
        if let Some(v) = std::env::var_os(env.name) {
            if !v.is_empty() {
                return PathBuf::from(v);
            }
        }
        env.default.as_ref().to_path_buf()
    }
}

crate::impl_from_env!(Level);
crate::impl_from_env!(ConsoleTarget);
crate::impl_from_env!(usize);
