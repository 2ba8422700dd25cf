use std::fmt;
use std::fs::OpenOptions;
use std::str::FromStr;

use crate::error::StreamError;
use crate::ensure;

/// The base letter of an fopen style mode string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Base {
    Read,
    Write,
    Append,
    Exclusive,
    Create,
    /// the legacy `rw` mode, read and write without truncation
    ReadWrite,
}

/// A validated fopen style open mode, such as `r`, `w+`, `ab` or `c+t`.
///
/// ```
/// use micro_message::stream::OpenMode;
///
/// let mode: OpenMode = "w+b".parse().unwrap();
/// assert!(mode.is_readable());
/// assert!(mode.is_writable());
///
/// assert!(!"r".parse::<OpenMode>().unwrap().is_writable());
/// assert!("z".parse::<OpenMode>().is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenMode {
    raw: String,
    base: Base,
    plus: bool,
}

impl OpenMode {
    /// The mode used by in-memory streams.
    pub fn memory() -> Self {
        Self { raw: "w+b".into(), base: Base::Write, plus: true }
    }

    /// The mode used by write only sinks.
    pub fn write_only() -> Self {
        Self { raw: "wb".into(), base: Base::Write, plus: false }
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn is_readable(&self) -> bool {
        self.plus || matches!(self.base, Base::Read | Base::ReadWrite)
    }

    pub fn is_writable(&self) -> bool {
        self.plus || self.base != Base::Read
    }

    /// Returns the [`OpenOptions`] matching this mode.
    pub(crate) fn open_options(&self) -> OpenOptions {
        let mut options = OpenOptions::new();
        options.read(self.is_readable()).write(self.is_writable());
        match self.base {
            Base::Read | Base::ReadWrite => {}
            Base::Write => {
                options.create(true).truncate(true);
            }
            Base::Append => {
                options.append(true).create(true);
            }
            Base::Exclusive => {
                options.create_new(true);
            }
            Base::Create => {
                options.create(true).truncate(false);
            }
        }
        options
    }
}

impl FromStr for OpenMode {
    type Err = StreamError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (base, flags) = if let Some(flags) = s.strip_prefix("rw") {
            (Base::ReadWrite, flags)
        } else {
            let mut chars = s.chars();
            let base = match chars.next() {
                Some('r') => Base::Read,
                Some('w') => Base::Write,
                Some('a') => Base::Append,
                Some('x') => Base::Exclusive,
                Some('c') => Base::Create,
                _ => return Err(StreamError::invalid_mode(s)),
            };
            (base, chars.as_str())
        };

        let mut plus = false;
        let mut translation = false;
        for flag in flags.chars() {
            match flag {
                '+' => {
                    ensure!(!plus && base != Base::ReadWrite, StreamError::invalid_mode(s));
                    plus = true;
                }
                'b' | 't' => {
                    ensure!(!translation, StreamError::invalid_mode(s));
                    translation = true;
                }
                _ => return Err(StreamError::invalid_mode(s)),
            }
        }

        Ok(Self { raw: s.to_owned(), base, plus })
    }
}

impl fmt::Display for OpenMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mode(s: &str) -> OpenMode {
        s.parse().unwrap()
    }

    #[test]
    fn readable_modes() {
        for s in ["r", "rb", "rt", "r+", "r+b", "rb+", "w+", "a+", "x+", "c+", "rw", "w+b"] {
            assert!(mode(s).is_readable(), "{s} should be readable");
        }
        for s in ["w", "wb", "a", "ab", "x", "c", "ct"] {
            assert!(!mode(s).is_readable(), "{s} should not be readable");
        }
    }

    #[test]
    fn writable_modes() {
        for s in ["r+", "w", "w+", "a", "a+", "x", "x+", "c", "c+", "rw", "wb", "rb+"] {
            assert!(mode(s).is_writable(), "{s} should be writable");
        }
        for s in ["r", "rb", "rt"] {
            assert!(!mode(s).is_writable(), "{s} should not be writable");
        }
    }

    #[test]
    fn reject_invalid_modes() {
        for s in ["", "z", "r++", "rbt", "rq", "+r", "rw+", "R"] {
            let err = s.parse::<OpenMode>().unwrap_err();
            assert!(matches!(err, StreamError::InvalidMode { ref mode } if mode == s), "{s} should be rejected");
        }
    }

    #[test]
    fn keeps_raw_text() {
        assert_eq!(mode("rb+").as_str(), "rb+");
        assert_eq!(mode("a").to_string(), "a");
        assert_eq!(OpenMode::memory().as_str(), "w+b");
        assert!(OpenMode::memory().is_readable());
        assert!(!OpenMode::write_only().is_readable());
    }
}
