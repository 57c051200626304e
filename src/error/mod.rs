use std::fmt;

pub type TiniResult<T> = Result<T, TiniError>;

/// An error carrying the process exit code that should accompany it.
///
/// Internal failures (mask setup, spawn failure, unrecognized kernel
/// wait/signal results) all exit 1; only the main child's own exit
/// status is ever allowed a different code.
#[derive(Debug)]
pub struct TiniError {
    pub msg: String,
    pub code: u8,
}

impl TiniError {
    pub fn new<M: Into<String>>(m: M, code: u8) -> Self {
        Self {
            msg: m.into(),
            code,
        }
    }

    pub fn fatal<M: Into<String>>(m: M) -> Self {
        Self::new(m, 1)
    }
}

impl fmt::Display for TiniError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.msg)
    }
}

impl std::error::Error for TiniError {}

impl From<nix::Error> for TiniError {
    fn from(e: nix::Error) -> Self {
        Self::fatal(e.to_string())
    }
}

impl From<clap::Error> for TiniError {
    fn from(e: clap::Error) -> Self {
        Self::new(e.to_string(), 1)
    }
}
