use alloc::string::String;
use core::fmt;

/// A failed page fetch, as reported by the content source.
///
/// The engine stores the most recent failure (see `Paginator::last_error`) so a UI can show a
/// retry affordance; it never retries on its own. Drivers construct this from whatever error
/// their transport produced.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FetchError {
    message: String,
}

impl FetchError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "page fetch failed: {}", self.message)
    }
}

impl core::error::Error for FetchError {}

impl From<&str> for FetchError {
    fn from(message: &str) -> Self {
        Self::new(message)
    }
}

impl From<String> for FetchError {
    fn from(message: String) -> Self {
        Self::new(message)
    }
}
