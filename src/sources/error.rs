use std::fmt;

/// A source failed to produce a page or its total count.
///
/// Raised by [`PagedSource`](super::PagedSource) implementations and passed
/// through the provider to the caller unchanged.
#[derive(Debug)]
pub struct RetrievalError {
    message: String,
    source: Option<anyhow::Error>,
}

impl RetrievalError {
    pub fn new(message: impl Into<String>) -> Self {
        Self { message: message.into(), source: None }
    }

    pub fn with_source(message: impl Into<String>, source: impl Into<anyhow::Error>) -> Self {
        Self { message: message.into(), source: Some(source.into()) }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for RetrievalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for RetrievalError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source.as_ref().map(|err| &**err as &(dyn std::error::Error + 'static))
    }
}

#[cfg(test)]
mod tests {
    use std::error::Error;

    use super::*;

    #[test]
    fn test_display_is_message() {
        let err = RetrievalError::new("page 3 unavailable");
        assert_eq!(err.to_string(), "page 3 unavailable");
        assert!(err.source().is_none());
    }

    #[test]
    fn test_source_is_exposed() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err = RetrievalError::with_source("failed to read export", io);
        assert_eq!(err.message(), "failed to read export");
        assert_eq!(err.source().map(|s| s.to_string()), Some("gone".to_string()));
    }

    #[test]
    fn test_converts_into_anyhow() {
        let err: anyhow::Error = RetrievalError::new("boom").into();
        assert_eq!(err.to_string(), "boom");
    }
}
