use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to access {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid JSON in {path}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid discovery result: {0}")]
    InvalidDiscovery(String),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// The message followed by every underlying cause, joined with `: `.
    pub fn report(&self) -> String {
        let mut message = self.to_string();
        let mut source = std::error::Error::source(self);
        while let Some(cause) = source {
            message.push_str(": ");
            message.push_str(&cause.to_string());
            source = cause.source();
        }
        message
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_includes_the_io_cause() {
        let error = Error::Io {
            path: PathBuf::from("/tmp/missing/layout.json"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "no such directory"),
        };
        assert_eq!(
            error.report(),
            "failed to access /tmp/missing/layout.json: no such directory"
        );
    }

    #[test]
    fn report_without_cause_is_the_message() {
        let error = Error::InvalidDiscovery("duplicate id".to_owned());
        assert_eq!(error.report(), "invalid discovery result: duplicate id");
    }
}
