use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("`{variable}` is not set; this must be run as an Xcode Run Script build phase")]
    MissingConfiguration { variable: &'static str },
    #[error("File does not exist: {}", path.display())]
    MissingBinary { path: PathBuf },
    #[error("Failed to parse dependency of {}: `{line}`", binary.display())]
    Parse { binary: PathBuf, line: String },
    #[error("`{tool}` command not found - install the Xcode command line tools")]
    ToolNotFound {
        tool: &'static str,
        #[source]
        err: std::io::Error,
    },
    #[error("`{tool}` failed on {} with {status}:\n{output}", path.display())]
    ToolFailed {
        tool: &'static str,
        path: PathBuf,
        status: String,
        output: String,
    },
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
