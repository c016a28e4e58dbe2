#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("process terminated with code {0}")]
    Terminated(i32),
    #[error("IO error")]
    IO(#[from] std::io::Error),
    #[error("non-Unicode path")]
    NonUnicodePath,
}

pub type Result<T> = std::result::Result<T, Error>;
