use thiserror::Error;

#[derive(Error, Debug)]
pub enum PrefsError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("ron serialize error: {0}")]
    Ron(#[from] ron::Error),

    #[error("ron parse error: {0}")]
    Parse(#[from] ron::error::SpannedError),

    #[error("lock poisoned: {0}")]
    Poisoned(&'static str),
}
