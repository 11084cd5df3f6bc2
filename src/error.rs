#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum Error {
    #[error("Invalid max level: {0}, must be at least 1")]
    InvalidMaxLevel(usize),

    #[error("Invalid skip factor: {0}, must be at least 2")]
    InvalidSkipFactor(u32),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
