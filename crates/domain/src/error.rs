#[derive(thiserror::Error, Debug)]
pub enum ReadError {
    #[error("not found")]
    NotFound,
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error(transparent)]
    Other(#[from] Box<dyn std::error::Error>),
}

#[derive(thiserror::Error, Debug)]
pub enum CreateError {
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error(transparent)]
    Other(#[from] Box<dyn std::error::Error>),
}

#[derive(thiserror::Error, Debug)]
pub enum UpdateError {
    #[error("not found")]
    NotFound,
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error(transparent)]
    Other(#[from] Box<dyn std::error::Error>),
}

#[derive(thiserror::Error, Debug)]
pub enum DeleteError {
    #[error("not found")]
    NotFound,
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error(transparent)]
    Other(#[from] Box<dyn std::error::Error>),
}

#[derive(thiserror::Error, Debug)]
pub enum StorageError {
    #[error("no connection")]
    NoConnection,
    #[error(transparent)]
    Other(#[from] Box<dyn std::error::Error>),
}

/// Reasons why no workout could be put together for the requested parameters.
///
/// All variants except `Read` describe constraints the caller can relax.
#[derive(thiserror::Error, Debug)]
pub enum GenerateError {
    #[error("no exercises found matching the criteria")]
    EmptyCatalog,
    #[error(
        "not enough warmup exercises available ({available} < 2), need at least 2 warmup exercises with no equipment or matching equipment"
    )]
    InsufficientWarmup { available: usize },
    #[error(
        "no core, strength or cardio exercises available with no equipment or matching the selected equipment"
    )]
    InsufficientCatalog,
    #[error("not enough time for warmup exercises, need at least {required} seconds")]
    InsufficientTime { required: u32 },
    #[error(transparent)]
    Read(#[from] ReadError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_error_from_read_error() {
        assert!(matches!(
            GenerateError::from(ReadError::Storage(StorageError::NoConnection)),
            GenerateError::Read(ReadError::Storage(StorageError::NoConnection))
        ));
    }

    #[test]
    fn test_generate_error_display() {
        assert_eq!(
            GenerateError::InsufficientTime { required: 130 }.to_string(),
            "not enough time for warmup exercises, need at least 130 seconds"
        );
        assert!(
            GenerateError::InsufficientWarmup { available: 1 }
                .to_string()
                .starts_with("not enough warmup exercises available (1 < 2)")
        );
    }
}
