use derive_more::{AsRef, Display};

const MAX_LENGTH: usize = 64;

#[derive(AsRef, Debug, Display, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Name(String);

impl Name {
    pub fn new(name: &str) -> Result<Self, NameError> {
        let trimmed_name = name.trim();

        if trimmed_name.is_empty() {
            return Err(NameError::Empty);
        }

        let len = trimmed_name.chars().count();

        if len > MAX_LENGTH {
            return Err(NameError::TooLong(len));
        }

        Ok(Name(trimmed_name.to_string()))
    }
}

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum NameError {
    #[error("Name is required")]
    Empty,
    #[error("Name must be 64 characters or fewer ({0} > 64)")]
    TooLong(usize),
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("Push-ups", Ok(Name("Push-ups".to_string())))]
    #[case("  Dead Bug \n", Ok(Name("Dead Bug".to_string())))]
    #[case("Child's Pose", Ok(Name("Child's Pose".to_string())))]
    #[case("", Err(NameError::Empty))]
    #[case("   ", Err(NameError::Empty))]
    #[case(&"x".repeat(65), Err(NameError::TooLong(65)))]
    #[case(&"ü".repeat(64), Ok(Name("ü".repeat(64))))]
    fn test_name_new(#[case] name: &str, #[case] expected: Result<Name, NameError>) {
        assert_eq!(Name::new(name), expected);
    }

    #[test]
    fn test_name_error_display() {
        assert_eq!(
            NameError::TooLong(70).to_string(),
            "Name must be 64 characters or fewer (70 > 64)"
        );
    }
}
