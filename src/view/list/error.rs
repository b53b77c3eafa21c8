use thiserror::Error;

#[derive(Error, Clone, Debug, PartialEq, Eq)]
pub enum ListError {
    #[error("index {index} out of range for list of length {len}")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("range {start}..{end} out of range for list of length {len}")]
    InvalidRange { start: usize, end: usize, len: usize },

    #[error("not a permutation of {from}..{to}")]
    InvalidPermutation { from: usize, to: usize },
}

impl ListError {
    pub(crate) fn check_index(index: usize, len: usize) -> Result<(), ListError> {
        if index < len {
            Ok(())
        } else {
            Err(ListError::IndexOutOfRange { index, len })
        }
    }

    pub(crate) fn check_range(start: usize, end: usize, len: usize) -> Result<(), ListError> {
        if start <= end && end <= len {
            Ok(())
        } else {
            Err(ListError::InvalidRange { start, end, len })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::ListError;

    #[test]
    fn messages() {
        assert_eq!(
            ListError::IndexOutOfRange { index: 3, len: 2 }.to_string(),
            "index 3 out of range for list of length 2"
        );
        assert_eq!(
            ListError::InvalidPermutation { from: 0, to: 4 }.to_string(),
            "not a permutation of 0..4"
        );
    }

    #[test]
    fn range_checks() {
        assert!(ListError::check_range(0, 0, 0).is_ok());
        assert!(ListError::check_range(1, 3, 3).is_ok());
        assert_eq!(
            ListError::check_range(2, 1, 3),
            Err(ListError::InvalidRange { start: 2, end: 1, len: 3 })
        );
        assert!(ListError::check_index(2, 2).is_err());
    }
}
