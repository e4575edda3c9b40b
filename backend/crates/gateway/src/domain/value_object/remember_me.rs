//! "Remember me" opt-in flag
//!
//! Parsed once at the HTTP boundary. Only the exact form value `"1"` opts in:
//!
//! | form value                                   | result            |
//! |----------------------------------------------|-------------------|
//! | `"1"`                                        | [`RememberMe::Yes`] |
//! | field absent                                 | [`RememberMe::No`]  |
//! | `""`, `"0"`, `"true"`, `"on"`, `" 1"`, other | [`RememberMe::No`]  |

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RememberMe {
    Yes,
    #[default]
    No,
}

impl RememberMe {
    pub const OPT_IN_VALUE: &'static str = "1";

    pub fn from_form_value(value: Option<&str>) -> Self {
        match value {
            Some(Self::OPT_IN_VALUE) => RememberMe::Yes,
            _ => RememberMe::No,
        }
    }

    #[inline]
    pub fn is_requested(self) -> bool {
        matches!(self, RememberMe::Yes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_literal_one_opts_in() {
        assert_eq!(RememberMe::from_form_value(Some("1")), RememberMe::Yes);

        for value in ["", "0", "true", "on", "yes", " 1", "1 ", "01", "2"] {
            assert_eq!(
                RememberMe::from_form_value(Some(value)),
                RememberMe::No,
                "value {:?} must not opt in",
                value
            );
        }
        assert_eq!(RememberMe::from_form_value(None), RememberMe::No);
    }

    #[test]
    fn test_default_is_no() {
        assert!(!RememberMe::default().is_requested());
        assert!(RememberMe::Yes.is_requested());
    }
}
