//! Fluent checks that fail with an [`ApiTestError::AssertionError`] instead of
//! panicking, so a case can bail out with `?` and the runner records why.
//!
//! ```
//! use reqres_autotests::core::assertions::assert_that;
//!
//! # fn main() -> reqres_autotests::Result<()> {
//! assert_that(200u16).described_as("HTTP status").is_equal_to(200)?;
//! assert_that("George").described_as("first name").contains("Geo")?;
//! # Ok(())
//! # }
//! ```

use crate::utils::error::{ApiTestError, Result};
use std::fmt::Debug;

pub struct Expectation<T> {
    actual: T,
    description: Option<String>,
}

pub fn assert_that<T>(actual: T) -> Expectation<T> {
    Expectation {
        actual,
        description: None,
    }
}

impl<T: Debug> Expectation<T> {
    pub fn described_as(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    fn fail(&self, expected: String) -> ApiTestError {
        ApiTestError::AssertionError {
            description: self
                .description
                .clone()
                .unwrap_or_else(|| "value".to_string()),
            expected,
            actual: format!("{:?}", self.actual),
        }
    }

    fn check(&self, passed: bool, expected: impl FnOnce() -> String) -> Result<()> {
        if passed {
            Ok(())
        } else {
            Err(self.fail(expected()))
        }
    }
}

impl<T: Debug + PartialEq> Expectation<T> {
    pub fn is_equal_to(&self, expected: T) -> Result<()> {
        self.check(self.actual == expected, || format!("{:?}", expected))
    }

    pub fn is_not_equal_to(&self, unexpected: T) -> Result<()> {
        self.check(self.actual != unexpected, || format!("anything but {:?}", unexpected))
    }
}

impl<T: Debug + PartialOrd> Expectation<T> {
    pub fn is_greater_than(&self, bound: T) -> Result<()> {
        self.check(self.actual > bound, || format!("> {:?}", bound))
    }

    pub fn is_less_than_or_equal_to(&self, bound: T) -> Result<()> {
        self.check(self.actual <= bound, || format!("<= {:?}", bound))
    }
}

impl Expectation<bool> {
    pub fn is_true(&self) -> Result<()> {
        self.check(self.actual, || "true".to_string())
    }

    pub fn is_false(&self) -> Result<()> {
        self.check(!self.actual, || "false".to_string())
    }
}

impl<S: AsRef<str> + Debug> Expectation<S> {
    pub fn contains(&self, needle: &str) -> Result<()> {
        self.check(self.actual.as_ref().contains(needle), || {
            format!("a string containing {:?}", needle)
        })
    }

    pub fn is_not_blank(&self) -> Result<()> {
        self.check(!self.actual.as_ref().trim().is_empty(), || {
            "a non-empty string".to_string()
        })
    }
}

impl<E: Debug> Expectation<&[E]> {
    pub fn has_length(&self, len: usize) -> Result<()> {
        self.check(self.actual.len() == len, || format!("{} items", len))
    }

    pub fn is_not_empty(&self) -> Result<()> {
        self.check(!self.actual.is_empty(), || "at least one item".to_string())
    }
}

impl<E: Debug> Expectation<Vec<E>> {
    pub fn has_length(&self, len: usize) -> Result<()> {
        self.check(self.actual.len() == len, || format!("{} items", len))
    }

    pub fn is_not_empty(&self) -> Result<()> {
        self.check(!self.actual.is_empty(), || "at least one item".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_equality_passes_and_fails() {
        assert!(assert_that(2).described_as("page").is_equal_to(2).is_ok());

        let err = assert_that(1).described_as("page").is_equal_to(2).unwrap_err();
        assert_eq!(err.to_string(), "page: expected 2, got 1");
    }

    #[test]
    fn test_not_equal() {
        assert!(assert_that(201).described_as("status").is_not_equal_to(500).is_ok());

        let err = assert_that("")
            .described_as("token")
            .is_not_equal_to("")
            .unwrap_err();
        assert_eq!(err.to_string(), "token: expected anything but \"\", got \"\"");
    }

    #[test]
    fn test_default_description() {
        let err = assert_that("a").is_equal_to("b").unwrap_err();
        assert_eq!(err.to_string(), "value: expected \"b\", got \"a\"");
    }

    #[test]
    fn test_ordering() {
        assert!(assert_that(5).is_greater_than(1).is_ok());
        assert!(assert_that(1).is_greater_than(1).is_err());
        assert!(assert_that(2).is_less_than_or_equal_to(2).is_ok());
        assert!(assert_that(3).is_less_than_or_equal_to(2).is_err());
    }

    #[test]
    fn test_strings() {
        let text = String::from("Tired of writing endless social media content?");
        assert!(assert_that(&text).contains("social media").is_ok());
        assert!(assert_that(&text).contains("newsletter").is_err());
        assert!(assert_that("  ").is_not_blank().is_err());
    }

    #[test]
    fn test_slices() {
        let ids = vec![7, 8];
        assert!(assert_that(ids.as_slice()).has_length(2).is_ok());
        assert!(assert_that(ids.as_slice()).is_not_empty().is_ok());

        let none: Vec<i32> = Vec::new();
        let err = assert_that(none.as_slice())
            .described_as("users on page")
            .is_not_empty()
            .unwrap_err();
        assert!(err.to_string().starts_with("users on page"));
    }

    #[test]
    fn test_vectors() {
        let names = vec!["George".to_string(), "Janet".to_string()];
        assert!(assert_that(names.clone()).has_length(2).is_ok());
        assert!(assert_that(names).is_not_empty().is_ok());

        let err = assert_that(Vec::<i64>::new())
            .described_as("user ids")
            .has_length(1)
            .unwrap_err();
        assert_eq!(err.to_string(), "user ids: expected 1 items, got []");
    }

    #[test]
    fn test_booleans() {
        assert!(assert_that(true).is_true().is_ok());
        assert!(assert_that(true).is_false().is_err());
    }
}
