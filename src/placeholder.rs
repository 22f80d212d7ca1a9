//! Output placeholders.

use crate::config::Mode;
use crate::event::{display_actual, CallSite, ComparisonEvent};
use crate::session::FixtureState;
use crate::warning::{UsageWarning, WarningKind};
use crate::GoldenError;
use serde::Serialize;
use std::fmt;
use std::rc::Rc;

/// A deferred reference to one expected output of a fixture.
///
/// Obtained from [`Golden::out`](crate::Golden::out) or
/// [`Golden::out_opt`](crate::Golden::out_opt). The only supported operations
/// are `==` and `!=` against a serializable actual value:
///
/// - in compare mode the stored value is compared for real
/// - in update mode the comparison is recorded and `==` is always true, so
///   the assertion passes and reconciliation can decide what to write
///
/// The placeholder is always the left operand: `golden.out("k") == actual`.
#[derive(Clone)]
pub struct Expected {
    fixture: Rc<FixtureState>,
    key: String,
    optional: bool,
}

impl Expected {
    pub(crate) fn new(fixture: Rc<FixtureState>, key: &str, optional: bool) -> Self {
        Self {
            fixture,
            key: key.to_string(),
            optional,
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn is_optional(&self) -> bool {
        self.optional
    }

    /// Compare against an already converted actual value.
    ///
    /// Returns the truth value the comparison should evaluate to.
    pub(crate) fn compare_value(
        &self,
        actual: Option<toml::Value>,
        is_equality: bool,
        site: CallSite,
    ) -> bool {
        match self.fixture.config.mode {
            Mode::Compare => {
                let equal = match (self.fixture.stored(&self.key), actual.as_ref()) {
                    (Some(stored), Some(actual)) => stored == actual,
                    (None, None) => self.optional,
                    _ => false,
                };
                let result = equal == is_equality;
                if !result {
                    let op = if is_equality { "==" } else { "!=" };
                    self.fixture.recorder.borrow_mut().note_mismatch(format!(
                        "{:?} {} {}",
                        self,
                        op,
                        display_actual(actual.as_ref())
                    ));
                }
                result
            }
            Mode::Update => {
                if actual.is_none() && !self.optional {
                    panic!(
                        "{}",
                        GoldenError::Usage(format!(
                            "golden output '{}' compared against a missing value; use out_opt",
                            self.key
                        ))
                    );
                }
                let event = ComparisonEvent {
                    fixture: self.fixture.id,
                    key: self.key.clone(),
                    actual,
                    optional: self.optional,
                    is_equality,
                    approved: false,
                    call_site: site,
                    seq: 0,
                };
                self.fixture.recorder.borrow_mut().record_comparison(event);
                is_equality
            }
        }
    }

    #[track_caller]
    fn compare<T: Serialize + ?Sized>(&self, actual: &T, is_equality: bool) -> bool {
        let site = CallSite::caller();
        match to_actual(&self.key, actual) {
            Ok(actual) => self.compare_value(actual, is_equality, site),
            Err(err) => panic!("{}", err),
        }
    }
}

impl<T: Serialize + ?Sized> PartialEq<T> for Expected {
    #[track_caller]
    fn eq(&self, actual: &T) -> bool {
        self.compare(actual, true)
    }

    #[track_caller]
    fn ne(&self, actual: &T) -> bool {
        if self.fixture.config.mode == Mode::Update {
            self.fixture.recorder.borrow_mut().push_warning(UsageWarning::new(
                WarningKind::NotEqualOperator,
                "Only '==' comparison should be used on a golden output",
                CallSite::caller(),
            ));
        }
        self.compare(actual, false)
    }
}

impl PartialEq for Expected {
    #[track_caller]
    fn eq(&self, _other: &Expected) -> bool {
        panic!(
            "{}",
            GoldenError::Usage("Can't compare two golden output placeholders".into())
        )
    }
}

impl fmt::Display for Expected {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "golden.out['{}']", self.key)
    }
}

impl fmt::Debug for Expected {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.fixture.config.mode {
            Mode::Compare => write!(
                f,
                "{} = {}",
                self,
                display_actual(self.fixture.stored(&self.key))
            ),
            Mode::Update => write!(f, "{}", self),
        }
    }
}

#[derive(Serialize)]
struct Slot<'a, T: ?Sized> {
    value: &'a T,
}

/// Convert an actual value to its fixture representation.
///
/// `None` (at any `Option` nesting the serializer skips) means missing.
pub(crate) fn to_actual<T: Serialize + ?Sized>(
    key: &str,
    actual: &T,
) -> Result<Option<toml::Value>, GoldenError> {
    let slot = toml::Value::try_from(Slot { value: actual }).map_err(|e| {
        GoldenError::Serialize {
            key: key.to_string(),
            message: e.to_string(),
        }
    })?;
    match slot {
        toml::Value::Table(mut table) => Ok(table.remove("value")),
        other => Err(GoldenError::Serialize {
            key: key.to_string(),
            message: format!("unexpected {}", other.type_str()),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_actual_scalars() {
        assert_eq!(
            to_actual("k", &6).unwrap(),
            Some(toml::Value::Integer(6))
        );
        assert_eq!(
            to_actual("k", "text").unwrap(),
            Some(toml::Value::String("text".into()))
        );
        assert_eq!(
            to_actual("k", &vec![1, 2]).unwrap(),
            Some(toml::Value::Array(vec![
                toml::Value::Integer(1),
                toml::Value::Integer(2)
            ]))
        );
    }

    #[test]
    fn test_to_actual_none_is_missing() {
        assert_eq!(to_actual("k", &None::<i64>).unwrap(), None);
        assert_eq!(
            to_actual("k", &Some(3)).unwrap(),
            Some(toml::Value::Integer(3))
        );
    }

    #[test]
    fn test_to_actual_struct() {
        #[derive(Serialize)]
        struct Point {
            x: i64,
            label: Option<String>,
        }

        let value = to_actual("k", &Point { x: 1, label: None })
            .unwrap()
            .unwrap();
        let table = value.as_table().unwrap();
        assert_eq!(table.get("x"), Some(&toml::Value::Integer(1)));
        assert!(table.get("label").is_none());
    }

    #[test]
    fn test_to_actual_unit_is_an_error() {
        let err = to_actual("k", &()).unwrap_err();
        assert!(matches!(err, GoldenError::Serialize { .. }));
    }
}
