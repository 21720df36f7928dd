use std::borrow::Cow;

use thiserror::Error;

use crate::traits::command::Command;

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum CounterError {
    #[error("adding {delta} to {value} overflows")]
    Overflow { value: i64, delta: i64 },
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Counter {
    value: i64,
}

impl Counter {
    #[must_use]
    pub fn new(value: i64) -> Self {
        Self { value }
    }

    #[must_use]
    pub fn value(&self) -> i64 {
        self.value
    }

    /// # Errors
    ///
    /// [`CounterError::Overflow`] if the sum does not fit; the counter is left unchanged.
    pub fn add(&mut self, delta: i64) -> Result<(), CounterError> {
        self.value = self
            .value
            .checked_add(delta)
            .ok_or(CounterError::Overflow {
                value: self.value,
                delta,
            })?;
        Ok(())
    }
}

/// Adds a fixed amount to a [`Counter`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Add(pub i64);

impl Command for Add {
    type Context = Counter;
    type Error = CounterError;

    fn execute(&mut self, ctx: &mut Counter) -> Result<(), CounterError> {
        ctx.add(self.0)
    }

    fn undo(&mut self, ctx: &mut Counter) -> Result<(), CounterError> {
        let negated = self.0.checked_neg().ok_or(CounterError::Overflow {
            value: ctx.value,
            delta: self.0,
        })?;
        ctx.add(negated)
    }

    fn description(&self) -> Cow<'_, str> {
        Cow::Owned(format!("Add({})", self.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prelude::*;

    #[test]
    fn test_add_scenario() {
        let mut history = Timeline::new();
        let mut counter = Counter::default();

        history.execute_command(Add(5), &mut counter).unwrap();
        assert_eq!(counter.value(), 5);
        history.execute_command(Add(3), &mut counter).unwrap();
        assert_eq!(counter.value(), 8);

        history.undo(&mut counter).unwrap();
        assert_eq!(counter.value(), 5);
        history.undo(&mut counter).unwrap();
        assert_eq!(counter.value(), 0);
        history.redo(&mut counter).unwrap();
        assert_eq!(counter.value(), 5);

        history.execute_command(Add(10), &mut counter).unwrap();
        assert_eq!(counter.value(), 15);
        assert_eq!(history.labels(), vec!["Add(5)", "Add(10)"]);
        assert_eq!(history.cursor(), Some(1));
    }

    #[test]
    fn test_overflow_is_rejected() {
        let mut counter = Counter::new(i64::MAX - 1);

        assert_eq!(
            counter.add(2),
            Err(CounterError::Overflow {
                value: i64::MAX - 1,
                delta: 2
            })
        );
        assert_eq!(counter.value(), i64::MAX - 1);
    }

    #[test]
    fn test_undo_of_min_value_is_rejected() {
        let mut counter = Counter::new(0);
        let mut cmd = Add(i64::MIN);

        cmd.execute(&mut counter).unwrap();
        assert!(cmd.undo(&mut counter).is_err());
        assert_eq!(counter.value(), i64::MIN);
    }
}
