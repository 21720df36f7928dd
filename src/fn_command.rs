use std::{borrow::Cow, fmt};

use crate::traits::command::Command;

type Effect<R, E> = Box<dyn FnMut(&mut R) -> Result<(), E> + Send>;

/// A command assembled from a label and a pair of closures.
///
/// ```
/// use command_timeline::prelude::*;
/// use std::convert::Infallible;
///
/// let mut history = Timeline::new();
/// let mut volume = 3;
///
/// let louder = FnCommand::new(
///     "Volume +1",
///     |volume: &mut i32| -> Result<(), Infallible> {
///         *volume += 1;
///         Ok(())
///     },
///     |volume: &mut i32| {
///         *volume -= 1;
///         Ok(())
///     },
/// );
///
/// history.execute_command(louder, &mut volume).unwrap();
/// assert_eq!(volume, 4);
/// history.undo(&mut volume).unwrap();
/// assert_eq!(volume, 3);
/// ```
pub struct FnCommand<R, E> {
    label: String,
    forward: Effect<R, E>,
    inverse: Effect<R, E>,
}

impl<R, E> FnCommand<R, E> {
    pub fn new<F, U>(label: impl Into<String>, forward: F, inverse: U) -> Self
    where
        F: FnMut(&mut R) -> Result<(), E> + Send + 'static,
        U: FnMut(&mut R) -> Result<(), E> + Send + 'static,
    {
        Self {
            label: label.into(),
            forward: Box::new(forward),
            inverse: Box::new(inverse),
        }
    }
}

impl<R, E> Command for FnCommand<R, E> {
    type Context = R;
    type Error = E;

    fn execute(&mut self, ctx: &mut R) -> Result<(), E> {
        (self.forward)(ctx)
    }

    fn undo(&mut self, ctx: &mut R) -> Result<(), E> {
        (self.inverse)(ctx)
    }

    fn description(&self) -> Cow<'_, str> {
        Cow::Borrowed(&self.label)
    }
}

impl<R, E> fmt::Debug for FnCommand<R, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnCommand")
            .field("label", &self.label)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prelude::*;
    use parking_lot::Mutex;
    use std::sync::Arc;

    #[derive(Debug, PartialEq, Eq)]
    struct Empty;

    fn pop() -> FnCommand<Vec<i32>, Empty> {
        let popped = Arc::new(Mutex::new(None));
        let restore = Arc::clone(&popped);
        FnCommand::new(
            "Pop",
            move |stack: &mut Vec<i32>| {
                *popped.lock() = Some(stack.pop().ok_or(Empty)?);
                Ok(())
            },
            move |stack: &mut Vec<i32>| {
                stack.push(restore.lock().take().ok_or(Empty)?);
                Ok(())
            },
        )
    }

    #[test]
    fn test_label_is_the_description() {
        assert_eq!(pop().description(), "Pop");
        assert_eq!(format!("{:?}", pop()), "FnCommand { label: \"Pop\", .. }");
    }

    #[test]
    fn test_captured_state_round_trip() {
        let mut history = Timeline::new();
        let mut stack = vec![1, 2];

        history.execute_command(pop(), &mut stack).unwrap();
        assert_eq!(stack, vec![1]);

        history.undo(&mut stack).unwrap();
        assert_eq!(stack, vec![1, 2]);
    }

    #[test]
    fn test_failure_is_reported_by_history() {
        let mut history = Timeline::new();
        let mut stack = Vec::new();

        let err = history.execute_command(pop(), &mut stack).unwrap_err();

        assert_eq!(err.label(), "Pop");
        assert_eq!(err.into_command_error(), Empty);
        assert!(history.is_empty());
    }

    #[test]
    fn test_closures_share_state_through_the_receiver() {
        let mut history = Timeline::new();
        let mut text = String::from("ab");

        let push = |c: char| {
            FnCommand::new(
                format!("Push({c})"),
                move |text: &mut String| -> Result<(), Empty> {
                    text.push(c);
                    Ok(())
                },
                |text: &mut String| text.pop().map(drop).ok_or(Empty),
            )
        };

        history
            .batch_execute(vec![push('c'), push('d')], &mut text)
            .unwrap();
        assert_eq!(text, "abcd");

        history.undo(&mut text).unwrap();
        history.undo(&mut text).unwrap();
        assert_eq!(text, "ab");

        history.redo(&mut text).unwrap();
        assert_eq!(text, "abc");
        assert_eq!(history.labels(), vec!["Push(c)", "Push(d)"]);
    }
}
