use std::borrow::Cow;

/// A reversible action applied to a receiver.
///
/// A command carries a forward effect (`execute`) and the inverse of that effect (`undo`).
/// Both receive the receiver as `ctx`; neither is allowed to leave the receiver partially
/// modified when it returns an error.
///
/// `execute` takes `&mut self` so that a command can capture whatever it needs to undo itself
/// at the moment it runs (a delete records the deleted text, a brightness change records the
/// previous brightness).
///
/// # Associated Types
///
/// * `Context`: The receiver the command operates on.
/// * `Error`: The failure signal of the forward and inverse effects.
///
/// # Required Methods
///
/// * `execute(&mut self, ctx: &mut Self::Context)`: Applies the forward effect.
/// * `undo(&mut self, ctx: &mut Self::Context)`: Reverts the last application of the forward effect.
///
/// # Provided Methods
///
/// * `redo(&mut self, ctx: &mut Self::Context)`: Applies the forward effect again by calling `execute`.
/// * `description(&self) -> Cow<str>`: A human-readable label. Defaults to "Unknown command".
///
/// # Example
///
/// ```
/// use command_timeline::prelude::Command;
/// use std::borrow::Cow;
/// use std::convert::Infallible;
///
/// struct Push(char);
///
/// impl Command for Push {
///     type Context = String;
///     type Error = Infallible;
///
///     fn execute(&mut self, ctx: &mut String) -> Result<(), Infallible> {
///         ctx.push(self.0);
///         Ok(())
///     }
///
///     fn undo(&mut self, ctx: &mut String) -> Result<(), Infallible> {
///         ctx.pop();
///         Ok(())
///     }
///
///     fn description(&self) -> Cow<'_, str> {
///         Cow::Owned(format!("Push({})", self.0))
///     }
/// }
///
/// let mut text = String::new();
/// let mut cmd = Push('a');
/// cmd.execute(&mut text).unwrap();
/// assert_eq!(text, "a");
/// cmd.undo(&mut text).unwrap();
/// assert!(text.is_empty());
/// ```
pub trait Command {
    type Context;
    type Error;

    /// Applies the forward effect to the receiver.
    ///
    /// # Errors
    ///
    /// Returns the command's own error when the receiver rejects the operation. The receiver
    /// must be left as it was before the call.
    fn execute(&mut self, ctx: &mut Self::Context) -> Result<(), Self::Error>;

    /// Reverts exactly the last successful application of the forward effect.
    ///
    /// # Errors
    ///
    /// Returns the command's own error when the receiver rejects the operation.
    fn undo(&mut self, ctx: &mut Self::Context) -> Result<(), Self::Error>;

    /// Applies the forward effect again after an undo. Calls `execute` unless overridden.
    ///
    /// # Errors
    ///
    /// Same as [`Command::execute`].
    fn redo(&mut self, ctx: &mut Self::Context) -> Result<(), Self::Error> {
        self.execute(ctx)
    }

    /// Returns a description of the command. The default implementation returns "Unknown command".
    fn description(&self) -> Cow<'_, str> {
        Cow::Borrowed("Unknown command")
    }
}

/// A type-erased command, for histories that mix several command types over one receiver.
pub type BoxedCommand<R, E> = Box<dyn Command<Context = R, Error = E> + Send>;

impl<C> Command for Box<C>
where
    C: Command + ?Sized,
{
    type Context = C::Context;
    type Error = C::Error;

    fn execute(&mut self, ctx: &mut Self::Context) -> Result<(), Self::Error> {
        (**self).execute(ctx)
    }

    fn undo(&mut self, ctx: &mut Self::Context) -> Result<(), Self::Error> {
        (**self).undo(ctx)
    }

    fn redo(&mut self, ctx: &mut Self::Context) -> Result<(), Self::Error> {
        (**self).redo(ctx)
    }

    fn description(&self) -> Cow<'_, str> {
        (**self).description()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::convert::Infallible;

    struct Double;

    impl Command for Double {
        type Context = i32;
        type Error = Infallible;

        fn execute(&mut self, ctx: &mut i32) -> Result<(), Infallible> {
            *ctx *= 2;
            Ok(())
        }

        fn undo(&mut self, ctx: &mut i32) -> Result<(), Infallible> {
            *ctx /= 2;
            Ok(())
        }
    }

    #[test]
    fn test_default_description() {
        assert_eq!(Double.description(), "Unknown command");
    }

    #[test]
    fn test_default_redo_calls_execute() {
        let mut value = 3;
        let mut cmd = Double;
        cmd.redo(&mut value).unwrap();
        assert_eq!(value, 6);
    }

    #[test]
    fn test_boxed_command_forwards() {
        let mut value = 5;
        let mut cmd: BoxedCommand<i32, Infallible> = Box::new(Double);

        cmd.execute(&mut value).unwrap();
        assert_eq!(value, 10);
        cmd.undo(&mut value).unwrap();
        assert_eq!(value, 5);
        assert_eq!(cmd.description(), "Unknown command");
    }
}
