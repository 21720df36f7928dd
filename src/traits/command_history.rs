use std::num::NonZeroUsize;

use super::command::Command;
use crate::error::HistoryError;

/// Result of a call to [`CommandHistory::undo`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UndoOutcome {
    Applied,
    NothingToUndo,
}

/// Result of a call to [`CommandHistory::redo`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RedoOutcome {
    Applied,
    NothingToRedo,
}

pub trait CommandHistory<C: Command> {
    /// Runs `command` against `ctx` and records it as the new tip of history, dropping every
    /// entry that was only reachable by redo.
    ///
    /// # Errors
    ///
    /// Returns [`HistoryError::Execute`] if the forward effect fails. Nothing is recorded.
    fn execute_command(
        &mut self,
        command: C,
        ctx: &mut C::Context,
    ) -> Result<(), HistoryError<C::Error>>;

    /// Reverts the command at the cursor and steps the cursor back.
    ///
    /// # Errors
    ///
    /// Returns [`HistoryError::Undo`] if the inverse effect fails. The cursor does not move.
    fn undo(&mut self, ctx: &mut C::Context) -> Result<UndoOutcome, HistoryError<C::Error>>;

    /// Steps the cursor forward and re-applies the command it lands on.
    ///
    /// # Errors
    ///
    /// Returns [`HistoryError::Redo`] if the forward effect fails. The cursor does not move.
    fn redo(&mut self, ctx: &mut C::Context) -> Result<RedoOutcome, HistoryError<C::Error>>;

    fn set_history_limit(&mut self, limit: NonZeroUsize);

    /// Labels of every recorded command in execution order, including the ones only reachable
    /// by redo.
    fn labels(&self) -> Vec<String>;

    /// Index of the most recently applied, not-yet-undone command.
    fn cursor(&self) -> Option<usize>;

    /// Executes `commands` in order, stopping at the first failure. Commands executed before
    /// the failure stay applied and recorded.
    ///
    /// # Errors
    ///
    /// The first [`HistoryError::Execute`] encountered.
    fn batch_execute(
        &mut self,
        commands: Vec<C>,
        ctx: &mut C::Context,
    ) -> Result<(), HistoryError<C::Error>> {
        for command in commands {
            self.execute_command(command, ctx)?;
        }
        Ok(())
    }
}
