use std::{borrow::Cow, collections::VecDeque, fmt, num::NonZeroUsize};

use tracing::{debug, trace, warn};

use crate::error::HistoryError;
use crate::traits::{
    command::Command,
    command_history::{CommandHistory, RedoOutcome, UndoOutcome},
};

/// A linear undo/redo history.
///
/// Commands are kept in execution order together with the number of them that are currently
/// applied. Everything past that point is only reachable by redo and is dropped as soon as a new
/// command is executed.
///
/// The history grows without bound unless a limit is set, in which case the oldest applied
/// command is evicted whenever the limit is exceeded.
pub struct Timeline<C: Command> {
    commands: VecDeque<C>,
    applied: usize,
    history_limit: Option<NonZeroUsize>,
}

/// Position of a recorded command relative to the cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryState {
    Applied,
    /// The most recently applied command.
    Current,
    /// Undone, reachable by redo.
    Undone,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryEntry<'a> {
    pub index: usize,
    pub label: Cow<'a, str>,
    pub state: EntryState,
}

impl<C: Command> Timeline<C> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            commands: VecDeque::new(),
            applied: 0,
            history_limit: None,
        }
    }

    #[must_use]
    pub fn with_limit(history_limit: NonZeroUsize) -> Self {
        Self {
            commands: VecDeque::with_capacity(history_limit.get()),
            applied: 0,
            history_limit: Some(history_limit),
        }
    }

    #[must_use]
    pub fn history_limit(&self) -> Option<NonZeroUsize> {
        self.history_limit
    }

    /// Number of recorded commands, applied and undone.
    #[must_use]
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    #[must_use]
    pub fn can_undo(&self) -> bool {
        self.applied > 0
    }

    #[must_use]
    pub fn can_redo(&self) -> bool {
        self.applied < self.commands.len()
    }

    /// Description of the command the next `undo` would revert.
    #[must_use]
    pub fn undo_description(&self) -> Option<Cow<'_, str>> {
        self.applied
            .checked_sub(1)
            .and_then(|index| self.commands.get(index))
            .map(Command::description)
    }

    /// Description of the command the next `redo` would re-apply.
    #[must_use]
    pub fn redo_description(&self) -> Option<Cow<'_, str>> {
        self.commands.get(self.applied).map(Command::description)
    }

    /// Applied commands, most recent first.
    #[must_use]
    pub fn undo_history(&self) -> Option<Vec<&C>> {
        if self.applied == 0 {
            None
        } else {
            Some(self.commands.range(..self.applied).rev().collect())
        }
    }

    /// Undone commands, next to be redone first.
    #[must_use]
    pub fn redo_history(&self) -> Option<Vec<&C>> {
        if self.can_redo() {
            Some(self.commands.range(self.applied..).collect())
        } else {
            None
        }
    }

    pub fn entries(&self) -> impl Iterator<Item = HistoryEntry<'_>> + '_ {
        self.commands
            .iter()
            .enumerate()
            .map(move |(index, command)| HistoryEntry {
                index,
                label: command.description(),
                state: match (index + 1).cmp(&self.applied) {
                    std::cmp::Ordering::Less => EntryState::Applied,
                    std::cmp::Ordering::Equal => EntryState::Current,
                    std::cmp::Ordering::Greater => EntryState::Undone,
                },
            })
    }

    /// Forgets every recorded command without touching the receiver.
    pub fn clear(&mut self) {
        self.commands.clear();
        self.applied = 0;
    }

    fn enforce_limit(&mut self) {
        let Some(limit) = self.history_limit.map(NonZeroUsize::get) else {
            return;
        };

        while self.applied > 0 && self.commands.len() > limit {
            if let Some(evicted) = self.commands.pop_front() {
                trace!(command = %evicted.description(), "evicted oldest history entry");
            }
            self.applied -= 1;
        }

        // Only undone entries are left past the limit.
        if self.commands.len() > limit {
            trace!(
                dropped = self.commands.len() - limit,
                "dropped redo entries over the history limit"
            );
            self.commands.truncate(limit);
        }
    }
}

impl<C: Command> CommandHistory<C> for Timeline<C> {
    fn execute_command(
        &mut self,
        mut command: C,
        ctx: &mut C::Context,
    ) -> Result<(), HistoryError<C::Error>> {
        command.execute(ctx).map_err(|source| {
            let label = command.description().into_owned();
            warn!(command = %label, "execute failed, history unchanged");
            HistoryError::Execute { label, source }
        })?;
        debug!(command = %command.description(), "executed");

        if self.can_redo() {
            trace!(
                dropped = self.commands.len() - self.applied,
                "dropped redo entries after branching"
            );
            self.commands.truncate(self.applied);
        }

        self.commands.push_back(command);
        self.applied += 1;
        self.enforce_limit();

        Ok(())
    }

    fn undo(&mut self, ctx: &mut C::Context) -> Result<UndoOutcome, HistoryError<C::Error>> {
        let Some(index) = self.applied.checked_sub(1) else {
            debug!("nothing to undo");
            return Ok(UndoOutcome::NothingToUndo);
        };

        let command = &mut self.commands[index];
        command.undo(ctx).map_err(|source| {
            let label = command.description().into_owned();
            warn!(command = %label, "undo failed, cursor unchanged");
            HistoryError::Undo { label, source }
        })?;
        debug!(command = %command.description(), "undone");

        self.applied = index;
        Ok(UndoOutcome::Applied)
    }

    fn redo(&mut self, ctx: &mut C::Context) -> Result<RedoOutcome, HistoryError<C::Error>> {
        let Some(command) = self.commands.get_mut(self.applied) else {
            debug!("nothing to redo");
            return Ok(RedoOutcome::NothingToRedo);
        };

        command.redo(ctx).map_err(|source| {
            let label = command.description().into_owned();
            warn!(command = %label, "redo failed, cursor unchanged");
            HistoryError::Redo { label, source }
        })?;
        debug!(command = %command.description(), "redone");

        self.applied += 1;
        Ok(RedoOutcome::Applied)
    }

    fn set_history_limit(&mut self, limit: NonZeroUsize) {
        self.history_limit = Some(limit);
        self.enforce_limit();
    }

    fn labels(&self) -> Vec<String> {
        self.commands
            .iter()
            .map(|command| command.description().into_owned())
            .collect()
    }

    fn cursor(&self) -> Option<usize> {
        self.applied.checked_sub(1)
    }
}

impl<C: Command> Default for Timeline<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Command> fmt::Debug for Timeline<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Timeline")
            .field("labels", &self.labels())
            .field("cursor", &self.cursor())
            .field("history_limit", &self.history_limit)
            .finish()
    }
}

/// Renders the history one command per line, marking the cursor with an arrow.
impl<C: Command> fmt::Display for Timeline<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Command History:")?;
        for entry in self.entries() {
            let marker = if entry.state == EntryState::Current {
                '→'
            } else {
                ' '
            };
            write!(f, "\n  {marker} {}. {}", entry.index + 1, entry.label)?;
        }
        Ok(())
    }
}
