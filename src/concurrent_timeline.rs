use std::{num::NonZeroUsize, sync::Arc};

use parking_lot::Mutex;

use crate::error::HistoryError;
use crate::shared_context::SharedContext;
use crate::timeline::Timeline;
use crate::traits::{
    command::Command,
    command_history::{CommandHistory, RedoOutcome, UndoOutcome},
};

/// A [`Timeline`] that can be driven from several threads.
///
/// Every call takes the history lock first and the receiver lock second, and holds both until
/// the effect has run and the cursor has moved. Calls are therefore fully serialized and the
/// cursor always points at the last applied command.
pub struct ConcurrentTimeline<C: Command> {
    timeline: Mutex<Timeline<C>>,
}

impl<C> ConcurrentTimeline<C>
where
    C: Command + Send,
{
    #[must_use]
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            timeline: Mutex::new(Timeline::new()),
        })
    }

    #[must_use]
    pub fn with_limit(history_limit: NonZeroUsize) -> Arc<Self> {
        Arc::new(Self {
            timeline: Mutex::new(Timeline::with_limit(history_limit)),
        })
    }

    /// # Errors
    ///
    /// See [`CommandHistory::execute_command`].
    pub fn execute_command(
        &self,
        command: C,
        ctx: &SharedContext<C::Context>,
    ) -> Result<(), HistoryError<C::Error>> {
        let mut timeline = self.timeline.lock();
        let mut receiver = ctx.lock();
        timeline.execute_command(command, &mut *receiver)
    }

    /// # Errors
    ///
    /// See [`CommandHistory::undo`].
    pub fn undo(
        &self,
        ctx: &SharedContext<C::Context>,
    ) -> Result<UndoOutcome, HistoryError<C::Error>> {
        let mut timeline = self.timeline.lock();
        let mut receiver = ctx.lock();
        timeline.undo(&mut *receiver)
    }

    /// # Errors
    ///
    /// See [`CommandHistory::redo`].
    pub fn redo(
        &self,
        ctx: &SharedContext<C::Context>,
    ) -> Result<RedoOutcome, HistoryError<C::Error>> {
        let mut timeline = self.timeline.lock();
        let mut receiver = ctx.lock();
        timeline.redo(&mut *receiver)
    }

    /// Executes `commands` as one uninterrupted run: no other call can interleave with it.
    ///
    /// # Errors
    ///
    /// See [`CommandHistory::batch_execute`].
    pub fn batch_execute(
        &self,
        commands: Vec<C>,
        ctx: &SharedContext<C::Context>,
    ) -> Result<(), HistoryError<C::Error>> {
        let mut timeline = self.timeline.lock();
        let mut receiver = ctx.lock();
        timeline.batch_execute(commands, &mut *receiver)
    }

    pub fn set_history_limit(&self, limit: NonZeroUsize) {
        self.timeline.lock().set_history_limit(limit);
    }

    #[must_use]
    pub fn labels(&self) -> Vec<String> {
        self.timeline.lock().labels()
    }

    #[must_use]
    pub fn cursor(&self) -> Option<usize> {
        self.timeline.lock().cursor()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.timeline.lock().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.timeline.lock().is_empty()
    }

    #[must_use]
    pub fn can_undo(&self) -> bool {
        self.timeline.lock().can_undo()
    }

    #[must_use]
    pub fn can_redo(&self) -> bool {
        self.timeline.lock().can_redo()
    }

    /// The history listing, rendered under a single lock.
    #[must_use]
    pub fn render(&self) -> String {
        self.timeline.lock().to_string()
    }
}

#[cfg(test)]
mod tests {
    use std::{hint::black_box, thread, time};

    use rand::Rng;

    use super::*;
    use crate::receivers::counter::{Add, Counter, CounterError};

    #[test]
    fn test_execute_undo_redo() {
        let history = ConcurrentTimeline::new();
        let ctx = SharedContext::new(Counter::default());

        history.execute_command(Add(1), &ctx).unwrap();
        assert_eq!(ctx.lock().value(), 1);

        assert_eq!(history.undo(&ctx).unwrap(), UndoOutcome::Applied);
        assert_eq!(ctx.lock().value(), 0);

        assert_eq!(history.redo(&ctx).unwrap(), RedoOutcome::Applied);
        assert_eq!(ctx.lock().value(), 1);
        assert_eq!(history.redo(&ctx).unwrap(), RedoOutcome::NothingToRedo);
    }

    #[test]
    fn test_limit_and_labels() {
        let history = ConcurrentTimeline::with_limit(NonZeroUsize::new(2).unwrap());
        let ctx = SharedContext::new(Counter::default());

        history
            .batch_execute(vec![Add(1), Add(2), Add(3)], &ctx)
            .unwrap();

        assert_eq!(ctx.lock().value(), 6);
        assert_eq!(history.labels(), vec!["Add(2)", "Add(3)"]);
        assert_eq!(history.cursor(), Some(1));

        history.set_history_limit(NonZeroUsize::new(1).unwrap());
        assert_eq!(history.labels(), vec!["Add(3)"]);
        assert_eq!(history.len(), 1);
    }

    #[test]
    fn test_failure_leaves_history_untouched() {
        let history = ConcurrentTimeline::new();
        let ctx = SharedContext::new(Counter::new(i64::MAX));

        let err = history.execute_command(Add(1), &ctx).unwrap_err();

        assert!(matches!(
            err.command_error(),
            CounterError::Overflow { .. }
        ));
        assert!(history.is_empty());
        assert_eq!(ctx.lock().value(), i64::MAX);
    }

    #[test]
    fn test_render() {
        let history = ConcurrentTimeline::new();
        let ctx = SharedContext::new(Counter::default());

        history.batch_execute(vec![Add(4), Add(2)], &ctx).unwrap();
        history.undo(&ctx).unwrap();

        assert_eq!(
            history.render(),
            "Command History:\n  → 1. Add(4)\n    2. Add(2)"
        );
    }

    #[test]
    fn test_concurrent_rng() {
        let count = rand::thread_rng().gen_range(10..60);
        let history = ConcurrentTimeline::new();
        let ctx = SharedContext::new(Counter::default());

        let mut handles = Vec::new();
        for _ in 0..count {
            let value = rand::thread_rng().gen_range(0..20);
            let history = Arc::clone(&history);
            let ctx = ctx.clone();

            handles.push(black_box(thread::spawn(move || {
                thread::sleep(time::Duration::from_millis(
                    rand::thread_rng().gen_range(0..100),
                ));
                history.execute_command(Add(value), &ctx).unwrap();
                value
            })));
        }

        let mut sum = 0;
        for handle in handles {
            let result = handle.join();
            assert!(result.is_ok(), "Thread panicked during execution");
            sum += result.expect("Thread should return a value");
        }

        assert_eq!(ctx.lock().value(), sum);
        assert_eq!(history.len(), count);
        assert!(!history.can_redo());

        let undoers = rand::thread_rng().gen_range(1..=count);
        let mut handles = Vec::new();
        for _ in 0..undoers {
            let history = Arc::clone(&history);
            let ctx = ctx.clone();

            handles.push(black_box(thread::spawn(move || {
                thread::sleep(time::Duration::from_millis(
                    rand::thread_rng().gen_range(0..100),
                ));
                assert_eq!(history.undo(&ctx).unwrap(), UndoOutcome::Applied);
                thread::sleep(time::Duration::from_millis(
                    rand::thread_rng().gen_range(0..100),
                ));
                assert_eq!(history.redo(&ctx).unwrap(), RedoOutcome::Applied);
            })));
        }

        for handle in handles {
            assert!(handle.join().is_ok(), "Thread panicked during execution");
        }

        assert_eq!(ctx.lock().value(), sum);
        assert_eq!(history.len(), count, "No entry lost to interleaving");
        assert_eq!(history.cursor(), Some(count - 1));
    }
}
