use std::borrow::Cow;

use tracing::{debug, error, warn};

use crate::traits::command::Command;

/// A recorded sequence of commands applied and undone as a single history entry.
///
/// A macro is all-or-nothing: if a step fails, the steps that already ran are reverted before the
/// error is returned, so the receiver is left as it was before the call.
#[derive(Debug, Clone)]
pub struct Macro<C> {
    label: String,
    steps: Vec<C>,
}

impl<C: Command> Macro<C> {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            steps: Vec::new(),
        }
    }

    pub fn with_steps(label: impl Into<String>, steps: Vec<C>) -> Self {
        Self {
            label: label.into(),
            steps,
        }
    }

    /// Appends a step. Steps run in recording order and are undone in reverse.
    pub fn record(&mut self, step: C) {
        self.steps.push(step);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn steps(&self) -> impl Iterator<Item = &C> {
        self.steps.iter()
    }

    fn apply(&mut self, ctx: &mut C::Context, redo: bool) -> Result<(), C::Error> {
        for index in 0..self.steps.len() {
            let step = &mut self.steps[index];
            let result = if redo { step.redo(ctx) } else { step.execute(ctx) };

            if let Err(err) = result {
                warn!(
                    label = %self.label,
                    step = index,
                    "macro step failed, reverting earlier steps"
                );
                for (applied, step) in self.steps[..index].iter_mut().enumerate().rev() {
                    if step.undo(ctx).is_err() {
                        error!(label = %self.label, step = applied, "could not revert macro step");
                    }
                }
                return Err(err);
            }
        }

        debug!(label = %self.label, steps = self.steps.len(), "macro applied");
        Ok(())
    }
}

impl<C: Command> Command for Macro<C> {
    type Context = C::Context;
    type Error = C::Error;

    fn execute(&mut self, ctx: &mut C::Context) -> Result<(), C::Error> {
        self.apply(ctx, false)
    }

    fn undo(&mut self, ctx: &mut C::Context) -> Result<(), C::Error> {
        for index in (0..self.steps.len()).rev() {
            if let Err(err) = self.steps[index].undo(ctx) {
                warn!(
                    label = %self.label,
                    step = index,
                    "macro undo failed, re-applying later steps"
                );
                for (reverted, step) in self.steps.iter_mut().enumerate().skip(index + 1) {
                    if step.redo(ctx).is_err() {
                        error!(label = %self.label, step = reverted, "could not re-apply macro step");
                    }
                }
                return Err(err);
            }
        }

        debug!(label = %self.label, steps = self.steps.len(), "macro undone");
        Ok(())
    }

    fn redo(&mut self, ctx: &mut C::Context) -> Result<(), C::Error> {
        self.apply(ctx, true)
    }

    fn description(&self) -> Cow<'_, str> {
        Cow::Borrowed(&self.label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prelude::*;
    use crate::receivers::counter::{Add, Counter, CounterError};
    use crate::receivers::light::{Light, LightError, SetBrightness, TurnOff, TurnOn};

    #[test]
    fn test_macro_is_one_history_entry() {
        let mut history = Timeline::new();
        let mut light = Light::default();

        let mut bedtime: Macro<BoxedCommand<Light, LightError>> = Macro::new("Bedtime routine");
        bedtime.record(Box::new(TurnOn::new()));
        bedtime.record(Box::new(SetBrightness::new(25)));
        bedtime.record(Box::new(TurnOff::new()));
        assert_eq!(bedtime.len(), 3);

        history.execute_command(bedtime, &mut light).unwrap();
        assert_eq!(
            light,
            Light {
                is_on: false,
                brightness: 25
            }
        );
        assert_eq!(history.labels(), vec!["Bedtime routine"]);

        history.undo(&mut light).unwrap();
        assert_eq!(light, Light::default());

        history.redo(&mut light).unwrap();
        assert_eq!(light.brightness, 25);
        assert!(!light.is_on);
    }

    #[test]
    fn test_failed_step_reverts_earlier_steps() {
        let mut history = Timeline::new();
        let mut counter = Counter::new(i64::MAX - 10);

        let steps = vec![Add(5), Add(4), Add(2)];
        let err = history
            .execute_command(Macro::with_steps("Overflowing", steps), &mut counter)
            .unwrap_err();

        assert_eq!(err.label(), "Overflowing");
        assert!(matches!(
            err.into_command_error(),
            CounterError::Overflow { .. }
        ));
        assert_eq!(counter.value(), i64::MAX - 10);
        assert!(history.is_empty());
    }

    #[test]
    fn test_failed_undo_reapplies_later_steps() {
        let mut counter = Counter::new(0);
        let mut steps = Macro::with_steps("Wrap", vec![Add(i64::MIN), Add(1)]);

        steps.execute(&mut counter).unwrap();
        assert_eq!(counter.value(), i64::MIN + 1);

        // Undoing Add(1) succeeds, undoing Add(i64::MIN) cannot negate.
        assert!(steps.undo(&mut counter).is_err());
        assert_eq!(counter.value(), i64::MIN + 1);
    }

    #[test]
    fn test_empty_macro_is_a_no_op() {
        let mut history = Timeline::new();
        let mut counter = Counter::new(7);

        history
            .execute_command(Macro::<Add>::new("Nothing"), &mut counter)
            .unwrap();
        history.undo(&mut counter).unwrap();

        assert_eq!(counter.value(), 7);
        assert_eq!(history.len(), 1);
    }

    #[test]
    fn test_steps_in_recording_order() {
        let mac = Macro::with_steps("Sum", vec![Add(1), Add(2), Add(3)]);
        let labels: Vec<_> = mac.steps().map(|step| step.description().into_owned()).collect();
        assert_eq!(labels, vec!["Add(1)", "Add(2)", "Add(3)"]);
    }
}
