#![warn(clippy::pedantic)]
#![warn(clippy::perf)]
#![warn(clippy::style)]
#![warn(clippy::correctness)]
#![warn(clippy::complexity)]
#![warn(clippy::suspicious)]
#![warn(clippy::cargo)]

pub mod concurrent_timeline;
pub mod error;
pub mod fn_command;
pub mod macro_command;
pub mod receivers;
pub mod shared_context;
pub mod timeline;
pub mod traits;

pub mod prelude {
	pub use crate::concurrent_timeline::ConcurrentTimeline;
	pub use crate::error::HistoryError;
	pub use crate::fn_command::FnCommand;
	pub use crate::macro_command::Macro;
	pub use crate::shared_context::SharedContext;
	pub use crate::timeline::{EntryState, HistoryEntry, Timeline};
	pub use crate::traits::command::{BoxedCommand, Command};
	pub use crate::traits::command_history::{CommandHistory, RedoOutcome, UndoOutcome};
}
