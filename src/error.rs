use thiserror::Error;

/// A command's forward or inverse effect failed.
///
/// The history is left exactly as it was before the failing call: a command whose `execute`
/// fails is not recorded, and the cursor does not move when `undo` or `redo` fails.
#[derive(Debug, Error)]
pub enum HistoryError<E> {
    #[error("failed to execute `{label}`")]
    Execute {
        label: String,
        #[source]
        source: E,
    },
    #[error("failed to undo `{label}`")]
    Undo {
        label: String,
        #[source]
        source: E,
    },
    #[error("failed to redo `{label}`")]
    Redo {
        label: String,
        #[source]
        source: E,
    },
}

impl<E> HistoryError<E> {
    /// Label of the command whose effect failed.
    #[must_use]
    pub fn label(&self) -> &str {
        match self {
            Self::Execute { label, .. } | Self::Undo { label, .. } | Self::Redo { label, .. } => {
                label
            }
        }
    }

    /// The command's own error.
    #[must_use]
    pub fn command_error(&self) -> &E {
        match self {
            Self::Execute { source, .. } | Self::Undo { source, .. } | Self::Redo { source, .. } => {
                source
            }
        }
    }

    #[must_use]
    pub fn into_command_error(self) -> E {
        match self {
            Self::Execute { source, .. } | Self::Undo { source, .. } | Self::Redo { source, .. } => {
                source
            }
        }
    }
}
