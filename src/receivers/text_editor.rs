use std::{borrow::Cow, fmt};

use thiserror::Error;
use tracing::debug;

use crate::traits::command::Command;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EditorError {
    #[error("position {position} is past the end of the document ({len} characters)")]
    PositionOutOfBounds { position: usize, len: usize },
    #[error("range {start}..{end} is past the end of the document ({len} characters)")]
    RangeOutOfBounds { start: usize, end: usize, len: usize },
    #[error("`{0}` was undone before it was executed")]
    NotApplied(&'static str),
}

/// A plain-text document with a cursor and a clipboard.
///
/// Positions and lengths count characters, not bytes.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct TextEditor {
    content: String,
    cursor_position: usize,
    clipboard: String,
}

impl TextEditor {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn content(&self) -> &str {
        &self.content
    }

    #[must_use]
    pub fn cursor_position(&self) -> usize {
        self.cursor_position
    }

    #[must_use]
    pub fn clipboard(&self) -> &str {
        &self.clipboard
    }

    /// Number of characters in the document.
    #[must_use]
    pub fn len(&self) -> usize {
        self.content.chars().count()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    /// Inserts `text` before the character at `position` and moves the cursor past it.
    ///
    /// # Errors
    ///
    /// [`EditorError::PositionOutOfBounds`] if `position` is past the end of the document.
    pub fn insert_text(&mut self, text: &str, position: usize) -> Result<(), EditorError> {
        let offset = self.byte_offset(position).ok_or(EditorError::PositionOutOfBounds {
            position,
            len: self.len(),
        })?;

        self.content.insert_str(offset, text);
        self.cursor_position = position + text.chars().count();
        debug!(text, position, "inserted text");
        Ok(())
    }

    /// Removes `length` characters starting at `start` and returns them.
    ///
    /// # Errors
    ///
    /// [`EditorError::RangeOutOfBounds`] if the range reaches past the end of the document.
    pub fn delete_text(&mut self, start: usize, length: usize) -> Result<String, EditorError> {
        let range = self.byte_range(start, length)?;

        let removed: String = self.content.drain(range).collect();
        self.cursor_position = start;
        debug!(removed = %removed, start, "deleted text");
        Ok(removed)
    }

    /// Replaces the clipboard with `length` characters starting at `start` and returns what the
    /// clipboard held before.
    ///
    /// # Errors
    ///
    /// [`EditorError::RangeOutOfBounds`] if the range reaches past the end of the document.
    pub fn copy_text(&mut self, start: usize, length: usize) -> Result<String, EditorError> {
        let range = self.byte_range(start, length)?;

        let copied = self.content[range].to_owned();
        debug!(copied = %copied, "copied to clipboard");
        Ok(self.replace_clipboard(copied))
    }

    /// Inserts the clipboard at `position`.
    ///
    /// # Errors
    ///
    /// Same as [`TextEditor::insert_text`].
    pub fn paste_text(&mut self, position: usize) -> Result<(), EditorError> {
        let text = self.clipboard.clone();
        self.insert_text(&text, position)
    }

    pub fn replace_clipboard(&mut self, text: String) -> String {
        std::mem::replace(&mut self.clipboard, text)
    }

    fn byte_offset(&self, position: usize) -> Option<usize> {
        self.content
            .char_indices()
            .map(|(offset, _)| offset)
            .chain(std::iter::once(self.content.len()))
            .nth(position)
    }

    fn byte_range(&self, start: usize, length: usize) -> Result<std::ops::Range<usize>, EditorError> {
        let end = start.saturating_add(length);
        let out_of_bounds = || EditorError::RangeOutOfBounds {
            start,
            end,
            len: self.len(),
        };

        let from = self.byte_offset(start).ok_or_else(out_of_bounds)?;
        let to = self.byte_offset(end).ok_or_else(out_of_bounds)?;
        Ok(from..to)
    }
}

impl fmt::Display for TextEditor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Document: \"{}\" (cursor at {})",
            self.content, self.cursor_position
        )
    }
}

#[derive(Debug, Clone)]
pub struct Insert {
    text: String,
    position: usize,
}

impl Insert {
    pub fn new(text: impl Into<String>, position: usize) -> Self {
        Self {
            text: text.into(),
            position,
        }
    }
}

impl Command for Insert {
    type Context = TextEditor;
    type Error = EditorError;

    fn execute(&mut self, ctx: &mut TextEditor) -> Result<(), EditorError> {
        ctx.insert_text(&self.text, self.position)
    }

    fn undo(&mut self, ctx: &mut TextEditor) -> Result<(), EditorError> {
        ctx.delete_text(self.position, self.text.chars().count())
            .map(drop)
    }

    fn description(&self) -> Cow<'_, str> {
        Cow::Owned(format!("Insert {:?} at {}", self.text, self.position))
    }
}

/// Deletes a range, capturing the removed text when it runs so undo can put it back.
#[derive(Debug, Clone)]
pub struct Delete {
    start: usize,
    length: usize,
    deleted: Option<String>,
}

impl Delete {
    #[must_use]
    pub fn new(start: usize, length: usize) -> Self {
        Self {
            start,
            length,
            deleted: None,
        }
    }
}

impl Command for Delete {
    type Context = TextEditor;
    type Error = EditorError;

    fn execute(&mut self, ctx: &mut TextEditor) -> Result<(), EditorError> {
        self.deleted = Some(ctx.delete_text(self.start, self.length)?);
        Ok(())
    }

    fn undo(&mut self, ctx: &mut TextEditor) -> Result<(), EditorError> {
        let deleted = self
            .deleted
            .as_deref()
            .ok_or(EditorError::NotApplied("Delete"))?;
        ctx.insert_text(deleted, self.start)
    }

    fn description(&self) -> Cow<'_, str> {
        Cow::Owned(format!("Delete {} chars at {}", self.length, self.start))
    }
}

/// Copies a range to the clipboard. Undo restores the previous clipboard.
#[derive(Debug, Clone)]
pub struct CopyText {
    start: usize,
    length: usize,
    previous_clipboard: Option<String>,
}

impl CopyText {
    #[must_use]
    pub fn new(start: usize, length: usize) -> Self {
        Self {
            start,
            length,
            previous_clipboard: None,
        }
    }
}

impl Command for CopyText {
    type Context = TextEditor;
    type Error = EditorError;

    fn execute(&mut self, ctx: &mut TextEditor) -> Result<(), EditorError> {
        self.previous_clipboard = Some(ctx.copy_text(self.start, self.length)?);
        Ok(())
    }

    fn undo(&mut self, ctx: &mut TextEditor) -> Result<(), EditorError> {
        let previous = self
            .previous_clipboard
            .clone()
            .ok_or(EditorError::NotApplied("Copy"))?;
        ctx.replace_clipboard(previous);
        Ok(())
    }

    fn description(&self) -> Cow<'_, str> {
        Cow::Owned(format!("Copy {} chars at {}", self.length, self.start))
    }
}

/// Pastes the clipboard. The pasted text is captured on the first run, so redo inserts the same
/// text even if the clipboard changed in between.
#[derive(Debug, Clone)]
pub struct Paste {
    position: usize,
    pasted: Option<String>,
}

impl Paste {
    #[must_use]
    pub fn new(position: usize) -> Self {
        Self {
            position,
            pasted: None,
        }
    }
}

impl Command for Paste {
    type Context = TextEditor;
    type Error = EditorError;

    fn execute(&mut self, ctx: &mut TextEditor) -> Result<(), EditorError> {
        let text = ctx.clipboard().to_owned();
        ctx.paste_text(self.position)?;
        self.pasted = Some(text);
        Ok(())
    }

    fn undo(&mut self, ctx: &mut TextEditor) -> Result<(), EditorError> {
        let pasted = self
            .pasted
            .as_deref()
            .ok_or(EditorError::NotApplied("Paste"))?;
        ctx.delete_text(self.position, pasted.chars().count())
            .map(drop)
    }

    fn redo(&mut self, ctx: &mut TextEditor) -> Result<(), EditorError> {
        match self.pasted.as_deref() {
            Some(text) => ctx.insert_text(text, self.position),
            None => self.execute(ctx),
        }
    }

    fn description(&self) -> Cow<'_, str> {
        Cow::Owned(format!("Paste at {}", self.position))
    }
}
