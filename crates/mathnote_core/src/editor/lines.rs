//! Line-oriented scratch editor (the original single-field note surface).
//!
//! # Responsibility
//! - Keep ordered sections of single-field lines with one focused line.
//! - Apply the Enter/ArrowUp/ArrowDown/Backspace rules per section.
//!
//! # Invariants
//! - There is always at least one section with at least one line.
//! - Arrow movement clamps at section bounds; it never crosses sections.

use crate::model::keys::{IndexError, KeyedVec};

/// Escape sequence a math widget reports to turn its line into a text line.
pub const TEXT_ESCAPE: &str = "\"";

/// Field flavor of one line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    Math,
    Text,
}

/// One editable line: a single math or text field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    pub content: String,
    pub kind: LineKind,
}

impl Line {
    pub fn new(content: impl Into<String>, kind: LineKind) -> Self {
        Self {
            content: content.into(),
            kind,
        }
    }
}

impl Default for Line {
    /// A fresh line is an empty math field.
    fn default() -> Self {
        Self::new("", LineKind::Math)
    }
}

/// Sections of keyed lines plus the focused line pointer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinePad {
    sections: KeyedVec<KeyedVec<Line>>,
    section: usize,
    line: usize,
}

impl LinePad {
    /// One section holding one fresh line, focused.
    pub fn new() -> Self {
        Self {
            sections: KeyedVec::from_values(vec![KeyedVec::from_values(vec![Line::default()])]),
            section: 0,
            line: 0,
        }
    }

    pub fn sections(&self) -> &KeyedVec<KeyedVec<Line>> {
        &self.sections
    }

    /// Focused position as `(section, line)`.
    pub fn focused(&self) -> (usize, usize) {
        (self.section, self.line)
    }

    pub fn focused_line(&self) -> Option<&Line> {
        self.sections.get(self.section)?.get(self.line)
    }

    /// Moves focus to an explicit line (pointer click).
    ///
    /// # Errors
    /// Returns `IndexError` when the position does not exist.
    pub fn focus_line(&mut self, section: usize, line: usize) -> Result<(), IndexError> {
        let section_count = self.sections.len();
        let lines = self.sections.get(section).ok_or(IndexError {
            index: section,
            len: section_count,
        })?;
        if line >= lines.len() {
            return Err(IndexError {
                index: line,
                len: lines.len(),
            });
        }
        self.section = section;
        self.line = line;
        Ok(())
    }

    /// Enter: inserts a fresh line below the focused one and advances focus.
    pub fn enter(&mut self) -> Result<(), IndexError> {
        let at = self.line + 1;
        self.section_mut()?.insert(at, Line::default())?;
        self.line = at;
        Ok(())
    }

    /// ArrowUp: moves focus one line up, clamped at the section top.
    pub fn arrow_up(&mut self) {
        if self.line > 0 {
            self.line -= 1;
        }
    }

    /// ArrowDown: moves focus one line down, clamped at the section bottom.
    pub fn arrow_down(&mut self) {
        let lines = self.sections.get(self.section).map_or(0, KeyedVec::len);
        if self.line + 1 < lines {
            self.line += 1;
        }
    }

    /// Backspace. Returns `false` when the focused line still has content
    /// (the field widget handles the key natively); otherwise removes the
    /// empty line, or the whole section when it was the section's only line
    /// and other sections remain. The only line of the only section stays.
    pub fn backspace(&mut self) -> Result<bool, IndexError> {
        let at = self.line;
        let line_count = {
            let section = self.section_mut()?;
            let len = section.len();
            let line = section.get(at).ok_or(IndexError { index: at, len })?;
            if !line.content.is_empty() {
                return Ok(false);
            }
            len
        };

        if line_count != 1 {
            self.section_mut()?.remove(at)?;
            if self.line != 0 {
                self.line -= 1;
            }
            return Ok(true);
        }

        if self.sections.len() != 1 {
            self.remove_section(self.section)?;
        }
        Ok(true)
    }

    /// Inserts a new section (one fresh line) at the given boundary.
    pub fn insert_section(&mut self, index: usize) -> Result<(), IndexError> {
        self.sections
            .insert(index, KeyedVec::from_values(vec![Line::default()]))?;
        Ok(())
    }

    /// Removes a whole section; focus lands on the nearest remaining
    /// section's last in-range line. Removing the only section is a no-op.
    pub fn remove_section(&mut self, index: usize) -> Result<(), IndexError> {
        if self.sections.len() == 1 {
            return Ok(());
        }
        self.sections.remove(index)?;
        self.section = self.section.min(self.sections.len() - 1);
        let lines = self.sections.get(self.section).map_or(1, KeyedVec::len);
        self.line = self.line.min(lines - 1);
        Ok(())
    }

    /// Replaces the focused line wholesale.
    pub fn set_line(&mut self, line: Line) -> Result<(), IndexError> {
        let at = self.line;
        self.section_mut()?.set(at, line)
    }

    /// Change report from a math field: the reserved escape content turns
    /// the line into an empty text field, anything else is stored verbatim.
    pub fn math_input(&mut self, content: &str) -> Result<(), IndexError> {
        if content == TEXT_ESCAPE {
            return self.set_line(Line::new("", LineKind::Text));
        }
        let at = self.line;
        let section = self.section_mut()?;
        let len = section.len();
        let line = section.get_mut(at).ok_or(IndexError { index: at, len })?;
        line.content = content.to_owned();
        Ok(())
    }

    fn section_mut(&mut self) -> Result<&mut KeyedVec<Line>, IndexError> {
        let len = self.sections.len();
        self.sections.get_mut(self.section).ok_or(IndexError {
            index: self.section,
            len,
        })
    }
}

impl Default for LinePad {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::{Line, LineKind, LinePad};

    #[test]
    fn enter_inserts_below_and_advances() {
        let mut pad = LinePad::new();
        pad.math_input("a").unwrap();
        pad.enter().unwrap();

        assert_eq!(pad.focused(), (0, 1));
        let section = pad.sections().get(0).unwrap();
        assert_eq!(section.len(), 2);
        assert_eq!(section.get(1), Some(&Line::default()));
    }

    #[test]
    fn backspace_on_only_line_of_only_section_is_a_noop() {
        let mut pad = LinePad::new();
        assert!(pad.backspace().unwrap());
        assert_eq!(pad.sections().len(), 1);
        assert_eq!(pad.sections().get(0).unwrap().len(), 1);
    }

    #[test]
    fn backspace_with_content_defers_to_the_widget() {
        let mut pad = LinePad::new();
        pad.math_input("x^2").unwrap();
        assert!(!pad.backspace().unwrap());
    }

    #[test]
    fn quote_escape_turns_a_math_line_into_text() {
        let mut pad = LinePad::new();
        pad.math_input("\"").unwrap();
        assert_eq!(pad.focused_line(), Some(&Line::new("", LineKind::Text)));
    }

    #[test]
    fn removing_an_empty_sole_line_section_keeps_focus_valid() {
        let mut pad = LinePad::new();
        pad.insert_section(1).unwrap();
        pad.focus_line(1, 0).unwrap();
        assert!(pad.backspace().unwrap());
        assert_eq!(pad.sections().len(), 1);
        assert_eq!(pad.focused(), (0, 0));
    }
}
