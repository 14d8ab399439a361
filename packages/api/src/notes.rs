//! Note input handling.
//!
//! A [`NoteForm`] is what a client submits; [`NoteDraft::from_form`] validates
//! it and runs both fields through the sanitizer, so only cleaned HTML ever
//! reaches the `notes` table.

use serde::Deserialize;

use crate::sanitizer::sanitize_note_text;

#[derive(Debug, Clone, Deserialize)]
pub struct NoteForm {
    pub title: String,
    #[serde(default)]
    pub text: String,
    /// Notes stay private unless the client shares them explicitly.
    #[serde(default = "private_by_default")]
    pub private: bool,
}

fn private_by_default() -> bool {
    true
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum NoteError {
    #[error("Title is required.")]
    TitleRequired,
    #[error("You either don't have a note with that ID or you're not authorised to delete it")]
    NotDeletable,
    #[error("You don't have a note with that ID")]
    NotFound,
}

/// Sanitized note content ready to store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteDraft {
    pub title: String,
    pub text: String,
    pub private: bool,
}

impl NoteDraft {
    pub fn from_form(form: &NoteForm) -> Result<Self, NoteError> {
        let title = sanitize_note_text(form.title.trim());
        if title.trim().is_empty() {
            return Err(NoteError::TitleRequired);
        }
        Ok(Self {
            title,
            text: sanitize_note_text(&form.text),
            private: form.private,
        })
    }
}

/// Whether `user` may delete a note owned by `owner`.
pub fn can_delete(owner: uuid::Uuid, user: uuid::Uuid, user_is_admin: bool) -> bool {
    user_is_admin || owner == user
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn test_draft_is_sanitized() {
        let draft = NoteDraft::from_form(&NoteForm {
            title: "  <i>Groceries</i><script>x()</script> ".into(),
            text: r#"<p onclick="x()">milk</p><img src="x">"#.into(),
            private: true,
        })
        .unwrap();

        assert_eq!(draft.title, "<i>Groceries</i>");
        assert_eq!(draft.text, "<p>milk</p>");
        assert!(draft.private);
    }

    #[test]
    fn test_title_required_after_sanitizing() {
        let err = NoteDraft::from_form(&NoteForm {
            title: "<script>only()</script>".into(),
            text: "body".into(),
            private: false,
        })
        .unwrap_err();
        assert_eq!(err, NoteError::TitleRequired);
    }

    #[test]
    fn test_private_by_default() {
        let form: NoteForm = serde_json::from_str(r#"{"title": "t"}"#).unwrap();
        assert!(form.private);
        assert_eq!(form.text, "");

        let shared: NoteForm = serde_json::from_str(r#"{"title": "t", "private": false}"#).unwrap();
        assert!(!shared.private);
    }

    #[test]
    fn test_delete_rule() {
        let owner = Uuid::new_v4();
        let other = Uuid::new_v4();
        assert!(can_delete(owner, owner, false));
        assert!(!can_delete(owner, other, false));
        assert!(can_delete(owner, other, true));
    }
}
