//! Settings surface: edit questions and the unlock PIN, then save.

use giftbox_common::{GiftboxError, Question, QuizConfiguration};

use crate::store::ConfigurationStore;

/// Editable field of a question
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuestionField {
    Question,
    Hint,
    Answer,
}

/// Draft of the quiz configuration; nothing is persisted until `save`
#[derive(Debug, Clone)]
pub struct SettingsEditor {
    draft: QuizConfiguration,
}

impl SettingsEditor {
    /// Start editing from what is stored now
    pub fn load(store: &ConfigurationStore) -> Self {
        Self {
            draft: store.load(),
        }
    }

    pub fn config(&self) -> &QuizConfiguration {
        &self.draft
    }

    /// Append a question; returns its new id
    pub fn add_question(
        &mut self,
        question: impl Into<String>,
        hint: impl Into<String>,
        answer: impl Into<String>,
    ) -> u64 {
        let id = self.draft.next_question_id();
        self.draft
            .questions
            .push(Question::new(id, question, hint, answer));
        id
    }

    pub fn update_question(
        &mut self,
        id: u64,
        field: QuestionField,
        value: impl Into<String>,
    ) -> Result<(), GiftboxError> {
        let question = self
            .draft
            .questions
            .iter_mut()
            .find(|q| q.id == id)
            .ok_or_else(|| GiftboxError::InvalidInput(format!("no question with id {id}")))?;

        let value = value.into();
        match field {
            QuestionField::Question => question.question = value,
            QuestionField::Hint => question.hint = value,
            QuestionField::Answer => question.answer = value,
        }

        Ok(())
    }

    /// Remove a question; the last remaining question cannot be removed
    pub fn remove_question(&mut self, id: u64) -> Result<Question, GiftboxError> {
        let position = self
            .draft
            .questions
            .iter()
            .position(|q| q.id == id)
            .ok_or_else(|| GiftboxError::InvalidInput(format!("no question with id {id}")))?;

        if self.draft.questions.len() <= 1 {
            return Err(GiftboxError::InvalidInput(
                "the last question cannot be removed".to_string(),
            ));
        }

        Ok(self.draft.questions.remove(position))
    }

    pub fn set_unlock_pin(&mut self, pin: impl Into<String>) {
        self.draft.unlock_pin = pin.into();
    }

    /// Replace the draft with the built-in questions and PIN
    pub fn reset_to_defaults(&mut self) {
        self.draft = QuizConfiguration::default();
    }

    /// Persist the draft; later sessions see the new values
    pub fn save(&self, store: &ConfigurationStore) -> Result<(), GiftboxError> {
        store.save(&self.draft)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use std::sync::Arc;

    fn store() -> ConfigurationStore {
        ConfigurationStore::new(Arc::new(MemoryStore::new()))
    }

    #[test]
    fn test_add_assigns_next_id() {
        let store = store();
        let mut editor = SettingsEditor::load(&store);

        assert_eq!(editor.add_question("Cat?", "", "Mochi"), 4);
        editor.remove_question(2).unwrap();
        assert_eq!(editor.add_question("Dog?", "", "Bo"), 5);

        let ids: Vec<u64> = editor.config().questions.iter().map(|q| q.id).collect();
        assert_eq!(ids, vec![1, 3, 4, 5]);
    }

    #[test]
    fn test_edits_are_drafts_until_saved() {
        let store = store();
        let mut editor = SettingsEditor::load(&store);

        editor.update_question(1, QuestionField::Answer, "January").unwrap();
        editor.update_question(1, QuestionField::Hint, "").unwrap();
        editor.set_unlock_pin("9999");
        assert_eq!(store.load(), QuizConfiguration::default());

        editor.save(&store).unwrap();
        let saved = store.load();
        assert_eq!(saved.unlock_pin, "9999");
        assert_eq!(saved.question(1).map(|q| q.answer.as_str()), Some("January"));
        assert_eq!(saved.question(1).map(|q| q.hint.as_str()), Some(""));
    }

    #[test]
    fn test_unknown_id_is_rejected() {
        let mut editor = SettingsEditor::load(&store());
        assert!(editor.update_question(42, QuestionField::Question, "x").is_err());
        assert!(editor.remove_question(42).is_err());
    }

    #[test]
    fn test_last_question_cannot_be_removed() {
        let mut editor = SettingsEditor::load(&store());
        editor.remove_question(1).unwrap();
        editor.remove_question(2).unwrap();

        let err = editor.remove_question(3).unwrap_err();
        assert!(matches!(err, GiftboxError::InvalidInput(_)));
        assert_eq!(editor.config().questions.len(), 1);
    }

    #[test]
    fn test_reset_restores_defaults() {
        let store = store();
        let mut editor = SettingsEditor::load(&store);
        editor.set_unlock_pin("1");
        editor.add_question("Q", "", "A");
        editor.save(&store).unwrap();

        let mut editor = SettingsEditor::load(&store);
        editor.reset_to_defaults();
        editor.save(&store).unwrap();
        assert_eq!(store.load(), QuizConfiguration::default());
    }

    #[test]
    fn test_empty_pin_is_not_saved() {
        let store = store();
        let mut editor = SettingsEditor::load(&store);
        editor.set_unlock_pin("");
        assert!(editor.save(&store).is_err());
    }
}
