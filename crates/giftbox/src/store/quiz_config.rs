//! Quiz configuration persisted in the key-value store.

use giftbox_common::constants::{DEFAULT_UNLOCK_PIN, storage_keys};
use giftbox_common::{GiftboxError, Question, QuizConfiguration, default_questions};
use std::sync::Arc;

use super::KeyValueStore;

/// Reads and writes the `quiz-questions` and `quiz-pin` entries
#[derive(Clone)]
pub struct ConfigurationStore {
    store: Arc<dyn KeyValueStore>,
}

impl ConfigurationStore {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Load the configuration, substituting built-in defaults for any
    /// entry that is absent or cannot be used. Never fails.
    pub fn load(&self) -> QuizConfiguration {
        let questions = match self.read_questions() {
            Ok(Some(questions)) => questions,
            Ok(None) => default_questions(),
            Err(e) => {
                tracing::warn!(error = %e, "Stored questions unusable, using defaults");
                default_questions()
            }
        };

        let unlock_pin = match self.store.get(storage_keys::QUIZ_PIN) {
            Ok(Some(pin)) if !pin.is_empty() => pin,
            Ok(_) => DEFAULT_UNLOCK_PIN.to_string(),
            Err(e) => {
                tracing::warn!(error = %e, "Stored PIN unreadable, using default");
                DEFAULT_UNLOCK_PIN.to_string()
            }
        };

        QuizConfiguration::new(questions, unlock_pin)
    }

    fn read_questions(&self) -> Result<Option<Vec<Question>>, GiftboxError> {
        let Some(raw) = self.store.get(storage_keys::QUIZ_QUESTIONS)? else {
            return Ok(None);
        };

        let questions: Vec<Question> = serde_json::from_str(&raw)?;
        QuizConfiguration::validate_questions(&questions)
            .map_err(|e| GiftboxError::ConfigParse(e.to_string()))?;

        Ok(Some(questions))
    }

    /// Write both entries, replacing whatever was stored before
    pub fn save(&self, config: &QuizConfiguration) -> Result<(), GiftboxError> {
        config.validate()?;

        let questions = serde_json::to_string(&config.questions)
            .map_err(|e| GiftboxError::Storage(e.to_string()))?;

        self.store.set_many(&[
            (storage_keys::QUIZ_QUESTIONS, questions.as_str()),
            (storage_keys::QUIZ_PIN, config.unlock_pin.as_str()),
        ])?;

        tracing::info!(questions = config.questions.len(), "Quiz configuration saved");

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{FileStore, MemoryStore};

    fn memory() -> (Arc<MemoryStore>, ConfigurationStore) {
        let kv = Arc::new(MemoryStore::new());
        let store = ConfigurationStore::new(kv.clone());
        (kv, store)
    }

    #[test]
    fn test_empty_store_loads_defaults() {
        let (_, store) = memory();
        let config = store.load();
        assert_eq!(config, QuizConfiguration::default());
        assert_eq!(config.questions.len(), 3);
        assert_eq!(config.unlock_pin, "142");
    }

    #[test]
    fn test_save_then_load() {
        let (_, store) = memory();
        let config = QuizConfiguration::new(
            vec![
                Question::new(3, "Favourite colour?", "", "Pink"),
                Question::new(9, "Cat's name?", "Starts with M", "Mochi"),
            ],
            "0907",
        );

        store.save(&config).unwrap();
        assert_eq!(store.load(), config);
    }

    #[test]
    fn test_saved_values_visible_in_fresh_session() {
        let path = std::env::temp_dir()
            .join(format!("giftbox-quiz-config-{}", std::process::id()))
            .join("store.json");
        let _ = std::fs::remove_file(&path);

        let config = QuizConfiguration::new(vec![Question::new(1, "Q", "H", "A")], "55");
        ConfigurationStore::new(Arc::new(FileStore::open(&path).unwrap()))
            .save(&config)
            .unwrap();

        let fresh = ConfigurationStore::new(Arc::new(FileStore::open(&path).unwrap()));
        assert_eq!(fresh.load(), config);

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_failed_save_keeps_previous_configuration() {
        let dir = std::env::temp_dir()
            .join(format!("giftbox-quiz-config-blocked-{}", std::process::id()));
        let _ = std::fs::remove_file(&dir);
        let _ = std::fs::remove_dir_all(&dir);

        let kv = FileStore::open(dir.join("store.json")).unwrap();
        let store = ConfigurationStore::new(Arc::new(kv));
        let first = QuizConfiguration::new(vec![Question::new(1, "Q", "", "A")], "11");
        store.save(&first).unwrap();

        // Replace the store directory with a plain file so the next write fails
        std::fs::remove_dir_all(&dir).unwrap();
        std::fs::write(&dir, "in the way").unwrap();

        let second = QuizConfiguration::new(vec![Question::new(2, "R", "", "B")], "22");
        let result = store.save(&second);
        assert!(matches!(result, Err(GiftboxError::Storage(_))));
        assert_eq!(store.load(), first);

        let _ = std::fs::remove_file(&dir);
    }

    #[test]
    fn test_each_entry_falls_back_independently() {
        let (kv, store) = memory();
        kv.set(storage_keys::QUIZ_PIN, "999").unwrap();
        let config = store.load();
        assert_eq!(config.questions, default_questions());
        assert_eq!(config.unlock_pin, "999");

        kv.set(storage_keys::QUIZ_QUESTIONS, r#"[{"id":5,"question":"Q","answer":"A"}]"#)
            .unwrap();
        kv.set(storage_keys::QUIZ_PIN, "").unwrap();
        let config = store.load();
        assert_eq!(config.questions, vec![Question::new(5, "Q", "", "A")]);
        assert_eq!(config.unlock_pin, "142");
    }

    #[test]
    fn test_unusable_questions_fall_back() {
        let (kv, store) = memory();

        for raw in [
            "{not json",
            "[]",
            r#"[{"id":1,"question":"a","answer":"a"},{"id":1,"question":"b","answer":"b"}]"#,
        ] {
            kv.set(storage_keys::QUIZ_QUESTIONS, raw).unwrap();
            assert_eq!(store.load().questions, default_questions(), "input: {raw}");
        }
    }

    #[test]
    fn test_save_rejects_invalid_configuration() {
        let (kv, store) = memory();
        let result = store.save(&QuizConfiguration::new(Vec::new(), "1"));
        assert!(matches!(result, Err(GiftboxError::InvalidInput(_))));
        assert_eq!(kv.get(storage_keys::QUIZ_QUESTIONS).unwrap(), None);
    }
}
