//! Tokenizer session initialization
//!
//! A session is opened by trying an ordered list of configurations; the first
//! one that loads and analyzes a check sentence wins.

use super::japanese::{DictionaryChoice, LinderaTokenizer};
use super::Tokenizer;
use thiserror::Error;

/// Sentence tokenized to verify a freshly loaded analyzer
pub const CHECK_SENTENCE: &str = "テスト文章です";

/// Failure of one initialization attempt
#[derive(Debug, Error)]
pub enum InitError {
    /// The system dictionary could not be loaded
    #[error("Dictionary unavailable: {0}")]
    Dictionary(String),

    /// The user dictionary is missing or does not fit the system dictionary
    #[error("User dictionary unusable: {0}")]
    UserDictionary(String),

    /// The analyzer loaded but failed on the check sentence
    #[error("Check tokenization failed: {0}")]
    Verification(String),

    /// Every attempt failed
    #[error("All {0} tokenizer initialization attempts failed")]
    Exhausted(usize),
}

/// One named configuration to try
pub struct InitAttempt<T> {
    label: String,
    init: Box<dyn FnOnce() -> Result<T, InitError>>,
}

impl<T> InitAttempt<T> {
    pub fn new(label: impl Into<String>, init: impl FnOnce() -> Result<T, InitError> + 'static) -> Self {
        Self {
            label: label.into(),
            init: Box::new(init),
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }
}

/// Run attempts in order and return the first success
pub fn initialize_first<T>(attempts: Vec<InitAttempt<T>>) -> Result<T, InitError> {
    let total = attempts.len();
    for attempt in attempts {
        let InitAttempt { label, init } = attempt;
        match init() {
            Ok(value) => {
                tracing::debug!("Tokenizer initialized with '{}'", label);
                return Ok(value);
            }
            Err(InitError::UserDictionary(reason)) => {
                tracing::warn!(
                    "User dictionary is incompatible with the system dictionary, continuing without it ({})",
                    reason
                );
            }
            Err(e) => {
                tracing::warn!("Tokenizer initialization '{}' failed: {}", label, e);
            }
        }
    }
    tracing::error!("Failed to initialize morphological analyzer");
    Err(InitError::Exhausted(total))
}

/// Dictionaries requested for a session
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionOptions {
    /// Dictionary family; selects the feature layout
    pub dictionary: DictionaryChoice,
    /// Lindera dictionary URI or directory replacing the embedded one
    pub dictionary_path: Option<String>,
    /// User dictionary (CSV or compiled `.bin`)
    pub user_dictionary_path: Option<String>,
}

impl SessionOptions {
    pub fn new(dictionary: DictionaryChoice) -> Self {
        Self {
            dictionary,
            ..Self::default()
        }
    }
}

/// One concrete dictionary combination
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionPlan {
    pub dictionary: DictionaryChoice,
    pub system_uri: Option<String>,
    pub user_uri: Option<String>,
}

impl SessionPlan {
    pub fn label(&self) -> String {
        let system = match &self.system_uri {
            Some(uri) => uri.clone(),
            None => self.dictionary.label().to_string(),
        };
        match &self.user_uri {
            Some(user) => format!("{} + user dictionary {}", system, user),
            None => system,
        }
    }

    /// Load the dictionaries and check the analyzer on a known sentence
    pub fn open(&self) -> Result<LinderaTokenizer, InitError> {
        let tokenizer = LinderaTokenizer::open(
            self.dictionary,
            self.system_uri.as_deref(),
            self.user_uri.as_deref(),
        )?;
        tokenizer
            .parse(CHECK_SENTENCE)
            .map_err(|e| InitError::Verification(e.to_string()))?;
        Ok(tokenizer)
    }
}

/// Combinations to try, most specific first
///
/// System plus user dictionary, then the system dictionary alone, then the
/// embedded IPADIC when it differs from both.
pub fn session_plans(options: &SessionOptions) -> Vec<SessionPlan> {
    let system = SessionPlan {
        dictionary: options.dictionary,
        system_uri: options.dictionary_path.clone(),
        user_uri: None,
    };

    let mut plans = Vec::with_capacity(3);
    if let Some(user) = &options.user_dictionary_path {
        plans.push(SessionPlan {
            user_uri: Some(user.clone()),
            ..system.clone()
        });
    }

    let fallback = SessionPlan {
        dictionary: DictionaryChoice::Ipadic,
        system_uri: None,
        user_uri: None,
    };
    let needs_fallback = system != fallback;
    plans.push(system);
    if needs_fallback {
        plans.push(fallback);
    }
    plans
}

/// Open a Lindera session for the configured dictionaries
///
/// A user dictionary that fails to load is dropped with a warning. The
/// embedded IPADIC dictionary is the last resort.
pub fn open_session(options: &SessionOptions) -> Result<LinderaTokenizer, InitError> {
    let attempts = session_plans(options)
        .into_iter()
        .map(|plan| InitAttempt::new(plan.label(), move || plan.open()))
        .collect();
    initialize_first(attempts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    #[test]
    fn test_first_success_wins() {
        let calls = Rc::new(Cell::new(0));
        let counter = calls.clone();
        let attempts = vec![
            InitAttempt::new("broken", || Err(InitError::Dictionary("missing".into()))),
            InitAttempt::new("working", || Ok(2)),
            InitAttempt::new("unused", move || {
                counter.set(counter.get() + 1);
                Ok(3)
            }),
        ];

        assert_eq!(initialize_first(attempts).unwrap(), 2);
        assert_eq!(calls.get(), 0);
    }

    #[test]
    fn test_all_failures_exhaust() {
        let attempts: Vec<InitAttempt<u8>> = vec![
            InitAttempt::new("a", || Err(InitError::Dictionary("a".into()))),
            InitAttempt::new("b", || Err(InitError::Verification("b".into()))),
        ];

        let err = initialize_first(attempts).unwrap_err();
        assert!(matches!(err, InitError::Exhausted(2)));
    }

    #[test]
    fn test_attempt_label() {
        let attempt: InitAttempt<()> = InitAttempt::new("ipadic", || Ok(()));
        assert_eq!(attempt.label(), "ipadic");
    }

    #[test]
    fn test_open_default_session() {
        let session = open_session(&SessionOptions::default()).unwrap();
        assert_eq!(session.dictionary(), DictionaryChoice::Ipadic);
    }

    #[test]
    fn test_plans_for_default_options() {
        let plans = session_plans(&SessionOptions::default());
        assert_eq!(plans.len(), 1);
        assert_eq!(plans[0].label(), "IPADIC (embedded)");
    }

    #[test]
    fn test_plans_with_user_and_system_dictionary() {
        let options = SessionOptions {
            dictionary: DictionaryChoice::Unidic,
            dictionary_path: Some("/dict/unidic".to_string()),
            user_dictionary_path: Some("/dict/user.csv".to_string()),
        };
        let plans = session_plans(&options);

        let uris: Vec<(Option<&str>, Option<&str>)> = plans
            .iter()
            .map(|p| (p.system_uri.as_deref(), p.user_uri.as_deref()))
            .collect();
        assert_eq!(
            uris,
            vec![
                (Some("/dict/unidic"), Some("/dict/user.csv")),
                (Some("/dict/unidic"), None),
                (None, None),
            ]
        );
        assert_eq!(plans[2].dictionary, DictionaryChoice::Ipadic);
        assert_eq!(plans[0].label(), "/dict/unidic + user dictionary /dict/user.csv");
    }

    #[test]
    fn test_missing_user_dictionary_falls_back_to_system() {
        let mut options = SessionOptions::new(DictionaryChoice::Ipadic);
        options.user_dictionary_path = Some("/nonexistent/openchj/user.csv".to_string());

        let session = open_session(&options).unwrap();
        assert!(!session.has_user_dictionary());
        assert_eq!(session.dictionary(), DictionaryChoice::Ipadic);
    }

    #[test]
    fn test_broken_user_dictionary_falls_back_to_system() {
        let temp = tempfile::TempDir::new().unwrap();
        let path = temp.path().join("user.csv");
        // Neither the 3-column simple layout nor the full IPADIC layout
        std::fs::write(&path, "壊れた,行,データ,余分,列\n").unwrap();

        let mut options = SessionOptions::new(DictionaryChoice::Ipadic);
        options.user_dictionary_path = Some(path.to_string_lossy().into_owned());

        let session = open_session(&options).unwrap();
        assert!(!session.has_user_dictionary());
    }
}
