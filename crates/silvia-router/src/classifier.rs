// SPDX-FileCopyrightText: 2026 SilvIA Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Fixed-phrase intent classification.
//!
//! Rules are checked in priority order and the first match wins:
//! name query, history command, lost-child keyword, then greeting/fallback.

/// The closed set of message intents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Intent {
    /// A voice note; handled by the voice pipeline, never by text rules.
    VoiceMessage,
    /// The user asks for the assistant's name.
    NameQuery,
    /// The user asks for the conversation history (`/historial`).
    HistoryQuery,
    /// The message is exactly the keyword `loan` (optionally with a period).
    AlertKeywordExact,
    /// The message mentions a lost-child keyword inside other text.
    AlertKeywordContextual,
    /// Nothing specific matched.
    GreetingOrFallback,
}

impl std::fmt::Display for Intent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Intent::VoiceMessage => write!(f, "voice_message"),
            Intent::NameQuery => write!(f, "name_query"),
            Intent::HistoryQuery => write!(f, "history_query"),
            Intent::AlertKeywordExact => write!(f, "alert_keyword_exact"),
            Intent::AlertKeywordContextual => write!(f, "alert_keyword_contextual"),
            Intent::GreetingOrFallback => write!(f, "greeting_or_fallback"),
        }
    }
}

/// How a lost-child keyword matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertKind {
    /// The whole message is the bare keyword.
    Exact,
    /// A keyword appears within a longer message.
    Contextual,
}

/// Phrases asking for the assistant's name (exact match after normalization).
const NAME_QUERIES: &[&str] = &[
    "¿cuál es tu nombre?",
    "cuál es tu nombre?",
    "como te llamas?",
    "cómo te llamas?",
    "¿como te llamas?",
    "nombre?",
    "dime tu nombre",
];

/// Command that replays the conversation (substring match).
const HISTORY_COMMAND: &str = "/historial";

/// Lost-child keywords (substring match).
const ALERT_KEYWORDS: &[&str] = &[
    "loan",
    "niño perdido",
    "chico perdido",
    "encontrado niño",
    "vi a loan",
    "se donde esta loan",
    "encontre al niño",
    "vi al nene",
    "el nene esta",
];

/// Messages that are only the keyword itself.
const ALERT_EXACT: &[&str] = &["loan", "loan."];

/// Greetings answered with the welcome reply in single dispatch mode.
const GREETINGS: &[&str] = &["hola", "hi", "hello", "qué tal", "buenas", "hey"];

/// Trim surrounding whitespace and lower-case.
pub fn normalize(text: &str) -> String {
    text.trim().to_lowercase()
}

/// Classify message text. Total and deterministic.
pub fn classify(text: &str) -> Intent {
    let normalized = normalize(text);

    if NAME_QUERIES.contains(&normalized.as_str()) {
        return Intent::NameQuery;
    }
    if normalized.contains(HISTORY_COMMAND) {
        return Intent::HistoryQuery;
    }
    match alert_kind_normalized(&normalized) {
        Some(AlertKind::Exact) => Intent::AlertKeywordExact,
        Some(AlertKind::Contextual) => Intent::AlertKeywordContextual,
        None => Intent::GreetingOrFallback,
    }
}

pub fn is_name_query(text: &str) -> bool {
    NAME_QUERIES.contains(&normalize(text).as_str())
}

pub fn is_history_query(text: &str) -> bool {
    normalize(text).contains(HISTORY_COMMAND)
}

/// Which kind of lost-child keyword match the text carries, if any.
pub fn alert_kind(text: &str) -> Option<AlertKind> {
    alert_kind_normalized(&normalize(text))
}

/// Whether the text is exactly one of the known greetings.
pub fn is_greeting(text: &str) -> bool {
    GREETINGS.contains(&normalize(text).as_str())
}

fn alert_kind_normalized(normalized: &str) -> Option<AlertKind> {
    if !ALERT_KEYWORDS.iter().any(|k| normalized.contains(k)) {
        return None;
    }
    if ALERT_EXACT.contains(&normalized) {
        Some(AlertKind::Exact)
    } else {
        Some(AlertKind::Contextual)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn name_queries_match_after_normalization() {
        assert_eq!(classify("  Cómo te llamas?  "), Intent::NameQuery);
        assert_eq!(classify("¿CUÁL ES TU NOMBRE?"), Intent::NameQuery);
        assert_eq!(classify("dime tu nombre"), Intent::NameQuery);
    }

    #[test]
    fn name_query_requires_exact_phrase() {
        assert_ne!(classify("cómo te llamas? por favor"), Intent::NameQuery);
        assert!(!is_name_query("mi nombre es Ana"));
    }

    #[test]
    fn history_command_matches_anywhere() {
        assert_eq!(classify("/historial"), Intent::HistoryQuery);
        assert_eq!(classify("muéstrame /HISTORIAL ahora"), Intent::HistoryQuery);
    }

    #[test]
    fn bare_keyword_is_exact_alert() {
        assert_eq!(classify("Loan"), Intent::AlertKeywordExact);
        assert_eq!(classify("loan."), Intent::AlertKeywordExact);
        assert_eq!(alert_kind(" LOAN "), Some(AlertKind::Exact));
    }

    #[test]
    fn keyword_in_sentence_is_contextual_alert() {
        assert_eq!(
            classify("Hemos encontrado a Loan cerca del parque"),
            Intent::AlertKeywordContextual
        );
        assert_eq!(classify("creo que vi al nene en la plaza"), Intent::AlertKeywordContextual);
        assert_eq!(classify("Niño perdido en la estación"), Intent::AlertKeywordContextual);
    }

    #[test]
    fn history_command_wins_over_keywords() {
        assert_eq!(classify("/historial loan"), Intent::HistoryQuery);
    }

    #[test]
    fn everything_else_is_fallback() {
        assert_eq!(classify("hola"), Intent::GreetingOrFallback);
        assert_eq!(classify("¿qué hora es?"), Intent::GreetingOrFallback);
        assert_eq!(classify(""), Intent::GreetingOrFallback);
    }

    #[test]
    fn greetings_are_exact() {
        assert!(is_greeting("Hola"));
        assert!(is_greeting("  qué tal "));
        assert!(!is_greeting("hola, ¿cómo estás?"));
    }

    #[test]
    fn intent_display() {
        assert_eq!(Intent::NameQuery.to_string(), "name_query");
        assert_eq!(Intent::AlertKeywordContextual.to_string(), "alert_keyword_contextual");
    }

    proptest! {
        #[test]
        fn classify_is_deterministic(text in "\\PC*") {
            prop_assert_eq!(classify(&text), classify(&text));
        }

        #[test]
        fn surrounding_whitespace_is_ignored(text in "[a-zñáéíóú?¿/ ]{0,24}", pad in "[ \t]{0,4}") {
            let padded = format!("{pad}{text}{pad}");
            prop_assert_eq!(classify(&padded), classify(&text));
        }

        #[test]
        fn never_classifies_text_as_voice(text in "\\PC*") {
            prop_assert_ne!(classify(&text), Intent::VoiceMessage);
        }
    }
}
