// SPDX-FileCopyrightText: 2026 SilvIA Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Canned replies in every supported locale.

use std::fmt;

use silvia_core::types::{ReplyChoice, Turn};

/// Locales the bot can answer in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Locale {
    #[default]
    Es,
    En,
}

impl Locale {
    /// Parses a stored or selected locale code (`es`, `en`), case-insensitively.
    pub fn parse(code: &str) -> Option<Self> {
        match code.trim().to_lowercase().as_str() {
            "es" => Some(Self::Es),
            "en" => Some(Self::En),
            _ => None,
        }
    }

    pub fn code(self) -> &'static str {
        match self {
            Self::Es => "es",
            Self::En => "en",
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

pub fn welcome(locale: Locale, assistant_name: &str) -> String {
    match locale {
        Locale::Es => {
            format!("¡Hola! Soy {assistant_name}, un asistente avanzado. ¿En qué puedo ayudarte?")
        }
        Locale::En => {
            format!("Hi! I'm {assistant_name}, an advanced assistant. How can I help you?")
        }
    }
}

pub fn loan_info(locale: Locale) -> &'static str {
    match locale {
        Locale::Es => "¿En qué puedo ayudarte con el tema de los préstamos?",
        Locale::En => "How can I help you with loans?",
    }
}

/// Text forwarded to the administrative chat, always in Spanish.
pub fn alert(text: &str) -> String {
    format!("🚨 ¡Posible avistamiento del niño perdido! 🚨\n\nMensaje: {text}")
}

/// Acknowledgement sent to the reporter in single dispatch mode.
pub fn alert_ack(locale: Locale) -> &'static str {
    match locale {
        Locale::Es => "Gracias, tu mensaje fue enviado a los responsables.",
        Locale::En => "Thank you, your message was forwarded to the people in charge.",
    }
}

/// Replays prior turns under a header, or says there is nothing to replay.
pub fn history(locale: Locale, turns: &[Turn]) -> String {
    if turns.is_empty() {
        return match locale {
            Locale::Es => "No hay historial de conversación disponible.".to_string(),
            Locale::En => "No conversation history available.".to_string(),
        };
    }

    let header = match locale {
        Locale::Es => "Historial de Conversación:",
        Locale::En => "Conversation History:",
    };
    let body = turns
        .iter()
        .map(|t| t.content.as_str())
        .collect::<Vec<_>>()
        .join("\n");
    format!("{header}\n\n{body}")
}

pub fn not_understood(locale: Locale) -> &'static str {
    match locale {
        Locale::Es => "No entiendo tu solicitud. ¿Podrías reformularla?",
        Locale::En => "I don't understand your request. Could you rephrase it?",
    }
}

pub fn generic_error(locale: Locale) -> &'static str {
    match locale {
        Locale::Es => {
            "Ha ocurrido un error al procesar tu mensaje. Por favor, intenta nuevamente más tarde."
        }
        Locale::En => {
            "An error occurred while processing your message. Please try again later."
        }
    }
}

pub fn history_cleared(locale: Locale) -> &'static str {
    match locale {
        Locale::Es => "Listo, he olvidado nuestra conversación anterior.",
        Locale::En => "Done, I have forgotten our previous conversation.",
    }
}

pub fn voice_credentials(locale: Locale) -> &'static str {
    match locale {
        Locale::Es => {
            "No se pudieron cargar las credenciales de Google Cloud. Verifica la configuración."
        }
        Locale::En => "Google Cloud credentials could not be loaded. Check the configuration.",
    }
}

pub fn language_prompt(locale: Locale) -> &'static str {
    match locale {
        Locale::Es => "¡Hola! Por favor, elige tu idioma.",
        Locale::En => "Hi! Please choose your language.",
    }
}

/// Inline keyboard offered with [`language_prompt`].
pub fn language_choices() -> Vec<ReplyChoice> {
    vec![
        ReplyChoice {
            label: "🇬🇧 English".to_string(),
            data: Locale::En.code().to_string(),
        },
        ReplyChoice {
            label: "🇪🇸 Español".to_string(),
            data: Locale::Es.code().to_string(),
        },
    ]
}

/// Confirmation sent in the newly selected locale.
pub fn language_changed(locale: Locale) -> String {
    match locale {
        Locale::Es => format!("Idioma cambiado a {locale}"),
        Locale::En => format!("Language changed to {locale}"),
    }
}
