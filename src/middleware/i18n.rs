// src/middleware/i18n.rs

use axum::extract::FromRequestParts;
use axum::http::{header, request::Parts};

use crate::common::i18n::DEFAULT_LANG;

// Nosso extrator de idioma
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Locale(pub String);

impl Default for Locale {
    fn default() -> Self {
        Locale(DEFAULT_LANG.to_string())
    }
}

impl Locale {
    pub fn from_header(header_str: &str) -> Self {
        accept_language::parse(header_str)
            .first() // Pega o primeiro idioma (ex: "vi-VN")
            .map(|tag_string| {
                // "vi-VN" -> split vira ["vi", "VN"] -> next() pega "vi"
                let lang = tag_string.split('-').next().unwrap_or(tag_string);
                Locale(lang.to_lowercase())
            })
            .unwrap_or_default()
    }
}

impl<S> FromRequestParts<S> for Locale
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &S,
    ) -> Result<Self, Self::Rejection> {
        let locale = parts
            .headers
            .get(header::ACCEPT_LANGUAGE)
            .and_then(|header_value| header_value.to_str().ok())
            .map(Locale::from_header)
            .unwrap_or_default();

        Ok(locale)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn picks_primary_subtag_of_the_preferred_language() {
        assert_eq!(Locale::from_header("vi-VN,vi;q=0.9,en;q=0.8"), Locale("vi".into()));
        assert_eq!(Locale::from_header("pt-BR"), Locale("pt".into()));
    }

    #[test]
    fn empty_header_defaults_to_english() {
        assert_eq!(Locale::from_header(""), Locale::default());
    }
}
