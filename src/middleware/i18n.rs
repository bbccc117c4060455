// src/middleware/i18n.rs

use axum::extract::FromRequestParts;
use axum::http::{header, request::Parts};

use crate::common::i18n::DEFAULT_LANG;

const SUPPORTED_LANGS: [&str; 2] = ["pt", "en"];

// Idioma das mensagens de erro, vindo do Accept-Language
#[derive(Debug, Clone, PartialEq)]
pub struct Locale(pub String);

impl<S> FromRequestParts<S> for Locale
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let lang = parts
            .headers
            .get(header::ACCEPT_LANGUAGE)
            .and_then(|header_value| header_value.to_str().ok())
            .and_then(|header_str| {
                // "pt-BR,en;q=0.8" -> primeiro idioma suportado, só o prefixo ("pt")
                accept_language::parse(header_str)
                    .into_iter()
                    .map(|tag| tag.split('-').next().unwrap_or(&tag).to_lowercase())
                    .find(|lang| SUPPORTED_LANGS.contains(&lang.as_str()))
            })
            .unwrap_or_else(|| DEFAULT_LANG.to_string());

        Ok(Locale(lang))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    async fn locale_for(header: Option<&str>) -> Locale {
        let mut builder = Request::builder().uri("/");
        if let Some(value) = header {
            builder = builder.header(header::ACCEPT_LANGUAGE, value);
        }
        let (mut parts, _) = builder.body(()).unwrap().into_parts();
        Locale::from_request_parts(&mut parts, &()).await.unwrap()
    }

    #[tokio::test]
    async fn defaults_to_portuguese() {
        assert_eq!(locale_for(None).await, Locale("pt".into()));
        assert_eq!(locale_for(Some("de-DE")).await, Locale("pt".into()));
    }

    #[tokio::test]
    async fn picks_first_supported_language() {
        assert_eq!(locale_for(Some("en-US,pt;q=0.5")).await, Locale("en".into()));
        assert_eq!(locale_for(Some("fr, pt-BR;q=0.9")).await, Locale("pt".into()));
    }
}
