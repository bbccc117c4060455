// src/common/i18n.rs

use std::collections::HashMap;

pub const DEFAULT_LANG: &str = "pt";

// Mensagens de erro exibidas ao usuário, por idioma e chave.
#[derive(Debug, Clone)]
pub struct I18nStore {
    messages: HashMap<&'static str, HashMap<&'static str, &'static str>>,
}

impl I18nStore {
    pub fn new() -> Self {
        let pt = HashMap::from([
            (
                "data_source",
                "Não foi possível ler a planilha de dados. Verifique o arquivo e a aba configurados.",
            ),
            (
                "data_format",
                "Valor inválido na coluna '{column}' (linha {row}): '{value}'.",
            ),
            ("missing_column", "Coluna obrigatória ausente na planilha: {column}."),
            ("internal", "Ocorreu um erro inesperado."),
        ]);
        let en = HashMap::from([
            (
                "data_source",
                "The data spreadsheet could not be read. Check the configured file and sheet.",
            ),
            (
                "data_format",
                "Invalid value in column '{column}' (row {row}): '{value}'.",
            ),
            ("missing_column", "Required column missing from the spreadsheet: {column}."),
            ("internal", "An unexpected error occurred."),
        ]);

        Self {
            messages: HashMap::from([("pt", pt), ("en", en)]),
        }
    }

    /// Busca a mensagem no idioma pedido (cai para o português) e troca os `{param}`.
    pub fn translate(&self, lang: &str, key: &str, params: &[(&str, &str)]) -> String {
        let template = self
            .messages
            .get(lang)
            .and_then(|m| m.get(key))
            .or_else(|| self.messages.get(DEFAULT_LANG).and_then(|m| m.get(key)))
            .copied()
            .unwrap_or(key);

        params
            .iter()
            .fold(template.to_string(), |msg, (name, value)| {
                msg.replace(&format!("{{{}}}", name), value)
            })
    }
}

impl Default for I18nStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_language_falls_back_to_portuguese() {
        let store = I18nStore::new();
        assert_eq!(
            store.translate("de", "internal", &[]),
            "Ocorreu um erro inesperado."
        );
    }

    #[test]
    fn params_are_interpolated() {
        let store = I18nStore::new();
        let msg = store.translate("en", "missing_column", &[("column", "Tecido")]);
        assert_eq!(msg, "Required column missing from the spreadsheet: Tecido.");
    }

    #[test]
    fn unknown_key_returns_key() {
        let store = I18nStore::new();
        assert_eq!(store.translate("pt", "nope", &[]), "nope");
    }
}
