// src/common/error.rs

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::common::i18n::I18nStore;
use crate::middleware::i18n::Locale;

// Erros do pipeline da planilha (carga -> normalização -> render).
#[derive(Debug, Error)]
pub enum AppError {
    // Arquivo ausente, ilegível ou aba inexistente
    #[error("Fonte de dados indisponível: {0}")]
    DataSource(String),

    // Valor que não pôde ser convertido (ex: faturamento "R$ abc")
    #[error("Valor inválido na coluna '{column}' (linha {row}): '{value}'")]
    DataFormat {
        column: String,
        row: usize,
        value: String,
    },

    #[error("Coluna obrigatória ausente: {0}")]
    MissingColumn(String),

    // `anyhow::Error` captura o contexto de falhas inesperadas (ex: task abortada)
    #[error("Erro interno do servidor")]
    InternalServerError(#[from] anyhow::Error),
}

impl AppError {
    pub fn data_format(column: &str, row: usize, value: impl Into<String>) -> Self {
        AppError::DataFormat {
            column: column.to_string(),
            row,
            value: value.into(),
        }
    }

    fn status_code(&self) -> StatusCode {
        match self {
            AppError::DataSource(_) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::DataFormat { .. } | AppError::MissingColumn(_) => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            AppError::InternalServerError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Converte o erro interno na resposta traduzida para o idioma do cliente.
    pub fn to_api_error(&self, locale: &Locale, store: &I18nStore) -> ApiError {
        let message = match self {
            AppError::DataSource(detail) => {
                tracing::error!("Falha ao ler a planilha: {}", detail);
                store.translate(&locale.0, "data_source", &[])
            }
            AppError::DataFormat { column, row, value } => {
                tracing::warn!("Valor inválido na planilha: {}", self);
                store.translate(
                    &locale.0,
                    "data_format",
                    &[
                        ("column", column.as_str()),
                        ("row", row.to_string().as_str()),
                        ("value", value.as_str()),
                    ],
                )
            }
            AppError::MissingColumn(column) => {
                tracing::warn!("Coluna ausente na planilha: {}", column);
                store.translate(&locale.0, "missing_column", &[("column", column.as_str())])
            }
            AppError::InternalServerError(e) => {
                tracing::error!("Erro Interno do Servidor: {:?}", e);
                store.translate(&locale.0, "internal", &[])
            }
        };

        ApiError {
            status: self.status_code(),
            message,
        }
    }
}

// O erro que efetivamente sai pela API, já traduzido.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(json!({ "error": self.message }));
        (self.status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn data_format_carries_location() {
        let err = AppError::data_format("Faturamento_total", 4, "R$ abc");
        assert_eq!(
            err.to_string(),
            "Valor inválido na coluna 'Faturamento_total' (linha 4): 'R$ abc'"
        );
        assert_eq!(err.status_code(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[test]
    fn api_error_is_localized() {
        let store = I18nStore::new();
        let err = AppError::MissingColumn("Cor".into());

        let pt = err.to_api_error(&Locale("pt".into()), &store);
        let en = err.to_api_error(&Locale("en".into()), &store);

        assert_eq!(pt.status, StatusCode::UNPROCESSABLE_ENTITY);
        assert!(pt.message.contains("Cor"));
        assert!(en.message.starts_with("Required column"));
    }

    #[test]
    fn data_source_maps_to_service_unavailable() {
        let store = I18nStore::new();
        let api = AppError::DataSource("DadosLoja.xlsx: not found".into())
            .to_api_error(&Locale("pt".into()), &store);
        assert_eq!(api.status, StatusCode::SERVICE_UNAVAILABLE);
    }
}
