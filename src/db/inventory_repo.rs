// src/db/inventory_repo.rs

use calamine::{open_workbook_auto, Data, Reader};
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use crate::{
    common::error::AppError,
    models::inventory::{SheetRow, SheetTable},
};

// O repositório da planilha: a "base de dados" do painel é um arquivo local.
#[derive(Clone, Debug)]
pub struct InventoryRepository {
    path: PathBuf,
    sheet: String,
}

impl InventoryRepository {
    pub fn new(path: impl Into<PathBuf>, sheet: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            sheet: sheet.into(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    // Data de modificação do arquivo, usada como chave do cache
    pub fn modified_at(&self) -> Result<SystemTime, AppError> {
        std::fs::metadata(&self.path)
            .and_then(|meta| meta.modified())
            .map_err(|e| AppError::DataSource(format!("{}: {}", self.path.display(), e)))
    }

    /// Lê a aba configurada: a primeira linha vira o cabeçalho.
    /// Leitura bloqueante e sem retry.
    pub fn load_sheet(&self) -> Result<SheetTable, AppError> {
        let mut workbook = open_workbook_auto(&self.path)
            .map_err(|e| AppError::DataSource(format!("{}: {}", self.path.display(), e)))?;

        if !workbook.sheet_names().iter().any(|name| name == &self.sheet) {
            return Err(AppError::DataSource(format!(
                "{}: aba '{}' não encontrada",
                self.path.display(),
                self.sheet
            )));
        }

        let range = workbook
            .worksheet_range(&self.sheet)
            .map_err(|e| AppError::DataSource(format!("{}#{}: {}", self.path.display(), self.sheet, e)))?;

        // O range começa na primeira célula usada, não necessariamente na linha 1
        let header_line = range.start().map_or(0, |(row, _)| row as usize) + 1;

        let mut rows = range.rows();
        let headers = match rows.next() {
            Some(header_row) => header_row.iter().map(cell_to_label).collect(),
            None => Vec::new(),
        };

        // Numera antes de descartar as linhas vazias
        let rows: Vec<SheetRow> = rows
            .enumerate()
            .filter(|(_, r)| r.iter().any(|cell| !is_blank(cell)))
            .map(|(i, r)| SheetRow {
                line: header_line + 1 + i,
                cells: r.to_vec(),
            })
            .collect();

        tracing::info!(
            "📄 Planilha '{}' (aba '{}') lida: {} linhas",
            self.path.display(),
            self.sheet,
            rows.len()
        );

        Ok(SheetTable { headers, rows })
    }
}

pub fn is_blank(cell: &Data) -> bool {
    match cell {
        Data::Empty => true,
        Data::String(s) => s.trim().is_empty(),
        _ => false,
    }
}

fn cell_to_label(cell: &Data) -> String {
    match cell {
        Data::String(v) => v.to_string(),
        Data::Float(v) => v.to_string(),
        Data::Int(v) => v.to_string(),
        Data::Bool(v) => v.to_string(),
        Data::DateTime(v) => v.to_string(),
        Data::DateTimeIso(v) => v.to_string(),
        Data::DurationIso(v) => v.to_string(),
        Data::Error(v) => format!("{v:?}"),
        Data::Empty => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixture(name: &str) -> PathBuf {
        Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures").join(name)
    }

    #[test]
    fn reads_headers_and_skips_blank_rows() {
        let table = InventoryRepository::new(fixture("DadosLoja.xlsx"), "Planilha1")
            .load_sheet()
            .unwrap();

        assert_eq!(
            table.headers,
            vec!["Tecido", "Cor", "Total_unidades", "Unidades_kg", "Preço_unitario", "Faturamento_total"]
        );
        // A linha 3 está vazia na planilha
        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.rows[0].line, 2);
        assert_eq!(table.rows[0].cells[0], Data::String("Algodão".into()));
        assert_eq!(table.rows[0].cells[5], Data::String("R$ 1.234,56".into()));
        assert_eq!(table.rows[1].line, 4);
        assert_eq!(table.rows[1].cells[1], Data::String("Verde".into()));
        assert!(is_blank(&table.rows[1].cells[4]));
    }

    #[test]
    fn line_numbers_follow_the_sheet_when_header_is_not_on_row_one() {
        let table = InventoryRepository::new(fixture("DadosLoja_deslocada.xlsx"), "Planilha1")
            .load_sheet()
            .unwrap();

        assert_eq!(table.headers[0], "Tecido");
        let lines: Vec<usize> = table.rows.iter().map(|r| r.line).collect();
        assert_eq!(lines, vec![4, 6]);
    }

    #[test]
    fn missing_sheet_is_a_data_source_error() {
        let repo = InventoryRepository::new(fixture("DadosLoja.xlsx"), "Planilha2");
        match repo.load_sheet() {
            Err(AppError::DataSource(detail)) => assert!(detail.contains("Planilha2")),
            other => panic!("esperava DataSource, veio {:?}", other),
        }
    }

    #[test]
    fn missing_file_is_a_data_source_error() {
        let repo = InventoryRepository::new("/nao/existe/DadosLoja.xlsx", "Planilha1");
        assert!(matches!(repo.load_sheet(), Err(AppError::DataSource(_))));
        assert!(matches!(repo.modified_at(), Err(AppError::DataSource(_))));
    }

    #[test]
    fn unreadable_workbook_is_a_data_source_error() {
        let path = std::env::temp_dir().join("seromo_dashboard_not_a_workbook.xlsx");
        std::fs::write(&path, b"isto nao e um xlsx").unwrap();

        let repo = InventoryRepository::new(&path, "Planilha1");
        let result = repo.load_sheet();
        std::fs::remove_file(&path).ok();

        assert!(matches!(result, Err(AppError::DataSource(_))));
    }

    #[test]
    fn blank_cells() {
        assert!(is_blank(&Data::Empty));
        assert!(is_blank(&Data::String("   ".into())));
        assert!(!is_blank(&Data::Float(0.0)));
        assert!(!is_blank(&Data::String("Azul".into())));
    }
}
