// src/services/inventory_service.rs

use calamine::Data;
use rust_decimal::Decimal;
use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::SystemTime;

use crate::{
    common::{
        currency::{parse_brl, parse_locale_number},
        error::AppError,
    },
    db::{inventory_repo::is_blank, InventoryRepository},
    models::inventory::{
        FilterSelection, Inventory, InventoryRecord, ResolvedFilters, SheetTable,
        COL_COR, COL_FATURAMENTO, COL_PRECO_UNITARIO, COL_TECIDO, COL_TOTAL_UNIDADES,
        COL_UNIDADES_KG, TECIDO_DESCONHECIDO,
    },
};

static EMPTY_CELL: Data = Data::Empty;

// Cache da tabela normalizada, chaveado por caminho + data de modificação
#[derive(Debug)]
struct CachedInventory {
    path: PathBuf,
    modified: SystemTime,
    inventory: Arc<Inventory>,
}

#[derive(Clone)]
pub struct InventoryService {
    inventory_repo: InventoryRepository,
    cache: Arc<Mutex<Option<CachedInventory>>>,
}

impl InventoryService {
    pub fn new(inventory_repo: InventoryRepository) -> Self {
        Self {
            inventory_repo,
            cache: Arc::new(Mutex::new(None)),
        }
    }

    // --- CARGA (com cache) ---
    // Bloqueante: os handlers chamam via spawn_blocking.
    pub fn load_inventory(&self) -> Result<Arc<Inventory>, AppError> {
        let modified = self.inventory_repo.modified_at()?;
        let path = self.inventory_repo.path().to_path_buf();

        // Um pânico durante uma carga anterior não invalida o cache: o valor
        // só é gravado depois de uma carga completa.
        let mut cache = self.cache.lock().unwrap_or_else(PoisonError::into_inner);

        if let Some(cached) = cache.as_ref() {
            if cached.path == path && cached.modified == modified {
                tracing::debug!("Cache da planilha reaproveitado: {}", path.display());
                return Ok(Arc::clone(&cached.inventory));
            }
        }

        let table = self.inventory_repo.load_sheet()?;
        let inventory = Arc::new(normalize(table)?);

        *cache = Some(CachedInventory {
            path,
            modified,
            inventory: Arc::clone(&inventory),
        });

        Ok(inventory)
    }
}

// ---
// Normalizador
// ---

/// Rótulo de coluna: remove espaços das pontas e capitaliza
/// (primeira letra maiúscula, resto minúsculo). Idempotente.
pub fn normalize_label(label: &str) -> String {
    let trimmed = label.trim();
    let mut chars = trimmed.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

/// Limpa os rótulos, preenche tecidos vazios e converte o faturamento.
/// Um único valor inválido aborta a conversão inteira.
pub fn normalize(mut table: SheetTable) -> Result<Inventory, AppError> {
    table.headers = table.headers.iter().map(|h| normalize_label(h)).collect();

    let required = |name: &str| {
        table
            .column_index(name)
            .ok_or_else(|| AppError::MissingColumn(name.to_string()))
    };
    let idx_tecido = required(COL_TECIDO)?;
    let idx_cor = required(COL_COR)?;
    let idx_total = required(COL_TOTAL_UNIDADES)?;
    let idx_vendido = required(COL_UNIDADES_KG)?;
    let idx_faturamento = required(COL_FATURAMENTO)?;
    let idx_preco = table.column_index(COL_PRECO_UNITARIO);

    let mut records = Vec::with_capacity(table.rows.len());
    for row in &table.rows {
        let line = row.line;
        let cell = |idx: usize| row.cells.get(idx).unwrap_or(&EMPTY_CELL);

        let fabric_type =
            text_value(cell(idx_tecido)).unwrap_or_else(|| TECIDO_DESCONHECIDO.to_string());
        let color = text_value(cell(idx_cor))
            .ok_or_else(|| AppError::data_format(COL_COR, line, ""))?;

        let total_units = quantity_value(cell(idx_total), COL_TOTAL_UNIDADES, line)?;
        let units_sold = quantity_value(cell(idx_vendido), COL_UNIDADES_KG, line)?;
        let total_revenue = revenue_value(cell(idx_faturamento), line)?;
        let unit_price = match idx_preco.map(cell) {
            Some(c) if !is_blank(c) => Some(quantity_value(c, COL_PRECO_UNITARIO, line)?),
            _ => None,
        };

        records.push(InventoryRecord {
            fabric_type,
            color,
            total_units,
            units_sold,
            unit_price,
            total_revenue,
        });
    }

    tracing::info!("Planilha normalizada: {} registros", records.len());
    Ok(Inventory::new(records))
}

// Texto de uma célula categórica; vazio vira None
fn text_value(cell: &Data) -> Option<String> {
    match cell {
        Data::String(s) if !s.trim().is_empty() => Some(s.clone()),
        Data::Float(v) => Some(v.to_string()),
        Data::Int(v) => Some(v.to_string()),
        Data::Bool(v) => Some(v.to_string()),
        _ => None,
    }
}

fn number_cell(cell: &Data) -> Option<Option<Decimal>> {
    match cell {
        Data::Float(v) => Some(Decimal::try_from(*v).ok()),
        Data::Int(v) => Some(Some(Decimal::from(*v))),
        _ => None,
    }
}

fn quantity_value(cell: &Data, column: &str, line: usize) -> Result<Decimal, AppError> {
    let parsed = match number_cell(cell) {
        Some(n) => n,
        None => match cell {
            Data::String(s) => parse_locale_number(s),
            _ => None,
        },
    };
    parsed.ok_or_else(|| AppError::data_format(column, line, display_cell(cell)))
}

fn revenue_value(cell: &Data, line: usize) -> Result<Decimal, AppError> {
    let parsed = match number_cell(cell) {
        Some(n) => n,
        None => match cell {
            Data::String(s) => parse_brl(s),
            _ => None,
        },
    };
    parsed.ok_or_else(|| AppError::data_format(COL_FATURAMENTO, line, display_cell(cell)))
}

fn display_cell(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        other => format!("{other:?}"),
    }
}

// ---
// Seletor de filtros
// ---

/// Resolve a seleção pedida contra as opções da tabela completa.
/// Lista explícita sempre vence; sem lista, vale "todos", a menos que a
/// caixa "Selecionar Todos" exista e tenha sido desmarcada.
pub fn resolve_filters(
    inventory: &Inventory,
    selection: &FilterSelection,
    select_all_toggle: bool,
) -> ResolvedFilters {
    let pick = |explicit: &Option<Vec<String>>, select_all: Option<bool>, options: &[String]| {
        match explicit {
            Some(values) => values.clone(),
            None if select_all_toggle && select_all == Some(false) => Vec::new(),
            None => options.to_vec(),
        }
    };

    ResolvedFilters {
        tecidos: pick(&selection.tecidos, selection.select_all_tecidos, &inventory.fabric_types),
        cores: pick(&selection.cores, selection.select_all_cores, &inventory.colors),
    }
}

/// Linhas cujo tecido está em `tecidos` e a cor em `cores`, na ordem original.
pub fn apply_filters<'a>(
    records: &'a [InventoryRecord],
    filters: &ResolvedFilters,
) -> Vec<&'a InventoryRecord> {
    let tecidos: HashSet<&str> = filters.tecidos.iter().map(String::as_str).collect();
    let cores: HashSet<&str> = filters.cores.iter().map(String::as_str).collect();

    records
        .iter()
        .filter(|r| tecidos.contains(r.fabric_type.as_str()) && cores.contains(r.color.as_str()))
        .collect()
}
