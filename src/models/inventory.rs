// src/models/inventory.rs

use calamine::Data;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

// Nomes das colunas depois da normalização dos rótulos
pub const COL_TECIDO: &str = "Tecido";
pub const COL_COR: &str = "Cor";
pub const COL_TOTAL_UNIDADES: &str = "Total_unidades";
pub const COL_UNIDADES_KG: &str = "Unidades_kg";
pub const COL_PRECO_UNITARIO: &str = "Preço_unitario";
pub const COL_FATURAMENTO: &str = "Faturamento_total";

pub const TECIDO_DESCONHECIDO: &str = "Desconhecido";

// --- 1. Tabela crua, como veio da planilha ---
// Cabeçalho da primeira linha usada + células das linhas seguintes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SheetTable {
    pub headers: Vec<String>,
    pub rows: Vec<SheetRow>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SheetRow {
    // Número da linha na planilha (começa em 1), o mesmo que o Excel mostra
    pub line: usize,
    pub cells: Vec<Data>,
}

impl SheetTable {
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }
}

// --- 2. Registro de Estoque (uma linha por Tecido x Cor, pode repetir) ---
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InventoryRecord {
    #[schema(example = "Algodão")]
    pub fabric_type: String,

    #[schema(example = "Azul")]
    pub color: String,

    #[schema(value_type = f64, example = 100)]
    pub total_units: Decimal,

    // Coluna "Unidades_kg": quantidade movimentada (vendida), sem conversão de unidade
    #[schema(value_type = f64, example = 30)]
    pub units_sold: Decimal,

    // Só aparece no hover dos gráficos, nunca é somado
    #[schema(value_type = Option<f64>, example = 12.5)]
    pub unit_price: Option<Decimal>,

    #[schema(value_type = f64, example = 1234.56)]
    pub total_revenue: Decimal,
}

impl InventoryRecord {
    /// Estoque disponível = total de unidades - quantidade vendida (pode ser negativo).
    pub fn available_stock(&self) -> Decimal {
        self.total_units - self.units_sold
    }
}

// Linha da tabela exibida no painel, já com o estoque calculado
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InventoryRow {
    #[serde(flatten)]
    pub record: InventoryRecord,
    #[schema(value_type = f64)]
    pub available_stock: Decimal,
}

impl From<&InventoryRecord> for InventoryRow {
    fn from(record: &InventoryRecord) -> Self {
        Self {
            available_stock: record.available_stock(),
            record: record.clone(),
        }
    }
}

// --- 3. Tabela completa normalizada ---
// Os valores distintos são calculados sobre a tabela inteira (ordem de aparição),
// então as opções de um filtro nunca dependem do outro.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Inventory {
    pub records: Vec<InventoryRecord>,
    pub fabric_types: Vec<String>,
    pub colors: Vec<String>,
}

impl Inventory {
    pub fn new(records: Vec<InventoryRecord>) -> Self {
        let fabric_types = distinct(records.iter().map(|r| r.fabric_type.as_str()));
        let colors = distinct(records.iter().map(|r| r.color.as_str()));
        Self {
            records,
            fabric_types,
            colors,
        }
    }
}

/// Valores únicos preservando a ordem em que aparecem.
pub fn distinct<'a>(values: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    values
        .filter(|v| seen.insert(*v))
        .map(str::to_string)
        .collect()
}

// --- 4. Filtros ---

/// Seleção enviada pelo painel. `None` numa lista significa "usar o padrão".
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FilterSelection {
    #[schema(example = json!(["Algodão", "Linho"]))]
    pub tecidos: Option<Vec<String>>,

    #[schema(example = json!(["Azul"]))]
    pub cores: Option<Vec<String>>,

    // "Selecionar Todos os Tecidos"; só vale quando o layout habilita a caixa
    pub select_all_tecidos: Option<bool>,

    // "Selecionar Todas as Cores"
    pub select_all_cores: Option<bool>,
}

/// Seleção já resolvida contra as opções disponíveis.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedFilters {
    pub tecidos: Vec<String>,
    pub cores: Vec<String>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FilterOptions {
    pub tecido_options: Vec<String>,
    pub cor_options: Vec<String>,
    // Se o painel mostra as caixas "Selecionar Todos"
    pub select_all_toggle: bool,
}

impl FilterOptions {
    /// Opções vêm sempre da tabela completa, nunca da seleção atual.
    pub fn from_inventory(inventory: &Inventory, select_all_toggle: bool) -> Self {
        Self {
            tecido_options: inventory.fabric_types.clone(),
            cor_options: inventory.colors.clone(),
            select_all_toggle,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(fabric: &str, color: &str, total: i64, sold: i64) -> InventoryRecord {
        InventoryRecord {
            fabric_type: fabric.into(),
            color: color.into(),
            total_units: Decimal::from(total),
            units_sold: Decimal::from(sold),
            unit_price: None,
            total_revenue: Decimal::ZERO,
        }
    }

    #[test]
    fn available_stock_may_be_negative() {
        assert_eq!(record("Algodão", "Azul", 100, 30).available_stock(), Decimal::from(70));
        assert_eq!(record("Algodão", "Azul", 100, 120).available_stock(), Decimal::from(-20));
    }

    #[test]
    fn inventory_collects_distinct_values_in_order() {
        let inv = Inventory::new(vec![
            record("Linho", "Verde", 1, 0),
            record("Algodão", "Azul", 1, 0),
            record("Linho", "Azul", 1, 0),
        ]);
        assert_eq!(inv.fabric_types, vec!["Linho", "Algodão"]);
        assert_eq!(inv.colors, vec!["Verde", "Azul"]);
    }

    #[test]
    fn inventory_row_serializes_flat() {
        let row = InventoryRow::from(&record("Seda", "Preto", 10, 4));
        let json = serde_json::to_value(&row).unwrap();
        assert_eq!(json["fabricType"], "Seda");
        assert_eq!(json["availableStock"], 6.0);
    }

    #[test]
    fn filter_options_come_from_inventory() {
        let inv = Inventory::new(vec![
            record("Seda", "Preto", 1, 0),
            record("Linho", "Preto", 1, 0),
            record("Seda", "Bege", 1, 0),
        ]);

        let options = FilterOptions::from_inventory(&inv, false);
        assert_eq!(options.tecido_options, vec!["Seda", "Linho"]);
        assert_eq!(options.cor_options, vec!["Preto", "Bege"]);
        assert!(!options.select_all_toggle);

        let json = serde_json::to_value(FilterOptions::from_inventory(&inv, true)).unwrap();
        assert_eq!(json["tecidoOptions"][1], "Linho");
        assert_eq!(json["selectAllToggle"], true);
    }
}
