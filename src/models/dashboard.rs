// src/models/dashboard.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::BTreeMap;
use utoipa::ToSchema;

use crate::models::inventory::{InventoryRow, ResolvedFilters};

// 1. Agregados (a parte "motor" do painel, antes de virar gráfico)

// Soma de uma métrica por categoria (Tecido, Cor, ...)
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CategoryTotal {
    pub category: String,
    #[schema(value_type = f64)]
    pub total: Decimal,
}

// Faturamento por Cor x Tecido (grupo E)
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ColorFabricRevenue {
    pub color: String,
    pub fabric_type: String,
    #[schema(value_type = f64)]
    pub total_revenue: Decimal,
}

// Linha do gráfico de evolução do estoque por cor
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ColorStockSummary {
    pub color: String,
    #[schema(value_type = f64)]
    pub total_units: Decimal,
    #[schema(value_type = f64)]
    pub units_sold: Decimal,
    #[schema(value_type = f64)]
    pub available_stock: Decimal,
}

// Barra por linha da planilha (sem somar), com o preço no hover
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ColorUnits {
    pub color: String,
    #[schema(value_type = f64)]
    pub total_units: Decimal,
    #[schema(value_type = Option<f64>)]
    pub unit_price: Option<Decimal>,
}

// Bloco de detalhes de um tipo de tecido (grupo C)
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FabricDetail {
    pub fabric_type: String,
    pub units_by_color: Vec<ColorUnits>,
    pub stock_by_color: Vec<CategoryTotal>,
    pub out_of_stock_colors: Vec<String>,
    pub sold_by_color: Vec<CategoryTotal>,
    pub evolution_by_color: Vec<ColorStockSummary>,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DashboardAggregates {
    pub stock_by_fabric: Vec<CategoryTotal>,
    pub sold_by_fabric: Vec<CategoryTotal>,
    pub fabric_details: Vec<FabricDetail>,
    // Ordenado do menor para o maior faturamento
    pub revenue_by_color: Vec<CategoryTotal>,
    pub revenue_by_color_and_fabric: Vec<ColorFabricRevenue>,
    #[schema(value_type = f64)]
    pub grand_total_revenue: Decimal,
}

// 2. Especificação de gráfico (o front-end só desenha)

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    Pie,
    Bar,
    Area,
    Line,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChartPoint {
    pub category: String,
    #[schema(value_type = f64)]
    pub value: Decimal,
    // Texto exibido sobre a barra
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    #[schema(value_type = Object)]
    pub hover: BTreeMap<String, Option<Decimal>>,
}

impl ChartPoint {
    pub fn new(category: impl Into<String>, value: Decimal) -> Self {
        Self {
            category: category.into(),
            value,
            text: None,
            hover: BTreeMap::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Series {
    pub name: String,
    pub points: Vec<ChartPoint>,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChartSpec {
    // Identificador estável do gráfico no painel
    pub key: String,
    pub kind: ChartKind,
    pub title: String,
    pub category_label: String,
    pub value_label: String,
    // Rótulo da legenda quando há divisão por cor/série
    #[serde(skip_serializing_if = "Option::is_none")]
    pub legend_label: Option<String>,
    pub markers: bool,
    pub series: Vec<Series>,
}

// 3. O painel montado

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ViewBlock {
    Subheader { text: String },
    Markdown { text: String },
    Chart { chart: ChartSpec },
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DashboardView {
    #[schema(example = "Loja de Tecidos Seromo")]
    pub title: String,
    pub generated_at: DateTime<Utc>,
    pub filters: ResolvedFilters,
    // Tabela filtrada exibida acima dos gráficos
    pub rows: Vec<InventoryRow>,
    #[schema(value_type = f64)]
    pub grand_total_revenue: Decimal,
    pub blocks: Vec<ViewBlock>,
}
