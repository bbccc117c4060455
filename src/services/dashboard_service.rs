// src/services/dashboard_service.rs

use chrono::Utc;
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::hash::Hash;
use std::sync::Arc;

use crate::{
    common::{currency::format_brl, error::AppError},
    config::{ChartOrder, DashboardLayout},
    models::{
        dashboard::{
            CategoryTotal, ChartKind, ChartPoint, ChartSpec, ColorFabricRevenue,
            ColorStockSummary, ColorUnits, DashboardAggregates, DashboardView, FabricDetail,
            Series, ViewBlock,
        },
        inventory::{
            distinct, FilterOptions, FilterSelection, Inventory, InventoryRecord, InventoryRow,
            COL_PRECO_UNITARIO,
        },
    },
    services::inventory_service::{apply_filters, resolve_filters, InventoryService},
};

pub const DASHBOARD_TITLE: &str = "Loja de Tecidos Seromo";

#[derive(Clone)]
pub struct DashboardService {
    inventory_service: InventoryService,
    layout: DashboardLayout,
}

impl DashboardService {
    pub fn new(inventory_service: InventoryService, layout: DashboardLayout) -> Self {
        Self {
            inventory_service,
            layout,
        }
    }

    // Carrega (ou reaproveita) a tabela completa fora do runtime assíncrono
    async fn inventory(&self) -> Result<Arc<Inventory>, AppError> {
        let service = self.inventory_service.clone();
        tokio::task::spawn_blocking(move || service.load_inventory())
            .await
            .map_err(anyhow::Error::from)?
    }

    pub async fn get_filter_options(&self) -> Result<FilterOptions, AppError> {
        let inventory = self.inventory().await?;
        Ok(FilterOptions::from_inventory(&inventory, self.layout.select_all_toggle))
    }

    /// Uma interação do usuário = um render completo a partir da tabela inteira.
    pub async fn get_dashboard(&self, selection: &FilterSelection) -> Result<DashboardView, AppError> {
        let inventory = self.inventory().await?;
        let view = render(&inventory, selection, self.layout);
        tracing::info!(
            "📊 Painel gerado: {} linhas filtradas, {} blocos",
            view.rows.len(),
            view.blocks.len()
        );
        Ok(view)
    }
}

// ---
// Agregador
// ---

// Soma por chave, preservando a ordem em que cada chave aparece
fn sum_by<'a, K, FK, FV>(rows: &[&'a InventoryRecord], key: FK, value: FV) -> Vec<(K, Decimal)>
where
    K: Eq + Hash + Clone,
    FK: Fn(&'a InventoryRecord) -> K,
    FV: Fn(&InventoryRecord) -> Decimal,
{
    let mut index: HashMap<K, usize> = HashMap::new();
    let mut totals: Vec<(K, Decimal)> = Vec::new();
    for &row in rows {
        let k = key(row);
        match index.get(&k) {
            Some(&i) => totals[i].1 += value(row),
            None => {
                index.insert(k.clone(), totals.len());
                totals.push((k, value(row)));
            }
        }
    }
    totals
}

fn category_totals(totals: Vec<(&str, Decimal)>) -> Vec<CategoryTotal> {
    totals
        .into_iter()
        .map(|(category, total)| CategoryTotal {
            category: category.to_string(),
            total,
        })
        .collect()
}

/// Cores de um tecido com alguma linha em `available_stock <= 0` (checagem por linha).
pub fn out_of_stock_colors(rows: &[&InventoryRecord]) -> Vec<String> {
    distinct(
        rows.iter()
            .filter(|r| r.available_stock() <= Decimal::ZERO)
            .map(|r| r.color.as_str()),
    )
}

fn fabric_detail(fabric_type: &str, rows: &[&InventoryRecord]) -> FabricDetail {
    let totals = sum_by(rows, |r| r.color.as_str(), |r| r.total_units);
    let sold = sum_by(rows, |r| r.color.as_str(), |r| r.units_sold);

    // Mesmas chaves, mesma ordem: o estoque sai da diferença das somas
    let evolution_by_color = totals
        .iter()
        .zip(&sold)
        .map(|((color, total_units), (_, units_sold))| ColorStockSummary {
            color: color.to_string(),
            total_units: *total_units,
            units_sold: *units_sold,
            available_stock: *total_units - *units_sold,
        })
        .collect();

    FabricDetail {
        fabric_type: fabric_type.to_string(),
        units_by_color: rows
            .iter()
            .map(|r| ColorUnits {
                color: r.color.clone(),
                total_units: r.total_units,
                unit_price: r.unit_price,
            })
            .collect(),
        stock_by_color: category_totals(sum_by(rows, |r| r.color.as_str(), |r| r.available_stock())),
        out_of_stock_colors: out_of_stock_colors(rows),
        sold_by_color: category_totals(sold),
        evolution_by_color,
    }
}

/// Grupos A–E sobre as linhas filtradas. `fabric_types` vem da tabela completa:
/// tecidos sem linhas na seleção não geram bloco.
pub fn aggregate(rows: &[&InventoryRecord], fabric_types: &[String]) -> DashboardAggregates {
    let stock_by_fabric =
        category_totals(sum_by(rows, |r| r.fabric_type.as_str(), |r| r.available_stock()));
    let sold_by_fabric = category_totals(sum_by(rows, |r| r.fabric_type.as_str(), |r| r.units_sold));

    let fabric_details = fabric_types
        .iter()
        .filter_map(|fabric| {
            let subset: Vec<&InventoryRecord> = rows
                .iter()
                .copied()
                .filter(|r| &r.fabric_type == fabric)
                .collect();
            (!subset.is_empty()).then(|| fabric_detail(fabric, &subset))
        })
        .collect();

    let mut revenue_by_color =
        category_totals(sum_by(rows, |r| r.color.as_str(), |r| r.total_revenue));
    // sort_by é estável: empates mantêm a ordem de aparição
    revenue_by_color.sort_by(|a, b| a.total.cmp(&b.total));
    let grand_total_revenue: Decimal = revenue_by_color.iter().map(|c| c.total).sum();

    let revenue_by_color_and_fabric = sum_by(
        rows,
        |r| (r.color.as_str(), r.fabric_type.as_str()),
        |r| r.total_revenue,
    )
    .into_iter()
    .map(|((color, fabric_type), total_revenue)| ColorFabricRevenue {
        color: color.to_string(),
        fabric_type: fabric_type.to_string(),
        total_revenue,
    })
    .collect();

    DashboardAggregates {
        stock_by_fabric,
        sold_by_fabric,
        fabric_details,
        revenue_by_color,
        revenue_by_color_and_fabric,
        grand_total_revenue,
    }
}

// ---
// Renderizador: agregado -> especificação de gráfico
// ---

fn chart(key: String, kind: ChartKind, title: String, category_label: &str, value_label: &str) -> ChartSpec {
    ChartSpec {
        key,
        kind,
        title,
        category_label: category_label.to_string(),
        value_label: value_label.to_string(),
        legend_label: None,
        markers: false,
        series: Vec::new(),
    }
}

fn single_series(name: &str, points: Vec<ChartPoint>) -> Vec<Series> {
    vec![Series {
        name: name.to_string(),
        points,
    }]
}

fn total_points(totals: &[CategoryTotal]) -> Vec<ChartPoint> {
    totals
        .iter()
        .map(|t| ChartPoint::new(&t.category, t.total))
        .collect()
}

fn with_value_text(mut point: ChartPoint) -> ChartPoint {
    point.text = Some(format!("{:.2}", point.value));
    point
}

fn fabric_blocks(detail: &FabricDetail) -> Vec<ViewBlock> {
    let fabric = &detail.fabric_type;

    let mut bar = chart(
        format!("tecido_{}_unidades", fabric),
        ChartKind::Bar,
        format!("Quantidade Total de Tecidos por Cor - {}", fabric),
        "Cor",
        "Total de Unidades",
    );
    bar.series = single_series(
        "Total_unidades",
        detail
            .units_by_color
            .iter()
            .map(|u| {
                let mut point = ChartPoint::new(&u.color, u.total_units);
                point.hover.insert(COL_PRECO_UNITARIO.to_string(), u.unit_price);
                point
            })
            .collect(),
    );

    let mut pie = chart(
        format!("tecido_{}_estoque", fabric),
        ChartKind::Pie,
        format!("Distribuição de Estoque Disponível por Cor - {}", fabric),
        "Cor",
        "Estoque Disponível",
    );
    pie.series = single_series("Estoque_disponivel", total_points(&detail.stock_by_color));

    let out_of_stock = if detail.out_of_stock_colors.is_empty() {
        "**Não há cores em falta no estoque.**".to_string()
    } else {
        format!(
            "**Cores em falta no estoque:** {}",
            detail.out_of_stock_colors.join(", ")
        )
    };

    let mut area = chart(
        format!("tecido_{}_vendas", fabric),
        ChartKind::Area,
        format!("Quantidade Vendida por Cor - {}", fabric),
        "Cor",
        "Quantidade Vendida (Kg)",
    );
    area.series = single_series("Unidades_kg", total_points(&detail.sold_by_color));

    let mut line = chart(
        format!("tecido_{}_evolucao", fabric),
        ChartKind::Line,
        format!(
            "Total de Unidades, Unidades Vendidas e Estoque Disponível por Cor - {}",
            fabric
        ),
        "Cor do Tecido",
        "Quantidade",
    );
    line.legend_label = Some("Legenda".to_string());
    line.markers = true;
    let evolution = &detail.evolution_by_color;
    let series = |name: &str, metric: fn(&ColorStockSummary) -> Decimal| Series {
        name: name.to_string(),
        points: evolution
            .iter()
            .map(|e| ChartPoint::new(&e.color, metric(e)))
            .collect(),
    };
    line.series = vec![
        series("Total_unidades", |e| e.total_units),
        series("Unidades_kg", |e| e.units_sold),
        series("Estoque_disponivel", |e| e.available_stock),
    ];

    vec![
        ViewBlock::Subheader {
            text: format!("Gráficos de Tecido: {}", fabric),
        },
        ViewBlock::Chart { chart: bar },
        ViewBlock::Chart { chart: pie },
        ViewBlock::Markdown { text: out_of_stock },
        ViewBlock::Chart { chart: area },
        ViewBlock::Subheader {
            text: format!("Evolução do Estoque por Cor - {}", fabric),
        },
        ViewBlock::Chart { chart: line },
    ]
}

fn stock_section(aggregates: &DashboardAggregates) -> Vec<ViewBlock> {
    let mut pie = chart(
        "estoque_por_tecido".to_string(),
        ChartKind::Pie,
        "Estoque Disponível por Tipo de Tecido".to_string(),
        "Tecido",
        "Estoque Disponível",
    );
    pie.series = single_series("Estoque_disponivel", total_points(&aggregates.stock_by_fabric));

    let mut area = chart(
        "vendas_por_tecido".to_string(),
        ChartKind::Area,
        "Quantidade de Tecidos Vendidos por Tipo de Tecido".to_string(),
        "Tipo de Tecido",
        "Quantidade Vendida (Kg)",
    );
    area.series = single_series("Unidades_kg", total_points(&aggregates.sold_by_fabric));

    let mut blocks = vec![ViewBlock::Chart { chart: pie }, ViewBlock::Chart { chart: area }];
    for detail in &aggregates.fabric_details {
        blocks.extend(fabric_blocks(detail));
    }
    blocks
}

fn revenue_section(aggregates: &DashboardAggregates) -> Vec<ViewBlock> {
    // Uma série por tecido: barras da mesma cor divididas por tecido
    let mut by_fabric: Vec<Series> = Vec::new();
    for entry in &aggregates.revenue_by_color_and_fabric {
        let point = with_value_text(ChartPoint::new(&entry.color, entry.total_revenue));
        match by_fabric.iter_mut().find(|s| s.name == entry.fabric_type) {
            Some(series) => series.points.push(point),
            None => by_fabric.push(Series {
                name: entry.fabric_type.clone(),
                points: vec![point],
            }),
        }
    }

    let mut split = chart(
        "faturamento_por_tecido".to_string(),
        ChartKind::Bar,
        "Faturamento por Cor e Tecido Individual".to_string(),
        "Cor",
        "Faturamento Total",
    );
    split.legend_label = Some("Tecido".to_string());
    split.series = by_fabric;

    let mut total = chart(
        "faturamento_total".to_string(),
        ChartKind::Bar,
        "Faturamento Total por Cor".to_string(),
        "Cor",
        "Faturamento Total",
    );
    total.series = single_series(
        "Faturamento_total",
        total_points(&aggregates.revenue_by_color)
            .into_iter()
            .map(with_value_text)
            .collect(),
    );

    vec![
        ViewBlock::Subheader {
            text: "Evolução do Faturamento por Cor de Tecido".to_string(),
        },
        ViewBlock::Markdown {
            text: format!(
                "**Faturamento Total de Todos os Tecidos: {}**",
                format_brl(aggregates.grand_total_revenue)
            ),
        },
        ViewBlock::Chart { chart: split },
        ViewBlock::Chart { chart: total },
    ]
}

/// Função pura do painel: tabela completa + filtros -> visão pronta para desenhar.
pub fn render(inventory: &Inventory, selection: &FilterSelection, layout: DashboardLayout) -> DashboardView {
    let filters = resolve_filters(inventory, selection, layout.select_all_toggle);
    let rows = apply_filters(&inventory.records, &filters);
    let aggregates = aggregate(&rows, &inventory.fabric_types);

    let stock = stock_section(&aggregates);
    let revenue = revenue_section(&aggregates);
    let blocks = match layout.order {
        ChartOrder::StockFirst => stock.into_iter().chain(revenue).collect(),
        ChartOrder::RevenueFirst => revenue.into_iter().chain(stock).collect(),
    };

    DashboardView {
        title: DASHBOARD_TITLE.to_string(),
        generated_at: Utc::now(),
        filters,
        rows: rows.iter().map(|r| InventoryRow::from(*r)).collect(),
        grand_total_revenue: aggregates.grand_total_revenue,
        blocks,
    }
}
