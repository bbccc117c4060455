// src/docs.rs

use utoipa::OpenApi;
use crate::handlers;
use crate::models;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Loja de Tecidos Seromo",
        description = "Painel de estoque e faturamento a partir da planilha da loja"
    ),
    paths(
        // --- Dashboard ---
        handlers::dashboard::get_filters,
        handlers::dashboard::get_dashboard,
        handlers::dashboard::filter_dashboard,
    ),
    components(
        schemas(
            // --- Inventory ---
            models::inventory::InventoryRecord,
            models::inventory::InventoryRow,
            models::inventory::FilterSelection,
            models::inventory::ResolvedFilters,
            models::inventory::FilterOptions,

            // --- DASHBOARD ---
            models::dashboard::CategoryTotal,
            models::dashboard::ColorFabricRevenue,
            models::dashboard::ColorStockSummary,
            models::dashboard::ColorUnits,
            models::dashboard::FabricDetail,
            models::dashboard::DashboardAggregates,
            models::dashboard::ChartKind,
            models::dashboard::ChartPoint,
            models::dashboard::Series,
            models::dashboard::ChartSpec,
            models::dashboard::ViewBlock,
            models::dashboard::DashboardView,
        )
    ),
    tags(
        (name = "Dashboard", description = "Indicadores e Gráficos de Estoque e Faturamento")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn documents_dashboard_routes() {
        let doc = ApiDoc::openapi();
        assert!(doc.paths.paths.contains_key("/api/dashboard"));
        assert!(doc.paths.paths.contains_key("/api/dashboard/filters"));
    }
}
