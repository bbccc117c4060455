// src/config.rs

use anyhow::Context;
use std::{env, path::PathBuf, str::FromStr};

use crate::{
    common::i18n::I18nStore,
    db::InventoryRepository,
    services::{dashboard_service::DashboardService, inventory_service::InventoryService},
};

// Ordem das seções do painel (as variantes antigas só mudavam isto)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChartOrder {
    #[default]
    StockFirst,
    RevenueFirst,
}

impl FromStr for ChartOrder {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "stock-first" | "estoque" => Ok(ChartOrder::StockFirst),
            "revenue-first" | "faturamento" => Ok(ChartOrder::RevenueFirst),
            other => anyhow::bail!("ordem de gráficos desconhecida: '{}'", other),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DashboardLayout {
    // Mostra as caixas "Selecionar Todos" na barra lateral
    pub select_all_toggle: bool,
    pub order: ChartOrder,
}

impl Default for DashboardLayout {
    fn default() -> Self {
        Self {
            select_all_toggle: true,
            order: ChartOrder::StockFirst,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub data_file: PathBuf,
    pub sheet: String,
    pub bind_addr: String,
    pub layout: DashboardLayout,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    // Separado de `from_env` para os testes não mexerem no ambiente do processo
    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let select_all_toggle = match lookup("DASHBOARD_SELECT_ALL_TOGGLE") {
            Some(v) => v
                .trim()
                .parse::<bool>()
                .with_context(|| format!("DASHBOARD_SELECT_ALL_TOGGLE inválido: '{}'", v))?,
            None => true,
        };
        let order = match lookup("DASHBOARD_CHART_ORDER") {
            Some(v) => v.parse().context("DASHBOARD_CHART_ORDER inválido")?,
            None => ChartOrder::default(),
        };

        Ok(Self {
            data_file: lookup("DASHBOARD_DATA_FILE")
                .unwrap_or_else(|| "DadosLoja.xlsx".to_string())
                .into(),
            sheet: lookup("DASHBOARD_SHEET").unwrap_or_else(|| "Planilha1".to_string()),
            bind_addr: lookup("DASHBOARD_BIND_ADDR").unwrap_or_else(|| "0.0.0.0:3000".to_string()),
            layout: DashboardLayout {
                select_all_toggle,
                order,
            },
        })
    }
}

#[derive(Clone)]
pub struct AppState {
    pub dashboard_service: DashboardService,
    pub i18n_store: I18nStore,
}

impl AppState {
    pub fn new(config: &AppConfig) -> Self {
        // --- Monta o gráfico de dependências ---
        let inventory_repo = InventoryRepository::new(&config.data_file, &config.sheet);
        let inventory_service = InventoryService::new(inventory_repo);
        let dashboard_service = DashboardService::new(inventory_service, config.layout);

        Self {
            dashboard_service,
            i18n_store: I18nStore::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(vars: &[(&str, &str)]) -> anyhow::Result<AppConfig> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_match_the_store_setup() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config.data_file, PathBuf::from("DadosLoja.xlsx"));
        assert_eq!(config.sheet, "Planilha1");
        assert_eq!(config.bind_addr, "0.0.0.0:3000");
        assert_eq!(config.layout, DashboardLayout::default());
    }

    #[test]
    fn reads_layout_overrides() {
        let config = config_from(&[
            ("DASHBOARD_SELECT_ALL_TOGGLE", "false"),
            ("DASHBOARD_CHART_ORDER", "revenue-first"),
            ("DASHBOARD_SHEET", "Vendas"),
        ])
        .unwrap();
        assert!(!config.layout.select_all_toggle);
        assert_eq!(config.layout.order, ChartOrder::RevenueFirst);
        assert_eq!(config.sheet, "Vendas");
    }

    #[test]
    fn rejects_invalid_values() {
        assert!(config_from(&[("DASHBOARD_SELECT_ALL_TOGGLE", "talvez")]).is_err());
        assert!(config_from(&[("DASHBOARD_CHART_ORDER", "aleatorio")]).is_err());
    }

    #[test]
    fn chart_order_accepts_portuguese_aliases() {
        assert_eq!("Faturamento".parse::<ChartOrder>().unwrap(), ChartOrder::RevenueFirst);
        assert_eq!(" estoque ".parse::<ChartOrder>().unwrap(), ChartOrder::StockFirst);
    }
}
