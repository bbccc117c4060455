pub mod dashboard_service;
pub mod inventory_service;
