pub mod inventory_repo;
pub use inventory_repo::InventoryRepository;
