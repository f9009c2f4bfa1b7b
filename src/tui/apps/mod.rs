pub mod manager;

pub use manager::ItemManager;
