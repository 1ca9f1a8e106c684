pub mod auth_service;
pub mod cart_service;
pub mod cart_store;
pub mod design_service;
pub mod handoff_service;
pub mod menu_service;
pub mod order_service;
