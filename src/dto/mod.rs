pub mod cart;
pub mod design;
pub mod handoff;
pub mod menu;
pub mod orders;
