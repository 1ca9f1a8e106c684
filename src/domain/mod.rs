//! Pure kiosk domain: catalog references, the cart aggregate, the cake
//! design reducer and the design wizard. Nothing in here touches I/O.

pub mod cart;
pub mod catalog;
pub mod design;
pub mod money;
pub mod wizard;
