use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::catalog::{Category, MenuItem};

#[derive(Debug, Serialize, ToSchema)]
pub struct MenuList {
    pub items: Vec<MenuItem>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CategoryList {
    pub items: Vec<Category>,
}
