pub mod category_service;
pub mod product_service;
mod validation;

pub use category_service::CategoryService;
pub use product_service::ProductService;
