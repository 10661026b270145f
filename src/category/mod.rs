//! Categories that classify transactions, and the endpoints for managing them.

mod create;
mod db;
mod delete;
mod domain;
mod guard;
mod list;

pub use create::create_category_endpoint;
pub use db::{
    count_category_references, create_category, create_category_table, delete_category,
    description_exists, find_category, get_all_categories, get_category,
};
pub use delete::{can_delete_category_endpoint, delete_category_endpoint};
pub use domain::{Category, CategoryForm, CategoryId, CategoryPurpose};
pub use guard::{DeletionCheck, can_delete_category};
pub use list::{get_categories_endpoint, get_category_endpoint};
