//! People in the household and the endpoints for managing them.

mod create;
mod db;
mod delete;
mod domain;
mod edit;
mod list;

pub use create::{create_person_endpoint, ensure_name_available};
pub use db::{
    create_person, create_person_table, delete_person, find_person, get_all_people, get_person,
    name_exists, update_person,
};
pub use delete::delete_person_endpoint;
pub use domain::{Age, Person, PersonForm, PersonId, PersonName};
pub use edit::update_person_endpoint;
pub use list::{get_people_endpoint, get_person_endpoint};
