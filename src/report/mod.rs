//! Reports that total up income and expenses.

mod aggregation;
mod endpoints;

pub use aggregation::{
    CategoryTotals, PersonTotals, Report, Totals, aggregate_by_category, aggregate_by_person,
    totals_by,
};
pub use endpoints::{
    get_categories_report_endpoint, get_people_report_endpoint, get_statistics_endpoint,
};
