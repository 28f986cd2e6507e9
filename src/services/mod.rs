pub mod catalog;
pub mod reports;

pub use catalog::{CatalogService, ListQuery};
pub use reports::{ReportService, SummaryFilter};
