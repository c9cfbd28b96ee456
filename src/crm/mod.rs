pub mod bulk;
pub mod dashboard;
pub mod filters;
pub mod lifecycle;
pub mod store;

pub use bulk::BulkChange;
pub use filters::{LeadFilter, LeadView};
pub use store::{CrmState, CrmStore};
