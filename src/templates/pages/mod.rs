pub mod dashboard;
pub mod error;
pub mod import;
pub mod lead_detail;
pub mod leads;
pub mod login;
pub mod new_lead;
pub mod tasks;
pub mod users;

pub use dashboard::{dashboard_page, DashboardVm};
pub use error::error_page;
pub use import::import_page;
pub use lead_detail::{lead_detail_page, LeadDetailVm};
pub use leads::{leads_page, LeadListVm};
pub use login::login_page;
pub use new_lead::new_lead_page;
pub use tasks::tasks_page;
pub use users::users_page;
