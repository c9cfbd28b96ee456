pub mod activity;
pub mod ids;
pub mod lead;
pub mod target;
pub mod task;
pub mod user;

pub use activity::{Activity, ActivityDraft, ActivityType};
pub use lead::{Lead, LeadStatus, Temperature};
pub use target::SalesTarget;
pub use task::Task;
pub use user::{Role, User};
