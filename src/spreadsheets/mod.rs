pub mod backend;
pub mod columns;
pub mod csv;
pub mod export;
pub mod http_sheet;
pub mod import;
pub mod sqlite_sheet;

pub use backend::{load_leads, upsert_leads, SheetBackend, SheetRow};
pub use export::{export_leads_csv, export_leads_xlsx};
pub use http_sheet::HttpSheet;
pub use import::import_csv;
pub use sqlite_sheet::SqliteSheet;
