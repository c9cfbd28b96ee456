mod auth_tests;
mod import_export_tests;
mod lead_tests;
mod webhook_tests;
