pub mod audit_logs;
pub mod local_storage;

pub use audit_logs::Entity as AuditLogs;
pub use local_storage::Entity as LocalStorage;
