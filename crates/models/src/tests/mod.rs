
/// CRUD operations against a migrated SQLite database
pub mod crud_tests;
