/// Database model definitions.
pub mod models;
/// Entity store abstraction and its in-memory implementation.
pub mod pool_store;
/// Storage abstraction layer for database operations.
pub mod storage;
