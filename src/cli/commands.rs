pub mod import_artists;
pub mod initdb;
pub mod migrate_and_serve;
pub mod serve;

pub use import_artists::import_artists;
pub use initdb::init_database;
pub use migrate_and_serve::migrate_and_serve;
pub use serve::serve;
