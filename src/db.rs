pub mod collection_repo;
pub mod kv_store;
pub mod seed;
pub mod user_repo;

pub use collection_repo::CollectionRepository;
pub use user_repo::UserRepository;
