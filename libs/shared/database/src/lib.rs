pub mod live;
pub mod store;

pub use live::LiveQuery;
pub use store::StoreClient;
