mod context;

pub use context::StoreContext;
