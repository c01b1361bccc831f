pub mod stop;
pub mod store;
