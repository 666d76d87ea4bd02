pub mod collection;
pub mod module;
