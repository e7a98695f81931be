pub mod office;

pub use office::InMemoryOfficeRegistry;
