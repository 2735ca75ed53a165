// Infrastructure layer module
// Storage adapters implementing the domain repository ports

pub mod repositories;
