pub mod advisor;

pub use advisor::AdvisorConfig;
