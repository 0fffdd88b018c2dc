pub mod advise;
pub mod baseline;
pub mod compare;
pub mod project;
pub mod scenario;
pub mod sweep;
