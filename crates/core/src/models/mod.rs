pub mod input;
pub mod price;
pub mod report;
pub mod trend;
