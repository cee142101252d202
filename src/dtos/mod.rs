pub mod payroll;
pub mod person;
pub mod report;
pub mod shift;
pub mod user;
