pub mod person;
pub mod payroll;
pub mod shift;
