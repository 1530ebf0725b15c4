pub mod dashboard;
pub mod health;
pub mod notices;
pub mod payments;
pub mod results;
pub mod roster;
pub mod schools;
