pub mod check;
pub mod facts;
