pub mod mortgage;
pub mod rental;
