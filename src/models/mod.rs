pub mod announcement;
pub mod appointment;
pub mod employee;
pub mod enums;
pub mod feedback;
pub mod land;
pub mod land_owner;
pub mod office;
pub mod report;
pub mod user;

pub use announcement::*;
pub use appointment::*;
pub use employee::*;
pub use enums::*;
pub use feedback::*;
pub use land::*;
pub use land_owner::*;
pub use office::*;
pub use report::*;
pub use user::*;
