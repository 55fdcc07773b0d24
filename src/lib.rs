pub mod debug;
pub mod io;
pub mod math;
pub mod setup;
pub mod sim;
pub mod survey;
