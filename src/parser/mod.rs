pub mod lines;
pub mod roots;
pub mod sections;

pub use sections::locate_day;
