pub mod show;
pub mod event;
pub mod place;
pub mod upstream;

pub use show::Show;
pub use event::Event;
pub use place::Place;
