mod inspect;
mod list;
mod remove;

pub use self::inspect::InspectCommand;
pub use self::list::ListCommand;
pub use self::remove::RemoveCommand;
