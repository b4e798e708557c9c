pub mod furniture;
pub mod primitives;
pub mod room_shell;
