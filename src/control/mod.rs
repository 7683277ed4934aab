pub mod command;
pub mod controller;
pub mod deferred;
pub mod script;

pub use command::Command;
pub use controller::{ControlEvent, Controller};
pub use deferred::DeferredAction;
pub use script::{Script, ScriptedCommand};
