//! Command parsing and dispatch for schemalens.
//!
//! Parsing ([`CommandRouter`]) is separate from execution
//! ([`CommandDispatcher`]), so command lines can be unit tested without a
//! connection.

pub mod definitions;
pub mod dispatcher;
pub mod handlers;
pub mod help;
pub mod output;
pub mod router;
pub mod tokenizer;

pub use definitions::{CommandCategory, CommandDef, Requirement, COMMANDS};
pub use dispatcher::CommandDispatcher;
pub use handlers::{CommandContext, CommandResult};
pub use output::{CommandOutput, ControlAction};
pub use router::{Command, CommandRouter, ConnectArgs, ExecuteArgs};
pub use tokenizer::{parse_args, ParsedArgs, Token};
