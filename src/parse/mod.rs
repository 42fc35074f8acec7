mod cursor;
mod redirect;
pub mod shell;
pub mod types;
pub mod word;

pub use shell::{ParseOutcome, Parser, parse};
pub use types::{
    Command, Connector, Descriptor, Pipeline, Redirect, RedirectOp, RedirectTarget, Token,
};
pub use word::parse_word;
