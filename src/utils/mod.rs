//! The `utils` module provides helpers shared by the resolver and the command
//! builder: macro expansion and whitespace normalization of user-entered text.

pub mod macros;
