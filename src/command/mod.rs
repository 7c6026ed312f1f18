//! The `command` module turns a build step's settings into the argument
//! vector handed to the external build tool.

pub mod gradle_command;
pub mod tokenizer;

use std::fmt;

/// Ordered list of process arguments, the executable first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArgumentList {
    args: Vec<String>,
}

impl ArgumentList {
    pub fn new() -> Self {
        ArgumentList::default()
    }

    pub fn add(&mut self, arg: impl Into<String>) -> &mut Self {
        self.args.push(arg.into());
        self
    }

    pub fn add_all<I, S>(&mut self, args: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Splits `s` with [`tokenizer::tokenize`] and appends every token.
    pub fn add_tokenized(&mut self, s: &str) -> &mut Self {
        self.args.extend(tokenizer::tokenize(s));
        self
    }

    /// Appends one `<prefix><key>=<value>` argument per entry, in iteration order.
    pub fn add_key_value_pairs<'a, I>(&mut self, prefix: &str, pairs: I) -> &mut Self
    where
        I: IntoIterator<Item = (&'a String, &'a String)>,
    {
        for (key, value) in pairs {
            self.args.push(format!("{}{}={}", prefix, key, value));
        }
        self
    }

    pub fn prepend<I, S>(&mut self, args: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut front: Vec<String> = args.into_iter().map(Into::into).collect();
        front.append(&mut self.args);
        self.args = front;
        self
    }

    pub fn as_slice(&self) -> &[String] {
        &self.args
    }

    pub fn len(&self) -> usize {
        self.args.len()
    }

    pub fn is_empty(&self) -> bool {
        self.args.is_empty()
    }

    /// Single-line rendering for the job log; arguments containing
    /// whitespace or quotes are double-quoted.
    pub fn to_command_line(&self) -> String {
        self.args
            .iter()
            .map(|arg| quote_for_display(arg))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl fmt::Display for ArgumentList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_command_line())
    }
}

fn quote_for_display(arg: &str) -> String {
    if arg.is_empty() {
        return "\"\"".to_string();
    }
    if arg.contains(|c: char| c.is_whitespace() || c == '"' || c == '\'') {
        format!("\"{}\"", arg.replace('\\', "\\\\").replace('"', "\\\""))
    } else {
        arg.to_string()
    }
}
