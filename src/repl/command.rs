//! # REPL Commands
//!
//! A command line is split on whitespace and its first word picks the
//! command. The result is a [`Command`] carrying parsed arguments, so the
//! interpreter never compares strings again.
//!
//! ```text
//! import <file> [label]     load another description
//! cd [path]                 navigate; no path returns to the current root
//! set k=v ...               bind template variables on the current path
//! target [address]          override (or reset) the current root's base
//! server <name>             switch to another root
//! authenticate [scheme ...] bind, replace or clear credentials
//! <method> [path]           send a request
//! ```

use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Import(Vec<String>),
    Cd(Option<String>),
    Set(HashMap<String, String>),
    Target(Option<String>),
    Server(Option<String>),
    Authenticate {
        scheme: Option<String>,
        args: Vec<String>,
    },
    Send {
        method: String,
        path: Option<String>,
    },
}

impl Command {
    /// Parse one command line; blank lines yield `None`
    pub fn parse(line: &str) -> Option<Self> {
        let mut words = line.split_whitespace();
        let first = words.next()?;
        let rest: Vec<String> = words.map(str::to_string).collect();
        let arg = |i: usize| rest.get(i).cloned();

        let command = match first {
            "import" => Self::Import(rest),
            "cd" => Self::Cd(arg(0)),
            "set" => Self::Set(parse_assignments(&rest)),
            "target" => Self::Target(arg(0)),
            "server" => Self::Server(arg(0)),
            "authenticate" => Self::Authenticate {
                scheme: arg(0),
                args: rest.iter().skip(1).cloned().collect(),
            },
            method => Self::Send {
                method: method.to_string(),
                path: arg(0),
            },
        };
        Some(command)
    }

    pub fn name(&self) -> &str {
        match self {
            Self::Import(_) => "import",
            Self::Cd(_) => "cd",
            Self::Set(_) => "set",
            Self::Target(_) => "target",
            Self::Server(_) => "server",
            Self::Authenticate { .. } => "authenticate",
            Self::Send { method, .. } => method,
        }
    }
}

/// `k=v` words; words without `=` are ignored and later keys win
fn parse_assignments(words: &[String]) -> HashMap<String, String> {
    words
        .iter()
        .filter_map(|word| word.split_once('='))
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_should_ignore_blank_lines() {
        assert_eq!(Command::parse(""), None);
        assert_eq!(Command::parse("   \t "), None);
    }

    #[test]
    fn parse_cd_with_and_without_path() {
        assert_eq!(Command::parse("cd"), Some(Command::Cd(None)));
        assert_eq!(Command::parse("cd  items/{id} "), Some(Command::Cd(Some("items/{id}".into()))));
    }

    #[test]
    fn parse_set_should_collect_assignments() {
        let Some(Command::Set(vars)) = Command::parse("set id=42 junk lang=en=us id=43") else {
            panic!("expected set");
        };
        assert_eq!(vars.len(), 2);
        assert_eq!(vars["id"], "43");
        assert_eq!(vars["lang"], "en=us");
    }

    #[test]
    fn parse_target_and_server() {
        assert_eq!(Command::parse("target"), Some(Command::Target(None)));
        assert_eq!(
            Command::parse("target http://localhost:8080"),
            Some(Command::Target(Some("http://localhost:8080".into())))
        );
        assert_eq!(Command::parse("server API"), Some(Command::Server(Some("API".into()))));
    }

    #[test]
    fn parse_authenticate_should_split_scheme_and_credentials() {
        assert_eq!(
            Command::parse("authenticate"),
            Some(Command::Authenticate { scheme: None, args: vec![] })
        );
        assert_eq!(
            Command::parse("authenticate basic alice secret"),
            Some(Command::Authenticate {
                scheme: Some("basic".into()),
                args: vec!["alice".into(), "secret".into()],
            })
        );
    }

    #[test]
    fn parse_should_treat_anything_else_as_send() {
        assert_eq!(
            Command::parse("get"),
            Some(Command::Send { method: "get".into(), path: None })
        );
        assert_eq!(
            Command::parse("PUT ../{id}"),
            Some(Command::Send { method: "PUT".into(), path: Some("../{id}".into()) })
        );
        assert_eq!(Command::parse("frobnicate").map(|c| c.name().to_string()), Some("frobnicate".into()));
    }

    #[test]
    fn parse_import_should_keep_all_arguments() {
        assert_eq!(
            Command::parse("import shop.wadl shop"),
            Some(Command::Import(vec!["shop.wadl".into(), "shop".into()]))
        );
    }
}
