//! Command-line parsing.

use folio_domain::{DomainError, HttpMethod};
use serde_json::Value;

pub const USAGE: &str = "\
usage:
  folio login <email> <password>
  folio register <email> <password>
  folio logout
  folio whoami
  folio profile <user_id>
  folio get|delete <path>
  folio post|patch|put <path> <json>";

/// Reasons a command line cannot be turned into a [`Command`].
#[derive(Debug, thiserror::Error)]
pub enum UsageError {
    #[error("missing command\n{USAGE}")]
    MissingCommand,

    #[error("unknown command {0:?}\n{USAGE}")]
    UnknownCommand(String),

    #[error("`{command}` expects {expected}\n{USAGE}")]
    Arguments {
        command: String,
        expected: &'static str,
    },

    #[error("request body is not valid JSON: {0}")]
    Body(#[source] serde_json::Error),

    #[error(transparent)]
    Method(#[from] DomainError),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Login { email: String, password: String },
    Register { email: String, password: String },
    Logout,
    WhoAmI,
    Profile { user_id: String },
    Call {
        method: HttpMethod,
        path: String,
        body: Option<Value>,
    },
}

impl Command {
    pub fn parse<I>(args: I) -> Result<Self, UsageError>
    where
        I: IntoIterator<Item = String>,
    {
        let mut args = args.into_iter();
        let command = args.next().ok_or(UsageError::MissingCommand)?;
        let rest: Vec<String> = args.collect();
        let arity = |expected: &'static str| UsageError::Arguments {
            command: command.clone(),
            expected,
        };

        match command.as_str() {
            "login" | "register" => {
                let [email, password] = <[String; 2]>::try_from(rest)
                    .map_err(|_| arity("<email> <password>"))?;
                Ok(if command == "login" {
                    Self::Login { email, password }
                } else {
                    Self::Register { email, password }
                })
            }
            "logout" if rest.is_empty() => Ok(Self::Logout),
            "whoami" if rest.is_empty() => Ok(Self::WhoAmI),
            "logout" | "whoami" => Err(arity("no arguments")),
            "profile" => {
                let [user_id] = <[String; 1]>::try_from(rest).map_err(|_| arity("<user_id>"))?;
                Ok(Self::Profile { user_id })
            }
            "get" | "delete" | "post" | "patch" | "put" => {
                let method: HttpMethod = command.parse()?;
                let (path, body) = if method.has_body() {
                    let [path, body] =
                        <[String; 2]>::try_from(rest).map_err(|_| arity("<path> <json>"))?;
                    let body = serde_json::from_str(&body).map_err(UsageError::Body)?;
                    (path, Some(body))
                } else {
                    let [path] = <[String; 1]>::try_from(rest).map_err(|_| arity("<path>"))?;
                    (path, None)
                };
                Ok(Self::Call { method, path, body })
            }
            _ => Err(UsageError::UnknownCommand(command.clone())),
        }
    }
}
