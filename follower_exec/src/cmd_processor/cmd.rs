//! Commands accepted by the follower, and their text grammar.
//!
//! Commands are `;` separated token lists, the first token naming the command:
//!
//! | Command                | Effect                                                           |
//! |------------------------|------------------------------------------------------------------|
//! | `setoffset;x;y;z`      | Set the offset, an empty coordinate keeps that axis              |
//! | `addoffset;x;y;z`      | Add to the offset                                                |
//! | `stop`                 | Stop automatic control                                           |
//! | `start`                | Resume automatic control                                         |
//! | `starthere`            | Resume, holding the current position relative to the leader      |
//! | `reset`                | Return to the default offset and configuration                   |
//! | `save(;name)`          | Save the offset under `name`, or the active configuration        |
//! | `savehere(;name)`      | Save the current leader-relative position                        |
//! | `load;name`            | Load a named configuration                                       |
//! | `clear`                | Forget the leader                                                |

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use nalgebra::Vector3;
use std::str::FromStr;

use crate::persist::parse_coord;

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub enum Cmd {
    /// Set the offset, `None` coordinates keep their current value.
    SetOffset([Option<f64>; 3]),

    /// Add to the offset.
    AddOffset(Vector3<f64>),

    Stop,

    Start,

    StartHere,

    Reset,

    /// Save the offset under the given name, or under the active configuration if `None`.
    Save(Option<String>),

    /// Save the current leader-relative position under the given name, or under the active
    /// configuration if `None`.
    SaveHere(Option<String>),

    Load(String),

    Clear,
}

/// Errors from parsing a command string.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum CmdParseError {
    #[error("The command string is empty")]
    Empty,

    #[error("Unknown command \"{0}\"")]
    UnknownCmd(String),

    #[error("Command \"{cmd}\" expects {expected} arguments but {found} were given")]
    WrongNumArgs {
        cmd: String,
        expected: usize,
        found: usize
    },

    #[error("\"{0}\" is not a valid coordinate")]
    InvalidCoord(String),

    #[error("\"{0}\" is not a valid configuration name, names must be non-empty and contain no \
        whitespace")]
    InvalidName(String),
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl Cmd {
    /// Parse a command string.
    pub fn parse(cmd_str: &str) -> Result<Self, CmdParseError> {
        let tokens: Vec<&str> = cmd_str.split(';').collect();
        let name = tokens[0].trim();
        let args = &tokens[1..];

        match name {
            "" => Err(CmdParseError::Empty),
            "setoffset" => {
                expect_args(name, args, 3)?;

                let mut coords = [None; 3];
                for (c, a) in coords.iter_mut().zip(args) {
                    if !a.is_empty() {
                        *c = Some(coord(a)?);
                    }
                }

                Ok(Cmd::SetOffset(coords))
            },
            "addoffset" => {
                expect_args(name, args, 3)?;
                Ok(Cmd::AddOffset(Vector3::new(coord(args[0])?, coord(args[1])?, coord(args[2])?)))
            },
            "stop" => Ok(Cmd::Stop),
            "start" => Ok(Cmd::Start),
            "starthere" => Ok(Cmd::StartHere),
            "reset" => Ok(Cmd::Reset),
            "save" => Ok(Cmd::Save(opt_name(args)?)),
            "savehere" => Ok(Cmd::SaveHere(opt_name(args)?)),
            "load" => match args.first() {
                Some(n) => Ok(Cmd::Load(n.to_string())),
                None => Err(CmdParseError::WrongNumArgs {
                    cmd: name.to_string(),
                    expected: 1,
                    found: 0
                })
            },
            "clear" => Ok(Cmd::Clear),
            _ => Err(CmdParseError::UnknownCmd(name.to_string()))
        }
    }
}

impl FromStr for Cmd {
    type Err = CmdParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Cmd::parse(s)
    }
}

// ------------------------------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ------------------------------------------------------------------------------------------------

/// True if `name` can be used as a configuration name.
pub fn is_valid_config_name(name: &str) -> bool {
    !name.is_empty() && !name.chars().any(char::is_whitespace)
}

// ------------------------------------------------------------------------------------------------
// PRIVATE FUNCTIONS
// ------------------------------------------------------------------------------------------------

fn expect_args(cmd: &str, args: &[&str], expected: usize) -> Result<(), CmdParseError> {
    if args.len() == expected {
        Ok(())
    }
    else {
        Err(CmdParseError::WrongNumArgs {
            cmd: cmd.to_string(),
            expected,
            found: args.len()
        })
    }
}

fn coord(token: &str) -> Result<f64, CmdParseError> {
    parse_coord(token).map_err(|_| CmdParseError::InvalidCoord(token.to_string()))
}

fn opt_name(args: &[&str]) -> Result<Option<String>, CmdParseError> {
    match args.first() {
        Some(n) if is_valid_config_name(n) => Ok(Some(n.to_string())),
        Some(n) => Err(CmdParseError::InvalidName(n.to_string())),
        None => Ok(None)
    }
}

// ------------------------------------------------------------------------------------------------
// TESTS
// ------------------------------------------------------------------------------------------------
