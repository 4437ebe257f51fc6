// Command-line configuration. The program takes exactly three positional
// arguments and uses them verbatim.

use crate::error::{ApiError, Result};

pub const USAGE: &str = "usage: visallo-client-example <baseurl> <username> <password>";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub base_url: String,
    pub username: String,
    pub password: String,
}

impl Config {
    /// Build a `Config` from the arguments that follow the program name.
    pub fn from_args<I>(args: I) -> Result<Self>
    where
        I: IntoIterator<Item = String>,
    {
        let args: Vec<String> = args.into_iter().collect();
        match <[String; 3]>::try_from(args) {
            Ok([base_url, username, password]) => Ok(Config {
                base_url,
                username,
                password,
            }),
            Err(_) => Err(ApiError::Usage(USAGE.to_string())),
        }
    }
}
