//! Run configuration handed to the library by the command line front end.

use crate::error::UserArgError;

/// Where and how resolved workflows are submitted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub addr: String,
    pub auth_token: Option<String>,
}

impl ServerConfig {
    pub const DEFAULT_ADDR: &'static str = "http://127.0.0.1:8188";

    /// Builds a config, trimming a trailing `/` from the address and treating
    /// an empty token as absent.
    pub fn new(addr: &str, auth_token: Option<String>) -> Self {
        Self {
            addr: addr.trim().trim_end_matches('/').to_string(),
            auth_token: auth_token.filter(|t| !t.trim().is_empty()),
        }
    }

    /// The submission endpoint.
    pub fn prompt_url(&self) -> String {
        format!("{}/prompt", self.addr)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self::new(Self::DEFAULT_ADDR, None)
    }
}

/// Text added around every prompt, and an optional length cap.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PromptOptions {
    pub prepend: Option<String>,
    pub append: Option<String>,
    /// Maximum prompt length in characters; `0` disables truncation.
    pub truncate: usize,
}

/// User-supplied `name -> value` arguments, lower-cased and in command line order.
///
/// A later occurrence of the same name replaces the earlier value but keeps its position.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserArgs {
    entries: Vec<(String, String)>,
}

impl UserArgs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: &str, value: &str) {
        let name = name.trim().to_lowercase();
        match self.entries.iter_mut().find(|(k, _)| *k == name) {
            Some(entry) => entry.1 = value.to_string(),
            None => self.entries.push((name, value.to_string())),
        }
    }

    /// Parses `name=value` pairs.
    pub fn from_pairs<'a>(pairs: impl IntoIterator<Item = &'a str>) -> Result<Self, UserArgError> {
        let mut args = Self::new();
        for pair in pairs {
            let (name, value) = pair
                .split_once('=')
                .ok_or_else(|| UserArgError::MissingValue(pair.to_string()))?;
            if name.trim().is_empty() {
                return Err(UserArgError::EmptyName(pair.to_string()));
            }
            args.insert(name, value);
        }
        Ok(args)
    }

    /// Parses trailing command line flags: `--name value` or `--name=value`.
    ///
    /// Dashes inside names are normalized to underscores so `--filename-prefix`
    /// and `--filename_prefix` address the same mapping entry.
    pub fn from_flags<S: AsRef<str>>(flags: &[S]) -> Result<Self, UserArgError> {
        let mut args = Self::new();
        let mut iter = flags.iter();

        while let Some(flag) = iter.next() {
            let flag: &str = flag.as_ref();
            let body = flag
                .strip_prefix("--")
                .ok_or_else(|| UserArgError::NotAFlag(flag.to_string()))?;
            let (name, value) = match body.split_once('=') {
                Some((name, value)) => (name.to_string(), value.to_string()),
                None => {
                    let value: &str = iter
                        .next()
                        .ok_or_else(|| UserArgError::MissingValue(body.to_string()))?
                        .as_ref();
                    (body.to_string(), value.to_string())
                }
            };
            if name.trim().is_empty() {
                return Err(UserArgError::EmptyName(flag.to_string()));
            }
            args.insert(&name.replace('-', "_"), &value);
        }
        Ok(args)
    }

    /// Merges `other` into `self`; values from `other` win.
    pub fn merge(&mut self, other: UserArgs) {
        for (name, value) in other.entries {
            self.insert(&name, &value);
        }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        let name = name.to_lowercase();
        self.entries
            .iter()
            .find(|(k, _)| *k == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
