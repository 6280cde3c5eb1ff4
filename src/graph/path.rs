use crate::error::ResolveError;
use std::fmt;
use std::str::FromStr;

/// A parsed `title[/key]*` expression.
///
/// The title is everything before the first `/`; the remainder is the key
/// chain descended through the node's `inputs`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PathExpression {
    pub title: String,
    pub keys: Vec<String>,
}

impl PathExpression {
    pub fn parse(expr: &str) -> Result<Self, ResolveError> {
        let expr = expr.trim();
        if expr.is_empty() {
            return Err(ResolveError::EmptyPath);
        }

        let (title, rest) = match expr.split_once('/') {
            Some((title, rest)) => (title.trim(), Some(rest)),
            None => (expr, None),
        };
        if title.is_empty() {
            return Err(ResolveError::EmptySegment(expr.to_string()));
        }

        let mut keys = Vec::new();
        if let Some(rest) = rest {
            for key in rest.split('/').map(str::trim) {
                if key.is_empty() {
                    return Err(ResolveError::EmptySegment(expr.to_string()));
                }
                keys.push(key.to_string());
            }
        }

        Ok(Self {
            title: title.to_string(),
            keys,
        })
    }

    pub fn has_keys(&self) -> bool {
        !self.keys.is_empty()
    }
}

impl FromStr for PathExpression {
    type Err = ResolveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for PathExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.title)?;
        for key in &self.keys {
            write!(f, "/{}", key)?;
        }
        Ok(())
    }
}
