use std::collections::HashMap;

use crate::error::NimbusError;

/// Values substituted into a descriptor's URI template.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PathParams(HashMap<String, String>);

impl PathParams {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style [`insert`](Self::insert).
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.0.insert(name.into(), value.into());
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for PathParams {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

impl<K: Into<String>, V: Into<String>, const N: usize> From<[(K, V); N]> for PathParams {
    fn from(pairs: [(K, V); N]) -> Self {
        pairs.into_iter().collect()
    }
}

/// Substitute `{name}` and `{*name}` placeholders in `template`.
///
/// `{name}` values are percent-encoded so that only RFC 3986 unreserved
/// characters survive; `/` becomes `%2F`. `{*name}` values are inserted as-is
/// and may span several path segments. A `{` without a closing `}` and the
/// empty `{}` are copied unchanged.
///
/// # Errors
///
/// Returns [`NimbusError::MissingPathParameter`] naming the first placeholder
/// without a value.
pub fn render_path(template: &str, params: &PathParams) -> Result<String, NimbusError> {
    let mut rendered = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        rendered.push_str(&rest[..open]);
        let after_open = &rest[open + 1..];

        let Some(close) = after_open.find('}') else {
            rendered.push_str(&rest[open..]);
            return Ok(rendered);
        };

        if close == 0 {
            rendered.push('{');
            rest = after_open;
            continue;
        }

        let placeholder = &after_open[..close];
        let (greedy, key) = match placeholder.strip_prefix('*') {
            Some(key) => (true, key),
            None => (false, placeholder),
        };

        let value = params
            .get(key)
            .ok_or_else(|| NimbusError::MissingPathParameter(key.to_owned()))?;

        if greedy {
            rendered.push_str(value);
        } else {
            rendered.push_str(&urlencoding::encode(value));
        }

        rest = &after_open[close + 1..];
    }

    rendered.push_str(rest);
    Ok(rendered)
}
