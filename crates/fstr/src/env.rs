//! Environment hooks: `NO_COLOR` detection and `$VAR` expansion.

use std::borrow::Cow;

/// Disables colors when set to a non-empty value (<https://no-color.org/>).
pub const NO_COLOR: &str = "NO_COLOR";

/// Overrides the default parse-cache capacity.
pub const CACHE_CAPACITY: &str = "FSTR_CACHE_CAPACITY";

/// Enables environment expansion of rendered output (`1`, `true`, `yes`).
pub const EXPAND_ENV: &str = "FSTR_EXPAND_ENV";

/// Returns `true` if `NO_COLOR` is set to a non-empty value.
pub fn no_color() -> bool {
    std::env::var_os(NO_COLOR).is_some_and(|value| !value.is_empty())
}

/// Reads a boolean flag variable. Unset or unrecognised values are `None`.
pub(crate) fn flag(name: &str) -> Option<bool> {
    let value = std::env::var(name).ok()?;
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" | "" => Some(false),
        other => {
            tracing::debug!(var = name, value = other, "ignoring unrecognised flag value");
            None
        }
    }
}

/// Expands `$VAR` and `${VAR}` from the process environment.
///
/// Unset variables expand to nothing, `$$` is a literal `$`, and a `$` not
/// followed by a name is kept as is.
pub fn expand_env(text: &str) -> Cow<'_, str> {
    expand_with(text, |name| std::env::var(name).ok())
}

/// Same as [`expand_env`] with a custom variable lookup.
///
/// ```rust
/// use fstr::expand_with;
///
/// let lookup = |name: &str| (name == "USER").then(|| "ada".to_string());
/// assert_eq!(expand_with("hi $USER, ${USER}! $$5 $NOPE.", lookup), "hi ada, ada! $5 .");
/// ```
pub fn expand_with<F>(text: &str, lookup: F) -> Cow<'_, str>
where
    F: Fn(&str) -> Option<String>,
{
    if !text.contains('$') {
        return Cow::Borrowed(text);
    }

    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(dollar) = rest.find('$') {
        out.push_str(&rest[..dollar]);
        let after = &rest[dollar + 1..];

        if let Some(tail) = after.strip_prefix('$') {
            out.push('$');
            rest = tail;
        } else if let Some(braced) = after.strip_prefix('{') {
            match braced.find('}') {
                Some(end) => {
                    if let Some(value) = lookup(&braced[..end]) {
                        out.push_str(&value);
                    }
                    rest = &braced[end + 1..];
                }
                None => {
                    out.push('$');
                    rest = after;
                }
            }
        } else {
            let len = after
                .bytes()
                .take_while(|b| b.is_ascii_alphanumeric() || *b == b'_')
                .count();
            if len == 0 {
                out.push('$');
            } else if let Some(value) = lookup(&after[..len]) {
                out.push_str(&value);
            }
            rest = &after[len..];
        }
    }
    out.push_str(rest);
    Cow::Owned(out)
}

/// Snapshot of environment variables, put back as they were on drop.
#[cfg(test)]
pub(crate) struct EnvSnapshot {
    saved: Vec<(&'static str, Option<std::ffi::OsString>)>,
}

#[cfg(test)]
impl EnvSnapshot {
    pub(crate) fn take(names: &[&'static str]) -> Self {
        Self {
            saved: names.iter().map(|name| (*name, std::env::var_os(name))).collect(),
        }
    }
}

#[cfg(test)]
impl Drop for EnvSnapshot {
    fn drop(&mut self) {
        for (name, value) in &self.saved {
            match value {
                Some(value) => std::env::set_var(name, value),
                None => std::env::remove_var(name),
            }
        }
    }
}
