//! SSH/SCP target parsing
//!
//! Long form follows the URI shape git accepts, extended with the
//! `ssh.head` and `ssh.tail` schemes:
//!
//! ```text
//! <scheme>://[user@]host[:port][/path]
//! ```
//!
//! Short form is the `[user@]host[:path]` alias understood by `ssh`, `scp`
//! and git, which is not a well-formed URI.
//!
//! A path keeps any leading `/` of its own, so `host/rel/path` is relative to
//! the login home while `host//abs/path` is absolute.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

static LONG_FORM: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(ssh(?:\.(?:head|tail))?|scp)://((?:([A-Za-z0-9]+)@)?([A-Za-z0-9.]+)(?::([0-9]{1,7}))?)(?:/(\S+))?$",
    )
    .expect("long form target pattern is valid")
});

static SHORT_FORM: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:([A-Za-z0-9]+)@)?([A-Za-z0-9.]+)(?::(\S+))?$")
        .expect("short form target pattern is valid")
});

/// A parsed remote endpoint.
///
/// `addr` is a cached `[user@]host[:port]` rendering. It is NOT kept in sync
/// when fields are edited; call [`Target::update_addr`] after any change to
/// `user`, `host` or `port`, otherwise [`Display`](fmt::Display) renders the
/// stale value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Target {
    pub scheme: String,
    pub user: Option<String>,
    pub host: String,
    pub port: Option<String>,
    pub path: Option<String>,
    pub addr: String,
}

fn non_empty(value: Option<&String>) -> Option<&str> {
    value.map(String::as_str).filter(|v| !v.is_empty())
}

impl Target {
    /// Parse the long form. Returns `None` when there is no host.
    pub fn parse(raw: &str) -> Option<Self> {
        let caps = LONG_FORM.captures(raw)?;
        let host = caps.get(4)?.as_str();

        Some(Target {
            scheme: caps[1].to_string(),
            user: caps.get(3).map(|m| m.as_str().to_string()),
            host: host.to_string(),
            port: caps.get(5).map(|m| m.as_str().to_string()),
            path: caps.get(6).map(|m| m.as_str().to_string()),
            addr: caps[2].to_string(),
        })
    }

    /// Parse the short form, tagging the result with `scheme`.
    ///
    /// Both the user (when an `@` is present) and the host must be non-empty,
    /// so `@host` and `user@:path` are rejected.
    pub fn parse_short(raw: &str, scheme: &str) -> Option<Self> {
        let caps = SHORT_FORM.captures(raw)?;
        let host = caps.get(2)?.as_str();

        let mut target = Target {
            scheme: scheme.to_string(),
            user: caps.get(1).map(|m| m.as_str().to_string()),
            host: host.to_string(),
            port: None,
            path: caps.get(3).map(|m| m.as_str().to_string()),
            addr: String::new(),
        };
        target.update_addr();
        Some(target)
    }

    /// Recompute `addr` from `user`, `host` and `port`. Empty when `host` is.
    pub fn update_addr(&mut self) {
        if self.host.is_empty() {
            self.addr.clear();
            return;
        }

        let mut addr = self.login();
        if let Some(port) = non_empty(self.port.as_ref()) {
            addr.push(':');
            addr.push_str(port);
        }
        self.addr = addr;
    }

    /// `[user@]host`, the destination form `ssh` and `scp` accept
    pub fn login(&self) -> String {
        match non_empty(self.user.as_ref()) {
            Some(user) => format!("{}@{}", user, self.host),
            None => self.host.clone(),
        }
    }

    /// Path with empty treated as absent
    pub fn path(&self) -> Option<&str> {
        non_empty(self.path.as_ref())
    }

    /// Port with empty treated as absent
    pub fn port(&self) -> Option<&str> {
        non_empty(self.port.as_ref())
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}://{}", self.scheme, self.addr)?;
        if let Some(path) = self.path() {
            write!(f, "/{}", path)?;
        }
        Ok(())
    }
}
