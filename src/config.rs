use anyhow::{Context, Result, bail};
use std::path::{Path, PathBuf};

use crate::client::{ClientConfig, DEFAULT_BASE_URL};

#[derive(Debug, Default, PartialEq)]
struct RcConfig {
    url: Option<String>,
    key: Option<String>,
    verify: Option<bool>,
}

pub(crate) const ENV_URL: &str = "PREMIUMIZE_URL";
pub(crate) const ENV_API_KEY: &str = "PREMIUMIZE_API_KEY";
pub(crate) const ENV_RC: &str = "PREMIUMIZE_RC";
const RC_FILE: &str = ".premiumizerc";

/// Places configuration is read from besides explicit arguments.
pub(crate) struct Sources<'a> {
    pub(crate) env: &'a dyn Fn(&str) -> Option<String>,
    pub(crate) cwd: Option<PathBuf>,
    pub(crate) home: Option<PathBuf>,
}

impl Sources<'_> {
    fn var(&self, name: &str) -> Option<String> {
        (self.env)(name).filter(|v| !v.trim().is_empty())
    }
}

pub(crate) fn load_config(
    base_url: Option<String>,
    token: Option<String>,
    verify: Option<bool>,
) -> Result<ClientConfig> {
    let env = |name: &str| std::env::var(name).ok();
    let sources = Sources {
        env: &env,
        cwd: std::env::current_dir().ok(),
        home: dirs::home_dir(),
    };
    resolve_config(base_url, token, verify, &sources)
}

/// Only the API key is mandatory; the URL falls back to the production root
/// and TLS verification stays on unless something turns it off.
pub(crate) fn resolve_config(
    base_url: Option<String>,
    token: Option<String>,
    verify: Option<bool>,
    sources: &Sources<'_>,
) -> Result<ClientConfig> {
    let mut base_url = base_url.or_else(|| sources.var(ENV_URL));
    let mut token = token.or_else(|| sources.var(ENV_API_KEY));

    let rc_candidates = rc_candidates(sources);
    let mut file_verify: Option<bool> = None;

    // First existing rc file only; it never overrides arguments or env.
    if base_url.is_none() || token.is_none() || verify.is_none() {
        if let Some(rc_path) = rc_candidates.iter().find(|p| p.exists()) {
            let rc = read_rc(rc_path)
                .with_context(|| format!("failed to read {}", rc_path.display()))?;
            base_url = base_url.or(rc.url);
            token = token.or(rc.key);
            file_verify = rc.verify;
        }
    }

    let token = match token.as_deref().map(str::trim) {
        Some(t) if !t.is_empty() => t.to_string(),
        _ => {
            let searched = if rc_candidates.is_empty() {
                format!("no {} location available", RC_FILE)
            } else {
                rc_candidates
                    .iter()
                    .map(|p| p.display().to_string())
                    .collect::<Vec<_>>()
                    .join(", ")
            };
            bail!(
                "no premiumize API key found: pass one explicitly, set {}, or add `key: <apikey>` to an rc file (searched: {})",
                ENV_API_KEY,
                searched
            );
        }
    };

    let mut cfg = ClientConfig::new(token);
    cfg.base_url = base_url.unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
    cfg.verify = verify.or(file_verify).unwrap_or(true);
    Ok(cfg)
}

fn read_rc(path: &Path) -> Result<RcConfig> {
    let text = std::fs::read_to_string(path)?;
    Ok(parse_rc(&text))
}

fn parse_rc(text: &str) -> RcConfig {
    let mut cfg = RcConfig::default();

    // `key:` may stand alone with the value on the next line.
    let mut pending_key: Option<&str> = None;

    for raw in text.lines() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        if let Some(pk) = pending_key.take() {
            // A URL value contains ':' itself, so only a known key ends continuation.
            if !is_rc_key_line(line) {
                let v = strip_quotes(line);
                match pk {
                    "url" => cfg.url = Some(v.to_string()),
                    "key" => cfg.key = Some(v.to_string()),
                    _ => {}
                }
                continue;
            }
        }

        if let Some((k, v)) = line.split_once(':') {
            let k = k.trim();
            let v = strip_quotes(v.trim());
            match k {
                "url" => {
                    if !v.is_empty() {
                        cfg.url = Some(v.to_string());
                    } else {
                        pending_key = Some("url");
                    }
                }
                "key" => {
                    if !v.is_empty() {
                        cfg.key = Some(v.to_string());
                    } else {
                        pending_key = Some("key");
                    }
                }
                "verify" => {
                    if !v.is_empty() {
                        cfg.verify = Some(v != "0");
                    }
                }
                _ => {}
            }
        }
    }

    cfg
}

fn is_rc_key_line(line: &str) -> bool {
    line.split_once(':')
        .map(|(k, _)| matches!(k.trim(), "url" | "key" | "verify"))
        .unwrap_or(false)
}

fn strip_quotes(s: &str) -> &str {
    let s = s.trim();
    if (s.starts_with('"') && s.ends_with('"') && s.len() >= 2)
        || (s.starts_with('\'') && s.ends_with('\'') && s.len() >= 2)
    {
        &s[1..s.len() - 1]
    } else {
        s
    }
}

/// `$PREMIUMIZE_RC` alone when set, else the working directory then home.
fn rc_candidates(sources: &Sources<'_>) -> Vec<PathBuf> {
    if let Some(p) = sources.var(ENV_RC) {
        return vec![PathBuf::from(p)];
    }

    [&sources.cwd, &sources.home]
        .into_iter()
        .flatten()
        .map(|dir| dir.join(RC_FILE))
        .collect()
}
