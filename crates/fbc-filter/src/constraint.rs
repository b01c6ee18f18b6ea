//! Version range expressions evaluated against bundle versions.
//!
//! Accepted syntax:
//! - comparisons: `=`, `!=`, `>`, `>=`, `<`, `<=`, plus the aliases `==`,
//!   `=>` and `=<` (an operator may be
//!   separated from its version by whitespace, and versions may carry a
//!   leading `v`)
//! - caret and tilde ranges: `^1.2`, `~1.2.3`, `~>1.2`
//! - wildcards: `*`, `1.x`, `1.2.*`
//! - hyphen ranges: `1.0 - 1.4.5`
//! - conjunction with whitespace or `,`, disjunction with `||`
//!
//! A bare version means exact equality. Each comparator gates pre-releases
//! on its own: a pre-release version can only satisfy a comparator whose
//! version itself carries a pre-release, and is then compared in full
//! semver precedence. `!=` is not gated. Build metadata never matters.

use std::fmt;
use std::str::FromStr;

use fbc_core::version::BundleVersion;
use semver::{Comparator, Op, Version};

use crate::error::FilterError;

const OPERATOR_CHARS: &[char] = &['<', '>', '=', '!', '^', '~'];

/// A parsed version range expression.
#[derive(Debug, Clone)]
pub struct VersionConstraint {
    expr: String,
    alternatives: Vec<Alternative>,
}

/// One `||`-separated alternative: everything in `required` must match and
/// nothing in `excluded` may. `any` records a bare `*`, which matches every
/// release but no pre-release.
#[derive(Debug, Clone)]
struct Alternative {
    required: Vec<Comparator>,
    excluded: Vec<Comparator>,
    any: bool,
}

impl VersionConstraint {
    pub fn parse(expr: &str) -> Result<Self, FilterError> {
        let syntax = |reason: String| FilterError::InvalidRangeSyntax {
            range: expr.to_string(),
            reason,
        };
        let trimmed = expr.trim();
        if trimmed.is_empty() {
            return Err(syntax("empty version range".to_string()));
        }
        let alternatives = trimmed
            .split("||")
            .map(|alt| parse_alternative(alt).map_err(syntax))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            expr: trimmed.to_string(),
            alternatives,
        })
    }

    /// True if `version` falls within this range.
    pub fn satisfies(&self, version: &BundleVersion) -> bool {
        let v = version.as_semver();
        self.alternatives.iter().any(|alt| alt.matches(v))
    }

    pub fn as_str(&self) -> &str {
        &self.expr
    }
}

impl Alternative {
    fn matches(&self, v: &Version) -> bool {
        if self.any && !v.pre.is_empty() {
            return false;
        }
        self.required.iter().all(|c| admits_pre(c, v) && compare(c, v))
            && !self.excluded.iter().any(|c| compare(c, v))
    }
}

fn admits_pre(cmp: &Comparator, v: &Version) -> bool {
    v.pre.is_empty() || !cmp.pre.is_empty()
}

/// Evaluate one comparator by precedence alone, with no pre-release gate.
/// Missing minor or patch components act as wildcards.
fn compare(cmp: &Comparator, v: &Version) -> bool {
    match cmp.op {
        Op::Wildcard => same_release(cmp, v),
        Op::Exact => same_release(cmp, v) && v.pre == cmp.pre,
        Op::Greater => greater(cmp, v),
        Op::GreaterEq => greater(cmp, v) || (same_release(cmp, v) && v.pre == cmp.pre),
        Op::Less => less(cmp, v),
        Op::LessEq => less(cmp, v) || (same_release(cmp, v) && v.pre == cmp.pre),
        Op::Tilde => tilde(cmp, v),
        Op::Caret => caret(cmp, v),
        _ => false,
    }
}

fn same_release(cmp: &Comparator, v: &Version) -> bool {
    v.major == cmp.major
        && cmp.minor.map_or(true, |m| v.minor == m)
        && cmp.patch.map_or(true, |p| v.patch == p)
}

fn greater(cmp: &Comparator, v: &Version) -> bool {
    if v.major != cmp.major {
        return v.major > cmp.major;
    }
    let Some(minor) = cmp.minor else {
        return false;
    };
    if v.minor != minor {
        return v.minor > minor;
    }
    let Some(patch) = cmp.patch else {
        return false;
    };
    if v.patch != patch {
        return v.patch > patch;
    }
    v.pre > cmp.pre
}

fn less(cmp: &Comparator, v: &Version) -> bool {
    if v.major != cmp.major {
        return v.major < cmp.major;
    }
    let Some(minor) = cmp.minor else {
        return false;
    };
    if v.minor != minor {
        return v.minor < minor;
    }
    let Some(patch) = cmp.patch else {
        return false;
    };
    if v.patch != patch {
        return v.patch < patch;
    }
    v.pre < cmp.pre
}

fn tilde(cmp: &Comparator, v: &Version) -> bool {
    if v.major != cmp.major || cmp.minor.is_some_and(|m| v.minor != m) {
        return false;
    }
    match cmp.patch {
        Some(patch) if v.patch != patch => v.patch > patch,
        _ => v.pre >= cmp.pre,
    }
}

fn caret(cmp: &Comparator, v: &Version) -> bool {
    if v.major != cmp.major {
        return false;
    }
    let Some(minor) = cmp.minor else {
        return true;
    };
    let Some(patch) = cmp.patch else {
        return if cmp.major > 0 {
            v.minor >= minor
        } else {
            v.minor == minor
        };
    };
    if cmp.major > 0 {
        if v.minor != minor {
            return v.minor > minor;
        }
        if v.patch != patch {
            return v.patch > patch;
        }
    } else if minor > 0 {
        if v.minor != minor {
            return false;
        }
        if v.patch != patch {
            return v.patch > patch;
        }
    } else if v.minor != minor || v.patch != patch {
        return false;
    }
    v.pre >= cmp.pre
}

impl fmt::Display for VersionConstraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.expr)
    }
}

impl FromStr for VersionConstraint {
    type Err = FilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

fn parse_alternative(alt: &str) -> Result<Alternative, String> {
    let tokens: Vec<&str> = alt
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|t| !t.is_empty())
        .collect();
    if tokens.is_empty() {
        return Err("empty alternative between '||'".to_string());
    }

    let mut required = Vec::new();
    let mut excluded = Vec::new();
    let mut any = false;
    let mut i = 0;
    while i < tokens.len() {
        let token = tokens[i];

        if tokens.get(i + 1) == Some(&"-") {
            let upper = tokens
                .get(i + 2)
                .ok_or_else(|| format!("hyphen range {token:?} has no upper bound"))?;
            required.push(comparator(&format!(">={}", strip_v(token)))?);
            required.push(comparator(&format!("<={}", strip_v(upper)))?);
            i += 3;
            continue;
        }

        let (op, version) = if token.chars().all(|c| OPERATOR_CHARS.contains(&c)) {
            let version = tokens
                .get(i + 1)
                .ok_or_else(|| format!("operator {token:?} has no version"))?;
            i += 2;
            (token, *version)
        } else {
            i += 1;
            let split = token
                .find(|c: char| !OPERATOR_CHARS.contains(&c))
                .unwrap_or(token.len());
            token.split_at(split)
        };
        let version = strip_v(version);

        match op {
            "" if is_wildcard(version) && !version.contains('.') => any = true,
            "" if is_wildcard(version) => required.push(comparator(version)?),
            "" => required.push(comparator(&format!("={version}"))?),
            "!=" => excluded.push(comparator(&format!("={version}"))?),
            "~>" => required.push(comparator(&format!("~{version}"))?),
            "==" => required.push(comparator(&format!("={version}"))?),
            "=>" => required.push(comparator(&format!(">={version}"))?),
            "=<" => required.push(comparator(&format!("<={version}"))?),
            _ => required.push(comparator(&format!("{op}{version}"))?),
        }
    }

    Ok(Alternative {
        required,
        excluded,
        any,
    })
}

fn comparator(text: &str) -> Result<Comparator, String> {
    Comparator::parse(text).map_err(|e| format!("{text:?}: {e}"))
}

fn strip_v(version: &str) -> &str {
    version
        .strip_prefix('v')
        .or_else(|| version.strip_prefix('V'))
        .unwrap_or(version)
}

fn is_wildcard(version: &str) -> bool {
    version
        .split('.')
        .any(|part| matches!(part, "*" | "x" | "X"))
}
