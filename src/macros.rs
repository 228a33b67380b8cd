//! Module for expanding `${NAME}` and `$NAME` macros in
//! user supplied strings.
use regex::{Captures, Regex};
use std::{collections::BTreeMap, sync::LazyLock};

/// A mapping from variable name to value, used both for
/// environment variables and build variables.
pub type EnvVars = BTreeMap<String, String>;

// `$$` is an escaped dollar sign.
static VARIABLE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\$([A-Za-z0-9_]+|\{[A-Za-z0-9_.]+\}|\$)").expect("macro pattern is valid")
});

/// Replaces the macros in `value` with the values found in `vars`.
/// Macros that cannot be resolved are left untouched.
///
/// # Examples
///
/// ```
/// use devenv::macros::{replace_macro, EnvVars};
///
/// let mut vars = EnvVars::new();
/// vars.insert("CONFIG".to_string(), "Release".to_string());
/// assert_eq!(replace_macro("${CONFIG}|$PLATFORM", &vars), "Release|$PLATFORM");
/// ```
pub fn replace_macro(value: &str, vars: &EnvVars) -> String {
    replace_macro_layered(value, &[vars])
}

/// Replaces the macros in `value` by looking them up in each of the
/// `layers` in order, the first layer that defines a name wins.
///
/// The input is scanned once, text inserted by a substitution is never
/// scanned again.
pub fn replace_macro_layered(value: &str, layers: &[&EnvVars]) -> String {
    VARIABLE
        .replace_all(value, |caps: &Captures| {
            let key = &caps[1];
            if key == "$" {
                return "$".to_string();
            }
            let name = key
                .strip_prefix('{')
                .and_then(|k| k.strip_suffix('}'))
                .unwrap_or(key);
            layers
                .iter()
                .find_map(|vars| vars.get(name))
                .cloned()
                .unwrap_or_else(|| caps[0].to_string())
        })
        .into_owned()
}

// ////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
// Unit tests of the private functions and methods
// ////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
#[cfg(test)]
mod test {
    use super::*;

    fn vars(pairs: &[(&str, &str)]) -> EnvVars {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_replace_macro_both_syntaxes() {
        let env = vars(&[("WORKSPACE", "C:\\ws"), ("build.number", "42")]);
        assert_eq!(
            replace_macro("$WORKSPACE\\out\\${build.number}", &env),
            "C:\\ws\\out\\42"
        );
    }

    #[test]
    fn test_replace_macro_unresolved_is_left_untouched() {
        let env = vars(&[("A", "a")]);
        assert_eq!(replace_macro("${MISSING}-$ALSO_MISSING-$A", &env), "${MISSING}-$ALSO_MISSING-a");
    }

    #[test]
    fn test_replace_macro_escaped_dollar() {
        let env = vars(&[("A", "a")]);
        assert_eq!(replace_macro("$$A costs $$", &env), "$A costs $");
    }

    #[test]
    fn test_replace_macro_does_not_rescan_substitutions() {
        let env = vars(&[("A", "${B}"), ("B", "b")]);
        assert_eq!(replace_macro("${A}", &env), "${B}");
    }

    #[test]
    fn test_replace_macro_layered_first_layer_wins() {
        let env = vars(&[("CONFIG", "FromEnv"), ("X", "${PLATFORM}")]);
        let build = vars(&[("CONFIG", "FromBuild"), ("PLATFORM", "x64")]);
        assert_eq!(
            replace_macro_layered("${CONFIG}|${PLATFORM}|${X}", &[&env, &build]),
            "FromEnv|x64|${PLATFORM}"
        );
    }
}
