//! Naming conventions shared across the bridge.
//!
//! The same logical name travels through three casing contexts: the schema's
//! object names (`UpperCamelCase`), its field names (`lowerCamelCase`) and the
//! command-style names used for tools and flags (`kebab-case`). Conversions
//! between them must be stable in both directions so that a type referenced
//! under one casing can always be found under another.

use heck::{ToKebabCase, ToLowerCamelCase, ToShoutySnakeCase, ToUpperCamelCase};

/// Name of the schema's root object.
pub const ROOT_OBJECT: &str = "Query";

/// Converts casing to the command convention (kebab).
pub fn cli_name(name: &str) -> String {
    name.to_kebab_case()
}

/// Converts casing to a schema object name.
pub fn gql_object_name(name: &str) -> String {
    name.to_upper_camel_case()
}

/// Converts casing to a schema field name.
pub fn gql_field_name(name: &str) -> String {
    name.to_lower_camel_case()
}

/// Environment variable consulted when hydrating a constructor argument.
///
/// `github` + `token` becomes `GITHUB_TOKEN`.
pub fn env_var_name(module: &str, argument: &str) -> String {
    format!(
        "{}_{}",
        module.to_shouty_snake_case(),
        argument.to_shouty_snake_case()
    )
}

/// Whether two names refer to the same schema object regardless of casing.
pub fn same_object_name(a: &str, b: &str) -> bool {
    gql_object_name(a) == gql_object_name(b)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_name() {
        assert_eq!(cli_name("issueList"), "issue-list");
        assert_eq!(cli_name("IssueList"), "issue-list");
        assert_eq!(cli_name("issue_list"), "issue-list");
    }

    #[test]
    fn test_round_trip_between_casings() {
        for name in ["issueList", "pullRequestCreate", "scan"] {
            let kebab = cli_name(name);
            assert_eq!(gql_field_name(&kebab), name);
        }
        assert_eq!(gql_object_name(&cli_name("PullRequest")), "PullRequest");
    }

    #[test]
    fn test_object_and_field_names() {
        assert_eq!(gql_object_name("github"), "Github");
        assert_eq!(gql_object_name("my-module"), "MyModule");
        assert_eq!(gql_field_name("MyModule"), "myModule");
        assert_eq!(gql_object_name(ROOT_OBJECT), ROOT_OBJECT);
    }

    #[test]
    fn test_env_var_name() {
        assert_eq!(env_var_name("github", "token"), "GITHUB_TOKEN");
        assert_eq!(env_var_name("trufflehog", "apiToken"), "TRUFFLEHOG_API_TOKEN");
        assert_eq!(env_var_name("my-mod", "key"), "MY_MOD_KEY");
    }

    #[test]
    fn test_same_object_name() {
        assert!(same_object_name("pull-request", "PullRequest"));
        assert!(same_object_name("pullRequest", "PullRequest"));
        assert!(!same_object_name("Issue", "Issues"));
    }
}
