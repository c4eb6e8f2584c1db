pub mod account;
pub mod admin;
pub mod admin_group;
pub mod auth_attempt;
pub mod facility;
pub mod session;
pub mod status;
pub mod user;

pub use account::Account;
pub use admin::Admin;
pub use admin_group::AdminGroup;
pub use auth_attempt::AuthAttempt;
pub use facility::Facility;
pub use session::Session;
pub use status::Status;
pub use user::User;

/// Build a URL-safe identifier from free text: lowercase alphanumerics with
/// single dashes between words.
pub fn slugify(input: &str) -> String {
    let mut slug = String::with_capacity(input.len());
    let mut pending_dash = false;

    for c in input.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(c.to_ascii_lowercase());
        } else {
            pending_dash = true;
        }
    }

    slug
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slugify_lowercases_and_dashes() {
        assert_eq!(slugify("Account Happy"), "account-happy");
        assert_eq!(slugify("Root"), "root");
    }

    #[test]
    fn slugify_collapses_separator_runs() {
        assert_eq!(slugify("  Sales -- Team  "), "sales-team");
        assert_eq!(slugify("a__b"), "a-b");
    }

    #[test]
    fn slugify_drops_non_ascii_punctuation() {
        assert_eq!(slugify("Café #1"), "caf-1");
        assert_eq!(slugify(""), "");
    }
}
