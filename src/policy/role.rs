use phf::phf_set;

/// Local parts that name a function rather than a person.
const ROLE_ACCOUNTS: phf::Set<&'static str> = phf_set! {
    "admin", "info", "support", "sales", "contact",
    "webmaster", "postmaster", "abuse", "hostmaster",
};

/// Drops any `+tag` suffix and internal dots, then lowercases.
pub(crate) fn canonical_local(local: &str) -> String {
    let base = local.split('+').next().unwrap_or_default();
    base.chars()
        .filter(|c| *c != '.')
        .flat_map(char::to_lowercase)
        .collect()
}

pub fn is_role_based(local: &str) -> bool {
    ROLE_ACCOUNTS.contains(canonical_local(local).as_str())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn canonical_strips_tag_and_dots() {
        assert_eq!(canonical_local("Web.Master+alerts"), "webmaster");
        assert_eq!(canonical_local("alice"), "alice");
        assert_eq!(canonical_local("+only-tag"), "");
    }

    #[test]
    fn detects_role_accounts() {
        assert!(is_role_based("admin"));
        assert!(is_role_based("INFO"));
        assert!(is_role_based("post.master"));
        assert!(is_role_based("admin+test"));
    }

    #[test]
    fn ignores_personal_mailboxes() {
        assert!(!is_role_based("alice"));
        assert!(!is_role_based("administrator"));
        assert!(!is_role_based("sales-team"));
        assert!(!is_role_based(""));
    }

    proptest! {
        #[test]
        fn role_with_any_tag_is_role_based(
            role in prop::sample::select(vec![
                "admin", "info", "support", "sales", "contact",
                "webmaster", "postmaster", "abuse", "hostmaster",
            ]),
            tag in "[A-Za-z0-9.+_-]{0,16}",
        ) {
            let local = format!("{role}+{tag}");
            prop_assert!(is_role_based(&local));
        }
    }
}
