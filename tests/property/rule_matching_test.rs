//! Property-based tests for URL rule matching.

use gitlab_reporter::managers::rule_manager::match_url;
use gitlab_reporter::types::rule::Rule;
use proptest::prelude::*;

fn arb_fragment() -> impl Strategy<Value = String> {
    "[a-z]{1,8}"
}

// **Property 3: The first containing rule wins**
//
// For any rule list and URL, the matched rule is the earliest rule whose url
// is a substring of the URL, and no earlier rule matches.
proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn match_returns_first_containing_rule(
        fragments in proptest::collection::vec(arb_fragment(), 1..10),
        url in "https://[a-z]{0,20}\\.example\\.com/[a-z]{0,10}",
    ) {
        let rules: Vec<Rule> = fragments
            .iter()
            .enumerate()
            .map(|(i, f)| Rule::new(f.clone(), format!("p{}", i)))
            .collect();

        let expected = rules.iter().position(|r| url.contains(&r.url));
        let matched = match_url(&url, &rules);

        match expected {
            Some(index) => {
                let rule = matched.expect("a rule contains the url");
                prop_assert_eq!(&rule.id, &rules[index].id);
            }
            None => prop_assert!(matched.is_none()),
        }
    }

    #[test]
    fn rule_matches_urls_containing_it(
        prefix in "https://[a-z]{1,10}/",
        fragment in arb_fragment(),
        suffix in "[a-z/]{0,10}",
    ) {
        let rules = vec![Rule::new(fragment.clone(), "web")];
        let url = format!("{}{}{}", prefix, fragment, suffix);
        prop_assert!(match_url(&url, &rules).is_some());
    }

    #[test]
    fn empty_url_rules_never_match(url in "[a-z:/.]{0,30}") {
        let rules = vec![Rule::new("", "web")];
        prop_assert!(match_url(&url, &rules).is_none());
    }
}
