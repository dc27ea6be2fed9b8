use pick_key::{
    brand_candidate_keys, candidate_keys, derive_logo_key, derive_menu_key,
    derive_menu_key_for_file, KeyDigest, KeyResolver, LoadOutcome, Reported, ResolutionState,
    MENU_EXTENSION,
};
use pretty_assertions::assert_eq;
use proptest::prelude::*;
use unicode_normalization::UnicodeNormalization;

fn hex(raw: &str) -> String {
    KeyDigest::of_raw(raw).to_string()
}

#[test]
fn empty_identifier_regression_fixture() {
    assert_eq!(derive_menu_key("").as_str(), "811c9dc5050c5d1f.webp");
    assert_eq!(derive_menu_key("   ,, ").as_str(), "811c9dc5050c5d1f.webp");
}

#[test]
fn scenario_a_golden_olive_candidates() {
    let keys = candidate_keys("황금올리브치킨", "");
    let stems = keys.stems();
    assert_eq!(stems[0], derive_menu_key("황금올리브치킨").stem());
    assert_eq!(stems, vec![hex("황금올리브치킨"), hex("황금올리브")]);
}

#[test]
fn scenario_b_trailing_comma_upload_matches_row() {
    let uploaded = derive_menu_key_for_file("양념치킨, .jpg");
    let candidates = candidate_keys("양념치킨,", "");
    assert_eq!(candidates.keys(MENU_EXTENSION)[0], uploaded);
}

#[test]
fn scenario_c_logo_upload_keys() {
    assert_eq!(derive_logo_key("bbq.svg").unwrap().as_str(), "brand_bbq.svg");
    let korean = derive_logo_key("교촌.svg").unwrap();
    assert_eq!(korean.as_str(), format!("brand_{}.svg", hex("교촌")));
    // and the render side finds it as the second brand candidate
    assert_eq!(brand_candidate_keys("kyochon", "교촌")[1], korean);
}

#[test]
fn scenario_d_third_candidate_loads() {
    let mut resolver = KeyResolver::new(vec!["one", "two", "three"]);
    let token = resolver.token();
    let outcomes = [LoadOutcome::Failed, LoadOutcome::Failed, LoadOutcome::Loaded];
    let mut attempted = Vec::new();

    resolver.start().unwrap();
    for outcome in outcomes {
        attempted.push(*resolver.current().unwrap());
        resolver.report(token, outcome).unwrap();
    }

    assert_eq!(attempted, vec!["one", "two", "three"]);
    assert_eq!(resolver.state(), ResolutionState::Loaded(2));
    assert_eq!(resolver.attempts(), 3);
}

#[test]
fn brand_prefix_word_boundary() {
    assert!(!candidate_keys("bbqtreat", "bbq").stems().contains(&hex("treat")));
    assert!(candidate_keys("bbq_treat", "bbq").stems().contains(&hex("treat")));
}

proptest! {
    #[test]
    fn prop_surrounding_whitespace_and_trailing_commas_ignored(
        core in "[가-힣a-zA-Z0-9 ,_]{0,12}",
        lead in "[ \t]{0,3}",
        tail in "[ ,\t]{0,4}",
    ) {
        let padded = format!("{lead}{core}{tail}");
        prop_assert_eq!(derive_menu_key(&core), derive_menu_key(&padded));
    }

    #[test]
    fn prop_nfc_and_nfd_agree(s in "[가-힣a-zA-Z\u{e9}\u{e0}\u{f1} ]{0,12}") {
        let composed: String = s.nfc().collect();
        let decomposed: String = s.nfd().collect();
        prop_assert_eq!(derive_menu_key(&composed), derive_menu_key(&decomposed));
    }

    #[test]
    fn prop_derivation_is_deterministic(s in "\\PC{0,24}") {
        let a = derive_menu_key(&s);
        let b = derive_menu_key(&s);
        prop_assert_eq!(a.stem().len(), 16);
        prop_assert_eq!(a, b);
    }

    #[test]
    fn prop_candidates_stable_and_unique(
        id in "[가-힣a-zA-Z0-9 ,_!]{0,16}",
        brand in prop_oneof![Just(""), Just("bbq"), Just("bhc"), Just("kyochon")],
    ) {
        let first = candidate_keys(&id, brand).stems();
        let second = candidate_keys(&id, brand).stems();
        prop_assert_eq!(&first, &second);
        prop_assert!(!first.is_empty());

        let mut unique = first.clone();
        unique.sort();
        unique.dedup();
        prop_assert_eq!(unique.len(), first.len());
    }

    #[test]
    fn prop_resolver_never_skips_ahead(
        count in 1usize..6,
        success_at in proptest::option::of(0usize..6),
    ) {
        let candidates: Vec<usize> = (0..count).collect();
        let mut resolver = KeyResolver::new(candidates);
        let token = resolver.token();
        resolver.start().unwrap();

        let mut seen = Vec::new();
        while let Some(&current) = resolver.current() {
            if resolver.state().is_terminal() {
                break;
            }
            seen.push(current);
            let outcome = if Some(current) == success_at {
                LoadOutcome::Loaded
            } else {
                LoadOutcome::Failed
            };
            prop_assert!(matches!(resolver.report(token, outcome), Ok(Reported::Applied(_))));
        }

        let expected_len = match success_at {
            Some(i) if i < count => i + 1,
            _ => count,
        };
        prop_assert_eq!(seen, (0..expected_len).collect::<Vec<_>>());
    }
}
