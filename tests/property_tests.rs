/// Property-based tests using proptest
/// Tests invariants of score extraction, tiering and inspection ordering
use lead_score_redirect::models::CustomField;
use lead_score_redirect::scoring::{
    inspect_fields, is_potential_match, parse_score, NoopObserver, ScoreClassifier, Tier,
    TierBounds,
};
use proptest::prelude::*;

const FIELD_ID: &str = "0NBOPMGYmmBJDGqAACk6";

fn arb_field() -> impl Strategy<Value = CustomField> {
    (
        "[a-zA-Z0-9]{1,8}",
        prop::sample::select(vec!["City", "Notes", "quality", "00__budget", "Lead score", "Beds"]),
        prop_oneof!["[a-z ]{0,8}", (0i64..60).prop_map(|n| n.to_string())],
    )
        .prop_map(|(id, name, value)| CustomField::new(id, name, value))
}

// Property: parsing never panics
proptest! {
    #[test]
    fn parse_score_never_panics(value in "\\PC*") {
        let _ = parse_score(&value);
    }

    #[test]
    fn numeric_values_pass_through(v in -1000i64..1000) {
        prop_assert_eq!(parse_score(&v.to_string()), v);
    }
}

// Property: classifier returns the matched field's value, or 0
proptest! {
    #[test]
    fn matched_field_value_is_the_score(
        mut fields in prop::collection::vec(arb_field(), 0..6),
        v in 0i64..=30,
        position in 0usize..6
    ) {
        fields.retain(|f| f.id != FIELD_ID);
        let at = position.min(fields.len());
        fields.insert(at, CustomField::new(FIELD_ID, "00__quality_score", v.to_string()));

        let bounds = TierBounds::new(11, 21).unwrap();
        let decision = ScoreClassifier::new(FIELD_ID, bounds).classify(&fields, &NoopObserver);
        prop_assert_eq!(decision.quality_score, v);
    }

    #[test]
    fn no_match_means_zero(fields in prop::collection::vec(arb_field(), 0..8)) {
        let fields: Vec<CustomField> = fields.into_iter().filter(|f| f.id != FIELD_ID).collect();

        let bounds = TierBounds::new(10, 21).unwrap();
        let decision = ScoreClassifier::new(FIELD_ID, bounds)
            .with_fallback_name("no field has this name")
            .classify(&fields, &NoopObserver);
        prop_assert_eq!(decision.quality_score, 0);
        prop_assert_eq!(decision.tier, Tier::NeedsNurture);
    }

    #[test]
    fn non_numeric_value_means_zero(value in "[a-zA-Z ]{0,12}") {
        let fields = vec![CustomField::new(FIELD_ID, "00__quality_score", value)];
        let bounds = TierBounds::new(11, 21).unwrap();
        let decision = ScoreClassifier::new(FIELD_ID, bounds).classify(&fields, &NoopObserver);
        prop_assert_eq!(decision.quality_score, 0);
    }
}

// Property: tiering is monotonic in the score
proptest! {
    #[test]
    fn tiers_follow_bounds(low in -50i64..50, span in 0i64..50, score in -200i64..200) {
        let high = low + span;
        let bounds = TierBounds::new(low, high).unwrap();
        let expected = if score >= high {
            Tier::Qualified
        } else if score >= low {
            Tier::LenderLead
        } else {
            Tier::NeedsNurture
        };
        prop_assert_eq!(bounds.classify(score), expected);
    }

    #[test]
    fn higher_score_never_lowers_tier(low in 0i64..20, span in 0i64..20, a in -10i64..50, b in -10i64..50) {
        let rank = |t: Tier| match t {
            Tier::NeedsNurture => 0,
            Tier::LenderLead => 1,
            Tier::Qualified => 2,
        };
        let bounds = TierBounds::new(low, low + span).unwrap();
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        prop_assert!(rank(bounds.classify(lo)) <= rank(bounds.classify(hi)));
    }
}

// Property: inspection is a stable partition
proptest! {
    #[test]
    fn inspection_is_stable_partition(fields in prop::collection::vec(arb_field(), 0..12)) {
        // Tag each field with its position so order can be checked
        let fields: Vec<CustomField> = fields
            .into_iter()
            .enumerate()
            .map(|(i, f)| CustomField::new(format!("{}-{}", i, f.id), f.name, f.value))
            .collect();

        let inspected = inspect_fields(&fields);
        prop_assert_eq!(inspected.len(), fields.len());

        let split = inspected.iter().take_while(|f| f.potential_match).count();
        prop_assert!(inspected[split..].iter().all(|f| !f.potential_match));

        let expected_matches: Vec<&str> = fields
            .iter()
            .filter(|f| is_potential_match(f))
            .map(|f| f.id.as_str())
            .collect();
        let expected_others: Vec<&str> = fields
            .iter()
            .filter(|f| !is_potential_match(f))
            .map(|f| f.id.as_str())
            .collect();

        let got_matches: Vec<&str> = inspected[..split].iter().map(|f| f.id.as_str()).collect();
        let got_others: Vec<&str> = inspected[split..].iter().map(|f| f.id.as_str()).collect();
        prop_assert_eq!(got_matches, expected_matches);
        prop_assert_eq!(got_others, expected_others);
    }
}
