/// Unit tests for quality score classification
/// Covers the redirect decision for both tier profiles
use lead_score_redirect::models::CustomField;
use lead_score_redirect::scoring::{
    LookupMethod, NoopObserver, RedirectTable, ScoreClassifier, Tier, TierProfile,
    DEFAULT_SCORE_FIELD_ID, DEFAULT_SCORE_FIELD_NAME,
};

fn score_field(value: &str) -> Vec<CustomField> {
    vec![
        CustomField::new("a1", "City", "Austin"),
        CustomField::new(DEFAULT_SCORE_FIELD_ID, DEFAULT_SCORE_FIELD_NAME, value),
    ]
}

fn classify(profile: TierProfile, value: &str) -> (i64, Tier) {
    let decision = ScoreClassifier::new(DEFAULT_SCORE_FIELD_ID, profile.bounds)
        .classify(&score_field(value), &NoopObserver);
    (decision.quality_score, decision.tier)
}

#[cfg(test)]
mod standard_profile_tests {
    use super::*;

    #[test]
    fn test_qualified_scenario() {
        assert_eq!(classify(TierProfile::standard(), "25"), (25, Tier::Qualified));
    }

    #[test]
    fn test_boundaries() {
        let profile = TierProfile::standard;
        assert_eq!(classify(profile(), "0").1, Tier::NeedsNurture);
        assert_eq!(classify(profile(), "10").1, Tier::NeedsNurture);
        assert_eq!(classify(profile(), "11").1, Tier::LenderLead);
        assert_eq!(classify(profile(), "15").1, Tier::LenderLead);
        assert_eq!(classify(profile(), "20").1, Tier::LenderLead);
        assert_eq!(classify(profile(), "21").1, Tier::Qualified);
        assert_eq!(classify(profile(), "30").1, Tier::Qualified);
    }
}

#[cfg(test)]
mod diagnostic_profile_tests {
    use super::*;

    #[test]
    fn test_qualified_scenario() {
        assert_eq!(
            classify(TierProfile::diagnostic(), "25"),
            (25, Tier::Qualified)
        );
    }

    #[test]
    fn test_boundaries() {
        let profile = TierProfile::diagnostic;
        assert_eq!(classify(profile(), "9").1, Tier::NeedsNurture);
        assert_eq!(classify(profile(), "10").1, Tier::LenderLead);
        assert_eq!(classify(profile(), "15").1, Tier::LenderLead);
        assert_eq!(classify(profile(), "20").1, Tier::LenderLead);
        assert_eq!(classify(profile(), "21").1, Tier::Qualified);
    }
}

#[cfg(test)]
mod lookup_tests {
    use super::*;

    #[test]
    fn test_unparseable_value_scores_zero() {
        assert_eq!(classify(TierProfile::standard(), "N/A"), (0, Tier::NeedsNurture));
        assert_eq!(classify(TierProfile::standard(), ""), (0, Tier::NeedsNurture));
    }

    #[test]
    fn test_missing_field_scores_zero() {
        let fields = vec![CustomField::new("a1", "City", "Austin")];
        let classifier = ScoreClassifier::new(DEFAULT_SCORE_FIELD_ID, TierProfile::standard().bounds)
            .with_fallback_name(DEFAULT_SCORE_FIELD_NAME);

        let decision = classifier.classify(&fields, &NoopObserver);
        assert_eq!(decision.quality_score, 0);
        assert_eq!(decision.matched_by, None);
    }

    #[test]
    fn test_name_fallback_requires_exact_match() {
        let fields = vec![
            CustomField::new("x", "00__Quality_Score", "25"),
            CustomField::new("y", DEFAULT_SCORE_FIELD_NAME, "18"),
        ];
        let decision = ScoreClassifier::new(DEFAULT_SCORE_FIELD_ID, TierProfile::standard().bounds)
            .with_fallback_name(DEFAULT_SCORE_FIELD_NAME)
            .classify(&fields, &NoopObserver);

        assert_eq!(decision.quality_score, 18);
        assert_eq!(decision.matched_by, Some(LookupMethod::ByName));
        assert_eq!(decision.tier, Tier::LenderLead);
    }

    #[test]
    fn test_decision_maps_to_redirect() {
        let table = RedirectTable {
            qualified: "a".to_string(),
            lender: "b".to_string(),
            nurture: "c".to_string(),
        };
        let (_, tier) = classify(TierProfile::standard(), "21");
        assert_eq!(table.url_for(tier), "a");
        let (_, tier) = classify(TierProfile::standard(), "11");
        assert_eq!(table.url_for(tier), "b");
        let (_, tier) = classify(TierProfile::standard(), "3");
        assert_eq!(table.url_for(tier), "c");
    }
}
