use proptest::prelude::*;
use serde_json::{Value, json};

use ascent::config::UnknownRequirementPolicy;
use ascent::course::{CourseBuilder, CourseDocuments, Section, validate};

/// Arbitrary JSON values, shallow enough to keep cases fast.
fn arb_json() -> impl Strategy<Value = Value> + Clone {
    let leaf = prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(|n| json!(n)),
        any::<f64>().prop_map(|n| json!(n)),
        "[a-zA-Z0-9 _'-]{0,16}".prop_map(Value::String),
    ];
    leaf.prop_recursive(3, 24, 4, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..4).prop_map(Value::Array),
            prop::collection::btree_map("[a-z_]{1,10}", inner, 0..4)
                .prop_map(|m| Value::Object(m.into_iter().collect())),
        ]
    })
}

/// A document set where every section holds arbitrary records.
fn arb_docs() -> impl Strategy<Value = CourseDocuments> {
    let records = prop::collection::vec(arb_json(), 0..5);
    (
        records.clone(),
        records.clone(),
        records.clone(),
        records.clone(),
        records,
        arb_json(),
    )
        .prop_map(
            |(assignments, modules, quizzes, pages, outcomes, prereq_value)| {
                let mut docs = CourseDocuments::new();
                docs.set(Section::Assignments, json!({ "assignments": assignments }));
                docs.set(Section::Modules, json!({ "modules": modules }));
                docs.set(Section::Quizzes, json!({ "quizzes": quizzes }));
                docs.set(Section::Pages, json!({ "pages": pages }));
                docs.set(Section::Outcomes, json!({ "outcomes": outcomes }));
                docs.set(
                    Section::Prerequisites,
                    json!({ "prerequisites": prereq_value }),
                );
                docs
            },
        )
}

proptest! {
    #[test]
    fn test_validation_is_total_over_garbage(docs in arb_docs()) {
        let result = validate(&docs);
        prop_assert_eq!(result.is_valid, result.errors.is_empty());
    }

    #[test]
    fn test_validation_is_deterministic(docs in arb_docs()) {
        let first = validate(&docs);
        let second = validate(&docs);
        prop_assert_eq!(first.errors, second.errors);
        prop_assert_eq!(first.warnings, second.warnings);
    }

    #[test]
    fn test_build_is_total_when_not_rejecting(docs in arb_docs()) {
        // FailClosed and Ignore must absorb anything the loader can produce.
        CourseBuilder::new()
            .with_policy(UnknownRequirementPolicy::FailClosed)
            .build(&docs)
            .unwrap();
        CourseBuilder::new()
            .with_policy(UnknownRequirementPolicy::Ignore)
            .build(&docs)
            .unwrap();
    }
}
