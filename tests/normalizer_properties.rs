// Property-based tests for issue normalization
// Any JSON in any field must normalize to a record, never a panic

use proptest::prelude::*;
use serde_json::{Map, Value};
use sprint_metrics::{FieldMapping, IssueNormalizer, RawIssue};

const FIELDS: &[&str] = &[
    "summary",
    "issuetype",
    "status",
    "labels",
    "assignee",
    "created",
    "customfield_10016",
    "customfield_10100",
    "customfield_10101",
    "customfield_10102",
    "customfield_10103",
    "customfield_10001",
];

fn json_strategy() -> impl Strategy<Value = Value> {
    let leaf = prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::from),
        any::<i64>().prop_map(Value::from),
        (-1e6f64..1e6).prop_map(Value::from),
        "[ -~]{0,24}".prop_map(Value::from),
        Just(Value::from("Sprint 12")),
        Just(Value::from("2024-06-10T10:00:00.000+0900")),
    ];
    leaf.prop_recursive(3, 16, 4, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..4).prop_map(Value::Array),
            prop::collection::vec((prop_oneof![Just("name"), Just("value"), Just("displayName")], inner), 0..3)
                .prop_map(|entries| {
                    Value::Object(entries.into_iter().map(|(k, v)| (k.to_string(), v)).collect())
                }),
        ]
    })
}

fn raw_issue_strategy() -> impl Strategy<Value = RawIssue> {
    prop::collection::vec(json_strategy(), FIELDS.len()).prop_map(|values| {
        let fields: Map<String, Value> = FIELDS
            .iter()
            .map(|name| name.to_string())
            .zip(values)
            .collect();
        RawIssue {
            key: "PROJ-1".to_string(),
            id: "1".to_string(),
            fields,
        }
    })
}

proptest! {
    #[test]
    fn prop_normalize_parent_never_panics(raw in raw_issue_strategy()) {
        let normalizer = IssueNormalizer::new(FieldMapping::default(), "Platform");
        let parent = normalizer.normalize_parent(&raw);
        prop_assert_eq!(parent.key(), "PROJ-1");
        prop_assert!(parent.story_point >= 0.0);
        prop_assert_eq!(parent.record.team.as_str(), "Platform");
    }

    #[test]
    fn prop_normalize_child_takes_parent_id(raw in raw_issue_strategy()) {
        let normalizer = IssueNormalizer::new(FieldMapping::default(), "Platform");
        let child = normalizer.normalize_child(&raw, "4242");
        prop_assert_eq!(child.parent_id(), "4242");
        prop_assert_eq!(child.key(), "PROJ-1");
    }
}
