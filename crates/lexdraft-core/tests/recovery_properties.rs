//! Recovery properties
//!
//! Valid record arrays survive every sanctioned rendering (fenced, bare,
//! bracketless, back-to-back objects) unchanged and in order.

use proptest::prelude::*;

use lexdraft_core::{recover, CoreError};
use lexdraft_records::{ParagraphRecord, Rgb, RunRecord};

fn style_strategy() -> impl Strategy<Value = &'static str> {
    prop_oneof![
        Just("Normal"),
        Just("Heading 1"),
        Just("List Paragraph"),
        Just("Body Text"),
    ]
}

fn run_strategy() -> impl Strategy<Value = RunRecord> {
    (
        // braces inside text could be touched by the adjacency repair
        "[ a-zA-Z0-9#.,:;'\"\\\\/\t\n-]{0,16}",
        proptest::option::of(any::<bool>()),
        proptest::option::of(any::<bool>()),
        proptest::option::of((any::<u8>(), any::<u8>(), any::<u8>())),
    )
        .prop_map(|(text, bold, italic, color)| RunRecord {
            text: Some(text),
            bold,
            italic,
            color: color.map(|(r, g, b)| Rgb::new(r, g, b).into()),
        })
}

fn record_strategy() -> impl Strategy<Value = ParagraphRecord> {
    (style_strategy(), prop::collection::vec(run_strategy(), 0..5)).prop_map(|(style, runs)| {
        runs.into_iter()
            .fold(ParagraphRecord::new(style), ParagraphRecord::with_run)
    })
}

fn compact(record: &ParagraphRecord) -> String {
    serde_json::to_string(record).unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn prop_array_round_trip(records in prop::collection::vec(record_strategy(), 0..8)) {
        let raw = serde_json::to_string_pretty(&records).unwrap();
        prop_assert_eq!(recover(&raw).unwrap(), records.clone());

        let fenced = format!("Here is the filled form:\n```json\n{}\n```\nLet me know.", raw);
        prop_assert_eq!(recover(&fenced).unwrap(), records);
    }

    #[test]
    fn prop_back_to_back_objects(
        records in prop::collection::vec(record_strategy(), 1..8),
        separator in prop_oneof![Just(""), Just(","), Just("\n"), Just(" ,\n ")],
    ) {
        let raw = records.iter().map(compact).collect::<Vec<_>>().join(separator);
        prop_assert_eq!(recover(&raw).unwrap(), records);
    }

    #[test]
    fn prop_style_case_is_normalized(records in prop::collection::vec(record_strategy(), 1..6)) {
        let lowered: Vec<_> = records
            .iter()
            .cloned()
            .map(|mut r| {
                let mut chars = r.style.chars();
                if let Some(first) = chars.next() {
                    r.style = first.to_lowercase().chain(chars).collect();
                }
                r
            })
            .collect();
        let raw = serde_json::to_string(&lowered).unwrap();
        prop_assert_eq!(recover(&raw).unwrap(), records);
    }

    #[test]
    fn prop_prose_never_recovers(prose in "[A-Za-z][A-Za-z .,!?]{0,60}") {
        prop_assert!(matches!(recover(&prose), Err(CoreError::MalformedRecord { .. })), "prose recovered");
    }
}
