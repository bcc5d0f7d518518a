use kanaviz::loader::parse_reader;
use kanaviz::transform::{item_domain, project, project_grouped, score, SeriesPoint};
use kanaviz::{AccuracyUnit, Record, RecordSet};
use rstest::rstest;

fn ratio_set(records: Vec<Record>) -> RecordSet {
    RecordSet::new(records, AccuracyUnit::Ratio)
}

fn sample_set() -> RecordSet {
    ratio_set(vec![
        Record::new("Hiragana", "あ", 0.9, 10, 9),
        Record::new("Hiragana", "い", 0.5, 10, 5),
        Record::new("Katakana", "ア", 0.8, 10, 8),
    ])
}

fn assert_close(a: f64, b: f64) {
    assert!((a - b).abs() < 1e-9, "{} != {}", a, b);
}

// --- SINGLE-CATEGORY PROJECTION ---

#[test]
fn test_end_to_end_ranked_hiragana() {
    let csv = "Kana Type,Kana,Accuracy,Times Seen,Times Correct\n\
               Hiragana,あ,0.9,10,9\n\
               Hiragana,い,0.5,10,5\n\
               Katakana,ア,0.8,10,8\n";
    let data = parse_reader(csv.as_bytes(), AccuracyUnit::Ratio).unwrap();

    let series = project(&data.records, "Hiragana");

    assert_eq!(series.category, "Hiragana");
    assert_eq!(
        series.points,
        vec![
            SeriesPoint {
                kana: "い".to_string(),
                accuracy: 0.5,
                times_seen: 10,
                times_correct: 5
            },
            SeriesPoint {
                kana: "あ".to_string(),
                accuracy: 0.9,
                times_seen: 10,
                times_correct: 9
            },
        ]
    );
}

#[rstest]
#[case("Hiragana", 2)]
#[case("Katakana", 1)]
#[case("Kanji", 0)]
#[case("hiragana", 0)]
fn test_project_filters_by_exact_category(#[case] category: &str, #[case] expected: usize) {
    let series = project(&sample_set(), category);
    assert_eq!(series.len(), expected);
}

#[test]
fn test_project_absent_category_is_empty_not_error() {
    let series = project(&sample_set(), "Kanji");
    assert!(series.is_empty());
    assert_eq!(series.category, "Kanji");
}

#[test]
fn test_project_on_empty_set() {
    let series = project(&ratio_set(Vec::new()), "Hiragana");
    assert!(series.is_empty());
}

#[test]
fn test_project_is_stable_for_equal_accuracy() {
    let set = ratio_set(vec![
        Record::new("Hiragana", "か", 0.5, 4, 2),
        Record::new("Hiragana", "あ", 0.1, 10, 1),
        Record::new("Hiragana", "き", 0.5, 2, 1),
        Record::new("Katakana", "カ", 0.5, 2, 1),
        Record::new("Hiragana", "く", 0.5, 6, 3),
    ]);

    let kana: Vec<String> = project(&set, "Hiragana")
        .points
        .into_iter()
        .map(|p| p.kana)
        .collect();

    assert_eq!(kana, vec!["あ", "か", "き", "く"]);
}

#[test]
fn test_project_keeps_auxiliary_fields_unscaled() {
    let set = RecordSet::new(
        vec![Record::new("Hiragana", "ん", 37.5, 8, 3)],
        AccuracyUnit::Percent,
    );
    let p = &project(&set, "Hiragana").points[0];
    assert_eq!(p.accuracy, 37.5);
    assert_eq!((p.times_seen, p.times_correct), (8, 3));
}

// --- GROUPED PROJECTION ---

#[test]
fn test_grouped_mean_is_arithmetic_mean() {
    let set = ratio_set(vec![
        Record::new("A", "x", 0.5, 10, 5),
        Record::new("A", "x", 0.7, 10, 7),
    ]);
    let grouped = project_grouped(&set);
    assert_close(grouped.value("A", "x").unwrap(), 0.6);
    assert_eq!(grouped.groups[0].items[0].samples, 2);
}

#[test]
fn test_grouped_mean_only_counts_matching_pair() {
    let set = ratio_set(vec![
        Record::new("Hiragana", "あ", 0.2, 5, 1),
        Record::new("Katakana", "あ", 1.0, 5, 5),
        Record::new("Hiragana", "い", 0.9, 10, 9),
        Record::new("Hiragana", "あ", 0.6, 5, 3),
    ]);
    let grouped = project_grouped(&set);
    assert_close(grouped.value("Hiragana", "あ").unwrap(), 0.4);
    assert_close(grouped.value("Katakana", "あ").unwrap(), 1.0);
    assert_close(grouped.value("Hiragana", "い").unwrap(), 0.9);
}

#[test]
fn test_grouped_pooled_accuracy_uses_counts() {
    let set = ratio_set(vec![
        Record::new("Hiragana", "あ", 1.0, 1, 1),
        Record::new("Hiragana", "あ", 0.0, 9, 0),
    ]);
    let item = &project_grouped(&set).groups[0].items[0];
    assert_close(item.mean_accuracy, 0.5);
    assert_close(item.pooled_accuracy, 0.1);
}

#[test]
fn test_grouped_keeps_first_seen_order() {
    let set = ratio_set(vec![
        Record::new("Katakana", "イ", 0.1, 1, 0),
        Record::new("Hiragana", "う", 0.2, 1, 0),
        Record::new("Katakana", "ア", 0.3, 1, 0),
        Record::new("Hiragana", "あ", 0.4, 1, 0),
        Record::new("Katakana", "イ", 0.5, 1, 0),
    ]);
    let grouped = project_grouped(&set);

    let categories: Vec<&str> = grouped.categories().collect();
    assert_eq!(categories, vec!["Katakana", "Hiragana"]);

    let kata: Vec<&str> = grouped.groups[0].items.iter().map(|i| i.kana.as_str()).collect();
    assert_eq!(kata, vec!["イ", "ア"]);
    let hira: Vec<&str> = grouped.groups[1].items.iter().map(|i| i.kana.as_str()).collect();
    assert_eq!(hira, vec!["う", "あ"]);
}

#[test]
fn test_item_domain_is_union_not_first_group() {
    // The first category lacks "ゃ"; using its items as the domain would drop it.
    let set = ratio_set(vec![
        Record::new("Hiragana", "あ", 0.9, 10, 9),
        Record::new("Katakana", "ア", 0.8, 10, 8),
        Record::new("Youon", "ゃ", 0.4, 10, 4),
        Record::new("Katakana", "あ", 0.3, 10, 3),
    ]);
    let grouped = project_grouped(&set);

    assert_eq!(grouped.item_domain, vec!["あ", "ア", "ゃ"]);
    assert_eq!(item_domain(&grouped.groups), grouped.item_domain);

    let first_group_only: Vec<&str> = grouped.groups[0].items.iter().map(|i| i.kana.as_str()).collect();
    assert_ne!(first_group_only.len(), grouped.item_domain.len());
}

#[test]
fn test_matrix_marks_missing_cells_absent() {
    let set = ratio_set(vec![
        Record::new("Hiragana", "あ", 0.9, 10, 9),
        Record::new("Katakana", "ア", 0.8, 10, 8),
    ]);
    let grouped = project_grouped(&set);

    assert_eq!(
        grouped.matrix(),
        vec![vec![Some(0.9), None], vec![None, Some(0.8)]]
    );
    assert_eq!(grouped.value("Hiragana", "ア"), None);
    assert_eq!(grouped.value("Kanji", "あ"), None);
}

#[test]
fn test_grouped_empty_set() {
    let grouped = project_grouped(&ratio_set(Vec::new()));
    assert!(grouped.groups.is_empty());
    assert!(grouped.item_domain.is_empty());
    assert_eq!(grouped.max_mean(), 0.0);
}

#[test]
fn test_grouped_max_mean() {
    let grouped = project_grouped(&sample_set());
    assert_close(grouped.max_mean(), 0.9);
}

// --- CATEGORY SCORE ---

#[rstest]
#[case("Hiragana", 20, 14, 70.0)]
#[case("Katakana", 10, 8, 80.0)]
#[case("Kanji", 0, 0, 0.0)]
fn test_score_sums_counts(
    #[case] category: &str,
    #[case] seen: u64,
    #[case] correct: u64,
    #[case] percentage: f64,
) {
    let s = score(&sample_set(), category);
    assert_eq!((s.seen, s.correct), (seen, correct));
    assert_close(s.percentage, percentage);
}

#[test]
fn test_views_serialize_camel_case() {
    let json = serde_json::to_value(project(&sample_set(), "Hiragana")).unwrap();
    assert_eq!(json["points"][0]["timesSeen"], 10);
    assert_eq!(json["points"][0]["timesCorrect"], 5);

    let json = serde_json::to_value(project_grouped(&sample_set())).unwrap();
    assert_eq!(json["itemDomain"].as_array().unwrap().len(), 3);
    assert!(json["groups"][0]["items"][0]["meanAccuracy"].is_number());
}
