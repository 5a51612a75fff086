use calcbench_api::types::{DisclosurePage, FactRecord, Period};
use serde_json::json;

fn load_fixture(name: &str) -> String {
    std::fs::read_to_string(format!("tests/fixtures/{}", name)).unwrap()
}

#[test]
fn deserialize_mapped_data_full() {
    let json = load_fixture("mapped_data.json");
    let facts: Vec<FactRecord> = serde_json::from_str(&json).unwrap();
    assert_eq!(facts.len(), 4);

    let first = &facts[0];
    assert_eq!(first.ticker, "MSFT");
    assert_eq!(first.metric, "Revenue");
    assert_eq!(first.value, json!(20403000000_i64));
    assert_eq!(first.calendar_year, Some(2014));
    assert_eq!(first.calendar_period, Some(Period::Q1));
    assert_eq!(first.fiscal_period, Some(Period::Q3));
    assert_eq!(first.cik.as_deref(), Some("0000789019"));
    assert_eq!(
        first.period_end.map(|d| d.to_string()).as_deref(),
        Some("2014-03-31")
    );
    let trace = first.trace_facts.as_ref().unwrap();
    assert_eq!(trace.len(), 1);
    assert_eq!(trace[0].local_name.as_deref(), Some("SalesRevenueNet"));
    assert!(!trace[0].negative_weight);
}

#[test]
fn unknown_fields_land_in_overflow_map() {
    let json = load_fixture("mapped_data.json");
    let facts: Vec<FactRecord> = serde_json::from_str(&json).unwrap();
    assert_eq!(facts[0].extra.get("standardized_id"), Some(&json!(991)));
    assert_eq!(
        facts[2].extra.get("calendar_period_label"),
        Some(&json!("2014Q2"))
    );
    assert!(!facts[0].extra.contains_key("ticker"));
}

#[test]
fn descriptive_fact_without_period() {
    let json = load_fixture("mapped_data.json");
    let facts: Vec<FactRecord> = serde_json::from_str(&json).unwrap();
    let name = &facts[1];
    assert_eq!(name.value, json!("MICROSOFT CORP"));
    assert_eq!(name.calendar_year, None);
    assert_eq!(name.calendar_period, None);
}

#[test]
fn point_in_time_fields() {
    let json = load_fixture("mapped_data.json");
    let facts: Vec<FactRecord> = serde_json::from_str(&json).unwrap();
    let revised = &facts[2];
    assert_eq!(revised.revision_number, Some(1));
    assert_eq!(revised.preliminary, Some(false));
    assert_eq!(revised.xbrl, Some(true));
    assert_eq!(
        revised.date_reported.unwrap().to_string(),
        "2014-07-22 16:05:11.123456"
    );
}

#[test]
fn unknown_period_codes_become_other() {
    let json = load_fixture("mapped_data.json");
    let facts: Vec<FactRecord> = serde_json::from_str(&json).unwrap();
    assert_eq!(facts[3].calendar_period, Some(Period::Other));
    assert_eq!(facts[3].fiscal_period, Some(Period::Other));
}

#[test]
fn deserialize_footnote_pages() {
    let page: DisclosurePage =
        serde_json::from_str(&load_fixture("footnotes_page1.json")).unwrap();
    assert_eq!(page.footnotes.len(), 1);
    assert!(page.more_results);
    assert_eq!(page.next_group_start_offset.unwrap().0, json!(100));
    assert_eq!(
        page.footnotes[0].disclosure_type_name.as_deref(),
        Some("RiskFactors")
    );
    assert_eq!(page.footnotes[0].extra.get("blob_id"), Some(&json!("abc")));

    let last: DisclosurePage =
        serde_json::from_str(&load_fixture("footnotes_last.json")).unwrap();
    assert!(!last.more_results);
    assert!(last.next_group_start_offset.is_none());
}

#[test]
fn deserialize_missing_required_fields_returns_error() {
    let json = r#"[{"value": 1}]"#;
    let result = serde_json::from_str::<Vec<FactRecord>>(json);
    assert!(result.is_err());
}
