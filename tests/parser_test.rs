// Page parser behavior against full-size report pages

mod common;

use climate_scraper::parser::{parse_page, DailyDataPage, MalformedRowPolicy};
use common::{day_row, monthly_report, report_page};

#[test]
fn test_march_page_yields_every_day_in_order() {
    let html = monthly_report("March", 2020, 31);
    let records = parse_page(&html, "London CS", 2020, 3, MalformedRowPolicy::EmitEmpty);

    assert_eq!(records.len(), 31);
    for (idx, record) in records.iter().enumerate() {
        assert_eq!(record.station, "London CS");
        assert_eq!(record.date, format!("2020-03-{:02}", idx + 1));
    }
    assert_eq!(records[0].date, "2020-03-01");
    assert_eq!(records[30].date, "2020-03-31");
}

#[test]
fn test_record_count_is_rows_minus_header_and_footer() {
    for days in [1, 28, 29, 30, 31] {
        let html = monthly_report("February", 2016, days);
        let page = DailyDataPage::parse(&html);
        let total_rows = page.table_rows().len();

        let records: Vec<_> = page
            .records("London A", 2016, 2, MalformedRowPolicy::EmitEmpty)
            .collect();

        assert_eq!(records.len(), total_rows - 6);
        assert_eq!(records.len(), days);
    }
}

#[test]
fn test_every_field_populated_from_cells() {
    let html = monthly_report("July", 2015, 3);
    let records = parse_page(&html, "London Airport", 2015, 7, MalformedRowPolicy::EmitEmpty);

    let second = &records[1];
    assert_eq!(second.max_temp, "2.5");
    assert_eq!(second.min_temp, "-2.0");
    assert_eq!(second.mean_temp, "2.2");
    assert_eq!(second.heat_deg_days, "12.4");
    assert_eq!(second.cool_deg_days, "0.0");
    assert_eq!(second.total_rain_mm, "0.0");
    assert_eq!(second.total_snow_cm, "2.0");
    assert_eq!(second.total_precip_mm, "1.8");
    assert_eq!(second.snow_on_ground_cm, "3");
    assert_eq!(second.dir_of_max_gust_10s_deg, "25");
    assert_eq!(second.spd_of_max_gust_kmh, "48");
}

#[test]
fn test_month_mismatch_yields_nothing() {
    // The site serves the last month with data when the requested one is empty
    let html = monthly_report("November", 2011, 30);
    let records = parse_page(&html, "London CS", 2011, 12, MalformedRowPolicy::EmitEmpty);
    assert!(records.is_empty());
}

#[test]
fn test_month_name_must_match_exactly() {
    let html = monthly_report("march", 2020, 31);
    let records = parse_page(&html, "London CS", 2020, 3, MalformedRowPolicy::EmitEmpty);
    assert!(records.is_empty());
}

#[test]
fn test_missing_cells_do_not_fail() {
    let rows = vec![
        day_row(1),
        "<tr><td>02</td><td></td><td></td><td></td><td></td><td></td><td></td><td></td><td></td><td></td><td></td><td></td></tr>".to_string(),
        "<tr><td>03</td><td>M</td><td><span>E</span></td></tr>".to_string(),
    ];
    let html = report_page("Daily Data Report for January 2012", &rows);
    let records = parse_page(&html, "London CS", 2012, 1, MalformedRowPolicy::EmitEmpty);

    assert_eq!(records.len(), 3);
    assert_eq!(records[1].date, "2012-01-02");
    assert!(records[1].max_temp.is_empty());
    assert!(records[1].spd_of_max_gust_kmh.is_empty());
    assert_eq!(records[2].max_temp, "M");
    assert_eq!(records[2].min_temp, "");
    assert_eq!(records[2].snow_on_ground_cm, "");
}

#[test]
fn test_malformed_row_policies() {
    let rows = vec![
        day_row(1),
        "<tr><td colspan=\"12\">Legend</td></tr>".to_string(),
        day_row(3),
    ];
    let html = report_page("Daily Data Report for January 2012", &rows);

    let emitted = parse_page(&html, "London CS", 2012, 1, MalformedRowPolicy::EmitEmpty);
    assert_eq!(emitted.len(), 3);
    assert!(emitted[1].station.is_empty());
    assert!(emitted[1].date.is_empty());

    let skipped = parse_page(&html, "London CS", 2012, 1, MalformedRowPolicy::Skip);
    assert_eq!(skipped.len(), 2);
    assert_eq!(skipped[1].date, "2012-01-03");
}

#[test]
fn test_page_without_table() {
    let html = r#"<html><body><h1 id="wb-cont">Daily Data Report for May 2012</h1></body></html>"#;
    let records = parse_page(html, "London CS", 2012, 5, MalformedRowPolicy::EmitEmpty);
    assert!(records.is_empty());
}
