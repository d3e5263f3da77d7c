mod common;

use anyhow::Result;
use sifter::{
    ConditionValue, FilterForm, FormConfig, Operator, OptionSource, QueryError, QueryRequest, QueryTarget,
    ResultOptions, SimpleFilter,
};
use siftql::wire::{self, ParamMap};

use common::{album_registry, album_rows, Albums, Records};

fn request(pairs: &[(&str, &str)]) -> ParamMap { wire::parse_pairs(pairs.iter().copied()) }

#[test]
fn quick_search_fans_out_across_declared_fields() -> Result<()> {
    let target = Albums::new(album_rows());
    let registry = album_registry();
    let params = request(&[("q[name_or_genre_or_tenant_name_cont]", "umbrella")]);
    let form = FilterForm::new(&target, &registry, &params, FormConfig::default(), None);
    let results = form.result(ResultOptions::default())?;
    assert_eq!(results.rows.len(), 1);
    assert_eq!(results.rows[0].get("name").map(String::as_str), Some("Nevermind"));
    Ok(())
}

#[test]
fn grouped_filters_reach_the_executor() -> Result<()> {
    let target = Albums::new(album_rows());
    let registry = album_registry();
    let params = request(&[
        ("q[g][0][genre_eq]", "jazz"),
        ("q[g][0][status_eq]", "active"),
        ("q[g][0][m]", "and"),
        ("q[g][1][tenant_name_eq]", "umbrella"),
        ("q[g][1][m]", "and"),
        ("q[m]", "or"),
    ]);
    let form = FilterForm::new(&target, &registry, &params, FormConfig::default(), None);
    let results = form.result(ResultOptions::default())?;
    let names: Vec<_> = results.rows.iter().filter_map(|row| row.get("name")).collect();
    assert_eq!(names, vec!["Blue Train", "Nevermind"]);
    Ok(())
}

#[test]
fn date_ranges_apply_after_execution() -> Result<()> {
    let target = Albums::new(album_rows());
    let registry = album_registry();
    let params = request(&[
        ("q[g][0][released_on_gteq]", "1950-01-01"),
        ("q[g][0][released_on_lteq]", "1960-12-31"),
        ("q[g][0][m]", "and"),
    ]);
    let form = FilterForm::new(&target, &registry, &params, FormConfig::default(), None);
    // consolidated date ranges are also re-applied directly to the result set
    let results = form.result(ResultOptions::default())?;
    let names: Vec<_> = results.rows.iter().filter_map(|row| row.get("name")).collect();
    assert_eq!(names, vec!["Blue Train", "Kind of Blue"]);
    Ok(())
}

#[test]
fn simple_filters_inject_equality_predicates() -> Result<()> {
    let target = Albums::new(album_rows());
    let registry = album_registry().simple_filter(
        SimpleFilter::new("status", OptionSource::Static(vec![])).default_value("active").blank_label("All statuses"),
    );
    let form = FilterForm::new(&target, &registry, &ParamMap::new(), FormConfig::default(), None);
    let results = form.result(ResultOptions::default())?;
    assert_eq!(results.rows.len(), 2);

    // an explicit submission overrides the default
    let form = FilterForm::new(&target, &registry, &request(&[("q[status_eq]", "archived")]), FormConfig::default(), None);
    let results = form.result(ResultOptions::default())?;
    assert_eq!(results.rows.len(), 1);
    assert_eq!(results.rows[0].get("name").map(String::as_str), Some("Kind of Blue"));
    Ok(())
}

#[test]
fn details_resolve_labels_and_option_display() -> Result<()> {
    let target = Albums::new(album_rows());
    let registry = album_registry();
    let params = request(&[("q[status_eq]", "active"), ("q[g][0][released_on_gteq]", "1950-01-01"), ("q[g][0][released_on_lteq]", "1960-12-31")]);
    let form = FilterForm::new(&target, &registry, &params, FormConfig::default(), None);
    let details = form.active_filter_details();
    assert_eq!(details.len(), 2);
    assert_eq!(details[0].label, "Status");
    assert_eq!(details[0].value, ConditionValue::Scalar("Active".to_string()));
    assert_eq!(details[1].label, "Released");
    assert_eq!(details[1].operator, Operator::Between);
    assert_eq!(details[1].value, ConditionValue::Range { start: "1950-01-01".to_string(), end: "1960-12-31".to_string() });
    Ok(())
}

#[test]
fn distinct_option_reaches_the_executor() -> Result<()> {
    let mut rows = album_rows();
    rows.push(rows[0].clone());
    let target = Albums::new(rows);
    let registry = album_registry();
    let form = FilterForm::new(&target, &registry, &ParamMap::new(), FormConfig::default(), None);
    let results = form.result(ResultOptions { distinct: true })?;
    assert_eq!(results.rows.len(), 3);
    Ok(())
}

struct Exploding;

impl QueryTarget for Exploding {
    type ResultSet = Records;

    fn collection_id(&self) -> &str { "albums" }

    fn execute(&self, _request: &QueryRequest) -> Result<Records, QueryError> {
        Err(QueryError::executor(std::io::Error::other("connection refused")))
    }
}

#[test]
fn executor_failures_propagate_uncaught() {
    let target = Exploding;
    let registry = album_registry();
    let form = FilterForm::new(&target, &registry, &ParamMap::new(), FormConfig::default(), None);
    assert!(form.result(ResultOptions::default()).is_err());
}

#[test]
fn assembled_params_carry_every_surface() -> Result<()> {
    let target = Albums::new(album_rows());
    let registry = album_registry().simple_filter(SimpleFilter::new("tenant_name", OptionSource::Static(vec![])).default_value("acme"));
    let params = request(&[
        ("q[name_cont]", "blue"),
        ("q[s]", "released_on desc"),
        ("q[g][0][genre_eq]", "jazz"),
        ("q[g][0][m]", "and"),
        ("q[m]", "and"),
        ("q[name_or_genre_or_tenant_name_cont]", "train"),
    ]);
    let form = FilterForm::new(&target, &registry, &params, FormConfig::default(), None);
    let assembled = form.query_request(ResultOptions::default()).params;
    assert!(assembled.contains_key("name_cont"));
    assert!(assembled.contains_key("s"));
    assert!(assembled.contains_key("g"));
    assert!(assembled.contains_key("m"));
    assert!(assembled.contains_key("name_or_genre_or_tenant_name_cont"));
    assert!(assembled.contains_key("tenant_name_eq"));
    Ok(())
}
