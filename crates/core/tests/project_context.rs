use std::fs;

use lens_core::db::{
    emission_cache_key, load_project_config, load_project_config_if_present, DeploymentRecord,
    ProjectConfig, ProjectContext, ProjectDb, ProjectLayout,
};
use lens_core::model::Address;
use lens_core::services::{QueryLimits, SimilarityConfig};
use tempfile::tempdir;

fn write_project(root: &std::path::Path) -> ProjectLayout {
    let layout = ProjectLayout::new(root);
    fs::create_dir_all(&layout.meta_dir).expect("meta dir");
    let config = ProjectConfig::new("demo", layout.db_path_relative_string());
    fs::write(&layout.project_config_path, serde_json::to_string_pretty(&config).expect("json"))
        .expect("write config");
    ProjectDb::open(&layout.db_path).expect("create db");
    layout
}

#[test]
fn layout_paths_live_under_root() {
    let layout = ProjectLayout::new("/tmp/proj");
    assert!(layout.meta_dir.ends_with(".lens"));
    assert!(layout.project_config_path.ends_with(".lens/project.json"));
    assert!(layout.db_path.ends_with(".lens/project.db"));
    assert!(layout.reports_dir.ends_with("reports"));
    assert!(layout.report_path("0xabc").ends_with("reports/0xabc.json"));
    assert_eq!(
        std::path::Path::new(&layout.db_path_relative_string()),
        std::path::Path::new(".lens").join("project.db")
    );
}

#[test]
fn context_loads_config_and_opens_db() {
    let dir = tempdir().expect("tempdir");
    write_project(dir.path());

    let ctx = ProjectContext::from_root(dir.path()).expect("context");
    assert_eq!(ctx.config.name, "demo");
    assert_eq!(ctx.config.default_namespace, "eth_global");
    assert!(ctx.db_path.ends_with(".lens/project.db"));
    assert!(ctx.db.list_deployments().expect("list").is_empty());
}

#[test]
fn context_resolves_deployments_and_their_artifacts() {
    let dir = tempdir().expect("tempdir");
    write_project(dir.path());
    let ctx = ProjectContext::from_root(dir.path()).expect("context");
    let address = Address::parse("0x00000000000000000000000000000000000000aa").expect("address");

    let err = ctx.deployment(&address).unwrap_err();
    assert!(err.to_string().contains("No deployment recorded at 0x"));

    let record = DeploymentRecord::new("Counter", address, "0x1", "[]", "contract C {}");
    let id = ctx.db.insert_deployment(&record).expect("insert");
    let (found, record) = ctx.deployment(&address).expect("present");
    assert_eq!(found, id);
    assert_eq!(record.contract_name, "Counter");

    assert!(ctx.report_path(&address).starts_with(&ctx.layout.reports_dir));
    assert_eq!(
        ctx.emission_cache_key("contract C {}", "[]"),
        emission_cache_key("contract C {}", "[]", &SimilarityConfig::default())
    );
    assert_eq!(ctx.report_config().heuristics, ctx.config.heuristics);
}

#[test]
fn missing_project_is_an_error_or_none() {
    let dir = tempdir().expect("tempdir");
    let layout = ProjectLayout::new(dir.path());
    assert!(!layout.is_project());
    assert!(load_project_config(&layout).is_err());
    assert!(load_project_config_if_present(&layout).expect("no error").is_none());
    assert!(ProjectContext::from_root(dir.path()).is_err());
}

#[test]
fn older_configs_get_defaults_for_new_fields() {
    let dir = tempdir().expect("tempdir");
    let layout = ProjectLayout::new(dir.path());
    fs::create_dir_all(&layout.meta_dir).expect("meta dir");
    fs::write(
        &layout.project_config_path,
        r#"{"name": "old", "description": null, "config_version": "0.1.0", "db": {"path": ".lens/project.db"}}"#,
    )
    .expect("write config");

    let config = load_project_config(&layout).expect("load");
    assert_eq!(config.default_namespace, "eth_global");
    assert_eq!(config.heuristics, SimilarityConfig::default());
    assert_eq!(config.query_limits, QueryLimits::default());
}

#[test]
fn partial_heuristics_merge_with_defaults() {
    let dir = tempdir().expect("tempdir");
    let layout = ProjectLayout::new(dir.path());
    fs::create_dir_all(&layout.meta_dir).expect("meta dir");
    fs::write(
        &layout.project_config_path,
        r#"{"name": "tuned", "description": null, "config_version": "0.1.0", "db": {"path": ".lens/project.db"},
            "default_namespace": "team", "heuristics": {"min_char_overlap": 0.8}, "query_limits": {"series_rows": 100}}"#,
    )
    .expect("write config");

    let config = load_project_config(&layout).expect("load");
    assert_eq!(config.default_namespace, "team");
    assert_eq!(config.heuristics.min_char_overlap, 0.8);
    assert_eq!(config.heuristics.max_short_stem_len, 5);
    let report = config.report_config();
    assert_eq!(report.limits.series_rows, 100);
    assert_eq!(report.limits.recent_rows, 10);
}
