use fbc_core::declcfg::{parse_json_stream, DeclarativeConfig, OutputFormat};
use fbc_core::model::Catalog;
use serde_json::Value;
use tempfile::TempDir;

const FOO_YAML: &str = r#"---
schema: olm.package
name: foo
defaultChannel: stable
icon:
  mediatype: image/svg+xml
---
schema: olm.channel
package: foo
name: stable
entries:
  - name: foo.v1.0.0
  - name: foo.v1.1.0
    replaces: foo.v1.0.0
  - name: foo.v2.0.0
    replaces: foo.v1.1.0
    skips:
      - foo.v1.0.0
---
schema: olm.bundle
package: foo
name: foo.v1.0.0
image: quay.io/foo/bundle:v1.0.0
properties:
  - type: olm.package
    value:
      packageName: foo
      version: 1.0.0
---
schema: olm.bundle
package: foo
name: foo.v1.1.0
image: quay.io/foo/bundle:v1.1.0
properties:
  - type: olm.package
    value:
      packageName: foo
      version: 1.1.0
  - type: olm.gvk
    value:
      group: foo.example.com
      kind: Foo
      version: v1
---
schema: olm.bundle
package: foo
name: foo.v2.0.0
image: quay.io/foo/bundle:v2.0.0
properties:
  - type: olm.package
    value:
      packageName: foo
      version: 2.0.0
---
schema: olm.deprecations
package: foo
entries: []
"#;

const BAR_JSON: &str = r#"
{"schema": "olm.package", "name": "bar", "defaultChannel": "stable"}
{"schema": "olm.channel", "package": "bar", "name": "stable", "entries": [{"name": "bar.v0.1.0"}]}
{
  "schema": "olm.bundle",
  "package": "bar",
  "name": "bar.v0.1.0",
  "image": "quay.io/bar/bundle:v0.1.0",
  "properties": [{"type": "olm.package", "value": {"packageName": "bar", "version": "0.1.0"}}]
}
"#;

fn catalog_dir() -> TempDir {
    let tmp = TempDir::new().unwrap();
    std::fs::create_dir_all(tmp.path().join("foo")).unwrap();
    std::fs::create_dir_all(tmp.path().join("bar")).unwrap();
    std::fs::write(tmp.path().join("foo/catalog.yaml"), FOO_YAML).unwrap();
    std::fs::write(tmp.path().join("bar/catalog.json"), BAR_JSON).unwrap();
    std::fs::write(tmp.path().join("README.md"), "not a catalog").unwrap();
    tmp
}

fn render(doc: &str) -> miette::Result<Catalog> {
    DeclarativeConfig::from_yaml_str(doc)?.to_catalog()
}

#[test]
fn test_load_directory_tree() {
    let tmp = catalog_dir();
    let cfg = DeclarativeConfig::load(tmp.path()).unwrap();
    assert_eq!(cfg.packages.len(), 2);
    assert_eq!(cfg.channels.len(), 2);
    assert_eq!(cfg.bundles.len(), 4);
    assert_eq!(cfg.others.len(), 1);
}

#[test]
fn test_load_single_file() {
    let tmp = catalog_dir();
    let cfg = DeclarativeConfig::load(&tmp.path().join("bar/catalog.json")).unwrap();
    assert_eq!(cfg.packages.len(), 1);
    assert_eq!(cfg.packages[0].name, "bar");
}

#[test]
fn test_to_catalog_renders_graph() {
    let catalog = render(FOO_YAML).unwrap();
    let pkg = catalog.package("foo").unwrap();
    assert_eq!(pkg.default_channel, "stable");
    let stable = pkg.channel("stable").unwrap();
    assert_eq!(stable.package, "foo");
    assert_eq!(
        stable.bundle_names(),
        vec!["foo.v1.0.0", "foo.v1.1.0", "foo.v2.0.0"]
    );
    let head = stable.bundle("foo.v2.0.0").unwrap();
    assert_eq!(head.replaces.as_deref(), Some("foo.v1.1.0"));
    assert_eq!(head.skips, vec!["foo.v1.0.0".to_string()]);
    assert_eq!(head.version.to_string(), "2.0.0");
    assert_eq!(head.channel, "stable");
    assert!(stable.bundle("foo.v1.0.0").unwrap().replaces.is_none());
}

#[test]
fn test_unknown_fields_survive() {
    let cfg = DeclarativeConfig::from_yaml_str(FOO_YAML).unwrap();
    assert!(cfg.packages[0].extra.contains_key("icon"));
    let out = serde_json::to_value(&cfg.packages[0]).unwrap();
    assert_eq!(out["icon"]["mediatype"], "image/svg+xml");
    assert_eq!(out["defaultChannel"], "stable");
}

#[test]
fn test_entry_without_bundle_rejected() {
    let doc = FOO_YAML.replace("  - name: foo.v1.0.0\n", "  - name: foo.v0.9.0\n");
    let err = render(&doc).unwrap_err();
    assert!(err.to_string().contains("no bundle"), "got: {err}");
}

#[test]
fn test_bundle_outside_channels_rejected() {
    let doc = format!(
        "{FOO_YAML}---\nschema: olm.bundle\npackage: foo\nname: foo.v3.0.0\nproperties:\n  - type: olm.package\n    value:\n      packageName: foo\n      version: 3.0.0\n"
    );
    let err = render(&doc).unwrap_err();
    assert!(err.to_string().contains("not found in any channel"), "got: {err}");
}

#[test]
fn test_missing_default_channel_rejected() {
    let doc = FOO_YAML.replace("defaultChannel: stable", "defaultChannel: fast");
    let err = render(&doc).unwrap_err();
    assert!(err.to_string().contains("default channel \"fast\""), "got: {err}");
}

#[test]
fn test_invalid_bundle_version_rejected() {
    let doc = FOO_YAML.replace("version: 2.0.0", "version: two");
    let err = render(&doc).unwrap_err();
    assert!(err.to_string().contains("invalid version"), "got: {err}");
}

#[test]
fn test_channel_for_unknown_package_rejected() {
    let doc = format!("{FOO_YAML}---\nschema: olm.channel\npackage: ghost\nname: stable\n");
    let err = render(&doc).unwrap_err();
    assert!(err.to_string().contains("unknown package \"ghost\""), "got: {err}");
}

#[test]
fn test_blob_without_schema_rejected() {
    let err = DeclarativeConfig::from_yaml_str("name: foo\n").unwrap_err();
    assert!(err.to_string().contains("no schema"), "got: {err}");
}

#[test]
fn test_retain_prunes_blobs_and_entries() {
    let cfg = DeclarativeConfig::load(catalog_dir().path()).unwrap();
    let mut catalog = cfg.to_catalog().unwrap();
    catalog.packages.remove("bar");
    catalog
        .package_mut("foo")
        .unwrap()
        .channel_mut("stable")
        .unwrap()
        .bundles
        .remove("foo.v1.0.0");

    let kept = cfg.retain(&catalog);
    assert_eq!(kept.packages.len(), 1);
    assert_eq!(kept.channels.len(), 1);
    let entries: Vec<&str> = kept.channels[0]
        .entries
        .iter()
        .map(|e| e.name.as_str())
        .collect();
    assert_eq!(entries, vec!["foo.v1.1.0", "foo.v2.0.0"]);
    let bundles: Vec<&str> = kept.bundles.iter().map(|b| b.name.as_str()).collect();
    assert_eq!(bundles, vec!["foo.v1.1.0", "foo.v2.0.0"]);
    assert_eq!(kept.others.len(), 1);

    // The surviving entries still carry their original edges.
    assert_eq!(
        kept.channels[0].entries[0].replaces.as_deref(),
        Some("foo.v1.0.0")
    );
}

#[test]
fn test_retain_updates_default_channel() {
    let cfg = DeclarativeConfig::from_yaml_str(FOO_YAML).unwrap();
    let mut catalog = cfg.to_catalog().unwrap();
    catalog.package_mut("foo").unwrap().default_channel = "candidate".to_string();
    let kept = cfg.retain(&catalog);
    assert_eq!(kept.packages[0].default_channel, "candidate");
}

#[test]
fn test_blobs_grouped_per_package() {
    let cfg = DeclarativeConfig::load(catalog_dir().path()).unwrap();
    let catalog = cfg.to_catalog().unwrap();
    let blobs = cfg.retain(&catalog).blobs().unwrap();
    let order: Vec<(String, String)> = blobs
        .iter()
        .map(|b| {
            let schema = b["schema"].as_str().unwrap_or_default().to_string();
            let owner = b
                .get("package")
                .or_else(|| b.get("name"))
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string();
            (owner, schema)
        })
        .collect();
    let expected = [
        ("bar", "olm.package"),
        ("bar", "olm.channel"),
        ("bar", "olm.bundle"),
        ("foo", "olm.package"),
        ("foo", "olm.channel"),
        ("foo", "olm.bundle"),
        ("foo", "olm.bundle"),
        ("foo", "olm.bundle"),
        ("foo", "olm.deprecations"),
    ];
    let expected: Vec<(String, String)> = expected
        .iter()
        .map(|(a, b)| (a.to_string(), b.to_string()))
        .collect();
    assert_eq!(order, expected);
}

#[test]
fn test_write_yaml_round_trips_through_loader() {
    let cfg = DeclarativeConfig::from_yaml_str(FOO_YAML).unwrap();
    let mut out = Vec::new();
    cfg.write(&mut out, OutputFormat::Yaml).unwrap();
    let text = String::from_utf8(out).unwrap();
    assert!(text.starts_with("---\n"));
    assert_eq!(text.matches("---\n").count(), 6);

    let reloaded = DeclarativeConfig::from_yaml_str(&text).unwrap();
    assert_eq!(reloaded.to_catalog().unwrap(), cfg.to_catalog().unwrap());
}

#[test]
fn test_write_json_stream() {
    let cfg = DeclarativeConfig::from_yaml_str(FOO_YAML).unwrap();
    let mut out = Vec::new();
    cfg.write(&mut out, OutputFormat::Json).unwrap();
    let text = String::from_utf8(out).unwrap();
    let values = parse_json_stream(&text, "out").unwrap();
    assert_eq!(values.len(), 6);
    assert_eq!(values[0]["schema"], "olm.package");
    assert_eq!(values[1]["entries"][2]["skips"][0], "foo.v1.0.0");
}

#[test]
fn test_output_format_from_str() {
    assert_eq!("yaml".parse::<OutputFormat>().unwrap(), OutputFormat::Yaml);
    assert_eq!("json".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
    assert!("toml".parse::<OutputFormat>().is_err());
}

#[test]
fn test_skip_range_carried_on_channel_entry() {
    let doc = FOO_YAML.replace(
        "    replaces: foo.v1.1.0\n",
        "    replaces: foo.v1.1.0\n    skipRange: \">=1.0.0 <2.0.0\"\n",
    );
    let cfg = DeclarativeConfig::from_yaml_str(&doc).unwrap();
    let catalog = cfg.to_catalog().unwrap();
    let mut out = Vec::new();
    cfg.retain(&catalog).write(&mut out, OutputFormat::Json).unwrap();

    let values = parse_json_stream(&String::from_utf8(out).unwrap(), "out").unwrap();
    assert_eq!(values[1]["entries"][2]["name"], "foo.v2.0.0");
    assert_eq!(values[1]["entries"][2]["skipRange"], ">=1.0.0 <2.0.0");
    assert!(values[1]["entries"][1].get("skipRange").is_none());
}
