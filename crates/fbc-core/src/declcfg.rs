//! Declarative (file-based) catalog documents.
//!
//! A catalog on disk is a set of JSON or YAML blobs, each tagged with a
//! `schema`. Three schemas are understood: `olm.package`, `olm.channel` and
//! `olm.bundle`. Anything else is carried through untouched. Unknown fields
//! on understood blobs are kept in `extra` so a filtered catalog serializes
//! back with its original content.

use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::io::Write;
use std::path::Path;

use fbc_util::errors::FbcError;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::model::{Bundle, Catalog, Channel, Package};
use crate::version::BundleVersion;

pub const SCHEMA_PACKAGE: &str = "olm.package";
pub const SCHEMA_CHANNEL: &str = "olm.channel";
pub const SCHEMA_BUNDLE: &str = "olm.bundle";

/// Bundle property carrying the package name and version.
pub const PROPERTY_PACKAGE: &str = "olm.package";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PackageBlob {
    pub schema: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub default_channel: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChannelBlob {
    pub schema: String,
    pub package: String,
    pub name: String,
    #[serde(default)]
    pub entries: Vec<ChannelEntry>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelEntry {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub replaces: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub skips: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skip_range: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BundleBlob {
    pub schema: String,
    pub package: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub image: String,
    #[serde(default)]
    pub properties: Vec<Property>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Property {
    #[serde(rename = "type")]
    pub kind: String,
    pub value: Value,
}

/// Output encoding for [`DeclarativeConfig::write`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Yaml,
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = FbcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "yaml" => Ok(Self::Yaml),
            "json" => Ok(Self::Json),
            other => Err(FbcError::Output {
                message: format!("invalid output format: {other}"),
            }),
        }
    }
}

/// Every blob of a declarative catalog, grouped by schema.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DeclarativeConfig {
    pub packages: Vec<PackageBlob>,
    pub channels: Vec<ChannelBlob>,
    pub bundles: Vec<BundleBlob>,
    pub others: Vec<Value>,
}

impl DeclarativeConfig {
    /// Load every catalog document from a directory tree or a single file.
    pub fn load(root: &Path) -> miette::Result<Self> {
        let files = fbc_util::fs::collect_catalog_files(root).map_err(|e| FbcError::Catalog {
            message: format!("Failed to read catalog {}: {e}", root.display()),
        })?;
        let mut cfg = Self::default();
        for file in &files {
            let content = std::fs::read_to_string(file).map_err(|e| FbcError::Catalog {
                message: format!("Failed to read {}: {e}", file.display()),
            })?;
            let origin = file.display().to_string();
            let is_json = file
                .extension()
                .and_then(|e| e.to_str())
                .is_some_and(|e| e.eq_ignore_ascii_case("json"));
            let blobs = if is_json {
                parse_json_stream(&content, &origin)?
            } else {
                parse_yaml_documents(&content, &origin)?
            };
            for blob in blobs {
                cfg.add_blob(blob, &origin)?;
            }
        }
        tracing::info!(
            "Loaded {} packages, {} channels, {} bundles from {} file(s)",
            cfg.packages.len(),
            cfg.channels.len(),
            cfg.bundles.len(),
            files.len()
        );
        Ok(cfg)
    }

    /// Parse in-memory catalog content: YAML documents, or a single JSON value.
    pub fn from_yaml_str(content: &str) -> miette::Result<Self> {
        let mut cfg = Self::default();
        for blob in parse_yaml_documents(content, "<input>")? {
            cfg.add_blob(blob, "<input>")?;
        }
        Ok(cfg)
    }

    /// Sort a raw blob into its schema bucket.
    pub fn add_blob(&mut self, blob: Value, origin: &str) -> Result<(), FbcError> {
        let schema = blob
            .get("schema")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();
        let typed_err = |e: serde_json::Error| FbcError::Catalog {
            message: format!("{origin}: invalid {schema} blob: {e}"),
        };
        match schema.as_str() {
            SCHEMA_PACKAGE => self
                .packages
                .push(serde_json::from_value(blob).map_err(typed_err)?),
            SCHEMA_CHANNEL => self
                .channels
                .push(serde_json::from_value(blob).map_err(typed_err)?),
            SCHEMA_BUNDLE => self
                .bundles
                .push(serde_json::from_value(blob).map_err(typed_err)?),
            "" => {
                return Err(FbcError::Catalog {
                    message: format!("{origin}: blob has no schema"),
                })
            }
            _ => self.others.push(blob),
        }
        Ok(())
    }

    /// Render the blobs into the catalog model.
    pub fn to_catalog(&self) -> miette::Result<Catalog> {
        let mut catalog = Catalog::new();

        for blob in &self.packages {
            if blob.name.is_empty() {
                return Err(catalog_err("package blob has no name"));
            }
            if catalog.package(&blob.name).is_some() {
                return Err(catalog_err(format!("duplicate package {:?}", blob.name)));
            }
            catalog.insert(Package::new(&blob.name, &blob.default_channel));
        }

        let bundle_blobs = self.index_bundles()?;

        for blob in &self.channels {
            let pkg = catalog.package_mut(&blob.package).ok_or_else(|| {
                catalog_err(format!(
                    "unknown package {:?} for channel {:?}",
                    blob.package, blob.name
                ))
            })?;
            if pkg.has_channel(&blob.name) {
                return Err(catalog_err(format!(
                    "package {:?} has duplicate channel {:?}",
                    blob.package, blob.name
                )));
            }
            let mut channel = Channel::new(&blob.package, &blob.name);
            for entry in &blob.entries {
                if channel.bundle(&entry.name).is_some() {
                    return Err(catalog_err(format!(
                        "package {:?}, channel {:?} has duplicate entry {:?}",
                        blob.package, blob.name, entry.name
                    )));
                }
                let version = bundle_blobs
                    .get(&(blob.package.as_str(), entry.name.as_str()))
                    .cloned()
                    .ok_or_else(|| {
                        catalog_err(format!(
                            "package {:?}, channel {:?} has entry {:?} for which there is no bundle",
                            blob.package, blob.name, entry.name
                        ))
                    })?;
                let mut bundle = Bundle::new(&entry.name, version);
                bundle.replaces = entry.replaces.clone().filter(|r| !r.is_empty());
                bundle.skips = entry.skips.clone();
                channel.insert_bundle(bundle);
            }
            pkg.insert_channel(channel);
        }

        let referenced: HashSet<(&str, &str)> = self
            .channels
            .iter()
            .flat_map(|c| c.entries.iter().map(|e| (c.package.as_str(), e.name.as_str())))
            .collect();
        for blob in &self.bundles {
            if !referenced.contains(&(blob.package.as_str(), blob.name.as_str())) {
                return Err(catalog_err(format!(
                    "package {:?}, bundle {:?} not found in any channel entries",
                    blob.package, blob.name
                )));
            }
        }

        for pkg in catalog.packages.values() {
            if !pkg.has_channel(&pkg.default_channel) {
                return Err(catalog_err(format!(
                    "package {:?} default channel {:?} not found",
                    pkg.name, pkg.default_channel
                )));
            }
        }

        tracing::debug!(
            "Rendered {} packages with {} channel bundles",
            catalog.len(),
            catalog.bundle_count()
        );
        Ok(catalog)
    }

    /// Version of every bundle blob keyed by `(package, name)`.
    fn index_bundles(&self) -> miette::Result<BTreeMap<(&str, &str), BundleVersion>> {
        let mut index = BTreeMap::new();
        for blob in &self.bundles {
            if index.contains_key(&(blob.package.as_str(), blob.name.as_str())) {
                return Err(catalog_err(format!(
                    "package {:?} has duplicate bundle {:?}",
                    blob.package, blob.name
                )));
            }
            index.insert(
                (blob.package.as_str(), blob.name.as_str()),
                bundle_version(blob)?,
            );
        }
        Ok(index)
    }

    /// Keep only what survives in `catalog`, in a stable output order.
    ///
    /// Package blobs take the catalog's default channel, channel entries are
    /// restricted to retained bundles, and bundle blobs are kept when any
    /// retained channel still lists them.
    pub fn retain(self, catalog: &Catalog) -> Self {
        let kept_bundles: BTreeSet<(&str, &str)> = catalog
            .packages
            .values()
            .flat_map(|p| p.channels.values())
            .flat_map(|c| c.bundles.keys().map(move |b| (c.package.as_str(), b.as_str())))
            .collect();

        let mut packages: Vec<PackageBlob> = self
            .packages
            .into_iter()
            .filter_map(|mut blob| {
                let pkg = catalog.package(&blob.name)?;
                blob.default_channel = pkg.default_channel.clone();
                Some(blob)
            })
            .collect();
        packages.sort_by(|a, b| a.name.cmp(&b.name));

        let mut channels: Vec<ChannelBlob> = self
            .channels
            .into_iter()
            .filter_map(|mut blob| {
                let channel = catalog.package(&blob.package)?.channel(&blob.name)?;
                blob.entries.retain(|e| channel.bundles.contains_key(&e.name));
                Some(blob)
            })
            .collect();
        channels.sort_by(|a, b| (&a.package, &a.name).cmp(&(&b.package, &b.name)));

        let mut bundles: Vec<BundleBlob> = self
            .bundles
            .into_iter()
            .filter(|b| kept_bundles.contains(&(b.package.as_str(), b.name.as_str())))
            .collect();
        bundles.sort_by(|a, b| (&a.package, &a.name).cmp(&(&b.package, &b.name)));

        let others = self
            .others
            .into_iter()
            .filter(|o| match o.get("package").and_then(Value::as_str) {
                Some(pkg) => catalog.package(pkg).is_some(),
                None => true,
            })
            .collect();

        Self {
            packages,
            channels,
            bundles,
            others,
        }
    }

    /// All blobs in output order: per package its package, channel and
    /// bundle blobs followed by its other blobs; package-less others last.
    pub fn blobs(&self) -> Result<Vec<Value>, FbcError> {
        let to_value = |r: Result<Value, serde_json::Error>| {
            r.map_err(|e| FbcError::Output {
                message: format!("Failed to encode blob: {e}"),
            })
        };
        let mut out = Vec::new();
        let mut names: Vec<&str> = self.packages.iter().map(|p| p.name.as_str()).collect();
        for o in &self.others {
            if let Some(pkg) = o.get("package").and_then(Value::as_str) {
                names.push(pkg);
            }
        }
        names.sort_unstable();
        names.dedup();

        for name in names {
            for p in self.packages.iter().filter(|p| p.name == name) {
                out.push(to_value(serde_json::to_value(p))?);
            }
            for c in self.channels.iter().filter(|c| c.package == name) {
                out.push(to_value(serde_json::to_value(c))?);
            }
            for b in self.bundles.iter().filter(|b| b.package == name) {
                out.push(to_value(serde_json::to_value(b))?);
            }
            for o in &self.others {
                if o.get("package").and_then(Value::as_str) == Some(name) {
                    out.push(o.clone());
                }
            }
        }
        for o in &self.others {
            if o.get("package").and_then(Value::as_str).is_none() {
                out.push(o.clone());
            }
        }
        Ok(out)
    }

    /// Serialize every blob to `w` in the requested format.
    pub fn write<W: Write>(&self, w: &mut W, format: OutputFormat) -> Result<(), FbcError> {
        let io_err = |e: std::io::Error| FbcError::Output {
            message: format!("Failed to write output: {e}"),
        };
        for blob in self.blobs()? {
            match format {
                OutputFormat::Yaml => {
                    let doc = serde_yaml::to_string(&blob).map_err(|e| FbcError::Output {
                        message: format!("Failed to encode YAML: {e}"),
                    })?;
                    write!(w, "---\n{doc}").map_err(io_err)?;
                }
                OutputFormat::Json => {
                    let doc =
                        serde_json::to_string_pretty(&blob).map_err(|e| FbcError::Output {
                            message: format!("Failed to encode JSON: {e}"),
                        })?;
                    writeln!(w, "{doc}").map_err(io_err)?;
                }
            }
        }
        w.flush().map_err(io_err)
    }
}

/// Extract the version from a bundle's single `olm.package` property.
fn bundle_version(blob: &BundleBlob) -> miette::Result<BundleVersion> {
    let mut props = blob.properties.iter().filter(|p| p.kind == PROPERTY_PACKAGE);
    let prop = match (props.next(), props.next()) {
        (Some(prop), None) => prop,
        _ => {
            return Err(catalog_err(format!(
                "package {:?}, bundle {:?} must have exactly one property of type {PROPERTY_PACKAGE:?}",
                blob.package, blob.name
            )))
        }
    };
    let raw = prop
        .value
        .get("version")
        .and_then(Value::as_str)
        .unwrap_or_default();
    raw.parse::<BundleVersion>().map_err(|e| {
        catalog_err(format!(
            "package {:?}, bundle {:?} has invalid version {raw:?}: {e}",
            blob.package, blob.name
        ))
    })
}

fn catalog_err(message: impl Into<String>) -> miette::Report {
    FbcError::Catalog {
        message: message.into(),
    }
    .into()
}

/// Parse a stream of concatenated JSON values.
pub fn parse_json_stream(content: &str, origin: &str) -> Result<Vec<Value>, FbcError> {
    serde_json::Deserializer::from_str(content)
        .into_iter::<Value>()
        .map(|r| {
            r.map_err(|e| FbcError::Catalog {
                message: format!("{origin}: invalid JSON: {e}"),
            })
        })
        .collect()
}

/// Parse every `---`-separated YAML document, skipping empty ones.
pub fn parse_yaml_documents(content: &str, origin: &str) -> Result<Vec<Value>, FbcError> {
    let mut out = Vec::new();
    for doc in serde_yaml::Deserializer::from_str(content) {
        let value = Value::deserialize(doc).map_err(|e| FbcError::Catalog {
            message: format!("{origin}: invalid YAML: {e}"),
        })?;
        if !value.is_null() {
            out.push(value);
        }
    }
    Ok(out)
}
