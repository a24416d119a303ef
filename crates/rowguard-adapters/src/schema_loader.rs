//! Filesystem-based schema loader.
//!
//! Reads [`ModelSchema`] declarations from TOML files, one model per file.
//!
//! # File format
//!
//! ```toml
//! model = "User"
//!
//! [[fields]]
//! name        = "ID"
//! primary_key = true
//!
//! [[fields]]
//! name  = "Name"
//! rules = [{ rule = "required" }]
//!
//! [[fields]]
//! name  = "Password"
//! rules = [{ rule = "length", min = 6, max = 20 }]
//!
//! [[fields]]
//! name  = "Handle"
//! rules = [{ rule = "custom", name = "alphanumeric" }]
//! ```
//!
//! Field order in the file is the order violations are reported in.

use std::{
    collections::{BTreeMap, btree_map::Entry},
    fs,
    path::{Path, PathBuf},
    sync::Arc,
};

use tracing::{debug, instrument};
use walkdir::WalkDir;

use rowguard_core::{
    application::ApplicationError,
    domain::{DomainError, ModelSchema},
    error::RowguardResult,
};

const INLINE: &str = "<inline>";

// ── Loader ────────────────────────────────────────────────────────────────────

/// Loads schemas from a file or a directory tree of `*.toml` files.
///
/// ```no_run
/// use rowguard_adapters::SchemaLoader;
///
/// let catalog = SchemaLoader::new("./schemas").load()?;
/// println!("Loaded {} models", catalog.len());
/// # Ok::<(), rowguard_core::error::RowguardError>(())
/// ```
#[derive(Debug, Clone)]
pub struct SchemaLoader {
    root: PathBuf,
}

impl SchemaLoader {
    /// The path may be a single schema file or a directory.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Load every schema under the root into a catalog.
    ///
    /// # Errors
    ///
    /// - `SchemaLoad` if the root is missing or a file cannot be read or parsed
    /// - `InvalidSchema` / `DuplicateField` / `InvalidRule` for bad declarations
    /// - `InvalidSchema` if two files declare the same model
    #[instrument(skip(self), fields(root = %self.root.display()))]
    pub fn load(&self) -> RowguardResult<SchemaCatalog> {
        let schemas = if self.root.is_dir() {
            Self::load_dir(&self.root)?
        } else {
            vec![Self::load_file(&self.root)?]
        };

        let mut catalog = SchemaCatalog::new();
        for schema in schemas {
            catalog.insert(schema)?;
        }
        debug!(models = catalog.len(), "Schemas loaded");
        Ok(catalog)
    }

    /// Parse one schema from TOML text.
    pub fn parse_str(text: &str) -> RowguardResult<ModelSchema> {
        parse(Path::new(INLINE), text)
    }

    /// Read and parse one schema file.
    pub fn load_file(path: &Path) -> RowguardResult<ModelSchema> {
        let text = fs::read_to_string(path).map_err(|e| load_error(path, e))?;
        let schema = parse(path, &text)?;
        debug!(path = %path.display(), model = schema.model(), "Loaded schema");
        Ok(schema)
    }

    /// Every `*.toml` file under `dir`, recursively, in file-name order.
    pub fn load_dir(dir: &Path) -> RowguardResult<Vec<ModelSchema>> {
        let mut schemas = Vec::new();

        for entry in WalkDir::new(dir).sort_by_file_name() {
            let entry = entry.map_err(|e| load_error(dir, e))?;
            let path = entry.path();
            if !entry.file_type().is_file() || path.extension().is_none_or(|ext| ext != "toml") {
                continue;
            }
            schemas.push(Self::load_file(path)?);
        }

        Ok(schemas)
    }
}

fn parse(path: &Path, text: &str) -> RowguardResult<ModelSchema> {
    let schema: ModelSchema = toml::from_str(text).map_err(|e| load_error(path, e))?;
    schema.validate()?;
    Ok(schema)
}

fn load_error(path: &Path, err: impl std::fmt::Display) -> rowguard_core::error::RowguardError {
    ApplicationError::SchemaLoad {
        path: path.to_path_buf(),
        reason: err.to_string(),
    }
    .into()
}

// ── Catalog ───────────────────────────────────────────────────────────────────

/// Loaded schemas by model name.
#[derive(Debug, Clone, Default)]
pub struct SchemaCatalog {
    models: BTreeMap<String, Arc<ModelSchema>>,
}

impl SchemaCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a schema. Each model may be declared once.
    pub fn insert(&mut self, schema: ModelSchema) -> RowguardResult<Arc<ModelSchema>> {
        match self.models.entry(schema.model().to_string()) {
            Entry::Occupied(entry) => Err(DomainError::InvalidSchema(format!(
                "model '{}' is declared more than once",
                entry.key()
            ))
            .into()),
            Entry::Vacant(entry) => Ok(Arc::clone(entry.insert(Arc::new(schema)))),
        }
    }

    /// # Errors
    ///
    /// `UnknownModel` if no schema declares `model`.
    pub fn get(&self, model: &str) -> RowguardResult<Arc<ModelSchema>> {
        self.models.get(model).cloned().ok_or_else(|| {
            ApplicationError::UnknownModel {
                model: model.to_string(),
            }
            .into()
        })
    }

    pub fn contains(&self, model: &str) -> bool {
        self.models.contains_key(model)
    }

    /// Model names, sorted.
    pub fn models(&self) -> impl Iterator<Item = &str> {
        self.models.keys().map(String::as_str)
    }

    /// The only schema, when exactly one is loaded.
    pub fn single(&self) -> Option<Arc<ModelSchema>> {
        match self.models.len() {
            1 => self.models.values().next().cloned(),
            _ => None,
        }
    }

    pub fn len(&self) -> usize {
        self.models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use std::{fs::File, io::Write};

    use rowguard_core::{domain::Rule, error::RowguardError};
    use tempfile::TempDir;

    use super::*;

    const USER: &str = r#"
model = "User"

[[fields]]
name = "ID"
primary_key = true

[[fields]]
name = "Name"
rules = [{ rule = "required" }]

[[fields]]
name = "Password"
rules = [{ rule = "length", min = 6, max = 20 }]
"#;

    const POST: &str = r#"
model = "Post"

[[fields]]
name = "ID"
primary_key = true

[[fields]]
name = "Slug"
rules = [{ rule = "custom", name = "lowercase" }]
"#;

    fn write(dir: &Path, rel: &str, content: &str) {
        let full = dir.join(rel);
        if let Some(parent) = full.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        File::create(full)
            .unwrap()
            .write_all(content.as_bytes())
            .unwrap();
    }

    #[test]
    fn parses_fields_in_declaration_order() {
        let schema = SchemaLoader::parse_str(USER).unwrap();
        let names: Vec<_> = schema.fields().iter().map(|f| f.name.as_str()).collect();

        assert_eq!(names, vec!["ID", "Name", "Password"]);
        assert_eq!(schema.fields()[2].rules, vec![Rule::length(6, 20)]);
        assert_eq!(schema.primary_keys().count(), 1);
    }

    #[test]
    fn invalid_declaration_is_rejected() {
        let text = r#"
model = "User"
[[fields]]
name = "Password"
rules = [{ rule = "length", min = 9, max = 3 }]
"#;
        let err = SchemaLoader::parse_str(text).unwrap_err();
        assert!(matches!(
            err,
            RowguardError::Domain(DomainError::InvalidRule { .. })
        ));
    }

    #[test]
    fn malformed_toml_reports_the_path() {
        let temp = TempDir::new().unwrap();
        write(temp.path(), "bad.toml", "model = [");

        let err = SchemaLoader::new(temp.path().join("bad.toml"))
            .load()
            .unwrap_err();
        assert!(err.to_string().contains("bad.toml"));
    }

    #[test]
    fn directory_is_walked_recursively() {
        let temp = TempDir::new().unwrap();
        write(temp.path(), "user.toml", USER);
        write(temp.path(), "blog/post.toml", POST);
        write(temp.path(), "README.md", "not a schema");

        let catalog = SchemaLoader::new(temp.path()).load().unwrap();
        assert_eq!(catalog.models().collect::<Vec<_>>(), vec!["Post", "User"]);
        assert!(catalog.single().is_none());
    }

    #[test]
    fn duplicate_model_is_rejected() {
        let temp = TempDir::new().unwrap();
        write(temp.path(), "a.toml", USER);
        write(temp.path(), "b.toml", USER);

        let err = SchemaLoader::new(temp.path()).load().unwrap_err();
        assert!(err.to_string().contains("declared more than once"));
    }

    #[test]
    fn unknown_model_lookup_fails() {
        let mut catalog = SchemaCatalog::new();
        catalog.insert(SchemaLoader::parse_str(USER).unwrap()).unwrap();

        assert!(catalog.get("User").is_ok());
        assert_eq!(catalog.single().map(|s| s.model().to_string()), Some("User".into()));
        assert!(matches!(
            catalog.get("Post"),
            Err(RowguardError::Application(ApplicationError::UnknownModel { .. }))
        ));
    }

    #[test]
    fn missing_root_is_a_load_error() {
        let err = SchemaLoader::new("/absolutely/does/not/exist.toml")
            .load()
            .unwrap_err();
        assert!(matches!(
            err,
            RowguardError::Application(ApplicationError::SchemaLoad { .. })
        ));
    }
}
