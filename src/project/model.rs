//! Project modules, libraries and the operations the registration step
//! needs from them.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// A project-level library: a name and its classpath roots.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Library {
    pub name: String,
    #[serde(default)]
    pub classes: Vec<String>,
}

/// A project module and the libraries it depends on, by name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Module {
    pub name: String,
    #[serde(default)]
    pub dependencies: Vec<String>,
}

impl Module {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            dependencies: Vec::new(),
        }
    }
}

/// A library being assembled. Nothing is visible to modules until it is
/// passed to [`ProjectModel::commit`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LibraryDraft {
    name: String,
    roots: Vec<String>,
}

impl LibraryDraft {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn roots(&self) -> &[String] {
        &self.roots
    }

    /// Add a classpath root. Duplicate roots are ignored.
    pub fn add_classpath_root(&mut self, root: impl Into<String>) {
        let root = root.into();
        if !self.roots.contains(&root) {
            self.roots.push(root);
        }
    }
}

/// Operations the registration step performs against project metadata.
///
/// Implementations are only ever driven from inside an exclusive write
/// section, so none of these need their own locking.
pub trait ProjectModel {
    fn library_by_name(&self, name: &str) -> Option<&Library>;

    fn remove_library(&mut self, name: &str) -> Result<()>;

    /// Start building a library. Fails if one with this name exists.
    fn create_library(&mut self, name: &str) -> Result<LibraryDraft>;

    /// Publish a draft as a project library.
    fn commit(&mut self, draft: LibraryDraft) -> Result<()>;

    fn module_names(&self) -> Vec<String>;

    fn module_has_library_dependency(&self, module: &str, library: &str) -> bool;

    fn add_library_dependency(&mut self, module: &str, library: &str) -> Result<()>;

    fn remove_library_dependency(&mut self, module: &str, library: &str) -> Result<()>;
}

/// Project metadata as persisted on disk.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectMetadata {
    #[serde(default)]
    pub modules: Vec<Module>,
    #[serde(default)]
    pub libraries: Vec<Library>,
}

impl ProjectMetadata {
    /// A project with a single module and no libraries.
    pub fn single_module(name: impl Into<String>) -> Self {
        Self {
            modules: vec![Module::new(name)],
            libraries: Vec::new(),
        }
    }

    /// Parse metadata from YAML.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Serialize metadata to YAML.
    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    fn module_mut(&mut self, name: &str) -> Result<&mut Module> {
        self.modules
            .iter_mut()
            .find(|m| m.name == name)
            .ok_or_else(|| Error::registration(name, "no such module"))
    }
}

impl ProjectModel for ProjectMetadata {
    fn library_by_name(&self, name: &str) -> Option<&Library> {
        self.libraries.iter().find(|l| l.name == name)
    }

    fn remove_library(&mut self, name: &str) -> Result<()> {
        let before = self.libraries.len();
        self.libraries.retain(|l| l.name != name);
        if self.libraries.len() == before {
            return Err(Error::registration(name, "no such library"));
        }
        Ok(())
    }

    fn create_library(&mut self, name: &str) -> Result<LibraryDraft> {
        if self.library_by_name(name).is_some() {
            return Err(Error::registration(name, "library already exists"));
        }
        Ok(LibraryDraft {
            name: name.to_string(),
            roots: Vec::new(),
        })
    }

    fn commit(&mut self, draft: LibraryDraft) -> Result<()> {
        if self.library_by_name(&draft.name).is_some() {
            return Err(Error::registration(
                &draft.name,
                "library was created concurrently",
            ));
        }
        self.libraries.push(Library {
            name: draft.name,
            classes: draft.roots,
        });
        Ok(())
    }

    fn module_names(&self) -> Vec<String> {
        self.modules.iter().map(|m| m.name.clone()).collect()
    }

    fn module_has_library_dependency(&self, module: &str, library: &str) -> bool {
        self.modules
            .iter()
            .any(|m| m.name == module && m.dependencies.iter().any(|d| d == library))
    }

    fn add_library_dependency(&mut self, module: &str, library: &str) -> Result<()> {
        if self.library_by_name(library).is_none() {
            return Err(Error::registration(
                module,
                format!("library '{}' is not registered", library),
            ));
        }
        let module = self.module_mut(module)?;
        if !module.dependencies.iter().any(|d| d == library) {
            module.dependencies.push(library.to_string());
        }
        Ok(())
    }

    fn remove_library_dependency(&mut self, module: &str, library: &str) -> Result<()> {
        self.module_mut(module)?
            .dependencies
            .retain(|d| d != library);
        Ok(())
    }
}
