//! Support code for the `litmus` binary.
pub mod table {
    //! ASCII grids for `inspect`. Widths count chars, so non-ASCII names stay aligned.

    fn border(widths: &[usize]) -> String {
        widths.iter().fold(String::from("+"), |mut s, w| {
            s.push_str(&"-".repeat(w + 2));
            s.push('+');
            s
        })
    }

    fn row(cells: &[&str], widths: &[usize]) -> String {
        widths.iter().enumerate().fold(String::from("|"), |mut s, (i, w)| {
            let cell = cells.get(i).copied().unwrap_or_default();
            s.push_str(&format!(" {cell}{} |", " ".repeat(w - cell.chars().count())));
            s
        })
    }

    /// Render `rows` under `headers`. Short rows are padded with empty cells;
    /// cells beyond the header count are dropped.
    #[must_use]
    pub fn render(headers: &[&str], rows: &[Vec<String>]) -> String {
        let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
        for r in rows {
            for (w, cell) in widths.iter_mut().zip(r) {
                *w = (*w).max(cell.chars().count());
            }
        }
        let rule = border(&widths);
        let mut lines = vec![rule.clone(), row(headers, &widths), rule.clone()];
        lines.extend(rows.iter().map(|r| {
            let cells: Vec<&str> = r.iter().map(String::as_str).collect();
            row(&cells, &widths)
        }));
        lines.push(rule);
        lines.join("\n")
    }
}

pub mod config {
    use crate::compose::ComposeOptions;
    use crate::errors::LitmusError;
    use serde::Deserialize;
    use std::fs;
    use std::path::{Path, PathBuf};

    #[derive(Debug, Clone, Deserialize, Default)]
    pub struct OutputConfig {
        pub test_marker: Option<String>,
        pub indent: Option<usize>,
        pub format: Option<String>, // "text" | "json"
    }

    #[derive(Debug, Clone, Deserialize, Default)]
    pub struct NamingConfig {
        pub parameter_marker: Option<String>,
    }

    #[derive(Debug, Clone, Deserialize, Default)]
    pub struct Config {
        pub output: Option<OutputConfig>,
        pub naming: Option<NamingConfig>,
    }

    impl Config {
        /// Overlay the values present in this config onto `opts`.
        pub fn apply(&self, opts: &mut ComposeOptions) {
            if let Some(out) = &self.output {
                if let Some(v) = &out.test_marker {
                    opts.test_marker.clone_from(v);
                }
                if let Some(v) = out.indent {
                    opts.indent = v;
                }
            }
            if let Some(v) = self.naming.as_ref().and_then(|n| n.parameter_marker.as_ref()) {
                opts.parameter_marker.clone_from(v);
            }
        }

        #[must_use]
        pub fn default_format(&self) -> Option<&str> {
            self.output.as_ref().and_then(|o| o.format.as_deref())
        }
    }

    fn default_config_path(dir: &Path) -> PathBuf {
        dir.join("litmus.toml")
    }

    /// Read and parse a config file.
    ///
    /// # Errors
    /// Returns `LitmusError::Config` when the file cannot be read or parsed.
    pub fn read_config(path: &Path) -> Result<Config, LitmusError> {
        let config_error = |reason: String| LitmusError::Config { path: path.to_path_buf(), reason };
        let data = fs::read_to_string(path).map_err(|e| config_error(e.to_string()))?;
        toml::from_str::<Config>(&data).map_err(|e| config_error(e.to_string()))
    }

    /// Lenient variant for implicit lookups: failures become `None`.
    #[must_use]
    pub fn load_config_at(path: &Path) -> Option<Config> {
        match read_config(path) {
            Ok(cfg) => Some(cfg),
            Err(e) => {
                tracing::warn!(error = %e, "ignoring unreadable config");
                None
            }
        }
    }

    #[must_use]
    pub fn load_config_near(dir: &Path) -> Option<Config> {
        let path = default_config_path(dir);
        if path.exists() {
            load_config_at(&path)
        } else {
            None
        }
    }
}

pub mod file_walker {
    use crate::errors::LitmusError;
    use std::path::{Path, PathBuf};

    /// A markup template and the class file that backs it.
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct ComponentPair {
        pub name: String,
        pub class_path: PathBuf,
        pub markup_path: PathBuf,
    }

    fn walker(root: &Path, no_ignore: bool) -> ignore::WalkBuilder {
        let mut walker = ignore::WalkBuilder::new(root);
        walker
            .follow_links(false)
            .git_ignore(!no_ignore)
            .git_global(false)
            .git_exclude(false)
            .ignore(!no_ignore)
            .parents(true);
        walker
    }

    fn has_extension(path: &Path, ext: &str) -> bool {
        path.extension() == Some(std::ffi::OsStr::new(ext))
    }

    /// Files directly inside `dir` with extension `ext`, sorted by path.
    #[must_use]
    pub fn files_with_extension(dir: &Path, ext: &str, no_ignore: bool) -> Vec<PathBuf> {
        let mut out: Vec<PathBuf> = walker(dir, no_ignore)
            .max_depth(Some(1))
            .build()
            .flatten()
            .filter(|e| e.file_type().is_some_and(|t| t.is_file()))
            .map(ignore::DirEntry::into_path)
            .filter(|p| has_extension(p, ext))
            .collect();
        out.sort();
        out
    }

    /// Find exactly one `.cs` and one `.razor` file directly inside `dir`.
    ///
    /// # Errors
    /// Returns `LitmusError::Discovery` unless both counts are exactly one.
    pub fn discover_pair(dir: &Path, no_ignore: bool) -> Result<(PathBuf, PathBuf), LitmusError> {
        let classes = files_with_extension(dir, "cs", no_ignore);
        let markups = files_with_extension(dir, "razor", no_ignore);
        tracing::debug!(cs = classes.len(), razor = markups.len(), "auto-discovery candidates");
        match (classes.as_slice(), markups.as_slice()) {
            ([class], [markup]) => Ok((class.clone(), markup.clone())),
            _ => Err(LitmusError::Discovery {
                dir: dir.to_path_buf(),
                reason: format!(
                    "expected exactly one .cs and one .razor file, found {} and {}",
                    classes.len(),
                    markups.len()
                ),
            }),
        }
    }

    /// Recursively pair every `X.razor` with `X.razor.cs`, or else `X.cs`, in the same
    /// directory. Templates without a class file are skipped. Sorted by markup path.
    #[must_use]
    pub fn component_pairs(root: &Path, no_ignore: bool) -> Vec<ComponentPair> {
        let mut out: Vec<ComponentPair> = walker(root, no_ignore)
            .build()
            .flatten()
            .filter(|e| e.file_type().is_some_and(|t| t.is_file()))
            .map(ignore::DirEntry::into_path)
            .filter(|p| has_extension(p, "razor"))
            .filter_map(|markup_path| {
                let name = markup_path.file_stem()?.to_str()?.to_string();
                let code_behind = markup_path.with_extension("razor.cs");
                let sibling = markup_path.with_extension("cs");
                let class_path = if code_behind.is_file() {
                    code_behind
                } else if sibling.is_file() {
                    sibling
                } else {
                    tracing::debug!(markup = %markup_path.display(), "no class file for template");
                    return None;
                };
                Some(ComponentPair { name, class_path, markup_path })
            })
            .collect();
        out.sort_by(|a, b| a.markup_path.cmp(&b.markup_path));
        out
    }
}

pub mod logging {
    use tracing_subscriber::EnvFilter;

    /// Install a stderr subscriber. `RUST_LOG` wins over the flags.
    pub fn init(verbose: u8, quiet: bool) {
        let default = match (quiet, verbose) {
            (true, _) => "error",
            (false, 0) => "warn",
            (false, 1) => "litmus=info",
            _ => "litmus=debug",
        };
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .try_init();
    }
}
