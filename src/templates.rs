//! Page templates: bundled defaults, optionally overridden per file from a directory.
//! Loaded once at setup so a broken override fails there, not on first request.

use crate::error::ConfigError;
use minijinja::Environment;
use serde::Serialize;
use std::path::Path;

/// Templates every admin page needs; an override directory may replace any of them.
pub const TEMPLATE_NAMES: &[&str] = &["base.html", "index.html", "list.html", "edit.html", "login.html"];

const BUNDLED: &[(&str, &str)] = &[
    ("base.html", include_str!("../templates/base.html")),
    ("index.html", include_str!("../templates/index.html")),
    ("list.html", include_str!("../templates/list.html")),
    ("edit.html", include_str!("../templates/edit.html")),
    ("login.html", include_str!("../templates/login.html")),
];

pub struct Templates {
    env: Environment<'static>,
}

impl Templates {
    pub fn load(dir: Option<&Path>) -> Result<Self, ConfigError> {
        let mut env = Environment::new();
        for &(name, source) in BUNDLED {
            env.add_template(name, source)
                .map_err(|source| ConfigError::Template {
                    name: name.to_string(),
                    source,
                })?;
        }
        if let Some(dir) = dir {
            load_dir(&mut env, dir)?;
        }
        for name in TEMPLATE_NAMES {
            env.get_template(name)
                .map_err(|source| ConfigError::Template {
                    name: name.to_string(),
                    source,
                })?;
        }
        Ok(Templates { env })
    }

    pub fn render<S: Serialize>(&self, name: &str, ctx: S) -> Result<String, minijinja::Error> {
        self.env.get_template(name)?.render(ctx)
    }
}

fn load_dir(env: &mut Environment<'static>, dir: &Path) -> Result<(), ConfigError> {
    let dir_error = |source| ConfigError::TemplateDir {
        path: dir.to_path_buf(),
        source,
    };
    for entry in std::fs::read_dir(dir).map_err(dir_error)? {
        let path = entry.map_err(dir_error)?.path();
        if path.extension().and_then(|e| e.to_str()) != Some("html") {
            continue;
        }
        let Some(name) = path.file_name().and_then(|n| n.to_str()).map(str::to_string) else {
            continue;
        };
        let source = std::fs::read_to_string(&path).map_err(|source| ConfigError::TemplateDir {
            path: path.clone(),
            source,
        })?;
        tracing::debug!(template = %name, path = %path.display(), "template override");
        env.add_template_owned(name.clone(), source)
            .map_err(|source| ConfigError::Template { name, source })?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use minijinja::context;

    fn scratch_dir(tag: &str) -> std::path::PathBuf {
        let dir = std::env::temp_dir().join(format!("admin-templates-{}-{}", tag, uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn bundled_templates_render() {
        let templates = Templates::load(None).unwrap();
        let html = templates
            .render(
                "login.html",
                context! { title => "Site <Admin>", index_url => "/admin/", action => "/admin/login/", username => "", error => "" },
            )
            .unwrap();
        assert!(html.contains("<h1>Log in</h1>"));
        assert!(html.contains("Site &lt;Admin&gt;"));
    }

    #[test]
    fn directory_overrides_single_files() {
        let dir = scratch_dir("override");
        std::fs::write(dir.join("index.html"), "custom {{ title }}").unwrap();
        std::fs::write(dir.join("notes.txt"), "ignored {{").unwrap();
        let templates = Templates::load(Some(dir.as_path())).unwrap();
        assert_eq!(templates.render("index.html", context! { title => "X" }).unwrap(), "custom X");
        assert!(templates
            .render("login.html", context! { title => "X" })
            .unwrap()
            .contains("Log in"));
        std::fs::remove_dir_all(dir).ok();
    }

    #[test]
    fn broken_override_fails_at_load() {
        let dir = scratch_dir("broken");
        std::fs::write(dir.join("list.html"), "{% for x in %}").unwrap();
        let err = Templates::load(Some(dir.as_path())).err().unwrap();
        assert!(matches!(err, ConfigError::Template { ref name, .. } if name == "list.html"));
        std::fs::remove_dir_all(dir).ok();
    }

    #[test]
    fn missing_directory_is_reported() {
        let missing = std::env::temp_dir().join("admin-templates-does-not-exist-7f3a");
        assert!(matches!(
            Templates::load(Some(missing.as_path())),
            Err(ConfigError::TemplateDir { .. })
        ));
    }
}
