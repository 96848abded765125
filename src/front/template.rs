use std::{fs, path::Path, str::FromStr, sync::Arc};

use anyhow::{anyhow, Context};
use axum::response::Html;
use bigdecimal::BigDecimal;
use handlebars::handlebars_helper;
use serde::Serialize;

use crate::error::AppResult;

/// Handlebars registry loaded once at start up.
///
/// `name.hbs` files are pages rendered by name, `_name.hbs` files are
/// partials used as `{{> name}}`.
#[derive(Clone)]
pub struct Template {
    r: Arc<handlebars::Handlebars<'static>>,
}

impl Template {
    pub fn new(dir: &Path) -> anyhow::Result<Self> {
        let mut handlebars = handlebars::Handlebars::new();

        for entity in fs::read_dir(dir).with_context(|| format!("cannot read {}", dir.display()))? {
            let path = entity?.path();
            let file_name = path
                .file_name()
                .and_then(|n| n.to_str())
                .ok_or_else(|| anyhow!("bad template file name {}", path.display()))?
                .to_string();
            if !file_name.ends_with(".hbs") {
                continue;
            }

            match file_name.strip_prefix('_') {
                Some(partial) => {
                    let content = fs::read_to_string(&path)?;
                    handlebars.register_partial(partial.trim_end_matches(".hbs"), content)?;
                }
                None => handlebars.register_template_file(&file_name, &path)?,
            }
            log::debug!("registered template {}", file_name);
        }

        handlebars_helper!(nor_amt: |i: String| two_decimals(&i));

        handlebars.register_helper("nor_amt", Box::new(nor_amt));
        Ok(Self {
            r: Arc::new(handlebars),
        })
    }

    pub fn render<T>(&self, name: &str, data: &T) -> AppResult<Html<String>>
    where
        T: Serialize,
    {
        log::debug!("render '{}'", name);
        let html = self
            .r
            .render(name, data)
            .with_context(|| format!("failed to render template '{name}'"))?;
        Ok(Html(html))
    }
}

/// Formats a decimal string with two decimals without going through a float.
fn two_decimals(s: &str) -> String {
    match BigDecimal::from_str(s) {
        Ok(d) => d.round(2).to_string(),
        Err(_) => s.to_string(),
    }
}
