//! Human-readable index page listing logged predictions.

use minijinja::{context, Environment};

use crate::models::PredictionRecord;

const INDEX_TEMPLATE: &str = include_str!("../templates/index.html");

/// Render the index page. The `.html` name turns on HTML auto-escaping.
pub fn render_index(records: &[PredictionRecord]) -> Result<String, minijinja::Error> {
    let mut env = Environment::new();
    env.add_template("index.html", INDEX_TEMPLATE)?;
    let template = env.get_template("index.html")?;
    template.render(context! { posts => records })
}
